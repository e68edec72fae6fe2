//! # 送客
//!
//! 自社で扱わない求職者を提携先（送客先企業）に紹介する事業のデータ。
//! 求職者・求人系のテーブルとは独立した並行スキーマを持つ。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`SendingJobSeeker`] | 送客求職者 | 論理削除（`is_deleted`）対象 |
//! | [`SendingJobSeekerDesiredIndustry`] | 希望業界 | 子テーブル。複数行を一括作成する |
//! | [`SendingPhase`] | 送客フェーズ | 送客先ごとの進捗 |
//! | [`SendingSale`] | 送客売上 | 確度・見込み売上・成約月 |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentId, AgentStaffId};

define_serial_id! {
    /// 送客求職者 ID
    pub struct SendingJobSeekerId;
}

define_serial_id! {
    /// 希望業界 ID
    pub struct SendingJobSeekerDesiredIndustryId;
}

define_serial_id! {
    /// 送客フェーズ ID
    pub struct SendingPhaseId;
}

define_serial_id! {
    /// 送客売上 ID
    pub struct SendingSaleId;
}

impl_id_list!(SendingJobSeekerId);

/// 送客求職者
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingJobSeeker {
    pub id:             SendingJobSeekerId,
    pub uuid:           Uuid,
    pub agent_id:       AgentId,
    /// 担当 CA
    pub agent_staff_id: AgentStaffId,
    pub last_name:      String,
    pub first_name:     String,
    pub last_furigana:  String,
    pub first_furigana: String,
    pub gender:         i16,
    pub birthday:       Option<NaiveDate>,
    pub email:          String,
    pub phone_number:   String,
    pub phase:          i16,
    pub is_deleted:     bool,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub agent_name:    String,
    pub ca_staff_name: String,
}

/// 送客求職者の部分更新
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingJobSeekerPatch {
    pub agent_staff_id: Option<AgentStaffId>,
    pub last_name:      Option<String>,
    pub first_name:     Option<String>,
    pub last_furigana:  Option<String>,
    pub first_furigana: Option<String>,
    pub gender:         Option<i16>,
    pub birthday:       Option<Option<NaiveDate>>,
    pub email:          Option<String>,
    pub phone_number:   Option<String>,
    pub phase:          Option<i16>,
}

/// 送客求職者の希望業界
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingJobSeekerDesiredIndustry {
    pub id:                    SendingJobSeekerDesiredIndustryId,
    pub sending_job_seeker_id: SendingJobSeekerId,
    pub desired_industry:      i16,
    pub created_at:            DateTime<Utc>,
    pub updated_at:            DateTime<Utc>,
}

/// 送客先ごとのフェーズ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingPhase {
    pub id:                      SendingPhaseId,
    pub sending_job_seeker_id:   SendingJobSeekerId,
    pub sending_enterprise_name: String,
    pub phase:                   i16,
    pub created_at:              DateTime<Utc>,
    pub updated_at:              DateTime<Utc>,
}

/// 送客売上
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingSale {
    pub id:                      SendingSaleId,
    pub sending_job_seeker_id:   SendingJobSeekerId,
    pub sending_enterprise_name: String,
    /// 確度（区分値）
    pub accuracy:                i16,
    /// 見込み売上（円）
    pub expected_sales:          i64,
    /// 成約月（月初日）
    pub contract_signed_month:   Option<NaiveDate>,
    /// 請求月（月初日）
    pub billing_month:           Option<NaiveDate>,
    /// 請求額（円）
    pub billing_amount:          Option<i64>,
    pub created_at:              DateTime<Utc>,
    pub updated_at:              DateTime<Utc>,
}

/// 送客売上の部分更新
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendingSalePatch {
    pub sending_enterprise_name: Option<String>,
    pub accuracy:                Option<i16>,
    pub expected_sales:          Option<i64>,
    pub contract_signed_month:   Option<Option<NaiveDate>>,
    pub billing_month:           Option<Option<NaiveDate>>,
    pub billing_amount:          Option<Option<i64>>,
}
