//! # 求職者
//!
//! CA スタッフが担当する求職者と、その語学スキル・職歴を表現する。
//! 語学スキルと職歴は求職者の子テーブルで、更新時は全削除→再作成する。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentId, AgentStaffId};

define_serial_id! {
    /// 求職者 ID
    pub struct JobSeekerId;
}

define_serial_id! {
    /// 語学スキル ID
    pub struct JobSeekerLanguageSkillId;
}

define_serial_id! {
    /// 職歴 ID
    pub struct JobSeekerWorkHistoryId;
}

impl_id_list!(JobSeekerId);

/// 性別の区分値
pub mod gender {
    /// 未回答
    pub const UNKNOWN: i16 = 0;
    /// 男性
    pub const MALE: i16 = 1;
    /// 女性
    pub const FEMALE: i16 = 2;
}

/// 最終学歴の区分値（値が大きいほど高い学歴）
pub mod education {
    pub const JUNIOR_HIGH_SCHOOL: i16 = 0;
    pub const HIGH_SCHOOL: i16 = 1;
    pub const VOCATIONAL_SCHOOL: i16 = 2;
    pub const JUNIOR_COLLEGE: i16 = 3;
    pub const UNIVERSITY: i16 = 4;
    pub const GRADUATE_SCHOOL: i16 = 5;
}

/// 求職者
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSeeker {
    pub id:               JobSeekerId,
    pub uuid:             Uuid,
    pub agent_id:         AgentId,
    /// 担当 CA
    pub ca_staff_id:      AgentStaffId,
    pub last_name:        String,
    pub first_name:       String,
    pub last_furigana:    String,
    pub first_furigana:   String,
    pub gender:           i16,
    pub birthday:         Option<NaiveDate>,
    pub email:            String,
    pub phone_number:     String,
    /// 選考フェーズ（区分値の解釈はユースケース層）
    pub phase:            i16,
    pub final_education:  Option<i16>,
    pub job_change_count: Option<i16>,
    pub created_at:       DateTime<Utc>,
    pub updated_at:       DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub ca_staff_name: String,
    pub agent_name:    String,
}

/// 求職者の部分更新
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSeekerPatch {
    pub ca_staff_id:      Option<AgentStaffId>,
    pub last_name:        Option<String>,
    pub first_name:       Option<String>,
    pub last_furigana:    Option<String>,
    pub first_furigana:   Option<String>,
    pub gender:           Option<i16>,
    pub birthday:         Option<Option<NaiveDate>>,
    pub email:            Option<String>,
    pub phone_number:     Option<String>,
    pub phase:            Option<i16>,
    pub final_education:  Option<Option<i16>>,
    pub job_change_count: Option<Option<i16>>,
}

/// 求職者の語学スキル
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSeekerLanguageSkill {
    pub id:             JobSeekerLanguageSkillId,
    pub job_seeker_id:  JobSeekerId,
    pub language_type:  i16,
    pub language_level: i16,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,
}

/// 求職者の職歴
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobSeekerWorkHistory {
    pub id:                JobSeekerWorkHistoryId,
    pub job_seeker_id:     JobSeekerId,
    pub company_name:      String,
    pub industry:          i16,
    pub job_type:          i16,
    pub employment_status: i16,
    pub joining_date:      Option<NaiveDate>,
    pub retirement_date:   Option<NaiveDate>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}
