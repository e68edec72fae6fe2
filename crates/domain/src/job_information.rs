//! # 求人
//!
//! 請求先（求人企業）が出す求人と、その必須資格を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`JobInformation`] | 求人 | 論理削除（`is_deleted`）対象 |
//! | [`JobInformationRequiredLicense`] | 必須資格 | 求人の子テーブル。物理削除 |
//! | [`DiagnosisParam`] | 診断パラメータ | 求職者の属性から応募可能な求人を絞り込む条件 |
//!
//! ## 応募条件カラム
//!
//! 求人は応募条件を以下のカラムで持つ。`NULL` は「条件なし」を表す。
//!
//! | カラム | 意味 |
//! |-------|------|
//! | `gender_requirement` | 0: 不問、それ以外は [`crate::job_seeker::gender`] の値と一致する必要あり |
//! | `age_under` / `age_over` | 年齢の上限 / 下限（両端を含む） |
//! | `job_change_limit` | 転職回数の上限（含む） |
//! | `education_requirement` | 最終学歴の下限（[`crate::job_seeker::education`] の値） |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    agent::{AgentId, AgentStaffId},
    billing_address::BillingAddressId,
    time::age_at,
};

define_serial_id! {
    /// 求人 ID
    pub struct JobInformationId;
}

define_serial_id! {
    /// 必須資格 ID
    pub struct JobInformationRequiredLicenseId;
}

impl_id_list!(JobInformationId);

/// 募集状況の区分値
pub mod recruitment_state {
    /// 募集中
    pub const OPEN: i16 = 0;
    /// 募集停止
    pub const CLOSED: i16 = 1;
    /// 下書き
    pub const DRAFT: i16 = 2;
}

/// 性別条件の区分値
pub mod gender_requirement {
    /// 不問
    pub const ANY: i16 = 0;
}

/// 求人
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobInformation {
    pub id:                    JobInformationId,
    pub uuid:                  Uuid,
    pub billing_address_id:    BillingAddressId,
    pub title:                 String,
    pub recruitment_state:     i16,
    /// 他社求人（外部連携で取り込んだ求人）かどうか
    pub is_external:           bool,
    pub work_location:         String,
    pub job_description:       String,
    /// 年収下限（万円）
    pub under_income:          Option<i32>,
    /// 年収上限（万円）
    pub over_income:           Option<i32>,
    pub number_of_hires:       Option<i32>,
    pub gender_requirement:    i16,
    pub age_under:             Option<i16>,
    pub age_over:              Option<i16>,
    pub job_change_limit:      Option<i16>,
    pub education_requirement: Option<i16>,
    pub is_deleted:            bool,
    pub created_at:            DateTime<Utc>,
    pub updated_at:            DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub agent_id:      AgentId,
    pub company_name:  String,
    pub ra_staff_id:   AgentStaffId,
    pub ra_staff_name: String,
    pub agent_name:    String,
}

/// 求人の部分更新
///
/// NULL を許容するカラムは `Option<Option<T>>` で表す。
/// `Some(None)` は NULL への更新、`None` は変更なし。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobInformationPatch {
    pub billing_address_id:    Option<BillingAddressId>,
    pub title:                 Option<String>,
    pub recruitment_state:     Option<i16>,
    pub is_external:           Option<bool>,
    pub work_location:         Option<String>,
    pub job_description:       Option<String>,
    pub under_income:          Option<Option<i32>>,
    pub over_income:           Option<Option<i32>>,
    pub number_of_hires:       Option<Option<i32>>,
    pub gender_requirement:    Option<i16>,
    pub age_under:             Option<Option<i16>>,
    pub age_over:              Option<Option<i16>>,
    pub job_change_limit:      Option<Option<i16>>,
    pub education_requirement: Option<Option<i16>>,
}

/// 求人の必須資格
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobInformationRequiredLicense {
    pub id:                 JobInformationRequiredLicenseId,
    pub job_information_id: JobInformationId,
    pub license_type:       i16,
    pub created_at:         DateTime<Utc>,
    pub updated_at:         DateTime<Utc>,
}

/// 診断パラメータ
///
/// 求職者の属性。応募条件を満たす求人の抽出に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisParam {
    pub birthday:         NaiveDate,
    pub gender:           i16,
    pub job_change_count: i16,
    pub final_education:  i16,
}

impl DiagnosisParam {
    /// 基準日時点の満年齢
    pub fn age_at(&self, today: NaiveDate) -> i32 {
        age_at(self.birthday, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_診断パラメータは基準日で年齢を計算する() {
        let param = DiagnosisParam {
            birthday:         NaiveDate::from_ymd_opt(1995, 10, 1).unwrap(),
            gender:           1,
            job_change_count: 2,
            final_education:  3,
        };

        assert_eq!(param.age_at(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()), 28);
        assert_eq!(param.age_at(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()), 29);
    }

    #[test]
    fn test_パッチのデフォルトは全フィールド未変更() {
        let patch = JobInformationPatch::default();
        assert!(patch.title.is_none());
        assert!(patch.under_income.is_none());
    }
}
