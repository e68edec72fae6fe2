//! # エージェント
//!
//! 人材紹介会社（エージェント）と、そこに所属するスタッフを表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Agent`] | エージェント | 契約単位。利用開始日・終了日は JST の日付 |
//! | [`AgentStaff`] | スタッフ | RA（求人担当）/ CA（求職者担当）のどちらにもなる |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

define_serial_id! {
    /// エージェント ID
    pub struct AgentId;
}

define_serial_id! {
    /// スタッフ ID
    pub struct AgentStaffId;
}

impl_id_list!(AgentId, AgentStaffId);

/// 利用状況の区分値
pub mod usage_status {
    /// 利用中
    pub const ACTIVE: i16 = 0;
    /// 利用停止
    pub const SUSPENDED: i16 = 1;
}

/// スタッフ権限の区分値
pub mod authority {
    /// 管理者
    pub const ADMIN: i16 = 0;
    /// 一般
    pub const MEMBER: i16 = 1;
}

/// エージェント（人材紹介会社）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Agent {
    pub id:                  AgentId,
    pub uuid:                Uuid,
    pub agent_name:          String,
    pub agent_name_furigana: String,
    pub office_location:     String,
    pub representative:      String,
    pub corporate_site_url:  String,
    pub usage_status:        i16,
    /// 利用開始日（JST）
    pub usage_start_date:    Option<NaiveDate>,
    /// 利用終了日（JST）
    pub usage_end_date:      Option<NaiveDate>,
    pub created_at:          DateTime<Utc>,
    pub updated_at:          DateTime<Utc>,
}

/// エージェントの部分更新
///
/// `Some` のフィールドだけが UPDATE の SET 句に含まれる。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentPatch {
    pub agent_name:          Option<String>,
    pub agent_name_furigana: Option<String>,
    pub office_location:     Option<String>,
    pub representative:      Option<String>,
    pub corporate_site_url:  Option<String>,
    pub usage_status:        Option<i16>,
}

/// エージェントに所属するスタッフ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentStaff {
    pub id:            AgentStaffId,
    pub uuid:          Uuid,
    pub agent_id:      AgentId,
    pub staff_name:    String,
    pub furigana:      String,
    pub email:         String,
    pub phone_number:  String,
    pub authority:     i16,
    pub usage_status:  i16,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at:    DateTime<Utc>,
    pub updated_at:    DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub agent_name: String,
}

/// スタッフの部分更新
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentStaffPatch {
    pub staff_name:   Option<String>,
    pub furigana:     Option<String>,
    pub email:        Option<String>,
    pub phone_number: Option<String>,
    pub authority:    Option<i16>,
    pub usage_status: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_デフォルトのidは未採番() {
        let agent = Agent::default();
        assert!(!agent.id.is_assigned());
        assert_eq!(agent.id.as_i64(), 0);
    }

    #[test]
    fn test_to_i64_vecは順序を保つ() {
        let ids = [AgentStaffId::new(3), AgentStaffId::new(1), AgentStaffId::new(2)];
        assert_eq!(AgentStaffId::to_i64_vec(&ids), vec![3, 1, 2]);
    }

    #[test]
    fn test_idの表示は数値のみ() {
        let id = AgentId::new(7);
        assert_eq!(id.to_string(), "7");
    }
}
