//! # リリース反映状況
//!
//! 新しいリリース（デプロイ）のお知らせを各スタッフが確認したかどうかを記録する。
//! リリースごとに全スタッフ分の行をまとめて作成する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentStaffId;

define_serial_id! {
    /// リリース反映状況 ID
    pub struct DeploymentReflectionId;
}

/// スタッフごとのリリース反映状況
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeploymentReflection {
    pub id:             DeploymentReflectionId,
    pub deployment_id:  i64,
    pub agent_staff_id: AgentStaffId,
    /// スタッフがお知らせを確認済みかどうか
    pub is_reflected:   bool,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,
}
