//! # 面談
//!
//! 求職者との初回面談の調整と実施状況を管理する。
//! 面談タスクグループは求職者ごとに 1 つ作られ、面談タスクが進捗を積み上げる。
//!
//! 月単位の集計（面談設定数・面談実施数）は KPI としてダッシュボードに表示される。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    agent::{AgentId, AgentStaffId},
    job_seeker::JobSeekerId,
};

define_serial_id! {
    /// 面談タスクグループ ID
    pub struct InterviewTaskGroupId;
}

define_serial_id! {
    /// 面談タスク ID
    pub struct InterviewTaskId;
}

/// 面談タスクのフェーズ区分値
pub mod interview_phase {
    /// 日程調整中
    pub const SCHEDULING: i16 = 0;
    /// 面談実施済み
    pub const INTERVIEWED: i16 = 1;
    /// キャンセル
    pub const CANCELED: i16 = 2;
    /// 無断欠席
    pub const NO_SHOW: i16 = 3;
}

/// 面談タスクグループ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterviewTaskGroup {
    pub id:             InterviewTaskGroupId,
    pub uuid:           Uuid,
    pub agent_id:       AgentId,
    pub job_seeker_id:  JobSeekerId,
    /// 面談日時
    pub interview_date: Option<DateTime<Utc>>,
    pub created_at:     DateTime<Utc>,
    pub updated_at:     DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub job_seeker_last_name:  String,
    pub job_seeker_first_name: String,
    pub ca_staff_id:           AgentStaffId,
}

/// 面談タスク
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterviewTask {
    pub id:                      InterviewTaskId,
    pub uuid:                    Uuid,
    pub interview_task_group_id: InterviewTaskGroupId,
    pub phase_category:          i16,
    pub remarks:                 String,
    pub created_at:              DateTime<Utc>,
    pub updated_at:              DateTime<Utc>,
}

/// 面談 KPI（期間内の求職者数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterviewKpi {
    /// 面談日が期間内にある求職者数
    pub interview_count:   i64,
    /// そのうち面談実施済みのタスクを持つ求職者数
    pub interviewed_count: i64,
}

impl InterviewKpi {
    /// 面談実施率（%）。面談設定がなければ `None`
    pub fn interviewed_rate(&self) -> Option<f64> {
        if self.interview_count == 0 {
            return None;
        }
        Some(self.interviewed_count as f64 * 100.0 / self.interview_count as f64)
    }
}

/// CA スタッフ別の面談 KPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffInterviewKpi {
    pub ca_staff_id: AgentStaffId,
    pub kpi:         InterviewKpi,
}
