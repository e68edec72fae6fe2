//! # 選考タスク
//!
//! 求職者と求人の組み合わせ（タスクグループ）ごとに、選考の各ステップを
//! タスクとして積み上げる。最新のタスクが現在のフェーズを表す。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{job_information::JobInformationId, job_seeker::JobSeekerId};

define_serial_id! {
    /// タスクグループ ID
    pub struct TaskGroupId;
}

define_serial_id! {
    /// タスク ID
    pub struct TaskId;
}

impl_id_list!(TaskGroupId);

/// タスクの実行者区分
pub mod executor_type {
    /// CA が対応する
    pub const CA: i16 = 0;
    /// RA が対応する
    pub const RA: i16 = 1;
}

/// タスクグループ（求職者 × 求人）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskGroup {
    pub id:                 TaskGroupId,
    pub uuid:               Uuid,
    pub job_seeker_id:      JobSeekerId,
    pub job_information_id: JobInformationId,
    /// 入社日
    pub joining_date:       Option<NaiveDate>,
    /// 最後に企業へ依頼を送った日時
    pub last_request_at:    Option<DateTime<Utc>>,
    pub created_at:         DateTime<Utc>,
    pub updated_at:         DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub job_seeker_last_name:  String,
    pub job_seeker_first_name: String,
    pub job_information_title: String,
    pub company_name:          String,
}

/// 選考タスク
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Task {
    pub id:                 TaskId,
    pub uuid:               Uuid,
    pub task_group_id:      TaskGroupId,
    pub phase_category:     i16,
    pub phase_sub_category: i16,
    pub executor_type:      i16,
    pub remarks:            String,
    pub deadline_at:        Option<DateTime<Utc>>,
    pub created_at:         DateTime<Utc>,
    pub updated_at:         DateTime<Utc>,
}
