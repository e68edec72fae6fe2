//! # チャット
//!
//! 求職者との LINE 連携チャット。チャットグループは求職者ごとに 1 つで、
//! メッセージは送信者区分（エージェント / 求職者）付きで保存される。
//! LINE Webhook の受信や配信はこの層の責務外。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use uuid::Uuid;

use crate::{DomainError, agent::AgentId, job_seeker::JobSeekerId};

define_serial_id! {
    /// チャットグループ ID
    pub struct ChatGroupId;
}

define_serial_id! {
    /// チャットメッセージ ID
    pub struct ChatMessageId;
}

/// メッセージ送信者の区分
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatUserType {
    /// エージェントのスタッフ
    #[default]
    Agent,
    /// 求職者
    JobSeeker,
}

impl std::str::FromStr for ChatUserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(Self::Agent),
            "job_seeker" => Ok(Self::JobSeeker),
            _ => Err(DomainError::Validation(format!("不正な送信者区分: {}", s))),
        }
    }
}

/// メッセージ種別の区分値
pub mod message_type {
    pub const TEXT: i16 = 0;
    pub const IMAGE: i16 = 1;
    pub const FILE: i16 = 2;
}

/// 求職者とのチャットグループ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatGroup {
    pub id:              ChatGroupId,
    pub uuid:            Uuid,
    pub agent_id:        AgentId,
    pub job_seeker_id:   JobSeekerId,
    pub line_user_id:    Option<String>,
    /// LINE 連携が有効かどうか（ブロックされると false）
    pub line_active:     bool,
    pub last_send_at:    Option<DateTime<Utc>>,
    /// スタッフが最後に既読にした日時
    pub last_watched_at: Option<DateTime<Utc>>,
    pub created_at:      DateTime<Utc>,
    pub updated_at:      DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub job_seeker_last_name:  String,
    pub job_seeker_first_name: String,
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id:              ChatMessageId,
    pub group_id:        ChatGroupId,
    pub user_type:       ChatUserType,
    pub message_type:    i16,
    pub message:         String,
    pub photo_url:       String,
    pub line_message_id: Option<String>,
    pub send_at:         DateTime<Utc>,
    pub created_at:      DateTime<Utc>,
    pub updated_at:      DateTime<Utc>,
}
