//! # ChatMessageRepository
//!
//! チャットグループ内のメッセージを扱うリポジトリ。
//!
//! 送信者区分は `'agent'` / `'job_seeker'` の文字列で保存する。
//! 読み出し時に未知の値が入っていた場合は `InfraError::unexpected` を返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::chat::{ChatGroupId, ChatMessage, ChatMessageId, ChatUserType};
use sqlx::PgPool;

use crate::error::{InfraError, OptionalRowExt};

/// チャットメッセージリポジトリトレイト
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    async fn create(&self, message: &mut ChatMessage) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: ChatMessageId) -> Result<ChatMessage, InfraError>;

    /// グループのメッセージを送信日時の古い順で取得する
    async fn get_by_group_id(&self, group_id: ChatGroupId)
    -> Result<Vec<ChatMessage>, InfraError>;

    /// `since` より後に送信されたメッセージを取得する
    async fn get_by_group_id_since(
        &self,
        group_id: ChatGroupId,
        since: DateTime<Utc>,
    ) -> Result<Vec<ChatMessage>, InfraError>;

    /// スタッフが未読の求職者メッセージ数を数える
    ///
    /// グループの `last_watched_at` より後に求職者が送ったメッセージが対象。
    /// 一度も既読にしていなければ求職者のメッセージすべてを数える。
    async fn count_unwatched_by_group_id(&self, group_id: ChatGroupId) -> Result<i64, InfraError>;

    async fn delete(&self, id: ChatMessageId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の ChatMessageRepository
#[derive(Debug, Clone)]
pub struct PostgresChatMessageRepository {
    pool: PgPool,
}

impl PostgresChatMessageRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_CHAT_MESSAGE: &str = r#"
    SELECT
        id, group_id, user_type, message_type, message, photo_url,
        line_message_id, send_at, created_at, updated_at
    FROM chat_messages_with_job_seeker
"#;

#[derive(sqlx::FromRow)]
struct ChatMessageRow {
    id:              i64,
    group_id:        i64,
    user_type:       String,
    message_type:    i16,
    message:         String,
    photo_url:       String,
    line_message_id: Option<String>,
    send_at:         DateTime<Utc>,
    created_at:      DateTime<Utc>,
    updated_at:      DateTime<Utc>,
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = InfraError;

    fn try_from(row: ChatMessageRow) -> Result<Self, Self::Error> {
        let user_type: ChatUserType = row.user_type.parse().map_err(|e| {
            InfraError::unexpected(format!("chat_messages_with_job_seeker.user_type: {e}"))
        })?;

        Ok(Self {
            id: ChatMessageId::new(row.id),
            group_id: ChatGroupId::new(row.group_id),
            user_type,
            message_type: row.message_type,
            message: row.message,
            photo_url: row.photo_url,
            line_message_id: row.line_message_id,
            send_at: row.send_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_messages(rows: Vec<ChatMessageRow>) -> Result<Vec<ChatMessage>, InfraError> {
    rows.into_iter().map(ChatMessage::try_from).collect()
}

#[async_trait]
impl ChatMessageRepository for PostgresChatMessageRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.create", fields(group_id = %message.group_id))]
    async fn create(&self, message: &mut ChatMessage) -> Result<(), InfraError> {
        let now = Utc::now();
        let user_type: &'static str = message.user_type.into();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chat_messages_with_job_seeker (
                group_id, user_type, message_type, message, photo_url,
                line_message_id, send_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(message.group_id.as_i64())
        .bind(user_type)
        .bind(message.message_type)
        .bind(&message.message)
        .bind(&message.photo_url)
        .bind(message.line_message_id.as_deref())
        .bind(message.send_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        message.id = ChatMessageId::new(id);
        message.created_at = now;
        message.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: ChatMessageId) -> Result<ChatMessage, InfraError> {
        let row: Option<ChatMessageRow> =
            sqlx::query_as(&format!("{SELECT_CHAT_MESSAGE} WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.or_not_found("ChatMessage", id)
            .and_then(ChatMessage::try_from)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.get_by_group_id", fields(%group_id))]
    async fn get_by_group_id(
        &self,
        group_id: ChatGroupId,
    ) -> Result<Vec<ChatMessage>, InfraError> {
        let rows: Vec<ChatMessageRow> = sqlx::query_as(&format!(
            "{SELECT_CHAT_MESSAGE} WHERE group_id = $1 ORDER BY send_at ASC, id ASC"
        ))
        .bind(group_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.get_by_group_id_since", fields(%group_id, %since))]
    async fn get_by_group_id_since(
        &self,
        group_id: ChatGroupId,
        since: DateTime<Utc>,
    ) -> Result<Vec<ChatMessage>, InfraError> {
        let rows: Vec<ChatMessageRow> = sqlx::query_as(&format!(
            "{SELECT_CHAT_MESSAGE} WHERE group_id = $1 AND send_at > $2 ORDER BY send_at ASC, id ASC"
        ))
        .bind(group_id.as_i64())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.count_unwatched_by_group_id", fields(%group_id))]
    async fn count_unwatched_by_group_id(&self, group_id: ChatGroupId) -> Result<i64, InfraError> {
        let job_seeker: &'static str = ChatUserType::JobSeeker.into();

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM chat_messages_with_job_seeker cm
            INNER JOIN chat_groups_with_job_seeker cg ON cg.id = cm.group_id
            WHERE cm.group_id = $1
              AND cm.user_type = $2
              AND (cg.last_watched_at IS NULL OR cm.send_at > cg.last_watched_at)
            "#,
        )
        .bind(group_id.as_i64())
        .bind(job_seeker)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatMessageRepository.delete", fields(%id))]
    async fn delete(&self, id: ChatMessageId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM chat_messages_with_job_seeker WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(user_type: &str) -> ChatMessageRow {
        let now = Utc::now();
        ChatMessageRow {
            id: 1,
            group_id: 2,
            user_type: user_type.to_string(),
            message_type: 0,
            message: "こんにちは".to_string(),
            photo_url: String::new(),
            line_message_id: None,
            send_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_送信者区分の文字列をドメイン型に変換できる() {
        let message = ChatMessage::try_from(row("job_seeker")).unwrap();

        assert_eq!(message.user_type, ChatUserType::JobSeeker);
        assert_eq!(message.group_id, ChatGroupId::new(2));
    }

    #[test]
    fn test_未知の送信者区分はunexpectedエラーになる() {
        let err = ChatMessage::try_from(row("bot")).unwrap_err();

        assert!(!err.is_not_found());
        assert!(err.to_string().contains("user_type"));
    }

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresChatMessageRepository>();
    }
}
