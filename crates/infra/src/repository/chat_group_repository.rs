//! # ChatGroupRepository
//!
//! 求職者との LINE 連携チャットグループを扱うリポジトリ。
//! 求職者 1 人につきグループは 1 つ（`job_seeker_id` は UNIQUE）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::{
    agent::AgentId,
    chat::{ChatGroup, ChatGroupId},
    job_seeker::JobSeekerId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{InfraError, OptionalRowExt};

/// チャットグループリポジトリトレイト
#[async_trait]
pub trait ChatGroupRepository: Send + Sync {
    async fn create(&self, group: &mut ChatGroup) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: ChatGroupId) -> Result<ChatGroup, InfraError>;

    async fn find_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<ChatGroup, InfraError>;

    /// LINE のユーザー ID でグループを検索する
    async fn find_by_line_user_id(&self, line_user_id: &str) -> Result<ChatGroup, InfraError>;

    /// エージェントのグループを最終送信日時の新しい順で取得する
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<ChatGroup>, InfraError>;

    async fn update_line_active(&self, id: ChatGroupId, active: bool) -> Result<(), InfraError>;

    async fn update_last_watched_at(
        &self,
        id: ChatGroupId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError>;

    async fn delete(&self, id: ChatGroupId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の ChatGroupRepository
#[derive(Debug, Clone)]
pub struct PostgresChatGroupRepository {
    pool: PgPool,
}

impl PostgresChatGroupRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_CHAT_GROUP: &str = r#"
    SELECT
        cg.id,
        cg.uuid,
        cg.agent_id,
        cg.job_seeker_id,
        cg.line_user_id,
        cg.line_active,
        cg.last_send_at,
        cg.last_watched_at,
        cg.created_at,
        cg.updated_at,
        js.last_name AS job_seeker_last_name,
        js.first_name AS job_seeker_first_name
    FROM chat_groups_with_job_seeker cg
    INNER JOIN job_seekers js ON js.id = cg.job_seeker_id
"#;

#[derive(sqlx::FromRow)]
struct ChatGroupRow {
    id:                    i64,
    uuid:                  Uuid,
    agent_id:              i64,
    job_seeker_id:         i64,
    line_user_id:          Option<String>,
    line_active:           bool,
    last_send_at:          Option<DateTime<Utc>>,
    last_watched_at:       Option<DateTime<Utc>>,
    created_at:            DateTime<Utc>,
    updated_at:            DateTime<Utc>,
    job_seeker_last_name:  String,
    job_seeker_first_name: String,
}

impl From<ChatGroupRow> for ChatGroup {
    fn from(row: ChatGroupRow) -> Self {
        Self {
            id:                    ChatGroupId::new(row.id),
            uuid:                  row.uuid,
            agent_id:              AgentId::new(row.agent_id),
            job_seeker_id:         JobSeekerId::new(row.job_seeker_id),
            line_user_id:          row.line_user_id,
            line_active:           row.line_active,
            last_send_at:          row.last_send_at,
            last_watched_at:       row.last_watched_at,
            created_at:            row.created_at,
            updated_at:            row.updated_at,
            job_seeker_last_name:  row.job_seeker_last_name,
            job_seeker_first_name: row.job_seeker_first_name,
        }
    }
}

#[async_trait]
impl ChatGroupRepository for PostgresChatGroupRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.create", fields(job_seeker_id = %group.job_seeker_id))]
    async fn create(&self, group: &mut ChatGroup) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chat_groups_with_job_seeker (
                uuid, agent_id, job_seeker_id, line_user_id, line_active,
                last_send_at, last_watched_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(group.agent_id.as_i64())
        .bind(group.job_seeker_id.as_i64())
        .bind(group.line_user_id.as_deref())
        .bind(group.line_active)
        .bind(group.last_send_at)
        .bind(group.last_watched_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        group.id = ChatGroupId::new(id);
        group.uuid = uuid;
        group.created_at = now;
        group.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: ChatGroupId) -> Result<ChatGroup, InfraError> {
        let row: Option<ChatGroupRow> =
            sqlx::query_as(&format!("{SELECT_CHAT_GROUP} WHERE cg.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(ChatGroup::from).or_not_found("ChatGroup", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.find_by_job_seeker_id", fields(%job_seeker_id))]
    async fn find_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<ChatGroup, InfraError> {
        let row: Option<ChatGroupRow> =
            sqlx::query_as(&format!("{SELECT_CHAT_GROUP} WHERE cg.job_seeker_id = $1"))
                .bind(job_seeker_id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(ChatGroup::from)
            .or_not_found("ChatGroup", format!("job_seeker_id={job_seeker_id}"))
    }

    // LINE のユーザー ID は個人を特定しうるためスパンに載せない
    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.find_by_line_user_id")]
    async fn find_by_line_user_id(&self, line_user_id: &str) -> Result<ChatGroup, InfraError> {
        let row: Option<ChatGroupRow> =
            sqlx::query_as(&format!("{SELECT_CHAT_GROUP} WHERE cg.line_user_id = $1"))
                .bind(line_user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(ChatGroup::from)
            .or_not_found("ChatGroup", "line_user_id")
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<ChatGroup>, InfraError> {
        let rows: Vec<ChatGroupRow> = sqlx::query_as(&format!(
            "{SELECT_CHAT_GROUP} WHERE cg.agent_id = $1 ORDER BY cg.last_send_at DESC NULLS LAST, cg.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChatGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.update_line_active", fields(%id, active))]
    async fn update_line_active(&self, id: ChatGroupId, active: bool) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE chat_groups_with_job_seeker SET line_active = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.update_last_watched_at", fields(%id))]
    async fn update_last_watched_at(
        &self,
        id: ChatGroupId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE chat_groups_with_job_seeker SET last_watched_at = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "ChatGroupRepository.delete", fields(%id))]
    async fn delete(&self, id: ChatGroupId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM chat_groups_with_job_seeker WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresChatGroupRepository>();
    }
}
