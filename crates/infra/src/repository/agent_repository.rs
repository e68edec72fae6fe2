//! # AgentRepository
//!
//! エージェント（人材紹介会社）の永続化を担当するリポジトリ。
//!
//! 利用開始日・利用終了日は JST の暦日として `DATE` 型で保存する。
//! 呼び出し側は `recruitlink_domain::time::today_in_jst` で業務日付を求めてから渡す。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::agent::{Agent, AgentId, AgentPatch};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::PatchUpdate,
};

/// エージェントリポジトリトレイト
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// エージェントを作成し、採番された ID・UUID・作成日時を `agent` に書き戻す
    async fn create(&self, agent: &mut Agent) -> Result<(), InfraError>;

    /// ID でエージェントを取得する
    async fn find_by_id(&self, id: AgentId) -> Result<Agent, InfraError>;

    /// UUID でエージェントを取得する
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Agent, InfraError>;

    /// 全エージェントを ID 順で取得する
    async fn get_all(&self) -> Result<Vec<Agent>, InfraError>;

    /// 複数 ID でエージェントを取得する
    async fn get_by_id_list(&self, ids: &[AgentId]) -> Result<Vec<Agent>, InfraError>;

    /// 指定されたフィールドだけを更新する
    async fn update(&self, id: AgentId, patch: &AgentPatch) -> Result<(), InfraError>;

    /// 利用開始日を更新する
    async fn update_usage_start(&self, id: AgentId, date: NaiveDate) -> Result<(), InfraError>;

    /// 利用終了日を更新する
    async fn update_usage_end(&self, id: AgentId, date: NaiveDate) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の AgentRepository
#[derive(Debug, Clone)]
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_AGENT: &str = r#"
    SELECT
        id,
        uuid,
        agent_name,
        agent_name_furigana,
        office_location,
        representative,
        corporate_site_url,
        usage_status,
        usage_start_date,
        usage_end_date,
        created_at,
        updated_at
    FROM agents
"#;

#[derive(sqlx::FromRow)]
struct AgentRow {
    id:                  i64,
    uuid:                Uuid,
    agent_name:          String,
    agent_name_furigana: String,
    office_location:     String,
    representative:      String,
    corporate_site_url:  String,
    usage_status:        i16,
    usage_start_date:    Option<NaiveDate>,
    usage_end_date:      Option<NaiveDate>,
    created_at:          DateTime<Utc>,
    updated_at:          DateTime<Utc>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        Self {
            id:                  AgentId::new(row.id),
            uuid:                row.uuid,
            agent_name:          row.agent_name,
            agent_name_furigana: row.agent_name_furigana,
            office_location:     row.office_location,
            representative:      row.representative,
            corporate_site_url:  row.corporate_site_url,
            usage_status:        row.usage_status,
            usage_start_date:    row.usage_start_date,
            usage_end_date:      row.usage_end_date,
            created_at:          row.created_at,
            updated_at:          row.updated_at,
        }
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.create")]
    async fn create(&self, agent: &mut Agent) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO agents (
                uuid, agent_name, agent_name_furigana, office_location, representative,
                corporate_site_url, usage_status, usage_start_date, usage_end_date,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(&agent.agent_name)
        .bind(&agent.agent_name_furigana)
        .bind(&agent.office_location)
        .bind(&agent.representative)
        .bind(&agent.corporate_site_url)
        .bind(agent.usage_status)
        .bind(agent.usage_start_date)
        .bind(agent.usage_end_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        agent.id = AgentId::new(id);
        agent.uuid = uuid;
        agent.created_at = now;
        agent.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: AgentId) -> Result<Agent, InfraError> {
        let row: Option<AgentRow> = sqlx::query_as(&format!("{SELECT_AGENT} WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Agent::from).or_not_found("Agent", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.find_by_uuid", fields(%uuid))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Agent, InfraError> {
        let row: Option<AgentRow> = sqlx::query_as(&format!("{SELECT_AGENT} WHERE uuid = $1"))
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Agent::from).or_not_found("Agent", uuid)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.get_all")]
    async fn get_all(&self) -> Result<Vec<Agent>, InfraError> {
        let rows: Vec<AgentRow> = sqlx::query_as(&format!("{SELECT_AGENT} ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Agent::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(&self, ids: &[AgentId]) -> Result<Vec<Agent>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<AgentRow> =
            sqlx::query_as(&format!("{SELECT_AGENT} WHERE id = ANY($1) ORDER BY id ASC"))
                .bind(AgentId::to_i64_vec(ids))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Agent::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.update", fields(%id))]
    async fn update(&self, id: AgentId, patch: &AgentPatch) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("agents", Utc::now());
        update
            .set("agent_name", patch.agent_name.clone())
            .set("agent_name_furigana", patch.agent_name_furigana.clone())
            .set("office_location", patch.office_location.clone())
            .set("representative", patch.representative.clone())
            .set("corporate_site_url", patch.corporate_site_url.clone())
            .set("usage_status", patch.usage_status);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.update_usage_start", fields(%id, %date))]
    async fn update_usage_start(&self, id: AgentId, date: NaiveDate) -> Result<(), InfraError> {
        sqlx::query("UPDATE agents SET usage_start_date = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(date)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentRepository.update_usage_end", fields(%id, %date))]
    async fn update_usage_end(&self, id: AgentId, date: NaiveDate) -> Result<(), InfraError> {
        sqlx::query("UPDATE agents SET usage_end_date = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(date)
            .bind(Utc::now())
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
        assert_send_sync::<PostgresAgentRepository>();
        assert_send_sync::<Box<dyn AgentRepository>>();
    }
}
