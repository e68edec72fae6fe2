//! # AgentStaffRepository
//!
//! エージェントに所属するスタッフ（RA / CA）の永続化を担当するリポジトリ。
//! 取得系は所属エージェント名を JOIN して返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::agent::{AgentId, AgentStaff, AgentStaffId, AgentStaffPatch};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::PatchUpdate,
};

/// スタッフリポジトリトレイト
#[async_trait]
pub trait AgentStaffRepository: Send + Sync {
    /// スタッフを作成し、採番された ID・UUID・作成日時を `staff` に書き戻す
    async fn create(&self, staff: &mut AgentStaff) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: AgentStaffId) -> Result<AgentStaff, InfraError>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<AgentStaff, InfraError>;

    /// メールアドレスでスタッフを取得する（ログイン時の照合用）
    async fn find_by_email(&self, email: &str) -> Result<AgentStaff, InfraError>;

    /// エージェントに所属するスタッフを取得する
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<AgentStaff>, InfraError>;

    async fn get_by_id_list(&self, ids: &[AgentStaffId]) -> Result<Vec<AgentStaff>, InfraError>;

    /// 指定されたフィールドだけを更新する
    async fn update(&self, id: AgentStaffId, patch: &AgentStaffPatch) -> Result<(), InfraError>;

    /// 最終ログイン日時を記録する
    async fn update_last_login(
        &self,
        id: AgentStaffId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError>;

    async fn delete(&self, id: AgentStaffId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の AgentStaffRepository
#[derive(Debug, Clone)]
pub struct PostgresAgentStaffRepository {
    pool: PgPool,
}

impl PostgresAgentStaffRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_AGENT_STAFF: &str = r#"
    SELECT
        s.id,
        s.uuid,
        s.agent_id,
        s.staff_name,
        s.furigana,
        s.email,
        s.phone_number,
        s.authority,
        s.usage_status,
        s.last_login_at,
        s.created_at,
        s.updated_at,
        a.agent_name
    FROM agent_staffs s
    INNER JOIN agents a ON a.id = s.agent_id
"#;

#[derive(sqlx::FromRow)]
struct AgentStaffRow {
    id:            i64,
    uuid:          Uuid,
    agent_id:      i64,
    staff_name:    String,
    furigana:      String,
    email:         String,
    phone_number:  String,
    authority:     i16,
    usage_status:  i16,
    last_login_at: Option<DateTime<Utc>>,
    created_at:    DateTime<Utc>,
    updated_at:    DateTime<Utc>,
    agent_name:    String,
}

impl From<AgentStaffRow> for AgentStaff {
    fn from(row: AgentStaffRow) -> Self {
        Self {
            id:            AgentStaffId::new(row.id),
            uuid:          row.uuid,
            agent_id:      AgentId::new(row.agent_id),
            staff_name:    row.staff_name,
            furigana:      row.furigana,
            email:         row.email,
            phone_number:  row.phone_number,
            authority:     row.authority,
            usage_status:  row.usage_status,
            last_login_at: row.last_login_at,
            created_at:    row.created_at,
            updated_at:    row.updated_at,
            agent_name:    row.agent_name,
        }
    }
}

#[async_trait]
impl AgentStaffRepository for PostgresAgentStaffRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.create", fields(agent_id = %staff.agent_id))]
    async fn create(&self, staff: &mut AgentStaff) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO agent_staffs (
                uuid, agent_id, staff_name, furigana, email, phone_number,
                authority, usage_status, last_login_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(staff.agent_id.as_i64())
        .bind(&staff.staff_name)
        .bind(&staff.furigana)
        .bind(&staff.email)
        .bind(&staff.phone_number)
        .bind(staff.authority)
        .bind(staff.usage_status)
        .bind(staff.last_login_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        staff.id = AgentStaffId::new(id);
        staff.uuid = uuid;
        staff.created_at = now;
        staff.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: AgentStaffId) -> Result<AgentStaff, InfraError> {
        let row: Option<AgentStaffRow> =
            sqlx::query_as(&format!("{SELECT_AGENT_STAFF} WHERE s.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(AgentStaff::from).or_not_found("AgentStaff", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.find_by_uuid", fields(%uuid))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<AgentStaff, InfraError> {
        let row: Option<AgentStaffRow> =
            sqlx::query_as(&format!("{SELECT_AGENT_STAFF} WHERE s.uuid = $1"))
                .bind(uuid)
                .fetch_optional(&self.pool)
                .await?;

        row.map(AgentStaff::from).or_not_found("AgentStaff", uuid)
    }

    // メールアドレスは個人情報のためスパンに記録しない
    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.find_by_email")]
    async fn find_by_email(&self, email: &str) -> Result<AgentStaff, InfraError> {
        let row: Option<AgentStaffRow> =
            sqlx::query_as(&format!("{SELECT_AGENT_STAFF} WHERE s.email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(AgentStaff::from).or_not_found("AgentStaff", "email")
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<AgentStaff>, InfraError> {
        let rows: Vec<AgentStaffRow> = sqlx::query_as(&format!(
            "{SELECT_AGENT_STAFF} WHERE s.agent_id = $1 ORDER BY s.id ASC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AgentStaff::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(&self, ids: &[AgentStaffId]) -> Result<Vec<AgentStaff>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<AgentStaffRow> = sqlx::query_as(&format!(
            "{SELECT_AGENT_STAFF} WHERE s.id = ANY($1) ORDER BY s.id ASC"
        ))
        .bind(AgentStaffId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AgentStaff::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.update", fields(%id))]
    async fn update(&self, id: AgentStaffId, patch: &AgentStaffPatch) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("agent_staffs", Utc::now());
        update
            .set("staff_name", patch.staff_name.clone())
            .set("furigana", patch.furigana.clone())
            .set("email", patch.email.clone())
            .set("phone_number", patch.phone_number.clone())
            .set("authority", patch.authority)
            .set("usage_status", patch.usage_status);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.update_last_login", fields(%id))]
    async fn update_last_login(
        &self,
        id: AgentStaffId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        sqlx::query("UPDATE agent_staffs SET last_login_at = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(at)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "AgentStaffRepository.delete", fields(%id))]
    async fn delete(&self, id: AgentStaffId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM agent_staffs WHERE id = $1")
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
        assert_send_sync::<PostgresAgentStaffRepository>();
    }
}
