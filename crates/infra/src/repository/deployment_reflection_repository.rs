//! # DeploymentReflectionRepository
//!
//! リリースのお知らせをスタッフが確認したかを記録するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::{
    agent::AgentStaffId,
    deployment::{DeploymentReflection, DeploymentReflectionId},
};
use sqlx::PgPool;

use crate::error::InfraError;

/// リリース反映状況リポジトリトレイト
#[async_trait]
pub trait DeploymentReflectionRepository: Send + Sync {
    /// リリースに対してスタッフ分の未確認行をまとめて作成する
    ///
    /// 空のスタッフ一覧では何もしない。既に行があるスタッフは無視する。
    async fn create_multi(
        &self,
        deployment_id: i64,
        agent_staff_ids: &[AgentStaffId],
    ) -> Result<(), InfraError>;

    async fn get_by_agent_staff_id(
        &self,
        agent_staff_id: AgentStaffId,
    ) -> Result<Vec<DeploymentReflection>, InfraError>;

    /// 確認済みにする
    async fn update_is_reflected(&self, id: DeploymentReflectionId) -> Result<(), InfraError>;

    async fn delete_by_deployment_id(&self, deployment_id: i64) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の DeploymentReflectionRepository
#[derive(Debug, Clone)]
pub struct PostgresDeploymentReflectionRepository {
    pool: PgPool,
}

impl PostgresDeploymentReflectionRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DeploymentReflectionRow {
    id:             i64,
    deployment_id:  i64,
    agent_staff_id: i64,
    is_reflected:   bool,
    created_at:     DateTime<Utc>,
    updated_at:     DateTime<Utc>,
}

impl From<DeploymentReflectionRow> for DeploymentReflection {
    fn from(row: DeploymentReflectionRow) -> Self {
        Self {
            id:             DeploymentReflectionId::new(row.id),
            deployment_id:  row.deployment_id,
            agent_staff_id: AgentStaffId::new(row.agent_staff_id),
            is_reflected:   row.is_reflected,
            created_at:     row.created_at,
            updated_at:     row.updated_at,
        }
    }
}

#[async_trait]
impl DeploymentReflectionRepository for PostgresDeploymentReflectionRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "DeploymentReflectionRepository.create_multi", fields(deployment_id, count = agent_staff_ids.len()))]
    async fn create_multi(
        &self,
        deployment_id: i64,
        agent_staff_ids: &[AgentStaffId],
    ) -> Result<(), InfraError> {
        if agent_staff_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO deployment_reflections (
                deployment_id, agent_staff_id, is_reflected, created_at, updated_at
            )
            SELECT $1, staff_id, FALSE, $3, $3
            FROM UNNEST($2::bigint[]) AS t(staff_id)
            ON CONFLICT (deployment_id, agent_staff_id) DO NOTHING
            "#,
        )
        .bind(deployment_id)
        .bind(AgentStaffId::to_i64_vec(agent_staff_ids))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "DeploymentReflectionRepository.get_by_agent_staff_id", fields(%agent_staff_id))]
    async fn get_by_agent_staff_id(
        &self,
        agent_staff_id: AgentStaffId,
    ) -> Result<Vec<DeploymentReflection>, InfraError> {
        let rows: Vec<DeploymentReflectionRow> = sqlx::query_as(
            r#"
            SELECT id, deployment_id, agent_staff_id, is_reflected, created_at, updated_at
            FROM deployment_reflections
            WHERE agent_staff_id = $1
            ORDER BY deployment_id DESC
            "#,
        )
        .bind(agent_staff_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DeploymentReflection::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "DeploymentReflectionRepository.update_is_reflected", fields(%id))]
    async fn update_is_reflected(&self, id: DeploymentReflectionId) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE deployment_reflections SET is_reflected = TRUE, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "DeploymentReflectionRepository.delete_by_deployment_id", fields(deployment_id))]
    async fn delete_by_deployment_id(&self, deployment_id: i64) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM deployment_reflections WHERE deployment_id = $1")
            .bind(deployment_id)
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
        assert_send_sync::<PostgresDeploymentReflectionRepository>();
    }
}
