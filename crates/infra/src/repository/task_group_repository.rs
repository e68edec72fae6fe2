//! # TaskGroupRepository
//!
//! 求職者 × 求人の選考（タスクグループ）を扱うリポジトリ。
//! 取得系は求職者名・求人タイトル・企業名を JOIN して返す。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::AgentId,
    job_information::JobInformationId,
    job_seeker::JobSeekerId,
    task::{TaskGroup, TaskGroupId},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{InfraError, OptionalRowExt};

/// タスクグループリポジトリトレイト
#[async_trait]
pub trait TaskGroupRepository: Send + Sync {
    async fn create(&self, task_group: &mut TaskGroup) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: TaskGroupId) -> Result<TaskGroup, InfraError>;

    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<TaskGroup>, InfraError>;

    async fn get_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<Vec<TaskGroup>, InfraError>;

    /// エージェントの求職者に紐づくタスクグループを取得する
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<TaskGroup>, InfraError>;

    async fn get_by_id_list(&self, ids: &[TaskGroupId]) -> Result<Vec<TaskGroup>, InfraError>;

    /// 入社日を更新する
    async fn update_joining_date(
        &self,
        id: TaskGroupId,
        joining_date: Option<NaiveDate>,
    ) -> Result<(), InfraError>;

    /// 企業への最終依頼日時を更新する
    async fn update_last_request_at(
        &self,
        id: TaskGroupId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError>;

    /// タスクグループを削除する（タスクは CASCADE で削除される）
    async fn delete(&self, id: TaskGroupId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の TaskGroupRepository
#[derive(Debug, Clone)]
pub struct PostgresTaskGroupRepository {
    pool: PgPool,
}

impl PostgresTaskGroupRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_TASK_GROUP: &str = r#"
    SELECT
        tg.id,
        tg.uuid,
        tg.job_seeker_id,
        tg.job_information_id,
        tg.joining_date,
        tg.last_request_at,
        tg.created_at,
        tg.updated_at,
        js.last_name AS job_seeker_last_name,
        js.first_name AS job_seeker_first_name,
        ji.title AS job_information_title,
        COALESCE(b.company_name, '') AS company_name
    FROM task_groups tg
    INNER JOIN job_seekers js ON js.id = tg.job_seeker_id
    INNER JOIN job_informations ji ON ji.id = tg.job_information_id
    LEFT JOIN billing_addresses b ON b.id = ji.billing_address_id
"#;

#[derive(sqlx::FromRow)]
struct TaskGroupRow {
    id:                    i64,
    uuid:                  Uuid,
    job_seeker_id:         i64,
    job_information_id:    i64,
    joining_date:          Option<NaiveDate>,
    last_request_at:       Option<DateTime<Utc>>,
    created_at:            DateTime<Utc>,
    updated_at:            DateTime<Utc>,
    job_seeker_last_name:  String,
    job_seeker_first_name: String,
    job_information_title: String,
    company_name:          String,
}

impl From<TaskGroupRow> for TaskGroup {
    fn from(row: TaskGroupRow) -> Self {
        Self {
            id:                    TaskGroupId::new(row.id),
            uuid:                  row.uuid,
            job_seeker_id:         JobSeekerId::new(row.job_seeker_id),
            job_information_id:    JobInformationId::new(row.job_information_id),
            joining_date:          row.joining_date,
            last_request_at:       row.last_request_at,
            created_at:            row.created_at,
            updated_at:            row.updated_at,
            job_seeker_last_name:  row.job_seeker_last_name,
            job_seeker_first_name: row.job_seeker_first_name,
            job_information_title: row.job_information_title,
            company_name:          row.company_name,
        }
    }
}

#[async_trait]
impl TaskGroupRepository for PostgresTaskGroupRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.create", fields(job_seeker_id = %task_group.job_seeker_id, job_information_id = %task_group.job_information_id))]
    async fn create(&self, task_group: &mut TaskGroup) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO task_groups (
                uuid, job_seeker_id, job_information_id, joining_date, last_request_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(task_group.job_seeker_id.as_i64())
        .bind(task_group.job_information_id.as_i64())
        .bind(task_group.joining_date)
        .bind(task_group.last_request_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        task_group.id = TaskGroupId::new(id);
        task_group.uuid = uuid;
        task_group.created_at = now;
        task_group.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: TaskGroupId) -> Result<TaskGroup, InfraError> {
        let row: Option<TaskGroupRow> =
            sqlx::query_as(&format!("{SELECT_TASK_GROUP} WHERE tg.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TaskGroup::from).or_not_found("TaskGroup", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.get_by_job_seeker_id", fields(%job_seeker_id))]
    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<TaskGroup>, InfraError> {
        let rows: Vec<TaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_TASK_GROUP} WHERE tg.job_seeker_id = $1 ORDER BY tg.id DESC"
        ))
        .bind(job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TaskGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.get_by_job_information_id", fields(%job_information_id))]
    async fn get_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<Vec<TaskGroup>, InfraError> {
        let rows: Vec<TaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_TASK_GROUP} WHERE tg.job_information_id = $1 ORDER BY tg.id DESC"
        ))
        .bind(job_information_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TaskGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<TaskGroup>, InfraError> {
        let rows: Vec<TaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_TASK_GROUP} WHERE js.agent_id = $1 ORDER BY tg.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TaskGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(&self, ids: &[TaskGroupId]) -> Result<Vec<TaskGroup>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<TaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_TASK_GROUP} WHERE tg.id = ANY($1) ORDER BY tg.id ASC"
        ))
        .bind(TaskGroupId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TaskGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.update_joining_date", fields(%id))]
    async fn update_joining_date(
        &self,
        id: TaskGroupId,
        joining_date: Option<NaiveDate>,
    ) -> Result<(), InfraError> {
        sqlx::query("UPDATE task_groups SET joining_date = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(joining_date)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.update_last_request_at", fields(%id))]
    async fn update_last_request_at(
        &self,
        id: TaskGroupId,
        at: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        sqlx::query("UPDATE task_groups SET last_request_at = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(at)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskGroupRepository.delete", fields(%id))]
    async fn delete(&self, id: TaskGroupId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM task_groups WHERE id = $1")
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
        assert_send_sync::<PostgresTaskGroupRepository>();
    }
}
