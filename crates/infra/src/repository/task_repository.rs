//! # TaskRepository
//!
//! 選考の各ステップ（タスク）を扱うリポジトリ。
//! タスクは追記のみで、タスクグループの現在のフェーズは最新（ID 最大）のタスクで表す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::task::{Task, TaskGroupId, TaskId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{InfraError, OptionalRowExt};

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &mut Task) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: TaskId) -> Result<Task, InfraError>;

    /// タスクグループの最新タスクを取得する
    async fn find_latest_by_task_group_id(
        &self,
        task_group_id: TaskGroupId,
    ) -> Result<Task, InfraError>;

    /// タスクグループのタスクを古い順で取得する
    async fn get_by_task_group_id(
        &self,
        task_group_id: TaskGroupId,
    ) -> Result<Vec<Task>, InfraError>;

    /// 各タスクグループの最新タスクを 1 件ずつ取得する
    async fn get_latest_by_task_group_id_list(
        &self,
        task_group_ids: &[TaskGroupId],
    ) -> Result<Vec<Task>, InfraError>;

    async fn delete(&self, id: TaskId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の TaskRepository
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str = r#"
    id, uuid, task_group_id, phase_category, phase_sub_category, executor_type,
    remarks, deadline_at, created_at, updated_at
"#;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id:                 i64,
    uuid:               Uuid,
    task_group_id:      i64,
    phase_category:     i16,
    phase_sub_category: i16,
    executor_type:      i16,
    remarks:            String,
    deadline_at:        Option<DateTime<Utc>>,
    created_at:         DateTime<Utc>,
    updated_at:         DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id:                 TaskId::new(row.id),
            uuid:               row.uuid,
            task_group_id:      TaskGroupId::new(row.task_group_id),
            phase_category:     row.phase_category,
            phase_sub_category: row.phase_sub_category,
            executor_type:      row.executor_type,
            remarks:            row.remarks,
            deadline_at:        row.deadline_at,
            created_at:         row.created_at,
            updated_at:         row.updated_at,
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.create", fields(task_group_id = %task.task_group_id))]
    async fn create(&self, task: &mut Task) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (
                uuid, task_group_id, phase_category, phase_sub_category, executor_type,
                remarks, deadline_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(task.task_group_id.as_i64())
        .bind(task.phase_category)
        .bind(task.phase_sub_category)
        .bind(task.executor_type)
        .bind(&task.remarks)
        .bind(task.deadline_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        task.id = TaskId::new(id);
        task.uuid = uuid;
        task.created_at = now;
        task.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: TaskId) -> Result<Task, InfraError> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Task::from).or_not_found("Task", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.find_latest_by_task_group_id", fields(%task_group_id))]
    async fn find_latest_by_task_group_id(
        &self,
        task_group_id: TaskGroupId,
    ) -> Result<Task, InfraError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_group_id = $1 ORDER BY id DESC LIMIT 1"
        ))
        .bind(task_group_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from)
            .or_not_found("Task", format!("task_group_id={task_group_id}"))
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.get_by_task_group_id", fields(%task_group_id))]
    async fn get_by_task_group_id(
        &self,
        task_group_id: TaskGroupId,
    ) -> Result<Vec<Task>, InfraError> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE task_group_id = $1 ORDER BY id ASC"
        ))
        .bind(task_group_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.get_latest_by_task_group_id_list", fields(count = task_group_ids.len()))]
    async fn get_latest_by_task_group_id_list(
        &self,
        task_group_ids: &[TaskGroupId],
    ) -> Result<Vec<Task>, InfraError> {
        if task_group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            r#"
            SELECT DISTINCT ON (task_group_id) {TASK_COLUMNS}
            FROM tasks
            WHERE task_group_id = ANY($1)
            ORDER BY task_group_id ASC, id DESC
            "#
        ))
        .bind(TaskGroupId::to_i64_vec(task_group_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "TaskRepository.delete", fields(%id))]
    async fn delete(&self, id: TaskId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
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
        assert_send_sync::<PostgresTaskRepository>();
    }
}
