//! # InterviewTaskRepository
//!
//! 面談の各ステップ（日程調整・実施・キャンセル等）を扱うリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::interview::{InterviewTask, InterviewTaskGroupId, InterviewTaskId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{InfraError, OptionalRowExt};

/// 面談タスクリポジトリトレイト
#[async_trait]
pub trait InterviewTaskRepository: Send + Sync {
    async fn create(&self, task: &mut InterviewTask) -> Result<(), InfraError>;

    /// 面談グループの最新タスクを取得する
    async fn find_latest_by_interview_task_group_id(
        &self,
        interview_task_group_id: InterviewTaskGroupId,
    ) -> Result<InterviewTask, InfraError>;

    async fn get_by_interview_task_group_id(
        &self,
        interview_task_group_id: InterviewTaskGroupId,
    ) -> Result<Vec<InterviewTask>, InfraError>;

    async fn delete(&self, id: InterviewTaskId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の InterviewTaskRepository
#[derive(Debug, Clone)]
pub struct PostgresInterviewTaskRepository {
    pool: PgPool,
}

impl PostgresInterviewTaskRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_INTERVIEW_TASK: &str = r#"
    SELECT id, uuid, interview_task_group_id, phase_category, remarks, created_at, updated_at
    FROM interview_tasks
"#;

#[derive(sqlx::FromRow)]
struct InterviewTaskRow {
    id:                      i64,
    uuid:                    Uuid,
    interview_task_group_id: i64,
    phase_category:          i16,
    remarks:                 String,
    created_at:              DateTime<Utc>,
    updated_at:              DateTime<Utc>,
}

impl From<InterviewTaskRow> for InterviewTask {
    fn from(row: InterviewTaskRow) -> Self {
        Self {
            id:                      InterviewTaskId::new(row.id),
            uuid:                    row.uuid,
            interview_task_group_id: InterviewTaskGroupId::new(row.interview_task_group_id),
            phase_category:          row.phase_category,
            remarks:                 row.remarks,
            created_at:              row.created_at,
            updated_at:              row.updated_at,
        }
    }
}

#[async_trait]
impl InterviewTaskRepository for PostgresInterviewTaskRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskRepository.create", fields(interview_task_group_id = %task.interview_task_group_id))]
    async fn create(&self, task: &mut InterviewTask) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO interview_tasks (
                uuid, interview_task_group_id, phase_category, remarks, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(task.interview_task_group_id.as_i64())
        .bind(task.phase_category)
        .bind(&task.remarks)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        task.id = InterviewTaskId::new(id);
        task.uuid = uuid;
        task.created_at = now;
        task.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskRepository.find_latest_by_interview_task_group_id", fields(%interview_task_group_id))]
    async fn find_latest_by_interview_task_group_id(
        &self,
        interview_task_group_id: InterviewTaskGroupId,
    ) -> Result<InterviewTask, InfraError> {
        let row: Option<InterviewTaskRow> = sqlx::query_as(&format!(
            "{SELECT_INTERVIEW_TASK} WHERE interview_task_group_id = $1 ORDER BY id DESC LIMIT 1"
        ))
        .bind(interview_task_group_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(InterviewTask::from).or_not_found(
            "InterviewTask",
            format!("interview_task_group_id={interview_task_group_id}"),
        )
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskRepository.get_by_interview_task_group_id", fields(%interview_task_group_id))]
    async fn get_by_interview_task_group_id(
        &self,
        interview_task_group_id: InterviewTaskGroupId,
    ) -> Result<Vec<InterviewTask>, InfraError> {
        let rows: Vec<InterviewTaskRow> = sqlx::query_as(&format!(
            "{SELECT_INTERVIEW_TASK} WHERE interview_task_group_id = $1 ORDER BY id ASC"
        ))
        .bind(interview_task_group_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InterviewTask::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskRepository.delete", fields(%id))]
    async fn delete(&self, id: InterviewTaskId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM interview_tasks WHERE id = $1")
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
        assert_send_sync::<PostgresInterviewTaskRepository>();
    }
}
