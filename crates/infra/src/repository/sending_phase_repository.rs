//! # SendingPhaseRepository
//!
//! 送客先企業ごとの進捗フェーズを扱うリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::sending::{SendingJobSeekerId, SendingPhase, SendingPhaseId};
use sqlx::PgPool;

use crate::error::{InfraError, OptionalRowExt};

/// 送客フェーズリポジトリトレイト
#[async_trait]
pub trait SendingPhaseRepository: Send + Sync {
    async fn create(&self, phase: &mut SendingPhase) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: SendingPhaseId) -> Result<SendingPhase, InfraError>;

    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingPhase>, InfraError>;

    async fn get_by_sending_job_seeker_id_list(
        &self,
        sending_job_seeker_ids: &[SendingJobSeekerId],
    ) -> Result<Vec<SendingPhase>, InfraError>;

    async fn update_phase(&self, id: SendingPhaseId, phase: i16) -> Result<(), InfraError>;

    async fn delete(&self, id: SendingPhaseId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の SendingPhaseRepository
#[derive(Debug, Clone)]
pub struct PostgresSendingPhaseRepository {
    pool: PgPool,
}

impl PostgresSendingPhaseRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_SENDING_PHASE: &str = r#"
    SELECT id, sending_job_seeker_id, sending_enterprise_name, phase, created_at, updated_at
    FROM sending_phases
"#;

#[derive(sqlx::FromRow)]
struct SendingPhaseRow {
    id:                      i64,
    sending_job_seeker_id:   i64,
    sending_enterprise_name: String,
    phase:                   i16,
    created_at:              DateTime<Utc>,
    updated_at:              DateTime<Utc>,
}

impl From<SendingPhaseRow> for SendingPhase {
    fn from(row: SendingPhaseRow) -> Self {
        Self {
            id:                      SendingPhaseId::new(row.id),
            sending_job_seeker_id:   SendingJobSeekerId::new(row.sending_job_seeker_id),
            sending_enterprise_name: row.sending_enterprise_name,
            phase:                   row.phase,
            created_at:              row.created_at,
            updated_at:              row.updated_at,
        }
    }
}

#[async_trait]
impl SendingPhaseRepository for PostgresSendingPhaseRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.create", fields(sending_job_seeker_id = %phase.sending_job_seeker_id))]
    async fn create(&self, phase: &mut SendingPhase) -> Result<(), InfraError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sending_phases (
                sending_job_seeker_id, sending_enterprise_name, phase, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(phase.sending_job_seeker_id.as_i64())
        .bind(&phase.sending_enterprise_name)
        .bind(phase.phase)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        phase.id = SendingPhaseId::new(id);
        phase.created_at = now;
        phase.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: SendingPhaseId) -> Result<SendingPhase, InfraError> {
        let row: Option<SendingPhaseRow> =
            sqlx::query_as(&format!("{SELECT_SENDING_PHASE} WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(SendingPhase::from).or_not_found("SendingPhase", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.get_by_sending_job_seeker_id", fields(%sending_job_seeker_id))]
    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingPhase>, InfraError> {
        let rows: Vec<SendingPhaseRow> = sqlx::query_as(&format!(
            "{SELECT_SENDING_PHASE} WHERE sending_job_seeker_id = $1 ORDER BY id ASC"
        ))
        .bind(sending_job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingPhase::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.get_by_sending_job_seeker_id_list", fields(count = sending_job_seeker_ids.len()))]
    async fn get_by_sending_job_seeker_id_list(
        &self,
        sending_job_seeker_ids: &[SendingJobSeekerId],
    ) -> Result<Vec<SendingPhase>, InfraError> {
        if sending_job_seeker_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<SendingPhaseRow> = sqlx::query_as(&format!(
            "{SELECT_SENDING_PHASE} WHERE sending_job_seeker_id = ANY($1) ORDER BY sending_job_seeker_id ASC, id ASC"
        ))
        .bind(SendingJobSeekerId::to_i64_vec(sending_job_seeker_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingPhase::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.update_phase", fields(%id, phase))]
    async fn update_phase(&self, id: SendingPhaseId, phase: i16) -> Result<(), InfraError> {
        sqlx::query("UPDATE sending_phases SET phase = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(phase)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingPhaseRepository.delete", fields(%id))]
    async fn delete(&self, id: SendingPhaseId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM sending_phases WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
