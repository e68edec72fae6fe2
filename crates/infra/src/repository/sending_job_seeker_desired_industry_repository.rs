//! # SendingJobSeekerDesiredIndustryRepository
//!
//! 送客求職者の希望業界（1:N の明細）を扱うリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::sending::{
    SendingJobSeekerDesiredIndustry,
    SendingJobSeekerDesiredIndustryId,
    SendingJobSeekerId,
};
use sqlx::{PgConnection, PgPool};

use crate::{db::TxContext, error::InfraError};

/// 希望業界リポジトリトレイト
#[async_trait]
pub trait SendingJobSeekerDesiredIndustryRepository: Send + Sync {
    /// 希望業界をまとめて登録する。`industries` が空なら何もしない
    async fn create_multi(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
        industries: &[i16],
    ) -> Result<(), InfraError>;

    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingJobSeekerDesiredIndustry>, InfraError>;

    async fn delete_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<(), InfraError>;

    /// 希望業界を `industries` で置き換える
    async fn replace_by_sending_job_seeker_id(
        &self,
        tx: &mut TxContext,
        sending_job_seeker_id: SendingJobSeekerId,
        industries: &[i16],
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の SendingJobSeekerDesiredIndustryRepository
#[derive(Debug, Clone)]
pub struct PostgresSendingJobSeekerDesiredIndustryRepository {
    pool: PgPool,
}

impl PostgresSendingJobSeekerDesiredIndustryRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DesiredIndustryRow {
    id:                    i64,
    sending_job_seeker_id: i64,
    desired_industry:      i16,
    created_at:            DateTime<Utc>,
    updated_at:            DateTime<Utc>,
}

impl From<DesiredIndustryRow> for SendingJobSeekerDesiredIndustry {
    fn from(row: DesiredIndustryRow) -> Self {
        Self {
            id:                    SendingJobSeekerDesiredIndustryId::new(row.id),
            sending_job_seeker_id: SendingJobSeekerId::new(row.sending_job_seeker_id),
            desired_industry:      row.desired_industry,
            created_at:            row.created_at,
            updated_at:            row.updated_at,
        }
    }
}

async fn insert_industries(
    conn: &mut PgConnection,
    sending_job_seeker_id: SendingJobSeekerId,
    industries: &[i16],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sending_job_seeker_desired_industries (
            sending_job_seeker_id, desired_industry, created_at, updated_at
        )
        SELECT $1, desired_industry, $3, $3
        FROM UNNEST($2::smallint[]) AS t(desired_industry)
        "#,
    )
    .bind(sending_job_seeker_id.as_i64())
    .bind(industries)
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl SendingJobSeekerDesiredIndustryRepository
    for PostgresSendingJobSeekerDesiredIndustryRepository
{
    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerDesiredIndustryRepository.create_multi", fields(%sending_job_seeker_id, count = industries.len()))]
    async fn create_multi(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
        industries: &[i16],
    ) -> Result<(), InfraError> {
        if industries.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.acquire().await?;
        insert_industries(&mut conn, sending_job_seeker_id, industries).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerDesiredIndustryRepository.get_by_sending_job_seeker_id", fields(%sending_job_seeker_id))]
    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingJobSeekerDesiredIndustry>, InfraError> {
        let rows: Vec<DesiredIndustryRow> = sqlx::query_as(
            r#"
            SELECT id, sending_job_seeker_id, desired_industry, created_at, updated_at
            FROM sending_job_seeker_desired_industries
            WHERE sending_job_seeker_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(sending_job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(SendingJobSeekerDesiredIndustry::from)
            .collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerDesiredIndustryRepository.delete_by_sending_job_seeker_id", fields(%sending_job_seeker_id))]
    async fn delete_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<(), InfraError> {
        sqlx::query(
            "DELETE FROM sending_job_seeker_desired_industries WHERE sending_job_seeker_id = $1",
        )
        .bind(sending_job_seeker_id.as_i64())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerDesiredIndustryRepository.replace_by_sending_job_seeker_id", fields(%sending_job_seeker_id, count = industries.len()))]
    async fn replace_by_sending_job_seeker_id(
        &self,
        tx: &mut TxContext,
        sending_job_seeker_id: SendingJobSeekerId,
        industries: &[i16],
    ) -> Result<(), InfraError> {
        sqlx::query(
            "DELETE FROM sending_job_seeker_desired_industries WHERE sending_job_seeker_id = $1",
        )
        .bind(sending_job_seeker_id.as_i64())
        .execute(tx.conn())
        .await?;

        if !industries.is_empty() {
            insert_industries(tx.conn(), sending_job_seeker_id, industries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresSendingJobSeekerDesiredIndustryRepository>();
    }
}
