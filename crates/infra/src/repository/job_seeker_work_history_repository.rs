//! # JobSeekerWorkHistoryRepository
//!
//! 求職者の職歴（1:N の明細）を扱うリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use recruitlink_domain::job_seeker::{JobSeekerId, JobSeekerWorkHistory, JobSeekerWorkHistoryId};
use sqlx::PgPool;

use crate::{db::TxContext, error::InfraError};

/// 職歴リポジトリトレイト
#[async_trait]
pub trait JobSeekerWorkHistoryRepository: Send + Sync {
    async fn create(&self, history: &mut JobSeekerWorkHistory) -> Result<(), InfraError>;

    /// 求職者の職歴を入社日の新しい順で取得する
    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<JobSeekerWorkHistory>, InfraError>;

    async fn get_by_job_seeker_id_list(
        &self,
        job_seeker_ids: &[JobSeekerId],
    ) -> Result<Vec<JobSeekerWorkHistory>, InfraError>;

    async fn delete_by_job_seeker_id(&self, job_seeker_id: JobSeekerId) -> Result<(), InfraError>;

    /// 求職者の職歴を `histories` で置き換える
    async fn replace_by_job_seeker_id(
        &self,
        tx: &mut TxContext,
        job_seeker_id: JobSeekerId,
        histories: &[JobSeekerWorkHistory],
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の JobSeekerWorkHistoryRepository
#[derive(Debug, Clone)]
pub struct PostgresJobSeekerWorkHistoryRepository {
    pool: PgPool,
}

impl PostgresJobSeekerWorkHistoryRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_WORK_HISTORY: &str = r#"
    SELECT
        id,
        job_seeker_id,
        company_name,
        industry,
        job_type,
        employment_status,
        joining_date,
        retirement_date,
        created_at,
        updated_at
    FROM job_seeker_work_histories
"#;

#[derive(sqlx::FromRow)]
struct WorkHistoryRow {
    id:                i64,
    job_seeker_id:     i64,
    company_name:      String,
    industry:          i16,
    job_type:          i16,
    employment_status: i16,
    joining_date:      Option<NaiveDate>,
    retirement_date:   Option<NaiveDate>,
    created_at:        DateTime<Utc>,
    updated_at:        DateTime<Utc>,
}

impl From<WorkHistoryRow> for JobSeekerWorkHistory {
    fn from(row: WorkHistoryRow) -> Self {
        Self {
            id:                JobSeekerWorkHistoryId::new(row.id),
            job_seeker_id:     JobSeekerId::new(row.job_seeker_id),
            company_name:      row.company_name,
            industry:          row.industry,
            job_type:          row.job_type,
            employment_status: row.employment_status,
            joining_date:      row.joining_date,
            retirement_date:   row.retirement_date,
            created_at:        row.created_at,
            updated_at:        row.updated_at,
        }
    }
}

#[async_trait]
impl JobSeekerWorkHistoryRepository for PostgresJobSeekerWorkHistoryRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerWorkHistoryRepository.create", fields(job_seeker_id = %history.job_seeker_id))]
    async fn create(&self, history: &mut JobSeekerWorkHistory) -> Result<(), InfraError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_seeker_work_histories (
                job_seeker_id, company_name, industry, job_type, employment_status,
                joining_date, retirement_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(history.job_seeker_id.as_i64())
        .bind(&history.company_name)
        .bind(history.industry)
        .bind(history.job_type)
        .bind(history.employment_status)
        .bind(history.joining_date)
        .bind(history.retirement_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        history.id = JobSeekerWorkHistoryId::new(id);
        history.created_at = now;
        history.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerWorkHistoryRepository.get_by_job_seeker_id", fields(%job_seeker_id))]
    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<JobSeekerWorkHistory>, InfraError> {
        let rows: Vec<WorkHistoryRow> = sqlx::query_as(&format!(
            "{SELECT_WORK_HISTORY} WHERE job_seeker_id = $1 ORDER BY joining_date DESC NULLS LAST, id ASC"
        ))
        .bind(job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeekerWorkHistory::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerWorkHistoryRepository.get_by_job_seeker_id_list", fields(count = job_seeker_ids.len()))]
    async fn get_by_job_seeker_id_list(
        &self,
        job_seeker_ids: &[JobSeekerId],
    ) -> Result<Vec<JobSeekerWorkHistory>, InfraError> {
        if job_seeker_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<WorkHistoryRow> = sqlx::query_as(&format!(
            "{SELECT_WORK_HISTORY} WHERE job_seeker_id = ANY($1) ORDER BY job_seeker_id ASC, joining_date DESC NULLS LAST, id ASC"
        ))
        .bind(JobSeekerId::to_i64_vec(job_seeker_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeekerWorkHistory::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerWorkHistoryRepository.delete_by_job_seeker_id", fields(%job_seeker_id))]
    async fn delete_by_job_seeker_id(&self, job_seeker_id: JobSeekerId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_seeker_work_histories WHERE job_seeker_id = $1")
            .bind(job_seeker_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerWorkHistoryRepository.replace_by_job_seeker_id", fields(%job_seeker_id, count = histories.len()))]
    async fn replace_by_job_seeker_id(
        &self,
        tx: &mut TxContext,
        job_seeker_id: JobSeekerId,
        histories: &[JobSeekerWorkHistory],
    ) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_seeker_work_histories WHERE job_seeker_id = $1")
            .bind(job_seeker_id.as_i64())
            .execute(tx.conn())
            .await?;

        if histories.is_empty() {
            return Ok(());
        }

        let (company_names, industries, job_types, employment_statuses, joining_dates, retirement_dates): (
            Vec<String>,
            Vec<i16>,
            Vec<i16>,
            Vec<i16>,
            Vec<Option<NaiveDate>>,
            Vec<Option<NaiveDate>>,
        ) = histories
            .iter()
            .map(|history| {
                (
                    history.company_name.clone(),
                    history.industry,
                    history.job_type,
                    history.employment_status,
                    history.joining_date,
                    history.retirement_date,
                )
            })
            .multiunzip();

        sqlx::query(
            r#"
            INSERT INTO job_seeker_work_histories (
                job_seeker_id, company_name, industry, job_type, employment_status,
                joining_date, retirement_date, created_at, updated_at
            )
            SELECT $1, company_name, industry, job_type, employment_status,
                   joining_date, retirement_date, $8, $8
            FROM UNNEST($2::text[], $3::smallint[], $4::smallint[], $5::smallint[], $6::date[], $7::date[])
                AS t(company_name, industry, job_type, employment_status, joining_date, retirement_date)
            "#,
        )
        .bind(job_seeker_id.as_i64())
        .bind(company_names)
        .bind(industries)
        .bind(job_types)
        .bind(employment_statuses)
        .bind(joining_dates)
        .bind(retirement_dates)
        .bind(Utc::now())
        .execute(tx.conn())
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
        assert_send_sync::<PostgresJobSeekerWorkHistoryRepository>();
    }
}
