//! # JobInformationRequiredLicenseRepository
//!
//! 求人の必須資格（1:N の明細）を扱うリポジトリ。
//! 編集画面からは明細をまとめて差し替えるため、`replace_by_job_information_id` を
//! トランザクション内で呼び出す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::job_information::{
    JobInformationId,
    JobInformationRequiredLicense,
    JobInformationRequiredLicenseId,
};
use sqlx::PgPool;

use crate::{db::TxContext, error::InfraError};

/// 必須資格リポジトリトレイト
#[async_trait]
pub trait JobInformationRequiredLicenseRepository: Send + Sync {
    async fn create(&self, license: &mut JobInformationRequiredLicense) -> Result<(), InfraError>;

    async fn get_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<Vec<JobInformationRequiredLicense>, InfraError>;

    async fn get_by_job_information_id_list(
        &self,
        job_information_ids: &[JobInformationId],
    ) -> Result<Vec<JobInformationRequiredLicense>, InfraError>;

    async fn delete_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<(), InfraError>;

    /// 求人の必須資格を `license_types` で置き換える
    async fn replace_by_job_information_id(
        &self,
        tx: &mut TxContext,
        job_information_id: JobInformationId,
        license_types: &[i16],
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の JobInformationRequiredLicenseRepository
#[derive(Debug, Clone)]
pub struct PostgresJobInformationRequiredLicenseRepository {
    pool: PgPool,
}

impl PostgresJobInformationRequiredLicenseRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_REQUIRED_LICENSE: &str = r#"
    SELECT id, job_information_id, license_type, created_at, updated_at
    FROM job_information_required_licenses
"#;

#[derive(sqlx::FromRow)]
struct RequiredLicenseRow {
    id:                 i64,
    job_information_id: i64,
    license_type:       i16,
    created_at:         DateTime<Utc>,
    updated_at:         DateTime<Utc>,
}

impl From<RequiredLicenseRow> for JobInformationRequiredLicense {
    fn from(row: RequiredLicenseRow) -> Self {
        Self {
            id:                 JobInformationRequiredLicenseId::new(row.id),
            job_information_id: JobInformationId::new(row.job_information_id),
            license_type:       row.license_type,
            created_at:         row.created_at,
            updated_at:         row.updated_at,
        }
    }
}

#[async_trait]
impl JobInformationRequiredLicenseRepository for PostgresJobInformationRequiredLicenseRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRequiredLicenseRepository.create", fields(job_information_id = %license.job_information_id))]
    async fn create(&self, license: &mut JobInformationRequiredLicense) -> Result<(), InfraError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_information_required_licenses (
                job_information_id, license_type, created_at, updated_at
            )
            VALUES ($1, $2, $3, $3)
            RETURNING id
            "#,
        )
        .bind(license.job_information_id.as_i64())
        .bind(license.license_type)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        license.id = JobInformationRequiredLicenseId::new(id);
        license.created_at = now;
        license.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRequiredLicenseRepository.get_by_job_information_id", fields(%job_information_id))]
    async fn get_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<Vec<JobInformationRequiredLicense>, InfraError> {
        let rows: Vec<RequiredLicenseRow> = sqlx::query_as(&format!(
            "{SELECT_REQUIRED_LICENSE} WHERE job_information_id = $1 ORDER BY id ASC"
        ))
        .bind(job_information_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(JobInformationRequiredLicense::from)
            .collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRequiredLicenseRepository.get_by_job_information_id_list", fields(count = job_information_ids.len()))]
    async fn get_by_job_information_id_list(
        &self,
        job_information_ids: &[JobInformationId],
    ) -> Result<Vec<JobInformationRequiredLicense>, InfraError> {
        if job_information_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<RequiredLicenseRow> = sqlx::query_as(&format!(
            "{SELECT_REQUIRED_LICENSE} WHERE job_information_id = ANY($1) ORDER BY job_information_id ASC, id ASC"
        ))
        .bind(JobInformationId::to_i64_vec(job_information_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(JobInformationRequiredLicense::from)
            .collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRequiredLicenseRepository.delete_by_job_information_id", fields(%job_information_id))]
    async fn delete_by_job_information_id(
        &self,
        job_information_id: JobInformationId,
    ) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_information_required_licenses WHERE job_information_id = $1")
            .bind(job_information_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRequiredLicenseRepository.replace_by_job_information_id", fields(%job_information_id, count = license_types.len()))]
    async fn replace_by_job_information_id(
        &self,
        tx: &mut TxContext,
        job_information_id: JobInformationId,
        license_types: &[i16],
    ) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_information_required_licenses WHERE job_information_id = $1")
            .bind(job_information_id.as_i64())
            .execute(tx.conn())
            .await?;

        if license_types.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO job_information_required_licenses (
                job_information_id, license_type, created_at, updated_at
            )
            SELECT $1, license_type, $3, $3
            FROM UNNEST($2::smallint[]) AS t(license_type)
            "#,
        )
        .bind(job_information_id.as_i64())
        .bind(license_types)
        .bind(Utc::now())
        .execute(tx.conn())
        .await?;

        Ok(())
    }
}
