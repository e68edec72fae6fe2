//! # JobSeekerLanguageSkillRepository
//!
//! 求職者の語学スキル（1:N の明細）を扱うリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use recruitlink_domain::job_seeker::{JobSeekerId, JobSeekerLanguageSkill, JobSeekerLanguageSkillId};
use sqlx::PgPool;

use crate::{db::TxContext, error::InfraError};

/// 語学スキルリポジトリトレイト
#[async_trait]
pub trait JobSeekerLanguageSkillRepository: Send + Sync {
    async fn create(&self, skill: &mut JobSeekerLanguageSkill) -> Result<(), InfraError>;

    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<JobSeekerLanguageSkill>, InfraError>;

    async fn get_by_job_seeker_id_list(
        &self,
        job_seeker_ids: &[JobSeekerId],
    ) -> Result<Vec<JobSeekerLanguageSkill>, InfraError>;

    async fn delete_by_job_seeker_id(&self, job_seeker_id: JobSeekerId) -> Result<(), InfraError>;

    /// 求職者の語学スキルを `skills` で置き換える
    ///
    /// `skills` の `id` と `job_seeker_id` は無視し、`job_seeker_id` 引数で登録する。
    async fn replace_by_job_seeker_id(
        &self,
        tx: &mut TxContext,
        job_seeker_id: JobSeekerId,
        skills: &[JobSeekerLanguageSkill],
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の JobSeekerLanguageSkillRepository
#[derive(Debug, Clone)]
pub struct PostgresJobSeekerLanguageSkillRepository {
    pool: PgPool,
}

impl PostgresJobSeekerLanguageSkillRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_LANGUAGE_SKILL: &str = r#"
    SELECT id, job_seeker_id, language_type, language_level, created_at, updated_at
    FROM job_seeker_language_skills
"#;

#[derive(sqlx::FromRow)]
struct LanguageSkillRow {
    id:             i64,
    job_seeker_id:  i64,
    language_type:  i16,
    language_level: i16,
    created_at:     DateTime<Utc>,
    updated_at:     DateTime<Utc>,
}

impl From<LanguageSkillRow> for JobSeekerLanguageSkill {
    fn from(row: LanguageSkillRow) -> Self {
        Self {
            id:             JobSeekerLanguageSkillId::new(row.id),
            job_seeker_id:  JobSeekerId::new(row.job_seeker_id),
            language_type:  row.language_type,
            language_level: row.language_level,
            created_at:     row.created_at,
            updated_at:     row.updated_at,
        }
    }
}

#[async_trait]
impl JobSeekerLanguageSkillRepository for PostgresJobSeekerLanguageSkillRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerLanguageSkillRepository.create", fields(job_seeker_id = %skill.job_seeker_id))]
    async fn create(&self, skill: &mut JobSeekerLanguageSkill) -> Result<(), InfraError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_seeker_language_skills (
                job_seeker_id, language_type, language_level, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(skill.job_seeker_id.as_i64())
        .bind(skill.language_type)
        .bind(skill.language_level)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        skill.id = JobSeekerLanguageSkillId::new(id);
        skill.created_at = now;
        skill.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerLanguageSkillRepository.get_by_job_seeker_id", fields(%job_seeker_id))]
    async fn get_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<Vec<JobSeekerLanguageSkill>, InfraError> {
        let rows: Vec<LanguageSkillRow> = sqlx::query_as(&format!(
            "{SELECT_LANGUAGE_SKILL} WHERE job_seeker_id = $1 ORDER BY id ASC"
        ))
        .bind(job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeekerLanguageSkill::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerLanguageSkillRepository.get_by_job_seeker_id_list", fields(count = job_seeker_ids.len()))]
    async fn get_by_job_seeker_id_list(
        &self,
        job_seeker_ids: &[JobSeekerId],
    ) -> Result<Vec<JobSeekerLanguageSkill>, InfraError> {
        if job_seeker_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<LanguageSkillRow> = sqlx::query_as(&format!(
            "{SELECT_LANGUAGE_SKILL} WHERE job_seeker_id = ANY($1) ORDER BY job_seeker_id ASC, id ASC"
        ))
        .bind(JobSeekerId::to_i64_vec(job_seeker_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeekerLanguageSkill::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerLanguageSkillRepository.delete_by_job_seeker_id", fields(%job_seeker_id))]
    async fn delete_by_job_seeker_id(&self, job_seeker_id: JobSeekerId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_seeker_language_skills WHERE job_seeker_id = $1")
            .bind(job_seeker_id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerLanguageSkillRepository.replace_by_job_seeker_id", fields(%job_seeker_id, count = skills.len()))]
    async fn replace_by_job_seeker_id(
        &self,
        tx: &mut TxContext,
        job_seeker_id: JobSeekerId,
        skills: &[JobSeekerLanguageSkill],
    ) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_seeker_language_skills WHERE job_seeker_id = $1")
            .bind(job_seeker_id.as_i64())
            .execute(tx.conn())
            .await?;

        if skills.is_empty() {
            return Ok(());
        }

        let (language_types, language_levels): (Vec<i16>, Vec<i16>) = skills
            .iter()
            .map(|skill| (skill.language_type, skill.language_level))
            .multiunzip();

        sqlx::query(
            r#"
            INSERT INTO job_seeker_language_skills (
                job_seeker_id, language_type, language_level, created_at, updated_at
            )
            SELECT $1, language_type, language_level, $4, $4
            FROM UNNEST($2::smallint[], $3::smallint[]) AS t(language_type, language_level)
            "#,
        )
        .bind(job_seeker_id.as_i64())
        .bind(language_types)
        .bind(language_levels)
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
        assert_send_sync::<PostgresJobSeekerLanguageSkillRepository>();
    }
}
