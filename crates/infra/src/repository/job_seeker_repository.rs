//! # JobSeekerRepository
//!
//! 求職者の永続化を担当するリポジトリ。
//! 取得系は担当 CA スタッフ名とエージェント名を JOIN して返す。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::{AgentId, AgentStaffId},
    free_word::FreeWord,
    job_seeker::{JobSeeker, JobSeekerId, JobSeekerPatch},
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::{PatchUpdate, push_free_word},
};

/// 求職者リポジトリトレイト
#[async_trait]
pub trait JobSeekerRepository: Send + Sync {
    /// 求職者を作成し、採番された ID・UUID・作成日時を `job_seeker` に書き戻す
    async fn create(&self, job_seeker: &mut JobSeeker) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: JobSeekerId) -> Result<JobSeeker, InfraError>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<JobSeeker, InfraError>;

    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<JobSeeker>, InfraError>;

    /// 担当 CA の求職者を取得する
    async fn get_by_ca_staff_id(
        &self,
        ca_staff_id: AgentStaffId,
    ) -> Result<Vec<JobSeeker>, InfraError>;

    async fn get_by_id_list(&self, ids: &[JobSeekerId]) -> Result<Vec<JobSeeker>, InfraError>;

    /// エージェント内の求職者をフリーワードで検索する
    ///
    /// 数値なら求職者 ID の完全一致、それ以外は氏名・フリガナの全文検索。
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<JobSeeker>, InfraError>;

    async fn update(&self, id: JobSeekerId, patch: &JobSeekerPatch) -> Result<(), InfraError>;

    /// 選考フェーズを更新する
    async fn update_phase(&self, id: JobSeekerId, phase: i16) -> Result<(), InfraError>;

    /// 求職者を削除する（明細・選考・チャットは外部キーの CASCADE で削除される）
    async fn delete(&self, id: JobSeekerId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の JobSeekerRepository
#[derive(Debug, Clone)]
pub struct PostgresJobSeekerRepository {
    pool: PgPool,
}

impl PostgresJobSeekerRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_JOB_SEEKER: &str = r#"
    SELECT
        js.id,
        js.uuid,
        js.agent_id,
        js.ca_staff_id,
        js.last_name,
        js.first_name,
        js.last_furigana,
        js.first_furigana,
        js.gender,
        js.birthday,
        js.email,
        js.phone_number,
        js.phase,
        js.final_education,
        js.job_change_count,
        js.created_at,
        js.updated_at,
        s.staff_name AS ca_staff_name,
        a.agent_name
    FROM job_seekers js
    INNER JOIN agent_staffs s ON s.id = js.ca_staff_id
    INNER JOIN agents a ON a.id = js.agent_id
"#;

/// 氏名・フリガナの全文検索対象（GIN インデックスの式と一致させる）
const NAME_DOCUMENT: &str =
    "js.last_name || ' ' || js.first_name || ' ' || js.last_furigana || ' ' || js.first_furigana";

#[derive(sqlx::FromRow)]
struct JobSeekerRow {
    id:               i64,
    uuid:             Uuid,
    agent_id:         i64,
    ca_staff_id:      i64,
    last_name:        String,
    first_name:       String,
    last_furigana:    String,
    first_furigana:   String,
    gender:           i16,
    birthday:         Option<NaiveDate>,
    email:            String,
    phone_number:     String,
    phase:            i16,
    final_education:  Option<i16>,
    job_change_count: Option<i16>,
    created_at:       DateTime<Utc>,
    updated_at:       DateTime<Utc>,
    ca_staff_name:    String,
    agent_name:       String,
}

impl From<JobSeekerRow> for JobSeeker {
    fn from(row: JobSeekerRow) -> Self {
        Self {
            id:               JobSeekerId::new(row.id),
            uuid:             row.uuid,
            agent_id:         AgentId::new(row.agent_id),
            ca_staff_id:      AgentStaffId::new(row.ca_staff_id),
            last_name:        row.last_name,
            first_name:       row.first_name,
            last_furigana:    row.last_furigana,
            first_furigana:   row.first_furigana,
            gender:           row.gender,
            birthday:         row.birthday,
            email:            row.email,
            phone_number:     row.phone_number,
            phase:            row.phase,
            final_education:  row.final_education,
            job_change_count: row.job_change_count,
            created_at:       row.created_at,
            updated_at:       row.updated_at,
            ca_staff_name:    row.ca_staff_name,
            agent_name:       row.agent_name,
        }
    }
}

#[async_trait]
impl JobSeekerRepository for PostgresJobSeekerRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.create", fields(agent_id = %job_seeker.agent_id))]
    async fn create(&self, job_seeker: &mut JobSeeker) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_seekers (
                uuid, agent_id, ca_staff_id, last_name, first_name, last_furigana,
                first_furigana, gender, birthday, email, phone_number, phase,
                final_education, job_change_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(job_seeker.agent_id.as_i64())
        .bind(job_seeker.ca_staff_id.as_i64())
        .bind(&job_seeker.last_name)
        .bind(&job_seeker.first_name)
        .bind(&job_seeker.last_furigana)
        .bind(&job_seeker.first_furigana)
        .bind(job_seeker.gender)
        .bind(job_seeker.birthday)
        .bind(&job_seeker.email)
        .bind(&job_seeker.phone_number)
        .bind(job_seeker.phase)
        .bind(job_seeker.final_education)
        .bind(job_seeker.job_change_count)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        job_seeker.id = JobSeekerId::new(id);
        job_seeker.uuid = uuid;
        job_seeker.created_at = now;
        job_seeker.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: JobSeekerId) -> Result<JobSeeker, InfraError> {
        let row: Option<JobSeekerRow> =
            sqlx::query_as(&format!("{SELECT_JOB_SEEKER} WHERE js.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(JobSeeker::from).or_not_found("JobSeeker", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.find_by_uuid", fields(%uuid))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<JobSeeker, InfraError> {
        let row: Option<JobSeekerRow> =
            sqlx::query_as(&format!("{SELECT_JOB_SEEKER} WHERE js.uuid = $1"))
                .bind(uuid)
                .fetch_optional(&self.pool)
                .await?;

        row.map(JobSeeker::from).or_not_found("JobSeeker", uuid)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(&self, agent_id: AgentId) -> Result<Vec<JobSeeker>, InfraError> {
        let rows: Vec<JobSeekerRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_SEEKER} WHERE js.agent_id = $1 ORDER BY js.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.get_by_ca_staff_id", fields(%ca_staff_id))]
    async fn get_by_ca_staff_id(
        &self,
        ca_staff_id: AgentStaffId,
    ) -> Result<Vec<JobSeeker>, InfraError> {
        let rows: Vec<JobSeekerRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_SEEKER} WHERE js.ca_staff_id = $1 ORDER BY js.id DESC"
        ))
        .bind(ca_staff_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(&self, ids: &[JobSeekerId]) -> Result<Vec<JobSeeker>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<JobSeekerRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_SEEKER} WHERE js.id = ANY($1) ORDER BY js.id ASC"
        ))
        .bind(JobSeekerId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.get_by_agent_id_and_free_word", fields(%agent_id))]
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<JobSeeker>, InfraError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("{SELECT_JOB_SEEKER} WHERE js.agent_id = "));
        builder.push_bind(agent_id.as_i64());
        push_free_word(
            &mut builder,
            &FreeWord::parse(free_word),
            "js.id",
            NAME_DOCUMENT,
        );
        builder.push(" ORDER BY js.id DESC");

        let rows: Vec<JobSeekerRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(JobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.update", fields(%id))]
    async fn update(&self, id: JobSeekerId, patch: &JobSeekerPatch) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("job_seekers", Utc::now());
        update
            .set("ca_staff_id", patch.ca_staff_id.map(|id| id.as_i64()))
            .set("last_name", patch.last_name.clone())
            .set("first_name", patch.first_name.clone())
            .set("last_furigana", patch.last_furigana.clone())
            .set("first_furigana", patch.first_furigana.clone())
            .set("gender", patch.gender)
            .set("birthday", patch.birthday)
            .set("email", patch.email.clone())
            .set("phone_number", patch.phone_number.clone())
            .set("phase", patch.phase)
            .set("final_education", patch.final_education)
            .set("job_change_count", patch.job_change_count);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.update_phase", fields(%id, phase))]
    async fn update_phase(&self, id: JobSeekerId, phase: i16) -> Result<(), InfraError> {
        sqlx::query("UPDATE job_seekers SET phase = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(phase)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobSeekerRepository.delete", fields(%id))]
    async fn delete(&self, id: JobSeekerId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM job_seekers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
