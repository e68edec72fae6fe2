//! # SendingJobSeekerRepository
//!
//! 送客求職者（他エージェントへ紹介する求職者）の永続化を担当するリポジトリ。
//!
//! 削除は `is_deleted` による論理削除。一覧系の取得は削除済みを除外し、
//! `find_by_id` / `find_by_uuid` は削除済みも返す。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::{AgentId, AgentStaffId},
    free_word::FreeWord,
    sending::{SendingJobSeeker, SendingJobSeekerId, SendingJobSeekerPatch},
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::{PatchUpdate, push_free_word},
};

/// 送客求職者リポジトリトレイト
#[async_trait]
pub trait SendingJobSeekerRepository: Send + Sync {
    async fn create(&self, sending_job_seeker: &mut SendingJobSeeker) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: SendingJobSeekerId) -> Result<SendingJobSeeker, InfraError>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<SendingJobSeeker, InfraError>;

    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<SendingJobSeeker>, InfraError>;

    async fn get_by_id_list(
        &self,
        ids: &[SendingJobSeekerId],
    ) -> Result<Vec<SendingJobSeeker>, InfraError>;

    /// 数値なら ID の完全一致、それ以外は氏名・フリガナの全文検索
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<SendingJobSeeker>, InfraError>;

    async fn update(
        &self,
        id: SendingJobSeekerId,
        patch: &SendingJobSeekerPatch,
    ) -> Result<(), InfraError>;

    async fn update_phase(&self, id: SendingJobSeekerId, phase: i16) -> Result<(), InfraError>;

    /// 送客求職者を論理削除する
    async fn delete(&self, id: SendingJobSeekerId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の SendingJobSeekerRepository
#[derive(Debug, Clone)]
pub struct PostgresSendingJobSeekerRepository {
    pool: PgPool,
}

impl PostgresSendingJobSeekerRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_SENDING_JOB_SEEKER: &str = r#"
    SELECT
        sjs.id,
        sjs.uuid,
        sjs.agent_id,
        sjs.agent_staff_id,
        sjs.last_name,
        sjs.first_name,
        sjs.last_furigana,
        sjs.first_furigana,
        sjs.gender,
        sjs.birthday,
        sjs.email,
        sjs.phone_number,
        sjs.phase,
        sjs.is_deleted,
        sjs.created_at,
        sjs.updated_at,
        a.agent_name,
        s.staff_name AS ca_staff_name
    FROM sending_job_seekers sjs
    INNER JOIN agents a ON a.id = sjs.agent_id
    INNER JOIN agent_staffs s ON s.id = sjs.agent_staff_id
"#;

const NAME_DOCUMENT: &str = "sjs.last_name || ' ' || sjs.first_name || ' ' || sjs.last_furigana || ' ' || sjs.first_furigana";

#[derive(sqlx::FromRow)]
struct SendingJobSeekerRow {
    id:             i64,
    uuid:           Uuid,
    agent_id:       i64,
    agent_staff_id: i64,
    last_name:      String,
    first_name:     String,
    last_furigana:  String,
    first_furigana: String,
    gender:         i16,
    birthday:       Option<NaiveDate>,
    email:          String,
    phone_number:   String,
    phase:          i16,
    is_deleted:     bool,
    created_at:     DateTime<Utc>,
    updated_at:     DateTime<Utc>,
    agent_name:     String,
    ca_staff_name:  String,
}

impl From<SendingJobSeekerRow> for SendingJobSeeker {
    fn from(row: SendingJobSeekerRow) -> Self {
        Self {
            id:             SendingJobSeekerId::new(row.id),
            uuid:           row.uuid,
            agent_id:       AgentId::new(row.agent_id),
            agent_staff_id: AgentStaffId::new(row.agent_staff_id),
            last_name:      row.last_name,
            first_name:     row.first_name,
            last_furigana:  row.last_furigana,
            first_furigana: row.first_furigana,
            gender:         row.gender,
            birthday:       row.birthday,
            email:          row.email,
            phone_number:   row.phone_number,
            phase:          row.phase,
            is_deleted:     row.is_deleted,
            created_at:     row.created_at,
            updated_at:     row.updated_at,
            agent_name:     row.agent_name,
            ca_staff_name:  row.ca_staff_name,
        }
    }
}

#[async_trait]
impl SendingJobSeekerRepository for PostgresSendingJobSeekerRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.create", fields(agent_id = %sending_job_seeker.agent_id))]
    async fn create(&self, sending_job_seeker: &mut SendingJobSeeker) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sending_job_seekers (
                uuid, agent_id, agent_staff_id, last_name, first_name, last_furigana,
                first_furigana, gender, birthday, email, phone_number, phase,
                is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, FALSE, $13, $13)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(sending_job_seeker.agent_id.as_i64())
        .bind(sending_job_seeker.agent_staff_id.as_i64())
        .bind(&sending_job_seeker.last_name)
        .bind(&sending_job_seeker.first_name)
        .bind(&sending_job_seeker.last_furigana)
        .bind(&sending_job_seeker.first_furigana)
        .bind(sending_job_seeker.gender)
        .bind(sending_job_seeker.birthday)
        .bind(&sending_job_seeker.email)
        .bind(&sending_job_seeker.phone_number)
        .bind(sending_job_seeker.phase)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        sending_job_seeker.id = SendingJobSeekerId::new(id);
        sending_job_seeker.uuid = uuid;
        sending_job_seeker.is_deleted = false;
        sending_job_seeker.created_at = now;
        sending_job_seeker.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: SendingJobSeekerId) -> Result<SendingJobSeeker, InfraError> {
        let row: Option<SendingJobSeekerRow> =
            sqlx::query_as(&format!("{SELECT_SENDING_JOB_SEEKER} WHERE sjs.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(SendingJobSeeker::from)
            .or_not_found("SendingJobSeeker", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.find_by_uuid", fields(%uuid))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<SendingJobSeeker, InfraError> {
        let row: Option<SendingJobSeekerRow> =
            sqlx::query_as(&format!("{SELECT_SENDING_JOB_SEEKER} WHERE sjs.uuid = $1"))
                .bind(uuid)
                .fetch_optional(&self.pool)
                .await?;

        row.map(SendingJobSeeker::from)
            .or_not_found("SendingJobSeeker", uuid)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<SendingJobSeeker>, InfraError> {
        let rows: Vec<SendingJobSeekerRow> = sqlx::query_as(&format!(
            "{SELECT_SENDING_JOB_SEEKER} WHERE sjs.agent_id = $1 AND sjs.is_deleted = FALSE ORDER BY sjs.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingJobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(
        &self,
        ids: &[SendingJobSeekerId],
    ) -> Result<Vec<SendingJobSeeker>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<SendingJobSeekerRow> = sqlx::query_as(&format!(
            "{SELECT_SENDING_JOB_SEEKER} WHERE sjs.id = ANY($1) AND sjs.is_deleted = FALSE ORDER BY sjs.id ASC"
        ))
        .bind(SendingJobSeekerId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingJobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.get_by_agent_id_and_free_word", fields(%agent_id))]
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<SendingJobSeeker>, InfraError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "{SELECT_SENDING_JOB_SEEKER} WHERE sjs.is_deleted = FALSE AND sjs.agent_id = "
        ));
        builder.push_bind(agent_id.as_i64());
        push_free_word(
            &mut builder,
            &FreeWord::parse(free_word),
            "sjs.id",
            NAME_DOCUMENT,
        );
        builder.push(" ORDER BY sjs.id DESC");

        let rows: Vec<SendingJobSeekerRow> =
            builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(SendingJobSeeker::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.update", fields(%id))]
    async fn update(
        &self,
        id: SendingJobSeekerId,
        patch: &SendingJobSeekerPatch,
    ) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("sending_job_seekers", Utc::now());
        update
            .set("agent_staff_id", patch.agent_staff_id.map(|id| id.as_i64()))
            .set("last_name", patch.last_name.clone())
            .set("first_name", patch.first_name.clone())
            .set("last_furigana", patch.last_furigana.clone())
            .set("first_furigana", patch.first_furigana.clone())
            .set("gender", patch.gender)
            .set("birthday", patch.birthday)
            .set("email", patch.email.clone())
            .set("phone_number", patch.phone_number.clone())
            .set("phase", patch.phase);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.update_phase", fields(%id, phase))]
    async fn update_phase(&self, id: SendingJobSeekerId, phase: i16) -> Result<(), InfraError> {
        sqlx::query("UPDATE sending_job_seekers SET phase = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_i64())
            .bind(phase)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingJobSeekerRepository.delete", fields(%id))]
    async fn delete(&self, id: SendingJobSeekerId) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE sending_job_seekers SET is_deleted = TRUE, updated_at = $2 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(Utc::now())
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
        assert_send_sync::<PostgresSendingJobSeekerRepository>();
    }
}
