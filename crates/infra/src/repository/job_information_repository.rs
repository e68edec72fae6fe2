//! # JobInformationRepository
//!
//! 求人の永続化を担当するリポジトリ。
//!
//! - 削除は `is_deleted` による論理削除。一覧系の取得は削除済みを除外し、
//!   `find_by_id` / `find_by_uuid` は削除済みも返す
//! - 取得系は請求先（企業名）、担当 RA、エージェント名を JOIN して返す
//! - 求職者の属性から応募可能な求人を絞り込む診断クエリを提供する

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::{AgentId, AgentStaffId},
    billing_address::BillingAddressId,
    free_word::FreeWord,
    job_information::{
        DiagnosisParam,
        JobInformation,
        JobInformationId,
        JobInformationPatch,
        gender_requirement,
        recruitment_state,
    },
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::{PatchUpdate, push_free_word},
};

/// 求人リポジトリトレイト
#[async_trait]
pub trait JobInformationRepository: Send + Sync {
    /// 求人を作成し、採番された ID・UUID・作成日時を `job_information` に書き戻す
    async fn create(&self, job_information: &mut JobInformation) -> Result<(), InfraError>;

    /// ID で求人を取得する（論理削除済みも含む）
    async fn find_by_id(&self, id: JobInformationId) -> Result<JobInformation, InfraError>;

    /// UUID で求人を取得する（論理削除済みも含む）
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<JobInformation, InfraError>;

    async fn get_by_billing_address_id(
        &self,
        billing_address_id: BillingAddressId,
    ) -> Result<Vec<JobInformation>, InfraError>;

    async fn get_by_agent_id(&self, agent_id: AgentId)
    -> Result<Vec<JobInformation>, InfraError>;

    async fn get_by_id_list(
        &self,
        ids: &[JobInformationId],
    ) -> Result<Vec<JobInformation>, InfraError>;

    /// エージェント内の求人をフリーワードで検索する
    ///
    /// 数値なら求人 ID の完全一致、それ以外は求人タイトルと企業名の全文検索。
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<JobInformation>, InfraError>;

    /// 指定されたフィールドだけを更新する
    async fn update(
        &self,
        id: JobInformationId,
        patch: &JobInformationPatch,
    ) -> Result<(), InfraError>;

    /// 募集状況を更新する
    async fn update_recruitment_state(
        &self,
        id: JobInformationId,
        state: i16,
    ) -> Result<(), InfraError>;

    /// 複数求人の募集状況をまとめて更新する
    ///
    /// # エラー
    ///
    /// `ids` が空の場合は [`InvalidInput`](crate::error::InfraErrorKind::InvalidInput)
    async fn update_recruitment_state_by_id_list(
        &self,
        ids: &[JobInformationId],
        state: i16,
    ) -> Result<(), InfraError>;

    /// 求人を論理削除する
    async fn delete(&self, id: JobInformationId) -> Result<(), InfraError>;

    /// 求職者の属性で応募可能な自社求人を取得する
    ///
    /// 募集中・未削除・外部求人でないものに限り、性別・年齢・転職回数・最終学歴の
    /// 応募条件を満たす求人を返す。年齢は `today` 時点の満年齢で判定する。
    async fn get_active_all_by_agent_id_and_diagnosis_param_without_external(
        &self,
        agent_id: AgentId,
        param: &DiagnosisParam,
        today: NaiveDate,
    ) -> Result<Vec<JobInformation>, InfraError>;
}

/// PostgreSQL 実装の JobInformationRepository
#[derive(Debug, Clone)]
pub struct PostgresJobInformationRepository {
    pool: PgPool,
}

impl PostgresJobInformationRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// 請求先を物理削除した後も論理削除済みの求人を取得できるよう LEFT JOIN にする
const SELECT_JOB_INFORMATION: &str = r#"
    SELECT
        ji.id,
        ji.uuid,
        ji.billing_address_id,
        ji.title,
        ji.recruitment_state,
        ji.is_external,
        ji.work_location,
        ji.job_description,
        ji.under_income,
        ji.over_income,
        ji.number_of_hires,
        ji.gender_requirement,
        ji.age_under,
        ji.age_over,
        ji.job_change_limit,
        ji.education_requirement,
        ji.is_deleted,
        ji.created_at,
        ji.updated_at,
        COALESCE(b.agent_id, 0) AS agent_id,
        COALESCE(b.company_name, '') AS company_name,
        COALESCE(b.agent_staff_id, 0) AS ra_staff_id,
        COALESCE(s.staff_name, '') AS ra_staff_name,
        COALESCE(a.agent_name, '') AS agent_name
    FROM job_informations ji
    LEFT JOIN billing_addresses b ON b.id = ji.billing_address_id
    LEFT JOIN agent_staffs s ON s.id = b.agent_staff_id
    LEFT JOIN agents a ON a.id = b.agent_id
"#;

#[derive(sqlx::FromRow)]
struct JobInformationRow {
    id:                    i64,
    uuid:                  Uuid,
    billing_address_id:    i64,
    title:                 String,
    recruitment_state:     i16,
    is_external:           bool,
    work_location:         String,
    job_description:       String,
    under_income:          Option<i32>,
    over_income:           Option<i32>,
    number_of_hires:       Option<i32>,
    gender_requirement:    i16,
    age_under:             Option<i16>,
    age_over:              Option<i16>,
    job_change_limit:      Option<i16>,
    education_requirement: Option<i16>,
    is_deleted:            bool,
    created_at:            DateTime<Utc>,
    updated_at:            DateTime<Utc>,
    agent_id:              i64,
    company_name:          String,
    ra_staff_id:           i64,
    ra_staff_name:         String,
    agent_name:            String,
}

impl From<JobInformationRow> for JobInformation {
    fn from(row: JobInformationRow) -> Self {
        Self {
            id:                    JobInformationId::new(row.id),
            uuid:                  row.uuid,
            billing_address_id:    BillingAddressId::new(row.billing_address_id),
            title:                 row.title,
            recruitment_state:     row.recruitment_state,
            is_external:           row.is_external,
            work_location:         row.work_location,
            job_description:       row.job_description,
            under_income:          row.under_income,
            over_income:           row.over_income,
            number_of_hires:       row.number_of_hires,
            gender_requirement:    row.gender_requirement,
            age_under:             row.age_under,
            age_over:              row.age_over,
            job_change_limit:      row.job_change_limit,
            education_requirement: row.education_requirement,
            is_deleted:            row.is_deleted,
            created_at:            row.created_at,
            updated_at:            row.updated_at,
            agent_id:              AgentId::new(row.agent_id),
            company_name:          row.company_name,
            ra_staff_id:           AgentStaffId::new(row.ra_staff_id),
            ra_staff_name:         row.ra_staff_name,
            agent_name:            row.agent_name,
        }
    }
}

/// 診断クエリを組み立てる
///
/// 応募条件のカラムが NULL の場合はその条件を課さない。
/// 性別条件は `gender_requirement::ANY`（不問）か求職者の性別と一致するもの。
pub(crate) fn build_diagnosis_query(
    agent_id: AgentId,
    param: &DiagnosisParam,
    today: NaiveDate,
) -> QueryBuilder<'static, Postgres> {
    let age = param.age_at(today);

    let mut builder = QueryBuilder::new(format!(
        "{SELECT_JOB_INFORMATION} WHERE ji.is_deleted = FALSE AND ji.is_external = FALSE"
    ));
    builder
        .push(" AND b.agent_id = ")
        .push_bind(agent_id.as_i64())
        .push(" AND ji.recruitment_state = ")
        .push_bind(recruitment_state::OPEN)
        .push(" AND (ji.gender_requirement = ")
        .push_bind(gender_requirement::ANY)
        .push(" OR ji.gender_requirement = ")
        .push_bind(param.gender)
        .push(")")
        .push(" AND (ji.age_under IS NULL OR ji.age_under >= ")
        .push_bind(age)
        .push(")")
        .push(" AND (ji.age_over IS NULL OR ji.age_over <= ")
        .push_bind(age)
        .push(")")
        .push(" AND (ji.job_change_limit IS NULL OR ji.job_change_limit >= ")
        .push_bind(param.job_change_count)
        .push(")")
        .push(" AND (ji.education_requirement IS NULL OR ji.education_requirement <= ")
        .push_bind(param.final_education)
        .push(")")
        .push(" ORDER BY ji.id DESC");
    builder
}

#[async_trait]
impl JobInformationRepository for PostgresJobInformationRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.create", fields(billing_address_id = %job_information.billing_address_id))]
    async fn create(&self, job_information: &mut JobInformation) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO job_informations (
                uuid, billing_address_id, title, recruitment_state, is_external,
                work_location, job_description, under_income, over_income, number_of_hires,
                gender_requirement, age_under, age_over, job_change_limit, education_requirement,
                is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, FALSE, $16, $16)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(job_information.billing_address_id.as_i64())
        .bind(&job_information.title)
        .bind(job_information.recruitment_state)
        .bind(job_information.is_external)
        .bind(&job_information.work_location)
        .bind(&job_information.job_description)
        .bind(job_information.under_income)
        .bind(job_information.over_income)
        .bind(job_information.number_of_hires)
        .bind(job_information.gender_requirement)
        .bind(job_information.age_under)
        .bind(job_information.age_over)
        .bind(job_information.job_change_limit)
        .bind(job_information.education_requirement)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        job_information.id = JobInformationId::new(id);
        job_information.uuid = uuid;
        job_information.is_deleted = false;
        job_information.created_at = now;
        job_information.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: JobInformationId) -> Result<JobInformation, InfraError> {
        let row: Option<JobInformationRow> =
            sqlx::query_as(&format!("{SELECT_JOB_INFORMATION} WHERE ji.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(JobInformation::from)
            .or_not_found("JobInformation", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.find_by_uuid", fields(%uuid))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<JobInformation, InfraError> {
        let row: Option<JobInformationRow> =
            sqlx::query_as(&format!("{SELECT_JOB_INFORMATION} WHERE ji.uuid = $1"))
                .bind(uuid)
                .fetch_optional(&self.pool)
                .await?;

        row.map(JobInformation::from)
            .or_not_found("JobInformation", uuid)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.get_by_billing_address_id", fields(%billing_address_id))]
    async fn get_by_billing_address_id(
        &self,
        billing_address_id: BillingAddressId,
    ) -> Result<Vec<JobInformation>, InfraError> {
        let rows: Vec<JobInformationRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_INFORMATION} WHERE ji.billing_address_id = $1 AND ji.is_deleted = FALSE ORDER BY ji.id DESC"
        ))
        .bind(billing_address_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobInformation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<JobInformation>, InfraError> {
        let rows: Vec<JobInformationRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_INFORMATION} WHERE b.agent_id = $1 AND ji.is_deleted = FALSE ORDER BY ji.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobInformation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(
        &self,
        ids: &[JobInformationId],
    ) -> Result<Vec<JobInformation>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<JobInformationRow> = sqlx::query_as(&format!(
            "{SELECT_JOB_INFORMATION} WHERE ji.id = ANY($1) AND ji.is_deleted = FALSE ORDER BY ji.id ASC"
        ))
        .bind(JobInformationId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobInformation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.get_by_agent_id_and_free_word", fields(%agent_id))]
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<JobInformation>, InfraError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "{SELECT_JOB_INFORMATION} WHERE ji.is_deleted = FALSE AND b.agent_id = "
        ));
        builder.push_bind(agent_id.as_i64());
        push_free_word(
            &mut builder,
            &FreeWord::parse(free_word),
            "ji.id",
            "ji.title || ' ' || COALESCE(b.company_name, '')",
        );
        builder.push(" ORDER BY ji.id DESC");

        let rows: Vec<JobInformationRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(JobInformation::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.update", fields(%id))]
    async fn update(
        &self,
        id: JobInformationId,
        patch: &JobInformationPatch,
    ) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("job_informations", Utc::now());
        update
            .set(
                "billing_address_id",
                patch.billing_address_id.map(|id| id.as_i64()),
            )
            .set("title", patch.title.clone())
            .set("recruitment_state", patch.recruitment_state)
            .set("is_external", patch.is_external)
            .set("work_location", patch.work_location.clone())
            .set("job_description", patch.job_description.clone())
            .set("under_income", patch.under_income)
            .set("over_income", patch.over_income)
            .set("number_of_hires", patch.number_of_hires)
            .set("gender_requirement", patch.gender_requirement)
            .set("age_under", patch.age_under)
            .set("age_over", patch.age_over)
            .set("job_change_limit", patch.job_change_limit)
            .set("education_requirement", patch.education_requirement);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.update_recruitment_state", fields(%id, state))]
    async fn update_recruitment_state(
        &self,
        id: JobInformationId,
        state: i16,
    ) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE job_informations SET recruitment_state = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(state)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.update_recruitment_state_by_id_list", fields(count = ids.len(), state))]
    async fn update_recruitment_state_by_id_list(
        &self,
        ids: &[JobInformationId],
        state: i16,
    ) -> Result<(), InfraError> {
        if ids.is_empty() {
            return Err(InfraError::invalid_input(
                "募集状況を更新する求人 ID が指定されていません",
            ));
        }

        sqlx::query(
            "UPDATE job_informations SET recruitment_state = $2, updated_at = $3 WHERE id = ANY($1)",
        )
        .bind(JobInformationId::to_i64_vec(ids))
        .bind(state)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "JobInformationRepository.delete", fields(%id))]
    async fn delete(&self, id: JobInformationId) -> Result<(), InfraError> {
        sqlx::query("UPDATE job_informations SET is_deleted = TRUE, updated_at = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        err,
        name = "JobInformationRepository.get_active_all_by_agent_id_and_diagnosis_param_without_external",
        fields(%agent_id, %today)
    )]
    async fn get_active_all_by_agent_id_and_diagnosis_param_without_external(
        &self,
        agent_id: AgentId,
        param: &DiagnosisParam,
        today: NaiveDate,
    ) -> Result<Vec<JobInformation>, InfraError> {
        let mut builder = build_diagnosis_query(agent_id, param, today);
        let rows: Vec<JobInformationRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(JobInformation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn param() -> DiagnosisParam {
        DiagnosisParam {
            birthday:         NaiveDate::from_ymd_opt(1995, 4, 1).unwrap(),
            gender:           1,
            job_change_count: 2,
            final_education:  4,
        }
    }

    #[test]
    fn test_診断クエリは全条件をバインドパラメータで組み立てる() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let builder = build_diagnosis_query(AgentId::new(1), &param(), today);
        let sql = builder.sql();

        let conditions = sql
            .split_once(" WHERE ")
            .map(|(_, conditions)| conditions)
            .unwrap();
        assert_eq!(
            conditions,
            "ji.is_deleted = FALSE AND ji.is_external = FALSE\
             \x20AND b.agent_id = $1\
             \x20AND ji.recruitment_state = $2\
             \x20AND (ji.gender_requirement = $3 OR ji.gender_requirement = $4)\
             \x20AND (ji.age_under IS NULL OR ji.age_under >= $5)\
             \x20AND (ji.age_over IS NULL OR ji.age_over <= $6)\
             \x20AND (ji.job_change_limit IS NULL OR ji.job_change_limit >= $7)\
             \x20AND (ji.education_requirement IS NULL OR ji.education_requirement <= $8)\
             \x20ORDER BY ji.id DESC"
        );
    }

    #[test]
    fn test_診断クエリは削除済みと外部求人を除外する() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let builder = build_diagnosis_query(AgentId::new(1), &param(), today);

        assert!(builder.sql().contains("ji.is_deleted = FALSE"));
        assert!(builder.sql().contains("ji.is_external = FALSE"));
    }

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresJobInformationRepository>();
    }
}
