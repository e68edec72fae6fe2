//! # InterviewTaskGroupRepository
//!
//! 求職者との初回面談（インタビュー）の管理単位を扱うリポジトリ。
//! 面談グループは求職者ごとに 1 つ。
//!
//! KPI 集計は面談日が期間内にある求職者数と、そのうち面談実施済みのタスクを持つ
//! 求職者数を `COUNT(DISTINCT ..)` で数える。期間は JST の月境界を UTC に変換して渡す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::{
    agent::{AgentId, AgentStaffId},
    interview::{
        InterviewKpi,
        InterviewTaskGroup,
        InterviewTaskGroupId,
        StaffInterviewKpi,
        interview_phase,
    },
    job_seeker::JobSeekerId,
    time::MonthRange,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{InfraError, OptionalRowExt};

/// 面談グループリポジトリトレイト
#[async_trait]
pub trait InterviewTaskGroupRepository: Send + Sync {
    async fn create(&self, group: &mut InterviewTaskGroup) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: InterviewTaskGroupId)
    -> Result<InterviewTaskGroup, InfraError>;

    async fn find_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<InterviewTaskGroup, InfraError>;

    /// エージェントの面談グループを面談日の新しい順で取得する
    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<InterviewTaskGroup>, InfraError>;

    async fn update_interview_date(
        &self,
        id: InterviewTaskGroupId,
        interview_date: Option<DateTime<Utc>>,
    ) -> Result<(), InfraError>;

    async fn delete(&self, id: InterviewTaskGroupId) -> Result<(), InfraError>;

    /// エージェント全体の面談 KPI を集計する
    async fn get_kpi_by_agent_id_and_period(
        &self,
        agent_id: AgentId,
        period: MonthRange,
    ) -> Result<InterviewKpi, InfraError>;

    /// CA スタッフ別の面談 KPI を集計する
    ///
    /// 期間内に面談が 1 件もないスタッフは結果に含まれない。
    async fn get_staff_kpi_list_by_agent_id_and_period(
        &self,
        agent_id: AgentId,
        period: MonthRange,
    ) -> Result<Vec<StaffInterviewKpi>, InfraError>;
}

/// PostgreSQL 実装の InterviewTaskGroupRepository
#[derive(Debug, Clone)]
pub struct PostgresInterviewTaskGroupRepository {
    pool: PgPool,
}

impl PostgresInterviewTaskGroupRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_INTERVIEW_TASK_GROUP: &str = r#"
    SELECT
        itg.id,
        itg.uuid,
        itg.agent_id,
        itg.job_seeker_id,
        itg.interview_date,
        itg.created_at,
        itg.updated_at,
        js.last_name AS job_seeker_last_name,
        js.first_name AS job_seeker_first_name,
        js.ca_staff_id
    FROM interview_task_groups itg
    INNER JOIN job_seekers js ON js.id = itg.job_seeker_id
"#;

#[derive(sqlx::FromRow)]
struct InterviewTaskGroupRow {
    id:                    i64,
    uuid:                  Uuid,
    agent_id:              i64,
    job_seeker_id:         i64,
    interview_date:        Option<DateTime<Utc>>,
    created_at:            DateTime<Utc>,
    updated_at:            DateTime<Utc>,
    job_seeker_last_name:  String,
    job_seeker_first_name: String,
    ca_staff_id:           i64,
}

impl From<InterviewTaskGroupRow> for InterviewTaskGroup {
    fn from(row: InterviewTaskGroupRow) -> Self {
        Self {
            id:                    InterviewTaskGroupId::new(row.id),
            uuid:                  row.uuid,
            agent_id:              AgentId::new(row.agent_id),
            job_seeker_id:         JobSeekerId::new(row.job_seeker_id),
            interview_date:        row.interview_date,
            created_at:            row.created_at,
            updated_at:            row.updated_at,
            job_seeker_last_name:  row.job_seeker_last_name,
            job_seeker_first_name: row.job_seeker_first_name,
            ca_staff_id:           AgentStaffId::new(row.ca_staff_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct KpiRow {
    interview_count:   i64,
    interviewed_count: i64,
}

#[derive(sqlx::FromRow)]
struct StaffKpiRow {
    ca_staff_id:       i64,
    interview_count:   i64,
    interviewed_count: i64,
}

/// 面談 KPI の集計 SQL
///
/// `$1`: エージェント ID、`$2` / `$3`: 面談日の半開区間、`$4`: 面談実施済みフェーズ
const KPI_SQL: &str = r#"
    SELECT
        COUNT(DISTINCT itg.job_seeker_id) AS interview_count,
        COUNT(DISTINCT itg.job_seeker_id) FILTER (WHERE it.phase_category = $4) AS interviewed_count
    FROM interview_task_groups itg
    LEFT JOIN interview_tasks it ON it.interview_task_group_id = itg.id
    WHERE itg.agent_id = $1
      AND itg.interview_date >= $2
      AND itg.interview_date < $3
"#;

const STAFF_KPI_SQL: &str = r#"
    SELECT
        js.ca_staff_id,
        COUNT(DISTINCT itg.job_seeker_id) AS interview_count,
        COUNT(DISTINCT itg.job_seeker_id) FILTER (WHERE it.phase_category = $4) AS interviewed_count
    FROM interview_task_groups itg
    INNER JOIN job_seekers js ON js.id = itg.job_seeker_id
    LEFT JOIN interview_tasks it ON it.interview_task_group_id = itg.id
    WHERE itg.agent_id = $1
      AND itg.interview_date >= $2
      AND itg.interview_date < $3
    GROUP BY js.ca_staff_id
    ORDER BY js.ca_staff_id ASC
"#;

#[async_trait]
impl InterviewTaskGroupRepository for PostgresInterviewTaskGroupRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.create", fields(job_seeker_id = %group.job_seeker_id))]
    async fn create(&self, group: &mut InterviewTaskGroup) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO interview_task_groups (
                uuid, agent_id, job_seeker_id, interview_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(group.agent_id.as_i64())
        .bind(group.job_seeker_id.as_i64())
        .bind(group.interview_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        group.id = InterviewTaskGroupId::new(id);
        group.uuid = uuid;
        group.created_at = now;
        group.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.find_by_id", fields(%id))]
    async fn find_by_id(
        &self,
        id: InterviewTaskGroupId,
    ) -> Result<InterviewTaskGroup, InfraError> {
        let row: Option<InterviewTaskGroupRow> =
            sqlx::query_as(&format!("{SELECT_INTERVIEW_TASK_GROUP} WHERE itg.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(InterviewTaskGroup::from)
            .or_not_found("InterviewTaskGroup", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.find_by_job_seeker_id", fields(%job_seeker_id))]
    async fn find_by_job_seeker_id(
        &self,
        job_seeker_id: JobSeekerId,
    ) -> Result<InterviewTaskGroup, InfraError> {
        let row: Option<InterviewTaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_INTERVIEW_TASK_GROUP} WHERE itg.job_seeker_id = $1"
        ))
        .bind(job_seeker_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(InterviewTaskGroup::from)
            .or_not_found("InterviewTaskGroup", format!("job_seeker_id={job_seeker_id}"))
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<InterviewTaskGroup>, InfraError> {
        let rows: Vec<InterviewTaskGroupRow> = sqlx::query_as(&format!(
            "{SELECT_INTERVIEW_TASK_GROUP} WHERE itg.agent_id = $1 ORDER BY itg.interview_date DESC NULLS LAST, itg.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InterviewTaskGroup::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.update_interview_date", fields(%id))]
    async fn update_interview_date(
        &self,
        id: InterviewTaskGroupId,
        interview_date: Option<DateTime<Utc>>,
    ) -> Result<(), InfraError> {
        sqlx::query(
            "UPDATE interview_task_groups SET interview_date = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_i64())
        .bind(interview_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "InterviewTaskGroupRepository.delete", fields(%id))]
    async fn delete(&self, id: InterviewTaskGroupId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM interview_task_groups WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        err,
        name = "InterviewTaskGroupRepository.get_kpi_by_agent_id_and_period",
        fields(%agent_id, start = %period.start(), end_exclusive = %period.end_exclusive())
    )]
    async fn get_kpi_by_agent_id_and_period(
        &self,
        agent_id: AgentId,
        period: MonthRange,
    ) -> Result<InterviewKpi, InfraError> {
        let (start, end) = period.to_utc_bounds();

        let row: KpiRow = sqlx::query_as(KPI_SQL)
            .bind(agent_id.as_i64())
            .bind(start)
            .bind(end)
            .bind(interview_phase::INTERVIEWED)
            .fetch_one(&self.pool)
            .await?;

        Ok(InterviewKpi {
            interview_count:   row.interview_count,
            interviewed_count: row.interviewed_count,
        })
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        err,
        name = "InterviewTaskGroupRepository.get_staff_kpi_list_by_agent_id_and_period",
        fields(%agent_id, start = %period.start(), end_exclusive = %period.end_exclusive())
    )]
    async fn get_staff_kpi_list_by_agent_id_and_period(
        &self,
        agent_id: AgentId,
        period: MonthRange,
    ) -> Result<Vec<StaffInterviewKpi>, InfraError> {
        let (start, end) = period.to_utc_bounds();

        let rows: Vec<StaffKpiRow> = sqlx::query_as(STAFF_KPI_SQL)
            .bind(agent_id.as_i64())
            .bind(start)
            .bind(end)
            .bind(interview_phase::INTERVIEWED)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| StaffInterviewKpi {
                ca_staff_id: AgentStaffId::new(row.ca_staff_id),
                kpi:         InterviewKpi {
                    interview_count:   row.interview_count,
                    interviewed_count: row.interviewed_count,
                },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi集計は求職者単位で重複を除いて数える() {
        assert!(KPI_SQL.contains("COUNT(DISTINCT itg.job_seeker_id) AS interview_count"));
        assert!(STAFF_KPI_SQL.contains("GROUP BY js.ca_staff_id"));
    }

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresInterviewTaskGroupRepository>();
    }
}
