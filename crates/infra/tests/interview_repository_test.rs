//! InterviewTaskGroupRepository / InterviewTaskRepository 統合テスト
//!
//! 面談 KPI の集計は JST の月境界で区切られることを確認する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p recruitlink-infra --test interview_repository_test
//! ```

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{insert_agent, insert_job_seeker, insert_staff};
use pretty_assertions::assert_eq;
use recruitlink_domain::{
    agent::AgentId,
    interview::{
        InterviewKpi,
        InterviewTask,
        InterviewTaskGroup,
        InterviewTaskGroupId,
        StaffInterviewKpi,
        interview_phase,
    },
    job_seeker::JobSeekerId,
    time::MonthRange,
};
use recruitlink_infra::repository::{
    InterviewTaskGroupRepository,
    InterviewTaskRepository,
    PostgresInterviewTaskGroupRepository,
    PostgresInterviewTaskRepository,
};
use sqlx::PgPool;

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

async fn insert_group(
    repo: &PostgresInterviewTaskGroupRepository,
    agent_id: AgentId,
    job_seeker_id: JobSeekerId,
    interview_date: Option<DateTime<Utc>>,
) -> InterviewTaskGroup {
    let mut group = InterviewTaskGroup {
        agent_id,
        job_seeker_id,
        interview_date,
        ..Default::default()
    };
    repo.create(&mut group).await.unwrap();
    group
}

async fn insert_task(
    repo: &PostgresInterviewTaskRepository,
    interview_task_group_id: InterviewTaskGroupId,
    phase_category: i16,
) -> InterviewTask {
    let mut task = InterviewTask {
        interview_task_group_id,
        phase_category,
        ..Default::default()
    };
    repo.create(&mut task).await.unwrap();
    task
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_面談グループを求職者idで取得できる(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let job_seeker = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let repo = PostgresInterviewTaskGroupRepository::new(pool);
    let group = insert_group(&repo, agent.id, job_seeker.id, None).await;

    let found = repo.find_by_job_seeker_id(job_seeker.id).await.unwrap();

    assert_eq!(found.id, group.id);
    assert_eq!(found.job_seeker_last_name, "Yamada");
    assert_eq!(found.ca_staff_id, ca.id);
    assert_eq!(found.interview_date, None);

    let date = utc(2024, 4, 10, 1);
    repo.update_interview_date(group.id, Some(date))
        .await
        .unwrap();
    assert_eq!(
        repo.find_by_id(group.id).await.unwrap().interview_date,
        Some(date)
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_最新の面談タスクを取得できる(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let job_seeker = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let group_repo = PostgresInterviewTaskGroupRepository::new(pool.clone());
    let task_repo = PostgresInterviewTaskRepository::new(pool);
    let group = insert_group(&group_repo, agent.id, job_seeker.id, None).await;

    assert!(
        task_repo
            .find_latest_by_interview_task_group_id(group.id)
            .await
            .unwrap_err()
            .is_not_found()
    );

    insert_task(&task_repo, group.id, interview_phase::SCHEDULING).await;
    let latest = insert_task(&task_repo, group.id, interview_phase::INTERVIEWED).await;

    let found = task_repo
        .find_latest_by_interview_task_group_id(group.id)
        .await
        .unwrap();
    assert_eq!(found.id, latest.id);
    assert_eq!(
        task_repo
            .get_by_interview_task_group_id(group.id)
            .await
            .unwrap()
            .len(),
        2
    );

    task_repo.delete(latest.id).await.unwrap();
    let found = task_repo
        .find_latest_by_interview_task_group_id(group.id)
        .await
        .unwrap();
    assert_eq!(found.phase_category, interview_phase::SCHEDULING);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_面談kpiはjstの月境界で集計する(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca1 = insert_staff(&pool, agent.id, "CA One", "ca1@example.com").await;
    let ca2 = insert_staff(&pool, agent.id, "CA Two", "ca2@example.com").await;
    let group_repo = PostgresInterviewTaskGroupRepository::new(pool.clone());
    let task_repo = PostgresInterviewTaskRepository::new(pool.clone());

    // JST 2024-04-01 00:00 = UTC 2024-03-31 15:00
    let cases = [
        (ca1.id, "Start", utc(2024, 3, 31, 15), true),
        (ca1.id, "Middle", utc(2024, 4, 15, 3), false),
        (ca2.id, "End", utc(2024, 4, 30, 14), true),
        (ca2.id, "NextMonth", utc(2024, 4, 30, 15), true),
        (ca2.id, "PrevMonth", utc(2024, 3, 31, 14), true),
    ];
    for (ca_id, name, interview_date, interviewed) in cases {
        let job_seeker = insert_job_seeker(&pool, agent.id, ca_id, name, "Test").await;
        let group = insert_group(&group_repo, agent.id, job_seeker.id, Some(interview_date)).await;
        insert_task(&task_repo, group.id, interview_phase::SCHEDULING).await;
        if interviewed {
            // 同じ求職者に実施済みタスクが複数あっても 1 人と数える
            insert_task(&task_repo, group.id, interview_phase::INTERVIEWED).await;
            insert_task(&task_repo, group.id, interview_phase::INTERVIEWED).await;
        }
    }
    let period = MonthRange::single(2024, 4).unwrap();

    let kpi = group_repo
        .get_kpi_by_agent_id_and_period(agent.id, period)
        .await
        .unwrap();
    let staff_kpis = group_repo
        .get_staff_kpi_list_by_agent_id_and_period(agent.id, period)
        .await
        .unwrap();

    assert_eq!(
        kpi,
        InterviewKpi {
            interview_count:   3,
            interviewed_count: 2,
        }
    );
    assert_eq!(
        staff_kpis,
        vec![
            StaffInterviewKpi {
                ca_staff_id: ca1.id,
                kpi:         InterviewKpi {
                    interview_count:   2,
                    interviewed_count: 1,
                },
            },
            StaffInterviewKpi {
                ca_staff_id: ca2.id,
                kpi:         InterviewKpi {
                    interview_count:   1,
                    interviewed_count: 1,
                },
            },
        ]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_面談がない期間のkpiはゼロ(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let repo = PostgresInterviewTaskGroupRepository::new(pool);
    let period = MonthRange::single(2024, 4).unwrap();

    let kpi = repo
        .get_kpi_by_agent_id_and_period(agent.id, period)
        .await
        .unwrap();
    let staff_kpis = repo
        .get_staff_kpi_list_by_agent_id_and_period(agent.id, period)
        .await
        .unwrap();

    assert_eq!(kpi, InterviewKpi::default());
    assert!(staff_kpis.is_empty());
}
