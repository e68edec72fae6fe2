//! TaskGroupRepository / TaskRepository 統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p recruitlink-infra --test task_repository_test
//! ```

mod common;

use chrono::Utc;
use common::{date, insert_job_seeker, seed};
use pretty_assertions::assert_eq;
use recruitlink_domain::{
    job_information::JobInformationId,
    job_seeker::JobSeekerId,
    task::{Task, TaskGroup, TaskGroupId, executor_type},
};
use recruitlink_infra::repository::{
    PostgresTaskGroupRepository,
    PostgresTaskRepository,
    TaskGroupRepository,
    TaskRepository,
};
use sqlx::PgPool;

async fn insert_task_group(
    repo: &PostgresTaskGroupRepository,
    job_seeker_id: JobSeekerId,
    job_information_id: JobInformationId,
) -> TaskGroup {
    let mut task_group = TaskGroup {
        job_seeker_id,
        job_information_id,
        ..Default::default()
    };
    repo.create(&mut task_group).await.unwrap();
    task_group
}

async fn insert_task(repo: &PostgresTaskRepository, task_group_id: TaskGroupId, phase: i16) -> Task {
    let mut task = Task {
        task_group_id,
        phase_category: phase,
        executor_type: executor_type::CA,
        ..Default::default()
    };
    repo.create(&mut task).await.unwrap();
    task
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_タスクグループの取得で表示用フィールドが設定される(pool: PgPool) {
    let seed = seed(&pool).await;
    let job_seeker =
        insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Yamada", "Hanako").await;
    let repo = PostgresTaskGroupRepository::new(pool);
    let created = insert_task_group(&repo, job_seeker.id, seed.job_information.id).await;

    let found = repo.find_by_id(created.id).await.unwrap();

    assert_eq!(found.uuid, created.uuid);
    assert_eq!(found.job_seeker_last_name, "Yamada");
    assert_eq!(found.job_seeker_first_name, "Hanako");
    assert_eq!(found.job_information_title, "Backend Engineer");
    assert_eq!(found.company_name, "Acme");
    assert_eq!(
        repo.get_by_job_information_id(seed.job_information.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(repo.get_by_agent_id(seed.agent.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_入社日と最終依頼日時を更新できる(pool: PgPool) {
    let seed = seed(&pool).await;
    let job_seeker =
        insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Yamada", "Hanako").await;
    let repo = PostgresTaskGroupRepository::new(pool);
    let task_group = insert_task_group(&repo, job_seeker.id, seed.job_information.id).await;

    repo.update_joining_date(task_group.id, Some(date(2025, 4, 1)))
        .await
        .unwrap();
    repo.update_last_request_at(task_group.id, Utc::now())
        .await
        .unwrap();

    let found = repo.find_by_id(task_group.id).await.unwrap();
    assert_eq!(found.joining_date, Some(date(2025, 4, 1)));
    assert!(found.last_request_at.is_some());

    repo.update_joining_date(task_group.id, None).await.unwrap();
    let found = repo.find_by_id(task_group.id).await.unwrap();
    assert_eq!(found.joining_date, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_最新タスクはグループごとに1件返す(pool: PgPool) {
    let seed = seed(&pool).await;
    let a = insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Yamada", "Hanako").await;
    let b = insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Suzuki", "Ichiro").await;
    let group_repo = PostgresTaskGroupRepository::new(pool.clone());
    let task_repo = PostgresTaskRepository::new(pool);
    let group_a = insert_task_group(&group_repo, a.id, seed.job_information.id).await;
    let group_b = insert_task_group(&group_repo, b.id, seed.job_information.id).await;

    insert_task(&task_repo, group_a.id, 0).await;
    insert_task(&task_repo, group_a.id, 1).await;
    let latest_a = insert_task(&task_repo, group_a.id, 2).await;
    let latest_b = insert_task(&task_repo, group_b.id, 0).await;

    let latest = task_repo
        .find_latest_by_task_group_id(group_a.id)
        .await
        .unwrap();
    assert_eq!(latest.id, latest_a.id);
    assert_eq!(latest.phase_category, 2);

    let history = task_repo.get_by_task_group_id(group_a.id).await.unwrap();
    let phases: Vec<i16> = history.iter().map(|t| t.phase_category).collect();
    assert_eq!(phases, vec![0, 1, 2]);

    let latest_list = task_repo
        .get_latest_by_task_group_id_list(&[group_b.id, group_a.id])
        .await
        .unwrap();
    let ids: Vec<_> = latest_list.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![latest_a.id, latest_b.id]);
    assert!(
        task_repo
            .get_latest_by_task_group_id_list(&[])
            .await
            .unwrap()
            .is_empty()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_タスクのないグループの最新タスクはnot_found(pool: PgPool) {
    let seed = seed(&pool).await;
    let job_seeker =
        insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Yamada", "Hanako").await;
    let group_repo = PostgresTaskGroupRepository::new(pool.clone());
    let task_repo = PostgresTaskRepository::new(pool);
    let group = insert_task_group(&group_repo, job_seeker.id, seed.job_information.id).await;

    let err = task_repo
        .find_latest_by_task_group_id(group.id)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_タスクグループを削除するとタスクも削除される(pool: PgPool) {
    let seed = seed(&pool).await;
    let job_seeker =
        insert_job_seeker(&pool, seed.agent.id, seed.staff.id, "Yamada", "Hanako").await;
    let group_repo = PostgresTaskGroupRepository::new(pool.clone());
    let task_repo = PostgresTaskRepository::new(pool);
    let group = insert_task_group(&group_repo, job_seeker.id, seed.job_information.id).await;
    let task = insert_task(&task_repo, group.id, 0).await;

    group_repo.delete(group.id).await.unwrap();

    assert!(task_repo.find_by_id(task.id).await.unwrap_err().is_not_found());
    assert!(
        group_repo
            .get_by_job_seeker_id(job_seeker.id)
            .await
            .unwrap()
            .is_empty()
    );
}
