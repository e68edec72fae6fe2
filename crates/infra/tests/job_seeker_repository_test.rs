//! JobSeekerRepository と子テーブル（語学スキル・職歴）の統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p recruitlink-infra --test job_seeker_repository_test
//! ```

mod common;

use common::{date, insert_agent, insert_job_seeker, insert_staff};
use pretty_assertions::assert_eq;
use recruitlink_domain::job_seeker::{
    JobSeekerId,
    JobSeekerLanguageSkill,
    JobSeekerPatch,
    JobSeekerWorkHistory,
};
use recruitlink_infra::{
    db::{PgTransactionManager, TransactionManager},
    repository::{
        JobSeekerLanguageSkillRepository,
        JobSeekerRepository,
        JobSeekerWorkHistoryRepository,
        PostgresJobSeekerLanguageSkillRepository,
        PostgresJobSeekerRepository,
        PostgresJobSeekerWorkHistoryRepository,
    },
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_求職者の取得でca担当者名とエージェント名が設定される(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let created = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let repo = PostgresJobSeekerRepository::new(pool);

    let found = repo.find_by_id(created.id).await.unwrap();

    assert_eq!(found.uuid, created.uuid);
    assert_eq!(found.last_name, "Yamada");
    assert_eq!(found.birthday, Some(date(1995, 4, 1)));
    assert_eq!(found.ca_staff_name, "CA Staff");
    assert_eq!(found.agent_name, "Alpha Agent");
    assert_eq!(repo.find_by_uuid(created.uuid).await.unwrap().id, created.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_担当者ごとに求職者を取得できる(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca1 = insert_staff(&pool, agent.id, "CA One", "ca1@example.com").await;
    let ca2 = insert_staff(&pool, agent.id, "CA Two", "ca2@example.com").await;
    insert_job_seeker(&pool, agent.id, ca1.id, "Yamada", "Hanako").await;
    insert_job_seeker(&pool, agent.id, ca2.id, "Suzuki", "Ichiro").await;
    let repo = PostgresJobSeekerRepository::new(pool);

    let by_ca = repo.get_by_ca_staff_id(ca2.id).await.unwrap();
    let by_agent = repo.get_by_agent_id(agent.id).await.unwrap();

    assert_eq!(by_ca.len(), 1);
    assert_eq!(by_ca[0].last_name, "Suzuki");
    assert_eq!(by_agent.len(), 2);
    assert!(repo.get_by_id_list(&[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_求職者のフリーワード検索は名前とidで振り分ける(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let yamada = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    insert_job_seeker(&pool, agent.id, ca.id, "Suzuki", "Ichiro").await;
    let repo = PostgresJobSeekerRepository::new(pool);

    let by_name = repo
        .get_by_agent_id_and_free_word(agent.id, "hanako")
        .await
        .unwrap();
    let by_id = repo
        .get_by_agent_id_and_free_word(agent.id, &yamada.id.to_string())
        .await
        .unwrap();
    let all = repo.get_by_agent_id_and_free_word(agent.id, "").await.unwrap();

    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, yamada.id);
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id, yamada.id);
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_フェーズ更新とパッチ更新(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let job_seeker = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let repo = PostgresJobSeekerRepository::new(pool);

    repo.update_phase(job_seeker.id, 3).await.unwrap();
    repo.update_phase(job_seeker.id, 3).await.unwrap();
    repo.update(
        job_seeker.id,
        &JobSeekerPatch {
            birthday: Some(None),
            job_change_count: Some(Some(2)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let found = repo.find_by_id(job_seeker.id).await.unwrap();
    assert_eq!(found.phase, 3);
    assert_eq!(found.birthday, None);
    assert_eq!(found.job_change_count, Some(2));
    assert_eq!(found.first_name, "Hanako");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_求職者を削除すると子テーブルも削除される(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let job_seeker = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let repo = PostgresJobSeekerRepository::new(pool.clone());
    let skill_repo = PostgresJobSeekerLanguageSkillRepository::new(pool);
    let mut skill = JobSeekerLanguageSkill {
        job_seeker_id: job_seeker.id,
        language_type: 1,
        language_level: 2,
        ..Default::default()
    };
    skill_repo.create(&mut skill).await.unwrap();
    assert!(skill.id.is_assigned());

    repo.delete(job_seeker.id).await.unwrap();

    assert!(repo.find_by_id(job_seeker.id).await.unwrap_err().is_not_found());
    assert!(
        skill_repo
            .get_by_job_seeker_id(job_seeker.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_語学スキルをまとめて置き換えられる(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let a = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let b = insert_job_seeker(&pool, agent.id, ca.id, "Suzuki", "Ichiro").await;
    let repo = PostgresJobSeekerLanguageSkillRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);
    let skill = |language_type, language_level| JobSeekerLanguageSkill {
        language_type,
        language_level,
        ..Default::default()
    };

    let mut tx = tx_manager.begin().await.unwrap();
    repo.replace_by_job_seeker_id(&mut tx, a.id, &[skill(1, 1), skill(2, 3)])
        .await
        .unwrap();
    repo.replace_by_job_seeker_id(&mut tx, b.id, &[skill(1, 4)])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = tx_manager.begin().await.unwrap();
    repo.replace_by_job_seeker_id(&mut tx, a.id, &[skill(3, 2)])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let skills = repo.get_by_job_seeker_id_list(&[a.id, b.id]).await.unwrap();
    let pairs: Vec<(JobSeekerId, i16, i16)> = skills
        .iter()
        .map(|s| (s.job_seeker_id, s.language_type, s.language_level))
        .collect();
    assert_eq!(pairs, vec![(a.id, 3, 2), (b.id, 1, 4)]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_職歴は入社日の新しい順で返す(pool: PgPool) {
    let agent = insert_agent(&pool, "Alpha Agent").await;
    let ca = insert_staff(&pool, agent.id, "CA Staff", "ca@example.com").await;
    let job_seeker = insert_job_seeker(&pool, agent.id, ca.id, "Yamada", "Hanako").await;
    let repo = PostgresJobSeekerWorkHistoryRepository::new(pool.clone());
    let tx_manager = PgTransactionManager::new(pool);
    let history = |company_name: &str, joining_date| JobSeekerWorkHistory {
        company_name: company_name.to_string(),
        joining_date,
        ..Default::default()
    };

    let mut tx = tx_manager.begin().await.unwrap();
    repo.replace_by_job_seeker_id(
        &mut tx,
        job_seeker.id,
        &[
            history("Unknown", None),
            history("First", Some(date(2015, 4, 1))),
            history("Second", Some(date(2019, 10, 1))),
        ],
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let histories = repo.get_by_job_seeker_id(job_seeker.id).await.unwrap();
    let names: Vec<&str> = histories.iter().map(|h| h.company_name.as_str()).collect();
    assert_eq!(names, vec!["Second", "First", "Unknown"]);

    repo.delete_by_job_seeker_id(job_seeker.id).await.unwrap();
    assert!(
        repo.get_by_job_seeker_id(job_seeker.id)
            .await
            .unwrap()
            .is_empty()
    );
}
