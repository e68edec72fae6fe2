//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。
//!
//! 各ヘルパーはリポジトリの `create` を経由して行を作成し、採番済みの
//! エンティティを返す。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::{Agent, AgentId, AgentStaff, AgentStaffId, authority, usage_status},
    billing_address::{BillingAddress, BillingAddressId},
    job_information::{JobInformation, JobInformationId, gender_requirement, recruitment_state},
    job_seeker::{JobSeeker, gender},
    sending::SendingJobSeeker,
};
use recruitlink_infra::repository::{
    AgentRepository,
    AgentStaffRepository,
    BillingAddressRepository,
    JobInformationRepository,
    JobSeekerRepository,
    PostgresAgentRepository,
    PostgresAgentStaffRepository,
    PostgresBillingAddressRepository,
    PostgresJobInformationRepository,
    PostgresJobSeekerRepository,
    PostgresSendingJobSeekerRepository,
    SendingJobSeekerRepository,
};
use sqlx::PgPool;

// =============================================================================
// 固定値
// =============================================================================

/// テスト用の固定日付
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

// =============================================================================
// エンティティ生成ヘルパー
// =============================================================================

/// エージェントを作成する
pub async fn insert_agent(pool: &PgPool, name: &str) -> Agent {
    let mut agent = Agent {
        agent_name: name.to_string(),
        agent_name_furigana: "テスト".to_string(),
        office_location: "東京都千代田区".to_string(),
        representative: "代表 太郎".to_string(),
        usage_status: usage_status::ACTIVE,
        ..Default::default()
    };
    PostgresAgentRepository::new(pool.clone())
        .create(&mut agent)
        .await
        .expect("エージェント作成に失敗");
    agent
}

/// スタッフを作成する
///
/// メールアドレスは UNIQUE のため呼び出し側で一意な値を渡す。
pub async fn insert_staff(pool: &PgPool, agent_id: AgentId, name: &str, email: &str) -> AgentStaff {
    let mut staff = AgentStaff {
        agent_id,
        staff_name: name.to_string(),
        furigana: "スタッフ".to_string(),
        email: email.to_string(),
        authority: authority::MEMBER,
        usage_status: usage_status::ACTIVE,
        ..Default::default()
    };
    PostgresAgentStaffRepository::new(pool.clone())
        .create(&mut staff)
        .await
        .expect("スタッフ作成に失敗");
    staff
}

/// 請求先を作成する
pub async fn insert_billing_address(
    pool: &PgPool,
    agent_id: AgentId,
    ra_staff_id: AgentStaffId,
    company_name: &str,
) -> BillingAddress {
    let mut billing_address = BillingAddress {
        agent_id,
        agent_staff_id: ra_staff_id,
        company_name: company_name.to_string(),
        address: "東京都港区".to_string(),
        contact_name: "担当 花子".to_string(),
        ..Default::default()
    };
    PostgresBillingAddressRepository::new(pool.clone())
        .create(&mut billing_address)
        .await
        .expect("請求先作成に失敗");
    billing_address
}

/// 条件なし・募集中の求人のひな形
pub fn new_job_information(billing_address_id: BillingAddressId, title: &str) -> JobInformation {
    JobInformation {
        billing_address_id,
        title: title.to_string(),
        recruitment_state: recruitment_state::OPEN,
        work_location: "東京都".to_string(),
        job_description: "バックエンド開発".to_string(),
        under_income: Some(400),
        over_income: Some(700),
        gender_requirement: gender_requirement::ANY,
        ..Default::default()
    }
}

/// 求人を作成する
pub async fn insert_job_information(pool: &PgPool, job_information: JobInformation) -> JobInformation {
    let mut job_information = job_information;
    PostgresJobInformationRepository::new(pool.clone())
        .create(&mut job_information)
        .await
        .expect("求人作成に失敗");
    job_information
}

/// 求職者を作成する
pub async fn insert_job_seeker(
    pool: &PgPool,
    agent_id: AgentId,
    ca_staff_id: AgentStaffId,
    last_name: &str,
    first_name: &str,
) -> JobSeeker {
    let mut job_seeker = JobSeeker {
        agent_id,
        ca_staff_id,
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        gender: gender::UNKNOWN,
        birthday: Some(date(1995, 4, 1)),
        ..Default::default()
    };
    PostgresJobSeekerRepository::new(pool.clone())
        .create(&mut job_seeker)
        .await
        .expect("求職者作成に失敗");
    job_seeker
}

/// 送客求職者を作成する
pub async fn insert_sending_job_seeker(
    pool: &PgPool,
    agent_id: AgentId,
    agent_staff_id: AgentStaffId,
    last_name: &str,
) -> SendingJobSeeker {
    let mut sending_job_seeker = SendingJobSeeker {
        agent_id,
        agent_staff_id,
        last_name: last_name.to_string(),
        first_name: "Taro".to_string(),
        ..Default::default()
    };
    PostgresSendingJobSeekerRepository::new(pool.clone())
        .create(&mut sending_job_seeker)
        .await
        .expect("送客求職者作成に失敗");
    sending_job_seeker
}

/// エージェント・スタッフ・請求先・求人を 1 件ずつ作成する
pub struct Seed {
    pub agent:           Agent,
    pub staff:           AgentStaff,
    pub billing_address: BillingAddress,
    pub job_information: JobInformation,
}

pub async fn seed(pool: &PgPool) -> Seed {
    let agent = insert_agent(pool, "Test Agent").await;
    let staff = insert_staff(pool, agent.id, "RA Staff", "ra@example.com").await;
    let billing_address = insert_billing_address(pool, agent.id, staff.id, "Acme").await;
    let job_information =
        insert_job_information(pool, new_job_information(billing_address.id, "Backend Engineer"))
            .await;
    Seed {
        agent,
        staff,
        billing_address,
        job_information,
    }
}

/// 存在しない ID
pub fn missing_job_information_id() -> JobInformationId {
    JobInformationId::new(999_999)
}
