//! # リポジトリ実装
//!
//! エンティティごとのリポジトリトレイトと PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **トレイト + 実装**: `XRepository` トレイトと `PostgresXRepository` を対で定義し、
//!   呼び出し側はトレイト経由でモックに差し替えられる
//! - **SQL の組み立てのみ**: 業務ルールの検証は行わず、組み立てた SQL を `PgPool` に渡す
//! - **トレース**: 各メソッドは `"<Repository>.<method>"` 名のスパンで計測され、
//!   失敗時はエラーを記録してそのまま返す

pub mod agent_repository;
pub mod agent_staff_repository;
pub mod billing_address_repository;
pub mod chat_group_repository;
pub mod chat_message_repository;
pub mod deployment_reflection_repository;
pub mod interview_task_group_repository;
pub mod interview_task_repository;
pub mod job_information_repository;
pub mod job_information_required_license_repository;
pub mod job_seeker_language_skill_repository;
pub mod job_seeker_repository;
pub mod job_seeker_work_history_repository;
pub mod sending_job_seeker_desired_industry_repository;
pub mod sending_job_seeker_repository;
pub mod sending_phase_repository;
pub mod sending_sale_repository;
pub mod task_group_repository;
pub mod task_repository;

pub use agent_repository::{AgentRepository, PostgresAgentRepository};
pub use agent_staff_repository::{AgentStaffRepository, PostgresAgentStaffRepository};
pub use billing_address_repository::{
    BillingAddressRepository,
    PostgresBillingAddressRepository,
};
pub use chat_group_repository::{ChatGroupRepository, PostgresChatGroupRepository};
pub use chat_message_repository::{ChatMessageRepository, PostgresChatMessageRepository};
pub use deployment_reflection_repository::{
    DeploymentReflectionRepository,
    PostgresDeploymentReflectionRepository,
};
pub use interview_task_group_repository::{
    InterviewTaskGroupRepository,
    PostgresInterviewTaskGroupRepository,
};
pub use interview_task_repository::{InterviewTaskRepository, PostgresInterviewTaskRepository};
pub use job_information_repository::{JobInformationRepository, PostgresJobInformationRepository};
pub use job_information_required_license_repository::{
    JobInformationRequiredLicenseRepository,
    PostgresJobInformationRequiredLicenseRepository,
};
pub use job_seeker_language_skill_repository::{
    JobSeekerLanguageSkillRepository,
    PostgresJobSeekerLanguageSkillRepository,
};
pub use job_seeker_repository::{JobSeekerRepository, PostgresJobSeekerRepository};
pub use job_seeker_work_history_repository::{
    JobSeekerWorkHistoryRepository,
    PostgresJobSeekerWorkHistoryRepository,
};
pub use sending_job_seeker_desired_industry_repository::{
    PostgresSendingJobSeekerDesiredIndustryRepository,
    SendingJobSeekerDesiredIndustryRepository,
};
pub use sending_job_seeker_repository::{
    PostgresSendingJobSeekerRepository,
    SendingJobSeekerRepository,
};
pub use sending_phase_repository::{PostgresSendingPhaseRepository, SendingPhaseRepository};
pub use sending_sale_repository::{PostgresSendingSaleRepository, SendingSaleRepository};
pub use task_group_repository::{PostgresTaskGroupRepository, TaskGroupRepository};
pub use task_repository::{PostgresTaskRepository, TaskRepository};
