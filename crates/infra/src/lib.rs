//! # RecruitLink インフラ層
//!
//! 人材紹介エージェント向け SaaS のデータアクセス層。
//!
//! ## 設計方針
//!
//! 各リポジトリは SQL を組み立てて PostgreSQL に渡し、結果の行を
//! ドメイン層のエンティティに詰め替えて返す。業務ルールの検証や
//! 認可はこのクレートの責務外。
//!
//! ## 依存関係
//!
//! ```text
//! migrator → infra → domain
//!     ↘
//!       shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、トランザクション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use recruitlink_domain::agent::AgentId;
//! use recruitlink_infra::{
//!     db,
//!     repository::{JobInformationRepository, PostgresJobInformationRepository},
//! };
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/recruitlink").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let repo = PostgresJobInformationRepository::new(pool);
//!     let jobs = repo.get_by_agent_id(AgentId::new(1)).await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod repository;
mod sql;

pub use error::InfraError;
