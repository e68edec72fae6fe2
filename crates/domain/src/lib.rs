//! # RecruitLink ドメイン層
//!
//! 人材紹介エージェント向け SaaS のデータ構造を定義する。
//!
//! ## 設計方針
//!
//! このクレートはリポジトリ層がやり取りするプレーンなデータ構造を提供する:
//!
//! - **エンティティ**: テーブルの行と 1:1 に対応する構造体（例: JobInformation, JobSeeker）
//! - **ID 型**: 自動採番される数値主キーの Newtype（例: AgentId）
//! - **パッチ型**: 部分更新で変更するフィールドだけを `Some` にする構造体
//! - **検索条件**: フリーワード、診断パラメータ、月範囲などの値オブジェクト
//!
//! ## 依存関係の方向
//!
//! ```text
//! apps → infra → domain
//!   ↓
//! shared
//! ```
//!
//! ドメイン層はデータベースに依存しない。行との変換はインフラ層が担う。
//!
//! ## モジュール構成
//!
//! - [`agent`] - エージェント（人材紹介会社）とスタッフ
//! - [`billing_address`] - 請求先（求人企業）
//! - [`job_information`] - 求人と必須資格、診断パラメータ
//! - [`job_seeker`] - 求職者と語学スキル・職歴
//! - [`sending`] - 送客（他エージェントへの紹介）系エンティティ
//! - [`task`] - 選考タスク
//! - [`interview`] - 面談タスクと KPI
//! - [`chat`] - LINE 連携チャット
//! - [`deployment`] - リリース反映状況
//! - [`free_word`] - フリーワード検索の分類
//! - [`time`] - JST 変換と年齢計算
//!
//! ## 使用例
//!
//! ```rust
//! use recruitlink_domain::{free_word::FreeWord, job_information::JobInformationId};
//!
//! assert_eq!(FreeWord::parse("123"), FreeWord::Id(123));
//! assert!(!JobInformationId::default().is_assigned());
//! ```

#[macro_use]
mod macros;

pub mod agent;
pub mod billing_address;
pub mod chat;
pub mod deployment;
pub mod error;
pub mod free_word;
pub mod interview;
pub mod job_information;
pub mod job_seeker;
pub mod sending;
pub mod task;
pub mod time;

pub use error::DomainError;
