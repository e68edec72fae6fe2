//! # RecruitLink 共有ユーティリティ
//!
//! ワークスペース内のバイナリとライブラリが共通で使うユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - subscriber 関連の依存は `observability` feature を有効にしたときだけ取り込む

pub mod observability;

pub use observability::{LogFormat, TracingConfig};
