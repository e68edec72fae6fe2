//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成失敗など、ドメイン固有の例外状態を表現するエラー型。
//!
//! ## 設計方針
//!
//! - **型による分類**: エラーの種類を列挙型で明示し、パターンマッチで処理可能に
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use recruitlink_domain::DomainError;
//!
//! fn validate_month(month: u32) -> Result<(), DomainError> {
//!     if !(1..=12).contains(&month) {
//!         return Err(DomainError::Validation(format!("月が不正です: {month}")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_month(13).is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値が値オブジェクトの制約に違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 存在しない年月の指定
    /// - 終了月が開始月より前
    /// - 文字列で保存された区分値が未知
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
