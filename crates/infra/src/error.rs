//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Database, NotFound 等）
//!
//! リポジトリの各メソッドは `#[tracing::instrument(err)]` でエラーを記録したうえで
//! そのまま呼び出し元に返す。リトライは行わない。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// `From<sqlx::Error>` や convenience constructor で生成すると、
/// その時点のスパン（`AgentRepository.find_by_id` 等）が自動的にキャプチャされる。
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::NotFound { entity, id } => { /* 404 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL の実行失敗、接続エラー、制約違反など。ドライバのエラーをそのまま保持する。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 対象レコードが存在しない
    ///
    /// `find_*` 系メソッドで行が見つからなかった場合に使用する。
    #[error("レコードが見つかりません: {entity}(id={id})")]
    NotFound {
        /// エンティティ名（例: "JobInformation"）
        entity: String,
        /// 検索キー
        id:     String,
    },

    /// 呼び出し側の入力が不正
    ///
    /// 一括更新に空の ID リストが渡された場合など。
    #[error("入力エラー: {0}")]
    InvalidInput(String),

    /// 予期しないエラー
    ///
    /// 行からドメインモデルへの変換失敗など。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// NotFound かどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, InfraErrorKind::NotFound { .. })
    }

    /// InfraError を分解して InfraErrorKind と SpanTrace を取り出す
    pub fn into_parts(self) -> (InfraErrorKind, SpanTrace) {
        (self.kind, self.span_trace)
    }

    // ===== Convenience constructors =====

    /// レコード未検出エラーを生成する
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self {
            kind:       InfraErrorKind::NotFound {
                entity: entity.into(),
                id:     id.to_string(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 入力エラーを生成する
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidInput(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

/// `fetch_optional` の結果を NotFound 付きの Result に変換する
pub(crate) trait OptionalRowExt<T> {
    fn or_not_found(self, entity: &str, id: impl ToString) -> Result<T, InfraError>;
}

impl<T> OptionalRowExt<T> for Option<T> {
    fn or_not_found(self, entity: &str, id: impl ToString) -> Result<T, InfraError> {
        self.ok_or_else(|| InfraError::not_found(entity, id))
    }
}
