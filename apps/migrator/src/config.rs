//! # Migrator 設定
//!
//! 環境変数から接続設定を読み込む。

use std::env;

use anyhow::Context as _;
use recruitlink_infra::db::DEFAULT_MAX_CONNECTIONS;

/// Migrator の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorConfig {
    /// データベース接続 URL
    pub database_url:    String,
    /// 接続プールの最大接続数
    pub max_connections: u32,
}

impl MigratorConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `.env` ファイルがあれば先に読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .context("DATABASE_URL が設定されていません")?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().with_context(|| {
                format!("DATABASE_MAX_CONNECTIONS は正の整数である必要があります: {raw}")
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        anyhow::ensure!(
            max_connections > 0,
            "DATABASE_MAX_CONNECTIONS は 1 以上である必要があります"
        );

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}
