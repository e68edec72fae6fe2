//! # RecruitLink Migrator
//!
//! `migrations/` の SQL をデータベースに適用するバイナリ。
//! 適用済みのマイグレーションはスキップされるので、何度実行してもよい。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | 最大接続数（デフォルト: `10`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo run -p recruitlink-migrator
//! ```

mod config;

use anyhow::Context as _;
use config::MigratorConfig;
use recruitlink_infra::db;
use recruitlink_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = MigratorConfig::from_env()?;

    let _app_span = init_tracing(&TracingConfig::from_env("migrator")).entered();

    let pool = db::create_pool_with(&config.database_url, config.max_connections)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!(max_connections = config.max_connections, "データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの適用に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    pool.close().await;
    Ok(())
}
