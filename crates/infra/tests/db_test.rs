//! 接続プール・マイグレーションの統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p recruitlink-infra --test db_test
//! ```

use recruitlink_infra::db;
use sqlx::PgPool;

/// テスト用の DATABASE_URL
fn database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set (check .env)")
}

#[tokio::test]
async fn test_最大接続数を指定してプールを作成できる() {
    let pool = db::create_pool_with(&database_url(), 2).await.unwrap();

    let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();

    assert_eq!(row.0, 1);
    assert_eq!(pool.options().get_max_connections(), 2);
}

#[sqlx::test(migrations = false)]
async fn test_マイグレーションは繰り返し適用できる(pool: PgPool) {
    db::run_migrations(&pool).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);
}
