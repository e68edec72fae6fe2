//! # SendingSaleRepository
//!
//! 送客の売上（成約見込み・請求）を扱うリポジトリ。
//! 成約月・請求月は月初日の `DATE` として保存する。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use recruitlink_domain::{
    agent::AgentId,
    sending::{SendingJobSeekerId, SendingSale, SendingSaleId, SendingSalePatch},
    time::MonthRange,
};
use sqlx::PgPool;

use crate::{
    error::{InfraError, OptionalRowExt},
    sql::PatchUpdate,
};

/// 送客売上リポジトリトレイト
#[async_trait]
pub trait SendingSaleRepository: Send + Sync {
    async fn create(&self, sale: &mut SendingSale) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: SendingSaleId) -> Result<SendingSale, InfraError>;

    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingSale>, InfraError>;

    /// エージェントの売上のうち、成約月が期間内のものを取得する
    ///
    /// 論理削除済みの送客求職者の売上は含めない。
    async fn get_by_agent_id_and_contract_month_range(
        &self,
        agent_id: AgentId,
        range: MonthRange,
    ) -> Result<Vec<SendingSale>, InfraError>;

    async fn update(&self, id: SendingSaleId, patch: &SendingSalePatch) -> Result<(), InfraError>;

    async fn delete(&self, id: SendingSaleId) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の SendingSaleRepository
#[derive(Debug, Clone)]
pub struct PostgresSendingSaleRepository {
    pool: PgPool,
}

impl PostgresSendingSaleRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_SENDING_SALE: &str = r#"
    SELECT
        ss.id,
        ss.sending_job_seeker_id,
        ss.sending_enterprise_name,
        ss.accuracy,
        ss.expected_sales,
        ss.contract_signed_month,
        ss.billing_month,
        ss.billing_amount,
        ss.created_at,
        ss.updated_at
    FROM sending_sales ss
"#;

#[derive(sqlx::FromRow)]
struct SendingSaleRow {
    id:                      i64,
    sending_job_seeker_id:   i64,
    sending_enterprise_name: String,
    accuracy:                i16,
    expected_sales:          i64,
    contract_signed_month:   Option<NaiveDate>,
    billing_month:           Option<NaiveDate>,
    billing_amount:          Option<i64>,
    created_at:              DateTime<Utc>,
    updated_at:              DateTime<Utc>,
}

impl From<SendingSaleRow> for SendingSale {
    fn from(row: SendingSaleRow) -> Self {
        Self {
            id:                      SendingSaleId::new(row.id),
            sending_job_seeker_id:   SendingJobSeekerId::new(row.sending_job_seeker_id),
            sending_enterprise_name: row.sending_enterprise_name,
            accuracy:                row.accuracy,
            expected_sales:          row.expected_sales,
            contract_signed_month:   row.contract_signed_month,
            billing_month:           row.billing_month,
            billing_amount:          row.billing_amount,
            created_at:              row.created_at,
            updated_at:              row.updated_at,
        }
    }
}

#[async_trait]
impl SendingSaleRepository for PostgresSendingSaleRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingSaleRepository.create", fields(sending_job_seeker_id = %sale.sending_job_seeker_id))]
    async fn create(&self, sale: &mut SendingSale) -> Result<(), InfraError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sending_sales (
                sending_job_seeker_id, sending_enterprise_name, accuracy, expected_sales,
                contract_signed_month, billing_month, billing_amount, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id
            "#,
        )
        .bind(sale.sending_job_seeker_id.as_i64())
        .bind(&sale.sending_enterprise_name)
        .bind(sale.accuracy)
        .bind(sale.expected_sales)
        .bind(sale.contract_signed_month)
        .bind(sale.billing_month)
        .bind(sale.billing_amount)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        sale.id = SendingSaleId::new(id);
        sale.created_at = now;
        sale.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingSaleRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: SendingSaleId) -> Result<SendingSale, InfraError> {
        let row: Option<SendingSaleRow> =
            sqlx::query_as(&format!("{SELECT_SENDING_SALE} WHERE ss.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(SendingSale::from).or_not_found("SendingSale", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingSaleRepository.get_by_sending_job_seeker_id", fields(%sending_job_seeker_id))]
    async fn get_by_sending_job_seeker_id(
        &self,
        sending_job_seeker_id: SendingJobSeekerId,
    ) -> Result<Vec<SendingSale>, InfraError> {
        let rows: Vec<SendingSaleRow> = sqlx::query_as(&format!(
            "{SELECT_SENDING_SALE} WHERE ss.sending_job_seeker_id = $1 ORDER BY ss.id ASC"
        ))
        .bind(sending_job_seeker_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingSale::from).collect())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        err,
        name = "SendingSaleRepository.get_by_agent_id_and_contract_month_range",
        fields(%agent_id, start = %range.start(), end_exclusive = %range.end_exclusive())
    )]
    async fn get_by_agent_id_and_contract_month_range(
        &self,
        agent_id: AgentId,
        range: MonthRange,
    ) -> Result<Vec<SendingSale>, InfraError> {
        let rows: Vec<SendingSaleRow> = sqlx::query_as(&format!(
            r#"
            {SELECT_SENDING_SALE}
            INNER JOIN sending_job_seekers sjs ON sjs.id = ss.sending_job_seeker_id
            WHERE sjs.agent_id = $1
              AND sjs.is_deleted = FALSE
              AND ss.contract_signed_month >= $2
              AND ss.contract_signed_month < $3
            ORDER BY ss.contract_signed_month ASC, ss.id ASC
            "#
        ))
        .bind(agent_id.as_i64())
        .bind(range.start())
        .bind(range.end_exclusive())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SendingSale::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingSaleRepository.update", fields(%id))]
    async fn update(&self, id: SendingSaleId, patch: &SendingSalePatch) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("sending_sales", Utc::now());
        update
            .set(
                "sending_enterprise_name",
                patch.sending_enterprise_name.clone(),
            )
            .set("accuracy", patch.accuracy)
            .set("expected_sales", patch.expected_sales)
            .set("contract_signed_month", patch.contract_signed_month)
            .set("billing_month", patch.billing_month)
            .set("billing_amount", patch.billing_amount);

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "SendingSaleRepository.delete", fields(%id))]
    async fn delete(&self, id: SendingSaleId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM sending_sales WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_リポジトリはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresSendingSaleRepository>();
    }
}
