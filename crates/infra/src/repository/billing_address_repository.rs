//! # BillingAddressRepository
//!
//! 求人企業（請求先）の永続化を担当するリポジトリ。
//! 取得系は担当 RA スタッフ名を JOIN して返す。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recruitlink_domain::{
    agent::{AgentId, AgentStaffId},
    billing_address::{BillingAddress, BillingAddressId, BillingAddressPatch},
    free_word::FreeWord,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::TxContext,
    error::{InfraError, OptionalRowExt},
    sql::{PatchUpdate, push_free_word},
};

/// 請求先リポジトリトレイト
#[async_trait]
pub trait BillingAddressRepository: Send + Sync {
    async fn create(&self, billing_address: &mut BillingAddress) -> Result<(), InfraError>;

    async fn find_by_id(&self, id: BillingAddressId) -> Result<BillingAddress, InfraError>;

    async fn get_by_agent_id(&self, agent_id: AgentId)
    -> Result<Vec<BillingAddress>, InfraError>;

    /// エージェント内の請求先をフリーワードで検索する
    ///
    /// 数値なら ID の完全一致、それ以外は企業名の全文検索。空文字列は絞り込みなし。
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<BillingAddress>, InfraError>;

    async fn get_by_id_list(
        &self,
        ids: &[BillingAddressId],
    ) -> Result<Vec<BillingAddress>, InfraError>;

    async fn update(
        &self,
        id: BillingAddressId,
        patch: &BillingAddressPatch,
    ) -> Result<(), InfraError>;

    async fn delete(&self, id: BillingAddressId) -> Result<(), InfraError>;

    /// 請求先を削除し、紐づく求人を論理削除する
    ///
    /// 求人は選考履歴から参照されるため物理削除しない。
    /// どちらかの文が失敗した場合はトランザクションごとロールバックされる。
    async fn delete_with_job_informations(
        &self,
        tx: &mut TxContext,
        id: BillingAddressId,
    ) -> Result<(), InfraError>;
}

/// PostgreSQL 実装の BillingAddressRepository
#[derive(Debug, Clone)]
pub struct PostgresBillingAddressRepository {
    pool: PgPool,
}

impl PostgresBillingAddressRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_BILLING_ADDRESS: &str = r#"
    SELECT
        b.id,
        b.uuid,
        b.agent_id,
        b.agent_staff_id,
        b.company_name,
        b.address,
        b.contact_name,
        b.contact_email,
        b.contact_phone_number,
        b.billing_condition,
        b.created_at,
        b.updated_at,
        s.staff_name AS ra_staff_name
    FROM billing_addresses b
    INNER JOIN agent_staffs s ON s.id = b.agent_staff_id
"#;

#[derive(sqlx::FromRow)]
struct BillingAddressRow {
    id:                   i64,
    uuid:                 Uuid,
    agent_id:             i64,
    agent_staff_id:       i64,
    company_name:         String,
    address:              String,
    contact_name:         String,
    contact_email:        String,
    contact_phone_number: String,
    billing_condition:    String,
    created_at:           DateTime<Utc>,
    updated_at:           DateTime<Utc>,
    ra_staff_name:        String,
}

impl From<BillingAddressRow> for BillingAddress {
    fn from(row: BillingAddressRow) -> Self {
        Self {
            id:                   BillingAddressId::new(row.id),
            uuid:                 row.uuid,
            agent_id:             AgentId::new(row.agent_id),
            agent_staff_id:       AgentStaffId::new(row.agent_staff_id),
            company_name:         row.company_name,
            address:              row.address,
            contact_name:         row.contact_name,
            contact_email:        row.contact_email,
            contact_phone_number: row.contact_phone_number,
            billing_condition:    row.billing_condition,
            created_at:           row.created_at,
            updated_at:           row.updated_at,
            ra_staff_name:        row.ra_staff_name,
        }
    }
}

#[async_trait]
impl BillingAddressRepository for PostgresBillingAddressRepository {
    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.create", fields(agent_id = %billing_address.agent_id))]
    async fn create(&self, billing_address: &mut BillingAddress) -> Result<(), InfraError> {
        let now = Utc::now();
        let uuid = Uuid::now_v7();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO billing_addresses (
                uuid, agent_id, agent_staff_id, company_name, address, contact_name,
                contact_email, contact_phone_number, billing_condition, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id
            "#,
        )
        .bind(uuid)
        .bind(billing_address.agent_id.as_i64())
        .bind(billing_address.agent_staff_id.as_i64())
        .bind(&billing_address.company_name)
        .bind(&billing_address.address)
        .bind(&billing_address.contact_name)
        .bind(&billing_address.contact_email)
        .bind(&billing_address.contact_phone_number)
        .bind(&billing_address.billing_condition)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        billing_address.id = BillingAddressId::new(id);
        billing_address.uuid = uuid;
        billing_address.created_at = now;
        billing_address.updated_at = now;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.find_by_id", fields(%id))]
    async fn find_by_id(&self, id: BillingAddressId) -> Result<BillingAddress, InfraError> {
        let row: Option<BillingAddressRow> =
            sqlx::query_as(&format!("{SELECT_BILLING_ADDRESS} WHERE b.id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(BillingAddress::from)
            .or_not_found("BillingAddress", id)
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.get_by_agent_id", fields(%agent_id))]
    async fn get_by_agent_id(
        &self,
        agent_id: AgentId,
    ) -> Result<Vec<BillingAddress>, InfraError> {
        let rows: Vec<BillingAddressRow> = sqlx::query_as(&format!(
            "{SELECT_BILLING_ADDRESS} WHERE b.agent_id = $1 ORDER BY b.id DESC"
        ))
        .bind(agent_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BillingAddress::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.get_by_agent_id_and_free_word", fields(%agent_id))]
    async fn get_by_agent_id_and_free_word(
        &self,
        agent_id: AgentId,
        free_word: &str,
    ) -> Result<Vec<BillingAddress>, InfraError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("{SELECT_BILLING_ADDRESS} WHERE b.agent_id = "));
        builder.push_bind(agent_id.as_i64());
        push_free_word(
            &mut builder,
            &FreeWord::parse(free_word),
            "b.id",
            "b.company_name",
        );
        builder.push(" ORDER BY b.id DESC");

        let rows: Vec<BillingAddressRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BillingAddress::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.get_by_id_list", fields(count = ids.len()))]
    async fn get_by_id_list(
        &self,
        ids: &[BillingAddressId],
    ) -> Result<Vec<BillingAddress>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<BillingAddressRow> = sqlx::query_as(&format!(
            "{SELECT_BILLING_ADDRESS} WHERE b.id = ANY($1) ORDER BY b.id ASC"
        ))
        .bind(BillingAddressId::to_i64_vec(ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BillingAddress::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.update", fields(%id))]
    async fn update(
        &self,
        id: BillingAddressId,
        patch: &BillingAddressPatch,
    ) -> Result<(), InfraError> {
        let mut update = PatchUpdate::new("billing_addresses", Utc::now());
        update
            .set("agent_staff_id", patch.agent_staff_id.map(|id| id.as_i64()))
            .set("company_name", patch.company_name.clone())
            .set("address", patch.address.clone())
            .set("contact_name", patch.contact_name.clone())
            .set("contact_email", patch.contact_email.clone())
            .set("contact_phone_number", patch.contact_phone_number.clone())
            .set("billing_condition", patch.billing_condition.clone());

        update
            .finish(id.as_i64())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.delete", fields(%id))]
    async fn delete(&self, id: BillingAddressId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM billing_addresses WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", err, name = "BillingAddressRepository.delete_with_job_informations", fields(%id))]
    async fn delete_with_job_informations(
        &self,
        tx: &mut TxContext,
        id: BillingAddressId,
    ) -> Result<(), InfraError> {
        let now = Utc::now();

        sqlx::query(
            "UPDATE job_informations SET is_deleted = TRUE, updated_at = $2 WHERE billing_address_id = $1",
        )
        .bind(id.as_i64())
        .bind(now)
        .execute(tx.conn())
        .await?;

        sqlx::query("DELETE FROM billing_addresses WHERE id = $1")
            .bind(id.as_i64())
            .execute(tx.conn())
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
        assert_send_sync::<PostgresBillingAddressRepository>();
    }
}
