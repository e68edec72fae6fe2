//! # 請求先
//!
//! 求人を出す企業（請求先）。RA スタッフが担当し、求人はいずれかの請求先に属する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentId, AgentStaffId};

define_serial_id! {
    /// 請求先 ID
    pub struct BillingAddressId;
}

impl_id_list!(BillingAddressId);

/// 請求先（求人企業）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    pub id:                   BillingAddressId,
    pub uuid:                 Uuid,
    pub agent_id:             AgentId,
    /// 担当 RA
    pub agent_staff_id:       AgentStaffId,
    pub company_name:         String,
    pub address:              String,
    pub contact_name:         String,
    pub contact_email:        String,
    pub contact_phone_number: String,
    /// 請求条件（手数料率など自由記述）
    pub billing_condition:    String,
    pub created_at:           DateTime<Utc>,
    pub updated_at:           DateTime<Utc>,

    /// JOIN で取得する表示用フィールド（保存対象外）
    pub ra_staff_name: String,
}

/// 請求先の部分更新
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingAddressPatch {
    pub agent_staff_id:       Option<AgentStaffId>,
    pub company_name:         Option<String>,
    pub address:              Option<String>,
    pub contact_name:         Option<String>,
    pub contact_email:        Option<String>,
    pub contact_phone_number: Option<String>,
    pub billing_condition:    Option<String>,
}
