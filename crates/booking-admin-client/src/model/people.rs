use booking_admin_normalize::{
    coerce_boolean, first_string, id_string, optional_count, optional_string, PaginationParams,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{push_opt, push_text, ListQuery};

// ---------------------------------------------------------------------------
// Customer: アプリ利用者
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub address: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }
}

pub fn to_customer(item: &Value) -> Customer {
    Customer {
        id: item.get("id").map(id_string).unwrap_or_default(),
        first_name: optional_string(item, &["first_name"]),
        last_name: optional_string(item, &["last_name"]),
        email: optional_string(item, &["email"]),
        phone_number: first_string(item, &["phone_number", "phone"]),
        is_active: item.get("is_active").is_some_and(coerce_boolean),
        address: first_string(item, &["address"]),
        city: first_string(item, &["city"]),
        district: first_string(item, &["district"]),
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub is_active: Option<bool>,
}

impl ListQuery for CustomerListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_opt(&mut query, "is_active", self.is_active.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

// ---------------------------------------------------------------------------
// Worker: 事業所の従業員
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub workplace_id: Option<String>,
    pub workplace_name: Option<String>,
    pub is_active: bool,
    pub is_author: bool,
    pub role: Option<String>,
    pub role_id: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

fn join_name(first: &str, last: &str) -> String {
    [first, last]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 表示名は `full_name` → 姓名の結合 → `user_name` の順で決める。
pub fn to_worker(item: &Value) -> Worker {
    let first_name = first_string(item, &["first_name"]);
    let last_name = first_string(item, &["last_name"]);
    let combined = join_name(
        first_name.as_deref().unwrap_or_default(),
        last_name.as_deref().unwrap_or_default(),
    );
    let name = first_string(item, &["full_name"])
        .or_else(|| (!combined.is_empty()).then_some(combined))
        .or_else(|| first_string(item, &["user_name", "username"]))
        .unwrap_or_default();

    let role_id = optional_count(item, &["role_id"]).filter(|id| *id > 0);
    let role = first_string(item, &["role", "role_name"])
        .or_else(|| role_id.map(|id| format!("Role {id}")));

    Worker {
        id: item.get("id").map(id_string).unwrap_or_default(),
        name,
        first_name,
        last_name,
        email: optional_string(item, &["email"]),
        phone_number: first_string(item, &["phone_number", "phone"]),
        workplace_id: item
            .get("workplace_id")
            .map(id_string)
            .filter(|id| !id.is_empty()),
        workplace_name: first_string(item, &["workplace_title", "workplace_name"]),
        is_active: item.get("is_active").is_some_and(coerce_boolean),
        is_author: item.get("is_author").is_some_and(coerce_boolean),
        role,
        role_id,
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub workplace_id: Option<String>,
}

impl ListQuery for WorkerListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "workplace_id", self.workplace_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkerRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u64>,
}
