use booking_admin_normalize::{
    coerce_boolean, first_string, id_string, optional_count, optional_string, PaginationParams,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{push_opt, ListQuery};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workplace {
    pub id: String,
    pub name: String,
    pub industry_type_id: Option<u64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub fn to_workplace(item: &Value) -> Workplace {
    Workplace {
        id: item.get("id").map(id_string).unwrap_or_default(),
        name: optional_string(item, &["title", "name"]),
        industry_type_id: optional_count(item, &["industry_type_id"]),
        address: first_string(item, &["address"]),
        phone: first_string(item, &["phone", "phone_number"]),
        is_active: item.get("is_active").is_some_and(coerce_boolean),
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub industry_type_id: Option<u64>,
}

impl ListQuery for WorkplaceListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_opt(&mut query, "industry_type_id", self.industry_type_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkplaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_type_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkplaceRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_type_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_workplace_title_over_name() {
        let workplace = to_workplace(&json!({
            "id": "wp-1",
            "title": "Merkez Şube",
            "name": "old-name",
            "industry_type_id": "3",
            "is_active": "true"
        }));
        assert_eq!(workplace.name, "Merkez Şube");
        assert_eq!(workplace.industry_type_id, Some(3));
        assert!(workplace.is_active);
    }

    #[test]
    fn test_to_workplace_name_fallback_and_phone_alias() {
        let workplace = to_workplace(&json!({
            "id": 5,
            "title": null,
            "name": "Kadıköy",
            "phone_number": "02161234567",
            "is_active": "yes"
        }));
        assert_eq!(workplace.id, "5");
        assert_eq!(workplace.name, "Kadıköy");
        assert_eq!(workplace.phone.as_deref(), Some("02161234567"));
        assert!(!workplace.is_active);
    }
}
