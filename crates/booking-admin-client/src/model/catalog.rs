use booking_admin_normalize::{
    first_string, id_string, nested, optional_bool, optional_string, PaginationParams,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{push_text, ListQuery};

// ---------------------------------------------------------------------------
// Industry: 業種
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 欠落・null のときは `None`（有効とも無効とも扱わない）。
    pub is_active: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

pub fn to_industry(item: &Value) -> Industry {
    Industry {
        id: item.get("id").map(id_string).unwrap_or_default(),
        kind: optional_string(item, &["type", "name", "title"]),
        is_active: optional_bool(item, "is_active"),
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndustryRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIndustryRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Service: 提供サービス
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub fn to_service(item: &Value) -> Service {
    Service {
        id: item.get("id").map(id_string).unwrap_or_default(),
        name: optional_string(item, &["name", "title"]),
        description: first_string(item, &["description"]),
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub industry_id: Option<String>,
}

impl ListQuery for ServiceListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "industry_id", self.industry_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// IndustryService: 業種とサービスの対応
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryService {
    pub id: String,
    pub industry_id: Option<String>,
    pub service_id: Option<String>,
    pub industry_name: Option<String>,
    pub service_name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

fn nested_string(item: &Value, path: &[&str]) -> Option<String> {
    let (last, parents) = path.split_last()?;
    nested(item, parents).and_then(|parent| first_string(parent, &[last]))
}

/// サービス名と業種名はフラットなキーとネストした `service` / `industry` の両方を探す。
///
/// `industry_id` がレスポンスにない場合は、問い合わせに使った業種 id を引き継ぐ。
pub fn to_industry_service(item: &Value, industry_id: Option<&str>) -> IndustryService {
    let non_empty_id = |key: &str| {
        item.get(key)
            .map(id_string)
            .filter(|id| !id.is_empty())
    };
    let service_id = non_empty_id("service_id").or_else(|| non_empty_id("id"));

    IndustryService {
        id: non_empty_id("id")
            .or_else(|| service_id.clone())
            .unwrap_or_default(),
        industry_id: non_empty_id("industry_id").or_else(|| industry_id.map(str::to_string)),
        service_id,
        industry_name: first_string(item, &["industry_name"])
            .or_else(|| nested_string(item, &["industry", "type"]))
            .or_else(|| nested_string(item, &["industry", "name"]))
            .or_else(|| first_string(item, &["industry_type"])),
        service_name: first_string(item, &["service_name"])
            .or_else(|| nested_string(item, &["service", "name"]))
            .or_else(|| nested_string(item, &["service", "title"]))
            .or_else(|| first_string(item, &["name", "title"])),
        description: first_string(item, &["description"])
            .or_else(|| nested_string(item, &["service", "description"])),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryServiceListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub industry_id: Option<String>,
    pub service_id: Option<String>,
}

impl ListQuery for IndustryServiceListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "industry_id", self.industry_id.as_ref());
        push_text(&mut query, "service_id", self.service_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryServiceLink {
    pub industry_id: String,
    pub service_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_industry_type_fallbacks() {
        assert_eq!(to_industry(&json!({"id": 1, "type": "Berber"})).kind, "Berber");
        assert_eq!(to_industry(&json!({"id": 1, "name": "Kuaför"})).kind, "Kuaför");
        assert_eq!(to_industry(&json!({"id": 1, "title": "Spa"})).kind, "Spa");
        assert_eq!(to_industry(&json!({"id": 1})).kind, "");
    }

    #[test]
    fn test_to_industry_active_is_tristate() {
        assert_eq!(to_industry(&json!({"id": 1})).is_active, None);
        assert_eq!(to_industry(&json!({"id": 1, "is_active": null})).is_active, None);
        assert_eq!(to_industry(&json!({"id": 1, "is_active": "1"})).is_active, Some(true));
        assert_eq!(to_industry(&json!({"id": 1, "is_active": 0})).is_active, Some(false));
    }

    #[test]
    fn test_industry_serializes_type_key() {
        let body = serde_json::to_value(CreateIndustryRequest {
            kind: "Berber".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"type": "Berber"}));
    }

    #[test]
    fn test_to_service() {
        let service = to_service(&json!({"id": "s-1", "title": "Saç Kesimi", "description": ""}));
        assert_eq!(service.name, "Saç Kesimi");
        assert_eq!(service.description, None);
    }

    #[test]
    fn test_to_industry_service_nested_shapes() {
        let link = to_industry_service(
            &json!({
                "id": 44,
                "service_id": 7,
                "industry": {"type": null, "name": "Berber"},
                "service": {"name": "", "title": "Sakal Tıraşı", "description": "Klasik"}
            }),
            Some("2"),
        );
        assert_eq!(link.id, "44");
        assert_eq!(link.service_id.as_deref(), Some("7"));
        assert_eq!(link.industry_id.as_deref(), Some("2"));
        assert_eq!(link.industry_name.as_deref(), Some("Berber"));
        assert_eq!(link.service_name.as_deref(), Some("Sakal Tıraşı"));
        assert_eq!(link.description.as_deref(), Some("Klasik"));
    }

    #[test]
    fn test_to_industry_service_flat_shape() {
        let link = to_industry_service(
            &json!({"id": "s-9", "industry_id": 3, "industry_type": "Spa", "name": "Masaj"}),
            Some("1"),
        );
        assert_eq!(link.service_id.as_deref(), Some("s-9"));
        assert_eq!(link.industry_id.as_deref(), Some("3"));
        assert_eq!(link.industry_name.as_deref(), Some("Spa"));
        assert_eq!(link.service_name.as_deref(), Some("Masaj"));
    }
}
