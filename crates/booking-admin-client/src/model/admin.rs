use std::fmt;

use booking_admin_normalize::{
    first_string, id_string, optional_count, optional_string, PaginationParams,
};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::{push_text, ListQuery};

// ---------------------------------------------------------------------------
// AuditLog: 管理操作の監査ログ
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub actor_admin_id: Option<String>,
    pub actor_admin_name: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Option<String>,
}

impl AuditLog {
    /// 操作者の表示名。名前 → id → `"-"`。
    pub fn actor_label(&self) -> &str {
        self.actor_admin_name
            .as_deref()
            .or(self.actor_admin_id.as_deref())
            .unwrap_or("-")
    }
}

fn object_or_none(item: &Value, key: &str) -> Option<Value> {
    item.get(key).filter(|v| v.is_object()).cloned()
}

pub fn to_audit_log(item: &Value) -> AuditLog {
    AuditLog {
        id: item.get("id").map(id_string).unwrap_or_default(),
        actor_admin_id: first_string(item, &["actor_admin_id"]),
        actor_admin_name: first_string(item, &["actor_admin_name"]),
        action: first_string(item, &["action"]),
        entity_type: first_string(item, &["entity_type"]),
        entity_id: first_string(item, &["entity_id"]),
        old_values: object_or_none(item, "old_values"),
        new_values: object_or_none(item, "new_values"),
        ip: first_string(item, &["ip", "ip_address"]),
        user_agent: first_string(item, &["user_agent"]),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub actor_admin_id: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ListQuery for AuditLogListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "actor_admin_id", self.actor_admin_id.as_ref());
        push_text(&mut query, "action", self.action.as_ref());
        push_text(&mut query, "entity_type", self.entity_type.as_ref());
        push_text(&mut query, "date_from", self.date_from.as_ref());
        push_text(&mut query, "date_to", self.date_to.as_ref());
        query
    }
}

// ---------------------------------------------------------------------------
// Subscription: 事業所のアプリ内課金
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: Option<String>,
    pub expires_at: Option<String>,
    pub product_id: Option<String>,
    pub workplace_id: Option<String>,
    pub workplace_title: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub fn to_subscription(item: &Value) -> Subscription {
    Subscription {
        id: item.get("id").map(id_string).unwrap_or_default(),
        status: first_string(item, &["status"]),
        expires_at: first_string(item, &["expires_at"]),
        product_id: first_string(item, &["product_id"]),
        workplace_id: item
            .get("workplace_id")
            .map(id_string)
            .filter(|id| !id.is_empty()),
        workplace_title: first_string(item, &["workplace_title", "workplace_name"]),
        created_at: first_string(item, &["created_at"]),
        updated_at: first_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
    pub workplace_id: Option<String>,
}

impl ListQuery for SubscriptionListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "status", self.status.as_ref());
        push_text(&mut query, "workplace_id", self.workplace_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

// ---------------------------------------------------------------------------
// ConfigItem: システム設定のキーと値
// ---------------------------------------------------------------------------

/// 設定値。文字列・数値・真偽値・null のいずれか。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(Number),
    Text(String),
    #[default]
    Null,
}

impl ConfigValue {
    /// 入力欄の文字列を設定値に変換する。
    ///
    /// 空文字列と `"null"` は null、大文字小文字を問わず `true` / `false` は真偽値、
    /// 有限の数値として読めれば数値、それ以外は文字列のまま。
    pub fn parse_input(input: &str) -> Self {
        if input.is_empty() || input == "null" {
            return ConfigValue::Null;
        }
        let lower = input.to_lowercase();
        if lower == "true" || lower == "false" {
            return ConfigValue::Bool(lower == "true");
        }
        let trimmed = input.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return ConfigValue::Number(n.into());
        }
        if let Some(n) = trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .and_then(Number::from_f64)
        {
            return ConfigValue::Number(n);
        }
        ConfigValue::Text(input.to_string())
    }

    /// 真偽値、または `true` / `false` / `1` / `0` と読める値か。
    pub fn is_boolean_like(&self) -> bool {
        match self {
            ConfigValue::Bool(_) => true,
            ConfigValue::Null => false,
            other => matches!(
                other.to_string().to_lowercase().as_str(),
                "true" | "false" | "1" | "0"
            ),
        }
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(b)) => ConfigValue::Bool(*b),
            Some(Value::Number(n)) => ConfigValue::Number(n.clone()),
            Some(Value::String(s)) => ConfigValue::Text(s.clone()),
            _ => ConfigValue::Null,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Text(s) => f.write_str(s),
            ConfigValue::Null => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub id: Option<u64>,
    pub key: String,
    pub value: ConfigValue,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub updated_by_name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub fn to_config_item(item: &Value) -> ConfigItem {
    let updated_by_name = [
        first_string(item, &["updated_by_name"]),
        first_string(item, &["updated_by_last_name"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    ConfigItem {
        id: optional_count(item, &["id"]),
        key: optional_string(item, &["key"]),
        value: ConfigValue::from_json(item.get("value")),
        description: first_string(item, &["description"]),
        updated_by: first_string(item, &["updated_by"]),
        updated_by_name: (!updated_by_name.is_empty()).then_some(updated_by_name),
        created_at: first_string(item, &["created_at"]),
        updated_at: first_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    pub key: String,
    pub value: ConfigValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_actor_label_fallbacks() {
        let log = to_audit_log(&json!({"id": 1, "actor_admin_id": 9, "old_values": "x"}));
        assert_eq!(log.actor_label(), "9");
        assert_eq!(log.old_values, None);
        assert_eq!(to_audit_log(&json!({"id": 2})).actor_label(), "-");
    }

    #[test]
    fn test_config_value_parse_input() {
        assert_eq!(ConfigValue::parse_input(""), ConfigValue::Null);
        assert_eq!(ConfigValue::parse_input("null"), ConfigValue::Null);
        assert_eq!(ConfigValue::parse_input("TRUE"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::parse_input("42"), ConfigValue::Number(42.into()));
        assert_eq!(
            ConfigValue::parse_input("1.5"),
            ConfigValue::Number(Number::from_f64(1.5).unwrap())
        );
        assert_eq!(
            ConfigValue::parse_input("maintenance"),
            ConfigValue::Text("maintenance".into())
        );
    }

    #[test]
    fn test_config_value_serializes_untagged() {
        let req = UpdateConfigRequest {
            key: "max_workers".into(),
            value: ConfigValue::Number(5.into()),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"key": "max_workers", "value": 5})
        );
        let req = UpdateConfigRequest {
            key: "banner".into(),
            value: ConfigValue::Null,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"key": "banner", "value": null})
        );
    }

    #[test]
    fn test_is_boolean_like() {
        assert!(ConfigValue::Bool(false).is_boolean_like());
        assert!(ConfigValue::Text("1".into()).is_boolean_like());
        assert!(ConfigValue::Number(0.into()).is_boolean_like());
        assert!(!ConfigValue::Text("yes".into()).is_boolean_like());
        assert!(!ConfigValue::Null.is_boolean_like());
    }

    #[test]
    fn test_to_config_item() {
        let item = to_config_item(&json!({
            "id": 3,
            "key": "booking_window_days",
            "value": 30,
            "updated_by_name": "Ayşe",
            "updated_by_last_name": "Demir",
            "extra": {"ignored": true}
        }));
        assert_eq!(item.id, Some(3));
        assert_eq!(item.value, ConfigValue::Number(30.into()));
        assert_eq!(item.updated_by_name.as_deref(), Some("Ayşe Demir"));

        let item = to_config_item(&json!({"key": "motd", "value": {"nested": 1}}));
        assert_eq!(item.value, ConfigValue::Null);
        assert_eq!(item.updated_by_name, None);
    }

    #[test]
    fn test_to_subscription() {
        let sub = to_subscription(&json!({
            "id": "sub-1",
            "status": "active",
            "workplace_id": 8,
            "workplace_name": "Merkez"
        }));
        assert_eq!(sub.workplace_id.as_deref(), Some("8"));
        assert_eq!(sub.workplace_title.as_deref(), Some("Merkez"));
    }
}
