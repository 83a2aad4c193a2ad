use booking_admin_normalize::{coerce_boolean, first_string, id_string, optional_bool};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

fn expose_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// FirebaseIdp: Firebase Authentication の外部 ID プロバイダ
// ---------------------------------------------------------------------------

const IDP_FIELDS: &[&str] = &["id", "provider_id", "name", "is_enabled", "created_at"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirebaseIdp {
    pub id: String,
    pub provider_id: Option<String>,
    pub name: Option<String>,
    pub is_enabled: Option<bool>,
    pub created_at: Option<String>,
    /// プロバイダ固有の項目。
    pub extra: Map<String, Value>,
}

impl FirebaseIdp {
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.provider_id.as_deref())
            .unwrap_or(&self.id)
    }
}

pub fn to_firebase_idp(item: &Value) -> FirebaseIdp {
    let extra = item
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(key, _)| !IDP_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    FirebaseIdp {
        id: item
            .get("id")
            .map(id_string)
            .filter(|id| !id.is_empty())
            .or_else(|| first_string(item, &["provider_id"]))
            .unwrap_or_default(),
        provider_id: first_string(item, &["provider_id"]),
        name: first_string(item, &["name", "display_name"]),
        is_enabled: optional_bool(item, "is_enabled"),
        created_at: first_string(item, &["created_at"]),
        extra,
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateFirebaseIdpRequest {
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(
        serialize_with = "expose_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateFirebaseIdpRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(
        serialize_with = "expose_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_secret: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// App Store レシートの一括検証
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleVerifyBatchRequest {
    pub receipts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppleVerifyBatchResponse {
    pub success: bool,
    /// 検証結果の本文。形はストア側の応答に依存する。
    pub body: Value,
}

pub fn to_apple_verify_batch_response(response: &Value) -> AppleVerifyBatchResponse {
    AppleVerifyBatchResponse {
        success: response.get("success").is_some_and(coerce_boolean),
        body: response.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_firebase_idp_keeps_provider_fields() {
        let idp = to_firebase_idp(&json!({
            "provider_id": "oidc.line",
            "is_enabled": "true",
            "issuer": "https://access.line.me"
        }));
        assert_eq!(idp.id, "oidc.line");
        assert_eq!(idp.label(), "oidc.line");
        assert_eq!(idp.is_enabled, Some(true));
        assert_eq!(idp.extra.get("issuer"), Some(&json!("https://access.line.me")));
        assert!(!idp.extra.contains_key("provider_id"));
    }

    #[test]
    fn test_is_enabled_absent_is_none() {
        let idp = to_firebase_idp(&json!({"id": 3, "name": "Google", "is_enabled": null}));
        assert_eq!(idp.id, "3");
        assert_eq!(idp.label(), "Google");
        assert!(idp.is_enabled.is_none());
    }

    #[test]
    fn test_client_secret_only_in_body() {
        let req = UpdateFirebaseIdpRequest {
            id: "oidc.line".into(),
            client_secret: Some(SecretString::new("s3".into())),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"client_secret": "s3"})
        );
        assert!(!format!("{req:?}").contains("s3\""));
    }

    #[test]
    fn test_apple_verify_batch_response() {
        let res = to_apple_verify_batch_response(&json!({"success": 1, "verified": 2}));
        assert!(res.success);
        assert_eq!(res.body["verified"], 2);
        assert!(!to_apple_verify_batch_response(&Value::Null).success);
    }
}
