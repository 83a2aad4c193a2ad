use booking_admin_normalize::{
    coerce_boolean, first_string, id_string, optional_string, PaginationParams,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{push_opt, ListQuery};

/// パスワードなどの秘密値を本文に載せるときだけ平文にする。
fn expose_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

// ---------------------------------------------------------------------------
// AdminUser: 管理コンソールの利用者
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AdminUser {
    /// 姓名、なければメールアドレス。
    pub fn label(&self) -> String {
        let name = [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

pub fn to_admin_user(item: &Value) -> AdminUser {
    AdminUser {
        id: item.get("id").map(id_string).unwrap_or_default(),
        first_name: optional_string(item, &["first_name"]),
        last_name: optional_string(item, &["last_name"]),
        email: optional_string(item, &["email"]),
        phone_number: first_string(item, &["phone_number", "phone"]),
        is_active: item.get("is_active").is_some_and(coerce_boolean),
        is_super_admin: item.get("is_super_admin").is_some_and(coerce_boolean),
        last_login_at: first_string(item, &["last_login_at"]),
        created_at: optional_string(item, &["created_at"]),
        updated_at: optional_string(item, &["updated_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub is_active: Option<bool>,
    pub is_super_admin: Option<bool>,
}

impl ListQuery for AdminListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_opt(&mut query, "is_active", self.is_active.as_ref());
        push_opt(&mut query, "is_super_admin", self.is_super_admin.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_super_admin: Option<bool>,
}

/// パスワードを省略するとサーバー側で生成される。
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResetAdminPasswordRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(
        serialize_with = "expose_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
}

// ---------------------------------------------------------------------------
// 認証
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AdminLoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminRegisterRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// ログイン・登録の結果。トークンの保管は呼び出し側が行う。
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub message: String,
    pub admin: AdminUser,
    pub token: SecretString,
}

pub fn to_admin_session(response: &Value) -> AdminSession {
    let admin = response
        .get("admin")
        .filter(|v| v.is_object())
        .map(to_admin_user)
        .unwrap_or_default();
    AdminSession {
        message: optional_string(response, &["message"]),
        admin,
        token: SecretString::new(optional_string(response, &["token", "access_token"])),
    }
}
