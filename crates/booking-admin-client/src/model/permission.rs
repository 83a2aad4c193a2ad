use booking_admin_normalize::{first_string, id_string, normalize_list, optional_bool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// グループ・カテゴリを持たない権限のまとめ先。
pub const UNGROUPED_PERMISSION_KEY: &str = "other";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl Permission {
    /// 権限一覧を画面でまとめるキー。`group` → `category` → `"other"`。
    pub fn group_key(&self) -> &str {
        self.group
            .as_deref()
            .or(self.category.as_deref())
            .unwrap_or(UNGROUPED_PERMISSION_KEY)
    }

    /// 表示ラベル。表示名がなければ権限名。
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

pub fn to_permission(item: &Value) -> Permission {
    Permission {
        id: item.get("id").map(id_string).unwrap_or_default(),
        name: first_string(item, &["name"]).unwrap_or_default(),
        display_name: first_string(item, &["display_name"]),
        description: first_string(item, &["description"]),
        group: first_string(item, &["group"]),
        category: first_string(item, &["category"]),
        is_active: optional_bool(item, "is_active"),
    }
}

fn to_permissions(value: Option<&Value>) -> Vec<Permission> {
    value
        .map(|v| normalize_list(v, &["permissions", "data"]))
        .unwrap_or_default()
        .iter()
        .map(to_permission)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub permissions: Option<Vec<Permission>>,
}

impl Role {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

pub fn to_role(item: &Value) -> Role {
    Role {
        id: item.get("id").map(id_string).unwrap_or_default(),
        name: first_string(item, &["name"]).unwrap_or_default(),
        display_name: first_string(item, &["display_name"]),
        description: first_string(item, &["description"]),
        is_active: optional_bool(item, "is_active"),
        permissions: item
            .get("permissions")
            .filter(|v| v.is_array())
            .map(|v| to_permissions(Some(v))),
    }
}

/// 付与済み権限を必ず持つロール。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetail {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub permissions: Vec<Permission>,
}

impl RoleDetail {
    /// 付与済み権限の名前。空の名前は含めない。
    pub fn permission_names(&self) -> Vec<String> {
        self.permissions
            .iter()
            .filter(|p| !p.name.is_empty())
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// ロール詳細。`{role: {...}}` で包まれていても、権限が欠けていても受け付ける。
pub fn to_role_detail(item: &Value) -> RoleDetail {
    let body = item.get("role").filter(|v| v.is_object()).unwrap_or(item);
    let permissions = to_permissions(body.get("permissions").or_else(|| item.get("permissions")));
    let role = to_role(body);
    RoleDetail {
        id: role.id,
        name: role.name,
        display_name: role.display_name,
        description: role.description,
        is_active: role.is_active,
        permissions,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverrides {
    pub grants: Vec<String>,
    pub revokes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPermissions {
    pub worker_id: String,
    pub role: Role,
    pub effective_permissions: Vec<Permission>,
    pub overrides: Option<PermissionOverrides>,
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(id_string)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub fn to_worker_permissions(item: &Value) -> WorkerPermissions {
    WorkerPermissions {
        worker_id: item.get("worker_id").map(id_string).unwrap_or_default(),
        role: item.get("role").map(to_role).unwrap_or_default(),
        effective_permissions: to_permissions(item.get("effective_permissions")),
        overrides: item
            .get("overrides")
            .filter(|v| v.is_object())
            .map(|o| PermissionOverrides {
                grants: string_list(o.get("grants")),
                revokes: string_list(o.get("revokes")),
            }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRolePermissionsRequest {
    #[serde(skip)]
    pub role_id: String,
    pub permission_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(skip)]
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePermissionRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 従業員のロール変更。id か名前のどちらかで指定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWorkerRoleRequest {
    #[serde(skip)]
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWorkerOverridesRequest {
    #[serde(skip)]
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revokes: Option<Vec<String>>,
    /// true のときロールの既定に戻す。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
}
