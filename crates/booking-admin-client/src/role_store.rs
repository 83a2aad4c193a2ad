use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AdminError;
use crate::model::{Permission, RoleDetail};

/// 権限エディタが使うロール権限の読み書き口。
#[async_trait]
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RolePermissionsApi: Send + Sync {
    /// 付与済み権限を含むロール詳細を取得する。
    async fn fetch_role_detail(&self, role_id: &str) -> Result<RoleDetail, AdminError>;

    /// ロールの権限集合を `names` で丸ごと置き換える。
    async fn replace_role_permissions(
        &self,
        role_id: &str,
        names: &[String],
    ) -> Result<(), AdminError>;
}

#[async_trait]
impl<T: RolePermissionsApi + ?Sized> RolePermissionsApi for Arc<T> {
    async fn fetch_role_detail(&self, role_id: &str) -> Result<RoleDetail, AdminError> {
        (**self).fetch_role_detail(role_id).await
    }

    async fn replace_role_permissions(
        &self,
        role_id: &str,
        names: &[String],
    ) -> Result<(), AdminError> {
        (**self).replace_role_permissions(role_id, names).await
    }
}

// ---------------------------------------------------------------------------
// InMemoryRoleStore: テスト・オフライン用
// ---------------------------------------------------------------------------

/// メモリ上のロール集合。送信された権限集合を記録し、障害を注入できる。
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<String, RoleDetail>>,
    catalog: Vec<Permission>,
    submissions: RwLock<Vec<(String, Vec<String>)>>,
    unavailable: AtomicBool,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::with_roles(Vec::new())
    }

    pub fn with_roles(roles: Vec<RoleDetail>) -> Self {
        Self {
            roles: RwLock::new(roles.into_iter().map(|r| (r.id.clone(), r)).collect()),
            catalog: Vec::new(),
            submissions: RwLock::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 置き換え時に権限名から `Permission` を引く権限カタログを設定する。
    pub fn with_catalog(mut self, catalog: Vec<Permission>) -> Self {
        self.catalog = catalog;
        self
    }

    pub async fn add_role(&self, role: RoleDetail) {
        self.roles.write().await.insert(role.id.clone(), role);
    }

    /// true の間、すべての呼び出しが 503 で失敗する。
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// これまでに受け付けた `(role_id, permission_names)` の履歴。
    pub async fn submissions(&self) -> Vec<(String, Vec<String>)> {
        self.submissions.read().await.clone()
    }

    fn check_available(&self) -> Result<(), AdminError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AdminError::Api {
                status: 503,
                message: "role store unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn resolve_permission(&self, previous: &[Permission], name: &str) -> Permission {
        previous
            .iter()
            .chain(self.catalog.iter())
            .find(|p| p.name == name)
            .cloned()
            .unwrap_or_else(|| Permission {
                id: name.to_string(),
                name: name.to_string(),
                ..Default::default()
            })
    }
}

impl Default for InMemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RolePermissionsApi for InMemoryRoleStore {
    async fn fetch_role_detail(&self, role_id: &str) -> Result<RoleDetail, AdminError> {
        self.check_available()?;
        let roles = self.roles.read().await;
        roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| AdminError::NotFound(role_id.to_string()))
    }

    async fn replace_role_permissions(
        &self,
        role_id: &str,
        names: &[String],
    ) -> Result<(), AdminError> {
        self.check_available()?;
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(role_id)
            .ok_or_else(|| AdminError::NotFound(role_id.to_string()))?;
        role.permissions = names
            .iter()
            .map(|name| self.resolve_permission(&role.permissions, name))
            .collect();
        self.submissions
            .write()
            .await
            .push((role_id.to_string(), names.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, names: &[&str]) -> RoleDetail {
        RoleDetail {
            id: id.to_string(),
            name: format!("role-{id}"),
            permissions: names
                .iter()
                .map(|n| Permission {
                    id: format!("p-{n}"),
                    name: (*n).to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_unknown_role_is_not_found() {
        let store = InMemoryRoleStore::new();
        let err = store.fetch_role_detail("9").await.unwrap_err();
        assert!(matches!(err, AdminError::NotFound(id) if id == "9"));
    }

    #[tokio::test]
    async fn test_replace_keeps_known_permission_metadata() {
        let store = InMemoryRoleStore::with_roles(vec![role("1", &["a"])]).with_catalog(vec![
            Permission {
                id: "p-b".into(),
                name: "b".into(),
                group: Some("g".into()),
                ..Default::default()
            },
        ]);
        store
            .replace_role_permissions("1", &["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();

        let detail = store.fetch_role_detail("1").await.unwrap();
        let ids: Vec<&str> = detail.permissions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-a", "p-b", "c"]);
        assert_eq!(store.submissions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_without_recording() {
        let store = InMemoryRoleStore::with_roles(vec![role("1", &[])]);
        store.set_unavailable(true);
        let err = store
            .replace_role_permissions("1", &["a".into()])
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(store.submissions().await.is_empty());
    }
}
