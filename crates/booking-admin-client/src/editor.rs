//! ロール権限エディタ。
//!
//! 選択中ロールの権限集合を、サーバーから取得した基準値（baseline）と
//! 編集中の作業コピーの 2 つで管理する。最初のトグルで基準値の名前を
//! 作業コピーへ写し、以後は保存するまで作業コピーだけを変更する。
//!
//! ```text
//!   select_role ──► Clean ──toggle──► Dirty ──toggle──► Dirty
//!                     ▲                 │
//!                     └──── save OK ────┘   (save NG は Dirty のまま)
//! ```

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::AdminError;
use crate::model::{Permission, RoleDetail};
use crate::role_store::RolePermissionsApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// 表示中の権限は基準値そのもの。
    Clean,
    /// 作業コピーに未保存の変更がある（内容が基準値と同じでもよい）。
    Dirty,
}

/// 画面の 1 行。権限と、現在の表示上の付与状態。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRow {
    pub permission: Permission,
    pub granted: bool,
}

/// [`Permission::group_key`] ごとの行のまとまり。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGroup {
    pub key: String,
    pub rows: Vec<PermissionRow>,
}

/// 権限カタログをグループキー順にまとめる。グループ内はカタログの順序を保つ。
pub fn group_permissions(catalog: &[Permission], granted: &[String]) -> Vec<PermissionGroup> {
    let mut groups: BTreeMap<&str, Vec<PermissionRow>> = BTreeMap::new();
    for permission in catalog {
        groups
            .entry(permission.group_key())
            .or_default()
            .push(PermissionRow {
                permission: permission.clone(),
                granted: granted.iter().any(|name| *name == permission.name),
            });
    }
    groups
        .into_iter()
        .map(|(key, rows)| PermissionGroup {
            key: key.to_string(),
            rows,
        })
        .collect()
}

pub struct PermissionEditor<A> {
    api: A,
    selected: Option<String>,
    baseline: Option<RoleDetail>,
    working: Vec<String>,
    state: EditorState,
}

impl<A: RolePermissionsApi> PermissionEditor<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            selected: None,
            baseline: None,
            working: Vec::new(),
            state: EditorState::Clean,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state == EditorState::Dirty
    }

    pub fn selected_role(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 最後に取得できたロール詳細。取得に失敗した場合は `None`。
    pub fn baseline(&self) -> Option<&RoleDetail> {
        self.baseline.as_ref()
    }

    /// ロールを選択し、その詳細を取得する。
    ///
    /// 未保存の作業コピーは破棄される。取得に失敗しても選択は残り、
    /// [`reload`](Self::reload) で再試行できる。
    pub async fn select_role(&mut self, role_id: &str) -> Result<&RoleDetail, AdminError> {
        if self.has_unsaved_changes() {
            warn!(
                from = self.selected.as_deref().unwrap_or_default(),
                to = role_id,
                "未保存の権限変更を破棄"
            );
        }
        self.selected = Some(role_id.to_string());
        self.discard_changes();
        self.baseline = None;
        self.fetch_baseline(role_id).await
    }

    /// 選択中ロールの詳細を取り直す。作業コピーは破棄される。
    pub async fn reload(&mut self) -> Result<&RoleDetail, AdminError> {
        let role_id = self.selected.clone().ok_or(AdminError::NoRoleSelected)?;
        self.discard_changes();
        self.fetch_baseline(&role_id).await
    }

    async fn fetch_baseline(&mut self, role_id: &str) -> Result<&RoleDetail, AdminError> {
        match self.api.fetch_role_detail(role_id).await {
            Ok(detail) => {
                info!(
                    role_id = role_id,
                    permissions = detail.permissions.len(),
                    "ロール詳細を取得"
                );
                Ok(self.baseline.insert(detail))
            }
            Err(e) => {
                warn!(role_id = role_id, error = %e, "ロール詳細の取得に失敗");
                Err(e)
            }
        }
    }

    fn baseline_names(&self) -> Vec<String> {
        self.baseline
            .as_ref()
            .map(RoleDetail::permission_names)
            .unwrap_or_default()
    }

    fn discard_changes(&mut self) {
        self.working.clear();
        self.state = EditorState::Clean;
    }

    /// 権限 1 件の付与状態を反転する。ロール未選択、またはロール詳細が
    /// 未取得なら何もせず `false` を返す。
    ///
    /// 同じ権限を 2 回反転すると内容は元に戻るが、状態は `Dirty` のまま。
    pub fn toggle_permission(&mut self, name: &str) -> bool {
        if self.selected.is_none() {
            warn!(permission = name, "ロール未選択のため権限を変更しない");
            return false;
        }
        if self.baseline.is_none() {
            warn!(
                role_id = self.selected.as_deref().unwrap_or_default(),
                permission = name,
                "ロール詳細が未取得のため権限を変更しない"
            );
            return false;
        }
        if self.state == EditorState::Clean {
            self.working = self.baseline_names();
            self.state = EditorState::Dirty;
        }
        if let Some(pos) = self.working.iter().position(|n| n == name) {
            self.working.remove(pos);
        } else {
            self.working.push(name.to_string());
        }
        true
    }

    /// 画面に表示すべき権限名。`Dirty` なら作業コピー、`Clean` なら基準値。
    pub fn effective_permissions(&self) -> Vec<String> {
        match self.state {
            EditorState::Dirty => self.working.clone(),
            EditorState::Clean => self.baseline_names(),
        }
    }

    pub fn is_granted(&self, name: &str) -> bool {
        match self.state {
            EditorState::Dirty => self.working.iter().any(|n| n == name),
            EditorState::Clean => self
                .baseline
                .as_ref()
                .is_some_and(|b| b.permissions.iter().any(|p| p.name == name)),
        }
    }

    /// カタログを表示用にまとめ、現在の付与状態を添える。
    pub fn grouped_catalog(&self, catalog: &[Permission]) -> Vec<PermissionGroup> {
        group_permissions(catalog, &self.effective_permissions())
    }

    /// 表示中の権限集合を丸ごと保存する。
    ///
    /// ロール詳細を一度も取得できていない場合は何も送らず
    /// [`AdminError::RoleNotLoaded`] を返す。
    ///
    /// 失敗した場合は作業コピーと状態をそのまま残す。成功した場合は `Clean` に戻り、
    /// 基準値をサーバーから取り直す。取り直しに失敗したときは保存した名前から基準値を組み立てる。
    pub async fn save(&mut self) -> Result<(), AdminError> {
        let role_id = self.selected.clone().ok_or(AdminError::NoRoleSelected)?;
        if self.baseline.is_none() {
            warn!(role_id = %role_id, "ロール詳細が未取得のため保存しない");
            return Err(AdminError::RoleNotLoaded(role_id));
        }
        let names = self.effective_permissions();

        if let Err(e) = self.api.replace_role_permissions(&role_id, &names).await {
            warn!(role_id = %role_id, error = %e, "権限の保存に失敗");
            return Err(e);
        }
        info!(role_id = %role_id, permissions = names.len(), "ロール権限を保存");
        self.discard_changes();

        if self.fetch_baseline(&role_id).await.is_err() {
            warn!(role_id = %role_id, "保存内容から基準値を補う");
            self.baseline = Some(self.synthesize_baseline(&role_id, &names));
        }
        Ok(())
    }

    fn synthesize_baseline(&self, role_id: &str, names: &[String]) -> RoleDetail {
        let previous = self.baseline.clone().unwrap_or_else(|| RoleDetail {
            id: role_id.to_string(),
            ..Default::default()
        });
        let permissions = names
            .iter()
            .map(|name| {
                previous
                    .permissions
                    .iter()
                    .find(|p| p.name == *name)
                    .cloned()
                    .unwrap_or_else(|| Permission {
                        name: name.clone(),
                        ..Default::default()
                    })
            })
            .collect();
        RoleDetail {
            permissions,
            ..previous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role_store::InMemoryRoleStore;
    use std::sync::Arc;

    fn permission(name: &str, group: Option<&str>) -> Permission {
        Permission {
            id: format!("p-{name}"),
            name: name.to_string(),
            group: group.map(str::to_string),
            ..Default::default()
        }
    }

    fn role(id: &str, names: &[&str]) -> RoleDetail {
        RoleDetail {
            id: id.to_string(),
            name: format!("role-{id}"),
            permissions: names.iter().map(|n| permission(n, None)).collect(),
            ..Default::default()
        }
    }

    fn store() -> Arc<InMemoryRoleStore> {
        Arc::new(InMemoryRoleStore::with_roles(vec![
            role("1", &["a", "b"]),
            role("2", &["c"]),
        ]))
    }

    #[tokio::test]
    async fn test_first_toggle_snapshots_baseline() {
        let mut editor = PermissionEditor::new(store());
        editor.select_role("1").await.unwrap();
        assert_eq!(editor.state(), EditorState::Clean);

        assert!(editor.toggle_permission("c"));
        assert_eq!(editor.state(), EditorState::Dirty);
        assert_eq!(editor.effective_permissions(), vec!["a", "b", "c"]);

        editor.toggle_permission("a");
        assert_eq!(editor.effective_permissions(), vec!["b", "c"]);
        assert!(!editor.is_granted("a"));
        assert!(editor.is_granted("c"));
    }

    #[tokio::test]
    async fn test_toggle_without_role_is_ignored() {
        let mut editor = PermissionEditor::new(store());
        assert!(!editor.toggle_permission("a"));
        assert_eq!(editor.state(), EditorState::Clean);
        assert!(editor.effective_permissions().is_empty());
    }

    #[tokio::test]
    async fn test_save_without_role() {
        let mut editor = PermissionEditor::new(store());
        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, AdminError::NoRoleSelected));
    }

    #[tokio::test]
    async fn test_reload_discards_working_copy() {
        let mut editor = PermissionEditor::new(store());
        editor.select_role("2").await.unwrap();
        editor.toggle_permission("x");
        editor.reload().await.unwrap();
        assert!(!editor.has_unsaved_changes());
        assert_eq!(editor.effective_permissions(), vec!["c"]);
    }

    #[tokio::test]
    async fn test_failed_select_keeps_role_without_baseline() {
        let api = store();
        api.set_unavailable(true);
        let mut editor = PermissionEditor::new(Arc::clone(&api));
        assert!(editor.select_role("1").await.is_err());
        assert_eq!(editor.selected_role(), Some("1"));
        assert!(editor.baseline().is_none());
        assert!(editor.effective_permissions().is_empty());

        api.set_unavailable(false);
        editor.reload().await.unwrap();
        assert_eq!(editor.effective_permissions(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unloaded_role_is_not_writable() {
        let api = store();
        api.set_unavailable(true);
        let mut editor = PermissionEditor::new(Arc::clone(&api));
        assert!(editor.select_role("1").await.is_err());
        api.set_unavailable(false);

        assert!(!editor.toggle_permission("c"));
        assert_eq!(editor.state(), EditorState::Clean);

        let err = editor.save().await.unwrap_err();
        assert!(matches!(err, AdminError::RoleNotLoaded(id) if id == "1"));
        assert!(api.submissions().await.is_empty());
    }

    #[test]
    fn test_group_permissions_sorted_keys_and_catalog_order() {
        let catalog = vec![
            permission("workers.edit", Some("workers")),
            permission("misc", None),
            permission("appointments.view", Some("appointments")),
            permission("workers.view", Some("workers")),
        ];
        let groups = group_permissions(&catalog, &["workers.view".to_string()]);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["appointments", "other", "workers"]);

        let workers = &groups[2];
        let names: Vec<&str> = workers
            .rows
            .iter()
            .map(|r| r.permission.name.as_str())
            .collect();
        assert_eq!(names, vec!["workers.edit", "workers.view"]);
        assert!(!workers.rows[0].granted);
        assert!(workers.rows[1].granted);
    }
}
