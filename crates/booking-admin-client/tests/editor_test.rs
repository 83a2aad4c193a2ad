use std::sync::Arc;

use booking_admin_client::model::{Permission, RoleDetail};
use booking_admin_client::{
    AdminError, EditorState, InMemoryRoleStore, PermissionEditor, RolePermissionsApi,
};

fn make_role(id: &str, names: &[&str]) -> RoleDetail {
    RoleDetail {
        id: id.to_string(),
        name: format!("role-{id}"),
        display_name: Some(format!("Rol {id}")),
        permissions: names
            .iter()
            .map(|name| Permission {
                id: format!("p-{name}"),
                name: (*name).to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn make_store() -> Arc<InMemoryRoleStore> {
    Arc::new(InMemoryRoleStore::with_roles(vec![
        make_role("A", &["appointments.view", "workers.view"]),
        make_role("B", &["reports.view"]),
    ]))
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

#[tokio::test]
async fn test_switching_role_discards_toggle() {
    let store = make_store();
    let mut editor = PermissionEditor::new(Arc::clone(&store));

    editor.select_role("A").await.unwrap();
    editor.toggle_permission("reports.view");
    assert!(editor.has_unsaved_changes());

    editor.select_role("B").await.unwrap();
    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(editor.effective_permissions(), vec!["reports.view"]);

    editor.select_role("A").await.unwrap();
    assert_eq!(
        editor.effective_permissions(),
        vec!["appointments.view", "workers.view"]
    );
    assert!(store.submissions().await.is_empty());
}

#[tokio::test]
async fn test_double_toggle_restores_content_but_stays_dirty() {
    let mut editor = PermissionEditor::new(make_store());
    editor.select_role("A").await.unwrap();
    let baseline = sorted(editor.effective_permissions());

    editor.toggle_permission("workers.view");
    editor.toggle_permission("workers.view");

    assert_eq!(editor.state(), EditorState::Dirty);
    assert_eq!(sorted(editor.effective_permissions()), baseline);
}

#[tokio::test]
async fn test_save_submits_displayed_set_and_fresh_select_reflects_it() {
    let store = make_store();
    let mut editor = PermissionEditor::new(Arc::clone(&store));
    editor.select_role("A").await.unwrap();
    editor.toggle_permission("workers.view");
    editor.toggle_permission("workers.edit");
    let displayed = editor.effective_permissions();

    editor.save().await.unwrap();

    assert_eq!(editor.state(), EditorState::Clean);
    assert_eq!(
        store.submissions().await,
        vec![("A".to_string(), displayed.clone())]
    );

    let mut fresh = PermissionEditor::new(Arc::clone(&store));
    fresh.select_role("A").await.unwrap();
    assert_eq!(sorted(fresh.effective_permissions()), sorted(displayed));
}

#[tokio::test]
async fn test_clean_save_submits_baseline() {
    let store = make_store();
    let mut editor = PermissionEditor::new(Arc::clone(&store));
    editor.select_role("B").await.unwrap();

    editor.save().await.unwrap();

    assert_eq!(
        store.submissions().await,
        vec![("B".to_string(), vec!["reports.view".to_string()])]
    );
}

#[tokio::test]
async fn test_failed_save_keeps_working_copy() {
    let store = make_store();
    let mut editor = PermissionEditor::new(Arc::clone(&store));
    editor.select_role("A").await.unwrap();
    editor.toggle_permission("appointments.view");
    let before = editor.effective_permissions();

    store.set_unavailable(true);
    let err = editor.save().await.unwrap_err();
    assert!(matches!(err, AdminError::Api { status: 503, .. }));
    assert_eq!(editor.state(), EditorState::Dirty);
    assert_eq!(editor.effective_permissions(), before);

    store.set_unavailable(false);
    editor.save().await.unwrap();
    let detail = store.fetch_role_detail("A").await.unwrap();
    assert_eq!(detail.permission_names(), vec!["workers.view"]);
}

#[tokio::test]
async fn test_grouped_catalog_marks_effective_grants() {
    let mut editor = PermissionEditor::new(make_store());
    editor.select_role("B").await.unwrap();
    editor.toggle_permission("workers.view");

    let catalog = vec![
        Permission {
            name: "workers.view".into(),
            group: Some("workers".into()),
            ..Default::default()
        },
        Permission {
            name: "reports.view".into(),
            category: Some("reports".into()),
            ..Default::default()
        },
    ];
    let groups = editor.grouped_catalog(&catalog);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "reports");
    assert!(groups[0].rows[0].granted);
    assert_eq!(groups[1].key, "workers");
    assert!(groups[1].rows[0].granted);
}

#[tokio::test]
async fn test_save_after_failed_select_keeps_server_permissions() {
    let store = Arc::new(InMemoryRoleStore::with_roles(vec![make_role(
        "1",
        &["a", "b", "c"],
    )]));
    let mut editor = PermissionEditor::new(Arc::clone(&store));

    store.set_unavailable(true);
    assert!(editor.select_role("1").await.is_err());
    store.set_unavailable(false);

    assert!(!editor.toggle_permission("d"));
    let err = editor.save().await.unwrap_err();
    assert!(matches!(err, AdminError::RoleNotLoaded(_)));

    assert!(store.submissions().await.is_empty());
    let detail = store.fetch_role_detail("1").await.unwrap();
    assert_eq!(detail.permission_names(), vec!["a", "b", "c"]);

    editor.reload().await.unwrap();
    assert!(editor.toggle_permission("d"));
    editor.save().await.unwrap();
    assert_eq!(
        store.submissions().await,
        vec![(
            "1".to_string(),
            ["a", "b", "c", "d"].map(str::to_string).to_vec()
        )]
    );
}
