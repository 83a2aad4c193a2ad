use async_trait::async_trait;
use booking_admin_cache::{CacheTag, Mutation, TagType};

use super::{entity_tags, unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_permission, to_role, to_role_detail, to_worker_permissions,
    CreatePermissionRequest, CreateRoleRequest, Permission, Role, RoleDetail,
    UpdatePermissionRequest, UpdateRolePermissionsRequest, UpdateRoleRequest,
    UpdateWorkerOverridesRequest, UpdateWorkerRoleRequest, WorkerPermissions,
};
use crate::role_store::RolePermissionsApi;
use crate::transport::ApiRequest;

const PERMISSION_KEYS: &[&str] = &["permissions", "data"];

impl AdminClient {
    // -- catalog ----------------------------------------------------------

    /// 権限カタログ全体。
    pub async fn get_permissions(&self) -> Result<Vec<Permission>, AdminError> {
        self.query_list(
            "get_permissions",
            "/api/permissions",
            PERMISSION_KEYS,
            to_permission,
            |_| vec![CacheTag::list(TagType::Permissions)],
        )
        .await
    }

    /// ログイン中の管理者自身が持つ権限。
    pub async fn get_permissions_me(&self) -> Result<Vec<Permission>, AdminError> {
        self.query_list(
            "get_permissions_me",
            "/api/permissions/me",
            PERMISSION_KEYS,
            to_permission,
            |_| vec![CacheTag::me(TagType::Permissions)],
        )
        .await
    }

    pub async fn create_permission(
        &self,
        req: &CreatePermissionRequest,
    ) -> Result<Permission, AdminError> {
        let req = CreatePermissionRequest {
            name: required_trimmed("name", &req.name)?,
            display_name: required_trimmed("display_name", &req.display_name)?,
            ..req.clone()
        };
        let response = self
            .mutate_with(
                Mutation::CreatePermission,
                |body| ApiRequest::post("/api/permissions", body),
                &req,
            )
            .await?;
        Ok(to_permission(unwrap_record(&response, "permission")))
    }

    pub async fn update_permission(
        &self,
        req: &UpdatePermissionRequest,
    ) -> Result<Permission, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdatePermission { id: id.clone() },
                |body| ApiRequest::patch(format!("/api/permissions/{id}"), body),
                req,
            )
            .await?;
        Ok(to_permission(unwrap_record(&response, "permission")))
    }

    // -- roles ------------------------------------------------------------

    pub async fn get_roles(&self) -> Result<Vec<Role>, AdminError> {
        self.query_list(
            "get_roles",
            "/api/permissions/roles",
            &["roles", "data"],
            to_role,
            entity_tags::<Role>,
        )
        .await
    }

    pub async fn get_role_detail(&self, role_id: &str) -> Result<RoleDetail, AdminError> {
        let role_id = required_trimmed("role_id", role_id)?;
        let tag = CacheTag::entity(TagType::Roles, role_id.as_str());
        self.query(
            "get_role_detail",
            &role_id,
            ApiRequest::get(format!("/api/permissions/roles/{role_id}")),
            |raw| (to_role_detail(raw), vec![tag]),
        )
        .await
    }

    pub async fn create_role(&self, req: &CreateRoleRequest) -> Result<Role, AdminError> {
        let req = CreateRoleRequest {
            display_name: required_trimmed("display_name", &req.display_name)?,
            ..req.clone()
        };
        let response = self
            .mutate_with(
                Mutation::CreateRole,
                |body| ApiRequest::post("/api/permissions/roles", body),
                &req,
            )
            .await?;
        Ok(to_role(unwrap_record(&response, "role")))
    }

    pub async fn update_role(&self, req: &UpdateRoleRequest) -> Result<Role, AdminError> {
        let role_id = required_trimmed("role_id", &req.role_id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateRole {
                    role_id: role_id.clone(),
                },
                |body| ApiRequest::patch(format!("/api/permissions/roles/{role_id}"), body),
                req,
            )
            .await?;
        Ok(to_role(unwrap_record(&response, "role")))
    }

    /// ロールの権限集合を丸ごと置き換える。
    pub async fn update_role_permissions(
        &self,
        req: &UpdateRolePermissionsRequest,
    ) -> Result<RoleDetail, AdminError> {
        let role_id = required_trimmed("role_id", &req.role_id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateRolePermissions {
                    role_id: role_id.clone(),
                },
                |body| {
                    ApiRequest::put(format!("/api/permissions/roles/{role_id}/permissions"), body)
                },
                req,
            )
            .await?;
        Ok(to_role_detail(&response))
    }

    // -- worker permissions -----------------------------------------------

    pub async fn get_worker_permissions(
        &self,
        worker_id: &str,
    ) -> Result<WorkerPermissions, AdminError> {
        let worker_id = required_trimmed("worker_id", worker_id)?;
        let tag = CacheTag::entity(TagType::WorkerPermissions, worker_id.as_str());
        self.query(
            "get_worker_permissions",
            &worker_id,
            ApiRequest::get(format!("/api/permissions/workers/{worker_id}")),
            |raw| (to_worker_permissions(raw), vec![tag]),
        )
        .await
    }

    pub async fn update_worker_role(
        &self,
        req: &UpdateWorkerRoleRequest,
    ) -> Result<WorkerPermissions, AdminError> {
        let worker_id = required_trimmed("worker_id", &req.worker_id)?;
        let has_role_name = req
            .role_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if req.role_id.is_none() && !has_role_name {
            return Err(AdminError::Validation(
                "role_id or role_name is required".to_string(),
            ));
        }
        let response = self
            .mutate_with(
                Mutation::UpdateWorkerRole {
                    worker_id: worker_id.clone(),
                },
                |body| ApiRequest::put(format!("/api/permissions/workers/{worker_id}/role"), body),
                req,
            )
            .await?;
        Ok(to_worker_permissions(&response))
    }

    pub async fn update_worker_overrides(
        &self,
        req: &UpdateWorkerOverridesRequest,
    ) -> Result<WorkerPermissions, AdminError> {
        let worker_id = required_trimmed("worker_id", &req.worker_id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateWorkerOverrides {
                    worker_id: worker_id.clone(),
                },
                |body| {
                    ApiRequest::put(
                        format!("/api/permissions/workers/{worker_id}/overrides"),
                        body,
                    )
                },
                req,
            )
            .await?;
        Ok(to_worker_permissions(&response))
    }
}

#[async_trait]
impl RolePermissionsApi for AdminClient {
    async fn fetch_role_detail(&self, role_id: &str) -> Result<RoleDetail, AdminError> {
        self.get_role_detail(role_id).await
    }

    async fn replace_role_permissions(
        &self,
        role_id: &str,
        names: &[String],
    ) -> Result<(), AdminError> {
        self.update_role_permissions(&UpdateRolePermissionsRequest {
            role_id: role_id.to_string(),
            permission_names: names.to_vec(),
        })
        .await?;
        Ok(())
    }
}
