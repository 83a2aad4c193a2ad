use booking_admin_cache::{CacheTag, Mutation, TagType};
use booking_admin_normalize::PaginatedResponse;

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_admin_session, to_admin_user, AdminListParams, AdminLoginRequest,
    AdminRegisterRequest, AdminSession, AdminUser, ResetAdminPasswordRequest, UpdateAdminRequest,
};
use crate::transport::ApiRequest;

impl AdminClient {
    // -- admins -----------------------------------------------------------

    pub async fn get_admins(
        &self,
        params: &AdminListParams,
    ) -> Result<PaginatedResponse<AdminUser>, AdminError> {
        self.query_page(
            "get_admins",
            "/api/admin/admins",
            params,
            &["admins", "data"],
            to_admin_user,
        )
        .await
    }

    pub async fn get_admin(&self, id: &str) -> Result<AdminUser, AdminError> {
        let id = required_trimmed("id", id)?;
        let tag = CacheTag::entity(TagType::Admins, id.as_str());
        self.query(
            "get_admin",
            &id,
            ApiRequest::get(format!("/api/admin/admins/{id}")),
            |raw| (to_admin_user(unwrap_record(raw, "admin")), vec![tag]),
        )
        .await
    }

    pub async fn update_admin(&self, req: &UpdateAdminRequest) -> Result<AdminUser, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateAdmin { id: id.clone() },
                |body| ApiRequest::patch(format!("/api/admin/admins/{id}"), body),
                req,
            )
            .await?;
        Ok(to_admin_user(unwrap_record(&response, "admin")))
    }

    /// パスワードを再設定し、サーバーのメッセージを返す。
    pub async fn reset_admin_password(
        &self,
        req: &ResetAdminPasswordRequest,
    ) -> Result<Option<String>, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::ResetAdminPassword,
                |body| ApiRequest::post(format!("/api/admin/admins/{id}/reset-password"), body),
                req,
            )
            .await?;
        Ok(response
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string))
    }

    pub async fn delete_admin(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteAdmin,
            ApiRequest::delete(format!("/api/admin/admins/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- auth -------------------------------------------------------------

    /// 管理者としてログインする。返ったトークンで新しいクライアントを組み立てるのは呼び出し側。
    pub async fn admin_login(&self, req: &AdminLoginRequest) -> Result<AdminSession, AdminError> {
        let req = AdminLoginRequest {
            email: required_trimmed("email", &req.email)?,
            password: req.password.clone(),
        };
        let response = self
            .mutate_with(
                Mutation::AdminLogin,
                |body| ApiRequest::post("/api/admin/login", body),
                &req,
            )
            .await?;
        Ok(to_admin_session(&response))
    }

    pub async fn admin_register(
        &self,
        req: &AdminRegisterRequest,
    ) -> Result<AdminSession, AdminError> {
        let req = AdminRegisterRequest {
            email: required_trimmed("email", &req.email)?,
            ..req.clone()
        };
        let response = self
            .mutate_with(
                Mutation::AdminRegister,
                |body| ApiRequest::post("/api/admin/register", body),
                &req,
            )
            .await?;
        Ok(to_admin_session(&response))
    }

    /// トークンの持ち主である管理者。
    pub async fn get_admin_me(&self) -> Result<AdminUser, AdminError> {
        self.query(
            "get_admin_me",
            &(),
            ApiRequest::get("/api/admin/me"),
            |raw| {
                (
                    to_admin_user(unwrap_record(raw, "admin")),
                    vec![CacheTag::me(TagType::AdminMe)],
                )
            },
        )
        .await
    }
}
