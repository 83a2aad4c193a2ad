use booking_admin_cache::{CacheTag, Mutation, TagType};
use booking_admin_normalize::{PaginatedResponse, PaginationParams};

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_apple_verify_batch_response, to_firebase_idp, AppleVerifyBatchRequest,
    AppleVerifyBatchResponse, CreateFirebaseIdpRequest, FirebaseIdp, UpdateFirebaseIdpRequest,
};
use crate::transport::ApiRequest;

impl AdminClient {
    // -- firebase idp -----------------------------------------------------

    pub async fn get_firebase_idps(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<FirebaseIdp>, AdminError> {
        self.query_page(
            "get_firebase_idps",
            "/api/admin/firebase/idp",
            params,
            &["idps", "data"],
            to_firebase_idp,
        )
        .await
    }

    pub async fn get_firebase_idp(&self, idp_id: &str) -> Result<FirebaseIdp, AdminError> {
        let idp_id = required_trimmed("idp_id", idp_id)?;
        let tag = CacheTag::entity(TagType::FirebaseIdp, idp_id.as_str());
        self.query(
            "get_firebase_idp",
            &idp_id,
            ApiRequest::get(format!("/api/admin/firebase/idp/{idp_id}")),
            |raw| (to_firebase_idp(unwrap_record(raw, "idp")), vec![tag]),
        )
        .await
    }

    pub async fn create_firebase_idp(
        &self,
        req: &CreateFirebaseIdpRequest,
    ) -> Result<FirebaseIdp, AdminError> {
        let req = CreateFirebaseIdpRequest {
            provider_id: required_trimmed("provider_id", &req.provider_id)?,
            ..req.clone()
        };
        let response = self
            .mutate_with(
                Mutation::CreateFirebaseIdp,
                |body| ApiRequest::post("/api/admin/firebase/idp", body),
                &req,
            )
            .await?;
        Ok(to_firebase_idp(unwrap_record(&response, "idp")))
    }

    pub async fn update_firebase_idp(
        &self,
        req: &UpdateFirebaseIdpRequest,
    ) -> Result<FirebaseIdp, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateFirebaseIdp { id: id.clone() },
                |body| ApiRequest::patch(format!("/api/admin/firebase/idp/{id}"), body),
                req,
            )
            .await?;
        Ok(to_firebase_idp(unwrap_record(&response, "idp")))
    }

    // -- in-app purchase --------------------------------------------------

    /// App Store のレシートをまとめて検証する。空のリストは送らない。
    pub async fn verify_apple_batch(
        &self,
        req: &AppleVerifyBatchRequest,
    ) -> Result<AppleVerifyBatchResponse, AdminError> {
        let receipts: Vec<String> = req
            .receipts
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if receipts.is_empty() {
            return Err(AdminError::Validation("receipts is required".into()));
        }
        let response = self
            .mutate_with(
                Mutation::VerifyAppleBatch,
                |body| ApiRequest::post("/api/iap/apple/verify-batch", body),
                &AppleVerifyBatchRequest { receipts },
            )
            .await?;
        Ok(to_apple_verify_batch_response(&response))
    }
}
