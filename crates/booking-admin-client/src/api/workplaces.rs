use booking_admin_cache::Mutation;
use booking_admin_normalize::PaginatedResponse;

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_workplace, CreateWorkplaceRequest, UpdateWorkplaceRequest, Workplace,
    WorkplaceListParams,
};
use crate::transport::ApiRequest;

impl AdminClient {
    pub async fn get_workplaces(
        &self,
        params: &WorkplaceListParams,
    ) -> Result<PaginatedResponse<Workplace>, AdminError> {
        self.query_page(
            "get_workplaces",
            "/api/admin/workplaces",
            params,
            &["workplaces"],
            to_workplace,
        )
        .await
    }

    pub async fn create_workplace(
        &self,
        req: &CreateWorkplaceRequest,
    ) -> Result<Workplace, AdminError> {
        let response = self
            .mutate_with(
                Mutation::CreateWorkplace,
                |body| ApiRequest::post("/api/workplaces", body),
                req,
            )
            .await?;
        Ok(to_workplace(unwrap_record(&response, "workplace")))
    }

    pub async fn update_workplace(
        &self,
        req: &UpdateWorkplaceRequest,
    ) -> Result<Workplace, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateWorkplace { id: id.clone() },
                |body| ApiRequest::put(format!("/api/admin/workplaces/{id}"), body),
                req,
            )
            .await?;
        Ok(to_workplace(unwrap_record(&response, "workplace")))
    }

    pub async fn delete_workplace(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteWorkplace,
            ApiRequest::delete(format!("/api/admin/workplaces/{id}")),
        )
        .await?;
        Ok(())
    }
}
