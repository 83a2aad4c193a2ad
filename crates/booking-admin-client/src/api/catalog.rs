use booking_admin_cache::Mutation;
use booking_admin_normalize::{PaginatedResponse, PaginationParams};

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_industry, to_industry_service, to_service, trimmed_opt,
    CreateIndustryRequest, CreateServiceRequest, Industry, IndustryService,
    IndustryServiceLink, IndustryServiceListParams, Service, ServiceListParams,
    UpdateIndustryRequest, UpdateServiceRequest,
};
use crate::transport::ApiRequest;

impl AdminClient {
    // -- industries -------------------------------------------------------

    pub async fn get_industries(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<Industry>, AdminError> {
        self.query_page(
            "get_industries",
            "/api/admin/industries",
            params,
            &["industries", "industry"],
            to_industry,
        )
        .await
    }

    pub async fn create_industry(
        &self,
        req: &CreateIndustryRequest,
    ) -> Result<Industry, AdminError> {
        let req = CreateIndustryRequest {
            kind: required_trimmed("type", &req.kind)?,
        };
        let response = self
            .mutate_with(
                Mutation::CreateIndustry,
                |body| ApiRequest::post("/api/admin/industries", body),
                &req,
            )
            .await?;
        Ok(to_industry(unwrap_record(&response, "industry")))
    }

    pub async fn update_industry(
        &self,
        req: &UpdateIndustryRequest,
    ) -> Result<Industry, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let req = UpdateIndustryRequest {
            id: id.clone(),
            kind: trimmed_opt(req.kind.as_ref()),
        };
        let response = self
            .mutate_with(
                Mutation::UpdateIndustry { id: id.clone() },
                |body| ApiRequest::put(format!("/api/industry/{id}"), body),
                &req,
            )
            .await?;
        Ok(to_industry(unwrap_record(&response, "industry")))
    }

    pub async fn delete_industry(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteIndustry,
            ApiRequest::delete(format!("/api/industry/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- services ---------------------------------------------------------

    pub async fn get_services(
        &self,
        params: &ServiceListParams,
    ) -> Result<PaginatedResponse<Service>, AdminError> {
        self.query_page(
            "get_services",
            "/api/admin/services",
            params,
            &["services"],
            to_service,
        )
        .await
    }

    pub async fn create_service(&self, req: &CreateServiceRequest) -> Result<Service, AdminError> {
        let req = CreateServiceRequest {
            name: required_trimmed("name", &req.name)?,
            description: req.description.trim().to_string(),
        };
        let response = self
            .mutate_with(
                Mutation::CreateService,
                |body| ApiRequest::post("/api/admin/services", body),
                &req,
            )
            .await?;
        Ok(to_service(unwrap_record(&response, "service")))
    }

    pub async fn update_service(&self, req: &UpdateServiceRequest) -> Result<Service, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateService { id: id.clone() },
                |body| ApiRequest::put(format!("/api/services/{id}"), body),
                req,
            )
            .await?;
        Ok(to_service(unwrap_record(&response, "service")))
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteService,
            ApiRequest::delete(format!("/api/services/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- industry services ------------------------------------------------

    /// 業種とサービスの対応一覧。業種で絞り込んだ場合、欠けた `industry_id` はその値で補う。
    pub async fn get_industry_services(
        &self,
        params: &IndustryServiceListParams,
    ) -> Result<PaginatedResponse<IndustryService>, AdminError> {
        let industry_id = trimmed_opt(params.industry_id.as_ref());
        self.query_page(
            "get_industry_services",
            "/api/admin/industry-services",
            params,
            &["industry_services", "industryServices", "services", "data"],
            |item| to_industry_service(item, industry_id.as_deref()),
        )
        .await
    }

    pub async fn create_industry_service(
        &self,
        link: &IndustryServiceLink,
    ) -> Result<IndustryService, AdminError> {
        let link = IndustryServiceLink {
            industry_id: required_trimmed("industry_id", &link.industry_id)?,
            service_id: required_trimmed("service_id", &link.service_id)?,
        };
        let response = self
            .mutate_with(
                Mutation::CreateIndustryService,
                |body| ApiRequest::post("/api/admin/industry-services", body),
                &link,
            )
            .await?;
        Ok(to_industry_service(
            unwrap_record(&response, "industry_service"),
            Some(&link.industry_id),
        ))
    }

    pub async fn delete_industry_service(&self, link: &IndustryServiceLink) -> Result<(), AdminError> {
        let industry_id = required_trimmed("industry_id", &link.industry_id)?;
        let service_id = required_trimmed("service_id", &link.service_id)?;
        self.mutate(
            Mutation::DeleteIndustryService,
            ApiRequest::delete(format!("/api/industry/{industry_id}/services/{service_id}")),
        )
        .await?;
        Ok(())
    }
}
