use booking_admin_cache::Mutation;
use booking_admin_normalize::PaginatedResponse;
use serde_json::json;

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_customer, to_worker, CreateWorkerRequest, Customer, CustomerListParams,
    UpdateCustomerRequest, UpdateWorkerRequest, Worker, WorkerListParams,
};
use crate::transport::ApiRequest;

impl AdminClient {
    // -- users ------------------------------------------------------------

    pub async fn get_users(
        &self,
        params: &CustomerListParams,
    ) -> Result<PaginatedResponse<Customer>, AdminError> {
        self.query_page("get_users", "/api/admin/users", params, &["users"], to_customer)
            .await
    }

    pub async fn update_user(&self, req: &UpdateCustomerRequest) -> Result<Customer, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateUser { id: id.clone() },
                |body| ApiRequest::put(format!("/api/admin/users/{id}"), body),
                req,
            )
            .await?;
        Ok(to_customer(unwrap_record(&response, "user")))
    }

    /// 利用者の削除は認証サービス側のエンドポイントで行う。
    pub async fn delete_user(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteUser,
            ApiRequest::delete(format!("/api/auth/users/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- workers ----------------------------------------------------------

    pub async fn get_workers(
        &self,
        params: &WorkerListParams,
    ) -> Result<PaginatedResponse<Worker>, AdminError> {
        self.query_page("get_workers", "/api/admin/workers", params, &["workers"], to_worker)
            .await
    }

    pub async fn create_worker(&self, req: &CreateWorkerRequest) -> Result<Worker, AdminError> {
        let response = self
            .mutate_with(
                Mutation::CreateWorker,
                |body| ApiRequest::post("/api/workers", body),
                req,
            )
            .await?;
        Ok(to_worker(unwrap_record(&response, "worker")))
    }

    pub async fn update_worker(&self, req: &UpdateWorkerRequest) -> Result<Worker, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateWorker { id: id.clone() },
                |body| ApiRequest::put(format!("/api/admin/workers/{id}"), body),
                req,
            )
            .await?;
        Ok(to_worker(unwrap_record(&response, "worker")))
    }

    /// 従業員サービス側の更新口。管理者にだけ許された項目（ロールなど）を含められる。
    pub async fn update_worker_admin(
        &self,
        req: &UpdateWorkerRequest,
    ) -> Result<Worker, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateWorker { id: id.clone() },
                |body| ApiRequest::put(format!("/api/workers/{id}"), body),
                req,
            )
            .await?;
        Ok(to_worker(unwrap_record(&response, "worker")))
    }

    pub async fn delete_worker(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteWorker,
            ApiRequest::delete(format!("/api/workers/{id}")),
        )
        .await?;
        Ok(())
    }

    /// 従業員に担当サービスを追加する。
    pub async fn assign_worker_service(
        &self,
        worker_id: &str,
        service_id: &str,
    ) -> Result<(), AdminError> {
        let worker_id = required_trimmed("worker_id", worker_id)?;
        let service_id = required_trimmed("service_id", service_id)?;
        self.mutate(
            Mutation::AssignWorkerService {
                worker_id: worker_id.clone(),
            },
            ApiRequest::post(
                format!("/api/workers/{worker_id}/services"),
                json!({ "service_id": service_id }),
            ),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_worker_service(
        &self,
        worker_id: &str,
        service_id: &str,
    ) -> Result<(), AdminError> {
        let worker_id = required_trimmed("worker_id", worker_id)?;
        let service_id = required_trimmed("service_id", service_id)?;
        self.mutate(
            Mutation::RemoveWorkerService {
                worker_id: worker_id.clone(),
            },
            ApiRequest::delete(format!("/api/workers/{worker_id}/services/{service_id}")),
        )
        .await?;
        Ok(())
    }
}
