use booking_admin_cache::{CacheTag, Mutation, TagType};
use booking_admin_normalize::{normalize_list, PaginatedResponse};
use serde_json::Value;

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_audit_log, to_config_item, to_subscription, AuditLog,
    AuditLogListParams, ConfigItem, Subscription, SubscriptionListParams, UpdateConfigRequest,
    UpdateSubscriptionRequest,
};
use crate::transport::ApiRequest;

const CONFIG_KEYS: &[&str] = &["config", "configs", "data"];

/// 設定更新のレスポンスは一覧の場合も単一項目の場合もある。
fn config_items(response: &Value) -> Vec<ConfigItem> {
    let items = normalize_list(response, CONFIG_KEYS);
    if !items.is_empty() {
        return items.iter().map(to_config_item).collect();
    }
    let record = unwrap_record(response, "config");
    if record.get("key").is_some() {
        vec![to_config_item(record)]
    } else {
        Vec::new()
    }
}

impl AdminClient {
    pub async fn get_audit_logs(
        &self,
        params: &AuditLogListParams,
    ) -> Result<PaginatedResponse<AuditLog>, AdminError> {
        self.query_page(
            "get_audit_logs",
            "/api/admin/audit-logs",
            params,
            &["audit_logs", "auditLogs", "data"],
            to_audit_log,
        )
        .await
    }

    pub async fn get_subscriptions(
        &self,
        params: &SubscriptionListParams,
    ) -> Result<PaginatedResponse<Subscription>, AdminError> {
        self.query_page(
            "get_subscriptions",
            "/api/admin/subscriptions",
            params,
            &["subscriptions", "data"],
            to_subscription,
        )
        .await
    }

    pub async fn update_subscription(
        &self,
        req: &UpdateSubscriptionRequest,
    ) -> Result<Subscription, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateSubscription { id: id.clone() },
                |body| ApiRequest::patch(format!("/api/admin/subscriptions/{id}"), body),
                req,
            )
            .await?;
        Ok(to_subscription(unwrap_record(&response, "subscription")))
    }

    /// システム設定の全項目。
    pub async fn get_config(&self) -> Result<Vec<ConfigItem>, AdminError> {
        self.query_list(
            "get_config",
            "/api/admin/config",
            CONFIG_KEYS,
            to_config_item,
            |_| vec![CacheTag::list(TagType::Config)],
        )
        .await
    }

    /// 1 項目を更新し、サーバーが返した項目を返す。
    pub async fn update_config(
        &self,
        req: &UpdateConfigRequest,
    ) -> Result<Vec<ConfigItem>, AdminError> {
        let req = UpdateConfigRequest {
            key: required_trimmed("key", &req.key)?,
            value: req.value.clone(),
        };
        let response = self
            .mutate_with(
                Mutation::UpdateConfig,
                |body| ApiRequest::patch("/api/admin/config", body),
                &req,
            )
            .await?;
        Ok(config_items(&response))
    }
}
