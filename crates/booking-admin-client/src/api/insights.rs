use booking_admin_cache::{CacheTag, TagType};

use super::AdminClient;
use crate::error::AdminError;
use crate::model::{
    to_dashboard, to_system_health, to_system_stats, DashboardData, SystemHealth, SystemStats,
};
use crate::transport::ApiRequest;

impl AdminClient {
    pub async fn get_dashboard(&self) -> Result<DashboardData, AdminError> {
        self.query(
            "get_dashboard",
            &(),
            ApiRequest::get("/api/admin/dashboard"),
            |raw| (to_dashboard(raw), vec![CacheTag::main(TagType::Dashboard)]),
        )
        .await
    }

    pub async fn get_system_stats(&self) -> Result<SystemStats, AdminError> {
        self.query(
            "get_system_stats",
            &(),
            ApiRequest::get("/api/admin/system-stats"),
            |raw| (to_system_stats(raw), vec![CacheTag::main(TagType::SystemStats)]),
        )
        .await
    }

    pub async fn get_system_health(&self) -> Result<SystemHealth, AdminError> {
        self.query(
            "get_system_health",
            &(),
            ApiRequest::get("/api/admin/system-health"),
            |raw| (to_system_health(raw), vec![CacheTag::main(TagType::SystemHealth)]),
        )
        .await
    }
}
