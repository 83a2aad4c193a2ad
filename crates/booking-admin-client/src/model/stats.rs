//! ダッシュボード・システム統計・稼働状況。
//!
//! 集計値はバックエンドによって文字列や null で返るため、すべて件数へ丸める。
//! 配列でない明細は空の配列として扱う。

use booking_admin_normalize::{coerce_count, coerce_number, optional_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn count(item: &Value, key: &str) -> u64 {
    item.get(key).map_or(0, coerce_count)
}

fn rows<T>(response: &Value, key: &str, adapt: impl Fn(&Value) -> T) -> Vec<T> {
    response
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(adapt).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRegistration {
    pub date: String,
    pub new_users: u64,
    pub new_workers: u64,
    pub new_workplaces: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub total_users: u64,
    pub total_workers: u64,
    pub total_workplaces: u64,
    pub total_appointments: u64,
    pub total_services: u64,
    pub total_industries: u64,
    pub recent_registrations: Vec<RecentRegistration>,
    /// 予約の集計行。列はバックエンドの集計に従う。
    pub appointment_stats: Vec<Value>,
}

pub fn to_dashboard(response: &Value) -> DashboardData {
    DashboardData {
        total_users: count(response, "total_users"),
        total_workers: count(response, "total_workers"),
        total_workplaces: count(response, "total_workplaces"),
        total_appointments: count(response, "total_appointments"),
        total_services: count(response, "total_services"),
        total_industries: count(response, "total_industries"),
        recent_registrations: rows(response, "recent_registrations", |item| {
            RecentRegistration {
                date: optional_string(item, &["date"]),
                new_users: count(item, "new_users"),
                new_workers: count(item, "new_workers"),
                new_workplaces: count(item, "new_workplaces"),
            }
        }),
        appointment_stats: rows(response, "appointment_stats", Value::clone)
            .into_iter()
            .filter(Value::is_object)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// SystemStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyGrowth {
    pub month: String,
    pub new_users: u64,
    pub new_workers: u64,
    pub new_workplaces: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularService {
    pub name: String,
    pub worker_count: u64,
    pub appointment_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryDistribution {
    #[serde(rename = "type")]
    pub kind: String,
    pub workplace_count: u64,
    pub worker_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub monthly_growth: Vec<MonthlyGrowth>,
    pub popular_services: Vec<PopularService>,
    pub industry_distribution: Vec<IndustryDistribution>,
}

pub fn to_system_stats(response: &Value) -> SystemStats {
    SystemStats {
        monthly_growth: rows(response, "monthly_growth", |item| MonthlyGrowth {
            month: optional_string(item, &["month"]),
            new_users: count(item, "new_users"),
            new_workers: count(item, "new_workers"),
            new_workplaces: count(item, "new_workplaces"),
        }),
        popular_services: rows(response, "popular_services", |item| PopularService {
            name: optional_string(item, &["name"]),
            worker_count: count(item, "worker_count"),
            appointment_count: count(item, "appointment_count"),
        }),
        industry_distribution: rows(response, "industry_distribution", |item| {
            IndustryDistribution {
                kind: optional_string(item, &["type"]),
                workplace_count: count(item, "workplace_count"),
                worker_count: count(item, "worker_count"),
            }
        }),
    }
}

// ---------------------------------------------------------------------------
// SystemHealth
// ---------------------------------------------------------------------------

/// 稼働状況。各項目の中身はバックエンドの実装に依存するため JSON のまま持つ。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub db: Option<Value>,
    pub firebase: Option<Value>,
    pub push_queue: Option<Value>,
    pub memory: Option<Value>,
    pub table_stats: Option<Value>,
    /// 起動からの秒数。
    pub uptime_secs: Option<f64>,
    pub raw: Value,
}

pub fn to_system_health(response: &Value) -> SystemHealth {
    let field = |key: &str| response.get(key).filter(|v| !v.is_null()).cloned();
    SystemHealth {
        db: field("db"),
        firebase: field("firebase"),
        push_queue: field("push_queue"),
        memory: field("memory"),
        table_stats: field("table_stats"),
        uptime_secs: response
            .get("uptime")
            .filter(|v| !v.is_null())
            .map(coerce_number),
        raw: response.clone(),
    }
}
