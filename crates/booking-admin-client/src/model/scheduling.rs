use booking_admin_normalize::{
    display_field, first_string, id_string, optional_bool, PaginationParams,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{push_text, ListQuery};

fn opt_id(item: &Value, key: &str) -> Option<String> {
    item.get(key).map(id_string).filter(|id| !id.is_empty())
}

// ---------------------------------------------------------------------------
// Appointment: 予約（閲覧のみ）
// ---------------------------------------------------------------------------

/// 表示用に解決済みの予約。見つからない項目は `"-"`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub customer: String,
    pub worker: String,
    pub workplace: String,
    pub service: String,
    pub start_at: String,
    pub end_at: String,
    pub status: String,
    pub created_at: Option<String>,
}

pub fn to_appointment(item: &Value) -> Appointment {
    Appointment {
        id: item.get("id").map(id_string).unwrap_or_default(),
        customer: display_field(item, &["customer_name", "customer", "customer_full_name"]),
        worker: display_field(item, &["worker_name", "worker", "worker_full_name"]),
        workplace: display_field(item, &["workplace_name", "workplace_title", "workplace"]),
        service: display_field(item, &["service_name", "service"]),
        start_at: display_field(item, &["start_at", "starts_at", "date"]),
        end_at: display_field(item, &["end_at", "ends_at"]),
        status: display_field(item, &["status", "state"]),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub status: Option<String>,
    pub workplace_id: Option<String>,
    pub worker_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ListQuery for AppointmentListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "status", self.status.as_ref());
        push_text(&mut query, "workplace_id", self.workplace_id.as_ref());
        push_text(&mut query, "worker_id", self.worker_id.as_ref());
        push_text(&mut query, "date_from", self.date_from.as_ref());
        push_text(&mut query, "date_to", self.date_to.as_ref());
        query
    }
}

// ---------------------------------------------------------------------------
// BlockedTime: 予約不可の時間帯
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: String,
    pub worker_id: Option<String>,
    pub workplace_id: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
}

pub fn to_blocked_time(item: &Value) -> BlockedTime {
    BlockedTime {
        id: item.get("id").map(id_string).unwrap_or_default(),
        worker_id: opt_id(item, "worker_id"),
        workplace_id: opt_id(item, "workplace_id"),
        start_at: first_string(item, &["start_at", "starts_at"]),
        end_at: first_string(item, &["end_at", "ends_at"]),
        reason: first_string(item, &["reason"]),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTimeListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub worker_id: Option<String>,
    pub workplace_id: Option<String>,
}

impl ListQuery for BlockedTimeListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "worker_id", self.worker_id.as_ref());
        push_text(&mut query, "workplace_id", self.workplace_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlockedTimeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace_id: Option<String>,
    pub start_at: String,
    pub end_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBlockedTimeRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Reminder: 予約リマインダー
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub appointment_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub send_at: Option<String>,
    pub created_at: Option<String>,
}

pub fn to_reminder(item: &Value) -> Reminder {
    Reminder {
        id: item.get("id").map(id_string).unwrap_or_default(),
        appointment_id: opt_id(item, "appointment_id"),
        kind: first_string(item, &["type"]),
        message: first_string(item, &["message"]),
        send_at: first_string(item, &["send_at"]),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub appointment_id: Option<String>,
}

impl ListQuery for ReminderListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "appointment_id", self.appointment_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub appointment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReminderRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_at: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// CancellationReason: キャンセル理由マスタ
// ---------------------------------------------------------------------------

/// キャンセル理由を表示するアプリ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    User,
    OwnerWorker,
}

impl AppType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(AppType::User),
            "owner_worker" => Some(AppType::OwnerWorker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationReason {
    pub id: String,
    pub reason_text: Option<String>,
    pub app_type: Option<AppType>,
    pub is_active: Option<bool>,
    pub created_at: Option<String>,
}

pub fn to_cancellation_reason(item: &Value) -> CancellationReason {
    CancellationReason {
        id: item.get("id").map(id_string).unwrap_or_default(),
        reason_text: first_string(item, &["reason_text", "reason"]),
        app_type: first_string(item, &["app_type"]).and_then(|t| AppType::parse(&t)),
        is_active: optional_bool(item, "is_active"),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCancellationReasonRequest {
    pub reason_text: String,
    pub app_type: AppType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCancellationReasonRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_type: Option<AppType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// AppointmentCancellation: 予約キャンセル記録
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCancellation {
    pub id: String,
    pub appointment_id: Option<String>,
    pub reason_id: Option<String>,
    pub cancelled_by: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

pub fn to_appointment_cancellation(item: &Value) -> AppointmentCancellation {
    AppointmentCancellation {
        id: item.get("id").map(id_string).unwrap_or_default(),
        appointment_id: opt_id(item, "appointment_id"),
        reason_id: opt_id(item, "reason_id"),
        cancelled_by: first_string(item, &["cancelled_by"]),
        status: first_string(item, &["status"]),
        created_at: first_string(item, &["created_at"]),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCancellationListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub appointment_id: Option<String>,
}

impl ListQuery for AppointmentCancellationListParams {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.pagination.to_query();
        push_text(&mut query, "appointment_id", self.appointment_id.as_ref());
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAppointmentCancellationRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_appointment_reads_nested_objects() {
        let appointment = to_appointment(&json!({
            "id": 77,
            "customer": {"full_name": "Ali Veli"},
            "worker_full_name": "Usta Hasan",
            "workplace_title": "Merkez",
            "service": {"title": "Saç Kesimi"},
            "starts_at": "2024-05-01T10:00:00Z",
            "state": "confirmed"
        }));
        assert_eq!(appointment.id, "77");
        assert_eq!(appointment.customer, "Ali Veli");
        assert_eq!(appointment.worker, "Usta Hasan");
        assert_eq!(appointment.workplace, "Merkez");
        assert_eq!(appointment.service, "Saç Kesimi");
        assert_eq!(appointment.start_at, "2024-05-01T10:00:00Z");
        assert_eq!(appointment.status, "confirmed");
    }

    #[test]
    fn test_to_appointment_placeholders() {
        let appointment = to_appointment(&json!({"id": "a-1", "customer_name": ""}));
        assert_eq!(appointment.customer, "-");
        assert_eq!(appointment.end_at, "-");
        assert_eq!(appointment.created_at, None);
    }

    #[test]
    fn test_appointment_list_query_skips_blank_filters() {
        let params = AppointmentListParams {
            pagination: PaginationParams::new().page(1),
            status: Some("  ".into()),
            worker_id: Some("w-1".into()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![("page", "1".to_string()), ("worker_id", "w-1".to_string())]
        );
    }

    #[test]
    fn test_to_cancellation_reason() {
        let reason = to_cancellation_reason(&json!({
            "id": 4,
            "reason_text": "Müşteri gelmedi",
            "app_type": "owner_worker",
            "is_active": 1
        }));
        assert_eq!(reason.id, "4");
        assert_eq!(reason.app_type, Some(AppType::OwnerWorker));
        assert_eq!(reason.is_active, Some(true));

        let reason = to_cancellation_reason(&json!({"id": 5, "app_type": "admin"}));
        assert_eq!(reason.app_type, None);
        assert_eq!(reason.is_active, None);
    }

    #[test]
    fn test_reminder_type_key() {
        let reminder = to_reminder(&json!({"id": "r-1", "type": "sms", "appointment_id": 12}));
        assert_eq!(reminder.kind.as_deref(), Some("sms"));
        assert_eq!(reminder.appointment_id.as_deref(), Some("12"));

        let body = serde_json::to_value(UpdateReminderRequest {
            id: "r-1".into(),
            kind: Some("push".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"type": "push"}));
    }
}
