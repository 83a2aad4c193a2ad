use booking_admin_cache::Mutation;
use booking_admin_normalize::{PaginatedResponse, PaginationParams};

use super::{unwrap_record, AdminClient};
use crate::error::AdminError;
use crate::model::{
    required_trimmed, to_appointment, to_appointment_cancellation, to_blocked_time,
    to_cancellation_reason, to_reminder, Appointment, AppointmentCancellation,
    AppointmentCancellationListParams, AppointmentListParams, BlockedTime, BlockedTimeListParams,
    CancellationReason, CreateBlockedTimeRequest, CreateCancellationReasonRequest,
    CreateReminderRequest, Reminder, ReminderListParams, UpdateAppointmentCancellationRequest,
    UpdateBlockedTimeRequest, UpdateCancellationReasonRequest, UpdateReminderRequest,
};
use crate::transport::ApiRequest;

impl AdminClient {
    // -- appointments -----------------------------------------------------

    /// 予約一覧。管理画面からは閲覧のみ。
    pub async fn get_appointments(
        &self,
        params: &AppointmentListParams,
    ) -> Result<PaginatedResponse<Appointment>, AdminError> {
        self.query_page(
            "get_appointments",
            "/api/admin/appointments",
            params,
            &["appointments"],
            to_appointment,
        )
        .await
    }

    // -- blocked times ----------------------------------------------------

    pub async fn get_blocked_times(
        &self,
        params: &BlockedTimeListParams,
    ) -> Result<PaginatedResponse<BlockedTime>, AdminError> {
        self.query_page(
            "get_blocked_times",
            "/api/blocked-times",
            params,
            &["blocked_times", "blockedTimes", "data"],
            to_blocked_time,
        )
        .await
    }

    pub async fn create_blocked_time(
        &self,
        req: &CreateBlockedTimeRequest,
    ) -> Result<BlockedTime, AdminError> {
        required_trimmed("start_at", &req.start_at)?;
        required_trimmed("end_at", &req.end_at)?;
        let response = self
            .mutate_with(
                Mutation::CreateBlockedTime,
                |body| ApiRequest::post("/api/blocked-times", body),
                req,
            )
            .await?;
        Ok(to_blocked_time(unwrap_record(&response, "blocked_time")))
    }

    pub async fn update_blocked_time(
        &self,
        req: &UpdateBlockedTimeRequest,
    ) -> Result<BlockedTime, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateBlockedTime { id: id.clone() },
                |body| ApiRequest::put(format!("/api/blocked-times/{id}"), body),
                req,
            )
            .await?;
        Ok(to_blocked_time(unwrap_record(&response, "blocked_time")))
    }

    pub async fn delete_blocked_time(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteBlockedTime,
            ApiRequest::delete(format!("/api/blocked-times/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- reminders --------------------------------------------------------

    pub async fn get_reminders(
        &self,
        params: &ReminderListParams,
    ) -> Result<PaginatedResponse<Reminder>, AdminError> {
        self.query_page(
            "get_reminders",
            "/api/reminders",
            params,
            &["reminders", "data"],
            to_reminder,
        )
        .await
    }

    pub async fn create_reminder(&self, req: &CreateReminderRequest) -> Result<Reminder, AdminError> {
        required_trimmed("appointment_id", &req.appointment_id)?;
        let response = self
            .mutate_with(
                Mutation::CreateReminder,
                |body| ApiRequest::post("/api/reminders", body),
                req,
            )
            .await?;
        Ok(to_reminder(unwrap_record(&response, "reminder")))
    }

    pub async fn update_reminder(&self, req: &UpdateReminderRequest) -> Result<Reminder, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateReminder { id: id.clone() },
                |body| ApiRequest::put(format!("/api/reminders/{id}"), body),
                req,
            )
            .await?;
        Ok(to_reminder(unwrap_record(&response, "reminder")))
    }

    pub async fn delete_reminder(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteReminder,
            ApiRequest::delete(format!("/api/reminders/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- cancellation reasons ---------------------------------------------

    pub async fn get_cancellation_reasons(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<CancellationReason>, AdminError> {
        self.query_page(
            "get_cancellation_reasons",
            "/api/cancellation-reasons",
            params,
            &["cancellation_reasons", "cancellationReasons", "data"],
            to_cancellation_reason,
        )
        .await
    }

    pub async fn create_cancellation_reason(
        &self,
        req: &CreateCancellationReasonRequest,
    ) -> Result<CancellationReason, AdminError> {
        let req = CreateCancellationReasonRequest {
            reason_text: required_trimmed("reason_text", &req.reason_text)?,
            ..req.clone()
        };
        let response = self
            .mutate_with(
                Mutation::CreateCancellationReason,
                |body| ApiRequest::post("/api/cancellation-reasons", body),
                &req,
            )
            .await?;
        Ok(to_cancellation_reason(unwrap_record(
            &response,
            "cancellation_reason",
        )))
    }

    pub async fn update_cancellation_reason(
        &self,
        req: &UpdateCancellationReasonRequest,
    ) -> Result<CancellationReason, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateCancellationReason { id: id.clone() },
                |body| ApiRequest::put(format!("/api/cancellation-reasons/{id}"), body),
                req,
            )
            .await?;
        Ok(to_cancellation_reason(unwrap_record(
            &response,
            "cancellation_reason",
        )))
    }

    pub async fn delete_cancellation_reason(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteCancellationReason,
            ApiRequest::delete(format!("/api/cancellation-reasons/{id}")),
        )
        .await?;
        Ok(())
    }

    // -- appointment cancellations ----------------------------------------

    pub async fn get_appointment_cancellations(
        &self,
        params: &AppointmentCancellationListParams,
    ) -> Result<PaginatedResponse<AppointmentCancellation>, AdminError> {
        self.query_page(
            "get_appointment_cancellations",
            "/api/appointment-cancellations",
            params,
            &["appointment_cancellations", "appointmentCancellations", "data"],
            to_appointment_cancellation,
        )
        .await
    }

    pub async fn update_appointment_cancellation(
        &self,
        req: &UpdateAppointmentCancellationRequest,
    ) -> Result<AppointmentCancellation, AdminError> {
        let id = required_trimmed("id", &req.id)?;
        let response = self
            .mutate_with(
                Mutation::UpdateAppointmentCancellation { id: id.clone() },
                |body| ApiRequest::put(format!("/api/appointment-cancellations/{id}"), body),
                req,
            )
            .await?;
        Ok(to_appointment_cancellation(unwrap_record(
            &response,
            "appointment_cancellation",
        )))
    }

    pub async fn delete_appointment_cancellation(&self, id: &str) -> Result<(), AdminError> {
        let id = required_trimmed("id", id)?;
        self.mutate(
            Mutation::DeleteAppointmentCancellation,
            ApiRequest::delete(format!("/api/appointment-cancellations/{id}")),
        )
        .await?;
        Ok(())
    }
}
