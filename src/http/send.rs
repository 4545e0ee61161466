use std::fmt;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use log::{info, warn};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::{AppState, SendOutcome, ServiceError, ServiceResult},
    email::{OutgoingEmail, SmtpTarget},
    util::{has_special_use_domain, is_valid_email},
};

#[derive(Deserialize, Validate)]
pub struct EmailSendRequest {
    pub sender_email: String,
    pub password: String,
    #[validate(email)]
    pub receiver_email: String,
    pub subject: String,
    pub body: String,
    pub smtp_server: String,
    pub smtp_port: u16,
}

impl fmt::Debug for EmailSendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSendRequest")
            .field("sender_email", &self.sender_email)
            .field("receiver_email", &self.receiver_email)
            .field("subject", &self.subject)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .finish_non_exhaustive()
    }
}

impl EmailSendRequest {
    fn into_parts(self) -> (OutgoingEmail, SmtpTarget) {
        let target = SmtpTarget {
            host: self.smtp_server,
            port: self.smtp_port,
            username: self.sender_email.clone(),
            password: self.password,
        };
        let email = OutgoingEmail {
            from: self.sender_email,
            to: self.receiver_email,
            subject: self.subject,
            body: self.body,
        };
        (email, target)
    }
}

fn reject_payload(rejection: JsonRejection) -> ServiceError {
    if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
        ServiceError::Unprocessable(rejection.body_text())
    } else {
        ServiceError::BadRequest(rejection.body_text())
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Email Sender API is running. Use /send-email/ endpoint to send emails."
    }))
}

pub async fn send_email(
    State(app_state): State<AppState>,
    payload: Result<Json<EmailSendRequest>, JsonRejection>,
) -> ServiceResult<Json<SendOutcome>> {
    let Json(request) = payload.map_err(reject_payload)?;

    if let Err(e) = request.validate() {
        warn!("Rejected send request: {}", e);
        return Err(ServiceError::Unprocessable(e.to_string()));
    }
    if !is_valid_email(&request.receiver_email)
        || has_special_use_domain(&request.receiver_email)
    {
        warn!("Rejected recipient '{}'", request.receiver_email);
        return Err(ServiceError::BadRequest("Invalid email format".to_string()));
    }

    let request_id = Uuid::new_v4();
    info!("[{}] Sending {:?}", request_id, request);

    let (email, target) = request.into_parts();
    let relay = app_state.mail_relay.clone();
    let result = tokio::task::spawn_blocking(move || relay.send(&email, &target))
        .await
        .map_err(|e| ServiceError::Internal(format!("Mail relay task failed: {}", e)))?;

    match result {
        Ok(()) => {
            info!("[{}] Email sent", request_id);
            Ok(Json(SendOutcome::sent()))
        }
        Err(e) => {
            warn!("[{}] Failed to send email: {}", request_id, e);
            Err(e.into())
        }
    }
}
