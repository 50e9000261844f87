use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::domain::EMAIL_FIELD;
use crate::subscription::{SubscribeError, SubscriptionService};

const SUBSCRIBED: &str = "Successfully added to waitlist";
const ALREADY_SUBSCRIBED: &str = "This email is already on our waitlist.";
const UNEXPECTED: &str = "An error occurred while processing your request.";

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl WaitlistResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            email: None,
        }
    }
}

#[tracing::instrument(
    name = "Waitlist signup",
    skip(subscriptions, body),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(subscriptions): State<SubscriptionService>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, SubscribeError> {
    let Json(payload) = body.map_err(|rejection| {
        anyhow::Error::new(rejection).context("Failed to read the signup request body")
    })?;

    if let Some(email) = payload.get(EMAIL_FIELD).and_then(Value::as_str) {
        tracing::Span::current().record("subscriber_email", &tracing::field::display(email));
    }

    let subscriber = subscriptions.subscribe(&payload)?;

    Ok((
        StatusCode::CREATED,
        Json(WaitlistResponse {
            success: true,
            message: SUBSCRIBED.into(),
            email: Some(subscriber.email),
        }),
    ))
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SubscribeError::ValidationError(ref e) => {
                tracing::info!(error = %e, "Rejected an invalid signup");
                (StatusCode::BAD_REQUEST, Json(WaitlistResponse::failure(e.to_string())))
            }
            SubscribeError::Duplicate(_) => {
                tracing::info!("Rejected a signup for an email already on the waitlist");
                (StatusCode::CONFLICT, Json(WaitlistResponse::failure(ALREADY_SUBSCRIBED)))
            }
            SubscribeError::UnexpectedError(_) => {
                tracing::error!("{:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(WaitlistResponse::failure(UNEXPECTED)),
                )
            }
        }
        .into_response()
    }
}
