use serde_json::Value;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::validation::{FieldError, FieldErrorKind, ValidationError};

pub const EMAIL_FIELD: &str = "email";
pub const CONSENT_FIELD: &str = "consentToPrivacyPolicy";

/// A waitlist signup that passed validation. Consent is always `true` here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub consent_to_privacy_policy: bool,
}

impl NewSubscriber {
    /// Validates an untyped request payload, reporting every failing field.
    pub fn parse(payload: &Value) -> Result<Self, ValidationError> {
        let email = parse_email(payload.get(EMAIL_FIELD));
        let consent = parse_consent(payload.get(CONSENT_FIELD));

        match (email, consent) {
            (Ok(email), Ok(())) => Ok(Self {
                email,
                consent_to_privacy_policy: true,
            }),
            (email, consent) => Err(ValidationError::new(
                email.err().into_iter().chain(consent.err()).collect(),
            )),
        }
    }
}

fn parse_email(value: Option<&Value>) -> Result<SubscriberEmail, FieldError> {
    let invalid = |detail: &str| FieldError::new(EMAIL_FIELD, FieldErrorKind::InvalidEmail, detail);

    match value {
        None | Some(Value::Null) => Err(invalid("Required")),
        Some(Value::String(s)) => {
            SubscriberEmail::parse(s.clone()).map_err(|_| invalid("Invalid email"))
        }
        Some(_) => Err(invalid("Expected string")),
    }
}

fn parse_consent(value: Option<&Value>) -> Result<(), FieldError> {
    let required =
        |detail: &str| FieldError::new(CONSENT_FIELD, FieldErrorKind::ConsentRequired, detail);

    match value {
        None | Some(Value::Null) => Err(required("Required")),
        Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => Err(required("You must agree to the privacy policy")),
        Some(_) => Err(required("Expected boolean")),
    }
}
