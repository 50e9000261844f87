mod new_subscriber;
mod subscriber;
mod subscriber_email;
mod user;
mod validation;

pub use new_subscriber::{NewSubscriber, CONSENT_FIELD, EMAIL_FIELD};
pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use user::{NewUser, User};
pub use validation::{FieldError, FieldErrorKind, ValidationError};
