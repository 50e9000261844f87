use serde::Serialize;

/// A stored waitlist entry. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: u64,
    pub email: String,
    pub consent_to_privacy_policy: bool,
    pub created_at: String,
}
