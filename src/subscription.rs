use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;

use crate::domain::{NewSubscriber, Subscriber, ValidationError};
use crate::storage::{Storage, StorageError};

/// Validates signups and records them in the waitlist.
#[derive(Clone)]
pub struct SubscriptionService {
    storage: Arc<dyn Storage>,
}

impl SubscriptionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Validate, then create atomically. The store rejects a taken email
    /// itself, so two racing signups for one address yield one record.
    #[tracing::instrument(name = "Adding a new waitlist subscriber", skip(self, payload))]
    pub fn subscribe(&self, payload: &Value) -> Result<Subscriber, SubscribeError> {
        let new_subscriber = NewSubscriber::parse(payload)?;

        let subscriber = self
            .storage
            .create_subscriber(&new_subscriber)
            .map_err(|e| match e {
                StorageError::DuplicateEmail(email) => SubscribeError::Duplicate(email),
                e => SubscribeError::UnexpectedError(
                    anyhow::Error::new(e).context("Failed to store a new waitlist subscriber"),
                ),
            })?;

        tracing::info!(
            subscriber_id = subscriber.id,
            "New subscriber added to the waitlist"
        );

        Ok(subscriber)
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("{0} is already on the waitlist")]
    Duplicate(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
