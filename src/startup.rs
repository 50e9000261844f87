use std::sync::Arc;

use axum::{
    extract::{FromRef, MatchedPath},
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::routes::{check_health, subscribe};
use crate::storage::{MemStorage, Storage};
use crate::subscription::SubscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            subscriptions: SubscriptionService::new(storage),
        }
    }
}

impl FromRef<AppState> for SubscriptionService {
    fn from_ref(state: &AppState) -> Self {
        state.subscriptions.clone()
    }
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Binds the configured address with a fresh in-memory store.
    pub async fn build(settings: &Settings) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(settings.application.address()).await?;
        let port = listener.local_addr()?.port();
        let state = AppState::new(Arc::new(MemStorage::new()));

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        run(self.listener, self.state).await
    }
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    let address = listener.local_addr()?;
    tracing::info!(%address, "Listening for waitlist signups");

    axum::serve(listener, router(state)).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/waitlist/subscribe", post(subscribe))
        .route("/health_check", get(check_health))
        .with_state(state)
        .layer(
            // Refer to https://github.com/tokio-rs/axum/blob/main/examples/tracing-aka-logging/Cargo.toml
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Starting HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}
