use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::{Client, Method, Response};
use serde::Serialize;
use tokio::net::TcpListener;

use waitlist::storage::{MemStorage, Storage};
use waitlist::{startup, telemetry};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::initialize_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::initialize_subscriber(subscriber);
    };
});

pub struct App {
    pub address: SocketAddr,
    pub client: Client,
    pub storage: Arc<dyn Storage>,
}

impl App {
    pub async fn new() -> Self {
        App::with_storage(Arc::new(MemStorage::new())).await
    }

    pub async fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Lazy::force(&TRACING);

        let listener = TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to start a test application");
        let address = listener.local_addr().unwrap();

        let app_state = startup::AppState::new(storage.clone());
        tokio::spawn(startup::run(listener, app_state));

        let client = Client::new();

        App {
            address,
            client,
            storage,
        }
    }
}

impl App {
    pub fn build_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);

        if method == Method::GET {
            self.client.get(url)
        } else if method == Method::POST {
            self.client.post(url)
        } else {
            panic!("No implementation for this request method {}", method)
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.build_request(Method::GET, "/health_check")
            .send()
            .await
            .unwrap()
    }

    pub async fn post_subscribe<T: Serialize + ?Sized>(&self, body: &T) -> Response {
        self.build_request(Method::POST, "/api/waitlist/subscribe")
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_subscribe_raw(&self, content_type: &str, body: &'static str) -> Response {
        self.build_request(Method::POST, "/api/waitlist/subscribe")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .unwrap()
    }

    pub fn subscriber_count(&self) -> usize {
        self.storage.subscribers().unwrap().len()
    }
}
