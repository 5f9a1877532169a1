//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires the ingestion service to wiremock
//! stand-ins for the upstream provider and the storage backend, backed by an
//! in-memory DB. The [`with_server`] constructor starts Axum on a random
//! port for HTTP-level testing.

use std::net::SocketAddr;
use std::sync::Arc;

use snapvault::config::{IngestConfig, ProviderConfig, StorageConfig};
use snapvault::ingest::IngestService;
use snapvault::provider::PexelsClient;
use snapvault::server::{create_router, AppContext};
use snapvault::storage::CloudinaryClient;
use snapvault_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLOUD: &str = "testcloud";

/// Test harness wrapping the ingestion service, its mocked collaborators,
/// and the in-memory database behind them.
pub struct TestHarness {
    pub provider: MockServer,
    pub storage: MockServer,
    pub db: DbPool,
    pub service: Arc<IngestService>,
}

impl TestHarness {
    /// Create a new harness with default ingest limits.
    pub async fn new() -> Self {
        Self::with_ingest_config(IngestConfig::default()).await
    }

    /// Create a new harness with custom ingest limits.
    pub async fn with_ingest_config(ingest: IngestConfig) -> Self {
        let provider = MockServer::start().await;
        let storage = MockServer::start().await;
        let db = init_memory_pool().expect("failed to create in-memory pool");

        let provider_client = Arc::new(PexelsClient::new(&ProviderConfig {
            base_url: provider.uri(),
            api_key: "test-key".to_string(),
        }));
        let uploader = Arc::new(CloudinaryClient::new(&StorageConfig {
            base_url: storage.uri(),
            cloud_name: TEST_CLOUD.to_string(),
            upload_preset: "testpreset".to_string(),
        }));

        let service = Arc::new(IngestService::new(
            provider_client,
            uploader,
            db.clone(),
            &ingest,
        ));

        Self {
            provider,
            storage,
            db,
            service,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new().await;
        let addr = harness.spawn_server().await;
        (harness, addr)
    }

    /// Start an Axum server with custom ingest limits on a random port.
    pub async fn with_server_config(ingest: IngestConfig) -> (Self, SocketAddr) {
        let harness = Self::with_ingest_config(ingest).await;
        let addr = harness.spawn_server().await;
        (harness, addr)
    }

    async fn spawn_server(&self) -> SocketAddr {
        let app = create_router(AppContext {
            service: self.service.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get db connection")
    }

    /// Serve a curated page listing one photo per name, each with an
    /// original URL mentioning that name.
    pub async fn mount_curated(&self, names: &[&str]) {
        let photos: Vec<serde_json::Value> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "src": { "original": format!("https://images.example.com/{name}.jpg") }
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/curated"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "photos": photos })),
            )
            .mount(&self.provider)
            .await;
    }

    /// Accept uploads whose form body mentions `name`, assigning the id
    /// `{name}-stored`.
    pub async fn mount_upload_ok(&self, name: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/{TEST_CLOUD}/image/upload")))
            .and(body_string_contains(name))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": format!("{name}-stored"),
                "url": format!("http://cdn.example.com/{name}.jpg"),
                "secure_url": format!("https://cdn.example.com/{name}.jpg"),
            })))
            .mount(&self.storage)
            .await;
    }

    /// Reject uploads whose form body mentions `name`.
    pub async fn mount_upload_failure(&self, name: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/{TEST_CLOUD}/image/upload")))
            .and(body_string_contains(name))
            .respond_with(ResponseTemplate::new(500).set_body_string("storage exploded"))
            .mount(&self.storage)
            .await;
    }
}
