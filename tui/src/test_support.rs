//! In-process mock backend for HTTP tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::http::ApiClient;
use crate::storage::{LocalStorage, TokenStorage};

pub struct MockBackend {
    pub addr: SocketAddr,
}

impl MockBackend {
    pub async fn spawn(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });
        Self { addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1/", self.addr)
    }
}

/// Client with a throwaway token store. Keep the directory alive for the
/// duration of the test.
pub fn client_for(mock: &MockBackend) -> (tempfile::TempDir, ApiClient) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStorage::open(dir.path().join("storage.json"));
    let client = ApiClient::new(
        &mock.base_url(),
        Duration::from_secs(5),
        TokenStorage::new(store),
    )
    .unwrap();
    (dir, client)
}
