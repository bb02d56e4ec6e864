use std::time::Duration;

use axum::Router;

use crate::ssg_client::SsgClient;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A client without a TLS identity, for plain-HTTP stubs.
pub fn stub_client(base_url: &str) -> SsgClient {
    SsgClient::new(base_url, Duration::from_secs(5), None).unwrap()
}
