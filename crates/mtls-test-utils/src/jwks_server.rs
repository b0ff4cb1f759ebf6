//! Mock JWKS endpoint.

use crate::test_ids::TEST_JWKS_PATH;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A wiremock server publishing a key set at [`TEST_JWKS_PATH`].
///
/// Expectations set with `expected_calls` are verified when the server is
/// dropped, so a test fails if the authenticator fetched more (or less)
/// often than expected.
pub struct MockJwksServer {
    server: MockServer,
}

impl MockJwksServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Full JWKS URL to register for a client.
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), TEST_JWKS_PATH)
    }

    /// Serve `body` with status 200, expecting exactly `expected_calls` fetches.
    pub async fn serve_key_set(&self, body: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(TEST_JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(body),
            )
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Answer every fetch with `status` and an empty body.
    pub async fn serve_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(TEST_JWKS_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has received so far.
    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
