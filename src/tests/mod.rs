pub(crate) mod retry_401_success;

use crate::tests::test_support::client_with_session;
use crate::{Error, Resource, TokenStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn server_errors_surface_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/results/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, store) = client_with_session(&server.uri(), Some("a"), Some("r"));
    let res = client
        .resource(Resource::Results)
        .list::<serde_json::Value>(&[])
        .await;

    match res {
        Err(Error::Http(status, body)) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Error::Http, got {:?}", other),
    }
    assert_eq!(store.get().access.as_deref(), Some("a"));
}
