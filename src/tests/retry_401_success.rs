use crate::tests::test_support::{capture_logs, client_with_session, drain_logs};
use crate::{Resource, TokenStore};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn retries_once_after_401_then_succeeds() {
    let server = MockServer::start().await;

    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .respond_with(move |req: &Request| {
            let auth = req
                .headers
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string());
            let ok = auth.as_deref() == Some("Bearer fresh-access");
            seen_clone.lock().unwrap().push(auth);
            if ok {
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 1}]))
            } else {
                ResponseTemplate::new(401).set_body_string("token expired")
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(serde_json::json!({"refresh": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access": "fresh-access"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = client_with_session(&server.uri(), Some("stale"), Some("refresh-1"));

    let (lines, guard) = capture_logs();
    let res = client
        .resource(Resource::Students)
        .list::<serde_json::Value>(&[])
        .await;
    drop(guard);

    let body = res.expect("request should succeed after refresh");
    assert_eq!(body, serde_json::json!([{"id": 1}]));

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Some("Bearer stale".to_string()),
            Some("Bearer fresh-access".to_string())
        ]
    );
    let session = store.get();
    assert_eq!(session.access.as_deref(), Some("fresh-access"));
    assert_eq!(session.refresh.as_deref(), Some("refresh-1"));

    let logs = drain_logs(lines);
    assert!(
        logs.iter()
            .any(|line| line.contains("WARN") && line.contains("401")),
        "expected warning log mentioning 401, got: {:?}",
        logs
    );
    assert!(logs.iter().any(|line| line.contains("refresh.success")));
    assert!(
        logs.iter()
            .any(|line| line.contains("request.outcome") && line.contains("retried")),
        "expected outcome log in retried state, got: {:?}",
        logs
    );
}
