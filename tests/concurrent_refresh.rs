mod common;

use std::time::Duration;

use schooladmin_client::{Resource, TokenStore};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn concurrent_401s_each_refresh_and_retry() {
    let server = MockServer::start().await;

    for route in ["/api/students/", "/api/teachers/"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(100)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }
    // No coalescing: both requests run their own exchange.
    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access": "fresh"})))
        .expect(2)
        .mount(&server)
        .await;

    let (client, store) = common::client(&server.uri(), Some("stale"), Some("r1"));
    let other = client.clone();

    let students_resource = client.resource(Resource::Students);
    let teachers_resource = other.resource(Resource::Teachers);
    let (students, teachers) = tokio::join!(
        students_resource.list::<Vec<serde_json::Value>>(&[]),
        teachers_resource.list::<Vec<serde_json::Value>>(&[]),
    );

    students.expect("students retried");
    teachers.expect("teachers retried");
    assert_eq!(store.get().access.as_deref(), Some("fresh"));
}
