//! API helper tests against a stubbed BrAPI backend.

use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, method, path, path_regex, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bijmantra_e2e::api::{NewProgram, NewVariable};
use bijmantra_e2e::{ApiClient, E2eError, PageQuery};

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({
        "metadata": { "pagination": { "currentPage": 0, "pageSize": 100, "totalCount": 2, "totalPages": 1 } },
        "result": { "data": data }
    })
}

#[tokio::test]
async fn authenticate_stores_token_and_sends_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_string_contains("password=demo123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/programs"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = ApiClient::new(&server.uri());
    let token = client
        .authenticate("demo@bijmantra.org", "demo123")
        .await
        .unwrap();
    assert_eq!(token, "tok-123");
    assert_eq!(client.token(), Some("tok-123"));

    let page = client.get_programs(PageQuery::default()).await.unwrap();
    assert!(page.records().is_empty());
}

#[tokio::test]
async fn authenticate_failure_carries_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut client = ApiClient::new(&server.uri());
    let err = client
        .authenticate("invalid@email.com", "wrongpassword")
        .await
        .unwrap_err();

    assert!(matches!(err, E2eError::Auth { status: 401 }));
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn check_health_reflects_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    assert!(client.check_health().await);
}

#[tokio::test]
async fn check_health_false_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    assert!(!client.check_health().await);
}

#[tokio::test]
async fn check_health_false_when_unreachable() {
    // Nothing listens here; the probe must resolve to false, not error.
    let client = ApiClient::new("http://127.0.0.1:9");
    assert!(!client.check_health().await);
}

#[tokio::test]
async fn list_uses_default_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/germplasm"))
        .and(query_param("page", "0"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    client.get_germplasm(PageQuery::default()).await.unwrap();
}

#[tokio::test]
async fn list_passes_explicit_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/trials"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    client
        .get_trials(PageQuery {
            page: 2,
            page_size: 10,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn create_program_sends_typed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/brapi/v2/programs"))
        .and(body_json(json!({"programName": "E2E_TEST_Wheat"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "result": { "programDbId": "P9", "programName": "E2E_TEST_Wheat" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let created = client
        .create_program(NewProgram {
            program_name: "E2E_TEST_Wheat".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created["result"]["programDbId"], "P9");
}

#[tokio::test]
async fn create_variable_wraps_payload_in_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/brapi/v2/variables"))
        .and(body_json(json!([
            {"observationVariableName": "E2E_TEST_PlantHeight"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"data": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    client
        .create_variable(NewVariable {
            observation_variable_name: "E2E_TEST_PlantHeight".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn cleanup_deletes_only_prefixed_records_and_is_idempotent() {
    let server = MockServer::start().await;

    // First sweep sees one disposable and one real program.
    Mock::given(method("GET"))
        .and(path("/brapi/v2/programs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "programDbId": "P1", "programName": "E2E_TEST_Alpha" },
            { "programDbId": "P2", "programName": "Production Wheat" }
        ]))))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Every later sweep sees nothing left.
    Mock::given(method("GET"))
        .and(path("/brapi/v2/programs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/brapi/v2/programs/P1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/brapi/v2/programs/P2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Unstubbed collections 404 on list; cleanup must carry on regardless.
    let client = ApiClient::new(&server.uri());

    let first = client.cleanup_test_data("E2E_TEST_").await;
    assert_eq!(first, 1);

    let second = client.cleanup_test_data("E2E_TEST_").await;
    assert_eq!(second, 0);
}

#[tokio::test]
async fn cleanup_pages_through_large_collections() {
    let server = MockServer::start().await;

    let page_of = |start: usize, count: usize| {
        let data: Vec<_> = (start..start + count)
            .map(|i| {
                json!({
                    "programDbId": format!("P{i}"),
                    "programName": format!("E2E_TEST_Bulk {i}")
                })
            })
            .collect();
        json!({
            "metadata": { "pagination": { "pageSize": 100, "totalCount": 150, "totalPages": 2 } },
            "result": { "data": data }
        })
    };

    // 150 disposable programs spread over two pages.
    Mock::given(method("GET"))
        .and(path("/brapi/v2/programs"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(0, 100)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/programs"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(100, 50)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/brapi/v2/programs/P\d+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(150)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let attempted = client.cleanup_test_data("E2E_TEST_").await;
    assert_eq!(attempted, 150);
}

#[tokio::test]
async fn cleanup_survives_individual_delete_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "locationDbId": "L1", "locationName": "E2E_TEST_Field A" },
            { "locationDbId": "L2", "locationName": "E2E_TEST_Field B" }
        ]))))
        .mount(&server)
        .await;

    // First delete blows up server-side; the second must still be attempted.
    Mock::given(method("DELETE"))
        .and(path("/brapi/v2/locations/L1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/brapi/v2/locations/L2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let attempted = client.cleanup_test_data("E2E_TEST_").await;
    assert_eq!(attempted, 2);
}

#[tokio::test]
async fn server_info_returns_raw_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brapi/v2/serverinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "serverName": "bijmantra", "calls": [] }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let info = client.server_info().await.unwrap();
    assert_eq!(info["result"]["serverName"], "bijmantra");
}
