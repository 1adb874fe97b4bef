//! HTTP-level tests for `AmbariClient` against a mock Ambari server.
//!
//! Every test starts a `wiremock` server, points a client at it and asserts on
//! the requests the server received.

use std::sync::Arc;
use std::time::Duration;

use ambari_client::{
    AddOutcome, AmbariClient, ClientConfig, ClientError, ClusterName, ComponentName, HostName,
    LifecycleOrchestrator, RetryPolicy, ServiceCatalog, ServiceName, State,
};
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// =============================================================================
// Test Helpers
// =============================================================================

const USER: &str = "admin";
const PASSWORD: &str = "secret";

fn config_for(server: &MockServer) -> ClientConfig {
    let addr = server.address();
    ClientConfig::new(addr.ip().to_string(), addr.port(), USER, PASSWORD)
}

fn client_for(server: &MockServer) -> AmbariClient {
    AmbariClient::new(&config_for(server)).unwrap()
}

fn c1() -> ClusterName {
    ClusterName::new("c1").unwrap()
}

fn hdfs() -> ServiceName {
    ServiceName::new("HDFS").unwrap()
}

fn h1() -> HostName {
    HostName::new("h1").unwrap()
}

fn datanode() -> ComponentName {
    ComponentName::new("DATANODE").unwrap()
}

fn api_path(rest: &str) -> String {
    format!("/api/v1/{rest}")
}

fn href(server: &MockServer, rest: &str) -> String {
    format!("{}/api/v1/{rest}", server.uri())
}

/// Mount a single-resource GET that reports `href` as its link.
async fn mount_resource(server: &MockServer, rest: &str, extra: Value) {
    let mut body = json!({ "href": href(server, rest) });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    Mock::given(method("GET"))
        .and(path(api_path(rest)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_accept(server: &MockServer, verb: &str, rest: &str) {
    Mock::given(method(verb))
        .and(path(api_path(rest)))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// Method and path of every non-GET request, in order.
async fn mutations(server: &MockServer) -> Vec<(String, String)> {
    received(server)
        .await
        .into_iter()
        .filter(|r| r.method.as_str() != "GET")
        .map(|r| (r.method.as_str().to_string(), r.url.path().to_string()))
        .collect()
}

async fn put_bodies(server: &MockServer) -> Vec<Value> {
    received(server)
        .await
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn lists_clusters_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/"))
        .and(basic_auth(USER, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": href(&server, "clusters/"),
            "items": [
                {"href": href(&server, "clusters/c1"), "Clusters": {"cluster_name": "c1", "version": "HDP-2.6"}},
                {"href": href(&server, "clusters/c2"), "Clusters": {"cluster_name": "c2", "version": "HDP-2.6"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clusters = client_for(&server).clusters().await.unwrap();
    let names: Vec<&str> = clusters.iter().map(ClusterName::as_str).collect();
    assert_eq!(names, ["c1", "c2"]);
}

#[tokio::test]
async fn lists_every_collection_kind() {
    let server = MockServer::start().await;
    let collections = [
        ("clusters/c1/hosts/", json!({"Hosts": {"host_name": "h1"}})),
        ("clusters/c1/services/", json!({"ServiceInfo": {"service_name": "HDFS"}})),
        (
            "clusters/c1/services/HDFS/components/",
            json!({"ServiceComponentInfo": {"component_name": "NAMENODE"}}),
        ),
        (
            "clusters/c1/hosts/h1/host_components/",
            json!({"HostRoles": {"component_name": "DATANODE"}}),
        ),
    ];
    for (rest, item) in collections {
        Mock::given(method("GET"))
            .and(path(api_path(rest)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [item] })))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    assert_eq!(client.hosts(&c1()).await.unwrap(), vec![h1()]);
    assert_eq!(client.services(&c1()).await.unwrap(), vec![hdfs()]);
    assert_eq!(
        client.service_components(&c1(), &hdfs()).await.unwrap(),
        vec![ComponentName::new("NAMENODE").unwrap()]
    );
    assert_eq!(
        client.host_components(&c1(), &h1()).await.unwrap(),
        vec![datanode()]
    );
}

#[tokio::test]
async fn empty_collection_is_empty_vec() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/services/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": href(&server, "clusters/c1/services"),
            "items": []
        })))
        .mount(&server)
        .await;

    let services = client_for(&server).services(&c1()).await.unwrap();
    assert!(services.is_empty());
}

#[tokio::test]
async fn single_resource_returns_full_body() {
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "clusters/c1/services/HDFS",
        json!({"ServiceInfo": {"service_name": "HDFS", "state": "INSTALLED"}}),
    )
    .await;

    let service = client_for(&server).service(&c1(), &hdfs()).await.unwrap();
    assert_eq!(service.state(), Some(State::Installed));
    assert_eq!(
        service.attributes["ServiceInfo"]["service_name"],
        json!("HDFS")
    );
    assert_eq!(
        service.href(),
        Some(href(&server, "clusters/c1/services/HDFS").as_str())
    );
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "The requested resource doesn't exist: Cluster not found"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .cluster(&ClusterName::new("nope").unwrap())
        .await;
    assert!(matches!(result, Err(ClientError::NotFound { .. })));
}

#[tokio::test]
async fn remote_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status": 403,
            "message": "You do not have permissions to access this resource."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).clusters().await.unwrap_err();
    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("permissions"));
        }
        other => panic!("expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server).clusters().await;
    assert!(matches!(result, Err(ClientError::Decode(_))));
}

// =============================================================================
// State transitions
// =============================================================================

#[tokio::test]
async fn service_state_change_puts_envelope_to_located_endpoint() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/clusters/c1/services/HDFS"))
        .and(header("X-Requested-By", USER))
        .and(basic_auth(USER, PASSWORD))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "href": href(&server, "clusters/c1/requests/7"),
            "Requests": {"id": 7, "status": "Accepted"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let change = client_for(&server)
        .set_service_state(&c1(), &hdfs(), State::Started)
        .await
        .unwrap();

    assert_eq!(change.status, 202);
    assert_eq!(change.request.as_ref().map(|r| r.info.id), Some(7));

    let bodies = put_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["ServiceInfo"]["state"], json!("STARTED"));
    assert_eq!(body["RequestInfo"]["operation_level"]["level"], json!("SERVICE"));
    assert_eq!(body["RequestInfo"]["operation_level"]["cluster_name"], json!("c1"));
    assert!(body["RequestInfo"]["context"]
        .as_str()
        .unwrap()
        .contains("started"));
}

#[tokio::test]
async fn host_component_state_change_names_host() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/hosts/h1/host_components/DATANODE", json!({})).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/clusters/c1/hosts/h1/host_components/DATANODE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let change = client_for(&server)
        .start_host_component(&c1(), &h1(), &datanode())
        .await
        .unwrap();
    assert_eq!(change.status, 200);
    assert!(!change.is_accepted());

    let body = &put_bodies(&server).await[0];
    assert_eq!(
        body["RequestInfo"]["operation_level"]["level"],
        json!("HOST_COMPONENT")
    );
    assert_eq!(
        body["RequestInfo"]["operation_level"]["host_names"],
        json!("h1")
    );
    assert_eq!(body["HostRoles"]["state"], json!("STARTED"));
    assert_eq!(
        body["RequestInfo"]["context"],
        json!("Component DATANODE transition to started")
    );
}

#[tokio::test]
async fn stop_then_start_service_puts_twice_in_order() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/clusters/c1/services/HDFS"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.stop_service(&c1(), &hdfs()).await.unwrap();
    client.start_service(&c1(), &hdfs()).await.unwrap();

    let states: Vec<Value> = put_bodies(&server)
        .await
        .into_iter()
        .map(|b| b["ServiceInfo"]["state"].clone())
        .collect();
    assert_eq!(states, [json!("INSTALLED"), json!("STARTED")]);

    let paths: Vec<String> = mutations(&server).await.into_iter().map(|(_, p)| p).collect();
    assert_eq!(paths[0], paths[1]);
}

#[tokio::test]
async fn endpoint_is_relocated_before_each_change() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.stop_service(&c1(), &hdfs()).await.unwrap();
    client.start_service(&c1(), &hdfs()).await.unwrap();

    let gets = received(&server)
        .await
        .into_iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(gets, 2);
}

#[tokio::test]
async fn failed_locate_sends_no_mutation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.start_service(&c1(), &hdfs()).await;
    assert!(matches!(result, Err(ClientError::NotFound { .. })));

    let result = client.create_host_component(&c1(), &h1(), &datanode()).await;
    assert!(matches!(result, Err(ClientError::NotFound { .. })));

    assert!(mutations(&server).await.is_empty());
}

#[tokio::test]
async fn locate_without_href_is_missing_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/services/HDFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ServiceInfo": {"service_name": "HDFS"}
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).stop_service(&c1(), &hdfs()).await;
    assert!(matches!(result, Err(ClientError::MissingLink { .. })));
    assert!(mutations(&server).await.is_empty());
}

#[tokio::test]
async fn rejected_transition_is_remote_error() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "Invalid transition"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .start_service(&c1(), &hdfs())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
}

// =============================================================================
// Orchestration over HTTP
// =============================================================================

fn orchestrator_for(server: &MockServer) -> LifecycleOrchestrator<AmbariClient> {
    let catalog = ServiceCatalog::from_yaml_str("HDFS: [NAMENODE, DATANODE]\n").unwrap();
    LifecycleOrchestrator::new(Arc::new(client_for(server)), catalog)
}

#[tokio::test]
async fn add_service_posts_service_then_components() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/services/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("X-Requested-By", USER))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let outcome = orchestrator_for(&server)
        .add_service(&c1(), &hdfs())
        .await
        .unwrap();
    assert_eq!(outcome, AddOutcome::Created);

    assert_eq!(
        mutations(&server).await,
        vec![
            ("POST".to_string(), api_path("clusters/c1/services/HDFS")),
            (
                "POST".to_string(),
                api_path("clusters/c1/services/HDFS/components/NAMENODE")
            ),
            (
                "POST".to_string(),
                api_path("clusters/c1/services/HDFS/components/DATANODE")
            ),
        ]
    );

    // Create requests carry no body
    assert!(received(&server)
        .await
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn add_existing_service_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/services/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"ServiceInfo": {"service_name": "HDFS"}}]
        })))
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(&server);
    for _ in 0..2 {
        let outcome = orchestrator.add_service(&c1(), &hdfs()).await.unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyPresent);
    }
    assert!(mutations(&server).await.is_empty());
}

#[tokio::test]
async fn add_component_to_host_creates_then_installs() {
    let server = MockServer::start().await;
    // The host reports its link without a trailing slash
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/hosts/h1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": href(&server, "clusters/c1/hosts/h1")
        })))
        .mount(&server)
        .await;
    mount_resource(&server, "clusters/c1/hosts/h1/host_components/DATANODE", json!({})).await;
    mount_accept(&server, "POST", "clusters/c1/hosts/h1/host_components/DATANODE").await;
    mount_accept(&server, "PUT", "clusters/c1/hosts/h1/host_components/DATANODE").await;

    orchestrator_for(&server)
        .add_component_to_host(&c1(), &h1(), &datanode())
        .await
        .unwrap();

    let component = api_path("clusters/c1/hosts/h1/host_components/DATANODE");
    assert_eq!(
        mutations(&server).await,
        vec![
            ("POST".to_string(), component.clone()),
            ("PUT".to_string(), component),
        ]
    );
    let body = &put_bodies(&server).await[0];
    assert_eq!(body["HostRoles"]["state"], json!("INSTALLED"));
}

#[tokio::test]
async fn remove_service_deletes_located_endpoint() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/clusters/c1/services/HDFS"))
        .and(header("X-Requested-By", USER))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    orchestrator_for(&server)
        .remove_service(&c1(), &hdfs())
        .await
        .unwrap();
}

#[tokio::test]
async fn refused_removal_is_remote_error() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": 500,
            "message": "Cannot remove HDFS. Desired state STARTED is not removable."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = orchestrator_for(&server)
        .remove_service(&c1(), &hdfs())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Remote { status: 500, .. }));
}

#[tokio::test]
async fn add_host_posts_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/c1/hosts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"Hosts": {"host_name": "h1"}}]
        })))
        .mount(&server)
        .await;
    mount_accept(&server, "POST", "clusters/c1/hosts/h2").await;

    let orchestrator = orchestrator_for(&server);
    assert_eq!(
        orchestrator.add_host(&c1(), &h1()).await.unwrap(),
        AddOutcome::AlreadyPresent
    );
    assert_eq!(
        orchestrator
            .add_host(&c1(), &HostName::new("h2").unwrap())
            .await
            .unwrap(),
        AddOutcome::Created
    );
    assert_eq!(
        mutations(&server).await,
        vec![("POST".to_string(), api_path("clusters/c1/hosts/h2"))]
    );
}

// =============================================================================
// Timeouts and retries
// =============================================================================

#[tokio::test]
async fn reads_retry_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"Clusters": {"cluster_name": "c1"}}]
        })))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.retry = RetryPolicy::bounded(3, Duration::from_millis(10));
    let client = AmbariClient::new(&config).unwrap();

    assert_eq!(client.clusters().await.unwrap(), vec![c1()]);
    assert_eq!(received(&server).await.len(), 3);
}

#[tokio::test]
async fn reads_give_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.retry = RetryPolicy::bounded(2, Duration::from_millis(10));
    let client = AmbariClient::new(&config).unwrap();

    let err = client.clusters().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn mutations_are_never_retried() {
    let server = MockServer::start().await;
    mount_resource(&server, "clusters/c1/services/HDFS", json!({})).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.retry = RetryPolicy::bounded(5, Duration::from_millis(10));
    let client = Arc::new(AmbariClient::new(&config).unwrap());

    assert!(client.start_service(&c1(), &hdfs()).await.is_err());

    let orchestrator = LifecycleOrchestrator::new(Arc::clone(&client), ServiceCatalog::new());
    assert!(orchestrator.remove_service(&c1(), &hdfs()).await.is_err());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.request_timeout_seconds = 1;
    let client = AmbariClient::new(&config).unwrap();

    match client.clusters().await {
        Err(ClientError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
