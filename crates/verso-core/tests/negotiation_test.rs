//! End-to-end negotiation scenarios through the full pipeline:
//! route matching, all four readers, combination, negotiation, dispatch,
//! and response annotation.

use serde_json::Value;
use verso_core::{
    ApiVersion, App, AppBuilder, EffectiveVersion, Json, NegotiationPolicy, RegistryBuilder,
    State, TestClient, TestRequest, DEPRECATED_HEADER, EFFECTIVE_VERSION_HEADER,
    SUPPORTED_VERSIONS_HEADER,
};

#[derive(Clone)]
struct Greeting(&'static str);

async fn customers_v1() -> &'static str {
    "customers v1"
}

async fn customers_v2() -> &'static str {
    "customers v2"
}

async fn customers_v3(EffectiveVersion(v): EffectiveVersion) -> String {
    format!("customers served by {}", v)
}

async fn products_v1(State(greeting): State<Greeting>) -> Json<Value> {
    Json(serde_json::json!({ "greeting": greeting.0, "version": 1 }))
}

async fn products_v2() -> Json<Value> {
    Json(serde_json::json!({ "version": 2 }))
}

fn app() -> App {
    let registry = RegistryBuilder::new()
        .variant("/api/{version}/customers", ApiVersion::new(1, 0), customers_v1)
        .unwrap()
        .variant("/api/{version}/customers", ApiVersion::new(2, 0), customers_v2)
        .unwrap()
        .variant("/api/{version}/customers", ApiVersion::new(3, 0), customers_v3)
        .unwrap()
        .deprecated_variant("/api/products", ApiVersion::new(1, 0), products_v1)
        .unwrap()
        .variant("/api/products", ApiVersion::new(2, 0), products_v2)
        .unwrap()
        .build();

    AppBuilder::new(registry, NegotiationPolicy::assume_default(ApiVersion::new(1, 0)))
        .state(Greeting("hello"))
        .build()
        .expect("route table builds")
}

#[tokio::test]
async fn url_segment_selects_the_variant() {
    let client = TestClient::new(app());

    let response = client.get("/api/v2/customers").await;
    response.assert_status(200);
    assert_eq!(response.text(), "customers v2");
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), Some("2.0"));
    assert_eq!(
        response.header(SUPPORTED_VERSIONS_HEADER),
        Some("1.0, 2.0, 3.0")
    );
}

#[tokio::test]
async fn header_only_signal_resolves_to_that_version() {
    let client = TestClient::new(app());

    let response = client
        .request(TestRequest::get("/api/products").header("x-api-version", "2.0"))
        .await;
    response.assert_status(200);
    assert_eq!(response.json::<Value>()["version"], 2);
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), Some("2.0"));
}

#[tokio::test]
async fn media_type_parameter_resolves_to_that_version() {
    let client = TestClient::new(app());

    let response = client
        .request(TestRequest::get("/api/products").accept("application/json; version=2.0"))
        .await;
    response.assert_status(200);
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), Some("2.0"));
}

#[tokio::test]
async fn agreeing_channels_resolve() {
    let client = TestClient::new(app());

    let response = client
        .request(
            TestRequest::get("/api/products?api-version=2.0")
                .header("x-api-version", "2")
                .accept("application/json; version=2.0"),
        )
        .await;
    response.assert_status(200);
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), Some("2.0"));
}

#[tokio::test]
async fn conflicting_channels_reject_without_invoking_a_handler() {
    let client = TestClient::new(app());

    // URL segment says 1.0, query string says 2.0.
    let response = client.get("/api/v1/customers?api-version=2.0").await;
    response.assert_status(400);

    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "ambiguous_version");
    assert_eq!(
        body["supported_versions"],
        serde_json::json!(["1.0", "2.0", "3.0"])
    );
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), None);
}

#[tokio::test]
async fn unversioned_request_assumes_the_default() {
    let client = TestClient::new(app());

    let response = client.get("/api/products").await;
    response.assert_status(200);
    assert_eq!(response.header(EFFECTIVE_VERSION_HEADER), Some("1.0"));
}

#[tokio::test]
async fn unsupported_version_rejects_with_supported_list() {
    let client = TestClient::new(app());

    let response = client
        .request(TestRequest::get("/api/products").header("x-api-version", "9.0"))
        .await;
    response.assert_status(400);

    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "unsupported_version");
    assert_eq!(body["supported_versions"], serde_json::json!(["1.0", "2.0"]));
}

#[tokio::test]
async fn malformed_token_rejects_as_ambiguous() {
    let client = TestClient::new(app());

    let response = client.get("/api/products?api-version=latest").await;
    response.assert_status(400);
    assert_eq!(response.json::<Value>()["error"]["type"], "ambiguous_version");
}

#[tokio::test]
async fn deprecated_effective_version_is_flagged() {
    let client = TestClient::new(app());

    let response = client.get("/api/products?api-version=1.0").await;
    response.assert_status(200);
    assert_eq!(response.header(DEPRECATED_HEADER), Some("true"));

    let response = client.get("/api/products?api-version=2.0").await;
    response.assert_status(200);
    assert_eq!(response.header(DEPRECATED_HEADER), None);
}

#[tokio::test]
async fn handlers_can_extract_the_effective_version() {
    let client = TestClient::new(app());

    let response = client.get("/api/v3/customers").await;
    response.assert_status(200);
    assert_eq!(response.text(), "customers served by 3.0");
}

#[tokio::test]
async fn handlers_receive_injected_state() {
    let client = TestClient::new(app());

    let response = client.get("/api/products?api-version=1.0").await;
    assert_eq!(response.json::<Value>()["greeting"], "hello");
}

#[tokio::test]
async fn unknown_path_is_a_plain_404() {
    let client = TestClient::new(app());

    let response = client.get("/api/unknown").await;
    response.assert_status(404);
}

#[tokio::test]
async fn identical_requests_land_in_the_same_terminal_state() {
    let client = TestClient::new(app());

    let first = client.get("/api/v1/customers?api-version=2.0").await;
    let second = client.get("/api/v1/customers?api-version=2.0").await;
    assert_eq!(first.status(), second.status());
    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn version_descriptions_expose_route_metadata() {
    let descriptions = app().version_descriptions();
    assert_eq!(descriptions.len(), 2);

    let products = descriptions
        .iter()
        .find(|d| d.route == "/api/products")
        .unwrap();
    assert_eq!(
        products.supported,
        vec![ApiVersion::new(1, 0), ApiVersion::new(2, 0)]
    );
    assert_eq!(products.deprecated, vec![ApiVersion::new(1, 0)]);
}

#[tokio::test]
async fn strict_policy_requires_an_explicit_version() {
    async fn only_v1() -> &'static str {
        "v1"
    }
    let registry = RegistryBuilder::new()
        .variant("/api/things", ApiVersion::new(1, 0), only_v1)
        .unwrap()
        .build();
    let app = AppBuilder::new(
        registry,
        NegotiationPolicy::require_explicit(ApiVersion::new(1, 0)),
    )
    .build()
    .unwrap();
    let client = TestClient::new(app);

    let response = client.get("/api/things").await;
    response.assert_status(400);
    assert_eq!(
        response.json::<Value>()["error"]["type"],
        "no_matching_variant"
    );
}
