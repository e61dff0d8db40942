//! Versioned API demo: four signaling strategies against one registry
//!
//! Try:
//!
//! ```text
//! curl http://127.0.0.1:8080/api/v2/customers
//! curl 'http://127.0.0.1:8080/api/products?api-version=2.0'
//! curl -H 'X-API-Version: 2.0' http://127.0.0.1:8080/api/orders
//! curl -H 'Accept: application/json; version=2.0' http://127.0.0.1:8080/api/invoices
//! ```
//!
//! Every route accepts every channel; conflicting signals come back as a
//! structured 400 rather than a silently picked winner.

mod data;

use data::SampleData;
use verso_core::{
    ApiVersion, AppBuilder, Json, NegotiationPolicy, RegistryBuilder, State,
};

async fn customers_v1(State(data): State<SampleData>) -> Json<Vec<data::CustomerV1>> {
    Json(data.customers_v1().to_vec())
}

async fn customers_v2(State(data): State<SampleData>) -> Json<Vec<data::CustomerV2>> {
    Json(data.customers_v2().to_vec())
}

async fn customers_v3(State(data): State<SampleData>) -> Json<Vec<data::CustomerV3>> {
    Json(data.customers_v3().to_vec())
}

async fn products_v1(State(data): State<SampleData>) -> Json<Vec<data::ProductV1>> {
    Json(data.products_v1().to_vec())
}

async fn products_v2(State(data): State<SampleData>) -> Json<Vec<data::ProductV2>> {
    Json(data.products_v2().to_vec())
}

async fn orders_v1(State(data): State<SampleData>) -> Json<Vec<data::OrderV1>> {
    Json(data.orders_v1().to_vec())
}

async fn orders_v2(State(data): State<SampleData>) -> Json<Vec<data::OrderV2>> {
    Json(data.orders_v2().to_vec())
}

async fn invoices_v1(State(data): State<SampleData>) -> Json<Vec<data::InvoiceV1>> {
    Json(data.invoices_v1().to_vec())
}

async fn invoices_v2(State(data): State<SampleData>) -> Json<Vec<data::InvoiceV2>> {
    Json(data.invoices_v2().to_vec())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let v1 = ApiVersion::new(1, 0);
    let v2 = ApiVersion::new(2, 0);
    let v3 = ApiVersion::new(3, 0);

    let registry = RegistryBuilder::new()
        // URL segment strategy: /api/v1/customers
        .deprecated_variant("/api/{version}/customers", v1, customers_v1)?
        .variant("/api/{version}/customers", v2, customers_v2)?
        .variant("/api/{version}/customers", v3, customers_v3)?
        // Query string strategy: /api/products?api-version=1.0
        .variant("/api/products", v1, products_v1)?
        .variant("/api/products", v2, products_v2)?
        // Header strategy: X-API-Version: 1.0
        .variant("/api/orders", v1, orders_v1)?
        .variant("/api/orders", v2, orders_v2)?
        // Media type strategy: Accept: application/json; version=1.0
        .variant("/api/invoices", v1, invoices_v1)?
        .variant("/api/invoices", v2, invoices_v2)?
        .build();

    let app = AppBuilder::new(registry, NegotiationPolicy::assume_default(v1))
        .state(SampleData::default())
        .build()?;

    for route in app.version_descriptions() {
        println!(
            "{}  supported: [{}]  deprecated: [{}]",
            route.route,
            join_versions(&route.supported),
            join_versions(&route.deprecated),
        );
    }

    app.run("127.0.0.1:8080").await
}

fn join_versions(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
