//! Sample data served by the demo handlers
//!
//! Each logical resource has one shape per version; newer versions widen or
//! restructure the schema. The data is owned by [`SampleData`] and injected
//! as application state, not reached through globals.

use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct CustomerV1 {
    pub id: u32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerV2 {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerV3 {
    pub customer_id: String,
    pub full_name: String,
    pub email_addresses: Vec<String>,
    pub primary_phone_number: String,
    pub created_at: String,
    pub last_modified_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductV1 {
    pub id: u32,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductV2 {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub discount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderV1 {
    pub id: u32,
    pub customer_id: u32,
    pub amount: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderV2 {
    pub id: u32,
    pub customer_id: u32,
    pub amount: f64,
    pub status: String,
    pub currency: String,
    pub tracking_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceV1 {
    pub invoice_number: String,
    pub customer_id: u32,
    pub amount: f64,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceV2 {
    pub invoice_number: String,
    pub customer_id: u32,
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
    pub is_paid: bool,
}

/// All sample collections, shared read-only across requests.
#[derive(Clone)]
pub struct SampleData {
    inner: Arc<Collections>,
}

struct Collections {
    customers_v1: Vec<CustomerV1>,
    customers_v2: Vec<CustomerV2>,
    customers_v3: Vec<CustomerV3>,
    products_v1: Vec<ProductV1>,
    products_v2: Vec<ProductV2>,
    orders_v1: Vec<OrderV1>,
    orders_v2: Vec<OrderV2>,
    invoices_v1: Vec<InvoiceV1>,
    invoices_v2: Vec<InvoiceV2>,
}

impl SampleData {
    pub fn customers_v1(&self) -> &[CustomerV1] {
        &self.inner.customers_v1
    }
    pub fn customers_v2(&self) -> &[CustomerV2] {
        &self.inner.customers_v2
    }
    pub fn customers_v3(&self) -> &[CustomerV3] {
        &self.inner.customers_v3
    }
    pub fn products_v1(&self) -> &[ProductV1] {
        &self.inner.products_v1
    }
    pub fn products_v2(&self) -> &[ProductV2] {
        &self.inner.products_v2
    }
    pub fn orders_v1(&self) -> &[OrderV1] {
        &self.inner.orders_v1
    }
    pub fn orders_v2(&self) -> &[OrderV2] {
        &self.inner.orders_v2
    }
    pub fn invoices_v1(&self) -> &[InvoiceV1] {
        &self.inner.invoices_v1
    }
    pub fn invoices_v2(&self) -> &[InvoiceV2] {
        &self.inner.invoices_v2
    }
}

impl Default for SampleData {
    fn default() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            inner: Arc::new(Collections {
                customers_v1: vec![
                    CustomerV1 {
                        id: 1,
                        name: s("John Doe"),
                        email: s("john@example.com"),
                    },
                    CustomerV1 {
                        id: 2,
                        name: s("Jane Smith"),
                        email: s("jane@example.com"),
                    },
                ],
                customers_v2: vec![
                    CustomerV2 {
                        id: 1,
                        name: s("John Doe"),
                        email: s("john@example.com"),
                        phone_number: s("555-0001"),
                        created_at: s("2024-01-15T09:30:00Z"),
                    },
                    CustomerV2 {
                        id: 2,
                        name: s("Jane Smith"),
                        email: s("jane@example.com"),
                        phone_number: s("555-0002"),
                        created_at: s("2024-02-20T14:05:00Z"),
                    },
                ],
                customers_v3: vec![
                    CustomerV3 {
                        customer_id: s("CUST-001"),
                        full_name: s("John Doe"),
                        email_addresses: vec![s("john@example.com")],
                        primary_phone_number: s("555-0001"),
                        created_at: s("2024-01-15T09:30:00Z"),
                        last_modified_at: s("2024-06-01T11:00:00Z"),
                    },
                    CustomerV3 {
                        customer_id: s("CUST-002"),
                        full_name: s("Jane Smith"),
                        email_addresses: vec![s("jane@example.com")],
                        primary_phone_number: s("555-0002"),
                        created_at: s("2024-02-20T14:05:00Z"),
                        last_modified_at: s("2024-06-02T16:45:00Z"),
                    },
                ],
                products_v1: vec![
                    ProductV1 {
                        id: 1,
                        name: s("Widget A"),
                        price: 29.99,
                    },
                    ProductV1 {
                        id: 2,
                        name: s("Widget B"),
                        price: 39.99,
                    },
                ],
                products_v2: vec![
                    ProductV2 {
                        id: 1,
                        name: s("Widget A"),
                        price: 29.99,
                        stock: 100,
                        discount: 0.1,
                    },
                    ProductV2 {
                        id: 2,
                        name: s("Widget B"),
                        price: 39.99,
                        stock: 50,
                        discount: 0.05,
                    },
                ],
                orders_v1: vec![
                    OrderV1 {
                        id: 1001,
                        customer_id: 1,
                        amount: 99.99,
                        status: s("Completed"),
                    },
                    OrderV1 {
                        id: 1002,
                        customer_id: 2,
                        amount: 149.99,
                        status: s("Pending"),
                    },
                ],
                orders_v2: vec![
                    OrderV2 {
                        id: 1001,
                        customer_id: 1,
                        amount: 99.99,
                        status: s("Completed"),
                        currency: s("USD"),
                        tracking_number: s("TRK-123456"),
                    },
                    OrderV2 {
                        id: 1002,
                        customer_id: 2,
                        amount: 149.99,
                        status: s("Pending"),
                        currency: s("USD"),
                        tracking_number: s("TRK-789012"),
                    },
                ],
                invoices_v1: vec![
                    InvoiceV1 {
                        invoice_number: s("INV-001"),
                        customer_id: 1,
                        amount: 299.99,
                        is_paid: false,
                    },
                    InvoiceV1 {
                        invoice_number: s("INV-002"),
                        customer_id: 2,
                        amount: 450.50,
                        is_paid: true,
                    },
                ],
                invoices_v2: vec![
                    InvoiceV2 {
                        invoice_number: s("INV-001"),
                        customer_id: 1,
                        subtotal: 250.00,
                        tax: 25.00,
                        discount: 25.01,
                        total: 299.99,
                        is_paid: false,
                    },
                    InvoiceV2 {
                        invoice_number: s("INV-002"),
                        customer_id: 2,
                        subtotal: 400.00,
                        tax: 40.00,
                        discount: 0.00,
                        total: 450.50,
                        is_paid: true,
                    },
                ],
            }),
        }
    }
}
