//! Shared test utilities for integration tests

#![allow(dead_code)]

use ordermetrics::{parser, QueryRequest, ServiceConfig};
use rusqlite::Connection;

/// Load a configuration fixture from the tests/test_data directory
pub fn load_config(name: &str) -> ServiceConfig {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test config {}: {}", name, e))
}

/// Load a request fixture from the tests/test_data directory
pub fn load_request(name: &str) -> QueryRequest {
    let path = format!("tests/test_data/{}", name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read request {}: {}", name, e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Failed to parse request {}: {}", name, e))
}

const SCHEMA: &str = "
CREATE TABLE stores (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE customers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    city TEXT
);
CREATE TABLE products (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT
);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    store_id INTEGER REFERENCES stores(id),
    customer_id INTEGER REFERENCES customers(id),
    channel TEXT,
    status TEXT,
    order_date TEXT NOT NULL,
    total_amount REAL,
    delivery_fee REAL,
    discount_amount REAL,
    tax_amount REAL,
    delivery_time_minutes INTEGER,
    preparation_time_minutes INTEGER,
    rating INTEGER
);
CREATE TABLE order_items (
    id INTEGER PRIMARY KEY,
    order_id INTEGER REFERENCES orders(id),
    product_id INTEGER REFERENCES products(id),
    quantity INTEGER,
    total_price REAL
);
";

/// Four orders across two stores, three customers and three channels.
///
/// | order | store | customer | channel  | status    | order_date          | total |
/// |-------|-------|----------|----------|-----------|---------------------|-------|
/// | 1     | 1     | 1        | app      | delivered | 2024-01-05 12:30:00 | 50    |
/// | 2     | 1     | 2        | ifood    | delivered | 2024-01-15 19:00:00 | 80    |
/// | 3     | 2     | 1        | app      | cancelled | 2024-02-01 20:15:00 | 30    |
/// | 4     | 2     | 3        | in_store | delivered | 2024-02-10 13:00:00 | 40    |
const SEED: &str = "
INSERT INTO stores (id, name) VALUES (1, 'Centro'), (2, 'Norte');
INSERT INTO customers (id, name, city) VALUES
    (1, 'Ana', 'Sao Paulo'),
    (2, 'Bruno', 'Rio'),
    (3, 'Carla', 'Rio');
INSERT INTO products (id, name, category) VALUES
    (1, 'Margherita', 'Pizza'),
    (2, 'Cola', 'Drinks'),
    (3, 'Tiramisu', 'Dessert');
INSERT INTO orders VALUES
    (1, 1, 1, 'app',      'delivered', '2024-01-05 12:30:00', 50.0, 5.0, 0.0, 2.0, 30, 15, 5),
    (2, 1, 2, 'ifood',    'delivered', '2024-01-15 19:00:00', 80.0, 7.0, 5.0, 3.0, 40, 20, 4),
    (3, 2, 1, 'app',      'cancelled', '2024-02-01 20:15:00', 30.0, 5.0, 0.0, 1.0, NULL, 10, NULL),
    (4, 2, 3, 'in_store', 'delivered', '2024-02-10 13:00:00', 40.0, 0.0, 0.0, 2.0, 0, 12, 3);
INSERT INTO order_items (id, order_id, product_id, quantity, total_price) VALUES
    (1, 1, 1, 2, 40.0),
    (2, 1, 2, 1, 10.0),
    (3, 2, 1, 3, 80.0),
    (4, 3, 3, 1, 30.0),
    (5, 4, 2, 4, 40.0);
";

/// In-memory SQLite database with the order schema and seed rows
pub fn seeded_database() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(SCHEMA).expect("create schema");
    conn.execute_batch(SEED).expect("seed rows");
    conn
}

/// Numeric cell as f64, panicking with context otherwise
pub fn number(value: &serde_json::Value) -> f64 {
    value
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {}", value))
}
