//! End-to-end tests driving the router in-process against in-memory SQLite.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Days, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom_api::app;
use stockroom_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    app(db)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register(app: &Router, email: &str) -> i64 {
    let (status, _) = send(
        app,
        Method::POST,
        "/signup/",
        Some(json!({"username": "tester", "email": email, "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/login/",
        Some(json!({"email": email, "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["user_id"].as_i64().unwrap()
}

async fn add_product(app: &Router, user_id: i64, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/products/",
        Some(json!({"product_name": name, "category": "Dairy", "price": 2.49, "user_id": user_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Product added successfully");
    body["product_id"].as_i64().unwrap()
}

async fn add_stock(
    app: &Router,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    expiry: &str,
) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/stocks/",
        Some(json!({
            "product_id": product_id,
            "stock_quantity": quantity,
            "expiry_date": expiry,
            "user_id": user_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Stock added successfully");
    body["stock_id"].as_i64().unwrap()
}

async fn stock_quantities(app: &Router, user_id: i64) -> Vec<(i64, i64)> {
    let (status, body) = send(app, Method::GET, &format!("/stocks/?user_id={user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|s| (s["stock_id"].as_i64().unwrap(), s["stock_quantity"].as_i64().unwrap()))
        .collect()
}

fn days_from_today(days: i64) -> String {
    let today = Utc::now().date_naive();
    let date = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    date.unwrap().format("%Y-%m-%d").to_string()
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn signup_then_login() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup/",
        Some(json!({"username": "ada", "email": "ada@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User registered successfully"}));

    let (status, body) = send(
        &app,
        Method::POST,
        "/login/",
        Some(json!({"email": "ada@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert!(body["user_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let app = test_app().await;
    register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup/",
        Some(json!({"username": "other", "email": "ada@example.com", "password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BUSINESS_RULE");
    assert_eq!(body["detail"], "User with this email already exists");

    // The original password still works, so no second row took its place.
    let (status, _) = send(
        &app,
        Method::POST,
        "/login/",
        Some(json!({"email": "ada@example.com", "password": "s3cret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_or_unknown_email() {
    let app = test_app().await;
    register(&app, "ada@example.com").await;

    for payload in [
        json!({"email": "ada@example.com", "password": "wrong"}),
        json!({"email": "nobody@example.com", "password": "s3cret"}),
    ] {
        let (status, body) = send(&app, Method::POST, "/login/", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid email or password");
    }
}

#[tokio::test]
async fn signup_validates_input() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup/",
        Some(json!({"username": "ada", "email": "not-an-email", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Products, stock and sales
// =============================================================================

#[tokio::test]
async fn products_are_listed_with_decimal_prices() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let product_id = add_product(&app, user, "Greek Yogurt").await;

    let (status, body) = send(&app, Method::GET, &format!("/products/?user_id={user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "product_id": product_id,
            "product_name": "Greek Yogurt",
            "category": "Dairy",
            "price": 2.49,
            "user_id": user,
        }])
    );
}

#[tokio::test]
async fn product_for_unknown_user_is_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/products/",
        Some(json!({"product_name": "Milk", "category": "Dairy", "price": 1.0, "user_id": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid reference");
}

#[tokio::test]
async fn sell_then_oversell() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let product = add_product(&app, user, "Milk").await;
    let stock = add_stock(&app, user, product, 5, &days_from_today(30)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/sales/",
        Some(json!({"product_id": product, "quantity_sold": 3, "user_id": user})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sale added and stock updated successfully");
    assert_eq!(stock_quantities(&app, user).await, vec![(stock, 2)]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/sales/",
        Some(json!({"product_id": product, "quantity_sold": 10, "user_id": user})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(stock_quantities(&app, user).await, vec![(stock, 2)]);

    let (status, body) = send(&app, Method::GET, &format!("/sales/?user_id={user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let sales = body.as_array().unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["product_name"], "Milk");
    assert_eq!(sales[0]["quantity_sold"], 3);
}

#[tokio::test]
async fn sale_of_unknown_product_is_not_found() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/sales/",
        Some(json!({"product_id": 404, "quantity_sold": 1, "user_id": user})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn remove_whole_lot_then_again() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let product = add_product(&app, user, "Milk").await;
    let stock = add_stock(&app, user, product, 2, &days_from_today(10)).await;

    let uri = format!("/stocks/?stock_id={stock}&quantity=2&user_id={user}");
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Stock completely removed", "fully_removed": true, "remaining": 0})
    );
    assert!(stock_quantities(&app, user).await.is_empty());

    let uri = format!("/stocks/?stock_id={stock}&quantity=1&user_id={user}");
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_part_of_a_lot() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let product = add_product(&app, user, "Milk").await;
    let stock = add_stock(&app, user, product, 5, &days_from_today(10)).await;

    let uri = format!("/stocks/?stock_id={stock}&quantity=2&user_id={user}");
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Stock reduced by 2. Remaining stock: 3");
    assert_eq!(body["fully_removed"], false);
    assert_eq!(body["remaining"], 3);

    let uri = format!("/stocks/?stock_id={stock}&quantity=4&user_id={user}");
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(stock_quantities(&app, user).await, vec![(stock, 3)]);
}

#[tokio::test]
async fn delete_product_removes_its_stock() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let milk = add_product(&app, user, "Milk").await;
    let bread = add_product(&app, user, "Bread").await;
    add_stock(&app, user, milk, 5, &days_from_today(3)).await;
    let bread_lot = add_stock(&app, user, bread, 7, &days_from_today(3)).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/products/{milk}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product and associated stocks deleted successfully");
    assert_eq!(stock_quantities(&app, user).await, vec![(bread_lot, 7)]);

    let (status, _) = send(&app, Method::DELETE, &format!("/products/{milk}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expiring_stock_window() {
    let app = test_app().await;
    let user = register(&app, "ada@example.com").await;
    let product = add_product(&app, user, "Milk").await;
    let expired = add_stock(&app, user, product, 1, &days_from_today(-1)).await;
    let soon = add_stock(&app, user, product, 2, &days_from_today(3)).await;
    add_stock(&app, user, product, 3, &days_from_today(30)).await;

    let ids = |body: Value| -> Vec<i64> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|s| s["stock_id"].as_i64().unwrap())
            .collect()
    };

    let uri = format!("/stocks/expiring/?user_id={user}");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(body), vec![expired, soon]);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/stocks/expiring/?user_id={user}&days=0"),
        None,
    )
    .await;
    assert_eq!(ids(body), vec![expired]);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/stocks/expiring/?user_id={user}&days=-1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn malformed_requests_are_validation_errors() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/sales/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/stocks/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, Method::DELETE, "/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn cors_mirrors_origin_with_credentials() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/products/")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}
