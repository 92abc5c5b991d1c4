use reqwest::StatusCode;
use serde_json::json;

use medstock_api::config::{Config, UserConfig};
use medstock_auth::Role;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port and
        // keep the store in memory.
        let config = Config {
            bind: "127.0.0.1:0".parse().unwrap(),
            jwt_secret: "test-secret".to_string(),
            data_dir: None,
            users: vec![
                UserConfig {
                    username: "nurse".to_string(),
                    password: "nurse-pw".to_string(),
                    role: Role::staff(),
                },
                UserConfig {
                    username: "matron".to_string(),
                    password: "matron-pw".to_string(),
                    role: Role::admin(),
                },
            ],
        };

        let app = medstock_api::app::build_app(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn login(&self, client: &reqwest::Client, username: &str, password: &str) -> String {
        let res = client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_open() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_credentials_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "username": "nurse", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stock_crud_round_trip() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    // Create.
    let res = client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Paracetamol", "quantity": 20 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // List.
    let res = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stock: serde_json::Value = res.json().await.unwrap();
    assert_eq!(stock, json!([{ "name": "Paracetamol", "quantity": 20 }]));

    // Absolute update.
    let res = client
        .put(format!("{}/clinics/Boys/stock/Paracetamol", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Update of an unknown entry must not create it.
    let res = client
        .put(format!("{}/clinics/Boys/stock/Ibuprofen", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Delete of an unknown entry is a reported no-op.
    let res = client
        .delete(format!("{}/clinics/Boys/stock/Ibuprofen", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["outcome"], "missing");

    // Delete the real entry.
    let res = client
        .delete(format!("{}/clinics/Boys/stock/Paracetamol", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["outcome"], "deleted");
}

#[tokio::test]
async fn negative_quantity_gets_the_error_envelope() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    let res = client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Paracetamol", "quantity": -3 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_quantity");
}

#[tokio::test]
async fn dispatch_and_reverse_flow() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Paracetamol", "quantity": 20 }))
        .send()
        .await
        .unwrap();

    // Dispatch 5.
    let res = client
        .post(format!("{}/clinics/Boys/dispatch", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "transaction_number": "TR1",
            "medicine_name": "paracetamol",
            "count": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let record: serde_json::Value = res.json().await.unwrap();
    assert_eq!(record["medicine_name"], "Paracetamol");
    assert_eq!(record["count"], 5);
    let record_id = record["id"].as_str().unwrap().to_string();

    // Stock went 20 -> 15.
    let stock: serde_json::Value = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock[0]["quantity"], 15);

    // Over-dispatch is rejected without changing anything.
    let res = client
        .post(format!("{}/clinics/Boys/dispatch", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "transaction_number": "TR2",
            "medicine_name": "Paracetamol",
            "count": 100,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    // Reverse the dispatch: stock back to 20, log empty.
    let res = client
        .delete(format!(
            "{}/clinics/Boys/dispatch/{}",
            server.base_url, record_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let stock: serde_json::Value = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock[0]["quantity"], 20);

    let log: serde_json::Value = client
        .get(format!("{}/clinics/Boys/dispatch", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(log, json!([]));

    // Reversing it again is a 404.
    let res = client
        .delete(format!(
            "{}/clinics/Boys/dispatch/{}",
            server.base_url, record_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_is_gated_to_day_to_day_operations() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let staff = server.login(&client, "nurse", "nurse-pw").await;

    // Staff can add stock and record dispatches.
    let res = client
        .post(format!("{}/clinics/Girls/stock", server.base_url))
        .bearer_auth(&staff)
        .json(&json!({ "name": "Aspirin", "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/clinics/Girls/dispatch", server.base_url))
        .bearer_auth(&staff)
        .json(&json!({
            "transaction_number": "TR1",
            "medicine_name": "Aspirin",
            "count": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // But not delete, update, upload or reverse.
    let res = client
        .delete(format!("{}/clinics/Girls/stock/Aspirin", server.base_url))
        .bearer_auth(&staff)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/clinics/Girls/stock/Aspirin", server.base_url))
        .bearer_auth(&staff)
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/clinics/Girls/stock/upload", server.base_url))
        .bearer_auth(&staff)
        .body("Medicine,Quantity\nAspirin,1\n")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn clinics_do_not_leak_into_each_other() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Aspirin", "quantity": 10 }))
        .send()
        .await
        .unwrap();

    let girls: serde_json::Value = client
        .get(format!("{}/clinics/Girls/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(girls, json!([]));
}

#[tokio::test]
async fn bulk_upload_replaces_the_stock_table() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Old Medicine", "quantity": 9 }))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/clinics/Boys/stock/upload", server.base_url))
        .bearer_auth(&token)
        .body("Medicine,Quantity\nAspirin,10\nParacetamol,20\n")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let stock: serde_json::Value = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        stock,
        json!([
            { "name": "Aspirin", "quantity": 10 },
            { "name": "Paracetamol", "quantity": 20 },
        ])
    );

    // A malformed upload changes nothing.
    let res = client
        .post(format!("{}/clinics/Boys/stock/upload", server.base_url))
        .bearer_auth(&token)
        .body("Medicine,Quantity\nAspirin,minus-three\n")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stock: serde_json::Value = client
        .get(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn month_filter_on_the_dispatch_log() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Aspirin", "quantity": 50 }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/clinics/Boys/dispatch", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "transaction_number": "TR1",
            "medicine_name": "Aspirin",
            "count": 5,
        }))
        .send()
        .await
        .unwrap();

    // Records were just created, so the current month matches all of them
    // and an old month matches none.
    let now = chrono::Utc::now();
    use chrono::Datelike;
    let this_month: serde_json::Value = client
        .get(format!(
            "{}/clinics/Boys/dispatch?year={}&month={}",
            server.base_url,
            now.year(),
            now.month()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(this_month.as_array().unwrap().len(), 1);

    let old: serde_json::Value = client
        .get(format!(
            "{}/clinics/Boys/dispatch?year=1999&month=1",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(old, json!([]));

    // Half a filter is a 400.
    let res = client
        .get(format!("{}/clinics/Boys/dispatch?year=2025", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exports_download_with_the_right_shapes() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "matron", "matron-pw").await;

    client
        .post(format!("{}/clinics/Boys/stock", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Aspirin", "quantity": 50 }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/clinics/Boys/dispatch", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "transaction_number": "TR1",
            "medicine_name": "Aspirin",
            "count": 5,
        }))
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!(
            "{}/clinics/Boys/export/stock.csv",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let body = res.text().await.unwrap();
    assert!(body.starts_with("Medicine,Quantity\n"));
    assert!(body.contains("Aspirin,45"));

    let res = client
        .get(format!(
            "{}/clinics/Boys/export/report.csv",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.starts_with("Medicine,Month,Total Dispatched\n"));
    assert!(body.contains("Aspirin"));

    let res = client
        .get(format!(
            "{}/clinics/Boys/export/workbook.xlsx",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.bytes().await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}
