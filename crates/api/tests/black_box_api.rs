use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use bookshelf_infra::InMemoryBookStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) over a fresh store, bound to an
        // ephemeral port.
        let app = bookshelf_api::app::build_app(Arc::new(InMemoryBookStore::new()));
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
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_endpoint_responds() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_starts_empty() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn book_lifecycle_create_list_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        created,
        json!({ "id": 1, "title": "Dune", "release_year": 1965 })
    );

    // List
    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        listed,
        json!([{ "id": 1, "title": "Dune", "release_year": 1965 }])
    );

    // Delete
    let res = client
        .delete(format!("{}/api/books/1/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    // The id no longer names a row.
    let res = client
        .put(format!("{}/api/books/1/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_assigns_fresh_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (i, (title, year)) in [("Dune", 1965), ("Hyperion", 1989)].iter().enumerate() {
        let res = client
            .post(format!("{}/api/books/create/", srv.base_url))
            .json(&json!({ "title": title, "release_year": year }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: serde_json::Value = res.json().await.unwrap();
        assert_eq!(created["id"], i as i64 + 1);
    }

    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_rejects_invalid_payloads_with_field_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Missing title
    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "title": ["This field is required."] }));

    // Mistyped release_year
    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": "1965" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "release_year": ["A valid integer is required."] })
    );

    // Over-long title
    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "x".repeat(201), "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "title": ["Ensure this field has no more than 200 characters."] })
    );

    // None of the rejected payloads were persisted.
    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn update_replaces_both_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1964 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .put(format!("{}/api/books/1/", srv.base_url))
        .json(&json!({ "title": "Dune Messiah", "release_year": 1969 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        updated,
        json!({ "id": 1, "title": "Dune Messiah", "release_year": 1969 })
    );

    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        listed,
        json!([{ "id": 1, "title": "Dune Messiah", "release_year": 1969 }])
    );
}

#[tokio::test]
async fn update_validates_the_body_for_existing_rows() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .put(format!("{}/api/books/1/", srv.base_url))
        .json(&json!({ "title": "Dune" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "release_year": ["This field is required."] }));

    // The row is untouched.
    let res = client
        .get(format!("{}/api/books/", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        listed,
        json!([{ "id": 1, "title": "Dune", "release_year": 1965 }])
    );
}

#[tokio::test]
async fn unknown_ids_yield_404_before_body_validation() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Update of an unknown id is 404 even with an invalid body.
    let res = client
        .put(format!("{}/api/books/999/", srv.base_url))
        .json(&json!({ "title": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/books/999/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_ids_yield_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{}/api/books/not-a-number/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/api/books/not-a-number/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_twice_reports_404_the_second_time() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/books/create/", srv.base_url))
        .json(&json!({ "title": "Dune", "release_year": 1965 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .delete(format!("{}/api/books/1/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!("{}/api/books/1/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
