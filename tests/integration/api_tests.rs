//! API integration tests against a running server backed by PostgreSQL

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Helper to create a book and return its id
async fn create_test_book(client: &Client, title: &str, author: &str) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": title,
            "author": author,
            "price": 12.5,
            "publishedDate": "2020-01-01T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse create response");
    body["id"].as_i64().expect("No book ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
    assert!(body["totalBooks"].is_number());
    assert!(body["totalPages"].is_number());
    assert_eq!(body["currentPage"], 1);
}

#[tokio::test]
#[ignore]
async fn test_create_update_and_delete_book() {
    let client = Client::new();
    let id = create_test_book(&client, "Integration Book", "Integration Author").await;

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({
            "id": id,
            "title": "Integration Book (2nd ed.)",
            "author": "Integration Author",
            "price": 15.0
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["title"], "Integration Book (2nd ed.)");
    assert_eq!(body["price"], 15.0);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_filter_by_author() {
    let client = Client::new();
    let author = "Filter Test Author 7f3a";
    let id = create_test_book(&client, "Filtered", author).await;

    let body: Value = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("author", author)])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["totalBooks"], 1);
    assert_eq!(body["books"][0]["id"], id);

    // Cleanup
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_page_out_of_range() {
    let client = Client::new();
    let id = create_test_book(&client, "Paging", "Paging Author").await;

    let response = client
        .get(format!("{}/books?page=1000000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await;
}
