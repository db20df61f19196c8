use httpmock::prelude::*;
use small_storefront::core::{ConfigProvider, KeyValueStore};
use small_storefront::{CartManager, FileStore, HttpCatalog, LoadOutcome, Storefront, TomlConfig};
use std::sync::Arc;
use tempfile::TempDir;

fn mock_catalog(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": 1, "title": "Apple", "category": "Fruits", "price": 10.0, "rate": 4.5},
                {"id": 2, "title": "Carrot", "category": "Vegetables", "price": 20.0},
                {"id": 3, "title": "Banana", "category": "Fruits", "price": 5.5,
                 "rating": {"rate": 3.2, "count": 8}}
            ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/categories");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id": 1, "name": "Fruits"},
                {"id": 2, "name": "Vegetables"}
            ]));
    });
}

fn config_for(server: &MockServer, store_path: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[source]
products_endpoint = "{}"
categories_endpoint = "{}"
timeout_seconds = 5

[storage]
path = "{}"
"#,
        server.url("/products"),
        server.url("/api/categories"),
        store_path.replace('\\', "\\\\"),
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

fn open_screen(config: &TomlConfig) -> Storefront<HttpCatalog, FileStore> {
    let catalog = HttpCatalog::new(config).unwrap();
    let store = Arc::new(FileStore::new(config.store_path()));
    Storefront::new(catalog, CartManager::new(store, config.cart_key()))
}

#[tokio::test]
async fn test_end_to_end_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    mock_catalog(&server);
    let config = config_for(&server, &store_path);

    let mut screen = open_screen(&config);
    let report = screen.mount().await;
    assert_eq!(report.products, 3);
    assert_eq!(report.categories, 2);
    assert_eq!(report.cart, LoadOutcome::Empty);

    assert_eq!(screen.tap(1), Some(true));
    assert_eq!(screen.tap(2), Some(true));
    let status = screen.cart().flush().await.unwrap();
    assert!(status.is_healthy());
    assert_eq!(screen.cart().total(), 30.0);

    let saved = std::path::Path::new(&store_path).join("cart.json");
    assert!(saved.exists());

    let mut restarted = open_screen(&config);
    let report = restarted.mount().await;
    assert_eq!(report.cart, LoadOutcome::Restored(2));
    assert_eq!(restarted.cart().total(), 30.0);

    assert_eq!(restarted.tap(1), Some(false));
    restarted.cart().flush().await.unwrap();

    let payload = FileStore::new(&store_path).get("cart").await.unwrap().unwrap();
    let items: Vec<serde_json::Value> = serde_json::from_str(&payload).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], 2);
    assert_eq!(items[0]["price"], 20.0);
}

#[tokio::test]
async fn test_failed_fetches_do_not_block_cart() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    let products_mock = server.mock(|when, then| {
        when.method(GET).path("/products");
        then.status(500);
    });
    let categories_mock = server.mock(|when, then| {
        when.method(GET).path("/api/categories");
        then.status(404);
    });
    let config = config_for(&server, &store_path);

    let store = Arc::new(FileStore::new(config.store_path()));
    store
        .set("cart", r#"[{"id": 9, "title": "Saved", "category": "Fruits", "price": 2.5}]"#)
        .await
        .unwrap();

    let mut screen = open_screen(&config);
    let report = screen.mount().await;

    products_mock.assert();
    categories_mock.assert();
    assert_eq!(report.fetch_failures, 2);
    assert_eq!(report.products, 0);
    assert_eq!(report.cart, LoadOutcome::Restored(1));
    assert_eq!(screen.tap(9), None);

    let text = screen.render(2);
    assert!(text.contains("Products:\n  (none)"));
    assert!(text.ends_with("Total Amount: $2.50"));
}

#[tokio::test]
async fn test_category_filter_and_render() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    mock_catalog(&server);
    let config = config_for(&server, &store_path);

    let mut screen = open_screen(&config);
    screen.mount().await;
    screen.tap(3);

    assert!(screen.select_category(Some("FRUITS")));
    let text = screen.render(1);

    assert!(text.contains(" * Fruits"));
    assert!(text.contains("[+ Add] #1 Apple (Fruits) $10.00 rate 4.5"));
    assert!(text.contains("[Remove] #3 Banana (Fruits) $5.50 rate 3.2"));
    assert!(!text.contains("Carrot"));
    assert!(text.ends_with("Total Amount: $5.50"));
}
