use std::net::SocketAddr;

use configs::{AppConfig, StorageBackend};
use reqwest::StatusCode as HttpStatusCode;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated file store per test run
    let data_dir = std::env::temp_dir().join(format!("start_page_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.backend = StorageBackend::File;
    cfg.storage.path = data_dir.join("local_storage.json").to_string_lossy().into_owned();
    cfg.server.static_dir = data_dir.join("public").to_string_lossy().into_owned();
    cfg.normalize_and_validate()?;

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_bookmarks_persist_to_disk() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = client.get(format!("{}/api/bookmarks", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "");

    let blob = "[\"https://www.rust-lang.org\",\"ブックマーク\"]";
    let res = client
        .put(format!("{}/api/bookmarks", app.base_url))
        .body(blob)
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = client.get(format!("{}/api/bookmarks", app.base_url)).send().await?;
    assert_eq!(res.text().await?, blob);

    // the value is on disk under the fixed key
    let raw = tokio::fs::read(app.data_dir.join("local_storage.json")).await?;
    let map: std::collections::HashMap<String, String> = serde_json::from_slice(&raw)?;
    assert_eq!(map.get("bookmarks").map(String::as_str), Some(blob));

    let _ = tokio::fs::remove_dir_all(&app.data_dir).await;
    Ok(())
}
