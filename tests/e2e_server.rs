/// E2E tests over a real TCP listener
/// The server runs in-process on an ephemeral port
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use postboard::auth::JwtAuthenticator;
use postboard::db;
use postboard::extractors::CurrentUser;
use postboard::posts::{PostManager, SqlitePostStore};
use postboard::routes;
use postboard::state::AppState;

const SECRET: &str = "e2e-secret";

async fn spawn_server(dir: &TempDir) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let pool = db::create_pool(&dir.path().join("e2e.db"))?;
    db::run_migrations(&pool)?;

    let state = AppState {
        posts: PostManager::new(Arc::new(SqlitePostStore::new(pool))),
        auth: Arc::new(JwtAuthenticator::new(SECRET, 1)),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state)).await.ok();
    });

    Ok(addr)
}

fn token(user_id: &str) -> String {
    JwtAuthenticator::new(SECRET, 1)
        .issue(&CurrentUser {
            id: user_id.to_string(),
            name: Some(user_id.to_uppercase()),
            avatar: None,
        })
        .unwrap()
}

#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_server -- --ignored
async fn test_create_like_and_list_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let addr = spawn_server(&dir).await?;
    let base = format!("http://{}", addr);
    let client = Client::new();

    let response = client.get(format!("{}/api/posts/test", base)).send().await?;
    assert_eq!(response.status(), StatusCode::OK);

    let created: Value = client
        .post(format!("{}/api/posts", base))
        .bearer_auth(token("alice"))
        .json(&json!({ "text": "over the wire", "name": "Alice" }))
        .send()
        .await?
        .json()
        .await?;
    let id = created["id"].as_str().expect("post id");

    let response = client
        .post(format!("{}/api/posts/like/{}", base, id))
        .bearer_auth(token("bob"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let listed: Value = client
        .get(format!("{}/api/posts", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed[0]["id"], id);
    assert_eq!(listed[0]["likes"], json!([{ "user": "bob" }]));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_missing_token_is_rejected_over_http() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let addr = spawn_server(&dir).await?;
    let client = Client::new();

    let response = client
        .post(format!("http://{}/api/posts", addr))
        .json(&json!({ "text": "anonymous" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
