use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use postboard::auth::jwt::{generate_secret, JwtAuthenticator};
use postboard::config::{Cli, Command, Config};
use postboard::extractors::CurrentUser;
use postboard::posts::{PostManager, SqlitePostStore};
use postboard::state::AppState;
use postboard::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    if let Some(Command::Token { user, name, avatar }) = cli.command {
        let secret = config.auth.jwt_secret.as_deref().ok_or_else(|| {
            anyhow::anyhow!("No JWT secret configured; set auth.jwt_secret or POSTBOARD_JWT_SECRET")
        })?;
        let auth = JwtAuthenticator::new(secret, config.auth.token_hours);
        let token = auth.issue(&CurrentUser {
            id: user,
            name,
            avatar,
        })?;
        println!("{}", token);
        return Ok(());
    }

    let secret = match config.auth.jwt_secret.clone() {
        Some(secret) => secret,
        None => {
            tracing::warn!("No JWT secret configured; generated a random one for this process");
            generate_secret()
        }
    };

    let db_path = config.db_path();
    tracing::info!("Database: {}", db_path.display());
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let state = AppState {
        posts: PostManager::new(Arc::new(SqlitePostStore::new(pool))),
        auth: Arc::new(JwtAuthenticator::new(&secret, config.auth.token_hours)),
    };

    let app = routes::app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
