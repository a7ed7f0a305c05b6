// src/main.rs

use clap::Parser;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use taskhub::api::router::api_router;
use taskhub::config::CONFIG;
use taskhub::db;
use taskhub::state::create_app_state;

#[derive(Parser)]
#[command(name = "taskhub")]
#[command(about = "Project and task tracking backend", long_about = None)]
struct Cli {
    /// Bind address, overriding TASKHUB_HOST/TASKHUB_PORT
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database URL, overriding DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = CONFIG.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting taskhub backend");

    let database_url = cli
        .database_url
        .unwrap_or_else(|| CONFIG.database_url.clone());
    let pool = db::create_pool(&database_url, CONFIG.sqlite_max_connections).await?;
    db::run_migrations(&pool).await?;

    let app_state = Arc::new(create_app_state(pool));
    let app = api_router(app_state);

    let bind_address = cli.bind.unwrap_or_else(|| CONFIG.bind_address());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
