use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use bookshelf_infra::{BookStore, InMemoryBookStore, PostgresBookStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookshelf_observability::init();

    let store: Arc<dyn BookStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
                .connect(&url)
                .await?;
            let store = PostgresBookStore::new(pool);
            store.ensure_schema().await?;
            tracing::info!("using postgres store");
            Arc::new(store)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using non-durable in-memory store");
            Arc::new(InMemoryBookStore::new())
        }
    };

    let app = bookshelf_api::app::build_app(store);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
