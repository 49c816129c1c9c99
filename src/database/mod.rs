use sqlx::postgres::{PgPool, PgPoolOptions};
use std::error::Error;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(url: &str) -> Result<Self, Box<dyn Error>> {
        // Connection pool otimizado
        let pool = PgPoolOptions::new()
            .max_connections(20)  // Max 20 conexões simultâneas
            .min_connections(5)   // Mantém 5 conexões sempre vivas
            .idle_timeout(std::time::Duration::from_secs(300))  // 5min idle
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(url)
            .await?;

        // Test connection
        sqlx::query("SELECT 1").execute(&pool).await?;

        let database = Self { pool };

        database.run_migrations().await?;

        Ok(database)
    }

    /// Applies the embedded migrations from ./migrations
    async fn run_migrations(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        log::info!("✅ Database schema ready");

        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
