use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::engine::{CommissionEngine, EnginePolicy};
use crate::utils::AppError;

/// Server state holding the shared service references
///
/// Cloning is shallow; the pool and engine share their underlying handles.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Commission engine (per-user locks + policy)
    pub engine: CommissionEngine,
}

impl ServerState {
    /// Initialize state from configuration: work directory, database,
    /// engine
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// Build state over an existing pool (tests, embedded use)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let engine = CommissionEngine::new(pool.clone(), EnginePolicy::from_config(&config));
        Self {
            config,
            pool,
            engine,
        }
    }
}
