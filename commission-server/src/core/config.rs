use std::path::PathBuf;

use crate::engine::TenurePolicy;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/commission-engine | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_PATH | WORK_DIR/commission.db | SQLite database file |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | DEFAULT_CURRENCY | VND | Currency stamped on ledger rows |
/// | TEAM_SALES_INCLUDES_ALL_ROLES | true | Team-sales requirement sums all direct reports |
/// | TENURE_POLICY | always_accrue | always_accrue \| require_requirements |
/// | MAX_OVERRIDE_DEPTH | 2 | Upline levels the override walk may visit |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/commission HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database file; defaults to work_dir/commission.db
    pub database_path: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,

    // === Engine policy ===
    /// Currency stamped on ledger rows
    pub default_currency: String,
    /// Whether the team-sales requirement sums all direct reports
    pub team_sales_includes_all_roles: bool,
    /// How tenure-in-tier accrues at monthly reset
    pub tenure_policy: TenurePolicy,
    /// Upline levels the override walk may visit
    pub max_override_depth: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/commission-engine".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            default_currency: std::env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "VND".into()),
            team_sales_includes_all_roles: std::env::var("TEAM_SALES_INCLUDES_ALL_ROLES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            tenure_policy: std::env::var("TENURE_POLICY")
                .ok()
                .and_then(|v| TenurePolicy::parse(&v))
                .unwrap_or(TenurePolicy::AlwaysAccrue),
            max_override_depth: std::env::var("MAX_OVERRIDE_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }

    /// Resolved database file path
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("commission.db"),
        }
    }

    /// Create the work directory structure if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        let work_dir = PathBuf::from(&self.work_dir);
        std::fs::create_dir_all(&work_dir)?;
        std::fs::create_dir_all(work_dir.join("logs"))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
