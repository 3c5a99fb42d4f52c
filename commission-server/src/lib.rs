//! Commission Engine Server
//!
//! Standalone service for the multi-tier affiliate commission engine:
//!
//! - **Engine** (`engine`): direct-sale and upline override commission
//!   passes, performance counters, tier promotion, payout ledger
//! - **Database** (`db`): embedded SQLite storage via sqlx
//! - **HTTP API** (`api`): RESTful admin and order-intake interface
//!
//! # Module structure
//!
//! ```text
//! commission-server/src/
//! ├── core/          # config, state, server bootstrap
//! ├── engine/        # calculator, performance, promotion, ledger
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer and repositories
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod engine;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use engine::{CommissionEngine, EnginePolicy, TenurePolicy};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______                          _           _
  / ____/___  ____ ___  ____ ___  (_)_________(_)___  ____
 / /   / __ \/ __ `__ \/ __ `__ \/ / ___/ ___/ / __ \/ __ \
/ /___/ /_/ / / / / / / / / / / / (__  |__  ) / /_/ / / / /
\____/\____/_/ /_/ /_/_/ /_/ /_/_/____/____/_/\____/_/ /_/
    ______            _
   / ____/___  ____ _(_)___  ___
  / __/ / __ \/ __ `/ / __ \/ _ \
 / /___/ / / / /_/ / / / / /  __/
/_____/_/ /_/\__, /_/_/ /_/\___/
            /____/
    "#
    );
}
