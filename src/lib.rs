//! # Freight billing
//!
//! Billing core of a shipping back-office: a time-bounded rate table, a
//! price calculator, invoice generation with TVA, and a payment ledger
//! that keeps invoices and client balances consistent.
//!
//! ## Architecture
//!
//! - **domain**: entities, business rules and repository traits
//! - **application**: services orchestrating the use cases
//! - **infrastructure**: SeaORM persistence and migrations
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, money rounding, retry and shutdown helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use application::BillingServices;
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::{create_api_router, ApiState};
