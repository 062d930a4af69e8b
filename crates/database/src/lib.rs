//! SQLite persistence layer for the Meraki lead marketplace.
//!
//! This crate provides async database operations for leads, staff and
//! projects using SQLx with SQLite. It owns every durable write of the lead
//! lifecycle: intake inserts, guarded status transitions, assignment writes
//! and the transactional lead-to-project conversion, each coupled to its
//! audit trail entry.
//!
//! # Example
//!
//! ```no_run
//! use database::{lead, models::NewLead, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:meraki.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let record = NewLead {
//!         id: "5b2a9c60-4f0e-4a8e-9d5e-1f6f0c2a7b41".to_string(),
//!         name: "Asha Rao".to_string(),
//!         email: Some("asha@example.com".to_string()),
//!         phone: None,
//!         source: Some("referral".to_string()),
//!         region: Some("Mumbai".to_string()),
//!         budget_min: Some(300_000),
//!         budget_max: Some(800_000),
//!         project_type: Some("full_home".to_string()),
//!         property_type: Some("apartment".to_string()),
//!         timeline: Some("1-3 months".to_string()),
//!         description: None,
//!         score: 63,
//!     };
//!     lead::create_lead(db.pool(), &record).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod lead;
pub mod models;
pub mod project;
pub mod staff;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use lead::LeadFilter;
pub use models::{
    Lead, LeadEvent, LeadStatus, NewLead, NewProject, Project, QualificationPatch,
    StaffCandidate, StaffMember,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/meraki.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent request workers sharing the pool.
    const DEFAULT_POOL_SIZE: u32 = 20;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
