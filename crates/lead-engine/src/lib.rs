//! Lead lifecycle and assignment engine for the Meraki marketplace.
//!
//! This crate is the decision core behind the lead endpoints: it ingests a
//! raw inquiry, scores it with a data-driven weight table, assigns it to the
//! least-loaded staff member serving its region, tracks it through the
//! status state machine and, for qualified leads, converts it into a project
//! in a single transaction. Storage lives in the `database` crate;
//! notification delivery sits behind [`NotificationSink`] and is always
//! fire-and-forget.
//!
//! The engine has no transport of its own. Request handlers validate
//! authentication, resolve the caller into an [`Actor`] carrying its
//! permission set, and invoke engine operations as plain function calls.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use lead_engine::{Actor, LeadEngine, LeadIntake, NoOpSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:meraki.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let engine = LeadEngine::new(db, NoOpSink);
//!     let lead = engine
//!         .create_lead(
//!             &Actor::manager("intake-service"),
//!             LeadIntake {
//!                 name: "Asha Rao".to_string(),
//!                 email: Some("asha@example.com".to_string()),
//!                 region: Some("Mumbai".to_string()),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("lead {} scored {}", lead.id, lead.score);
//!
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod assignment;
pub mod engine;
pub mod error;
pub mod intake;
pub mod notify;
pub mod scoring;
pub mod state;

pub use actor::{Actor, Permission};
pub use engine::{Conversion, LeadEngine};
pub use error::{EngineError, Result};
pub use intake::{ConversionRequest, LeadIntake};
pub use notify::{
    LoggingSink, NoOpSink, Notification, NotificationKind, NotificationSink, NotifyError,
};
pub use scoring::{LeadProfile, ScoreWeights};
