//! Content Moderation System (CMS).
//!
//! For each inbound user message the pipeline obtains a translated form
//! and a toxicity score from two independent capability services,
//! persists the per-message result in SQLite, then aggregates per-user
//! statistics (message count, average score) into a CSV report.
//!
//! # Architecture
//!
//! - [`InputReader`] streams (user_id, message) rows from the input file
//! - [`CapabilityClient`] calls the translation and scoring endpoints
//! - [`ActivityStore`] persists entries and computes the aggregation
//! - [`ModerationPipeline`] sequences the whole run
//! - [`write_report`] emits the per-user statistics

pub mod client;
pub mod error;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod store;

pub use client::CapabilityClient;
pub use error::{PipelineError, Result, ServiceError};
pub use input::InputReader;
pub use models::{ActivityEntry, MessageRecord, UserStatistic};
pub use pipeline::ModerationPipeline;
pub use report::write_report;
pub use store::ActivityStore;
