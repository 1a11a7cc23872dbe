//! # AEDCO One Platform
//!
//! Weekly sector newsletters for Arab Engineering & Distribution Company.
//!
//! Each run loads a sector prompt from disk, adds the Cairo-time schedule
//! and recent past issues, asks a hosted LLM for two HTML editions
//! (Principals and Egyptian Clients) and stores the result with a manifest
//! that can be downloaded as a ZIP archive.
//!
//! ## Modules
//!
//! - `sectors`: sector catalogue and editions
//! - `schedule`: display date and research cutoff
//! - `prompt`: prompt assembly and sanitising
//! - `providers`: LLM provider trait and the OpenAI client
//! - `extraction`: splitting model output into editions
//! - `storage`: run directories and past issues
//! - `generator`: the generation pipeline
//! - `server`: HTTP API

pub mod config;
pub mod error;
pub mod extraction;
pub mod generator;
pub mod prompt;
pub mod providers;
pub mod schedule;
pub mod sectors;
pub mod server;
pub mod storage;
pub mod types;

pub use config::NewsletterConfig;
pub use error::{Error, Result};
pub use generator::NewsletterGenerator;
pub use providers::{Completion, LlmProvider, OpenAiClient, Usage};
pub use schedule::{calculate_dates, Mode, ScheduleDates};
pub use sectors::{Edition, Sector};
pub use types::{GenerationOutcome, RunManifest};
