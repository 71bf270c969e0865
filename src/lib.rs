//! # Badger Stats
//!
//! Answers a fixed set of trivia questions about the Battersea Badgers
//! cricket club from the stats the club website publishes as one JSON
//! document.
//!
//! ## Pipeline
//!
//! ```text
//! data.json / website ──> data::loader ──> data::Tables
//!                                               │
//!                                          enrich (flags, lookups)
//!                                               │
//!                  batting.parquet / bowling.parquet  (enrich::cache)
//!                                               │
//!                              quiz::queries ──> quiz::session ──> console
//!                              quiz::hazard  ──> quiz::plot    ──> chart window / CSV
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use badger_stats::config::QuizConfig;
//! use badger_stats::data::HttpFetcher;
//! use badger_stats::enrich::quiz_frames;
//! use badger_stats::quiz::queries;
//!
//! # fn example() -> badger_stats::error::Result<()> {
//! let config = QuizConfig::default();
//! let frames = quiz_frames(&config, &HttpFetcher::new()?)?;
//! let n = queries::lowest_unrecorded_score(&frames.batting)?;
//! println!("Lowest batting score not recorded is {n}.");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`config`]: URLs, cache paths, club identifiers and quiz constants
//! - [`data`]: typed records, identifier-keyed tables and the cache-or-fetch loader
//! - [`enrich`]: per-performance annotations and the enriched frame caches
//! - [`quiz`]: the questions, the hazard estimator, rendering and the answer loop
//! - [`error`]: Error types and handling utilities
//! - [`utils`]: Common utility functions

pub mod config;
pub mod data;
pub mod enrich;
pub mod error;
pub mod quiz;
pub mod theme;
pub mod utils;
