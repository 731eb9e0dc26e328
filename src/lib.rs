//! Naive article extraction over HTTP.
//!
//! `POST /extract` with `{"url": "..."}` fetches the page and answers with its
//! title, domain and the text of every non-empty paragraph:
//!
//! ```text
//! <title> Launch </title>          title:   "Launch"
//! https://www.example.com/post  →  domain:  "example.com"
//! <p> Hello </p><p></p><p>World</p> content: "Hello World"
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`extractor`]: Page fetching and article derivation
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, AppError, ExtractError, Result};
