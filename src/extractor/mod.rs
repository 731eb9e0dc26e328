//! Article extraction.
//!
//! This module handles:
//! - Request/response payload types
//! - Fetching a page over HTTP
//! - Deriving title, domain and paragraph text from the markup

pub mod fetcher;
pub mod parser;
pub mod types;

pub use fetcher::ArticleFetcher;
pub use parser::{domain_of, parse_article, NO_TITLE};
pub use types::{ErrorResult, ExtractionRequest, ExtractionResult};
