//! Korean law lookup - statutes, precedents and administrative rules from the
//! law.go.kr Open API, with citation and delegation resolution.
//!
//! # Example
//!
//! ```
//! use korean_law::query::{interpret_query, QueryIntent};
//!
//! let QueryIntent::Article(parsed) = interpret_query("Civil Act Article 103") else {
//!     unreachable!();
//! };
//! assert_eq!(parsed.statute, "민법");
//! assert_eq!(parsed.article.as_deref(), Some("103"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants, environment config and validation
//! - [`error`]: Error types and Result alias
//! - [`types`]: Core data types (document types, typed ids, articles, references, hits)
//! - [`http`]: HTTP client with retry
//! - [`xml`]: XML to attribute tree conversion
//! - [`source`]: Document sources (Open API client, in-memory fixtures)
//! - [`segment`]: Article segmentation
//! - [`document`]: Typed documents per document type
//! - [`render`]: Text rendering of documents and hits
//! - [`query`]: Query interpretation and statute disambiguation
//! - [`lookup`]: Exact-article resolution
//! - [`references`]: Citation discovery and bounded resolution
//! - [`delegation`]: Act to enforcement decree delegation links
//! - [`search`]: Concurrent integrated search
//! - [`service`]: Text-returning operations
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod delegation;
pub mod document;
pub mod error;
pub mod http;
pub mod lookup;
pub mod query;
pub mod references;
pub mod render;
pub mod search;
pub mod segment;
pub mod service;
pub mod source;
pub mod types;
pub mod xml;

// Re-export commonly used items
pub use config::LawApiConfig;
pub use document::Document;
pub use error::{LawError, Result};
pub use service::LawService;
pub use source::{DocumentSource, LawApiClient, MemorySource};
pub use types::{Article, DocumentType, Reference, TypedId};
