//! devsite-refdocs - documentable resolution for devsite reference docs.
//!
//! Takes the symbol model an analyzer produced for Java and Kotlin
//! sources and resolves it into what a devsite reference site needs, once
//! per display language: which class-likes each package shows, which
//! companion objects are worth a page, where top-level members live in
//! the Java view, which extensions attach to which class, and the URL of
//! every reference.
//!
//! # Architecture
//!
//! - `model`: the analyzer's symbol model (SIDs, documentables, types)
//! - `filter`: hiding rules and the frozen visibility context
//! - `transform`: annotation propagation
//! - `graph`: class hierarchy and SID lookup graphs
//! - `holder`: per-view deferred resolution
//! - `external`: lookups outside the documented corpus
//! - `paths`: site paths and cross-reference links
//! - `site`: the render pass and its outputs

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod filter;
pub mod graph;
pub mod holder;
pub mod model;
pub mod paths;
pub mod site;
pub mod transform;

pub use config::{ConfigError, DevsiteConfig};
pub use error::RenderError;
pub use holder::DocumentablesHolder;
pub use model::{Language, Module, Sid};
pub use paths::{Link, PathProvider};
pub use site::{write_view, RenderPass, SiteView};
