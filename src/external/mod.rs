//! Lookups outside the documented corpus.
//!
//! Two oracles: one that materializes class-likes the corpus only
//! references (platform base classes, dependencies), used when walking
//! hierarchies, and one that maps a symbol to a URL in a separately
//! hosted doc set. Both are wrapped in per-pass memo tables.

mod memo;
mod package_list;

pub use memo::{ExternalHit, MemoizedClasslikeProvider, MemoizedLocationProvider, SingleFlightCache};
pub use package_list::{
    fetch_package_list, load_external_docs, ExternalDocSet, PackageListLocationProvider,
};

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{Classlike, Sid, SourceSetId};

/// Errors raised while reading an external package list.
#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Materializes a class-like the corpus does not contain, in the context
/// of one source set.
pub trait ExternalClasslikeProvider: Send + Sync {
    fn classlike(&self, sid: &Sid, source_set: &SourceSetId) -> Option<Arc<Classlike>>;
}

/// Maps a symbol to its URL in an external doc set.
pub trait ExternalLocationProvider: Send + Sync {
    fn resolve(&self, sid: &Sid) -> Option<String>;
}

/// Provider with nothing outside the corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExternalClasslikes;

impl ExternalClasslikeProvider for NoExternalClasslikes {
    fn classlike(&self, _sid: &Sid, _source_set: &SourceSetId) -> Option<Arc<Classlike>> {
        None
    }
}

/// Class-likes supplied up front, e.g. loaded from a dependency's model
/// file. Answers for every source set.
#[derive(Debug, Clone, Default)]
pub struct StaticClasslikes {
    classlikes: HashMap<Sid, Arc<Classlike>>,
}

impl StaticClasslikes {
    pub fn new<I>(classlikes: I) -> Self
    where
        I: IntoIterator<Item = Arc<Classlike>>,
    {
        Self {
            classlikes: classlikes
                .into_iter()
                .map(|c| (c.header.sid.clone(), c))
                .collect(),
        }
    }
}

impl ExternalClasslikeProvider for StaticClasslikes {
    fn classlike(&self, sid: &Sid, _source_set: &SourceSetId) -> Option<Arc<Classlike>> {
        self.classlikes.get(sid).cloned()
    }
}
