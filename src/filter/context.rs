//! The hidden-symbol state of one render pass.
//!
//! Filtering records hidden symbols into a [`VisibilityContextBuilder`].
//! Once filtering is done the builder is frozen into an immutable
//! [`VisibilityContext`] that every later phase receives explicitly.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::model::{Classlike, Documentable, Sid};

/// Everything hidden by one decision: a documentable plus all of its
/// descendants.
#[derive(Debug, Default)]
pub struct HiddenBatch {
    sids: Vec<Sid>,
    package: Option<String>,
    classlikes: Vec<Arc<Classlike>>,
}

impl HiddenBatch {
    pub fn of(documentable: &Documentable) -> Self {
        let mut batch = HiddenBatch::default();
        if let Documentable::Package(p) = documentable {
            batch.package = Some(p.package_name().to_string());
        }
        for doc in std::iter::once(documentable.clone()).chain(documentable.exploded_children()) {
            if let Documentable::Classlike(c) = &doc {
                batch.classlikes.push(Arc::clone(c));
            }
            batch.sids.push(doc.sid().clone());
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.sids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sids.is_empty()
    }
}

/// Mutable collector used only while filtering.
#[derive(Debug, Default)]
pub struct VisibilityContextBuilder {
    hidden: HashSet<Sid>,
    hidden_packages: BTreeSet<String>,
    hidden_classlikes: HashMap<Sid, Arc<Classlike>>,
}

impl VisibilityContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch. The whole subtree lands at once.
    pub fn record(&mut self, batch: HiddenBatch) {
        if let Some(package) = batch.package {
            self.hidden_packages.insert(package);
        }
        for classlike in batch.classlikes {
            self.hidden_classlikes
                .entry(classlike.header.sid.clone())
                .or_insert(classlike);
        }
        self.hidden.extend(batch.sids);
    }

    pub fn is_package_hidden(&self, name: &str) -> bool {
        package_matches(&self.hidden_packages, name)
    }

    pub fn freeze(self) -> Arc<VisibilityContext> {
        Arc::new(VisibilityContext {
            hidden: self.hidden,
            hidden_packages: self.hidden_packages,
            hidden_classlikes: self.hidden_classlikes,
        })
    }
}

/// Frozen hidden state, read-only for the rest of the pass.
#[derive(Debug, Default)]
pub struct VisibilityContext {
    hidden: HashSet<Sid>,
    hidden_packages: BTreeSet<String>,
    hidden_classlikes: HashMap<Sid, Arc<Classlike>>,
}

impl VisibilityContext {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hidden explicitly or by living in a hidden package.
    pub fn is_hidden(&self, sid: &Sid) -> bool {
        self.hidden.contains(sid) || self.is_package_hidden(&sid.package_name)
    }

    /// Recorded as hidden by a filter decision.
    pub fn has_been_hidden(&self, sid: &Sid) -> bool {
        self.hidden.contains(sid)
    }

    /// `name` equals a hidden package or is a dotted descendant of one.
    pub fn is_package_hidden(&self, name: &str) -> bool {
        package_matches(&self.hidden_packages, name)
    }

    /// A class-like removed by filtering, still needed to walk hierarchies
    /// through it.
    pub fn hidden_classlike(&self, sid: &Sid) -> Option<&Arc<Classlike>> {
        self.hidden_classlikes.get(sid)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn hidden_packages(&self) -> impl Iterator<Item = &str> {
        self.hidden_packages.iter().map(String::as_str)
    }
}

fn package_matches(hidden_packages: &BTreeSet<String>, name: &str) -> bool {
    hidden_packages.iter().any(|hidden| {
        name == hidden
            || (name.len() > hidden.len()
                && name.starts_with(hidden.as_str())
                && name.as_bytes()[hidden.len()] == b'.')
    })
}
