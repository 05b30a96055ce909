//! Identifier to documentable lookup table used for cross-references.

use std::collections::HashMap;

use super::ClassGraph;
use crate::model::accessors::getters_and_setters;
use crate::model::{Documentable, Sid};

#[derive(Debug, Clone, Default)]
pub struct DocumentablesGraph {
    by_sid: HashMap<Sid, Documentable>,
}

impl DocumentablesGraph {
    pub fn get(&self, sid: &Sid) -> Option<&Documentable> {
        self.by_sid.get(sid)
    }

    pub fn len(&self) -> usize {
        self.by_sid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sid.is_empty()
    }
}

/// Index every class-like of `class_graph` and all of its descendants,
/// including the Java accessors generated for properties. The first
/// documentable seen for an identifier wins.
pub fn compute_documentables_graph(class_graph: &ClassGraph) -> DocumentablesGraph {
    let mut by_sid = HashMap::new();
    let mut stack: Vec<Documentable> = class_graph
        .nodes()
        .map(|node| Documentable::Classlike(node.classlike.clone()))
        .collect();

    while let Some(documentable) = stack.pop() {
        if by_sid.contains_key(documentable.sid()) {
            continue;
        }
        let children = documentable.children();
        let properties: Vec<_> = children
            .iter()
            .filter_map(|child| match child {
                Documentable::Property(p) => Some(p.clone()),
                _ => None,
            })
            .collect();
        stack.extend(children);
        stack.extend(
            getters_and_setters(&properties)
                .into_iter()
                .map(Documentable::Function),
        );
        by_sid.insert(documentable.sid().clone(), documentable);
    }
    tracing::debug!(documentables = by_sid.len(), "Computed documentables graph");
    DocumentablesGraph { by_sid }
}
