//! Class hierarchy graph.
//!
//! Dokka-style analyzers only report *direct* supertypes, so the graph is
//! built bottom-up: starting from every documented class-like, walk the
//! declared supertypes recursively and register the leaf on every ancestor
//! that has a node. Hidden class-likes never get a node but are still walked
//! through, so a visible class reached across a hidden one stays connected.
//!
//! Nodes are kept in a table keyed by [`Sid`]; edges are identifiers into
//! that table, resolved to class-likes only when the graph is finalized.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::external::MemoizedClasslikeProvider;
use crate::filter::VisibilityContext;
use crate::model::{Classlike, Sid, SupertypeRole};

/// Hierarchy of one visible class-like.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub classlike: Arc<Classlike>,
    /// Every visible descendant, ordered by class name then package.
    pub all_sub_classes: Vec<Arc<Classlike>>,
    /// Descendants with no visible class-like in between.
    pub direct_sub_classes: Vec<Arc<Classlike>>,
    pub indirect_sub_classes: Vec<Arc<Classlike>>,
    /// Superclasses with no visible class-like in between.
    pub direct_super_classes: Vec<Arc<Classlike>>,
    /// Every visible superclass, root first.
    pub super_classes: Vec<Arc<Classlike>>,
    pub interfaces: Vec<Arc<Classlike>>,
    pub direct_interfaces: Vec<Arc<Classlike>>,
}

/// The class hierarchy of one render pass and view.
#[derive(Debug, Clone, Default)]
pub struct ClassGraph {
    nodes: HashMap<Sid, ClassNode>,
}

impl ClassGraph {
    pub fn get(&self, sid: &Sid) -> Option<&ClassNode> {
        self.nodes.get(sid)
    }

    pub fn contains(&self, sid: &Sid) -> bool {
        self.nodes.contains_key(sid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ClassNode> {
        self.nodes.values()
    }
}

/// Insertion-ordered set of identifiers.
#[derive(Debug, Default)]
struct OrderedSids {
    order: Vec<Sid>,
    seen: HashSet<Sid>,
}

impl OrderedSids {
    fn insert(&mut self, sid: &Sid) {
        if self.seen.insert(sid.clone()) {
            self.order.push(sid.clone());
        }
    }
}

#[derive(Debug)]
struct MutableNode {
    classlike: Arc<Classlike>,
    all_sub_classes: HashSet<Sid>,
    direct_sub_classes: HashSet<Sid>,
    indirect_sub_classes: HashSet<Sid>,
    direct_super_classes: OrderedSids,
    super_classes: OrderedSids,
    interfaces: OrderedSids,
    direct_interfaces: OrderedSids,
}

impl MutableNode {
    fn new(classlike: Arc<Classlike>) -> Self {
        Self {
            classlike,
            all_sub_classes: HashSet::new(),
            direct_sub_classes: HashSet::new(),
            indirect_sub_classes: HashSet::new(),
            direct_super_classes: OrderedSids::default(),
            super_classes: OrderedSids::default(),
            interfaces: OrderedSids::default(),
            direct_interfaces: OrderedSids::default(),
        }
    }
}

/// Resolves supertype identifiers: local class-likes first, then ones the
/// filter removed, then the external provider. Every resolution is
/// remembered, including misses.
struct Resolver<'a> {
    known: HashMap<Sid, Option<Arc<Classlike>>>,
    visibility: &'a VisibilityContext,
    external: Option<&'a MemoizedClasslikeProvider>,
}

impl Resolver<'_> {
    fn resolve(&mut self, sid: &Sid) -> Option<Arc<Classlike>> {
        if let Some(found) = self.known.get(sid) {
            return found.clone();
        }
        let found = self
            .visibility
            .hidden_classlike(sid)
            .cloned()
            .or_else(|| {
                self.external
                    .and_then(|provider| provider.lookup(sid))
                    .map(|hit| hit.classlike)
            });
        self.known.insert(sid.clone(), found.clone());
        found
    }
}

/// Build the hierarchy of `classlikes`.
///
/// Supertypes outside `classlikes` are looked up among the filtered-out
/// class-likes of `visibility` and then through `external`; a supertype
/// found nowhere is dropped with its whole ancestry.
pub fn compute_class_graph(
    classlikes: &[Arc<Classlike>],
    visibility: &VisibilityContext,
    external: Option<&MemoizedClasslikeProvider>,
) -> ClassGraph {
    let mut nodes: HashMap<Sid, MutableNode> = classlikes
        .iter()
        .map(|c| (c.header.sid.clone(), MutableNode::new(Arc::clone(c))))
        .collect();
    let mut resolver = Resolver {
        known: classlikes
            .iter()
            .map(|c| (c.header.sid.clone(), Some(Arc::clone(c))))
            .collect(),
        visibility,
        external,
    };

    for classlike in classlikes {
        let leaf = &classlike.header.sid;
        let mut visited = HashSet::new();
        walk_supertypes(
            classlike,
            leaf,
            leaf,
            &mut nodes,
            &mut resolver,
            &mut visited,
        );
    }

    let nodes: HashMap<Sid, ClassNode> = nodes
        .into_iter()
        .map(|(sid, node)| {
            let finished = ClassNode {
                all_sub_classes: sorted_subclasses(&node.all_sub_classes, &mut resolver),
                direct_sub_classes: sorted_subclasses(&node.direct_sub_classes, &mut resolver),
                indirect_sub_classes: sorted_subclasses(&node.indirect_sub_classes, &mut resolver),
                direct_super_classes: resolve_all(&node.direct_super_classes, &mut resolver),
                super_classes: resolve_all(&node.super_classes, &mut resolver),
                interfaces: resolve_all(&node.interfaces, &mut resolver),
                direct_interfaces: resolve_all(&node.direct_interfaces, &mut resolver),
                classlike: node.classlike,
            };
            (sid, finished)
        })
        .collect();
    tracing::debug!(nodes = nodes.len(), "Computed class graph");
    ClassGraph { nodes }
}

/// Walk the declared supertypes of `current`.
///
/// `initial` is the leaf the walk started from; `highest_visible` is the
/// closest class-like between `initial` and `current` (inclusive) that is
/// not hidden.
fn walk_supertypes(
    current: &Classlike,
    initial: &Sid,
    highest_visible: &Sid,
    nodes: &mut HashMap<Sid, MutableNode>,
    resolver: &mut Resolver<'_>,
    visited: &mut HashSet<(Sid, Sid)>,
) {
    // A class-like is walked again when reached under a different visible
    // ancestor; the pair key still ends cyclic input.
    if !visited.insert((current.header.sid.clone(), highest_visible.clone())) {
        return;
    }
    for supertype in current.canonical_supertypes() {
        if let Some(node) = nodes.get_mut(&supertype.sid) {
            node.all_sub_classes.insert(initial.clone());
            node.direct_sub_classes.insert(highest_visible.clone());
            if highest_visible != initial {
                node.indirect_sub_classes.insert(initial.clone());
            }
        }

        let Some(resolved) = resolver.resolve(&supertype.sid) else {
            continue;
        };
        let hidden = resolver.visibility.has_been_hidden(&supertype.sid)
            || matches!(resolved.header.canonical_visibility(), Some(v) if !v.is_api());
        let next_visible = if hidden {
            highest_visible
        } else {
            &supertype.sid
        };
        walk_supertypes(&resolved, initial, next_visible, nodes, resolver, visited);

        if hidden {
            continue;
        }
        let Some(leaf) = nodes.get_mut(initial) else {
            continue;
        };
        let direct = initial == highest_visible;
        match supertype.kind.role() {
            Some(SupertypeRole::Superclass) => {
                leaf.super_classes.insert(&supertype.sid);
                if direct {
                    leaf.direct_super_classes.insert(&supertype.sid);
                }
            }
            Some(SupertypeRole::Interface) => {
                leaf.interfaces.insert(&supertype.sid);
                if direct {
                    leaf.direct_interfaces.insert(&supertype.sid);
                }
            }
            None => {}
        }
    }
}

fn subclass_order_key(sid: &Sid) -> String {
    format!(
        "{}{}",
        sid.class_names.as_deref().unwrap_or(""),
        sid.package_name
    )
}

fn sorted_subclasses(sids: &HashSet<Sid>, resolver: &mut Resolver<'_>) -> Vec<Arc<Classlike>> {
    let mut ordered: Vec<&Sid> = sids.iter().collect();
    ordered.sort_by(|a, b| {
        subclass_order_key(a)
            .cmp(&subclass_order_key(b))
            .then_with(|| a.cmp(b))
    });
    ordered
        .into_iter()
        .filter_map(|sid| resolver.resolve(sid))
        .collect()
}

fn resolve_all(sids: &OrderedSids, resolver: &mut Resolver<'_>) -> Vec<Arc<Classlike>> {
    sids.order
        .iter()
        .filter_map(|sid| resolver.resolve(sid))
        .collect()
}
