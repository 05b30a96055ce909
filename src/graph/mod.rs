//! Derived graphs over the documented class-likes.

mod class_graph;
mod documentables;

pub use class_graph::{compute_class_graph, ClassGraph, ClassNode};
pub use documentables::{compute_documentables_graph, DocumentablesGraph};
