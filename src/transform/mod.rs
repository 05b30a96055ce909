//! Model transformations applied after filtering.

mod propagate;

pub use propagate::AnnotationPropagator;
