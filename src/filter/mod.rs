//! Visibility and hiding filter.
//!
//! Runs strictly before every other phase. The output is the merged,
//! filtered module plus the frozen [`VisibilityContext`] that later phases
//! consult.

mod context;
mod hidden;
mod merge;

pub use context::{HiddenBatch, VisibilityContext, VisibilityContextBuilder};
pub use hidden::{
    has_hide_marker, hide_reason, is_hidden, post_merge_package_filter, pre_merge_filter,
    HideReason, HidingRules,
};
pub use merge::merge_modules;

use std::sync::Arc;

use crate::model::Module;

/// Result of the filter phase.
#[derive(Debug)]
pub struct FilterOutput {
    pub module: Module,
    pub visibility: Arc<VisibilityContext>,
}

/// Filter each pipeline's module, merge them, then drop packages under a
/// hidden package name. Returns only once every decision is recorded.
pub fn run_filters(modules: Vec<Module>, rules: &HidingRules) -> FilterOutput {
    let mut builder = VisibilityContextBuilder::new();
    let mut filtered = Vec::with_capacity(modules.len());
    for module in &modules {
        let (kept, batches) = pre_merge_filter(module, rules);
        for batch in batches {
            builder.record(batch);
        }
        filtered.push(kept);
    }

    let merged = post_merge_package_filter(merge_modules(filtered), &mut builder);
    let visibility = builder.freeze();
    tracing::info!(
        packages = merged.packages.len(),
        hidden = visibility.hidden_count(),
        "Filtered documentables"
    );
    FilterOutput {
        module: merged,
        visibility,
    }
}
