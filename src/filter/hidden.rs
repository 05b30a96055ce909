//! Hiding rules and the pre-merge filter pass.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use super::context::{HiddenBatch, VisibilityContextBuilder};
use crate::config::DevsiteConfig;
use crate::model::doc::dfs_any;
use crate::model::source_set::default_documented_visibilities;
use crate::model::{
    Classlike, ClasslikeKind, Documentable, EnumEntry, Header, Module, Package, SourceSetId,
    Visibility,
};

const HIDE_TAGS: &[&str] = &["hide", "removed"];

/// Configured hiding annotations.
#[derive(Debug, Clone, Default)]
pub struct HidingRules {
    hiding_annotations: HashSet<String>,
}

impl HidingRules {
    pub fn new<I, S>(annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hiding_annotations: annotations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &DevsiteConfig) -> Self {
        Self::new(config.hiding_annotations.iter().cloned())
    }
}

/// Why a documentable left the docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// `@hide` or `@removed` anywhere in the doc comment.
    Marker,
    /// A configured hiding annotation.
    Annotation,
    /// `@Deprecated(level = HIDDEN)`.
    DeprecatedHidden,
    /// The property's getter is hidden.
    HiddenAccessor,
    /// Annotation class with an undocumented visibility.
    PrivateAnnotation,
    /// Visibility not documented for its source set.
    UndocumentedVisibility,
}

pub fn has_hide_marker(header: &Header) -> bool {
    header.documentation.values().any(|roots| {
        dfs_any(roots, &|node| HIDE_TAGS.iter().any(|tag| node.is_custom_tag(tag))).is_some()
    })
}

fn annotation_reason(header: &Header, rules: &HidingRules) -> Option<HideReason> {
    let mut reason = None;
    for annotation in header.all_annotations() {
        if rules.hiding_annotations.contains(&annotation.qualified_name()) {
            return Some(HideReason::Annotation);
        }
        if annotation.is_deprecated_hidden() {
            reason = Some(HideReason::DeprecatedHidden);
        }
    }
    reason
}

fn explicit_reason(header: &Header, rules: &HidingRules) -> Option<HideReason> {
    if has_hide_marker(header) {
        return Some(HideReason::Marker);
    }
    annotation_reason(header, rules)
}

/// Whether `documentable` is hidden by its own markers or annotations (or,
/// for a property, by those of its getter).
pub fn is_hidden(documentable: &Documentable, rules: &HidingRules) -> bool {
    hide_reason(documentable, rules, &BTreeMap::new()).is_some()
}

/// Full hiding decision, including documented-visibility checks.
pub fn hide_reason(
    documentable: &Documentable,
    rules: &HidingRules,
    documented: &BTreeMap<SourceSetId, BTreeSet<Visibility>>,
) -> Option<HideReason> {
    let header = documentable.header();
    if let Some(reason) = explicit_reason(header, rules) {
        return Some(reason);
    }
    if let Documentable::Property(property) = documentable {
        if let Some(getter) = &property.getter {
            if explicit_reason(&getter.header, rules).is_some() {
                return Some(HideReason::HiddenAccessor);
            }
        }
    }
    if documented.is_empty() {
        return None;
    }
    let undocumented = undocumented_visibility(header, documented);
    match documentable {
        Documentable::Classlike(c) if c.is_annotation() && undocumented => {
            Some(HideReason::PrivateAnnotation)
        }
        Documentable::Classlike(_)
        | Documentable::Function(_)
        | Documentable::Property(_)
        | Documentable::TypeAlias(_)
            if undocumented =>
        {
            Some(HideReason::UndocumentedVisibility)
        }
        _ => None,
    }
}

fn undocumented_visibility(
    header: &Header,
    documented: &BTreeMap<SourceSetId, BTreeSet<Visibility>>,
) -> bool {
    let Some(set) = header.canonical_source_set() else {
        return false;
    };
    let Some(visibility) = header.visibility.get(set) else {
        return false;
    };
    match documented.get(set) {
        Some(allowed) => !allowed.contains(visibility),
        None => !default_documented_visibilities().contains(visibility),
    }
}

/// One pipeline's filter run: rebuilds the tree without hidden members and
/// collects what it dropped.
struct Pass<'a> {
    rules: &'a HidingRules,
    documented: &'a BTreeMap<SourceSetId, BTreeSet<Visibility>>,
    batches: Vec<HiddenBatch>,
}

impl Pass<'_> {
    fn keep(&mut self, documentable: Documentable) -> bool {
        match hide_reason(&documentable, self.rules, self.documented) {
            Some(reason) => {
                tracing::debug!(sid = %documentable.sid(), ?reason, "Hiding documentable");
                self.batches.push(HiddenBatch::of(&documentable));
                false
            }
            None => true,
        }
    }

    fn members<T>(&mut self, items: &[Arc<T>], wrap: fn(Arc<T>) -> Documentable) -> Vec<Arc<T>> {
        items
            .iter()
            .filter(|item| self.keep(wrap(Arc::clone(item))))
            .cloned()
            .collect()
    }

    fn classlikes(&mut self, items: &[Arc<Classlike>]) -> Vec<Arc<Classlike>> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if self.keep(Documentable::Classlike(Arc::clone(item))) {
                kept.push(self.classlike(item));
            }
        }
        kept
    }

    fn classlike(&mut self, classlike: &Classlike) -> Arc<Classlike> {
        let mut out = classlike.clone();
        out.constructors = self.members(&classlike.constructors, Documentable::Function);
        out.functions = self.members(&classlike.functions, Documentable::Function);
        out.properties = self.members(&classlike.properties, Documentable::Property);
        out.classlikes = self.classlikes(&classlike.classlikes);
        if let ClasslikeKind::Enum { entries } = &classlike.kind {
            let mut kept = Vec::with_capacity(entries.len());
            for entry in entries {
                if self.keep(Documentable::EnumEntry(Arc::clone(entry))) {
                    kept.push(self.enum_entry(entry));
                }
            }
            out.kind = ClasslikeKind::Enum { entries: kept };
        }
        if out.companion().is_none() {
            out.companion = None;
        }
        Arc::new(out)
    }

    fn enum_entry(&mut self, entry: &EnumEntry) -> Arc<EnumEntry> {
        let mut out = entry.clone();
        out.functions = self.members(&entry.functions, Documentable::Function);
        out.properties = self.members(&entry.properties, Documentable::Property);
        out.classlikes = self.classlikes(&entry.classlikes);
        Arc::new(out)
    }

    fn package(&mut self, package: &Arc<Package>) -> Option<Arc<Package>> {
        if !self.keep(Documentable::Package(Arc::clone(package))) {
            return None;
        }
        let mut out = (**package).clone();
        out.classlikes = self.classlikes(&package.classlikes);
        out.functions = self.members(&package.functions, Documentable::Function);
        out.properties = self.members(&package.properties, Documentable::Property);
        out.type_aliases = self.members(&package.type_aliases, Documentable::TypeAlias);
        Some(Arc::new(out))
    }
}

/// Filter one pipeline's module before merging.
///
/// Packages are filtered in parallel; the hidden batches come back in
/// package order for the caller to record.
pub fn pre_merge_filter(module: &Module, rules: &HidingRules) -> (Module, Vec<HiddenBatch>) {
    let documented = module.documented_visibilities();
    let results: Vec<(Option<Arc<Package>>, Vec<HiddenBatch>)> = module
        .packages
        .par_iter()
        .map(|package| {
            let mut pass = Pass {
                rules,
                documented: &documented,
                batches: Vec::new(),
            };
            let kept = pass.package(package);
            (kept, pass.batches)
        })
        .collect();

    let mut packages = Vec::with_capacity(results.len());
    let mut batches = Vec::new();
    for (kept, hidden) in results {
        packages.extend(kept);
        batches.extend(hidden);
    }
    let filtered = Module {
        name: module.name.clone(),
        source_sets: module.source_sets.clone(),
        packages,
    };
    (filtered, batches)
}

/// Drop every package that a hidden package name covers. Runs after the
/// merge, when packages from every pipeline are present.
pub fn post_merge_package_filter(module: Module, builder: &mut VisibilityContextBuilder) -> Module {
    let (hidden, kept): (Vec<_>, Vec<_>) = module
        .packages
        .into_iter()
        .partition(|p| builder.is_package_hidden(p.package_name()));
    for package in hidden {
        tracing::debug!(package = %package.package_name(), "Removing package under hidden prefix");
        builder.record(HiddenBatch::of(&Documentable::Package(package)));
    }
    Module {
        name: module.name,
        source_sets: module.source_sets,
        packages: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::KOTLIN_DEPRECATED;
    use crate::model::{
        Annotation, Callable, DocNode, Function, Property, Sid, TagKind, WithHeader,
    };

    fn rules() -> HidingRules {
        HidingRules::new(["androidx.annotation.RestrictTo"])
    }

    #[test]
    fn test_hide_marker_found_deep_in_doc() {
        let c = Classlike::class(Sid::class("a", "Foo")).with_doc(vec![DocNode::tag(
            TagKind::Description,
            None,
        )
        .with_children(vec![DocNode::custom("removed")])]);
        assert!(is_hidden(&Documentable::Classlike(Arc::new(c)), &rules()));
    }

    #[test]
    fn test_hiding_annotation_and_deprecated_hidden() {
        let restricted = Classlike::class(Sid::class("a", "Foo"))
            .with_annotation(Annotation::named("androidx.annotation.RestrictTo"));
        let deprecated = Classlike::class(Sid::class("a", "Bar")).with_annotation(
            Annotation::named(KOTLIN_DEPRECATED).with_param("level", "DeprecationLevel.HIDDEN"),
        );
        let plain = Classlike::class(Sid::class("a", "Baz"));
        assert!(is_hidden(&Documentable::Classlike(Arc::new(restricted)), &rules()));
        assert!(is_hidden(&Documentable::Classlike(Arc::new(deprecated)), &rules()));
        assert!(!is_hidden(&Documentable::Classlike(Arc::new(plain)), &rules()));
        assert!(!is_hidden(
            &Documentable::Classlike(Arc::new(Classlike::class(Sid::class("a", "Q"))
                .with_annotation(Annotation::named("androidx.annotation.RestrictTo")))),
            &HidingRules::default()
        ));
    }

    #[test]
    fn test_hidden_getter_hides_property() {
        let owner = Sid::class("a", "Foo");
        let property = Property::new(owner.member(Callable::new("size"))).with_getter(
            Function::new(owner.member(Callable::new("getSize")))
                .with_doc(vec![DocNode::custom("hide")]),
        );
        assert_eq!(
            hide_reason(
                &Documentable::Property(Arc::new(property)),
                &rules(),
                &BTreeMap::new()
            ),
            Some(HideReason::HiddenAccessor)
        );
    }

    #[test]
    fn test_private_annotation_class_is_hidden() {
        let module = Module::new("m").with_package(
            Package::new("a")
                .with_classlike(
                    Classlike::annotation_class(Sid::class("a", "Marker"))
                        .with_visibility(Visibility::Internal),
                )
                .with_classlike(Classlike::annotation_class(Sid::class("a", "Public"))),
        );
        let (filtered, batches) = pre_merge_filter(&module, &rules());
        assert_eq!(filtered.packages[0].classlikes.len(), 1);
        assert_eq!(filtered.packages[0].classlikes[0].header.name, "Public");
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn test_pre_merge_filter_removes_subtree() {
        let widget = Sid::class("com.example", "Widget");
        let module = Module::new("m").with_package(
            Package::new("com.example")
                .with_classlike(
                    Classlike::class(widget.clone())
                        .with_annotation(Annotation::named("androidx.annotation.RestrictTo"))
                        .with_nested(Classlike::class(widget.nested("Builder"))),
                )
                .with_function(
                    Function::new(Sid::package("com.example").member(Callable::new("helper")))
                        .with_visibility(Visibility::Private),
                ),
        );
        let (filtered, batches) = pre_merge_filter(&module, &rules());
        assert!(filtered.packages[0].classlikes.is_empty());
        assert!(filtered.packages[0].functions.is_empty());

        let mut builder = VisibilityContextBuilder::new();
        for batch in batches {
            builder.record(batch);
        }
        let ctx = builder.freeze();
        assert!(ctx.is_hidden(&widget));
        assert!(ctx.is_hidden(&widget.nested("Builder")));
    }

    #[test]
    fn test_hidden_package_is_recorded() {
        let module = Module::new("m")
            .with_package(Package::new("com.internal").with_doc(vec![DocNode::custom("hide")]))
            .with_package(Package::new("com.internalization"));
        let (filtered, batches) = pre_merge_filter(&module, &rules());
        assert_eq!(filtered.packages.len(), 1);

        let mut builder = VisibilityContextBuilder::new();
        for batch in batches {
            builder.record(batch);
        }
        let other = Module::new("java")
            .with_package(Package::new("com.internal.util"))
            .with_package(Package::new("com.internalization"));
        let kept = post_merge_package_filter(other, &mut builder);
        let names: Vec<_> = kept.packages.iter().map(|p| p.package_name()).collect();
        assert_eq!(names, vec!["com.internalization"]);
    }
}
