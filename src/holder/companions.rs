//! Companion objects and whether they deserve a page of their own.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::model::accessors::{getters_and_setters, is_hoisted_from_companion};
use crate::model::{Classlike, Documentable, Language, Sid};

pub const DEFAULT_COMPANION_NAME: &str = "Companion";

/// Whether a companion object adds anything beyond what is hoisted onto
/// its owner, per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boringness {
    NeverBoring,
    AlwaysBoring,
    /// Boring in the Kotlin view, interesting in Java.
    KotlinOnlyBoring,
    /// Boring in the Java view, interesting in Kotlin.
    JavaOnlyBoring,
}

impl Boringness {
    pub fn interesting_in(&self, language: Language) -> bool {
        match (self, language) {
            (Boringness::NeverBoring, _) => true,
            (Boringness::KotlinOnlyBoring, Language::Java) => true,
            (Boringness::JavaOnlyBoring, Language::Kotlin) => true,
            _ => false,
        }
    }
}

/// Companion objects of `classlikes`, by identifier.
pub fn compute_companions(classlikes: &[Arc<Classlike>]) -> HashMap<Sid, Arc<Classlike>> {
    classlikes
        .iter()
        .filter_map(|c| c.companion())
        .map(|companion| (companion.header.sid.clone(), Arc::clone(companion)))
        .collect()
}

/// Classify a companion object.
///
/// A companion is only ever boring when it keeps the default name,
/// declares no supertypes and is no extension receiver. It is then boring
/// in a view when all of its members are hoisted there; the Java view also
/// requires every generated accessor to be hoisted.
///
/// Supertypes are checked across every source set, so a companion whose
/// status differs between platforms is classified by the union.
pub fn boringness(companion: &Classlike, has_extensions: bool) -> Boringness {
    if companion.header.name != DEFAULT_COMPANION_NAME
        || has_extensions
        || companion.has_any_supertype()
    {
        return Boringness::NeverBoring;
    }
    let children = Documentable::Classlike(Arc::new(companion.clone())).children();
    let boring_in_java = children
        .iter()
        .all(|child| is_hoisted_from_companion(child, Language::Java))
        && getters_and_setters(&companion.properties)
            .into_iter()
            .all(|accessor| {
                is_hoisted_from_companion(&Documentable::Function(accessor), Language::Java)
            });
    let boring_in_kotlin = children
        .iter()
        .all(|child| is_hoisted_from_companion(child, Language::Kotlin));

    match (boring_in_java, boring_in_kotlin) {
        (true, true) => Boringness::AlwaysBoring,
        (true, false) => Boringness::JavaOnlyBoring,
        (false, true) => Boringness::KotlinOnlyBoring,
        (false, false) => Boringness::NeverBoring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{JVM_FIELD, JVM_STATIC};
    use crate::model::{
        Annotation, Callable, Function, Property, SourceSetId, Supertype, SupertypeKind, WithHeader,
    };

    fn companion() -> Classlike {
        Classlike::object(Sid::class("a", "Foo.Companion"))
    }

    fn member(name: &str) -> Sid {
        Sid::class("a", "Foo.Companion").member(Callable::new(name))
    }

    #[test]
    fn test_empty_companion_is_always_boring() {
        let b = boringness(&companion(), false);
        assert_eq!(b, Boringness::AlwaysBoring);
        assert!(!b.interesting_in(Language::Java));
        assert!(!b.interesting_in(Language::Kotlin));
    }

    #[test]
    fn test_plain_function_is_interesting_in_java_only() {
        let c = companion().with_function(Function::new(member("create")));
        let b = boringness(&c, false);
        assert_eq!(b, Boringness::KotlinOnlyBoring);
        assert!(b.interesting_in(Language::Java));
        assert!(!b.interesting_in(Language::Kotlin));
    }

    #[test]
    fn test_jvm_static_members_are_boring_everywhere() {
        let c = companion()
            .with_function(
                Function::new(member("create")).with_annotation(Annotation::named(JVM_STATIC)),
            )
            .with_property(
                Property::new(member("MAX"))
                    .with_annotation(Annotation::named(JVM_FIELD))
                    .with_getter(Function::new(member("<get-MAX>"))),
            );
        assert_eq!(boringness(&c, false), Boringness::AlwaysBoring);
    }

    #[test]
    fn test_property_with_plain_accessor_is_interesting_in_java() {
        let c = companion().with_property(
            Property::new(member("count"))
                .with_modifier(crate::model::Modifier::Lateinit)
                .with_getter(Function::new(member("<get-count>"))),
        );
        assert_eq!(boringness(&c, false), Boringness::KotlinOnlyBoring);
    }

    #[test]
    fn test_named_or_inheriting_companions_are_never_boring() {
        let named = Classlike::object(Sid::class("a", "Foo.Factory"));
        assert_eq!(boringness(&named, false), Boringness::NeverBoring);
        let inheriting =
            companion().with_supertype(Sid::class("a", "Base"), SupertypeKind::KotlinClass);
        assert_eq!(boringness(&inheriting, false), Boringness::NeverBoring);
        assert_eq!(boringness(&companion(), true), Boringness::NeverBoring);
    }

    #[test]
    fn test_supertype_on_any_source_set_makes_companion_interesting() {
        let mut multiplatform = companion();
        multiplatform.header.source_sets =
            [SourceSetId::common("commonMain"), SourceSetId::jvm("jvmMain")]
                .into_iter()
                .collect();
        multiplatform.supertypes.insert(
            SourceSetId::jvm("jvmMain"),
            vec![Supertype {
                sid: Sid::class("a", "Base"),
                kind: SupertypeKind::KotlinClass,
            }],
        );
        assert!(multiplatform.canonical_supertypes().is_empty());
        assert_eq!(boringness(&multiplatform, false), Boringness::NeverBoring);
    }

    #[test]
    fn test_compute_companions() {
        let foo = Sid::class("a", "Foo");
        let classlikes = vec![
            Arc::new(Classlike::class(foo.clone()).with_companion(companion())),
            Arc::new(Classlike::class(Sid::class("a", "Bar"))),
        ];
        let companions = compute_companions(&classlikes);
        assert_eq!(companions.len(), 1);
        assert!(companions.contains_key(&foo.nested("Companion")));
    }
}
