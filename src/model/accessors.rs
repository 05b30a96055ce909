//! Java-view helpers: property accessors, companion hoisting, synthetic
//! container naming, exception detection.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use std::sync::Arc;

use super::documentable::{capitalize, Classlike, Documentable, Function, Header, Property, WithHeader};
use super::types::{Annotation, Language, Modifier, JVM_FIELD, JVM_STATIC};

lazy_static! {
    /// Compiler-generated accessor names such as `<get-size>`.
    static ref SYNTHETIC_ACCESSOR: Regex = Regex::new(r"^<([gs]et)-(.+)>$").unwrap();
}

/// Throwable roots; a class-like extending one of these is an exception.
static THROWABLE_TYPES: phf::Set<&'static str> = phf_set! {
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.RuntimeException",
    "java.lang.Error",
    "kotlin.Throwable",
    "kotlin.Exception",
    "kotlin.RuntimeException",
    "kotlin.Error",
};

/// Java accessors for `properties`. `@JvmField` properties have none.
pub fn getters_and_setters(properties: &[Arc<Property>]) -> Vec<Arc<Function>> {
    properties
        .iter()
        .filter(|p| !p.header.has_annotation(JVM_FIELD))
        .flat_map(|p| {
            p.getter
                .iter()
                .chain(p.setter.iter())
                .map(|accessor| Arc::new(java_accessor(p, accessor)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn java_accessor(property: &Property, accessor: &Function) -> Function {
    let mut function = accessor.clone();
    if let Some(caps) = SYNTHETIC_ACCESSOR.captures(&accessor.header.name) {
        let name = format!("{}{}", &caps[1], capitalize(&caps[2]));
        if let Some(callable) = function.header.sid.callable.as_mut() {
            callable.name = name.clone();
        }
        function.header.name = name;
    }
    if property.header.has_annotation(JVM_STATIC) && !function.header.has_annotation(JVM_STATIC) {
        function = function.with_annotation(Annotation::named(JVM_STATIC));
    }
    if property.header.has_modifier(Modifier::Static) {
        function.header.modifiers.insert(Modifier::Static);
    }
    if function.receiver.is_none() {
        function.receiver = property.receiver.clone();
    }
    function
}

/// Whether a companion member is documented on the companion's owner.
///
/// Kotlin hoists every function and property. Java hoists `@JvmStatic`
/// functions and fields that compile onto the owner (`@JvmField`,
/// `lateinit`, `const`).
pub fn is_hoisted_from_companion(documentable: &Documentable, language: Language) -> bool {
    match documentable {
        Documentable::Function(f) => function_hoisted(f, language),
        Documentable::Property(p) => property_hoisted(p, language),
        _ => false,
    }
}

pub fn function_hoisted(function: &Function, language: Language) -> bool {
    match language {
        Language::Kotlin => true,
        Language::Java => function.header.has_annotation(JVM_STATIC),
    }
}

pub fn property_hoisted(property: &Property, language: Language) -> bool {
    match language {
        Language::Kotlin => true,
        Language::Java => {
            let header = &property.header;
            header.has_annotation(JVM_FIELD)
                || header.has_modifier(Modifier::Lateinit)
                || header.has_modifier(Modifier::Const)
        }
    }
}

/// `@JvmSynthetic` members are invisible from Java.
pub fn is_jvm_synthetic(header: &Header) -> bool {
    header
        .canonical_annotations()
        .iter()
        .any(|a| a.sid.simple_class_name() == Some("JvmSynthetic"))
}

/// Container class name for a top-level member in the Java view: the
/// file's `@JvmName`, else the source file stem plus `Kt`.
pub fn name_for_synthetic_class(header: &Header) -> String {
    if let Some(name) = header.jvm_file_name() {
        return name.to_string();
    }
    let stem = header
        .canonical_source()
        .and_then(|source| source.path.rsplit('/').next())
        .and_then(|file| file.split('.').next())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let last = header.sid.package_name.rsplit('.').next().unwrap_or("");
            capitalize(last)
        });
    format!("{}Kt", stem)
}

/// Exception classes: analyzer-flagged, carrying members declared on
/// `Throwable`, or declaring a throwable root as supertype.
pub fn is_exception_class(classlike: &Classlike) -> bool {
    classlike.is_exception
        || classlike
            .functions
            .iter()
            .any(|f| f.sid().class_names.as_deref() == Some("Throwable"))
        || classlike
            .canonical_supertypes()
            .iter()
            .any(|s| THROWABLE_TYPES.contains(s.sid.full_name().as_str()))
}
