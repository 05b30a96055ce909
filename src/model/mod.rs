//! Symbol model consumed from the source analyzer.
//!
//! The analyzer emits one [`Module`] per pipeline (Java sources, Kotlin
//! sources) as JSON. Everything downstream works on these types.

pub mod accessors;
pub mod doc;
pub mod documentable;
pub mod sid;
pub mod source_set;
pub mod types;

pub use doc::{DocNode, TagKind};
pub use documentable::{
    compare_documentables, compare_function_signatures, Classlike, ClasslikeKind, Documentable,
    EnumEntry, Function, Header, Module, Package, Parameter, Property, SourceLocation, Supertype,
    SupertypeKind, SupertypeRole, TypeAlias, WithHeader,
};
pub use sid::{Callable, Sid};
pub use source_set::{canonical_source_set, Platform, SourceSet, SourceSetId};
pub use types::{Annotation, Bound, Language, Modifier, Visibility};
