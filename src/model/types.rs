//! Type references, annotations, visibilities and view languages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::sid::Sid;

/// Display language of a documentation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Kotlin,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Java, Language::Kotlin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kotlin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    Private,
    /// Java package-private.
    Default,
}

impl Visibility {
    /// Whether the visibility is part of the public API surface.
    pub fn is_api(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

/// Declaration modifiers the renderer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Final,
    Open,
    Abstract,
    Sealed,
    Static,
    Lateinit,
    Const,
}

pub const JVM_STATIC: &str = "kotlin.jvm.JvmStatic";
pub const JVM_FIELD: &str = "kotlin.jvm.JvmField";
pub const JVM_SYNTHETIC: &str = "kotlin.jvm.JvmSynthetic";
pub const JVM_NAME: &str = "kotlin.jvm.JvmName";
pub const KOTLIN_DEPRECATED: &str = "kotlin.Deprecated";
pub const JAVA_DEPRECATED: &str = "java.lang.Deprecated";

/// An annotation application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    /// Identifier of the annotation class.
    pub sid: Sid,
    /// Argument name to rendered value.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(sid: Sid) -> Self {
        Self {
            sid,
            params: BTreeMap::new(),
        }
    }

    /// Build from a qualified name such as `kotlin.Deprecated`.
    pub fn named(qualified: &str) -> Self {
        let sid = match qualified.rsplit_once('.') {
            Some((package, class)) => Sid::class(package, class),
            None => Sid::class("", qualified),
        };
        Self::new(sid)
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn qualified_name(&self) -> String {
        self.sid.full_name()
    }

    pub fn is(&self, qualified: &str) -> bool {
        self.qualified_name() == qualified
    }

    /// `@Deprecated(level = DeprecationLevel.HIDDEN)`.
    pub fn is_deprecated_hidden(&self) -> bool {
        self.sid.simple_class_name() == Some("Deprecated")
            && self
                .params
                .get("level")
                .is_some_and(|level| level.contains("DeprecationLevel.HIDDEN"))
    }
}

/// A type reference as produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bound {
    GenericTypeConstructor {
        sid: Sid,
        #[serde(default)]
        projections: Vec<Bound>,
    },
    FunctionalTypeConstructor {
        sid: Sid,
        #[serde(default)]
        projections: Vec<Bound>,
        #[serde(default)]
        is_suspendable: bool,
    },
    Nullable {
        inner: Box<Bound>,
    },
    DefinitelyNonNullable {
        inner: Box<Bound>,
    },
    TypeParameter {
        sid: Sid,
        name: String,
    },
    TypeAliased {
        alias: Box<Bound>,
        inner: Box<Bound>,
    },
    PrimitiveJavaType {
        name: String,
    },
    JavaObject,
    Void,
    Dynamic,
    UnresolvedBound {
        name: String,
    },
}

impl Bound {
    pub fn class(sid: Sid) -> Self {
        Bound::GenericTypeConstructor {
            sid,
            projections: Vec::new(),
        }
    }

    pub fn nullable(inner: Bound) -> Self {
        Bound::Nullable {
            inner: Box::new(inner),
        }
    }

    /// Identifier of the referenced type, looking through nullability
    /// wrappers. Aliases resolve to the alias itself.
    pub fn sid(&self) -> Option<&Sid> {
        match self {
            Bound::GenericTypeConstructor { sid, .. }
            | Bound::FunctionalTypeConstructor { sid, .. }
            | Bound::TypeParameter { sid, .. } => Some(sid),
            Bound::Nullable { inner } | Bound::DefinitelyNonNullable { inner } => inner.sid(),
            Bound::TypeAliased { alias, .. } => alias.sid(),
            _ => None,
        }
    }

    /// Short name used when ordering and rendering signatures.
    pub fn display_name(&self) -> String {
        match self {
            Bound::GenericTypeConstructor { sid, .. }
            | Bound::FunctionalTypeConstructor { sid, .. } => sid
                .class_names
                .clone()
                .unwrap_or_else(|| sid.full_name()),
            Bound::TypeParameter { name, .. }
            | Bound::PrimitiveJavaType { name }
            | Bound::UnresolvedBound { name } => name.clone(),
            Bound::Nullable { inner } => format!("{}?", inner.display_name()),
            Bound::DefinitelyNonNullable { inner } => format!("{} & Any", inner.display_name()),
            Bound::TypeAliased { alias, .. } => alias.display_name(),
            Bound::JavaObject => "Object".to_string(),
            Bound::Void => "void".to_string(),
            Bound::Dynamic => "dynamic".to_string(),
        }
    }
}
