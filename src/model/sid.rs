//! Symbol identifiers.
//!
//! A `Sid` names one documentable entity: a package, a (possibly nested)
//! class-like, or a callable inside either. Equality is structural, so two
//! pipelines that describe the same symbol produce equal keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Callable part of a symbol identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Callable {
    pub name: String,
    /// Qualified receiver type name for extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Qualified parameter type names, in declaration order.
    #[serde(default)]
    pub params: Vec<String>,
}

impl Callable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            params: Vec::new(),
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Stable in-page anchor: the name plus parameter types, which keeps
    /// overloads apart.
    pub fn anchor(&self) -> String {
        format!("{}({})", self.name, self.params.join(","))
    }

    /// Signature used in the textual form of a `Sid`.
    fn signature(&self) -> String {
        let receiver = self.receiver.as_deref().unwrap_or("");
        format!("{}#{}", receiver, self.params.join("#"))
    }
}

/// Symbol identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sid {
    /// Dotted package name. Empty for the root package.
    #[serde(default)]
    pub package_name: String,
    /// Dotted class path inside the package, e.g. `Outer.Inner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callable: Option<Callable>,
    /// Disambiguator for entities that share a path (analyzer specific).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Sid {
    pub fn package(name: impl Into<String>) -> Self {
        Self {
            package_name: name.into(),
            class_names: None,
            callable: None,
            extra: None,
        }
    }

    pub fn class(package: impl Into<String>, class_names: impl Into<String>) -> Self {
        Self {
            package_name: package.into(),
            class_names: Some(class_names.into()),
            callable: None,
            extra: None,
        }
    }

    /// Identifier of a class nested in this one (or a top-level class when
    /// this is a package identifier).
    pub fn nested(&self, name: &str) -> Self {
        let class_names = match &self.class_names {
            Some(outer) => format!("{}.{}", outer, name),
            None => name.to_string(),
        };
        Self {
            package_name: self.package_name.clone(),
            class_names: Some(class_names),
            callable: None,
            extra: None,
        }
    }

    pub fn member(&self, callable: Callable) -> Self {
        Self {
            package_name: self.package_name.clone(),
            class_names: self.class_names.clone(),
            callable: Some(callable),
            extra: None,
        }
    }

    /// Same identifier relocated into another class of the same package.
    pub fn with_class(&self, class_names: impl Into<String>) -> Self {
        Self {
            class_names: Some(class_names.into()),
            ..self.clone()
        }
    }

    /// Identifier of the enclosing entity.
    ///
    /// Callables resolve to their class (or package), nested classes to
    /// their outer class, top-level classes to their package. A package has
    /// no parent.
    pub fn parent(&self) -> Option<Sid> {
        if self.callable.is_some() {
            return Some(Sid {
                callable: None,
                extra: None,
                ..self.clone()
            });
        }
        match &self.class_names {
            Some(names) => match names.rsplit_once('.') {
                Some((outer, _)) => Some(Sid::class(self.package_name.clone(), outer)),
                None => Some(Sid::package(self.package_name.clone())),
            },
            None => None,
        }
    }

    pub fn containing_package(&self) -> Sid {
        Sid::package(self.package_name.clone())
    }

    pub fn is_package(&self) -> bool {
        self.class_names.is_none() && self.callable.is_none()
    }

    /// Dotted fully qualified name, skipping empty segments.
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if !self.package_name.is_empty() {
            parts.push(&self.package_name);
        }
        if let Some(names) = &self.class_names {
            parts.push(names);
        }
        if let Some(callable) = &self.callable {
            parts.push(&callable.name);
        }
        parts.join(".")
    }

    /// Innermost class name, if any.
    pub fn simple_class_name(&self) -> Option<&str> {
        self.class_names
            .as_deref()
            .map(|names| names.rsplit('.').next().unwrap_or(names))
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.package_name,
            self.class_names.as_deref().unwrap_or(""),
            self.callable.as_ref().map(|c| c.name.as_str()).unwrap_or(""),
            self.callable
                .as_ref()
                .map(Callable::signature)
                .unwrap_or_default(),
            self.extra.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chain() {
        let method = Sid::class("a.b", "Outer.Inner").member(Callable::new("run"));
        let inner = method.parent().unwrap();
        assert_eq!(inner, Sid::class("a.b", "Outer.Inner"));
        let outer = inner.parent().unwrap();
        assert_eq!(outer, Sid::class("a.b", "Outer"));
        assert_eq!(outer.parent().unwrap(), Sid::package("a.b"));
        assert!(Sid::package("a.b").parent().is_none());
    }

    #[test]
    fn test_full_name_skips_empty_package() {
        assert_eq!(Sid::class("", "Foo").full_name(), "Foo");
        assert_eq!(
            Sid::class("kotlin.jvm.functions", "Function1").full_name(),
            "kotlin.jvm.functions.Function1"
        );
        let top = Sid::package("a").member(Callable::new("shout"));
        assert_eq!(top.full_name(), "a.shout");
    }

    #[test]
    fn test_anchor_disambiguates_overloads() {
        let one = Callable::new("put").with_params(["kotlin.String"]);
        let two = Callable::new("put").with_params(["kotlin.String", "kotlin.Int"]);
        assert_eq!(one.anchor(), "put(kotlin.String)");
        assert_eq!(two.anchor(), "put(kotlin.String,kotlin.Int)");
        assert_ne!(one.anchor(), two.anchor());
    }

    #[test]
    fn test_display_form() {
        let sid = Sid::class("a.b", "Foo")
            .member(Callable::new("bar").with_receiver("kotlin.String").with_params(["kotlin.Int"]));
        assert_eq!(sid.to_string(), "a.b/Foo/bar/kotlin.String#kotlin.Int/");
    }

    #[test]
    fn test_simple_class_name() {
        assert_eq!(Sid::class("a", "Outer.Inner").simple_class_name(), Some("Inner"));
        assert_eq!(Sid::package("a").simple_class_name(), None);
    }
}
