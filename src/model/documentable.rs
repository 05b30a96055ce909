//! Documentable entities: packages, class-likes, functions, properties,
//! enum entries and type aliases.
//!
//! Every documentable carries a [`Header`] with its identifier and its
//! per-source-set facets. Children are held behind `Arc` so that derived
//! trees (filtered, propagated, synthesized) share unchanged subtrees.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::doc::DocNode;
use super::sid::Sid;
use super::source_set::{canonical_source_set, SourceSet, SourceSetId};
use super::types::{Annotation, Bound, Modifier, Visibility, JVM_NAME};

/// Where a documentable is declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Attributes shared by every documentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub sid: Sid,
    pub name: String,
    #[serde(default)]
    pub source_sets: BTreeSet<SourceSetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_present_in: Option<SourceSetId>,
    #[serde(default)]
    pub visibility: BTreeMap<SourceSetId, Visibility>,
    #[serde(default)]
    pub annotations: BTreeMap<SourceSetId, Vec<Annotation>>,
    /// `@file:` annotations of the declaring file (top-level members only).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub file_annotations: BTreeMap<SourceSetId, Vec<Annotation>>,
    #[serde(default)]
    pub documentation: BTreeMap<SourceSetId, Vec<DocNode>>,
    #[serde(default)]
    pub sources: BTreeMap<SourceSetId, SourceLocation>,
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
}

pub const DEFAULT_SOURCE_SET: &str = "main";

impl Header {
    /// Header for a public documentable in the default JVM source set.
    pub fn new(sid: Sid, name: impl Into<String>) -> Self {
        let source_set = SourceSetId::jvm(DEFAULT_SOURCE_SET);
        Self {
            sid,
            name: name.into(),
            source_sets: [source_set.clone()].into_iter().collect(),
            expect_present_in: None,
            visibility: [(source_set, Visibility::Public)].into_iter().collect(),
            annotations: BTreeMap::new(),
            file_annotations: BTreeMap::new(),
            documentation: BTreeMap::new(),
            sources: BTreeMap::new(),
            modifiers: BTreeSet::new(),
        }
    }

    pub fn canonical_source_set(&self) -> Option<&SourceSetId> {
        canonical_source_set(&self.source_sets, self.expect_present_in.as_ref())
    }

    pub fn canonical_visibility(&self) -> Option<Visibility> {
        self.canonical_source_set()
            .and_then(|set| self.visibility.get(set))
            .copied()
    }

    pub fn canonical_annotations(&self) -> &[Annotation] {
        self.canonical_source_set()
            .and_then(|set| self.annotations.get(set))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values().flatten()
    }

    pub fn has_annotation(&self, qualified: &str) -> bool {
        self.canonical_annotations().iter().any(|a| a.is(qualified))
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn canonical_documentation(&self) -> &[DocNode] {
        self.canonical_source_set()
            .and_then(|set| self.documentation.get(set))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn canonical_source(&self) -> Option<&SourceLocation> {
        self.canonical_source_set()
            .and_then(|set| self.sources.get(set))
            .or_else(|| self.sources.values().next())
    }

    /// `@file:JvmName` of the declaring file.
    pub fn jvm_file_name(&self) -> Option<&str> {
        let set = self.canonical_source_set()?;
        self.file_annotations
            .get(set)?
            .iter()
            .find(|a| a.is(JVM_NAME))
            .and_then(|a| a.params.get("name"))
            .map(|name| name.trim_matches('"'))
    }

    /// `path:line` of the declaration, for author warnings.
    pub fn error_location(&self) -> String {
        match self.canonical_source() {
            Some(source) if source.path.contains(".tmp") => {
                "Error occurred in an unreadable temporary file!".to_string()
            }
            Some(source) => match source.line {
                Some(line) => format!("{}:{}", source.path, line),
                None => format!("{}:UnknownLine", source.path),
            },
            None => "File location could not be determined.".to_string(),
        }
    }

    fn source_set_names(&self) -> String {
        self.source_sets
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Access to the shared header plus fluent builders over it.
pub trait WithHeader {
    fn header(&self) -> &Header;
    fn header_mut(&mut self) -> &mut Header;

    fn sid(&self) -> &Sid {
        &self.header().sid
    }

    fn name(&self) -> &str {
        &self.header().name
    }

    /// Replace the visibility in every source set.
    fn with_visibility(mut self, visibility: Visibility) -> Self
    where
        Self: Sized,
    {
        let header = self.header_mut();
        header.visibility = header
            .source_sets
            .iter()
            .map(|set| (set.clone(), visibility))
            .collect();
        self
    }

    /// Add an annotation to every source set.
    fn with_annotation(mut self, annotation: Annotation) -> Self
    where
        Self: Sized,
    {
        let header = self.header_mut();
        for set in header.source_sets.clone() {
            header
                .annotations
                .entry(set)
                .or_default()
                .push(annotation.clone());
        }
        self
    }

    fn with_file_annotation(mut self, annotation: Annotation) -> Self
    where
        Self: Sized,
    {
        let header = self.header_mut();
        for set in header.source_sets.clone() {
            header
                .file_annotations
                .entry(set)
                .or_default()
                .push(annotation.clone());
        }
        self
    }

    fn with_doc(mut self, nodes: Vec<DocNode>) -> Self
    where
        Self: Sized,
    {
        let header = self.header_mut();
        for set in header.source_sets.clone() {
            header.documentation.insert(set, nodes.clone());
        }
        self
    }

    fn with_source(mut self, path: &str, line: Option<u32>) -> Self
    where
        Self: Sized,
    {
        let header = self.header_mut();
        for set in header.source_sets.clone() {
            header.sources.insert(
                set,
                SourceLocation {
                    path: path.to_string(),
                    line,
                },
            );
        }
        self
    }

    fn with_modifier(mut self, modifier: Modifier) -> Self
    where
        Self: Sized,
    {
        self.header_mut().modifiers.insert(modifier);
        self
    }
}

macro_rules! impl_with_header {
    ($($ty:ty),*) => {
        $(impl WithHeader for $ty {
            fn header(&self) -> &Header {
                &self.header
            }

            fn header_mut(&mut self) -> &mut Header {
                &mut self.header
            }
        })*
    };
}

/// How a supertype was declared.
///
/// The Java and Kotlin taxonomies are kept apart as the analyzer reports
/// them; [`SupertypeKind::role`] folds them into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupertypeKind {
    JavaClass,
    JavaInterface,
    KotlinClass,
    KotlinInterface,
    KotlinObject,
    KotlinEnumClass,
    KotlinAnnotationClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupertypeRole {
    Superclass,
    Interface,
}

impl SupertypeKind {
    pub fn role(&self) -> Option<SupertypeRole> {
        match self {
            SupertypeKind::JavaClass | SupertypeKind::KotlinClass => Some(SupertypeRole::Superclass),
            SupertypeKind::JavaInterface | SupertypeKind::KotlinInterface => {
                Some(SupertypeRole::Interface)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supertype {
    pub sid: Sid,
    pub kind: SupertypeKind,
}

/// Kind of a class-like with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClasslikeKind {
    Class,
    Interface,
    Enum {
        #[serde(default)]
        entries: Vec<Arc<EnumEntry>>,
    },
    Annotation,
    Object,
}

impl ClasslikeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClasslikeKind::Class => "class",
            ClasslikeKind::Interface => "interface",
            ClasslikeKind::Enum { .. } => "enum",
            ClasslikeKind::Annotation => "annotation",
            ClasslikeKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classlike {
    #[serde(flatten)]
    pub header: Header,
    #[serde(flatten)]
    pub kind: ClasslikeKind,
    #[serde(default)]
    pub constructors: Vec<Arc<Function>>,
    #[serde(default)]
    pub functions: Vec<Arc<Function>>,
    #[serde(default)]
    pub properties: Vec<Arc<Property>>,
    #[serde(default)]
    pub classlikes: Vec<Arc<Classlike>>,
    /// Name of the companion object among `classlikes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<String>,
    #[serde(default)]
    pub supertypes: BTreeMap<SourceSetId, Vec<Supertype>>,
    /// Analyzer-reported exception marker.
    #[serde(default)]
    pub is_exception: bool,
    /// Generated container for top-level members in the Java view.
    #[serde(default)]
    pub synthetic: bool,
}

impl Classlike {
    pub fn new(sid: Sid, kind: ClasslikeKind) -> Self {
        let name = sid.simple_class_name().unwrap_or_default().to_string();
        Self {
            header: Header::new(sid, name),
            kind,
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            classlikes: Vec::new(),
            companion: None,
            supertypes: BTreeMap::new(),
            is_exception: false,
            synthetic: false,
        }
    }

    pub fn class(sid: Sid) -> Self {
        Self::new(sid, ClasslikeKind::Class)
    }

    pub fn interface(sid: Sid) -> Self {
        Self::new(sid, ClasslikeKind::Interface)
    }

    pub fn object(sid: Sid) -> Self {
        Self::new(sid, ClasslikeKind::Object)
    }

    pub fn annotation_class(sid: Sid) -> Self {
        Self::new(sid, ClasslikeKind::Annotation)
    }

    pub fn enum_class(sid: Sid, entries: Vec<EnumEntry>) -> Self {
        Self::new(
            sid,
            ClasslikeKind::Enum {
                entries: entries.into_iter().map(Arc::new).collect(),
            },
        )
    }

    pub fn with_supertype(mut self, sid: Sid, kind: SupertypeKind) -> Self {
        for set in self.header.source_sets.clone() {
            self.supertypes.entry(set).or_default().push(Supertype {
                sid: sid.clone(),
                kind,
            });
        }
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(Arc::new(property));
        self
    }

    pub fn with_nested(mut self, classlike: Classlike) -> Self {
        self.classlikes.push(Arc::new(classlike));
        self
    }

    pub fn with_companion(mut self, companion: Classlike) -> Self {
        self.companion = Some(companion.header.name.clone());
        self.classlikes.push(Arc::new(companion));
        self
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, ClasslikeKind::Object)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClasslikeKind::Interface)
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self.kind, ClasslikeKind::Annotation)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ClasslikeKind::Enum { .. })
    }

    pub fn entries(&self) -> &[Arc<EnumEntry>] {
        match &self.kind {
            ClasslikeKind::Enum { entries } => entries,
            _ => &[],
        }
    }

    /// The companion object, looked up among the nested class-likes.
    pub fn companion(&self) -> Option<&Arc<Classlike>> {
        let name = self.companion.as_ref()?;
        self.classlikes
            .iter()
            .find(|c| c.is_object() && &c.header.name == name)
    }

    /// Supertypes declared in the canonical source set.
    pub fn canonical_supertypes(&self) -> &[Supertype] {
        self.header
            .canonical_source_set()
            .and_then(|set| self.supertypes.get(set))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_any_supertype(&self) -> bool {
        self.supertypes.values().any(|s| !s.is_empty())
    }

    /// Dotted class path inside the package (`Outer.Inner`).
    pub fn class_path(&self) -> &str {
        self.header
            .sid
            .class_names
            .as_deref()
            .unwrap_or(&self.header.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Bound,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(flatten)]
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Bound>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Bound>,
    #[serde(default)]
    pub is_constructor: bool,
    /// Declaring class when the member is inherited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<Sid>,
}

impl Function {
    pub fn new(sid: Sid) -> Self {
        let name = sid
            .callable
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        Self {
            header: Header::new(sid, name),
            receiver: None,
            parameters: Vec::new(),
            return_type: None,
            is_constructor: false,
            inherited_from: None,
        }
    }

    pub fn with_receiver(mut self, receiver: Bound) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_parameter(mut self, name: &str, type_: Bound) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            type_,
            annotations: Vec::new(),
        });
        self
    }

    pub fn with_inherited_from(mut self, origin: Sid) -> Self {
        self.inherited_from = Some(origin);
        self
    }

    pub fn anchor(&self) -> String {
        match &self.header.sid.callable {
            Some(callable) => callable.anchor(),
            None => format!("{}()", self.header.name),
        }
    }

    /// `name(p: T, ...)` text used for stable ordering.
    pub fn signature_string(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{}{}", p.name, p.type_.display_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.header.name, params)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(flatten)]
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Bound>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<Arc<Function>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<Arc<Function>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<Sid>,
}

impl Property {
    pub fn new(sid: Sid) -> Self {
        let name = sid
            .callable
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        Self {
            header: Header::new(sid, name),
            receiver: None,
            type_: None,
            getter: None,
            setter: None,
            inherited_from: None,
        }
    }

    pub fn with_type(mut self, type_: Bound) -> Self {
        self.type_ = Some(type_);
        self
    }

    pub fn with_receiver(mut self, receiver: Bound) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_getter(mut self, getter: Function) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn with_setter(mut self, setter: Function) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn with_inherited_from(mut self, origin: Sid) -> Self {
        self.inherited_from = Some(origin);
        self
    }

    /// Every anchor a link to this property may use: the property itself,
    /// the JavaBean accessor names, and their `-` delimited variants.
    pub fn anchors(&self) -> Vec<String> {
        let name = &self.header.name;
        let capitalized = capitalize(name);
        let mut anchors = vec![
            self.header
                .sid
                .callable
                .as_ref()
                .map(|c| c.anchor())
                .unwrap_or_else(|| format!("{}()", name)),
            name.clone(),
            format!("get{}()", capitalized),
            format!("set{}()", capitalized),
            format!("get{}", capitalized),
            format!("set{}", capitalized),
        ];
        anchors.push(format!("-{}-", name));
        anchors.push(format!("get{}--", capitalized));
        anchors.push(format!("set{}-", capitalized));
        anchors
    }
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumEntry {
    #[serde(flatten)]
    pub header: Header,
    #[serde(default)]
    pub functions: Vec<Arc<Function>>,
    #[serde(default)]
    pub properties: Vec<Arc<Property>>,
    #[serde(default)]
    pub classlikes: Vec<Arc<Classlike>>,
}

impl EnumEntry {
    pub fn new(sid: Sid) -> Self {
        let name = sid.simple_class_name().unwrap_or_default().to_string();
        Self {
            header: Header::new(sid, name),
            functions: Vec::new(),
            properties: Vec::new(),
            classlikes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAlias {
    #[serde(flatten)]
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<Bound>,
}

impl TypeAlias {
    pub fn new(sid: Sid) -> Self {
        let name = sid.simple_class_name().unwrap_or_default().to_string();
        Self {
            header: Header::new(sid, name),
            underlying: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(flatten)]
    pub header: Header,
    #[serde(default)]
    pub functions: Vec<Arc<Function>>,
    #[serde(default)]
    pub properties: Vec<Arc<Property>>,
    #[serde(default)]
    pub classlikes: Vec<Arc<Classlike>>,
    #[serde(default)]
    pub type_aliases: Vec<Arc<TypeAlias>>,
}

impl Package {
    pub fn new(name: &str) -> Self {
        Self {
            header: Header::new(Sid::package(name), name),
            functions: Vec::new(),
            properties: Vec::new(),
            classlikes: Vec::new(),
            type_aliases: Vec::new(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.header.sid.package_name
    }

    pub fn with_classlike(mut self, classlike: Classlike) -> Self {
        self.classlikes.push(Arc::new(classlike));
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(Arc::new(property));
        self
    }

    pub fn with_type_alias(mut self, alias: TypeAlias) -> Self {
        self.type_aliases.push(Arc::new(alias));
        self
    }
}

impl_with_header!(Package, Classlike, Function, Property, EnumEntry, TypeAlias);

/// The analyzer's output for one pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub source_sets: Vec<SourceSet>,
    #[serde(default)]
    pub packages: Vec<Arc<Package>>,
}

impl Module {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source_sets: vec![SourceSet::new(SourceSetId::jvm(DEFAULT_SOURCE_SET))],
            packages: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(Arc::new(package));
        self
    }

    /// Documented visibilities per source set.
    pub fn documented_visibilities(&self) -> BTreeMap<SourceSetId, BTreeSet<Visibility>> {
        self.source_sets
            .iter()
            .map(|s| (s.id.clone(), s.documented_visibilities.clone()))
            .collect()
    }
}

/// Any documentable, shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Documentable {
    Package(Arc<Package>),
    Classlike(Arc<Classlike>),
    Function(Arc<Function>),
    Property(Arc<Property>),
    EnumEntry(Arc<EnumEntry>),
    TypeAlias(Arc<TypeAlias>),
}

impl Documentable {
    pub fn header(&self) -> &Header {
        match self {
            Documentable::Package(d) => &d.header,
            Documentable::Classlike(d) => &d.header,
            Documentable::Function(d) => &d.header,
            Documentable::Property(d) => &d.header,
            Documentable::EnumEntry(d) => &d.header,
            Documentable::TypeAlias(d) => &d.header,
        }
    }

    pub fn sid(&self) -> &Sid {
        &self.header().sid
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    /// Kind word used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Documentable::Package(_) => "package",
            Documentable::Classlike(c) => c.kind.as_str(),
            Documentable::Function(_) => "function",
            Documentable::Property(_) => "property",
            Documentable::EnumEntry(_) => "enum value",
            Documentable::TypeAlias(_) => "type alias",
        }
    }

    /// Direct structural children. Property accessors count as children.
    pub fn children(&self) -> Vec<Documentable> {
        let mut out = Vec::new();
        match self {
            Documentable::Package(p) => {
                out.extend(p.classlikes.iter().cloned().map(Documentable::Classlike));
                out.extend(p.functions.iter().cloned().map(Documentable::Function));
                out.extend(p.properties.iter().cloned().map(Documentable::Property));
                out.extend(p.type_aliases.iter().cloned().map(Documentable::TypeAlias));
            }
            Documentable::Classlike(c) => {
                out.extend(c.constructors.iter().cloned().map(Documentable::Function));
                out.extend(c.functions.iter().cloned().map(Documentable::Function));
                out.extend(c.properties.iter().cloned().map(Documentable::Property));
                out.extend(c.classlikes.iter().cloned().map(Documentable::Classlike));
                out.extend(c.entries().iter().cloned().map(Documentable::EnumEntry));
            }
            Documentable::Property(p) => {
                out.extend(p.getter.iter().cloned().map(Documentable::Function));
                out.extend(p.setter.iter().cloned().map(Documentable::Function));
            }
            Documentable::EnumEntry(e) => {
                out.extend(e.functions.iter().cloned().map(Documentable::Function));
                out.extend(e.properties.iter().cloned().map(Documentable::Property));
                out.extend(e.classlikes.iter().cloned().map(Documentable::Classlike));
            }
            Documentable::Function(_) | Documentable::TypeAlias(_) => {}
        }
        out
    }

    /// Every descendant, depth first.
    pub fn exploded_children(&self) -> Vec<Documentable> {
        let mut out = Vec::new();
        let mut stack = self.children();
        stack.reverse();
        while let Some(next) = stack.pop() {
            let mut children = next.children();
            children.reverse();
            stack.extend(children);
            out.push(next);
        }
        out
    }

    pub fn as_classlike(&self) -> Option<&Arc<Classlike>> {
        match self {
            Documentable::Classlike(c) => Some(c),
            _ => None,
        }
    }
}

/// Orders documentables known to be name-unique per platform: by full
/// name, then identifier text, then source sets.
pub fn compare_documentables(a: &Header, b: &Header) -> Ordering {
    a.sid
        .full_name()
        .cmp(&b.sid.full_name())
        .then_with(|| a.sid.to_string().cmp(&b.sid.to_string()))
        .then_with(|| a.source_set_names().cmp(&b.source_set_names()))
}

/// Orders functions by name, arity, rendered signature, then source sets.
pub fn compare_function_signatures(a: &Function, b: &Function) -> Ordering {
    a.header
        .name
        .cmp(&b.header.name)
        .then_with(|| a.parameters.len().cmp(&b.parameters.len()))
        .then_with(|| a.signature_string().cmp(&b.signature_string()))
        .then_with(|| a.header.source_set_names().cmp(&b.header.source_set_names()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::doc::DocNode;
    use crate::model::sid::Callable;

    #[test]
    fn test_classlike_json_round_shape() {
        let json = r#"{
            "sid": {"package_name": "a.b", "class_names": "Color"},
            "name": "Color",
            "kind": "enum",
            "entries": [
                {"sid": {"package_name": "a.b", "class_names": "Color.RED"}, "name": "RED"}
            ],
            "companion": null
        }"#;
        let classlike: Classlike = serde_json::from_str(json).unwrap();
        assert!(classlike.is_enum());
        assert_eq!(classlike.entries().len(), 1);
        assert_eq!(classlike.entries()[0].header.name, "RED");
        assert!(classlike.header.source_sets.is_empty());
    }

    #[test]
    fn test_exploded_children_is_depth_first() {
        let outer = Sid::class("a", "Outer");
        let inner = outer.nested("Inner");
        let classlike = Classlike::class(outer.clone())
            .with_nested(
                Classlike::class(inner.clone())
                    .with_function(Function::new(inner.member(Callable::new("deep")))),
            )
            .with_function(Function::new(outer.member(Callable::new("shallow"))));
        let doc = Documentable::Classlike(Arc::new(classlike));
        let names: Vec<_> = doc
            .exploded_children()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["shallow", "Inner", "deep"]);
    }

    #[test]
    fn test_companion_lookup() {
        let foo = Sid::class("a", "Foo");
        let classlike =
            Classlike::class(foo.clone()).with_companion(Classlike::object(foo.nested("Companion")));
        assert_eq!(
            classlike.companion().map(|c| c.header.name.as_str()),
            Some("Companion")
        );
        assert!(Classlike::class(foo).companion().is_none());
    }

    #[test]
    fn test_jvm_file_name() {
        let f = Function::new(Sid::package("a").member(Callable::new("f")))
            .with_file_annotation(Annotation::named(JVM_NAME).with_param("name", "\"Strings\""));
        assert_eq!(f.header.jvm_file_name(), Some("Strings"));
    }

    #[test]
    fn test_error_location() {
        let f = Function::new(Sid::package("a").member(Callable::new("f")))
            .with_source("src/a/Utils.kt", Some(12))
            .with_doc(vec![DocNode::text("x")]);
        assert_eq!(f.header.error_location(), "src/a/Utils.kt:12");
        let bare = Function::new(Sid::package("a").member(Callable::new("g")));
        assert_eq!(
            bare.header.error_location(),
            "File location could not be determined."
        );
    }

    #[test]
    fn test_property_anchors() {
        let p = Property::new(Sid::class("a", "Foo").member(Callable::new("size")));
        let anchors = p.anchors();
        assert!(anchors.contains(&"size()".to_string()));
        assert!(anchors.contains(&"getSize()".to_string()));
        assert!(anchors.contains(&"setSize-".to_string()));
    }
}
