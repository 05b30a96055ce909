//! Per-package and per-class-like page data.
//!
//! These are the structures a template layer renders. Every reference in
//! them is already resolved to a [`Link`].

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::config::DevsiteConfig;
use crate::error::Result;
use crate::holder::DocumentablesHolder;
use crate::model::accessors::{
    function_hoisted, getters_and_setters, is_exception_class, property_hoisted,
};
use crate::model::types::JVM_FIELD;
use crate::model::{
    compare_function_signatures, Bound, Classlike, ClasslikeKind, Function, Header, Language,
    Modifier, Package, Property, Sid, TypeAlias,
};
use crate::paths::{any_sid, Link, PathProvider};

/// Rendering switches taken from the configuration.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub include_hidden_parent_symbols: bool,
    pub base_source_link: Option<String>,
    pub base_function_source_link: Option<String>,
    pub base_property_source_link: Option<String>,
}

impl SummaryOptions {
    pub fn from_config(config: &DevsiteConfig) -> Self {
        Self {
            include_hidden_parent_symbols: config.include_hidden_parent_symbols,
            base_source_link: config.base_source_link.clone(),
            base_function_source_link: config.base_function_source_link.clone(),
            base_property_source_link: config.base_property_source_link.clone(),
        }
    }
}

/// Fill a `%s` template with the declaration's source path and `name`.
///
/// The path is the common prefix of the paths in every source set. No
/// link is produced without a template or a source.
pub fn source_link(template: Option<&str>, header: &Header, name: &str) -> Option<String> {
    let template = template?;
    let path = header
        .sources
        .values()
        .map(|source| source.path.as_str())
        .reduce(common_prefix)?;
    Some(template.replacen("%s", path, 1).replacen("%s", name, 1))
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map(|((i, c), _)| i + c.len_utf8())
        .unwrap_or(0);
    &a[..len]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Link,
}

/// One function or property row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    #[serde(flatten)]
    pub link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSummary>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

/// Members inherited from one supertype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InheritedGroup {
    pub from: Link,
    pub functions: Vec<MemberSummary>,
    pub properties: Vec<MemberSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Hierarchy {
    /// Superclass chain, nearest first.
    pub super_classes: Vec<Link>,
    pub interfaces: Vec<Link>,
    pub direct_sub_classes: Vec<Link>,
    pub indirect_sub_classes: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub name: String,
    pub url: String,
    pub interfaces: Vec<Link>,
    pub classes: Vec<Link>,
    pub enums: Vec<Link>,
    pub exceptions: Vec<Link>,
    pub annotations: Vec<Link>,
    pub objects: Vec<Link>,
    pub type_aliases: Vec<Link>,
    pub functions: Vec<MemberSummary>,
    pub properties: Vec<MemberSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClasslikeDetail {
    pub name: String,
    pub qualified_name: String,
    pub kind: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
    pub hierarchy: Hierarchy,
    pub nested: Vec<Link>,
    pub enum_entries: Vec<Link>,
    pub constructors: Vec<MemberSummary>,
    pub functions: Vec<MemberSummary>,
    pub properties: Vec<MemberSummary>,
    pub companion_functions: Vec<MemberSummary>,
    pub companion_properties: Vec<MemberSummary>,
    pub inherited: Vec<InheritedGroup>,
    pub extension_functions: Vec<MemberSummary>,
    pub extension_properties: Vec<MemberSummary>,
}

/// Builds page data for one view.
pub struct Summarizer<'a> {
    holder: &'a DocumentablesHolder,
    paths: &'a PathProvider,
    options: &'a SummaryOptions,
}

impl<'a> Summarizer<'a> {
    pub fn new(
        holder: &'a DocumentablesHolder,
        paths: &'a PathProvider,
        options: &'a SummaryOptions,
    ) -> Self {
        Self {
            holder,
            paths,
            options,
        }
    }

    fn language(&self) -> Language {
        self.holder.language()
    }

    fn links(&self, classlikes: &[Arc<Classlike>]) -> Vec<Link> {
        classlikes
            .iter()
            .map(|c| Link {
                name: c.header.name.clone(),
                url: self.paths.for_reference(&c.header.sid).url,
            })
            .collect()
    }

    fn bound(&self, bound: Option<&Bound>) -> Result<Option<Link>> {
        bound.map(|b| self.paths.link_for_bound(b)).transpose()
    }

    fn function(&self, function: &Function, sid: &Sid, source_template: Option<&str>) -> Result<MemberSummary> {
        let parameters = function
            .parameters
            .iter()
            .map(|p| {
                Ok(ParameterSummary {
                    name: p.name.clone(),
                    type_: self.paths.link_for_bound(&p.type_)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MemberSummary {
            link: self.paths.link_for_reference(sid, Some(&function.header.name), ""),
            receiver: self.bound(function.receiver.as_ref())?,
            parameters,
            type_: self.bound(function.return_type.as_ref())?,
            source_link: source_link(source_template, &function.header, &function.header.name),
        })
    }

    fn property(&self, property: &Property, sid: &Sid, source_template: Option<&str>) -> Result<MemberSummary> {
        Ok(MemberSummary {
            link: self.paths.link_for_reference(sid, Some(&property.header.name), ""),
            receiver: self.bound(property.receiver.as_ref())?,
            parameters: Vec::new(),
            type_: self.bound(property.type_.as_ref())?,
            source_link: source_link(source_template, &property.header, &property.header.name),
        })
    }

    fn functions<'f, I>(&self, functions: I, source_template: Option<&str>) -> Result<Vec<MemberSummary>>
    where
        I: IntoIterator<Item = &'f Arc<Function>>,
    {
        let mut sorted: Vec<&Arc<Function>> = functions.into_iter().collect();
        sorted.sort_by(|a, b| compare_function_signatures(a, b));
        sorted
            .into_iter()
            .map(|f| self.function(f, &f.header.sid, source_template))
            .collect()
    }

    fn properties<'p, I>(&self, properties: I, source_template: Option<&str>) -> Result<Vec<MemberSummary>>
    where
        I: IntoIterator<Item = &'p Arc<Property>>,
    {
        let mut sorted: Vec<&Arc<Property>> = properties.into_iter().collect();
        sorted.sort_by(|a, b| a.header.name.cmp(&b.header.name));
        sorted
            .into_iter()
            .map(|p| self.property(p, &p.header.sid, source_template))
            .collect()
    }

    /// Functions and properties as this view sees them: Java sees
    /// accessors instead of properties, except for fields.
    fn view_members(&self, classlike: &Classlike) -> (Vec<Arc<Function>>, Vec<Arc<Property>>) {
        match self.language() {
            Language::Kotlin => (classlike.functions.clone(), classlike.properties.clone()),
            Language::Java => {
                let mut functions = classlike.functions.clone();
                functions.extend(getters_and_setters(&classlike.properties));
                let fields = classlike
                    .properties
                    .iter()
                    .filter(|p| is_java_field(p))
                    .cloned()
                    .collect();
                (functions, fields)
            }
        }
    }

    pub async fn package_summary(&self, package: &Package) -> Result<PackageSummary> {
        let holder = self.holder;
        let classes: Vec<_> = holder
            .classlikes_to_display(package)
            .await?
            .iter()
            .filter(|c| matches!(c.kind, ClasslikeKind::Class) && !is_exception_class(c))
            .cloned()
            .collect();
        let objects: Vec<_> = holder
            .interesting_objects_of(package)
            .await?
            .into_iter()
            .filter(|o| !is_exception_class(o))
            .collect();
        let (classes, objects, functions, properties) = match self.language() {
            Language::Kotlin => (
                self.links(&classes),
                self.links(&objects),
                self.functions(&package.functions, self.options.base_function_source_link.as_deref())?,
                self.properties(&package.properties, self.options.base_property_source_link.as_deref())?,
            ),
            // Objects read as classes and top-level members live in
            // synthetic classes.
            Language::Java => {
                let mut merged = self.links(&classes);
                merged.extend(self.links(&objects));
                merged.sort_by(|a, b| a.name.cmp(&b.name));
                (merged, Vec::new(), Vec::new(), Vec::new())
            }
        };
        Ok(PackageSummary {
            name: package.package_name().to_string(),
            url: self.paths.for_reference(&package.header.sid).url,
            interfaces: self.links(&holder.interfaces_of(package).await?),
            classes,
            enums: self.links(&holder.enums_of(package).await?),
            exceptions: self.links(&holder.exceptions_of(package).await?),
            annotations: self.links(&holder.annotations_of(package).await?),
            objects,
            type_aliases: type_alias_links(self.paths, &holder.type_aliases_of(package).await?),
            functions,
            properties,
        })
    }

    pub async fn classlike_detail(&self, classlike: &Classlike) -> Result<ClasslikeDetail> {
        let holder = self.holder;
        let sid = &classlike.header.sid;
        let graph = holder.class_graph().await?;
        let node = graph.get(sid);

        let hierarchy = match node {
            Some(node) => Hierarchy {
                super_classes: self.links(&node.super_classes),
                interfaces: self.links(&node.interfaces),
                direct_sub_classes: self.links(&node.direct_sub_classes),
                indirect_sub_classes: self.links(&node.indirect_sub_classes),
            },
            None => Hierarchy::default(),
        };
        let supertypes: HashSet<Sid> = node
            .map(|n| {
                n.super_classes
                    .iter()
                    .chain(n.interfaces.iter())
                    .map(|c| c.header.sid.clone())
                    .collect()
            })
            .unwrap_or_default();

        let (functions, properties) = self.view_members(classlike);
        let mut declared_functions = Vec::new();
        let mut declared_properties = Vec::new();
        let mut inherited: BTreeMap<String, (Sid, Vec<Arc<Function>>, Vec<Arc<Property>>)> =
            BTreeMap::new();
        for function in &functions {
            match self.placement(classlike, &function.header, function.inherited_from.as_ref(), &supertypes) {
                Placement::Declared => declared_functions.push(function),
                Placement::Inherited(origin) => inherited
                    .entry(group_key(&origin))
                    .or_insert_with(|| (origin, Vec::new(), Vec::new()))
                    .1
                    .push(Arc::clone(function)),
                Placement::Omitted => {}
            }
        }
        for property in &properties {
            match self.placement(classlike, &property.header, property.inherited_from.as_ref(), &supertypes) {
                Placement::Declared => declared_properties.push(property),
                Placement::Inherited(origin) => inherited
                    .entry(group_key(&origin))
                    .or_insert_with(|| (origin, Vec::new(), Vec::new()))
                    .2
                    .push(Arc::clone(property)),
                Placement::Omitted => {}
            }
        }

        let member_function_link = classlike
            .synthetic
            .then_some(self.options.base_function_source_link.as_deref())
            .flatten();
        let member_property_link = classlike
            .synthetic
            .then_some(self.options.base_property_source_link.as_deref())
            .flatten();
        let mut declared_function_rows = Vec::new();
        let mut sorted_functions = declared_functions;
        sorted_functions.sort_by(|a, b| compare_function_signatures(a, b));
        for function in sorted_functions {
            let relocated = relocate(&function.header.sid, sid);
            declared_function_rows.push(self.function(function, &relocated, member_function_link)?);
        }
        let mut declared_property_rows = Vec::new();
        let mut sorted_properties = declared_properties;
        sorted_properties.sort_by(|a, b| a.header.name.cmp(&b.header.name));
        for property in sorted_properties {
            let relocated = relocate(&property.header.sid, sid);
            declared_property_rows.push(self.property(property, &relocated, member_property_link)?);
        }

        let mut inherited_groups = Vec::new();
        for (origin, functions, properties) in inherited.into_values() {
            inherited_groups.push(InheritedGroup {
                from: self.paths.link_for_reference(&origin, Some(&origin.full_name()), ""),
                functions: self.functions(&functions, None)?,
                properties: self.properties(&properties, None)?,
            });
        }

        let (companion_functions, companion_properties) = match classlike.companion() {
            Some(companion) => {
                let language = self.language();
                (
                    self.functions(
                        companion.functions.iter().filter(|f| function_hoisted(f, language)),
                        self.options.base_function_source_link.as_deref(),
                    )?,
                    self.properties(
                        companion.properties.iter().filter(|p| property_hoisted(p, language)),
                        self.options.base_property_source_link.as_deref(),
                    )?,
                )
            }
            None => (Vec::new(), Vec::new()),
        };

        let qualified_name = sid.full_name();
        Ok(ClasslikeDetail {
            name: classlike.header.name.clone(),
            qualified_name: qualified_name.clone(),
            kind: classlike.kind.as_str(),
            path: self
                .paths
                .for_type(&sid.package_name, classlike.class_path()),
            source_link: source_link(
                self.options.base_source_link.as_deref(),
                &classlike.header,
                &qualified_name,
            ),
            hierarchy,
            nested: self.links(&holder.nested_classlikes_of(classlike).await?),
            enum_entries: classlike
                .entries()
                .iter()
                .map(|entry| self.paths.link_for_reference(&entry.header.sid, Some(&entry.header.name), ""))
                .collect(),
            constructors: self.functions(&classlike.constructors, None)?,
            functions: declared_function_rows,
            properties: declared_property_rows,
            companion_functions,
            companion_properties,
            inherited: inherited_groups,
            extension_functions: self.functions(&holder.extension_functions_of(classlike).await?, None)?,
            extension_properties: self.properties(&holder.extension_properties_of(classlike).await?, None)?,
        })
    }

    /// Where a member shows up on `classlike`'s page.
    ///
    /// Members of synthetic classes are always declared. Members from the
    /// root class are never shown. Members from a hidden parent are shown
    /// as declared only when configured.
    fn placement(
        &self,
        classlike: &Classlike,
        header: &Header,
        inherited_from: Option<&Sid>,
        supertypes: &HashSet<Sid>,
    ) -> Placement {
        if classlike.synthetic {
            return Placement::Declared;
        }
        let origin = inherited_from
            .cloned()
            .unwrap_or_else(|| class_of(&header.sid));
        if Language::ALL.iter().any(|l| any_sid(*l) == origin) {
            return Placement::Omitted;
        }
        if supertypes.contains(&origin) {
            return Placement::Inherited(origin);
        }
        if origin != classlike.header.sid
            && !self.options.include_hidden_parent_symbols
            && self.holder.visibility().has_been_hidden(&origin)
        {
            return Placement::Omitted;
        }
        Placement::Declared
    }
}

enum Placement {
    Declared,
    Inherited(Sid),
    Omitted,
}

fn class_of(sid: &Sid) -> Sid {
    match &sid.class_names {
        Some(class_names) => Sid::class(sid.package_name.clone(), class_names.clone()),
        None => Sid::package(sid.package_name.clone()),
    }
}

/// Identifier of a member as shown on `owner`'s page.
fn relocate(member: &Sid, owner: &Sid) -> Sid {
    if member.package_name == owner.package_name && member.class_names == owner.class_names {
        return member.clone();
    }
    Sid {
        package_name: owner.package_name.clone(),
        class_names: owner.class_names.clone(),
        ..member.clone()
    }
}

fn group_key(origin: &Sid) -> String {
    format!(
        "{} {}",
        origin.class_names.as_deref().unwrap_or_default(),
        origin.full_name()
    )
}

/// Fields visible from Java: `@JvmField`, `const`, or no accessors.
fn is_java_field(property: &Property) -> bool {
    property.header.has_annotation(JVM_FIELD)
        || property.header.has_modifier(Modifier::Const)
        || (property.getter.is_none() && property.setter.is_none())
}

fn type_alias_links(paths: &PathProvider, aliases: &[Arc<TypeAlias>]) -> Vec<Link> {
    aliases
        .iter()
        .map(|alias| paths.link_for_reference(&alias.header.sid, Some(&alias.header.name), ""))
        .collect()
}

/// Class index: every displayed class-like by upper-cased first letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassIndex {
    pub packages_url: String,
    pub letters: BTreeMap<String, Vec<Link>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageIndex {
    pub classes_url: String,
    pub packages: Vec<Link>,
}

pub async fn class_index(holder: &DocumentablesHolder, paths: &PathProvider) -> Result<ClassIndex> {
    let mut all = holder.all_classlikes_to_display().await?;
    all.sort_by(|a, b| a.header.name.cmp(&b.header.name));
    let mut letters: BTreeMap<String, Vec<Link>> = BTreeMap::new();
    for classlike in all {
        let letter = classlike
            .header
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default();
        letters.entry(letter).or_default().push(Link {
            name: classlike.header.name.clone(),
            url: paths.for_reference(&classlike.header.sid).url,
        });
    }
    Ok(ClassIndex {
        packages_url: paths.packages(),
        letters,
    })
}

/// Package index. The synthetic `[root]` package is skipped; its
/// self-links are broken.
pub async fn package_index(holder: &DocumentablesHolder, paths: &PathProvider) -> Result<PackageIndex> {
    let packages = holder
        .packages()
        .await?
        .iter()
        .filter(|p| p.header.name != "[root]")
        .map(|p| Link {
            name: p.package_name().to_string(),
            url: paths.for_reference(&p.header.sid).url,
        })
        .collect();
    Ok(PackageIndex {
        classes_url: paths.classes(),
        packages,
    })
}
