//! Cross-reference resolution.
//!
//! [`PathProvider`] turns symbol identifiers into site URLs for one view.
//! Resolution order: unlinked compiler internals, then external doc sets,
//! then pages of this site. Enum entries and hoisted companion members
//! link into their owner's page.

use serde::Serialize;
use std::sync::Arc;

use super::constants::*;
use crate::config::DevsiteConfig;
use crate::error::{RenderError, Result};
use crate::external::MemoizedLocationProvider;
use crate::graph::DocumentablesGraph;
use crate::model::accessors::is_hoisted_from_companion;
use crate::model::{Bound, Documentable, Language, Sid};

/// Display text plus target URL. An empty URL renders as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn unlinked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }

    pub fn is_linked(&self) -> bool {
        !self.url.is_empty()
    }
}

/// The root class of a view's type system.
pub fn any_sid(language: Language) -> Sid {
    match language {
        Language::Java => Sid::class("java.lang", "Object"),
        Language::Kotlin => Sid::class("kotlin", "Any"),
    }
}

/// Join path components with `/`, collapsing empty segments. A leading
/// `/` on the first component is kept.
pub fn join_paths(first: &str, rest: &[&str]) -> String {
    let absolute = first.starts_with('/');
    let segments: Vec<&str> = std::iter::once(first)
        .chain(rest.iter().copied())
        .flat_map(|component| component.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();
    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Drop the innermost class: `A.B.C` becomes `A.B`; a single name is
/// kept as is.
fn outer_class_name(class_names: &str) -> &str {
    class_names
        .rsplit_once('.')
        .map(|(outer, _)| outer)
        .unwrap_or(class_names)
}

/// Site paths and reference links for one view.
pub struct PathProvider {
    language: Language,
    root_path: String,
    project_path: String,
    included_head_tags_path: Option<String>,
    documentables: Arc<DocumentablesGraph>,
    locations: Option<Arc<MemoizedLocationProvider>>,
}

impl PathProvider {
    /// `language_path` is the view's docs path below the doc root, e.g.
    /// `kotlin`.
    pub fn new(
        language: Language,
        config: &DevsiteConfig,
        language_path: &str,
        documentables: Arc<DocumentablesGraph>,
    ) -> Self {
        Self {
            language,
            root_path: join_paths("/", &[&config.doc_root_path, language_path]),
            project_path: config.project_path.clone(),
            included_head_tags_path: config.included_head_tags_path(language).map(String::from),
            documentables,
            locations: None,
        }
    }

    /// Consult external doc sets before computing local paths.
    pub fn location_provider(mut self, locations: Arc<MemoizedLocationProvider>) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn included_head_tags_path(&self) -> Option<&str> {
        self.included_head_tags_path.as_deref()
    }

    fn project_file(&self, file: &str) -> String {
        join_paths(&self.root_path, &[&self.project_path, file])
    }

    pub fn package_list(&self) -> String {
        self.project_file(MACHINE_PACKAGE_LIST_FILE)
    }

    pub fn packages(&self) -> String {
        self.project_file(PACKAGE_INDEX_FILE)
    }

    pub fn classes(&self) -> String {
        self.project_file(CLASS_INDEX_FILE)
    }

    pub fn root_index(&self) -> String {
        self.project_file(DIR_INDEX_FILE)
    }

    pub fn toc(&self) -> String {
        self.project_file(TOC_FILE)
    }

    pub fn book(&self) -> String {
        self.project_file(BOOK_FILE)
    }

    /// Page of a class-like, or of a package when `name` is
    /// [`PACKAGE_SUMMARY_NAME`].
    pub fn for_type(&self, package_name: &str, name: &str) -> String {
        let package_as_path = package_name.replace('.', "/");
        join_paths(
            &self.root_path,
            &[&package_as_path, &format!("{}.html", name)],
        )
    }

    pub fn package_summary(&self, package_name: &str) -> String {
        self.for_type(package_name, PACKAGE_SUMMARY_NAME)
    }

    /// Link to `sid` displayed as `name` (or the resolved name) followed
    /// by `suffix`.
    pub fn link_for_reference(&self, sid: &Sid, name: Option<&str>, suffix: &str) -> Link {
        let reference = self.for_reference(sid);
        Link {
            name: format!("{}{}", name.unwrap_or(&reference.name), suffix),
            url: reference.url,
        }
    }

    /// Resolve `sid` to its display name and URL.
    pub fn for_reference(&self, sid: &Sid) -> Link {
        let documentable = self.documentables.get(sid);
        let package_name = if sid.package_name.trim().is_empty() {
            ROOT_PACKAGE_DISPLAY_NAME
        } else {
            sid.package_name.as_str()
        };
        let class_names = sid.class_names.as_deref();
        let symbol = sid.callable.as_ref();

        let full_name = match class_names {
            Some(class_names) => format!("{}.{}", package_name, class_names),
            None => package_name.to_string(),
        };
        if NON_DOCUMENTABLE_PREFIXES
            .iter()
            .any(|prefix| full_name.starts_with(prefix))
        {
            return Link::unlinked(class_names.unwrap_or(package_name));
        }

        if let Some(url) = self.locations.as_ref().and_then(|l| l.resolve(sid)) {
            let text = symbol
                .map(|s| s.name.as_str())
                .or(class_names)
                .unwrap_or(package_name);
            return Link {
                name: text.to_string(),
                url,
            };
        }

        let (type_name, type_url) = match class_names {
            None => (package_name, self.package_summary(package_name)),
            Some(class_names) => (class_names, self.for_type(package_name, class_names)),
        };

        if let (Some(Documentable::EnumEntry(entry)), Some(class_names)) = (documentable, class_names)
        {
            let owner_url = self.for_type(package_name, outer_class_name(class_names));
            return Link {
                name: type_name.to_string(),
                url: format!("{}#{}", owner_url, entry.header.name),
            };
        }

        if let (Some(symbol), Some(class_names), Some(documentable)) =
            (symbol, class_names, documentable)
        {
            let hoisted = sid
                .parent()
                .is_some_and(|parent| self.is_companion(&parent))
                && is_hoisted_from_companion(documentable, self.language);
            if hoisted {
                let owner_url = self.for_type(package_name, outer_class_name(class_names));
                return Link {
                    name: symbol.name.clone(),
                    url: format!("{}#{}", owner_url, symbol.anchor()),
                };
            }
        }

        match symbol {
            None => Link {
                name: type_name.to_string(),
                url: type_url,
            },
            Some(symbol) => Link {
                name: symbol.name.clone(),
                url: format!("{}#{}", type_url, symbol.anchor()),
            },
        }
    }

    /// Whether `sid` is the companion object of the class-like enclosing it.
    pub fn is_companion(&self, sid: &Sid) -> bool {
        let Some(parent) = sid.parent() else {
            return false;
        };
        match self.documentables.get(&parent) {
            Some(Documentable::Classlike(owner)) => owner
                .companion()
                .is_some_and(|companion| &companion.header.sid == sid),
            _ => false,
        }
    }

    /// Link for a type reference.
    ///
    /// Nullable types carry a `?` in the Kotlin view. Type parameters and
    /// primitives are plain text. Unresolved or dynamic types cannot be
    /// linked and fail the pass.
    pub fn link_for_bound(&self, bound: &Bound) -> Result<Link> {
        self.link_for_bound_with_suffix(bound, "")
    }

    fn link_for_bound_with_suffix(&self, bound: &Bound, suffix: &str) -> Result<Link> {
        match bound {
            Bound::GenericTypeConstructor { sid, .. } | Bound::FunctionalTypeConstructor { sid, .. } => {
                Ok(self.link_for_reference(sid, None, suffix))
            }
            Bound::Nullable { inner } => {
                let suffix = match self.language {
                    Language::Kotlin => format!("?{}", suffix),
                    Language::Java => suffix.to_string(),
                };
                self.link_for_bound_with_suffix(inner, &suffix)
            }
            Bound::DefinitelyNonNullable { inner } => self.link_for_bound_with_suffix(inner, suffix),
            Bound::TypeAliased { alias, .. } => self.link_for_bound_with_suffix(alias, suffix),
            Bound::JavaObject => Ok(self.link_for_reference(&any_sid(self.language), None, suffix)),
            Bound::TypeParameter { name, .. } | Bound::PrimitiveJavaType { name } => {
                Ok(Link::unlinked(format!("{}{}", name, suffix)))
            }
            Bound::Void => Ok(Link::unlinked(match self.language {
                Language::Java => "void",
                Language::Kotlin => "Unit",
            })),
            Bound::UnresolvedBound { .. } | Bound::Dynamic => Err(RenderError::UnresolvableType {
                bound: bound.display_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{ExternalLocationProvider, PackageListLocationProvider, ExternalDocSet};
    use crate::filter::VisibilityContext;
    use crate::graph::{compute_class_graph, compute_documentables_graph};
    use crate::model::types::JVM_STATIC;
    use crate::model::{Annotation, Callable, Classlike, EnumEntry, Function, WithHeader};

    fn config() -> DevsiteConfig {
        DevsiteConfig {
            project_path: "androidx".to_string(),
            ..DevsiteConfig::default()
        }
    }

    fn graph(classlikes: Vec<Classlike>) -> Arc<DocumentablesGraph> {
        let classlikes: Vec<_> = classlikes.into_iter().map(Arc::new).collect();
        let class_graph = compute_class_graph(&classlikes, &VisibilityContext::empty(), None);
        Arc::new(compute_documentables_graph(&class_graph))
    }

    fn provider(language: Language, classlikes: Vec<Classlike>) -> PathProvider {
        PathProvider::new(language, &config(), language.as_str(), graph(classlikes))
    }

    fn foo_with_companion() -> Classlike {
        let foo = Sid::class("a", "Foo");
        let companion = foo.nested("Companion");
        Classlike::class(foo).with_companion(
            Classlike::object(companion.clone())
                .with_function(Function::new(companion.member(Callable::new("create"))))
                .with_function(
                    Function::new(companion.member(Callable::new("of").with_params(["kotlin.Int"])))
                        .with_annotation(Annotation::named(JVM_STATIC)),
                ),
        )
    }

    #[test]
    fn test_site_file_paths() {
        let paths = provider(Language::Kotlin, Vec::new());
        assert_eq!(paths.root_path(), "/reference/kotlin");
        assert_eq!(paths.package_list(), "/reference/kotlin/androidx/package-list");
        assert_eq!(paths.toc(), "/reference/kotlin/androidx/_toc.yaml");
        assert_eq!(paths.book(), "/reference/kotlin/androidx/_book.yaml");
        assert_eq!(paths.classes(), "/reference/kotlin/androidx/classes.html");
        assert_eq!(paths.root_index(), "/reference/kotlin/androidx/index.html");
        assert_eq!(
            paths.included_head_tags_path(),
            Some("_shared/_reference-head-tags.html")
        );
    }

    #[test]
    fn test_join_paths_normalizes_separators() {
        assert_eq!(join_paths("/", &["reference/", "/java"]), "/reference/java");
        assert_eq!(join_paths("a", &["", "b//c"]), "a/b/c");
    }

    #[test]
    fn test_class_and_member_references() {
        let paths = provider(Language::Java, vec![Classlike::class(Sid::class("a.b", "Foo"))]);
        assert_eq!(
            paths.for_reference(&Sid::class("a.b", "Foo")),
            Link {
                name: "Foo".to_string(),
                url: "/reference/java/a/b/Foo.html".to_string()
            }
        );
        let member = Sid::class("a.b", "Foo").member(Callable::new("send").with_params(["java.lang.String"]));
        assert_eq!(
            paths.for_reference(&member).url,
            "/reference/java/a/b/Foo.html#send(java.lang.String)"
        );
        let package = paths.for_reference(&Sid::package("a.b"));
        assert_eq!(package.name, "a.b");
        assert_eq!(package.url, "/reference/java/a/b/package-summary.html");
    }

    #[test]
    fn test_reference_matches_page_path() {
        let nested = Sid::class("a", "Outer.Inner");
        let paths = provider(
            Language::Kotlin,
            vec![Classlike::class(Sid::class("a", "Outer")).with_nested(Classlike::class(nested.clone()))],
        );
        let page = paths.for_type(&nested.package_name, nested.class_names.as_deref().unwrap_or_default());
        assert_eq!(paths.for_reference(&nested).url, page);
        assert_eq!(page, "/reference/kotlin/a/Outer.Inner.html");
    }

    #[test]
    fn test_enum_entry_links_into_owner() {
        let color = Sid::class("a", "Color");
        let paths = provider(
            Language::Kotlin,
            vec![Classlike::enum_class(
                color.clone(),
                vec![EnumEntry::new(color.nested("RED"))],
            )],
        );
        let link = paths.for_reference(&color.nested("RED"));
        assert_eq!(link.url, "/reference/kotlin/a/Color.html#RED");
        assert_eq!(link.name, "Color.RED");
    }

    #[test]
    fn test_hoisted_companion_members_link_to_owner() {
        let companion = Sid::class("a", "Foo").nested("Companion");
        let create = companion.member(Callable::new("create"));
        let of = companion.member(Callable::new("of").with_params(["kotlin.Int"]));

        let kotlin = provider(Language::Kotlin, vec![foo_with_companion()]);
        assert!(kotlin.is_companion(&companion));
        assert_eq!(kotlin.for_reference(&create).url, "/reference/kotlin/a/Foo.html#create()");

        let java = provider(Language::Java, vec![foo_with_companion()]);
        assert_eq!(
            java.for_reference(&create).url,
            "/reference/java/a/Foo.Companion.html#create()"
        );
        assert_eq!(java.for_reference(&of).url, "/reference/java/a/Foo.html#of(kotlin.Int)");
    }

    #[test]
    fn test_compiler_internals_are_unlinked() {
        let paths = provider(Language::Kotlin, Vec::new());
        let link = paths.for_reference(&Sid::class("kotlin.jvm.functions", "Function1"));
        assert_eq!(link, Link::unlinked("Function1"));
        assert!(!link.is_linked());
    }

    #[test]
    fn test_root_package_display_name() {
        let paths = provider(Language::Java, Vec::new());
        assert_eq!(paths.for_reference(&Sid::package("")).name, "[JVM root]");
    }

    #[test]
    fn test_external_locations_win() {
        let external = PackageListLocationProvider::new(vec![ExternalDocSet::parse(
            "https://developer.android.com/reference",
            "android.os\n",
        )]);
        let inner: Arc<dyn ExternalLocationProvider> = Arc::new(external);
        let paths = provider(Language::Java, Vec::new())
            .location_provider(Arc::new(MemoizedLocationProvider::new(inner)));
        let bundle = Sid::class("android.os", "Bundle");
        let link = paths.for_reference(&bundle);
        assert_eq!(link.name, "Bundle");
        assert_eq!(link.url, "https://developer.android.com/reference/android/os/Bundle.html");
        assert_eq!(
            paths.for_reference(&Sid::class("a", "Local")).url,
            "/reference/java/a/Local.html"
        );
    }

    #[test]
    fn test_type_links() {
        let string = Bound::class(Sid::class("kotlin", "String"));
        let kotlin = provider(Language::Kotlin, Vec::new());
        let java = provider(Language::Java, Vec::new());

        let nullable = Bound::nullable(string.clone());
        assert_eq!(kotlin.link_for_bound(&nullable).unwrap().name, "String?");
        assert_eq!(java.link_for_bound(&nullable).unwrap().name, "String");
        assert_eq!(
            java.link_for_bound(&Bound::JavaObject).unwrap().url,
            "/reference/java/java/lang/Object.html"
        );
        assert_eq!(
            kotlin
                .link_for_bound(&Bound::PrimitiveJavaType {
                    name: "int".to_string()
                })
                .unwrap(),
            Link::unlinked("int")
        );
        assert!(matches!(
            kotlin.link_for_bound(&Bound::Dynamic),
            Err(RenderError::UnresolvableType { .. })
        ));
    }

    #[test]
    fn test_any_per_language() {
        assert_eq!(any_sid(Language::Java).full_name(), "java.lang.Object");
        assert_eq!(any_sid(Language::Kotlin).full_name(), "kotlin.Any");
    }
}
