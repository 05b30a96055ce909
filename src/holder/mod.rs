//! Per-view resolution holder.
//!
//! A [`DocumentablesHolder`] is built once per render pass and display
//! language over the filtered, merged module. Construction starts every
//! derived computation as a task: one small dependency graph per package
//! (children, companions, synthetic classes, display lists) plus the
//! pass-wide extension maps, class graph and nested class-like wave.
//! Accessors await the task they read; each value is computed once.
//!
//! The [`VisibilityContext`] handed in must be frozen, which means the filter
//! phase is over before the first task starts.

mod companions;
mod deferred;
mod extensions;
mod synthetic;
mod warnings;

pub use companions::{boringness, compute_companions, Boringness, DEFAULT_COMPANION_NAME};
pub use deferred::Deferred;
pub use extensions::{
    compute_extension_function_map, compute_extension_property_map, ExtensionFunctionMap,
    ExtensionPropertyMap,
};
pub use synthetic::compute_synthetic_classes;
pub use warnings::{check_doc_tags, format_warning, TagProblem};

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::error::{RenderError, Result};
use crate::external::MemoizedClasslikeProvider;
use crate::filter::VisibilityContext;
use crate::graph::{compute_class_graph, compute_documentables_graph, ClassGraph, DocumentablesGraph};
use crate::model::accessors::is_exception_class;
use crate::model::{
    compare_documentables, Classlike, DocNode, Documentable, Function, Language, Module, Package,
    Property, Sid, TypeAlias,
};

type Classlikes = Vec<Arc<Classlike>>;
type Objects = HashMap<Sid, Arc<Classlike>>;

/// The derived collections of one package.
struct PackageTasks {
    children: Deferred<Vec<Documentable>>,
    companions: Deferred<Objects>,
    interestingness: Deferred<HashMap<Sid, Boringness>>,
    synthetic_classes: Deferred<Classlikes>,
    synthetic_names: Deferred<BTreeSet<String>>,
    all_classlikes: Deferred<Classlikes>,
    interesting_objects: Deferred<Objects>,
    companion_check: Deferred<()>,
    displayed: Deferred<Classlikes>,
    enums: Deferred<Classlikes>,
    interfaces: Deferred<Classlikes>,
    annotations: Deferred<Classlikes>,
    type_aliases: Deferred<Vec<Arc<TypeAlias>>>,
    exceptions: Deferred<Classlikes>,
}

impl PackageTasks {
    fn start(
        package: Arc<Package>,
        language: Language,
        visibility: &Arc<VisibilityContext>,
        extension_functions: &Deferred<ExtensionFunctionMap>,
        extension_properties: &Deferred<ExtensionPropertyMap>,
    ) -> Self {
        let children = {
            let package = Arc::clone(&package);
            deferred::spawn("children", async move {
                Ok(Documentable::Package(package).exploded_children())
            })
        };
        let companions = deferred::map("companions", &children, |children| {
            Ok(compute_companions(&classlikes_among(children)))
        });
        let interestingness = deferred::map3(
            "interestingness",
            &companions,
            extension_functions,
            extension_properties,
            |companions, functions, properties| {
                Ok(companions
                    .iter()
                    .map(|(sid, companion)| {
                        let has_extensions =
                            functions.contains_key(sid) || properties.contains_key(sid);
                        (sid.clone(), boringness(companion, has_extensions))
                    })
                    .collect::<HashMap<_, _>>())
            },
        );
        let synthetic_classes = if language == Language::Kotlin {
            deferred::resolved(Vec::new())
        } else {
            let package = Arc::clone(&package);
            deferred::spawn("synthetic classes", async move {
                Ok(compute_synthetic_classes(&package, language))
            })
        };
        let synthetic_names = deferred::map("synthetic names", &synthetic_classes, |classes| {
            Ok(classes.iter().map(|c| c.header.name.clone()).collect::<BTreeSet<_>>())
        });
        let all_classlikes = deferred::map2(
            "all classlikes",
            &children,
            &synthetic_classes,
            |children, synthetic| {
                let mut all = classlikes_among(children);
                all.extend(synthetic.iter().cloned());
                Ok(all)
            },
        );
        let interesting_objects = deferred::map3(
            "interesting objects",
            &children,
            &companions,
            &interestingness,
            move |children, companions, interestingness| {
                let mut objects: Objects = companions
                    .iter()
                    .filter(|(sid, _)| {
                        interestingness
                            .get(*sid)
                            .is_some_and(|b| b.interesting_in(language))
                    })
                    .map(|(sid, c)| (sid.clone(), Arc::clone(c)))
                    .collect();
                for object in classlikes_among(children).into_iter().filter(|c| c.is_object()) {
                    if !companions.contains_key(&object.header.sid) {
                        objects.insert(object.header.sid.clone(), object);
                    }
                }
                Ok(objects)
            },
        );
        let companion_check = deferred::map2(
            "companion names",
            &interesting_objects,
            &companions,
            |objects, companions| {
                let mut illegal: Vec<Sid> = objects
                    .values()
                    .filter(|o| o.header.name == DEFAULT_COMPANION_NAME)
                    .map(|o| o.header.sid.clone())
                    .filter(|sid| !companions.contains_key(sid))
                    .collect();
                if illegal.is_empty() {
                    return Ok(());
                }
                illegal.sort();
                Err(RenderError::IllegalCompanionName { sids: illegal })
            },
        );
        let displayed = {
            let visibility = Arc::clone(visibility);
            deferred::map2(
                "classlikes to display",
                &all_classlikes,
                &interesting_objects,
                move |all, objects| {
                    let mut shown: Classlikes = all
                        .iter()
                        .filter(|c| !should_not_be_displayed(c, objects))
                        .filter(|c| !visibility.is_hidden(&c.header.sid))
                        .cloned()
                        .collect();
                    sort_classlikes(&mut shown);
                    Ok(shown)
                },
            )
        };
        let enums = kind_filter("enums", &children, |c| c.is_enum());
        let interfaces = kind_filter("interfaces", &children, |c| c.is_interface());
        let annotations = kind_filter("annotations", &children, |c| c.is_annotation());
        let exceptions = kind_filter("exceptions", &children, |c| is_exception_class(c));
        let type_aliases = {
            let package = Arc::clone(&package);
            deferred::spawn("type aliases", async move {
                let mut aliases = package.type_aliases.clone();
                aliases.sort_by(|a, b| compare_documentables(&a.header, &b.header));
                Ok(aliases)
            })
        };

        Self {
            children,
            companions,
            interestingness,
            synthetic_classes,
            synthetic_names,
            all_classlikes,
            interesting_objects,
            companion_check,
            displayed,
            enums,
            interfaces,
            annotations,
            type_aliases,
            exceptions,
        }
    }

    async fn ready(&self) -> Result<()> {
        self.children.clone().await?;
        self.companions.clone().await?;
        self.interestingness.clone().await?;
        self.synthetic_classes.clone().await?;
        self.synthetic_names.clone().await?;
        self.all_classlikes.clone().await?;
        self.interesting_objects.clone().await?;
        self.companion_check.clone().await?;
        self.displayed.clone().await?;
        self.enums.clone().await?;
        self.interfaces.clone().await?;
        self.annotations.clone().await?;
        self.type_aliases.clone().await?;
        self.exceptions.clone().await?;
        Ok(())
    }
}

fn classlikes_among(documentables: &[Documentable]) -> Classlikes {
    documentables
        .iter()
        .filter_map(Documentable::as_classlike)
        .cloned()
        .collect()
}

fn sort_classlikes(classlikes: &mut Classlikes) {
    classlikes.sort_by(|a, b| compare_documentables(&a.header, &b.header));
}

fn kind_filter<F>(task: &str, children: &Deferred<Vec<Documentable>>, keep: F) -> Deferred<Classlikes>
where
    F: Fn(&Classlike) -> bool + Send + 'static,
{
    deferred::map(task, children, move |children| {
        let mut found: Classlikes = classlikes_among(children)
            .into_iter()
            .filter(|c| keep(c))
            .collect();
        sort_classlikes(&mut found);
        Ok(found)
    })
}

/// Objects are only shown when they are interesting in this view.
fn should_not_be_displayed(classlike: &Classlike, interesting_objects: &Objects) -> bool {
    classlike.is_object() && !interesting_objects.contains_key(&classlike.header.sid)
}

fn is_excluded(excluded: &[Regex], package_name: &str) -> bool {
    excluded.iter().any(|regex| regex.is_match(package_name))
}

/// Configures and starts a [`DocumentablesHolder`].
pub struct HolderBuilder {
    language: Language,
    module: Arc<Module>,
    visibility: Arc<VisibilityContext>,
    excluded_packages: Vec<Regex>,
    external_classlikes: Option<Arc<MemoizedClasslikeProvider>>,
}

impl HolderBuilder {
    pub fn new(language: Language, module: Arc<Module>, visibility: Arc<VisibilityContext>) -> Self {
        Self {
            language,
            module,
            visibility,
            excluded_packages: Vec::new(),
            external_classlikes: None,
        }
    }

    /// Packages whose name fully matches one of these are left out of
    /// this view.
    pub fn excluded_packages(mut self, excluded: Vec<Regex>) -> Self {
        self.excluded_packages = excluded;
        self
    }

    /// Where to find supertypes the module does not contain.
    pub fn external_classlikes(mut self, provider: Arc<MemoizedClasslikeProvider>) -> Self {
        self.external_classlikes = Some(provider);
        self
    }

    /// Start every computation. Must be called within a Tokio runtime.
    pub fn build(self) -> DocumentablesHolder {
        DocumentablesHolder::start(self)
    }
}

/// Lazily resolved documentables of one view.
pub struct DocumentablesHolder {
    language: Language,
    visibility: Arc<VisibilityContext>,
    packages: Deferred<Vec<Arc<Package>>>,
    per_package: HashMap<String, PackageTasks>,
    extension_functions: Deferred<ExtensionFunctionMap>,
    extension_properties: Deferred<ExtensionPropertyMap>,
    all_companions: Deferred<HashSet<Sid>>,
    class_graph: Deferred<ClassGraph>,
    documentables_graph: Deferred<DocumentablesGraph>,
    nested_classlikes: Deferred<HashMap<Sid, Classlikes>>,
    doc_warnings: Deferred<usize>,
}

impl DocumentablesHolder {
    pub fn builder(
        language: Language,
        module: Arc<Module>,
        visibility: Arc<VisibilityContext>,
    ) -> HolderBuilder {
        HolderBuilder::new(language, module, visibility)
    }

    fn start(builder: HolderBuilder) -> Self {
        let HolderBuilder {
            language,
            module,
            visibility,
            excluded_packages,
            external_classlikes,
        } = builder;
        let excluded = Arc::new(excluded_packages);

        let packages = {
            let module = Arc::clone(&module);
            let excluded = Arc::clone(&excluded);
            deferred::spawn("packages", async move {
                let mut packages: Vec<Arc<Package>> = module
                    .packages
                    .iter()
                    .filter(|p| !is_excluded(&excluded, p.package_name()))
                    .cloned()
                    .collect();
                packages.sort_by(|a, b| compare_documentables(&a.header, &b.header));
                Ok(packages)
            })
        };
        let extension_functions = deferred::map("extension functions", &packages, move |packages| {
            compute_extension_function_map(packages, language)
        });
        let extension_properties =
            deferred::map("extension properties", &packages, move |packages| {
                Ok(compute_extension_property_map(packages, language))
            });

        let per_package: HashMap<String, PackageTasks> = module
            .packages
            .iter()
            .map(|package| {
                (
                    package.package_name().to_string(),
                    PackageTasks::start(
                        Arc::clone(package),
                        language,
                        &visibility,
                        &extension_functions,
                        &extension_properties,
                    ),
                )
            })
            .collect();

        let all_companions = {
            let companions: Vec<_> = per_package.values().map(|t| t.companions.clone()).collect();
            deferred::spawn("all companions", async move {
                let mut all = HashSet::new();
                for map in futures::future::try_join_all(companions).await? {
                    all.extend(map.keys().cloned());
                }
                Ok(all)
            })
        };

        let displayed_by_package: HashMap<String, Deferred<Classlikes>> = per_package
            .iter()
            .map(|(name, t)| (name.clone(), t.displayed.clone()))
            .collect();
        let class_graph = {
            let packages = packages.clone();
            let visibility = Arc::clone(&visibility);
            deferred::spawn("class graph", async move {
                let mut classlikes = Vec::new();
                for package in packages.await?.iter() {
                    if let Some(displayed) = displayed_by_package.get(package.package_name()) {
                        classlikes.extend(displayed.clone().await?.iter().cloned());
                    }
                }
                deferred::blocking("class graph", move || {
                    compute_class_graph(&classlikes, &visibility, external_classlikes.as_deref())
                })
                .await
            })
        };
        let documentables_graph =
            deferred::map("documentables graph", &class_graph, |graph| {
                Ok(compute_documentables_graph(graph))
            });

        let nested_classlikes = Self::start_nested_wave(
            &packages,
            &per_package,
            Arc::clone(&excluded),
            Arc::clone(&visibility),
        );
        let doc_warnings = {
            let packages = packages.clone();
            deferred::spawn("doc tag warnings", async move {
                let packages = packages.await?;
                Ok(report_doc_tag_problems(&packages))
            })
        };

        tracing::debug!(%language, packages = per_package.len(), "Started documentables holder");
        Self {
            language,
            visibility,
            packages,
            per_package,
            extension_functions,
            extension_properties,
            all_companions,
            class_graph,
            documentables_graph,
            nested_classlikes,
            doc_warnings,
        }
    }

    /// Nested class-likes of every class-like in scope. Runs as a second
    /// wave: it starts once the class-like lists of every package in scope
    /// are enumerated.
    fn start_nested_wave(
        packages: &Deferred<Vec<Arc<Package>>>,
        per_package: &HashMap<String, PackageTasks>,
        excluded: Arc<Vec<Regex>>,
        visibility: Arc<VisibilityContext>,
    ) -> Deferred<HashMap<Sid, Classlikes>> {
        let packages = packages.clone();
        let inputs: HashMap<String, (Deferred<Classlikes>, Deferred<Objects>)> = per_package
            .iter()
            .map(|(name, t)| {
                (
                    name.clone(),
                    (t.all_classlikes.clone(), t.interesting_objects.clone()),
                )
            })
            .collect();
        deferred::spawn("nested classlikes", async move {
            let packages = packages.await?;
            let mut wave = Vec::new();
            for package in packages.iter() {
                if let Some((all, objects)) = inputs.get(package.package_name()) {
                    wave.push((all.clone().await?, objects.clone()));
                }
            }
            let mut nested = HashMap::new();
            for (all, objects) in wave {
                let objects = objects.await?;
                for classlike in all.iter() {
                    let mut inner: Classlikes =
                        classlikes_among(&Documentable::Classlike(Arc::clone(classlike)).exploded_children())
                            .into_iter()
                            .filter(|c| !is_excluded(&excluded, &c.header.sid.package_name))
                            .filter(|c| !should_not_be_displayed(c, &objects))
                            .filter(|c| !visibility.is_hidden(&c.header.sid))
                            .collect();
                    sort_classlikes(&mut inner);
                    nested.insert(classlike.header.sid.clone(), inner);
                }
            }
            Ok(nested)
        })
    }

    fn tasks(&self, package_name: &str) -> Result<&PackageTasks> {
        self.per_package
            .get(package_name)
            .ok_or_else(|| RenderError::UnknownPackage(package_name.to_string()))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn visibility(&self) -> &Arc<VisibilityContext> {
        &self.visibility
    }

    /// Packages of this view, excluded ones removed, in name order.
    pub async fn packages(&self) -> Result<Arc<Vec<Arc<Package>>>> {
        self.packages.clone().await
    }

    /// Class-likes to document in `package`: hidden ones and objects not
    /// interesting in this view removed, synthetic classes added.
    pub async fn classlikes_to_display(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?.displayed.clone().await
    }

    /// Displayed class-likes of every package in scope.
    pub async fn all_classlikes_to_display(&self) -> Result<Classlikes> {
        let mut all = Vec::new();
        for package in self.packages().await?.iter() {
            all.extend(self.classlikes_to_display(package).await?.iter().cloned());
        }
        Ok(all)
    }

    /// Every class-like nested in `classlike`, at any depth, filtered the
    /// same way as the package lists.
    pub async fn nested_classlikes_of(&self, classlike: &Classlike) -> Result<Classlikes> {
        let nested = self.nested_classlikes.clone().await?;
        nested
            .get(&classlike.header.sid)
            .cloned()
            .ok_or_else(|| RenderError::UnknownClasslike(classlike.header.sid.clone()))
    }

    pub async fn enums_of(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?.enums.clone().await
    }

    pub async fn interfaces_of(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?.interfaces.clone().await
    }

    pub async fn annotations_of(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?.annotations.clone().await
    }

    pub async fn type_aliases_of(&self, package: &Package) -> Result<Arc<Vec<Arc<TypeAlias>>>> {
        self.tasks(package.package_name())?.type_aliases.clone().await
    }

    pub async fn exceptions_of(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?.exceptions.clone().await
    }

    pub async fn synthetic_classes_of(&self, package: &Package) -> Result<Arc<Classlikes>> {
        self.tasks(package.package_name())?
            .synthetic_classes
            .clone()
            .await
    }

    /// Objects shown in this view: interesting companions plus every other
    /// object, sorted.
    pub async fn interesting_objects_of(&self, package: &Package) -> Result<Classlikes> {
        let objects = self
            .tasks(package.package_name())?
            .interesting_objects
            .clone()
            .await?;
        let mut sorted: Classlikes = objects.values().cloned().collect();
        sort_classlikes(&mut sorted);
        Ok(sorted)
    }

    pub async fn extension_functions_of(&self, classlike: &Classlike) -> Result<Vec<Arc<Function>>> {
        let map = self.extension_functions.clone().await?;
        Ok(map.get(&classlike.header.sid).cloned().unwrap_or_default())
    }

    pub async fn extension_properties_of(&self, classlike: &Classlike) -> Result<Vec<Arc<Property>>> {
        let map = self.extension_properties.clone().await?;
        Ok(map.get(&classlike.header.sid).cloned().unwrap_or_default())
    }

    /// Classification of a companion object. Anything that is not a
    /// companion is never boring.
    pub async fn interestingness(&self, object: &Classlike) -> Result<Boringness> {
        let Some(tasks) = self.per_package.get(&object.header.sid.package_name) else {
            return Ok(Boringness::NeverBoring);
        };
        let map = tasks.interestingness.clone().await?;
        Ok(map
            .get(&object.header.sid)
            .copied()
            .unwrap_or(Boringness::NeverBoring))
    }

    pub async fn is_companion(&self, object: &Classlike) -> Result<bool> {
        Ok(self.all_companions.clone().await?.contains(&object.header.sid))
    }

    /// Whether `sid` is a synthetic class or lives in one.
    pub async fn is_from_synthetic_class(&self, sid: &Sid) -> Result<bool> {
        let Some(tasks) = self.per_package.get(&sid.package_name) else {
            return Ok(false);
        };
        let names = tasks.synthetic_names.clone().await?;
        Ok(sid
            .class_names
            .as_ref()
            .is_some_and(|class| names.contains(class)))
    }

    pub async fn class_graph(&self) -> Result<Arc<ClassGraph>> {
        self.class_graph.clone().await
    }

    pub async fn documentables_graph(&self) -> Result<Arc<DocumentablesGraph>> {
        self.documentables_graph.clone().await
    }

    /// Wait for every computation; the first failure fails the pass.
    pub async fn ready(&self) -> Result<()> {
        self.packages.clone().await?;
        self.extension_functions.clone().await?;
        self.extension_properties.clone().await?;
        for tasks in self.per_package.values() {
            tasks.ready().await?;
        }
        self.all_companions.clone().await?;
        self.class_graph.clone().await?;
        self.documentables_graph.clone().await?;
        self.nested_classlikes.clone().await?;
        let warnings = self.doc_warnings.clone().await?;
        tracing::info!(
            language = %self.language,
            packages = self.per_package.len(),
            doc_warnings = *warnings,
            "Documentables resolved"
        );
        Ok(())
    }

    /// Log an author-facing warning about `documentable`.
    ///
    /// The location comes from `containing` when given, so warnings about
    /// generated members point at their declaring class.
    pub fn print_warning_for(
        &self,
        base_message: &str,
        documentable: &Documentable,
        containing: Option<&Documentable>,
        tag: Option<&DocNode>,
        additional_context: &str,
    ) {
        let line = format_warning(base_message, documentable, containing, tag, additional_context);
        tracing::warn!(language = %self.language, "{}", line);
    }
}

fn report_doc_tag_problems(packages: &[Arc<Package>]) -> usize {
    let mut count = 0;
    for package in packages {
        let root = Documentable::Package(Arc::clone(package));
        for documentable in std::iter::once(root.clone()).chain(root.exploded_children()) {
            for problem in check_doc_tags(&documentable) {
                let line = format_warning(problem.message, &documentable, None, Some(&problem.tag), "");
                tracing::warn!("{}", line);
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::JVM_STATIC;
    use crate::model::{Annotation, Bound, Callable, SupertypeKind, WithHeader};

    fn names(list: &[Arc<Classlike>]) -> Vec<String> {
        list.iter().map(|c| c.header.name.clone()).collect()
    }

    fn holder(language: Language, module: Module) -> DocumentablesHolder {
        DocumentablesHolder::builder(language, Arc::new(module), VisibilityContext::empty()).build()
    }

    fn companion_module() -> Module {
        let foo = Sid::class("a", "Foo");
        let bar = Sid::class("a", "Bar");
        Module::new("m").with_package(
            Package::new("a")
                .with_classlike(
                    Classlike::class(foo.clone())
                        .with_companion(Classlike::object(foo.nested("Companion"))),
                )
                .with_classlike(
                    Classlike::class(bar.clone()).with_companion(
                        Classlike::object(bar.nested("Companion")).with_function(Function::new(
                            bar.nested("Companion").member(Callable::new("create")),
                        )),
                    ),
                )
                .with_classlike(Classlike::object(Sid::class("a", "Registry"))),
        )
    }

    #[tokio::test]
    async fn test_boring_companions_are_not_displayed() {
        let package = companion_module().packages[0].clone();

        let kotlin = holder(Language::Kotlin, companion_module());
        kotlin.ready().await.unwrap();
        assert_eq!(
            names(&kotlin.classlikes_to_display(&package).await.unwrap()),
            vec!["Bar", "Foo", "Registry"]
        );

        let java = holder(Language::Java, companion_module());
        assert_eq!(
            names(&java.classlikes_to_display(&package).await.unwrap()),
            vec!["Bar", "Companion", "Foo", "Registry"]
        );
        let foo_companion = &package.classlikes[0].classlikes[0];
        assert_eq!(
            java.interestingness(foo_companion).await.unwrap(),
            Boringness::AlwaysBoring
        );
        assert!(java.is_companion(foo_companion).await.unwrap());
        assert!(!java.is_companion(&package.classlikes[2]).await.unwrap());
        assert_eq!(
            java.interestingness(&package.classlikes[2]).await.unwrap(),
            Boringness::NeverBoring
        );
    }

    #[tokio::test]
    async fn test_object_named_companion_outside_owner_is_fatal() {
        let module = Module::new("m").with_package(
            Package::new("a").with_classlike(Classlike::object(Sid::class("a", "Companion"))),
        );
        let holder = holder(Language::Kotlin, module);
        assert_eq!(
            holder.ready().await.unwrap_err(),
            RenderError::IllegalCompanionName {
                sids: vec![Sid::class("a", "Companion")]
            }
        );
    }

    #[tokio::test]
    async fn test_excluded_packages_per_view() {
        let module = || {
            Module::new("m")
                .with_package(Package::new("com.app"))
                .with_package(Package::new("com.app.internal.cache"))
        };
        let excluded = vec![Regex::new(r"^(?:.*\.internal.*)$").unwrap()];
        let java = DocumentablesHolder::builder(
            Language::Java,
            Arc::new(module()),
            VisibilityContext::empty(),
        )
        .excluded_packages(excluded)
        .build();
        let kotlin = holder(Language::Kotlin, module());

        let java_names: Vec<_> = java
            .packages()
            .await
            .unwrap()
            .iter()
            .map(|p| p.package_name().to_string())
            .collect();
        assert_eq!(java_names, vec!["com.app"]);
        assert_eq!(kotlin.packages().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_synthetic_class_and_extension_in_java_view() {
        let string = Sid::class("kotlin", "String");
        let module = Module::new("m").with_package(
            Package::new("a").with_function(
                Function::new(
                    Sid::package("a").member(Callable::new("shout").with_receiver("kotlin.String")),
                )
                .with_receiver(Bound::class(string.clone()))
                .with_source("src/main/kotlin/a/Utils.kt", Some(1)),
            ),
        );
        let package = module.packages[0].clone();
        let java = holder(Language::Java, module);
        java.ready().await.unwrap();

        let shown = java.classlikes_to_display(&package).await.unwrap();
        assert_eq!(names(&shown), vec!["UtilsKt"]);
        assert_eq!(shown[0].functions[0].header.name, "shout");
        assert!(java
            .is_from_synthetic_class(&Sid::class("a", "UtilsKt"))
            .await
            .unwrap());
        assert!(!java.is_from_synthetic_class(&Sid::class("a", "Other")).await.unwrap());

        let string_class = Classlike::class(string);
        let extensions = java.extension_functions_of(&string_class).await.unwrap();
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].header.name, "shout");
    }

    #[tokio::test]
    async fn test_kind_lists_and_nested() {
        let outer = Sid::class("a", "Outer");
        let module = Module::new("m").with_package(
            Package::new("a")
                .with_classlike(
                    Classlike::class(outer.clone())
                        .with_nested(Classlike::enum_class(outer.nested("Mode"), Vec::new()))
                        .with_nested(Classlike::interface(outer.nested("Listener"))),
                )
                .with_classlike(
                    Classlike::class(Sid::class("a", "Oops")).with_supertype(
                        Sid::class("java.lang", "Exception"),
                        SupertypeKind::JavaClass,
                    ),
                )
                .with_classlike(Classlike::annotation_class(Sid::class("a", "Marker")))
                .with_type_alias(crate::model::TypeAlias::new(Sid::class("a", "Handler"))),
        );
        let package = module.packages[0].clone();
        let holder = holder(Language::Kotlin, module);
        holder.ready().await.unwrap();

        assert_eq!(names(&holder.enums_of(&package).await.unwrap()), vec!["Mode"]);
        assert_eq!(
            names(&holder.interfaces_of(&package).await.unwrap()),
            vec!["Listener"]
        );
        assert_eq!(names(&holder.annotations_of(&package).await.unwrap()), vec!["Marker"]);
        assert_eq!(names(&holder.exceptions_of(&package).await.unwrap()), vec!["Oops"]);
        assert_eq!(holder.type_aliases_of(&package).await.unwrap().len(), 1);
        assert_eq!(
            names(&holder.nested_classlikes_of(&package.classlikes[0]).await.unwrap()),
            vec!["Listener", "Mode"]
        );
        assert!(matches!(
            holder
                .nested_classlikes_of(&Classlike::class(Sid::class("b", "Nope")))
                .await,
            Err(RenderError::UnknownClasslike(_))
        ));
    }

    #[tokio::test]
    async fn test_companion_with_extension_is_interesting() {
        let foo = Sid::class("a", "Foo");
        let companion_sid = foo.nested("Companion");
        let module = Module::new("m").with_package(
            Package::new("a")
                .with_classlike(
                    Classlike::class(foo.clone()).with_companion(
                        Classlike::object(companion_sid.clone()).with_function(
                            Function::new(companion_sid.member(Callable::new("of")))
                                .with_annotation(Annotation::named(JVM_STATIC)),
                        ),
                    ),
                )
                .with_function(
                    Function::new(Sid::package("a").member(Callable::new("fromJson")))
                        .with_receiver(Bound::class(companion_sid.clone())),
                ),
        );
        let package = module.packages[0].clone();
        let holder = holder(Language::Kotlin, module);
        let companion = &package.classlikes[0].classlikes[0];
        assert_eq!(
            holder.interestingness(companion).await.unwrap(),
            Boringness::NeverBoring
        );
        assert_eq!(
            names(&holder.interesting_objects_of(&package).await.unwrap()),
            vec!["Companion"]
        );
    }

    #[tokio::test]
    async fn test_unknown_package_is_an_error() {
        let holder = holder(Language::Kotlin, Module::new("m"));
        assert!(matches!(
            holder.classlikes_to_display(&Package::new("x")).await,
            Err(RenderError::UnknownPackage(name)) if name == "x"
        ));
    }

    #[tokio::test]
    async fn test_class_graph_from_displayed_classlikes() {
        let module = Module::new("m").with_package(
            Package::new("a")
                .with_classlike(Classlike::class(Sid::class("a", "Base")))
                .with_classlike(
                    Classlike::class(Sid::class("a", "Child"))
                        .with_supertype(Sid::class("a", "Base"), SupertypeKind::KotlinClass),
                ),
        );
        let holder = holder(Language::Kotlin, module);
        let graph = holder.class_graph().await.unwrap();
        let base = graph.get(&Sid::class("a", "Base")).unwrap();
        assert_eq!(names(&base.direct_sub_classes), vec!["Child"]);
        let documentables = holder.documentables_graph().await.unwrap();
        assert!(documentables.get(&Sid::class("a", "Child")).is_some());
    }
}
