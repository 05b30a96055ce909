//! One render pass: filter, propagate, then resolve each display view.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ConfigError, DevsiteConfig};
use crate::error::{RenderError, Result};
use crate::external::{
    load_external_docs, ExternalClasslikeProvider, ExternalLocationProvider,
    MemoizedClasslikeProvider, MemoizedLocationProvider, NoExternalClasslikes,
};
use crate::filter::{run_filters, HidingRules};
use crate::holder::DocumentablesHolder;
use crate::model::{Documentable, Language, Module};
use crate::paths::PathProvider;
use crate::site::summary::{
    class_index, package_index, ClassIndex, ClasslikeDetail, PackageIndex, PackageSummary,
    Summarizer, SummaryOptions,
};
use crate::site::toc::{table_of_contents, TableOfContents};
use crate::transform::AnnotationPropagator;

/// Site locations of the per-view index files.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFiles {
    pub package_list: String,
    pub toc: String,
    pub classes: String,
    pub packages: String,
    pub root_index: String,
}

/// Everything rendered for one display language.
#[derive(Debug, Clone)]
pub struct SiteView {
    pub language: Language,
    pub root_path: String,
    pub files: ViewFiles,
    pub package_list: Vec<String>,
    pub toc: TableOfContents,
    pub class_index: ClassIndex,
    pub package_index: PackageIndex,
    pub packages: Vec<PackageSummary>,
    pub classlikes: Vec<ClasslikeDetail>,
}

/// A configured render pass.
///
/// The configuration is validated and every exclusion pattern compiled
/// before anything is rendered.
pub struct RenderPass {
    config: DevsiteConfig,
    rules: HidingRules,
    propagator: AnnotationPropagator,
    excluded: HashMap<Language, Vec<Regex>>,
    external_classlikes: Arc<dyn ExternalClasslikeProvider>,
    external_locations: Option<Arc<dyn ExternalLocationProvider>>,
}

impl RenderPass {
    pub fn new(config: DevsiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let excluded = config
            .languages()
            .into_iter()
            .map(|language| Ok((language, config.excluded_packages_for(language)?)))
            .collect::<Result<_, ConfigError>>()?;
        Ok(Self {
            rules: HidingRules::from_config(&config),
            propagator: AnnotationPropagator::from_config(&config),
            excluded,
            external_classlikes: Arc::new(NoExternalClasslikes),
            external_locations: None,
            config,
        })
    }

    /// Class-likes outside the corpus, consulted for hierarchies.
    pub fn external_classlikes(mut self, provider: Arc<dyn ExternalClasslikeProvider>) -> Self {
        self.external_classlikes = provider;
        self
    }

    /// Replace the configured external doc sets.
    pub fn external_locations(mut self, provider: Arc<dyn ExternalLocationProvider>) -> Self {
        self.external_locations = Some(provider);
        self
    }

    pub fn config(&self) -> &DevsiteConfig {
        &self.config
    }

    /// Render every configured view of `modules`, Java first.
    pub async fn run(&self, modules: Vec<Module>) -> Result<Vec<SiteView>> {
        for module in &modules {
            check_source_sets(module)?;
        }
        let rules = self.rules.clone();
        let filtered = tokio::task::spawn_blocking(move || run_filters(modules, &rules))
            .await
            .map_err(|e| RenderError::TaskFailed {
                task: "filter".to_string(),
                reason: e.to_string(),
            })?;
        let module = Arc::new(self.propagator.propagate(filtered.module));
        let visibility = filtered.visibility;

        let locations: Arc<dyn ExternalLocationProvider> = match &self.external_locations {
            Some(provider) => Arc::clone(provider),
            None => Arc::new(load_external_docs(&self.config.external_docs).await),
        };
        let locations = Arc::new(MemoizedLocationProvider::new(locations));
        let source_sets = module.source_sets.iter().map(|s| s.id.clone()).collect();
        let classlikes = Arc::new(MemoizedClasslikeProvider::new(
            Arc::clone(&self.external_classlikes),
            source_sets,
        ));

        let mut views = Vec::new();
        for language in self.config.languages() {
            let holder = DocumentablesHolder::builder(
                language,
                Arc::clone(&module),
                Arc::clone(&visibility),
            )
            .excluded_packages(self.excluded.get(&language).cloned().unwrap_or_default())
            .external_classlikes(Arc::clone(&classlikes))
            .build();
            holder.ready().await?;

            let docs_path = self.config.docs_path(language).unwrap_or_default();
            let paths = PathProvider::new(
                language,
                &self.config,
                docs_path,
                holder.documentables_graph().await?,
            )
            .location_provider(Arc::clone(&locations));
            views.push(self.render_view(&holder, &paths).await?);
        }

        let (hits, lookups) = locations.stats();
        tracing::debug!(hits, lookups, "External location lookups");
        Ok(views)
    }

    async fn render_view(&self, holder: &DocumentablesHolder, paths: &PathProvider) -> Result<SiteView> {
        let options = SummaryOptions::from_config(&self.config);
        let summarizer = Summarizer::new(holder, paths, &options);

        let packages = holder.packages().await?;
        let mut summaries = Vec::with_capacity(packages.len());
        for package in packages.iter() {
            summaries.push(summarizer.package_summary(package).await?);
        }
        let mut details = Vec::new();
        for classlike in holder.all_classlikes_to_display().await? {
            details.push(summarizer.classlike_detail(&classlike).await?);
        }

        let view = SiteView {
            language: holder.language(),
            root_path: paths.root_path().to_string(),
            files: ViewFiles {
                package_list: paths.package_list(),
                toc: paths.toc(),
                classes: paths.classes(),
                packages: paths.packages(),
                root_index: paths.root_index(),
            },
            package_list: packages.iter().map(|p| p.package_name().to_string()).collect(),
            toc: table_of_contents(
                holder,
                paths,
                self.config.package_prefix_to_remove_in_toc.as_deref(),
            )
            .await?,
            class_index: class_index(holder, paths).await?,
            package_index: package_index(holder, paths).await?,
            packages: summaries,
            classlikes: details,
        };
        tracing::info!(
            language = %view.language,
            packages = view.packages.len(),
            classlikes = view.classlikes.len(),
            "Rendered view"
        );
        Ok(view)
    }
}

/// Every documentable must be declared in at least one source set.
fn check_source_sets(module: &Module) -> Result<()> {
    for package in &module.packages {
        let root = Documentable::Package(Arc::clone(package));
        let missing = std::iter::once(root.clone())
            .chain(root.exploded_children())
            .find(|d| d.header().source_sets.is_empty());
        if let Some(documentable) = missing {
            return Err(RenderError::MissingSourceSet {
                sid: documentable.sid().clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classlike, Package, Sid};

    struct NoLocations;

    impl ExternalLocationProvider for NoLocations {
        fn resolve(&self, _sid: &Sid) -> Option<String> {
            None
        }
    }

    fn config() -> DevsiteConfig {
        DevsiteConfig {
            java_docs_path: Some("java".to_string()),
            kotlin_docs_path: Some("kotlin".to_string()),
            project_path: "androidx".to_string(),
            excluded_packages_for_java: vec!["a\\.kotlinonly".to_string()],
            ..DevsiteConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_fails_before_rendering() {
        let config = DevsiteConfig {
            java_docs_path: Some("java".to_string()),
            project_path: "androidx".to_string(),
            excluded_packages: vec!["(".to_string()],
            ..DevsiteConfig::default()
        };
        assert!(matches!(
            RenderPass::new(config),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_config_without_project_path_is_rejected() {
        let config = DevsiteConfig {
            project_path: String::new(),
            ..config()
        };
        assert!(matches!(RenderPass::new(config), Err(ConfigError::NoProjectPath)));
    }

    #[tokio::test]
    async fn test_missing_source_set_fails_the_pass() {
        let mut package = Package::new("a");
        package.header.source_sets.clear();
        let pass = RenderPass::new(config())
            .unwrap()
            .external_locations(Arc::new(NoLocations));
        let err = pass.run(vec![Module::new("m").with_package(package)]).await.unwrap_err();
        assert_eq!(err, RenderError::MissingSourceSet { sid: Sid::package("a") });
    }

    #[tokio::test]
    async fn test_views_render_in_language_order() {
        let module = Module::new("m")
            .with_package(Package::new("a").with_classlike(Classlike::class(Sid::class("a", "Foo"))))
            .with_package(
                Package::new("a.kotlinonly").with_classlike(Classlike::class(Sid::class("a.kotlinonly", "Bar"))),
            );
        let pass = RenderPass::new(config())
            .unwrap()
            .external_locations(Arc::new(NoLocations));
        let views = pass.run(vec![module]).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].language, Language::Java);
        assert_eq!(views[0].package_list, vec!["a"]);
        assert_eq!(views[1].package_list, vec!["a", "a.kotlinonly"]);
        assert_eq!(views[1].root_path, "/reference/kotlin");
        assert_eq!(views[1].files.toc, "/reference/kotlin/androidx/_toc.yaml");
        assert_eq!(views[1].classlikes.len(), 2);
    }
}
