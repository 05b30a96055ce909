//! Devsite `_toc.yaml` navigation.

use serde::Serialize;

use crate::error::{RenderError, Result};
use crate::holder::DocumentablesHolder;
use crate::model::accessors::is_exception_class;
use crate::model::{Classlike, ClasslikeKind, Language, Package};
use crate::paths::{Link, PathProvider};

/// One navigation entry; a section nests further entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub section: Vec<TocEntry>,
}

impl TocEntry {
    fn leaf(link: Link) -> Self {
        Self {
            title: link.name,
            path: Some(link.url),
            section: Vec::new(),
        }
    }

    fn group(title: &str, links: Vec<Link>) -> Option<Self> {
        if links.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            path: None,
            section: links.into_iter().map(TocEntry::leaf).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOfContents {
    pub toc: Vec<TocEntry>,
}

impl TableOfContents {
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RenderError::Serialize {
            what: "table of contents".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Strip `prefix` (with its trailing dot) from a package name.
pub fn trim_package_prefix<'a>(name: &'a str, prefix: Option<&str>) -> &'a str {
    match prefix {
        Some(prefix) => {
            let prefix = format!("{}.", prefix.trim_end_matches('.'));
            name.strip_prefix(prefix.as_str()).unwrap_or(name)
        }
        None => name,
    }
}

fn links(paths: &PathProvider, classlikes: &[std::sync::Arc<Classlike>]) -> Vec<Link> {
    classlikes
        .iter()
        .map(|c| Link {
            name: c.header.name.clone(),
            url: paths.for_reference(&c.header.sid).url,
        })
        .collect()
}

/// Build the table of contents: the two indices, then a section per
/// package. Type aliases have no pages and are never listed.
pub async fn table_of_contents(
    holder: &DocumentablesHolder,
    paths: &PathProvider,
    prefix_to_remove: Option<&str>,
) -> Result<TableOfContents> {
    let mut toc = vec![
        TocEntry::leaf(Link {
            name: "Class Index".to_string(),
            url: paths.classes(),
        }),
        TocEntry::leaf(Link {
            name: "Package Index".to_string(),
            url: paths.packages(),
        }),
    ];
    for package in holder.packages().await?.iter() {
        toc.push(package_entry(holder, paths, package, prefix_to_remove).await?);
    }
    Ok(TableOfContents { toc })
}

async fn package_entry(
    holder: &DocumentablesHolder,
    paths: &PathProvider,
    package: &Package,
    prefix_to_remove: Option<&str>,
) -> Result<TocEntry> {
    let language = holder.language();
    let interfaces = links(paths, &holder.interfaces_of(package).await?);
    let objects: Vec<_> = holder
        .interesting_objects_of(package)
        .await?
        .into_iter()
        .filter(|o| !is_exception_class(o))
        .collect();
    let classes: Vec<_> = holder
        .classlikes_to_display(package)
        .await?
        .iter()
        .filter(|c| matches!(c.kind, ClasslikeKind::Class) && !is_exception_class(c))
        .cloned()
        .collect();
    let enums = links(paths, &holder.enums_of(package).await?);
    let exceptions = links(paths, &holder.exceptions_of(package).await?);
    let annotations = links(paths, &holder.annotations_of(package).await?);

    let (classes, objects) = match language {
        Language::Kotlin => (links(paths, &classes), links(paths, &objects)),
        Language::Java => {
            let mut merged = links(paths, &classes);
            merged.extend(links(paths, &objects));
            merged.sort_by(|a, b| a.name.cmp(&b.name));
            (merged, Vec::new())
        }
    };

    let section = [
        TocEntry::group("Interfaces", interfaces),
        TocEntry::group("Classes", classes),
        TocEntry::group("Enums", enums),
        TocEntry::group("Exceptions", exceptions),
        TocEntry::group("Annotations", annotations),
        TocEntry::group("Objects", objects),
    ]
    .into_iter()
    .flatten()
    .collect();

    Ok(TocEntry {
        title: trim_package_prefix(package.package_name(), prefix_to_remove).to_string(),
        path: Some(paths.for_reference(&package.header.sid).url),
        section,
    })
}
