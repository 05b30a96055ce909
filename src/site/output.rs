//! Writes a rendered view to disk.
//!
//! Site URLs map onto files below the output directory; page data is
//! written as JSON next to where the HTML page would live.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};
use crate::site::render::SiteView;

/// What [`write_view`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    pub files: usize,
    pub packages: usize,
    pub classlikes: usize,
}

/// File for a site URL, with an `.html` page swapped for `extension`.
pub fn output_file(out_dir: &Path, url: &str, extension: Option<&str>) -> PathBuf {
    let relative = url.trim_start_matches('/');
    let relative = match extension {
        Some(extension) => match relative.strip_suffix(".html") {
            Some(stem) => format!("{}.{}", stem, extension),
            None => relative.to_string(),
        },
        None => relative.to_string(),
    };
    out_dir.join(relative)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RenderError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| RenderError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Wrote file");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, what: &str, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| RenderError::Serialize {
        what: what.to_string(),
        reason: e.to_string(),
    })?;
    write_file(path, &content)
}

/// Write the package list, table of contents, indices and every page's
/// data for `view` below `out_dir`.
pub fn write_view(view: &SiteView, out_dir: &Path) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    let mut package_list = view.package_list.join("\n");
    package_list.push('\n');
    write_file(&output_file(out_dir, &view.files.package_list, None), &package_list)?;
    write_file(&output_file(out_dir, &view.files.toc, None), &view.toc.to_yaml()?)?;
    write_json(
        &output_file(out_dir, &view.files.classes, Some("json")),
        "class index",
        &view.class_index,
    )?;
    summary.files += 3;

    if view.files.packages == view.files.root_index {
        tracing::warn!(
            path = %view.files.packages,
            "Package index would overwrite the root index; skipping it"
        );
    } else {
        write_json(
            &output_file(out_dir, &view.files.packages, Some("json")),
            "package index",
            &view.package_index,
        )?;
        summary.files += 1;
    }

    for package in &view.packages {
        write_json(&output_file(out_dir, &package.url, Some("json")), &package.name, package)?;
        summary.packages += 1;
    }
    for classlike in &view.classlikes {
        write_json(
            &output_file(out_dir, &classlike.path, Some("json")),
            &classlike.qualified_name,
            classlike,
        )?;
        summary.classlikes += 1;
    }
    summary.files += summary.packages + summary.classlikes;

    tracing::info!(
        language = %view.language,
        files = summary.files,
        out = %out_dir.display(),
        "Wrote view"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_mapping() {
        let out = Path::new("/tmp/site");
        assert_eq!(
            output_file(out, "/reference/kotlin/a/Foo.html", Some("json")),
            PathBuf::from("/tmp/site/reference/kotlin/a/Foo.json")
        );
        assert_eq!(
            output_file(out, "/reference/kotlin/androidx/_toc.yaml", Some("json")),
            PathBuf::from("/tmp/site/reference/kotlin/androidx/_toc.yaml")
        );
        assert_eq!(
            output_file(out, "/reference/kotlin/androidx/package-list", None),
            PathBuf::from("/tmp/site/reference/kotlin/androidx/package-list")
        );
    }
}
