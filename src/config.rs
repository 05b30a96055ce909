//! Devsite rendering configuration.
//!
//! Loaded from YAML and validated before any rendering starts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::types::{JAVA_DEPRECATED, KOTLIN_DEPRECATED};
use crate::model::Language;

/// Errors found while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("at least one of java_docs_path or kotlin_docs_path must be set")]
    NoOutputPath,
    #[error("java_docs_path and kotlin_docs_path must differ (both are {0:?})")]
    SameOutputPath(String),
    #[error("project_path must be set")]
    NoProjectPath,
    #[error("invalid excluded package pattern {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// An external, previously generated doc set that references may link to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExternalDocs {
    /// Base URL of the doc set.
    pub url: String,
    /// Location of its package list: a local path or URL. Defaults to
    /// `<url>/package-list`.
    #[serde(default)]
    pub package_list: Option<String>,
}

impl ExternalDocs {
    pub fn package_list_location(&self) -> String {
        self.package_list
            .clone()
            .unwrap_or_else(|| format!("{}/package-list", self.url.trim_end_matches('/')))
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DevsiteConfig {
    #[serde(default = "default_doc_root_path")]
    pub doc_root_path: String,
    #[serde(default)]
    pub java_docs_path: Option<String>,
    #[serde(default)]
    pub kotlin_docs_path: Option<String>,
    /// Project subdirectory holding the package list, TOC and indices. Required.
    #[serde(default)]
    pub project_path: String,
    /// Regexes (full match) of packages excluded from both views.
    #[serde(default)]
    pub excluded_packages: Vec<String>,
    #[serde(default)]
    pub excluded_packages_for_java: Vec<String>,
    #[serde(default)]
    pub excluded_packages_for_kotlin: Vec<String>,
    /// Qualified names of annotations that hide what they annotate.
    #[serde(default)]
    pub hiding_annotations: Vec<String>,
    /// Qualified names of annotations copied onto structural children.
    #[serde(default = "default_propagating_annotations")]
    pub propagating_annotations: Vec<String>,
    /// Document members inherited from hidden parents as if declared on
    /// the visible child.
    #[serde(default)]
    pub include_hidden_parent_symbols: bool,
    #[serde(default)]
    pub package_prefix_to_remove_in_toc: Option<String>,
    /// Source link template for class-likes (`%s` is the source path).
    #[serde(default)]
    pub base_source_link: Option<String>,
    #[serde(default)]
    pub base_function_source_link: Option<String>,
    #[serde(default)]
    pub base_property_source_link: Option<String>,
    #[serde(default)]
    pub annotations_not_to_display: Vec<String>,
    #[serde(default)]
    pub annotations_not_to_display_java: Vec<String>,
    #[serde(default)]
    pub annotations_not_to_display_kotlin: Vec<String>,
    #[serde(default = "default_head_tags_path")]
    pub included_head_tags_path_java: Option<String>,
    #[serde(default = "default_head_tags_path")]
    pub included_head_tags_path_kotlin: Option<String>,
    #[serde(default)]
    pub external_docs: Vec<ExternalDocs>,
}

fn default_doc_root_path() -> String {
    "reference".to_string()
}

fn default_propagating_annotations() -> Vec<String> {
    vec![KOTLIN_DEPRECATED.to_string(), JAVA_DEPRECATED.to_string()]
}

fn default_head_tags_path() -> Option<String> {
    Some("_shared/_reference-head-tags.html".to_string())
}

impl Default for DevsiteConfig {
    fn default() -> Self {
        Self {
            doc_root_path: default_doc_root_path(),
            java_docs_path: None,
            kotlin_docs_path: None,
            project_path: String::new(),
            excluded_packages: Vec::new(),
            excluded_packages_for_java: Vec::new(),
            excluded_packages_for_kotlin: Vec::new(),
            hiding_annotations: Vec::new(),
            propagating_annotations: default_propagating_annotations(),
            include_hidden_parent_symbols: false,
            package_prefix_to_remove_in_toc: None,
            base_source_link: None,
            base_function_source_link: None,
            base_property_source_link: None,
            annotations_not_to_display: Vec::new(),
            annotations_not_to_display_java: Vec::new(),
            annotations_not_to_display_kotlin: Vec::new(),
            included_head_tags_path_java: default_head_tags_path(),
            included_head_tags_path_kotlin: default_head_tags_path(),
            external_docs: Vec::new(),
        }
    }
}

impl DevsiteConfig {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reject contradictory or missing settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.java_docs_path, &self.kotlin_docs_path) {
            (None, None) => return Err(ConfigError::NoOutputPath),
            (Some(java), Some(kotlin)) if java == kotlin => {
                return Err(ConfigError::SameOutputPath(java.clone()))
            }
            _ => {}
        }
        if self.project_path.trim().is_empty() {
            return Err(ConfigError::NoProjectPath);
        }
        for language in Language::ALL {
            self.excluded_packages_for(language)?;
        }
        Ok(())
    }

    /// Views that have an output path, Java first.
    pub fn languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|language| self.docs_path(*language).is_some())
            .collect()
    }

    pub fn docs_path(&self, language: Language) -> Option<&str> {
        match language {
            Language::Java => self.java_docs_path.as_deref(),
            Language::Kotlin => self.kotlin_docs_path.as_deref(),
        }
    }

    /// Shared plus per-view exclusion patterns, compiled for full matches.
    pub fn excluded_packages_for(&self, language: Language) -> Result<Vec<Regex>, ConfigError> {
        let specific = match language {
            Language::Java => &self.excluded_packages_for_java,
            Language::Kotlin => &self.excluded_packages_for_kotlin,
        };
        self.excluded_packages
            .iter()
            .chain(specific.iter())
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    pub fn annotations_not_to_display_for(&self, language: Language) -> BTreeSet<String> {
        let specific = match language {
            Language::Java => &self.annotations_not_to_display_java,
            Language::Kotlin => &self.annotations_not_to_display_kotlin,
        };
        self.annotations_not_to_display
            .iter()
            .chain(specific.iter())
            .cloned()
            .collect()
    }

    pub fn included_head_tags_path(&self, language: Language) -> Option<&str> {
        match language {
            Language::Java => self.included_head_tags_path_java.as_deref(),
            Language::Kotlin => self.included_head_tags_path_kotlin.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
java_docs_path: "reference"
kotlin_docs_path: "reference/kotlin"
project_path: "androidx"
excluded_packages_for_java:
  - '.*\.internal.*'
hiding_annotations:
  - "androidx.annotation.RestrictTo"
external_docs:
  - url: "https://developer.android.com/reference"
"#;
        let config = DevsiteConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.doc_root_path, "reference");
        assert_eq!(config.languages(), vec![Language::Java, Language::Kotlin]);
        assert_eq!(
            config.propagating_annotations,
            vec!["kotlin.Deprecated", "java.lang.Deprecated"]
        );
        assert_eq!(
            config.external_docs[0].package_list_location(),
            "https://developer.android.com/reference/package-list"
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_requires_an_output_path() {
        let config = DevsiteConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::NoOutputPath)));
    }

    #[test]
    fn test_validate_rejects_identical_paths() {
        let config = DevsiteConfig {
            java_docs_path: Some("ref".to_string()),
            kotlin_docs_path: Some("ref".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SameOutputPath(_))
        ));
    }

    #[test]
    fn test_validate_requires_a_project_path() {
        let config = DevsiteConfig::from_yaml("kotlin_docs_path: kotlin\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::NoProjectPath)));

        let blank = DevsiteConfig {
            project_path: "  ".to_string(),
            ..config
        };
        assert!(matches!(blank.validate(), Err(ConfigError::NoProjectPath)));
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let config = DevsiteConfig {
            java_docs_path: Some("ref".to_string()),
            project_path: "androidx".to_string(),
            excluded_packages: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_excluded_packages_are_full_match_and_per_view() {
        let config = DevsiteConfig {
            java_docs_path: Some("ref".to_string()),
            excluded_packages: vec!["com\\.app\\.test".to_string()],
            excluded_packages_for_java: vec![".*\\.internal.*".to_string()],
            ..Default::default()
        };
        let java = config.excluded_packages_for(Language::Java).unwrap();
        let kotlin = config.excluded_packages_for(Language::Kotlin).unwrap();
        assert!(java.iter().any(|r| r.is_match("com.app.internal.cache")));
        assert!(!kotlin.iter().any(|r| r.is_match("com.app.internal.cache")));
        assert!(kotlin.iter().any(|r| r.is_match("com.app.test")));
        assert!(!kotlin.iter().any(|r| r.is_match("com.app.testing")));
    }
}
