//! Package-list based location oracle for externally hosted doc sets.
//!
//! A doc set publishes a `package-list` file: one package per line, with
//! optional `$dokka.`-prefixed metadata lines. Any symbol in a listed
//! package links into that doc set.

use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

use super::{ExternalError, ExternalLocationProvider};
use crate::config::ExternalDocs;
use crate::model::Sid;
use crate::paths::PACKAGE_SUMMARY_NAME;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One external doc set.
#[derive(Debug, Clone)]
pub struct ExternalDocSet {
    base_url: String,
    packages: HashSet<String>,
}

impl ExternalDocSet {
    /// Parse package-list `content` for a doc set rooted at `base_url`.
    pub fn parse(base_url: &str, content: &str) -> Self {
        let packages = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('$'))
            .filter(|line| !line.starts_with("module:"))
            .map(str::to_string)
            .collect();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            packages,
        }
    }

    pub fn contains_package(&self, name: &str) -> bool {
        self.packages.contains(name)
    }

    pub fn url_for(&self, sid: &Sid) -> String {
        let package_path = sid.package_name.replace('.', "/");
        let page = sid.class_names.as_deref().unwrap_or(PACKAGE_SUMMARY_NAME);
        let mut url = format!("{}/{}/{}.html", self.base_url, package_path, page);
        if let Some(callable) = &sid.callable {
            url.push('#');
            url.push_str(&callable.anchor());
        }
        url
    }
}

/// Resolves symbols against every configured external doc set, first match
/// wins.
#[derive(Debug, Clone, Default)]
pub struct PackageListLocationProvider {
    doc_sets: Vec<ExternalDocSet>,
}

impl PackageListLocationProvider {
    pub fn new(doc_sets: Vec<ExternalDocSet>) -> Self {
        Self { doc_sets }
    }

    pub fn is_empty(&self) -> bool {
        self.doc_sets.is_empty()
    }
}

impl ExternalLocationProvider for PackageListLocationProvider {
    fn resolve(&self, sid: &Sid) -> Option<String> {
        self.doc_sets
            .iter()
            .find(|set| set.contains_package(&sid.package_name))
            .map(|set| set.url_for(sid))
    }
}

/// Read a package list from a local path or an `http(s)` URL.
pub async fn fetch_package_list(client: &Client, location: &str) -> Result<String, ExternalError> {
    if !(location.starts_with("http://") || location.starts_with("https://")) {
        return Ok(std::fs::read_to_string(location)?);
    }
    let response = client
        .get(location)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ExternalError::Timeout
            } else {
                ExternalError::Network(e)
            }
        })?;
    match response.status().as_u16() {
        200 => Ok(response.text().await?),
        status => Err(ExternalError::Status(status)),
    }
}

/// Load every configured doc set concurrently. A doc set whose package
/// list cannot be read is skipped with a warning.
pub async fn load_external_docs(configs: &[ExternalDocs]) -> PackageListLocationProvider {
    if configs.is_empty() {
        return PackageListLocationProvider::default();
    }
    let client = match Client::builder().user_agent("devsite-refdocs/0.1.0").build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot create HTTP client; external links disabled");
            return PackageListLocationProvider::default();
        }
    };
    let fetches = configs.iter().map(|config| {
        let client = &client;
        async move {
            let location = config.package_list_location();
            match fetch_package_list(client, &location).await {
                Ok(content) => Some(ExternalDocSet::parse(&config.url, &content)),
                Err(e) => {
                    tracing::warn!(location = %location, error = %e, "Skipping external docs");
                    None
                }
            }
        }
    });
    let doc_sets = futures::future::join_all(fetches)
        .await
        .into_iter()
        .flatten()
        .collect();
    PackageListLocationProvider::new(doc_sets)
}
