//! Compilation targets ("source sets") and canonical facet selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::types::Visibility;

/// Analysis platform of a source set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Common,
    Jvm,
    Js,
    Native,
    Wasm,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Common => "common",
            Platform::Jvm => "jvm",
            Platform::Js => "js",
            Platform::Native => "native",
            Platform::Wasm => "wasm",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Platform::Common),
            "jvm" | "android" => Ok(Platform::Jvm),
            "js" => Ok(Platform::Js),
            "native" => Ok(Platform::Native),
            "wasm" => Ok(Platform::Wasm),
            other => Err(format!("unknown platform {:?}", other)),
        }
    }
}

/// Source set key, written as `platform:name` (e.g. `jvm:jvmMain`).
///
/// A bare `name` is accepted and treated as a JVM source set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceSetId {
    pub platform: Platform,
    pub name: String,
}

impl SourceSetId {
    pub fn new(platform: Platform, name: impl Into<String>) -> Self {
        Self {
            platform,
            name: name.into(),
        }
    }

    pub fn jvm(name: impl Into<String>) -> Self {
        Self::new(Platform::Jvm, name)
    }

    pub fn common(name: impl Into<String>) -> Self {
        Self::new(Platform::Common, name)
    }
}

impl TryFrom<String> for SourceSetId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.split_once(':') {
            Some((platform, name)) => Ok(Self::new(platform.parse()?, name)),
            None => Ok(Self::jvm(value)),
        }
    }
}

impl From<SourceSetId> for String {
    fn from(id: SourceSetId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for SourceSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform.as_str(), self.name)
    }
}

/// Source set declaration carried by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub id: SourceSetId,
    #[serde(default = "default_documented_visibilities")]
    pub documented_visibilities: BTreeSet<Visibility>,
}

impl SourceSet {
    pub fn new(id: SourceSetId) -> Self {
        Self {
            id,
            documented_visibilities: default_documented_visibilities(),
        }
    }
}

pub fn default_documented_visibilities() -> BTreeSet<Visibility> {
    [Visibility::Public, Visibility::Protected]
        .into_iter()
        .collect()
}

const FALLBACK_COMMON_NAMES: &[&str] = &["common", "commonMain"];
const FALLBACK_JVM_NAMES: &[&str] = &["jvmMain", "androidMain", "desktopMain"];

/// Picks the canonical facet among `source_sets`.
///
/// Preference: the only source set, then the `expect` declaration's set,
/// then a common-platform set, then a set named like a common one, then a
/// JVM-flavoured set, then the first one. `None` only for an empty set.
pub fn canonical_source_set<'a>(
    source_sets: &'a BTreeSet<SourceSetId>,
    expect_present_in: Option<&'a SourceSetId>,
) -> Option<&'a SourceSetId> {
    if source_sets.len() == 1 {
        return source_sets.iter().next();
    }
    if let Some(expect) = expect_present_in {
        return Some(expect);
    }
    source_sets
        .iter()
        .find(|s| s.platform == Platform::Common)
        .or_else(|| {
            source_sets
                .iter()
                .find(|s| FALLBACK_COMMON_NAMES.contains(&s.name.as_str()))
        })
        .or_else(|| {
            source_sets
                .iter()
                .find(|s| FALLBACK_JVM_NAMES.contains(&s.name.as_str()))
        })
        .or_else(|| source_sets.iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(ids: &[SourceSetId]) -> BTreeSet<SourceSetId> {
        ids.iter().cloned().collect()
    }

    #[test]
    fn test_parse_source_set_id() {
        let id: SourceSetId = serde_json::from_str("\"common:commonMain\"").unwrap();
        assert_eq!(id, SourceSetId::common("commonMain"));
        let bare: SourceSetId = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(bare, SourceSetId::jvm("main"));
        assert!(serde_json::from_str::<SourceSetId>("\"mars:main\"").is_err());
    }

    #[test]
    fn test_canonical_prefers_single() {
        let only = sets(&[SourceSetId::jvm("main")]);
        assert_eq!(
            canonical_source_set(&only, None),
            Some(&SourceSetId::jvm("main"))
        );
    }

    #[test]
    fn test_canonical_prefers_expect_then_common() {
        let all = sets(&[
            SourceSetId::jvm("jvmMain"),
            SourceSetId::common("commonMain"),
            SourceSetId::new(Platform::Js, "jsMain"),
        ]);
        let expect = SourceSetId::new(Platform::Js, "jsMain");
        assert_eq!(canonical_source_set(&all, Some(&expect)), Some(&expect));
        assert_eq!(
            canonical_source_set(&all, None),
            Some(&SourceSetId::common("commonMain"))
        );
    }

    #[test]
    fn test_canonical_falls_back_to_jvm_names() {
        let all = sets(&[
            SourceSetId::new(Platform::Native, "iosMain"),
            SourceSetId::jvm("androidMain"),
        ]);
        assert_eq!(
            canonical_source_set(&all, None),
            Some(&SourceSetId::jvm("androidMain"))
        );
        assert_eq!(canonical_source_set(&BTreeSet::new(), None), None);
    }
}
