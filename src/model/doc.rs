//! Documentation comment trees.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block tag kinds found in doc comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Description,
    Param,
    Throws,
    Return,
    Deprecated,
    See,
    Since,
    Sample,
    Property,
    Author,
    /// Any other `@tag`, including `@hide` and `@removed`.
    Custom,
}

impl TagKind {
    /// Class-style tag name used in author warnings.
    pub fn class_name(&self) -> &'static str {
        match self {
            TagKind::Description => "Description",
            TagKind::Param => "Param",
            TagKind::Throws => "Throws",
            TagKind::Return => "Return",
            TagKind::Deprecated => "Deprecated",
            TagKind::See => "See",
            TagKind::Since => "Since",
            TagKind::Sample => "Sample",
            TagKind::Property => "Property",
            TagKind::Author => "Author",
            TagKind::Custom => "CustomTag",
        }
    }
}

/// One node of a doc comment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocNode {
    /// A block tag. `name` carries the parameter name for `@param`, the
    /// exception for `@throws`, and the tag name for custom tags.
    Tag {
        kind: TagKind,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
    /// Inline markup element (`P`, `A`, `CodeInline`, ...).
    Element {
        name: String,
        #[serde(default)]
        params: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
    Text {
        body: String,
    },
}

impl DocNode {
    pub fn tag(kind: TagKind, name: Option<&str>) -> Self {
        DocNode::Tag {
            kind,
            name: name.map(str::to_string),
            children: Vec::new(),
        }
    }

    pub fn custom(name: &str) -> Self {
        Self::tag(TagKind::Custom, Some(name))
    }

    pub fn text(body: impl Into<String>) -> Self {
        DocNode::Text { body: body.into() }
    }

    pub fn with_children(mut self, nodes: Vec<DocNode>) -> Self {
        match &mut self {
            DocNode::Tag { children, .. } | DocNode::Element { children, .. } => {
                *children = nodes;
            }
            DocNode::Text { .. } => {}
        }
        self
    }

    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Tag { children, .. } | DocNode::Element { children, .. } => children,
            DocNode::Text { .. } => &[],
        }
    }

    /// Depth-first search for the first node matching `pred`.
    pub fn dfs<F>(&self, pred: &F) -> Option<&DocNode>
    where
        F: Fn(&DocNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.dfs(pred))
    }

    pub fn is_custom_tag(&self, tag: &str) -> bool {
        matches!(
            self,
            DocNode::Tag { kind: TagKind::Custom, name: Some(name), .. } if name == tag
        )
    }
}

/// Depth-first search over a list of root nodes.
pub fn dfs_any<'a, F>(roots: &'a [DocNode], pred: &F) -> Option<&'a DocNode>
where
    F: Fn(&DocNode) -> bool,
{
    roots.iter().find_map(|root| root.dfs(pred))
}
