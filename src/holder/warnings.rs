//! Author-facing documentation warnings.

use std::collections::HashSet;

use crate::model::{DocNode, Documentable, TagKind};

/// Render a warning line: location, message, offending tag, and the
/// documentable it was found on.
///
/// The tag's class name is lowercased when `base_message` ends with `@`,
/// so a message like "Unknown parameter in @" reads `@param`.
pub fn format_warning(
    base_message: &str,
    documentable: &Documentable,
    containing: Option<&Documentable>,
    tag: Option<&DocNode>,
    additional_context: &str,
) -> String {
    let mut containing_info = String::new();
    if let Some(DocNode::Tag { kind, name, .. }) = tag {
        let mut tag_name = kind.class_name().to_string();
        if base_message.ends_with('@') {
            tag_name = tag_name.to_lowercase();
        }
        containing_info.push_str(&tag_name);
        if let Some(name) = name {
            containing_info.push(' ');
            containing_info.push_str(name);
        }
    }
    containing_info.push_str(&format!(
        " in {} {}",
        documentable.kind_name(),
        documentable.name()
    ));
    let location = containing
        .unwrap_or(documentable)
        .header()
        .error_location();
    format!(
        "{} {}{}{}",
        location, base_message, containing_info, additional_context
    )
}

/// A suspicious tag found on one documentable.
#[derive(Debug, Clone, PartialEq)]
pub struct TagProblem {
    pub message: &'static str,
    pub tag: DocNode,
}

/// Check the top-level tags of a documentable's canonical documentation:
/// `@param` must name a declared parameter, `@throws` must name something.
pub fn check_doc_tags(documentable: &Documentable) -> Vec<TagProblem> {
    let params: Option<HashSet<&str>> = match documentable {
        Documentable::Function(f) => Some(f.parameters.iter().map(|p| p.name.as_str()).collect()),
        _ => None,
    };
    let mut problems = Vec::new();
    for node in documentable.header().canonical_documentation() {
        let DocNode::Tag { kind, name, .. } = node else {
            continue;
        };
        match kind {
            TagKind::Param => {
                if let (Some(params), Some(name)) = (&params, name) {
                    if !params.contains(name.as_str()) {
                        problems.push(TagProblem {
                            message: "Unknown parameter named in @",
                            tag: node.clone(),
                        });
                    }
                }
            }
            TagKind::Throws => {
                if name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                    problems.push(TagProblem {
                        message: "Missing exception name for @",
                        tag: node.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    problems
}
