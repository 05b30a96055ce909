//! Render pass errors.
//!
//! Every variant is fatal for the pass. The type is `Clone` so a failure
//! inside a shared computation reaches every reader awaiting it.

use thiserror::Error;

use crate::model::Sid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("unresolved receiver of {function}")]
    UnresolvedReceiver { function: Sid },

    #[error("unknown receiver kind `{kind}` for {function}")]
    UnknownReceiver { function: Sid, kind: String },

    #[error(
        "object with illegal name: named 'Companion' but is not a companion object: {}",
        join_sids(.sids)
    )]
    IllegalCompanionName { sids: Vec<Sid> },

    #[error("cannot link type `{bound}`: unhandled type construct")]
    UnresolvableType { bound: String },

    #[error("{sid} declares no source sets")]
    MissingSourceSet { sid: Sid },

    #[error("package `{0}` is not part of this view")]
    UnknownPackage(String),

    #[error("class-like {0} is not part of this view")]
    UnknownClasslike(Sid),

    #[error("{task} failed: {reason}")]
    TaskFailed { task: String, reason: String },

    #[error("cannot serialize {what}: {reason}")]
    Serialize { what: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    Io { path: String, reason: String },
}

impl RenderError {
    pub fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        RenderError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

fn join_sids(sids: &[Sid]) -> String {
    sids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
