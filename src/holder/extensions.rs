//! Extension members attributed to their receiver class-likes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RenderError, Result};
use crate::model::accessors::getters_and_setters;
use crate::model::{Bound, Function, Language, Package, Property, Sid};

pub type ExtensionFunctionMap = HashMap<Sid, Vec<Arc<Function>>>;
pub type ExtensionPropertyMap = HashMap<Sid, Vec<Arc<Property>>>;

/// Map receiver class-likes to the top-level extension functions declared
/// on them. In the Java view, accessors of extension properties are
/// extension functions as well.
///
/// Receivers without a class-like page (primitives, function types, type
/// parameters, aliases) are skipped. A receiver that cannot be resolved is
/// an error.
pub fn compute_extension_function_map(
    packages: &[Arc<Package>],
    language: Language,
) -> Result<ExtensionFunctionMap> {
    let mut map = ExtensionFunctionMap::new();
    for package in packages {
        for function in &package.functions {
            attribute(function, function.receiver.as_ref(), &mut map)?;
        }
        if language == Language::Java {
            for accessor in getters_and_setters(&package.properties) {
                attribute(&accessor, accessor.receiver.as_ref(), &mut map)?;
            }
        }
    }
    tracing::debug!(receivers = map.len(), %language, "Computed extension functions");
    Ok(map)
}

fn attribute(
    function: &Arc<Function>,
    receiver: Option<&Bound>,
    map: &mut ExtensionFunctionMap,
) -> Result<()> {
    match receiver {
        None => Ok(()),
        Some(Bound::GenericTypeConstructor { sid, .. }) => {
            map.entry(sid.clone()).or_default().push(Arc::clone(function));
            Ok(())
        }
        Some(Bound::Nullable { inner }) | Some(Bound::DefinitelyNonNullable { inner }) => {
            attribute(function, Some(inner.as_ref()), map)
        }
        Some(
            Bound::JavaObject
            | Bound::PrimitiveJavaType { .. }
            | Bound::Void
            | Bound::TypeAliased { .. }
            | Bound::FunctionalTypeConstructor { .. }
            | Bound::TypeParameter { .. },
        ) => Ok(()),
        Some(Bound::UnresolvedBound { .. }) => Err(RenderError::UnresolvedReceiver {
            function: function.header.sid.clone(),
        }),
        Some(Bound::Dynamic) => Err(RenderError::UnknownReceiver {
            function: function.header.sid.clone(),
            kind: "dynamic".to_string(),
        }),
    }
}

/// Map receiver class-likes to top-level extension properties. Only the
/// Kotlin view has extension properties; Java sees their accessors.
pub fn compute_extension_property_map(
    packages: &[Arc<Package>],
    language: Language,
) -> ExtensionPropertyMap {
    let mut map = ExtensionPropertyMap::new();
    if language != Language::Kotlin {
        return map;
    }
    for package in packages {
        for property in &package.properties {
            if let Some(sid) = property.receiver.as_ref().and_then(Bound::sid) {
                map.entry(sid.clone()).or_default().push(Arc::clone(property));
            }
        }
    }
    map
}
