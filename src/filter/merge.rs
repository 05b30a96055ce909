//! Merging per-pipeline modules into one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::{Header, Module, Package, Sid, WithHeader};

/// Merge modules: packages with the same name are combined, keeping the
/// first occurrence of any child declared by more than one pipeline.
pub fn merge_modules(modules: Vec<Module>) -> Module {
    let mut iter = modules.into_iter();
    let Some(first) = iter.next() else {
        return Module {
            name: String::new(),
            source_sets: Vec::new(),
            packages: Vec::new(),
        };
    };

    let mut merged = Module {
        name: first.name.clone(),
        source_sets: Vec::new(),
        packages: Vec::new(),
    };
    let mut index: HashMap<String, usize> = HashMap::new();

    for module in std::iter::once(first).chain(iter) {
        for source_set in module.source_sets {
            if !merged.source_sets.iter().any(|s| s.id == source_set.id) {
                merged.source_sets.push(source_set);
            }
        }
        for package in module.packages {
            match index.get(package.package_name()) {
                Some(&at) => {
                    let combined = merge_packages(&merged.packages[at], &package);
                    merged.packages[at] = Arc::new(combined);
                }
                None => {
                    index.insert(package.package_name().to_string(), merged.packages.len());
                    merged.packages.push(package);
                }
            }
        }
    }
    tracing::debug!(packages = merged.packages.len(), "Merged modules");
    merged
}

fn merge_packages(into: &Package, from: &Package) -> Package {
    let mut out = into.clone();
    merge_header(&mut out.header, &from.header);
    out.classlikes = union_by_sid(&into.classlikes, &from.classlikes);
    out.functions = union_by_sid(&into.functions, &from.functions);
    out.properties = union_by_sid(&into.properties, &from.properties);
    out.type_aliases = union_by_sid(&into.type_aliases, &from.type_aliases);
    out
}

fn merge_header(into: &mut Header, from: &Header) {
    into.source_sets.extend(from.source_sets.iter().cloned());
    for (set, visibility) in &from.visibility {
        into.visibility.entry(set.clone()).or_insert(*visibility);
    }
    for (set, annotations) in &from.annotations {
        into.annotations
            .entry(set.clone())
            .or_insert_with(|| annotations.clone());
    }
    for (set, docs) in &from.documentation {
        into.documentation
            .entry(set.clone())
            .or_insert_with(|| docs.clone());
    }
    for (set, source) in &from.sources {
        into.sources.entry(set.clone()).or_insert_with(|| source.clone());
    }
}

fn union_by_sid<T: WithHeader>(left: &[Arc<T>], right: &[Arc<T>]) -> Vec<Arc<T>> {
    let mut seen: HashSet<Sid> = left.iter().map(|d| d.sid().clone()).collect();
    let mut out = left.to_vec();
    for item in right {
        if seen.insert(item.sid().clone()) {
            out.push(Arc::clone(item));
        }
    }
    out
}
