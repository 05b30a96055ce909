//! Synthetic container classes for top-level members in the Java view.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::accessors::{is_jvm_synthetic, name_for_synthetic_class};
use crate::model::{
    compare_function_signatures, Classlike, Function, Language, Modifier, Package, Property, Sid,
    Visibility,
};

/// Group the top-level functions and properties of `package` into one
/// class per source file, as the JVM compiles them. Kotlin has no such
/// classes.
pub fn compute_synthetic_classes(package: &Package, language: Language) -> Vec<Arc<Classlike>> {
    if language == Language::Kotlin {
        return Vec::new();
    }

    let mut functions: BTreeMap<String, Vec<Function>> = BTreeMap::new();
    let mut properties: BTreeMap<String, Vec<Property>> = BTreeMap::new();
    for function in package
        .functions
        .iter()
        .filter(|f| !is_jvm_synthetic(&f.header))
    {
        let name = name_for_synthetic_class(&function.header);
        let relocated = relocate_function(function, &name);
        functions.entry(name).or_default().push(relocated);
    }
    for property in package
        .properties
        .iter()
        .filter(|p| !is_jvm_synthetic(&p.header))
    {
        let name = name_for_synthetic_class(&property.header);
        let relocated = relocate_property(property, &name);
        properties.entry(name).or_default().push(relocated);
    }

    let mut names: Vec<String> = functions.keys().chain(properties.keys()).cloned().collect();
    names.sort();
    names.dedup();

    names
        .into_iter()
        .map(|name| {
            let mut members = functions.remove(&name).unwrap_or_default();
            members.sort_by(compare_function_signatures);
            let props = properties.remove(&name).unwrap_or_default();
            Arc::new(synthetic_class(package, &name, members, props))
        })
        .collect()
}

fn synthetic_class(
    package: &Package,
    name: &str,
    functions: Vec<Function>,
    properties: Vec<Property>,
) -> Classlike {
    let mut class = Classlike::class(Sid::class(package.package_name(), name));
    let header = &mut class.header;
    header.name = name.to_string();
    header.source_sets = package.header.source_sets.clone();
    header.expect_present_in = package.header.expect_present_in.clone();
    header.visibility = package
        .header
        .source_sets
        .iter()
        .map(|set| (set.clone(), Visibility::Public))
        .collect();
    header.modifiers.insert(Modifier::Final);
    class.functions = functions.into_iter().map(Arc::new).collect();
    class.properties = properties.into_iter().map(Arc::new).collect();
    class.synthetic = true;
    class
}

fn relocate_function(function: &Function, class_name: &str) -> Function {
    let mut out = function.clone();
    out.header.sid = function.header.sid.with_class(class_name);
    out.header.modifiers.insert(Modifier::Static);
    out
}

fn relocate_property(property: &Property, class_name: &str) -> Property {
    let mut out = property.clone();
    out.header.sid = property.header.sid.with_class(class_name);
    out.header.modifiers.insert(Modifier::Static);
    out.getter = property
        .getter
        .as_ref()
        .map(|g| Arc::new(relocate_function(g, class_name)));
    out.setter = property
        .setter
        .as_ref()
        .map(|s| Arc::new(relocate_function(s, class_name)));
    out
}
