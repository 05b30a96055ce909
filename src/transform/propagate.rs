//! Annotation propagation.
//!
//! Annotations named in the propagation list (deprecation by default) flow
//! from a documentable to its structural children. An annotation the
//! child already declares, under the same qualified name, is left as the
//! child wrote it.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::DevsiteConfig;
use crate::model::{
    Annotation, Classlike, ClasslikeKind, EnumEntry, Function, Header, Module, Package, Property,
    TypeAlias,
};

#[derive(Debug, Clone, Default)]
pub struct AnnotationPropagator {
    names: HashSet<String>,
}

impl AnnotationPropagator {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &DevsiteConfig) -> Self {
        Self::new(config.propagating_annotations.iter().cloned())
    }

    /// Propagate through every package of `module`.
    pub fn propagate(&self, module: Module) -> Module {
        if self.names.is_empty() {
            return module;
        }
        let packages = module
            .packages
            .iter()
            .map(|p| Arc::new(self.package(p)))
            .collect();
        Module { packages, ..module }
    }

    fn package(&self, package: &Package) -> Package {
        let mut out = package.clone();
        let inherited = self.apply(&mut out.header, &[]);
        out.classlikes = self.classlikes(&package.classlikes, &inherited);
        out.functions = self.functions(&package.functions, &inherited);
        out.properties = self.properties(&package.properties, &inherited);
        out.type_aliases = package
            .type_aliases
            .iter()
            .map(|alias| {
                let mut alias = TypeAlias::clone(alias);
                self.apply(&mut alias.header, &inherited);
                Arc::new(alias)
            })
            .collect();
        out
    }

    fn classlikes(&self, items: &[Arc<Classlike>], inherited: &[Annotation]) -> Vec<Arc<Classlike>> {
        items
            .iter()
            .map(|c| Arc::new(self.classlike(c, inherited)))
            .collect()
    }

    fn classlike(&self, classlike: &Classlike, inherited: &[Annotation]) -> Classlike {
        let mut out = classlike.clone();
        let next = self.apply(&mut out.header, inherited);
        out.constructors = self.functions(&classlike.constructors, &next);
        out.functions = self.functions(&classlike.functions, &next);
        out.properties = self.properties(&classlike.properties, &next);
        out.classlikes = self.classlikes(&classlike.classlikes, &next);
        if let ClasslikeKind::Enum { entries } = &classlike.kind {
            out.kind = ClasslikeKind::Enum {
                entries: entries
                    .iter()
                    .map(|e| Arc::new(self.enum_entry(e, &next)))
                    .collect(),
            };
        }
        out
    }

    /// Entries receive annotations but pass nothing on to their members.
    fn enum_entry(&self, entry: &EnumEntry, inherited: &[Annotation]) -> EnumEntry {
        let mut out = entry.clone();
        self.apply(&mut out.header, inherited);
        out
    }

    /// Parameters never receive annotations.
    fn functions(&self, items: &[Arc<Function>], inherited: &[Annotation]) -> Vec<Arc<Function>> {
        items
            .iter()
            .map(|f| {
                let mut f = Function::clone(f);
                self.apply(&mut f.header, inherited);
                Arc::new(f)
            })
            .collect()
    }

    fn properties(&self, items: &[Arc<Property>], inherited: &[Annotation]) -> Vec<Arc<Property>> {
        items
            .iter()
            .map(|p| {
                let mut out = Property::clone(p);
                let next = self.apply(&mut out.header, inherited);
                out.getter = p.getter.as_ref().map(|g| {
                    let mut g = Function::clone(g);
                    self.apply(&mut g.header, &next);
                    Arc::new(g)
                });
                out.setter = p.setter.as_ref().map(|s| {
                    let mut s = Function::clone(s);
                    self.apply(&mut s.header, &next);
                    Arc::new(s)
                });
                Arc::new(out)
            })
            .collect()
    }

    /// Add missing inherited annotations to `header` and return what its
    /// children inherit: its own propagating annotations plus the
    /// inherited ones it does not redeclare.
    fn apply(&self, header: &mut Header, inherited: &[Annotation]) -> Vec<Annotation> {
        let own: Vec<Annotation> = header
            .canonical_annotations()
            .iter()
            .filter(|a| self.names.contains(&a.qualified_name()))
            .cloned()
            .collect();

        let mut next = own.clone();
        for annotation in inherited {
            let name = annotation.qualified_name();
            if own.iter().any(|a| a.is(&name)) {
                continue;
            }
            for set in header.source_sets.iter() {
                let declared = header.annotations.entry(set.clone()).or_default();
                if !declared.iter().any(|a| a.is(&name)) {
                    declared.push(annotation.clone());
                }
            }
            next.push(annotation.clone());
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{JAVA_DEPRECATED, KOTLIN_DEPRECATED};
    use crate::model::{Callable, EnumEntry, Sid, WithHeader};

    fn deprecated(message: &str) -> Annotation {
        Annotation::named(KOTLIN_DEPRECATED).with_param("message", message)
    }

    fn module() -> Module {
        let foo = Sid::class("a", "Foo");
        let color = Sid::class("a", "Color");
        let red = Sid::class("a", "Color.RED");
        Module::new("m").with_package(
            Package::new("a")
                .with_classlike(
                    Classlike::class(foo.clone())
                        .with_annotation(deprecated("old"))
                        .with_function(
                            Function::new(foo.member(Callable::new("run")))
                                .with_parameter("x", crate::model::Bound::Void),
                        )
                        .with_function(
                            Function::new(foo.member(Callable::new("other")))
                                .with_annotation(deprecated("explicit")),
                        )
                        .with_property(
                            Property::new(foo.member(Callable::new("size")))
                                .with_getter(Function::new(foo.member(Callable::new("getSize")))),
                        )
                        .with_nested(Classlike::class(foo.nested("Inner"))),
                )
                .with_classlike(
                    Classlike::enum_class(
                        color.clone(),
                        vec![{
                            let mut entry = EnumEntry::new(red.clone());
                            entry.functions.push(Arc::new(Function::new(
                                red.member(Callable::new("shade")),
                            )));
                            entry
                        }],
                    )
                    .with_annotation(Annotation::named(JAVA_DEPRECATED)),
                ),
        )
    }

    fn foo(module: &Module) -> &Classlike {
        &module.packages[0].classlikes[0]
    }

    #[test]
    fn test_propagates_to_members_accessors_and_nested() {
        let out = AnnotationPropagator::new([KOTLIN_DEPRECATED]).propagate(module());
        let foo = foo(&out);
        assert!(foo.functions[0].header.has_annotation(KOTLIN_DEPRECATED));
        assert!(foo.properties[0].header.has_annotation(KOTLIN_DEPRECATED));
        assert!(foo.properties[0]
            .getter
            .as_ref()
            .unwrap()
            .header
            .has_annotation(KOTLIN_DEPRECATED));
        assert!(foo.classlikes[0].header.has_annotation(KOTLIN_DEPRECATED));
        assert!(foo.functions[0].parameters[0].annotations.is_empty());
    }

    #[test]
    fn test_explicit_declaration_is_not_overwritten() {
        let out = AnnotationPropagator::new([KOTLIN_DEPRECATED]).propagate(module());
        let other = &foo(&out).functions[1];
        let declared = other.header.canonical_annotations();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].params.get("message").unwrap(), "explicit");
    }

    #[test]
    fn test_enum_entries_receive_but_do_not_pass_on() {
        let out = AnnotationPropagator::new([JAVA_DEPRECATED]).propagate(module());
        let color = &out.packages[0].classlikes[1];
        let entry = &color.entries()[0];
        assert!(entry.header.has_annotation(JAVA_DEPRECATED));
        assert!(!entry.functions[0].header.has_annotation(JAVA_DEPRECATED));
    }

    #[test]
    fn test_idempotent() {
        let propagator = AnnotationPropagator::new([KOTLIN_DEPRECATED, JAVA_DEPRECATED]);
        let once = propagator.propagate(module());
        let twice = propagator.propagate(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_list_is_a_no_op() {
        let input = module();
        let out = AnnotationPropagator::new(Vec::<String>::new()).propagate(input.clone());
        assert_eq!(out, input);
    }
}
