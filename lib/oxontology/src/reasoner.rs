//! What reasoners see of ontologies, and a reasoner answering from told axioms only.

use crate::axiom::{AnnotatedAxiom, Axiom, AxiomKind};
use crate::catalog::OntologyCatalog;
use crate::entity::{Individual, OwlClass};
use crate::error::ImportsError;
use crate::expression::ClassExpression;
use crate::ontology::Ontology;
use crate::vocab::owl;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// A set of axioms to reason over, gathered from an ontology and its imports.
pub trait AxiomSource {
    /// The ontologies contributing axioms, the root one first.
    fn imports_closure(&self) -> impl Iterator<Item = &Ontology>;

    /// Every axiom of the imports closure.
    fn axioms(&self) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.imports_closure().flat_map(Ontology::axioms)
    }

    /// The axioms of a kind across the imports closure, answered from each ontology index.
    fn axioms_of_kind(&self, kind: AxiomKind) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.imports_closure()
            .flat_map(move |ontology| ontology.axioms_of_kind(kind))
    }
}

impl<T: AxiomSource + ?Sized> AxiomSource for &T {
    fn imports_closure(&self) -> impl Iterator<Item = &Ontology> {
        (**self).imports_closure()
    }
}

/// A lone ontology, imports ignored.
impl AxiomSource for Ontology {
    fn imports_closure(&self) -> impl Iterator<Item = &Ontology> {
        std::iter::once(self)
    }
}

/// A root ontology together with everything it imports.
#[derive(Debug, Clone)]
pub struct ImportsClosure {
    ontologies: Vec<Arc<Ontology>>,
}

impl ImportsClosure {
    /// Resolves the imports of `root` against the catalog.
    pub fn new(catalog: &OntologyCatalog, root: &Arc<Ontology>) -> Result<Self, ImportsError> {
        Ok(Self {
            ontologies: catalog.imports_closure(root)?,
        })
    }

    pub fn root(&self) -> Option<&Arc<Ontology>> {
        self.ontologies.first()
    }

    pub fn len(&self) -> usize {
        self.ontologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ontologies.is_empty()
    }
}

impl AxiomSource for ImportsClosure {
    fn imports_closure(&self) -> impl Iterator<Item = &Ontology> {
        self.ontologies.iter().map(|ontology| &**ontology)
    }
}

/// The questions a reasoner answers about named classes and individuals.
///
/// `direct` restricts the answer to the closest classes or to told instances.
pub trait Reasoner {
    /// Computes what the queries need. Queries do it lazily if this was not called.
    fn precompute(&mut self);

    fn is_consistent(&self) -> bool;

    /// Strict superclasses, classes equivalent to `class` excluded.
    fn super_classes(&self, class: &OwlClass, direct: bool) -> Vec<OwlClass>;

    /// Strict subclasses, classes equivalent to `class` excluded.
    fn sub_classes(&self, class: &OwlClass, direct: bool) -> Vec<OwlClass>;

    fn equivalent_classes(&self, class: &OwlClass) -> Vec<OwlClass>;

    fn instances(&self, class: &OwlClass, direct: bool) -> Vec<Individual>;

    fn types(&self, individual: &Individual, direct: bool) -> Vec<OwlClass>;
}

/// A reasoner that only follows told subsumptions between named classes.
///
/// `SubClassOf` and `EquivalentClasses` between named classes build the hierarchy and
/// `ClassAssertion`s of named classes give the types. The ontology is found inconsistent
/// only when an individual falls into `owl:Nothing` or into two classes told disjoint.
///
/// ```
/// use oxontology::{Axiom, ClassExpression, Ontology, OwlClass, Reasoner, StructuralReasoner};
/// use oxrdf::NamedNode;
///
/// let dog = OwlClass::new(NamedNode::new("http://example.com/Dog")?);
/// let animal = OwlClass::new(NamedNode::new("http://example.com/Animal")?);
/// let mut ontology = Ontology::default();
/// ontology.add_axiom(Axiom::SubClassOf {
///     sub_class: ClassExpression::Class(dog.clone()),
///     super_class: ClassExpression::Class(animal.clone()),
/// });
/// let reasoner = StructuralReasoner::new(&ontology);
/// assert_eq!(reasoner.super_classes(&dog, false), [animal]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct StructuralReasoner<S> {
    source: S,
    hierarchy: OnceLock<Hierarchy>,
}

impl<S: AxiomSource> StructuralReasoner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            hierarchy: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn hierarchy(&self) -> &Hierarchy {
        self.hierarchy.get_or_init(|| Hierarchy::build(&self.source))
    }
}

impl<S: AxiomSource> Reasoner for StructuralReasoner<S> {
    fn precompute(&mut self) {
        self.hierarchy();
    }

    fn is_consistent(&self) -> bool {
        self.hierarchy().is_consistent()
    }

    fn super_classes(&self, class: &OwlClass, direct: bool) -> Vec<OwlClass> {
        self.hierarchy().related(class, direct, true)
    }

    fn sub_classes(&self, class: &OwlClass, direct: bool) -> Vec<OwlClass> {
        self.hierarchy().related(class, direct, false)
    }

    fn equivalent_classes(&self, class: &OwlClass) -> Vec<OwlClass> {
        sorted(self.hierarchy().equivalents(class))
    }

    fn instances(&self, class: &OwlClass, direct: bool) -> Vec<Individual> {
        let hierarchy = self.hierarchy();
        let mut classes = hierarchy.equivalents(class);
        classes.insert(class.clone());
        if !direct {
            classes.extend(closure(class, &hierarchy.children));
        }
        let mut instances = hierarchy
            .types
            .iter()
            .filter(|(_, types)| types.iter().any(|t| classes.contains(t)))
            .map(|(individual, _)| individual.clone())
            .collect::<Vec<_>>();
        instances.sort_by_cached_key(ToString::to_string);
        instances
    }

    fn types(&self, individual: &Individual, direct: bool) -> Vec<OwlClass> {
        let hierarchy = self.hierarchy();
        let Some(told) = hierarchy.types.get(individual) else {
            return Vec::new();
        };
        if direct {
            return sorted(told.clone());
        }
        sorted(hierarchy.all_types(told))
    }
}

/// Told class hierarchy and types.
#[derive(Debug, Default)]
struct Hierarchy {
    parents: FxHashMap<OwlClass, FxHashSet<OwlClass>>,
    children: FxHashMap<OwlClass, FxHashSet<OwlClass>>,
    types: FxHashMap<Individual, FxHashSet<OwlClass>>,
    disjoint: FxHashSet<(OwlClass, OwlClass)>,
}

impl Hierarchy {
    fn build(source: &impl AxiomSource) -> Self {
        let mut hierarchy = Self::default();
        for axiom in source.axioms_of_kind(AxiomKind::SubClassOf) {
            if let Axiom::SubClassOf {
                sub_class: ClassExpression::Class(sub),
                super_class: ClassExpression::Class(sup),
            } = axiom.axiom()
            {
                hierarchy.subsume(sub, sup);
            }
        }
        for axiom in source.axioms_of_kind(AxiomKind::EquivalentClasses) {
            if let Axiom::EquivalentClasses(operands) = axiom.axiom() {
                let classes = named(operands);
                for (a, b) in pairs(&classes) {
                    hierarchy.subsume(a, b);
                    hierarchy.subsume(b, a);
                }
            }
        }
        for axiom in source.axioms_of_kind(AxiomKind::DisjointClasses) {
            if let Axiom::DisjointClasses(operands) = axiom.axiom() {
                let classes = named(operands);
                for (a, b) in pairs(&classes) {
                    hierarchy.disjoint.insert((a.clone(), b.clone()));
                    hierarchy.disjoint.insert((b.clone(), a.clone()));
                }
            }
        }
        for axiom in source.axioms_of_kind(AxiomKind::ClassAssertion) {
            if let Axiom::ClassAssertion {
                class: ClassExpression::Class(class),
                individual,
            } = axiom.axiom()
            {
                hierarchy
                    .types
                    .entry(individual.clone())
                    .or_default()
                    .insert(class.clone());
            }
        }
        debug!(
            classes = hierarchy.parents.len() + hierarchy.children.len(),
            individuals = hierarchy.types.len(),
            "told class hierarchy built"
        );
        hierarchy
    }

    fn subsume(&mut self, sub: &OwlClass, sup: &OwlClass) {
        if sub == sup {
            return;
        }
        self.parents
            .entry(sub.clone())
            .or_default()
            .insert(sup.clone());
        self.children
            .entry(sup.clone())
            .or_default()
            .insert(sub.clone());
    }

    /// Classes both above and below `class`, `class` excluded.
    fn equivalents(&self, class: &OwlClass) -> FxHashSet<OwlClass> {
        let below = closure(class, &self.children);
        closure(class, &self.parents)
            .into_iter()
            .filter(|c| c != class && below.contains(c))
            .collect()
    }

    /// The classes one step, or any number of steps, above or below `class`, equivalents
    /// excluded.
    fn related(&self, class: &OwlClass, direct: bool, upward: bool) -> Vec<OwlClass> {
        let edges = if upward { &self.parents } else { &self.children };
        let equivalents = self.equivalents(class);
        let candidates = if direct {
            let mut told = FxHashSet::default();
            for member in equivalents.iter().chain([class]) {
                told.extend(edges.get(member).into_iter().flatten().cloned());
            }
            told
        } else {
            closure(class, edges)
        };
        sorted(
            candidates
                .into_iter()
                .filter(|c| c != class && !equivalents.contains(c))
                .collect(),
        )
    }

    fn all_types(&self, told: &FxHashSet<OwlClass>) -> FxHashSet<OwlClass> {
        let mut types = told.clone();
        for class in told {
            types.extend(closure(class, &self.parents));
        }
        types
    }

    fn is_consistent(&self) -> bool {
        self.types.values().all(|told| {
            let types = self.all_types(told);
            !types.iter().any(|t| t.as_iri_ref() == owl::NOTHING)
                && !types.iter().any(|a| {
                    types
                        .iter()
                        .any(|b| self.disjoint.contains(&(a.clone(), b.clone())))
                })
        })
    }
}

/// Every class reachable from `start` along `edges`, `start` excluded unless on a cycle.
fn closure(
    start: &OwlClass,
    edges: &FxHashMap<OwlClass, FxHashSet<OwlClass>>,
) -> FxHashSet<OwlClass> {
    let mut reached = FxHashSet::default();
    let mut stack = vec![start];
    while let Some(class) = stack.pop() {
        for next in edges.get(class).into_iter().flatten() {
            if reached.insert(next.clone()) {
                stack.push(next);
            }
        }
    }
    reached
}

fn named(operands: &[ClassExpression]) -> Vec<&OwlClass> {
    operands
        .iter()
        .filter_map(|operand| match operand {
            ClassExpression::Class(class) => Some(class),
            _ => None,
        })
        .collect()
}

fn pairs<'a>(classes: &'a [&'a OwlClass]) -> impl Iterator<Item = (&'a OwlClass, &'a OwlClass)> {
    classes
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| classes[i + 1..].iter().map(move |b| (*a, *b)))
}

fn sorted(classes: FxHashSet<OwlClass>) -> Vec<OwlClass> {
    let mut classes = classes.into_iter().collect::<Vec<_>>();
    classes.sort();
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::NamedIndividual;
    use oxrdf::NamedNode;

    fn class(name: &str) -> OwlClass {
        OwlClass::new(NamedNode::new_unchecked(format!("http://example.org/{name}")))
    }

    fn individual(name: &str) -> Individual {
        NamedIndividual::new(NamedNode::new_unchecked(format!("http://example.org/{name}"))).into()
    }

    fn sub_class_of(sub: &str, sup: &str) -> Axiom {
        Axiom::SubClassOf {
            sub_class: ClassExpression::Class(class(sub)),
            super_class: ClassExpression::Class(class(sup)),
        }
    }

    fn assertion(class_name: &str, name: &str) -> Axiom {
        Axiom::ClassAssertion {
            class: ClassExpression::Class(class(class_name)),
            individual: individual(name),
        }
    }

    fn zoo() -> Ontology {
        let mut ontology = Ontology::default();
        ontology.add_axiom(sub_class_of("Dog", "Mammal"));
        ontology.add_axiom(sub_class_of("Mammal", "Animal"));
        ontology.add_axiom(sub_class_of("Hound", "Dog"));
        ontology.add_axiom(Axiom::EquivalentClasses(vec![
            ClassExpression::Class(class("Dog")),
            ClassExpression::Class(class("Canine")),
        ]));
        ontology.add_axiom(assertion("Hound", "rex"));
        ontology.add_axiom(assertion("Mammal", "tom"));
        ontology
    }

    #[test]
    fn test_told_hierarchy() {
        let reasoner = StructuralReasoner::new(zoo());
        assert_eq!(
            reasoner.super_classes(&class("Hound"), false),
            [class("Animal"), class("Canine"), class("Dog"), class("Mammal")]
        );
        assert_eq!(
            reasoner.super_classes(&class("Hound"), true),
            [class("Dog")]
        );
        assert_eq!(reasoner.super_classes(&class("Dog"), true), [class("Mammal")]);
        assert_eq!(reasoner.equivalent_classes(&class("Dog")), [class("Canine")]);
        assert_eq!(reasoner.sub_classes(&class("Canine"), false), [class("Hound")]);
    }

    #[test]
    fn test_instances_and_types() {
        let mut reasoner = StructuralReasoner::new(zoo());
        reasoner.precompute();
        assert_eq!(
            reasoner.instances(&class("Mammal"), false),
            [individual("rex"), individual("tom")]
        );
        assert_eq!(reasoner.instances(&class("Mammal"), true), [individual("tom")]);
        assert_eq!(reasoner.types(&individual("rex"), true), [class("Hound")]);
        assert_eq!(reasoner.types(&individual("rex"), false).len(), 5);
        assert!(reasoner.is_consistent());
    }

    #[test]
    fn test_inconsistency() {
        let mut ontology = zoo();
        ontology.add_axiom(Axiom::DisjointClasses(vec![
            ClassExpression::Class(class("Animal")),
            ClassExpression::Class(class("Plant")),
        ]));
        assert!(StructuralReasoner::new(&ontology).is_consistent());
        ontology.add_axiom(assertion("Plant", "rex"));
        assert!(!StructuralReasoner::new(&ontology).is_consistent());

        let mut empty = Ontology::default();
        empty.add_axiom(Axiom::ClassAssertion {
            class: ClassExpression::Class(OwlClass::new(owl::NOTHING)),
            individual: individual("ghost"),
        });
        assert!(!StructuralReasoner::new(&empty).is_consistent());
    }
}
