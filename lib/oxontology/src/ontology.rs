//! OWL 2 ontology structure.

use crate::annotation::{Annotation, AnnotationSubject};
use crate::axiom::{AnnotatedAxiom, Axiom, AxiomKind};
use crate::entity::{
    AnnotationProperty, DataProperty, Datatype, Entity, EntityKind, NamedIndividual,
    ObjectProperty, OwlClass,
};
use crate::expression::ClassExpression;
use crate::internals::AxiomIndex;
use oxrdf::{BlankNode, NamedNode};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The identity of an ontology: an optional ontology IRI and an optional version IRI.
///
/// A version IRI is only allowed when there is an ontology IRI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OntologyId {
    ontology_iri: Option<NamedNode>,
    version_iri: Option<NamedNode>,
}

impl OntologyId {
    /// An anonymous ontology.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(ontology_iri: impl Into<NamedNode>) -> Self {
        Self {
            ontology_iri: Some(ontology_iri.into()),
            version_iri: None,
        }
    }

    /// Sets the version IRI. Ignored on an anonymous ontology.
    #[must_use]
    pub fn with_version(mut self, version_iri: impl Into<NamedNode>) -> Self {
        if self.ontology_iri.is_some() {
            self.version_iri = Some(version_iri.into());
        }
        self
    }

    pub fn ontology_iri(&self) -> Option<&NamedNode> {
        self.ontology_iri.as_ref()
    }

    pub fn version_iri(&self) -> Option<&NamedNode> {
        self.version_iri.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.ontology_iri.is_none()
    }
}

/// An OWL 2 ontology: a set of annotated axioms with a header.
///
/// Reads go through `&Ontology` and mutations through `&mut Ontology`, so the borrow checker
/// provides the shared read / exclusive write discipline. Every mutation updates the axiom
/// index before returning. Use [`SharedOntology`] to mutate a published ontology from several
/// threads.
///
/// ```
/// use oxontology::{Axiom, ClassExpression, EntityKind, Ontology, OntologyId};
/// use oxrdf::NamedNode;
///
/// let a = NamedNode::new("http://example.org/A")?;
/// let b = NamedNode::new("http://example.org/B")?;
/// let mut ontology = Ontology::new(OntologyId::named(NamedNode::new("http://example.org/o")?));
/// ontology.add_axiom(Axiom::SubClassOf {
///     sub_class: ClassExpression::class(a.clone()),
///     super_class: ClassExpression::class(b),
/// });
/// assert_eq!(ontology.referencing_axioms(&EntityKind::Class.entity(a)).count(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    id: OntologyId,
    document_iri: Option<NamedNode>,
    imports: Vec<NamedNode>,
    annotations: Vec<Annotation>,
    index: AxiomIndex,
}

impl Ontology {
    pub fn new(id: OntologyId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> &OntologyId {
        &self.id
    }

    pub fn set_id(&mut self, id: OntologyId) {
        self.id = id;
    }

    /// The IRI of the document this ontology was loaded from, if any.
    pub fn document_iri(&self) -> Option<&NamedNode> {
        self.document_iri.as_ref()
    }

    pub fn set_document_iri(&mut self, iri: impl Into<NamedNode>) {
        self.document_iri = Some(iri.into());
    }

    /// IRIs of the directly imported ontologies.
    pub fn imports(&self) -> &[NamedNode] {
        &self.imports
    }

    pub fn add_import(&mut self, iri: impl Into<NamedNode>) {
        let iri = iri.into();
        if !self.imports.contains(&iri) {
            self.imports.push(iri);
        }
    }

    /// Ontology annotations from the header.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    /// Adds an axiom, returns whether the axiom set changed.
    pub fn add_axiom(&mut self, axiom: impl Into<AnnotatedAxiom>) -> bool {
        self.index.insert(axiom.into())
    }

    /// Removes an axiom, returns whether the axiom set changed.
    pub fn remove_axiom(&mut self, axiom: &AnnotatedAxiom) -> bool {
        self.index.remove(axiom)
    }

    pub fn contains_axiom(&self, axiom: &AnnotatedAxiom) -> bool {
        self.index.contains(axiom)
    }

    /// Whether the axiom is present with any set of annotations.
    pub fn contains_axiom_ignoring_annotations(&self, axiom: &Axiom) -> bool {
        let mut axiom = axiom.clone();
        axiom.normalize();
        self.index.contains_ignoring_annotations(&axiom)
    }

    /// The versions of the axiom present in the ontology, one per set of annotations.
    pub fn annotated_versions(&self, axiom: &Axiom) -> Vec<&AnnotatedAxiom> {
        let mut axiom = axiom.clone();
        axiom.normalize();
        self.index.annotated_versions(&axiom).collect()
    }

    /// Every axiom, in insertion order.
    pub fn axioms(&self) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.iter()
    }

    pub fn axiom_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn axioms_of_kind(&self, kind: AxiomKind) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.of_kind(kind)
    }

    pub fn logical_axioms(&self) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.iter().filter(|axiom| axiom.kind().is_logical())
    }

    pub fn logical_axiom_count(&self) -> usize {
        self.logical_axioms().count()
    }

    /// Axioms referencing the entity in any position.
    pub fn referencing_axioms(&self, entity: &Entity) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.referencing(entity.kind(), entity.iri())
    }

    /// Axioms using the IRI as an entity of any kind, as an annotation subject or as an
    /// annotation value.
    pub fn axioms_mentioning_iri(&self, iri: &NamedNode) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.mentioning_iri(iri)
    }

    pub fn axioms_mentioning_anonymous(
        &self,
        node: &BlankNode,
    ) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.index.mentioning_anonymous(node)
    }

    /// Annotation assertions whose subject is the IRI.
    pub fn annotation_assertions<'a>(
        &'a self,
        subject: &'a NamedNode,
    ) -> impl Iterator<Item = &'a AnnotatedAxiom> + 'a {
        self.index.mentioning_iri(subject).filter(move |axiom| {
            matches!(
                axiom.axiom(),
                Axiom::AnnotationAssertion { subject: AnnotationSubject::Iri(s), .. } if s == subject
            )
        })
    }

    /// Declarations of entities with the given IRI, of any kind.
    pub fn declarations<'a>(
        &'a self,
        iri: &'a NamedNode,
    ) -> impl Iterator<Item = &'a AnnotatedAxiom> + 'a {
        self.index
            .mentioning_iri(iri)
            .filter(move |axiom| matches!(axiom.axiom(), Axiom::Declaration(e) if e.iri() == iri))
    }

    /// Every entity referenced by an axiom.
    pub fn signature(&self) -> impl Iterator<Item = Entity> + '_ {
        EntityKind::ALL.into_iter().flat_map(move |kind| {
            self.index
                .signature(kind)
                .map(move |iri| kind.entity(iri.clone()))
        })
    }

    pub fn entities_in_signature(&self, kind: EntityKind) -> impl Iterator<Item = &NamedNode> {
        self.index.signature(kind)
    }

    pub fn classes_in_signature(&self) -> impl Iterator<Item = OwlClass> + '_ {
        self.index.signature(EntityKind::Class).cloned().map(OwlClass::new)
    }

    pub fn object_properties_in_signature(&self) -> impl Iterator<Item = ObjectProperty> + '_ {
        self.index
            .signature(EntityKind::ObjectProperty)
            .cloned()
            .map(ObjectProperty::new)
    }

    pub fn data_properties_in_signature(&self) -> impl Iterator<Item = DataProperty> + '_ {
        self.index
            .signature(EntityKind::DataProperty)
            .cloned()
            .map(DataProperty::new)
    }

    pub fn annotation_properties_in_signature(
        &self,
    ) -> impl Iterator<Item = AnnotationProperty> + '_ {
        self.index
            .signature(EntityKind::AnnotationProperty)
            .cloned()
            .map(AnnotationProperty::new)
    }

    pub fn datatypes_in_signature(&self) -> impl Iterator<Item = Datatype> + '_ {
        self.index
            .signature(EntityKind::Datatype)
            .cloned()
            .map(Datatype::new)
    }

    pub fn individuals_in_signature(&self) -> impl Iterator<Item = NamedIndividual> + '_ {
        self.index
            .signature(EntityKind::NamedIndividual)
            .cloned()
            .map(NamedIndividual::new)
    }

    pub fn anonymous_individuals(&self) -> impl Iterator<Item = &BlankNode> {
        self.index.anonymous_individuals()
    }

    pub fn contains_entity(&self, entity: &Entity) -> bool {
        self.index.contains_entity(entity.kind(), entity.iri())
    }

    /// Named classes asserted as direct superclasses of the class.
    pub fn direct_super_classes<'a>(
        &'a self,
        class: &'a OwlClass,
    ) -> impl Iterator<Item = &'a OwlClass> + 'a {
        self.index
            .referencing(EntityKind::Class, class.iri())
            .filter_map(move |axiom| match axiom.axiom() {
                Axiom::SubClassOf {
                    sub_class: ClassExpression::Class(sub),
                    super_class: ClassExpression::Class(sup),
                } if sub == class => Some(sup),
                _ => None,
            })
    }

    /// Named classes asserted as direct subclasses of the class.
    pub fn direct_sub_classes<'a>(
        &'a self,
        class: &'a OwlClass,
    ) -> impl Iterator<Item = &'a OwlClass> + 'a {
        self.index
            .referencing(EntityKind::Class, class.iri())
            .filter_map(move |axiom| match axiom.axiom() {
                Axiom::SubClassOf {
                    sub_class: ClassExpression::Class(sub),
                    super_class: ClassExpression::Class(sup),
                } if sup == class => Some(sub),
                _ => None,
            })
    }

    /// Relabels every anonymous individual `c0`, `c1`, ... in an order that does not depend on
    /// the current labels, so two ontologies that only differ by their blank node labels end up
    /// with the same axioms.
    ///
    /// Each anonymous individual is keyed by the renderings of the axioms it occurs in, the
    /// other anonymous individuals being replaced by their own keys, until the keys stop
    /// splitting. Individuals no axiom tells apart are then taken one at a time and the keys
    /// refined again.
    pub fn canonicalize_anonymous_individuals(&mut self) {
        let axioms = self.index.iter().cloned().collect::<Vec<_>>();
        let occurrences = axioms
            .iter()
            .map(|axiom| {
                let mut nodes = Vec::new();
                axiom.clone().relabel_anonymous(&mut |node| {
                    if !nodes.contains(node) {
                        nodes.push(node.clone());
                    }
                    node.clone()
                });
                nodes
            })
            .collect::<Vec<_>>();

        let mut colours = occurrences
            .iter()
            .flatten()
            .map(|node| (node.clone(), 0))
            .collect::<FxHashMap<_, _>>();
        let mut count = usize::from(!colours.is_empty());
        while count < colours.len() {
            let (refined, refined_count) = refine(&axioms, &occurrences, &colours);
            colours = refined;
            if refined_count > count {
                count = refined_count;
                continue;
            }
            // The keys are stable: single out one of the smallest tied group.
            let mut sizes = FxHashMap::<usize, usize>::default();
            for colour in colours.values() {
                *sizes.entry(*colour).or_default() += 1;
            }
            let Some(chosen) = colours
                .iter()
                .filter(|(_, colour)| sizes.get(*colour).is_some_and(|size| *size > 1))
                .min_by(|(a, a_colour), (b, b_colour)| {
                    (sizes.get(*a_colour), *a_colour, a.as_str())
                        .cmp(&(sizes.get(*b_colour), *b_colour, b.as_str()))
                })
                .map(|(node, _)| node.clone())
            else {
                break;
            };
            (colours, count) = rank(
                colours
                    .into_iter()
                    .map(|(node, colour)| {
                        let singled = node != chosen;
                        (node, (colour, singled))
                    })
                    .collect(),
            );
        }

        let mapping = colours
            .into_iter()
            .map(|(node, colour)| (node, BlankNode::new_unchecked(format!("c{colour}"))))
            .collect::<FxHashMap<_, _>>();
        self.index = AxiomIndex::default();
        for mut axiom in axioms {
            axiom.relabel_anonymous(&mut |node| {
                mapping.get(node).cloned().unwrap_or_else(|| node.clone())
            });
            self.index.insert(axiom);
        }
    }

    /// Whether both ontologies contain exactly the same annotated axioms.
    pub fn same_axioms(&self, other: &Self) -> bool {
        self.axiom_count() == other.axiom_count()
            && self.axioms().all(|axiom| other.contains_axiom(axiom))
    }
}

/// Splits the anonymous individuals by the axioms they occur in, given the current keys.
fn refine(
    axioms: &[AnnotatedAxiom],
    occurrences: &[Vec<BlankNode>],
    colours: &FxHashMap<BlankNode, usize>,
) -> (FxHashMap<BlankNode, usize>, usize) {
    let mut signatures = colours
        .iter()
        .map(|(node, colour)| (node.clone(), (*colour, Vec::new())))
        .collect::<FxHashMap<_, (usize, Vec<String>)>>();
    for (axiom, nodes) in axioms.iter().zip(occurrences) {
        for node in nodes {
            let mut rendered = axiom.clone();
            rendered.relabel_anonymous(&mut |other| {
                if other == node {
                    BlankNode::new_unchecked("self")
                } else {
                    let colour = colours.get(other).copied().unwrap_or_default();
                    BlankNode::new_unchecked(format!("k{colour}"))
                }
            });
            if let Some((_, renderings)) = signatures.get_mut(node) {
                renderings.push(rendered.to_string());
            }
        }
    }
    for (_, renderings) in signatures.values_mut() {
        renderings.sort_unstable();
    }
    rank(signatures)
}

/// Numbers the distinct keys in increasing order.
fn rank<K: Ord + Clone>(keys: FxHashMap<BlankNode, K>) -> (FxHashMap<BlankNode, usize>, usize) {
    let mut distinct = keys.values().cloned().collect::<Vec<_>>();
    distinct.sort_unstable();
    distinct.dedup();
    let colours = keys
        .into_iter()
        .map(|(node, key)| {
            let colour = distinct.binary_search(&key).unwrap_or_default();
            (node, colour)
        })
        .collect();
    (colours, distinct.len())
}

/// An ontology that can be read and mutated from several threads.
///
/// Writers hold an exclusive lock for the whole add or remove, so readers never observe a
/// partially updated index.
#[derive(Debug, Clone, Default)]
pub struct SharedOntology(Arc<RwLock<Ontology>>);

impl SharedOntology {
    pub fn new(ontology: Ontology) -> Self {
        Self(Arc::new(RwLock::new(ontology)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Ontology> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Ontology> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Ontology> for SharedOntology {
    fn from(ontology: Ontology) -> Self {
        Self::new(ontology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Individual;
    use std::thread;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn class(name: &str) -> OwlClass {
        OwlClass::new(iri(name))
    }

    fn sub_class_of(sub: &str, sup: &str) -> Axiom {
        Axiom::SubClassOf {
            sub_class: class(sub).into(),
            super_class: class(sup).into(),
        }
    }

    #[test]
    fn test_ontology_id() {
        assert!(OntologyId::anonymous().is_anonymous());
        assert_eq!(OntologyId::anonymous().with_version(iri("v1")).version_iri(), None);
        let id = OntologyId::named(iri("o")).with_version(iri("v1"));
        assert_eq!(id.ontology_iri(), Some(&iri("o")));
        assert_eq!(id.version_iri(), Some(&iri("v1")));
    }

    #[test]
    fn test_told_hierarchy() {
        let mut ontology = Ontology::default();
        ontology.add_axiom(sub_class_of("Dog", "Mammal"));
        ontology.add_axiom(sub_class_of("Cat", "Mammal"));
        ontology.add_axiom(sub_class_of("Mammal", "Animal"));

        let mut subs = ontology
            .direct_sub_classes(&class("Mammal"))
            .map(|c| c.iri().as_str().to_owned())
            .collect::<Vec<_>>();
        subs.sort();
        assert_eq!(subs, ["http://example.org/Cat", "http://example.org/Dog"]);
        assert_eq!(
            ontology.direct_super_classes(&class("Mammal")).collect::<Vec<_>>(),
            [&class("Animal")]
        );
    }

    #[test]
    fn test_canonicalization() {
        let build = |labels: [&str; 2]| {
            let mut ontology = Ontology::default();
            for (label, name) in labels.iter().zip(["A", "B"]) {
                ontology.add_axiom(Axiom::ClassAssertion {
                    class: class(name).into(),
                    individual: Individual::Anonymous(BlankNode::new_unchecked(*label)),
                });
            }
            ontology
        };
        let mut left = build(["x1", "x2"]);
        let mut right = build(["y7", "y3"]);
        assert!(!left.same_axioms(&right));
        left.canonicalize_anonymous_individuals();
        right.canonicalize_anonymous_individuals();
        assert!(left.same_axioms(&right));
        assert_eq!(left.anonymous_individuals().count(), 2);
    }

    #[test]
    fn test_canonicalization_ignores_insertion_order() {
        let owns = ObjectProperty::new(iri("owns"));
        let axioms = |first: &str, second: &str| {
            let anonymous = |label: &str| Individual::Anonymous(BlankNode::new_unchecked(label));
            [
                Axiom::ClassAssertion {
                    class: class("A").into(),
                    individual: anonymous(first),
                },
                Axiom::ObjectPropertyAssertion {
                    property: owns.clone().into(),
                    subject: anonymous(first),
                    object: NamedIndividual::new(iri("a")).into(),
                },
                Axiom::ClassAssertion {
                    class: class("A").into(),
                    individual: anonymous(second),
                },
                Axiom::ObjectPropertyAssertion {
                    property: owns.clone().into(),
                    subject: anonymous(second),
                    object: NamedIndividual::new(iri("b")).into(),
                },
            ]
        };
        let mut left = Ontology::default();
        for axiom in axioms("x1", "x2") {
            left.add_axiom(axiom);
        }
        let mut right = Ontology::default();
        for axiom in axioms("y2", "y1").into_iter().rev() {
            right.add_axiom(axiom);
        }
        left.canonicalize_anonymous_individuals();
        right.canonicalize_anonymous_individuals();
        assert!(left.same_axioms(&right));

        // Individuals nothing tells apart still get one label each.
        let twins = |labels: [&str; 2]| {
            let mut ontology = Ontology::default();
            for label in labels {
                ontology.add_axiom(Axiom::ClassAssertion {
                    class: class("A").into(),
                    individual: Individual::Anonymous(BlankNode::new_unchecked(label)),
                });
            }
            ontology.canonicalize_anonymous_individuals();
            ontology
        };
        let twins_left = twins(["p", "q"]);
        assert!(twins_left.same_axioms(&twins(["z", "a"])));
        assert_eq!(twins_left.anonymous_individuals().count(), 2);
    }

    #[test]
    fn test_shared_ontology() {
        let shared = SharedOntology::default();
        let handles = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .write()
                        .add_axiom(sub_class_of(&format!("C{i}"), "Top"));
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        let ontology = shared.read();
        assert_eq!(ontology.axiom_count(), 4);
        assert_eq!(ontology.direct_sub_classes(&class("Top")).count(), 4);
    }
}
