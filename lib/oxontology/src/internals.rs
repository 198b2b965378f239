//! Multi-key index over the axioms of an ontology.
//!
//! Every axiom lives in one slot of an append-only vector. Removed axioms leave a tombstone so
//! that identifiers stay stable and iteration keeps insertion order. Secondary maps are keyed
//! first by a coarse dimension (axiom kind, entity kind) and then by the fine key, and are
//! updated in the same call that changes the slot vector.

use crate::axiom::{AnnotatedAxiom, Axiom, AxiomKind, ComponentVisitor};
use crate::entity::EntityKind;
use oxrdf::{BlankNode, NamedNode, NamedNodeRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct AxiomId(usize);

type Postings = BTreeSet<AxiomId>;

#[derive(Debug, Default, Clone)]
pub(crate) struct AxiomIndex {
    slots: Vec<Option<AnnotatedAxiom>>,
    live: usize,
    by_axiom: FxHashMap<AnnotatedAxiom, AxiomId>,
    by_logical: FxHashMap<Axiom, Postings>,
    by_kind: FxHashMap<AxiomKind, Postings>,
    by_entity: FxHashMap<EntityKind, FxHashMap<NamedNode, Postings>>,
    by_anonymous: FxHashMap<BlankNode, Postings>,
    by_iri: FxHashMap<NamedNode, Postings>,
}

/// The keys an axiom is filed under.
#[derive(Default)]
struct Keys {
    entities: FxHashSet<(EntityKind, NamedNode)>,
    anonymous: FxHashSet<BlankNode>,
    iris: FxHashSet<NamedNode>,
}

impl ComponentVisitor for Keys {
    fn visit_entity(&mut self, kind: EntityKind, iri: NamedNodeRef<'_>) {
        self.entities.insert((kind, iri.into_owned()));
    }

    fn visit_anonymous(&mut self, node: &BlankNode) {
        self.anonymous.insert(node.clone());
    }

    fn visit_iri(&mut self, iri: NamedNodeRef<'_>) {
        self.iris.insert(iri.into_owned());
    }
}

impl Keys {
    fn of(axiom: &AnnotatedAxiom) -> Self {
        let mut keys = Self::default();
        axiom.walk(&mut keys);
        keys
    }
}

fn post<K: Eq + std::hash::Hash>(map: &mut FxHashMap<K, Postings>, key: K, id: AxiomId) {
    map.entry(key).or_default().insert(id);
}

fn unpost<K: Eq + std::hash::Hash>(map: &mut FxHashMap<K, Postings>, key: K, id: AxiomId) {
    if let Entry::Occupied(mut entry) = map.entry(key) {
        entry.get_mut().remove(&id);
        if entry.get().is_empty() {
            entry.remove();
        }
    }
}

impl AxiomIndex {
    /// Adds the axiom, returns `false` if it was already present.
    pub fn insert(&mut self, axiom: AnnotatedAxiom) -> bool {
        if self.by_axiom.contains_key(&axiom) {
            return false;
        }
        let id = AxiomId(self.slots.len());
        let keys = Keys::of(&axiom);
        post(&mut self.by_kind, axiom.kind(), id);
        post(&mut self.by_logical, axiom.axiom().clone(), id);
        for (kind, iri) in keys.entities {
            post(self.by_entity.entry(kind).or_default(), iri, id);
        }
        for node in keys.anonymous {
            post(&mut self.by_anonymous, node, id);
        }
        for iri in keys.iris {
            post(&mut self.by_iri, iri, id);
        }
        self.by_axiom.insert(axiom.clone(), id);
        self.slots.push(Some(axiom));
        self.live += 1;
        true
    }

    /// Removes the axiom, returns `false` if it was not present.
    pub fn remove(&mut self, axiom: &AnnotatedAxiom) -> bool {
        let Some(id) = self.by_axiom.remove(axiom) else {
            return false;
        };
        let keys = Keys::of(axiom);
        unpost(&mut self.by_kind, axiom.kind(), id);
        unpost(&mut self.by_logical, axiom.axiom().clone(), id);
        for (kind, iri) in keys.entities {
            if let Entry::Occupied(mut by_iri) = self.by_entity.entry(kind) {
                unpost(by_iri.get_mut(), iri, id);
                if by_iri.get().is_empty() {
                    by_iri.remove();
                }
            }
        }
        for node in keys.anonymous {
            unpost(&mut self.by_anonymous, node, id);
        }
        for iri in keys.iris {
            unpost(&mut self.by_iri, iri, id);
        }
        self.slots[id.0] = None;
        self.live -= 1;
        true
    }

    pub fn contains(&self, axiom: &AnnotatedAxiom) -> bool {
        self.by_axiom.contains_key(axiom)
    }

    pub fn contains_ignoring_annotations(&self, axiom: &Axiom) -> bool {
        self.by_logical.contains_key(axiom)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn get(&self, id: AxiomId) -> Option<&AnnotatedAxiom> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn resolve<'a>(
        &'a self,
        postings: Option<&'a Postings>,
    ) -> impl Iterator<Item = &'a AnnotatedAxiom> + 'a {
        postings
            .into_iter()
            .flatten()
            .filter_map(move |id| self.get(*id))
    }

    /// Every axiom, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.slots.iter().flatten()
    }

    pub fn of_kind(&self, kind: AxiomKind) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.resolve(self.by_kind.get(&kind))
    }

    /// All annotated versions of the given axiom.
    pub fn annotated_versions(&self, axiom: &Axiom) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.resolve(self.by_logical.get(axiom))
    }

    pub fn referencing(
        &self,
        kind: EntityKind,
        iri: &NamedNode,
    ) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.resolve(self.by_entity.get(&kind).and_then(|by_iri| by_iri.get(iri)))
    }

    /// Axioms using the IRI as an entity of any kind or as an annotation subject or value.
    pub fn mentioning_iri(&self, iri: &NamedNode) -> impl Iterator<Item = &AnnotatedAxiom> {
        let mut ids = Postings::new();
        for by_iri in self.by_entity.values() {
            if let Some(postings) = by_iri.get(iri) {
                ids.extend(postings);
            }
        }
        if let Some(postings) = self.by_iri.get(iri) {
            ids.extend(postings);
        }
        ids.into_iter().filter_map(move |id| self.get(id))
    }

    pub fn mentioning_anonymous(&self, node: &BlankNode) -> impl Iterator<Item = &AnnotatedAxiom> {
        self.resolve(self.by_anonymous.get(node))
    }

    /// The IRIs used as entities of the given kind.
    pub fn signature(&self, kind: EntityKind) -> impl Iterator<Item = &NamedNode> {
        self.by_entity.get(&kind).into_iter().flat_map(|by_iri| by_iri.keys())
    }

    pub fn contains_entity(&self, kind: EntityKind, iri: &NamedNode) -> bool {
        self.by_entity
            .get(&kind)
            .is_some_and(|by_iri| by_iri.contains_key(iri))
    }

    pub fn anonymous_individuals(&self) -> impl Iterator<Item = &BlankNode> {
        self.by_anonymous.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, AnnotationSubject, AnnotationValue};
    use crate::entity::{AnnotationProperty, Individual};
    use crate::expression::ClassExpression;
    use oxrdf::Literal;
    use oxrdf::vocab::rdfs;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn sub_class_of(sub: &str, sup: &str) -> AnnotatedAxiom {
        Axiom::SubClassOf {
            sub_class: ClassExpression::class(iri(sub)),
            super_class: ClassExpression::class(iri(sup)),
        }
        .into()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut index = AxiomIndex::default();
        assert!(index.insert(sub_class_of("A", "B")));
        assert!(!index.insert(sub_class_of("A", "B")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_updates_every_map() {
        let mut index = AxiomIndex::default();
        index.insert(sub_class_of("A", "B"));
        index.insert(sub_class_of("A", "C"));
        index.insert(sub_class_of("D", "A"));
        assert_eq!(index.referencing(EntityKind::Class, &iri("A")).count(), 3);

        assert!(index.remove(&sub_class_of("A", "C")));
        assert!(!index.remove(&sub_class_of("A", "C")));
        assert_eq!(index.referencing(EntityKind::Class, &iri("A")).count(), 2);
        assert_eq!(index.of_kind(AxiomKind::SubClassOf).count(), 2);
        assert!(!index.contains_entity(EntityKind::Class, &iri("C")));
        assert_eq!(index.signature(EntityKind::Class).count(), 3);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut index = AxiomIndex::default();
        index.insert(sub_class_of("C", "D"));
        index.insert(sub_class_of("A", "B"));
        index.insert(sub_class_of("E", "F"));
        index.remove(&sub_class_of("A", "B"));
        let order = index.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            order,
            [
                sub_class_of("C", "D").to_string(),
                sub_class_of("E", "F").to_string()
            ]
        );
    }

    #[test]
    fn test_logical_lookup_ignores_annotations() {
        let mut index = AxiomIndex::default();
        let (axiom, _) = sub_class_of("A", "B").into_parts();
        index.insert(axiom.clone().annotated(vec![Annotation::new(
            rdfs::COMMENT,
            Literal::new_simple_literal("note"),
        )]));
        assert!(index.contains_ignoring_annotations(&axiom));
        assert!(!index.contains(&sub_class_of("A", "B")));
        assert_eq!(index.annotated_versions(&axiom).count(), 1);
    }

    #[test]
    fn test_annotation_subjects_are_not_entities() {
        let mut index = AxiomIndex::default();
        index.insert(
            Axiom::AnnotationAssertion {
                property: AnnotationProperty::from(rdfs::LABEL),
                subject: AnnotationSubject::Iri(iri("A")),
                value: AnnotationValue::Literal(Literal::new_simple_literal("a")),
            }
            .into(),
        );
        assert_eq!(index.mentioning_iri(&iri("A")).count(), 1);
        assert_eq!(index.signature(EntityKind::Class).count(), 0);
    }

    #[test]
    fn test_anonymous_postings() {
        let mut index = AxiomIndex::default();
        let node = BlankNode::new_unchecked("x");
        let assertion = AnnotatedAxiom::from(Axiom::ClassAssertion {
            class: ClassExpression::class(iri("A")),
            individual: Individual::Anonymous(node.clone()),
        });
        index.insert(assertion.clone());
        assert_eq!(index.mentioning_anonymous(&node).count(), 1);
        index.remove(&assertion);
        assert_eq!(index.mentioning_anonymous(&node).count(), 0);
        assert_eq!(index.anonymous_individuals().count(), 0);
    }
}
