//! Working triple set of one loading session.

use oxrdf::{BlankNode, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, Triple};
use oxrdf::vocab::rdf;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TripleId(usize);

/// Position in the consumption log, see [`TripleStore::rollback`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct LogPosition(usize);

/// An indexed set of triples with per-triple consumption flags.
///
/// Triples get a stable [`TripleId`] in insertion order. Removal leaves a tombstone.
/// Consuming a triple is recorded in a log so that a tentative match can be undone.
#[derive(Debug, Default)]
pub(crate) struct TripleStore {
    triples: Vec<Triple>,
    live: Vec<bool>,
    consumed: Vec<bool>,
    ids: FxHashMap<Triple, TripleId>,
    by_subject: FxHashMap<NamedOrBlankNode, Vec<TripleId>>,
    by_predicate: FxHashMap<NamedNode, Vec<TripleId>>,
    by_object: FxHashMap<Term, Vec<TripleId>>,
    log: Vec<TripleId>,
    blank_nodes: FxHashMap<BlankNode, usize>,
}

impl TripleStore {
    /// Adds a triple, returns `None` if it is already present.
    pub fn insert(&mut self, triple: Triple) -> Option<TripleId> {
        if let Some(id) = self.ids.get(&triple) {
            if self.live[id.0] {
                return None;
            }
            let id = *id;
            self.live[id.0] = true;
            self.consumed[id.0] = false;
            return Some(id);
        }
        let id = TripleId(self.triples.len());
        if let NamedOrBlankNode::BlankNode(node) = &triple.subject {
            self.blank_index(node);
        }
        if let Term::BlankNode(node) = &triple.object {
            self.blank_index(node);
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(id);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(id);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .push(id);
        self.ids.insert(triple.clone(), id);
        self.triples.push(triple);
        self.live.push(true);
        self.consumed.push(false);
        Some(id)
    }

    pub fn remove(&mut self, id: TripleId) -> bool {
        std::mem::replace(&mut self.live[id.0], false)
    }

    pub fn get(&self, id: TripleId) -> &Triple {
        &self.triples[id.0]
    }

    pub fn find(&self, triple: &Triple) -> Option<TripleId> {
        self.ids.get(triple).copied().filter(|id| self.live[id.0])
    }

    pub fn len(&self) -> usize {
        self.live.iter().filter(|live| **live).count()
    }

    pub fn is_consumed(&self, id: TripleId) -> bool {
        self.consumed[id.0]
    }

    /// Marks the triple as folded into an axiom.
    pub fn consume(&mut self, id: TripleId) {
        if !self.consumed[id.0] {
            self.consumed[id.0] = true;
            self.log.push(id);
        }
    }

    pub fn checkpoint(&self) -> LogPosition {
        LogPosition(self.log.len())
    }

    /// Un-consumes every triple consumed since the checkpoint.
    pub fn rollback(&mut self, position: LogPosition) {
        for id in self.log.drain(position.0..) {
            self.consumed[id.0] = false;
        }
    }

    fn live_ids<'a>(
        &'a self,
        ids: Option<&'a Vec<TripleId>>,
    ) -> impl Iterator<Item = TripleId> + 'a {
        ids.into_iter()
            .flatten()
            .copied()
            .filter(move |id| self.live[id.0])
    }

    pub fn with_subject<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
    ) -> impl Iterator<Item = TripleId> + 'a {
        self.live_ids(self.by_subject.get(subject))
    }

    pub fn with_predicate<'a>(
        &'a self,
        predicate: NamedNodeRef<'_>,
    ) -> impl Iterator<Item = TripleId> + 'a {
        self.live_ids(self.by_predicate.get(&predicate.into_owned()))
    }

    pub fn with_object<'a>(&'a self, object: &Term) -> impl Iterator<Item = TripleId> + 'a {
        self.live_ids(self.by_object.get(object))
    }

    /// Live triples `(subject, predicate, ?o)`.
    pub fn matching<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = TripleId> + 'a {
        self.with_subject(subject)
            .filter(move |id| self.triples[id.0].predicate == predicate)
    }

    pub fn objects<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.matching(subject, predicate)
            .map(move |id| &self.triples[id.0].object)
    }

    pub fn has_type(&self, subject: &NamedOrBlankNode, class: NamedNodeRef<'_>) -> bool {
        self.objects(subject, rdf::TYPE)
            .any(|o| matches!(o, Term::NamedNode(o) if o.as_ref() == class))
    }

    /// Named `rdf:type` values of the subject.
    pub fn types<'a>(
        &'a self,
        subject: &NamedOrBlankNode,
    ) -> impl Iterator<Item = &'a NamedNode> + 'a {
        self.objects(subject, rdf::TYPE).filter_map(|o| match o {
            Term::NamedNode(o) => Some(o),
            _ => None,
        })
    }

    /// Live triples not consumed yet, in insertion order.
    pub fn unconsumed(&self) -> impl Iterator<Item = TripleId> + '_ {
        (0..self.triples.len())
            .filter(move |i| self.live[*i] && !self.consumed[*i])
            .map(TripleId)
    }

    /// Index of the first occurrence of the blank node, registering it if it is new.
    pub fn blank_index(&mut self, node: &BlankNode) -> usize {
        let next = self.blank_nodes.len();
        *self.blank_nodes.entry(node.clone()).or_insert(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::Literal;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn triple(s: &str, p: &str, o: impl Into<Term>) -> Triple {
        Triple::new(iri(s), iri(p), o)
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut store = TripleStore::default();
        assert!(store.insert(triple("a", "p", iri("b"))).is_some());
        assert!(store.insert(triple("a", "p", iri("b"))).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rollback_restores_consumption() {
        let mut store = TripleStore::default();
        let (Some(first), Some(second)) = (
            store.insert(triple("a", "p", iri("b"))),
            store.insert(triple("a", "q", Literal::new_simple_literal("v"))),
        ) else {
            panic!("both triples are new");
        };
        store.consume(first);
        let checkpoint = store.checkpoint();
        store.consume(second);
        store.consume(first);
        store.rollback(checkpoint);
        assert!(store.is_consumed(first));
        assert!(!store.is_consumed(second));
        assert_eq!(store.unconsumed().collect::<Vec<_>>(), [second]);
    }

    #[test]
    fn test_removed_triples_are_invisible() {
        let mut store = TripleStore::default();
        let Some(id) = store.insert(triple("a", "p", iri("b"))) else {
            panic!("the triple is new");
        };
        assert!(store.remove(id));
        assert_eq!(store.with_subject(&iri("a").into()).count(), 0);
        assert!(store.find(&triple("a", "p", iri("b"))).is_none());
        assert_eq!(store.insert(triple("a", "p", iri("b"))), Some(id));
    }

    #[test]
    fn test_blank_node_first_occurrence() {
        let mut store = TripleStore::default();
        let x = BlankNode::new_unchecked("x");
        let y = BlankNode::new_unchecked("y");
        store.insert(Triple::new(y.clone(), iri("p"), x.clone()));
        store.insert(Triple::new(x.clone(), iri("p"), iri("b")));
        assert_eq!(store.blank_index(&y), 0);
        assert_eq!(store.blank_index(&x), 1);
    }
}
