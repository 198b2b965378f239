//! `rdf:first`/`rdf:rest` collections.

use super::consumer::{Consumer, Translation, resource};
use crate::entity::Individual;
use crate::error::{TranslationError, TranslationErrorKind};
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression};
use crate::vocab::swrl;
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNodeRef, NamedOrBlankNode, Term};
use rustc_hash::FxHashSet;

impl Consumer<'_> {
    /// Reads the elements of the list starting at `head`, consuming its structural triples.
    ///
    /// The walk is iterative and bounded by the configured maximal list length.
    /// Cycles, forks, and missing `rdf:first` or `rdf:rest` are [`TranslationErrorKind::MalformedList`].
    pub(super) fn read_list(&mut self, head: &Term) -> Translation<Vec<Term>> {
        let mut elements = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = head.clone();
        loop {
            let node = match &current {
                Term::NamedNode(iri) if *iri == rdf::NIL => return Ok(elements),
                _ => resource(&current).ok_or_else(|| {
                    malformed(head, format!("{current} cannot be a list node"))
                })?,
            };
            if !visited.insert(node.clone()) {
                return Err(malformed(head, format!("the list loops back to {node}")).into());
            }
            if elements.len() >= self.config.max_list_length {
                return Err(malformed(
                    head,
                    format!(
                        "the list is longer than {} elements",
                        self.config.max_list_length
                    ),
                )
                .into());
            }
            elements.push(self.list_step(&node, rdf::FIRST, head)?);
            current = self.list_step(&node, rdf::REST, head)?;
            for id in self.store.matching(&node, rdf::TYPE).collect::<Vec<_>>() {
                let object = &self.store.get(id).object;
                if matches!(object, Term::NamedNode(t) if *t == rdf::LIST || *t == swrl::ATOM_LIST) {
                    self.store.consume(id);
                }
            }
        }
    }

    fn list_step(
        &mut self,
        node: &NamedOrBlankNode,
        predicate: NamedNodeRef<'_>,
        head: &Term,
    ) -> Translation<Term> {
        let ids = self.store.matching(node, predicate).collect::<Vec<_>>();
        match ids.as_slice() {
            [id] => {
                self.store.consume(*id);
                Ok(self.store.get(*id).object.clone())
            }
            [] => Err(malformed(head, format!("{node} has no {predicate}")).into()),
            _ => Err(malformed(head, format!("{node} has several {predicate} values"))
                .with_triples(ids.iter().map(|id| self.store.get(*id).clone()))
                .into()),
        }
    }

    /// Reads a list of operands, warning about an empty one.
    fn operands(&mut self, head: &Term) -> Translation<Vec<Term>> {
        let elements = self.read_list(head)?;
        if elements.is_empty() {
            self.recover(
                TranslationError::warning(
                    TranslationErrorKind::InvalidValue,
                    "the operand list is empty",
                )
                .with_node(head.clone()),
            )?;
        }
        Ok(elements)
    }

    pub(super) fn class_list(&mut self, head: &Term) -> Translation<Vec<ClassExpression>> {
        self.operands(head)?
            .iter()
            .map(|element| self.class_expression(element))
            .collect()
    }

    pub(super) fn data_range_list(&mut self, head: &Term) -> Translation<Vec<DataRange>> {
        self.operands(head)?
            .iter()
            .map(|element| self.data_range(element))
            .collect()
    }

    pub(super) fn individual_list(&mut self, head: &Term) -> Translation<Vec<Individual>> {
        self.operands(head)?
            .iter()
            .map(|element| self.individual(element))
            .collect()
    }

    pub(super) fn literal_list(&mut self, head: &Term) -> Translation<Vec<Literal>> {
        self.operands(head)?
            .iter()
            .map(|element| self.literal(element))
            .collect()
    }

    pub(super) fn object_property_list(
        &mut self,
        head: &Term,
    ) -> Translation<Vec<ObjectPropertyExpression>> {
        self.operands(head)?
            .iter()
            .map(|element| self.object_property_expression(element))
            .collect()
    }
}

fn malformed(head: &Term, message: String) -> TranslationError {
    TranslationError::new(TranslationErrorKind::MalformedList, message).with_node(head.clone())
}
