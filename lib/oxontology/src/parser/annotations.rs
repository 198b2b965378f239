//! Annotations: on the ontology header, on n-ary axiom nodes, on reified axioms and on
//! other annotations.

use super::consumer::{Consumer, PropertyKind, Translation, invalid, resource};
use super::store::TripleId;
use crate::annotation::Annotation;
use crate::entity::EntityKind;
use crate::error::{OntologyParseError, TranslationError, TranslationErrorKind};
use crate::vocab::{self, owl};
use oxrdf::vocab::rdf;
use oxrdf::{NamedNode, NamedOrBlankNode, Term, Triple};
use tracing::debug;

impl Consumer<'_> {
    /// Reads the annotations carried directly by a node, consuming their triples.
    pub(super) fn annotations_on(&mut self, node: &NamedOrBlankNode) -> Translation<Vec<Annotation>> {
        let ids = self
            .store
            .with_subject(node)
            .filter(|id| !self.store.is_consumed(*id))
            .collect::<Vec<_>>();
        let mut annotations = Vec::new();
        for id in ids {
            let Triple {
                predicate, object, ..
            } = self.store.get(id).clone();
            if !self.is_annotation_property(&predicate) {
                continue;
            }
            self.learn(&predicate, EntityKind::AnnotationProperty);
            let value = self.annotation_value(&object)?;
            self.store.consume(id);
            let nested = self.nested_annotations(node, &predicate, &object)?;
            annotations.push(Annotation::new(predicate, value).with_annotations(nested));
        }
        Ok(annotations)
    }

    fn is_annotation_property(&self, predicate: &NamedNode) -> bool {
        match self.property_kind(predicate) {
            Some(kind) => kind == PropertyKind::Annotation,
            None => !vocab::is_reserved(predicate.as_ref()),
        }
    }

    /// Annotations of the annotation `(source, property, value)`, given by `owl:Annotation`
    /// nodes pointing back at it.
    fn nested_annotations(
        &mut self,
        source: &NamedOrBlankNode,
        property: &NamedNode,
        value: &Term,
    ) -> Translation<Vec<Annotation>> {
        let reifiers = self
            .store
            .with_object(&source.clone().into())
            .filter(|id| !self.store.is_consumed(*id))
            .map(|id| self.store.get(id))
            .filter(|triple| triple.predicate == owl::ANNOTATED_SOURCE)
            .map(|triple| triple.subject.clone())
            .collect::<Vec<_>>();
        let mut annotations = Vec::new();
        for reifier in reifiers {
            let is_reifier = self.store.has_type(&reifier, owl::ANNOTATION)
                || self.store.has_type(&reifier, owl::AXIOM);
            let same_annotation = self
                .store
                .objects(&reifier, owl::ANNOTATED_PROPERTY)
                .any(|p| matches!(p, Term::NamedNode(p) if p == property))
                && self
                    .store
                    .objects(&reifier, owl::ANNOTATED_TARGET)
                    .any(|t| t == value);
            if !is_reifier || !same_annotation {
                continue;
            }
            annotations.extend(self.nested(reifier, |this, reifier| {
                this.consume_reification(reifier);
                this.annotations_on(reifier)
            })?);
        }
        Ok(annotations)
    }

    fn consume_reification(&mut self, node: &NamedOrBlankNode) {
        let ids = self.store.with_subject(node).collect::<Vec<_>>();
        for id in ids {
            let triple = self.store.get(id);
            let predicate = triple.predicate.as_ref();
            let is_machinery = if predicate == rdf::TYPE {
                matches!(&triple.object, Term::NamedNode(t) if *t == owl::AXIOM || *t == owl::ANNOTATION)
            } else {
                predicate == owl::ANNOTATED_SOURCE
                    || predicate == owl::ANNOTATED_PROPERTY
                    || predicate == owl::ANNOTATED_TARGET
            };
            if is_machinery {
                self.store.consume(id);
            }
        }
    }

    /// Merges every `owl:Axiom` reification into the axiom it annotates.
    pub(super) fn read_axiom_annotations(&mut self) -> Result<(), OntologyParseError> {
        let mut nodes = Vec::new();
        for id in self.store.with_object(&Term::from(owl::AXIOM.into_owned())) {
            let triple = self.store.get(id);
            if triple.predicate == rdf::TYPE
                && !self.store.is_consumed(id)
                && !nodes.contains(&triple.subject)
            {
                nodes.push(triple.subject.clone());
            }
        }
        if nodes.is_empty() {
            return Ok(());
        }
        debug!(reifications = nodes.len(), "merging axiom annotations");
        for node in nodes {
            let pending = self.store.matching(&node, rdf::TYPE).any(|id| {
                !self.store.is_consumed(id)
                    && matches!(&self.store.get(id).object, Term::NamedNode(t) if *t == owl::AXIOM)
            });
            let annotates_annotation = self
                .store
                .objects(&node, owl::ANNOTATED_SOURCE)
                .filter_map(resource)
                .any(|source| {
                    self.store.has_type(&source, owl::AXIOM)
                        || self.store.has_type(&source, owl::ANNOTATION)
                });
            if !pending || annotates_annotation {
                continue;
            }
            if self.attempt(|this| this.reify(&node))?.is_none() {
                for id in self.store.with_subject(&node).collect::<Vec<_>>() {
                    self.store.consume(id);
                }
            }
        }
        Ok(())
    }

    fn reify(&mut self, node: &NamedOrBlankNode) -> Translation<()> {
        let source = self.single_object(node, owl::ANNOTATED_SOURCE)?;
        let property = self.single_object(node, owl::ANNOTATED_PROPERTY)?;
        let property = self.named(&property, "a property")?;
        let target = self.single_object(node, owl::ANNOTATED_TARGET)?;
        let Some(subject) = resource(&source) else {
            return Err(invalid(&source, "the subject of a triple"));
        };
        self.consume_reification(node);
        let annotations = self.annotations_on(node)?;

        let base = Triple::new(subject, property, target);
        let (id, inserted) = match self.store.find(&base) {
            Some(id) => (id, false),
            None => (self.insert_missing(node, &base)?, true),
        };
        let axioms = if let Some(axioms) = self.produced.get(&id) {
            axioms.clone()
        } else {
            if !inserted && self.store.is_consumed(id) {
                return Err(TranslationError::new(
                    TranslationErrorKind::InvalidValue,
                    format!("the annotated triple {base} does not stand for an axiom"),
                )
                .with_node(node.clone())
                .into());
            }
            let axioms = match self.handle_triple(id) {
                Ok(axioms) => axioms,
                Err(halt) => {
                    if inserted {
                        self.store.remove(id);
                    }
                    return Err(halt);
                }
            };
            self.store.consume(id);
            self.produced.insert(id, axioms.clone());
            axioms
        };

        for axiom in axioms {
            self.ontology.remove_axiom(&axiom);
            let (axiom, mut merged) = axiom.into_parts();
            merged.extend(annotations.iter().cloned());
            self.ontology.add_axiom(axiom.annotated(merged));
        }
        Ok(())
    }

    /// Adds the annotated triple of a reification whose triple is absent from the graph.
    fn insert_missing(&mut self, node: &NamedOrBlankNode, base: &Triple) -> Translation<TripleId> {
        self.recover(
            TranslationError::warning(
                TranslationErrorKind::MissingRequiredTriple,
                format!("the annotated triple {base} is missing from the graph, adding it"),
            )
            .with_node(node.clone())
            .with_triples([base.clone()]),
        )?;
        self.store.insert(base.clone()).ok_or_else(|| {
            TranslationError::new(
                TranslationErrorKind::InvalidValue,
                format!("the annotated triple {base} cannot be added"),
            )
            .into()
        })
    }
}
