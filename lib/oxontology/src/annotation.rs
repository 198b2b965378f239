//! Annotations on entities, axioms, ontologies and other annotations.

use crate::entity::AnnotationProperty;
use crate::expression::canonical_sort;
use oxrdf::{BlankNode, Literal, NamedNode, Term};
use std::fmt;

/// The value of an annotation: an IRI, a literal or an anonymous individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Iri(NamedNode),
    Literal(Literal),
    Anonymous(BlankNode),
}

impl AnnotationValue {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            Self::Iri(_) | Self::Anonymous(_) => None,
        }
    }
}

impl From<Literal> for AnnotationValue {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<NamedNode> for AnnotationValue {
    fn from(iri: NamedNode) -> Self {
        Self::Iri(iri)
    }
}

impl From<AnnotationValue> for Term {
    fn from(value: AnnotationValue) -> Self {
        match value {
            AnnotationValue::Iri(i) => i.into(),
            AnnotationValue::Literal(l) => l.into(),
            AnnotationValue::Anonymous(b) => b.into(),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(i) => i.fmt(f),
            Self::Literal(l) => l.fmt(f),
            Self::Anonymous(b) => b.fmt(f),
        }
    }
}

/// The subject of an annotation assertion: an IRI or an anonymous individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationSubject {
    Iri(NamedNode),
    Anonymous(BlankNode),
}

impl From<NamedNode> for AnnotationSubject {
    fn from(iri: NamedNode) -> Self {
        Self::Iri(iri)
    }
}

impl fmt::Display for AnnotationSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(i) => i.fmt(f),
            Self::Anonymous(b) => b.fmt(f),
        }
    }
}

/// An annotation, possibly itself annotated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub property: AnnotationProperty,
    pub value: AnnotationValue,
    pub annotations: Vec<Annotation>,
}

impl Annotation {
    pub fn new(property: impl Into<AnnotationProperty>, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub(crate) fn normalize(&mut self) {
        normalize_annotations(&mut self.annotations);
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Annotation(")?;
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        write!(f, "{} {})", self.property, self.value)
    }
}

pub(crate) fn normalize_annotations(annotations: &mut Vec<Annotation>) {
    for annotation in annotations.iter_mut() {
        annotation.normalize();
    }
    canonical_sort(annotations);
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::rdfs;

    #[test]
    fn test_nested_display() {
        let nested = Annotation::new(rdfs::COMMENT, Literal::new_simple_literal("why"));
        let annotation = Annotation::new(rdfs::LABEL, Literal::new_simple_literal("x"))
            .with_annotations(vec![nested]);
        assert_eq!(
            annotation.to_string(),
            "Annotation(Annotation(<http://www.w3.org/2000/01/rdf-schema#comment> \"why\") <http://www.w3.org/2000/01/rdf-schema#label> \"x\")"
        );
    }

    #[test]
    fn test_normalize_is_set_semantics() {
        let a = Annotation::new(rdfs::LABEL, Literal::new_simple_literal("a"));
        let b = Annotation::new(rdfs::LABEL, Literal::new_simple_literal("b"));
        let mut left = vec![b.clone(), a.clone(), b.clone()];
        let mut right = vec![a, b];
        normalize_annotations(&mut left);
        normalize_annotations(&mut right);
        assert_eq!(left, right);
    }
}
