//! OWL 2 entities: classes, properties, datatypes and individuals.
//!
//! Entities are identified solely by their IRI. Two entities of the same kind
//! are equal iff their IRIs are equal.

use oxrdf::{BlankNode, NamedNode, NamedNodeRef, Term};
use std::fmt;

macro_rules! entity_type {
    ($(#[$attr:meta])* $name:ident, $kind:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NamedNode);

        impl $name {
            #[inline]
            pub fn new(iri: impl Into<NamedNode>) -> Self {
                Self(iri.into())
            }

            /// Builds the entity from an IRI string, validating it.
            #[inline]
            pub fn new_from_iri(iri: impl Into<String>) -> Result<Self, oxiri::IriParseError> {
                Ok(Self(NamedNode::new(iri)?))
            }

            #[inline]
            pub fn iri(&self) -> &NamedNode {
                &self.0
            }

            #[inline]
            pub fn as_iri_ref(&self) -> NamedNodeRef<'_> {
                self.0.as_ref()
            }

            #[inline]
            pub fn into_inner(self) -> NamedNode {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<NamedNode> for $name {
            #[inline]
            fn from(node: NamedNode) -> Self {
                Self(node)
            }
        }

        impl From<NamedNodeRef<'_>> for $name {
            #[inline]
            fn from(node: NamedNodeRef<'_>) -> Self {
                Self(node.into_owned())
            }
        }

        impl From<$name> for NamedNode {
            #[inline]
            fn from(entity: $name) -> Self {
                entity.0
            }
        }

        impl From<$name> for Term {
            #[inline]
            fn from(entity: $name) -> Self {
                entity.0.into()
            }
        }

        impl From<$name> for Entity {
            #[inline]
            fn from(entity: $name) -> Self {
                Self::$kind(entity)
            }
        }

        impl AsRef<NamedNode> for $name {
            #[inline]
            fn as_ref(&self) -> &NamedNode {
                &self.0
            }
        }
    };
}

entity_type!(
    /// An OWL class (`owl:Class`).
    ///
    /// Classes are sets of individuals. Every class is a subclass of `owl:Thing`
    /// and a superclass of `owl:Nothing`.
    OwlClass,
    Class
);
entity_type!(
    /// An OWL object property (`owl:ObjectProperty`), relating individuals to individuals.
    ObjectProperty,
    ObjectProperty
);
entity_type!(
    /// An OWL data property (`owl:DatatypeProperty`), relating individuals to literals.
    DataProperty,
    DataProperty
);
entity_type!(
    /// An OWL annotation property (`owl:AnnotationProperty`).
    AnnotationProperty,
    AnnotationProperty
);
entity_type!(
    /// A datatype (`rdfs:Datatype`), e.g. `xsd:integer`.
    Datatype,
    Datatype
);
entity_type!(
    /// A named individual (`owl:NamedIndividual`).
    NamedIndividual,
    NamedIndividual
);

/// The kind of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    Datatype,
    NamedIndividual,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Class,
        Self::ObjectProperty,
        Self::DataProperty,
        Self::AnnotationProperty,
        Self::Datatype,
        Self::NamedIndividual,
    ];

    /// The name used in functional syntax declarations, e.g. `ObjectProperty`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
            Self::AnnotationProperty => "AnnotationProperty",
            Self::Datatype => "Datatype",
            Self::NamedIndividual => "NamedIndividual",
        }
    }

    #[inline]
    pub(crate) fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Builds the entity of this kind with the given IRI.
    pub fn entity(self, iri: impl Into<NamedNode>) -> Entity {
        let iri = iri.into();
        match self {
            Self::Class => Entity::Class(OwlClass(iri)),
            Self::ObjectProperty => Entity::ObjectProperty(ObjectProperty(iri)),
            Self::DataProperty => Entity::DataProperty(DataProperty(iri)),
            Self::AnnotationProperty => Entity::AnnotationProperty(AnnotationProperty(iri)),
            Self::Datatype => Entity::Datatype(Datatype(iri)),
            Self::NamedIndividual => Entity::NamedIndividual(NamedIndividual(iri)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any OWL entity.
///
/// The same IRI may be used for entities of several kinds ("punning"), the kinds are then
/// distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Class(OwlClass),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
    AnnotationProperty(AnnotationProperty),
    Datatype(Datatype),
    NamedIndividual(NamedIndividual),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Class(_) => EntityKind::Class,
            Self::ObjectProperty(_) => EntityKind::ObjectProperty,
            Self::DataProperty(_) => EntityKind::DataProperty,
            Self::AnnotationProperty(_) => EntityKind::AnnotationProperty,
            Self::Datatype(_) => EntityKind::Datatype,
            Self::NamedIndividual(_) => EntityKind::NamedIndividual,
        }
    }

    pub fn iri(&self) -> &NamedNode {
        match self {
            Self::Class(e) => e.iri(),
            Self::ObjectProperty(e) => e.iri(),
            Self::DataProperty(e) => e.iri(),
            Self::AnnotationProperty(e) => e.iri(),
            Self::Datatype(e) => e.iri(),
            Self::NamedIndividual(e) => e.iri(),
        }
    }

    pub fn into_iri(self) -> NamedNode {
        match self {
            Self::Class(e) => e.into_inner(),
            Self::ObjectProperty(e) => e.into_inner(),
            Self::DataProperty(e) => e.into_inner(),
            Self::AnnotationProperty(e) => e.into_inner(),
            Self::Datatype(e) => e.into_inner(),
            Self::NamedIndividual(e) => e.into_inner(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.iri())
    }
}

/// An individual, either named or anonymous.
///
/// Anonymous individuals are blank nodes, scoped to the ontology they come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Individual {
    Named(NamedIndividual),
    Anonymous(BlankNode),
}

impl Individual {
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    #[inline]
    pub fn as_named(&self) -> Option<&NamedIndividual> {
        match self {
            Self::Named(n) => Some(n),
            Self::Anonymous(_) => None,
        }
    }

    #[inline]
    pub fn as_anonymous(&self) -> Option<&BlankNode> {
        match self {
            Self::Named(_) => None,
            Self::Anonymous(b) => Some(b),
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Anonymous(b) => b.fmt(f),
        }
    }
}

impl From<NamedIndividual> for Individual {
    #[inline]
    fn from(individual: NamedIndividual) -> Self {
        Self::Named(individual)
    }
}

impl From<NamedNode> for Individual {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self::Named(NamedIndividual(iri))
    }
}

impl From<BlankNode> for Individual {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

impl From<Individual> for Term {
    #[inline]
    fn from(individual: Individual) -> Self {
        match individual {
            Individual::Named(n) => n.0.into(),
            Individual::Anonymous(b) => b.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owl_class() {
        let iri = NamedNode::new_unchecked("http://example.org/Person");
        let class = OwlClass::new(iri.clone());
        assert_eq!(class.iri(), &iri);
        assert_eq!(class.to_string(), "<http://example.org/Person>");
        assert_eq!(
            Entity::from(class).to_string(),
            "Class(<http://example.org/Person>)"
        );
    }

    #[test]
    fn test_new_from_iri_validates() {
        assert!(ObjectProperty::new_from_iri("http://example.org/knows").is_ok());
        assert!(ObjectProperty::new_from_iri("not an iri").is_err());
    }

    #[test]
    fn test_punned_entities_are_distinct() {
        let iri = NamedNode::new_unchecked("http://example.org/Eagle");
        let class = EntityKind::Class.entity(iri.clone());
        let individual = EntityKind::NamedIndividual.entity(iri.clone());
        assert_ne!(class, individual);
        assert_eq!(class.iri(), individual.iri());
        assert_eq!(individual.kind(), EntityKind::NamedIndividual);
    }

    #[test]
    fn test_kind_bits_are_distinct() {
        let mut seen = 0_u8;
        for kind in EntityKind::ALL {
            assert_eq!(seen & kind.bit(), 0, "{kind} shares a bit");
            seen |= kind.bit();
        }
    }

    #[test]
    fn test_individual() {
        let named = Individual::from(NamedNode::new_unchecked("http://example.org/Alice"));
        assert!(named.is_named());
        assert_eq!(
            named.as_named().map(NamedIndividual::iri),
            Some(&NamedNode::new_unchecked("http://example.org/Alice"))
        );

        let blank = BlankNode::new_unchecked("b0");
        let anonymous = Individual::from(blank.clone());
        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.as_anonymous(), Some(&blank));
        assert_eq!(anonymous.to_string(), "_:b0");
        assert_eq!(Term::from(anonymous), Term::BlankNode(blank));
    }
}
