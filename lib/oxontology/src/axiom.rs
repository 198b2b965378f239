//! OWL 2 axiom types.
//!
//! Axioms are the basic statements in an OWL 2 ontology. [`Axiom`] is a closed sum type over
//! every axiom kind, so that code consuming axioms has to handle all of them explicitly.
//! Its equality is structural and does not see annotations; [`AnnotatedAxiom`] pairs an axiom
//! with its annotations and is what an [`Ontology`](crate::Ontology) stores.

use crate::annotation::{Annotation, AnnotationSubject, AnnotationValue, normalize_annotations};
use crate::entity::{
    AnnotationProperty, DataProperty, Datatype, Entity, EntityKind, Individual, OwlClass,
};
use crate::expression::{
    ClassExpression, DataRange, ObjectPropertyExpression, Spaced, canonical_sort,
};
use crate::swrl::{Atom, DArgument, IArgument, Rule};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef};
use std::collections::BTreeSet;
use std::fmt;

/// An OWL 2 axiom, without its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axiom {
    Declaration(Entity),

    // Class axioms
    EquivalentClasses(Vec<ClassExpression>),
    SubClassOf {
        sub_class: ClassExpression,
        super_class: ClassExpression,
    },
    DisjointClasses(Vec<ClassExpression>),
    DisjointUnion {
        class: OwlClass,
        disjoint_classes: Vec<ClassExpression>,
    },

    // Assertions
    ClassAssertion {
        class: ClassExpression,
        individual: Individual,
    },
    SameIndividual(Vec<Individual>),
    DifferentIndividuals(Vec<Individual>),
    ObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        subject: Individual,
        object: Individual,
    },
    NegativeObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        subject: Individual,
        object: Individual,
    },
    DataPropertyAssertion {
        property: DataProperty,
        subject: Individual,
        value: Literal,
    },
    NegativeDataPropertyAssertion {
        property: DataProperty,
        subject: Individual,
        value: Literal,
    },

    // Object property axioms
    EquivalentObjectProperties(Vec<ObjectPropertyExpression>),
    SubObjectPropertyOf {
        sub_property: ObjectPropertyExpression,
        super_property: ObjectPropertyExpression,
    },
    InverseObjectProperties(ObjectPropertyExpression, ObjectPropertyExpression),
    FunctionalObjectProperty(ObjectPropertyExpression),
    InverseFunctionalObjectProperty(ObjectPropertyExpression),
    SymmetricObjectProperty(ObjectPropertyExpression),
    AsymmetricObjectProperty(ObjectPropertyExpression),
    TransitiveObjectProperty(ObjectPropertyExpression),
    ReflexiveObjectProperty(ObjectPropertyExpression),
    IrreflexiveObjectProperty(ObjectPropertyExpression),
    ObjectPropertyDomain {
        property: ObjectPropertyExpression,
        domain: ClassExpression,
    },
    ObjectPropertyRange {
        property: ObjectPropertyExpression,
        range: ClassExpression,
    },
    DisjointObjectProperties(Vec<ObjectPropertyExpression>),
    /// SubObjectPropertyOf(ObjectPropertyChain(P1 ... Pn) P)
    SubPropertyChainOf {
        chain: Vec<ObjectPropertyExpression>,
        super_property: ObjectPropertyExpression,
    },

    // Data property axioms
    EquivalentDataProperties(Vec<DataProperty>),
    SubDataPropertyOf {
        sub_property: DataProperty,
        super_property: DataProperty,
    },
    FunctionalDataProperty(DataProperty),
    DataPropertyDomain {
        property: DataProperty,
        domain: ClassExpression,
    },
    DataPropertyRange {
        property: DataProperty,
        range: DataRange,
    },
    DisjointDataProperties(Vec<DataProperty>),

    HasKey {
        class: ClassExpression,
        object_properties: Vec<ObjectPropertyExpression>,
        data_properties: Vec<DataProperty>,
    },
    Rule(Rule),

    // Annotation axioms
    AnnotationAssertion {
        property: AnnotationProperty,
        subject: AnnotationSubject,
        value: AnnotationValue,
    },
    SubAnnotationPropertyOf {
        sub_property: AnnotationProperty,
        super_property: AnnotationProperty,
    },
    AnnotationPropertyRange {
        property: AnnotationProperty,
        range: NamedNode,
    },
    AnnotationPropertyDomain {
        property: AnnotationProperty,
        domain: NamedNode,
    },

    DatatypeDefinition {
        datatype: Datatype,
        range: DataRange,
    },
}

/// The kind of an [`Axiom`], without any operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxiomKind {
    Declaration,
    EquivalentClasses,
    SubClassOf,
    DisjointClasses,
    DisjointUnion,
    ClassAssertion,
    SameIndividual,
    DifferentIndividuals,
    ObjectPropertyAssertion,
    NegativeObjectPropertyAssertion,
    DataPropertyAssertion,
    NegativeDataPropertyAssertion,
    EquivalentObjectProperties,
    SubObjectPropertyOf,
    InverseObjectProperties,
    FunctionalObjectProperty,
    InverseFunctionalObjectProperty,
    SymmetricObjectProperty,
    AsymmetricObjectProperty,
    TransitiveObjectProperty,
    ReflexiveObjectProperty,
    IrreflexiveObjectProperty,
    ObjectPropertyDomain,
    ObjectPropertyRange,
    DisjointObjectProperties,
    SubPropertyChainOf,
    EquivalentDataProperties,
    SubDataPropertyOf,
    FunctionalDataProperty,
    DataPropertyDomain,
    DataPropertyRange,
    DisjointDataProperties,
    HasKey,
    Rule,
    AnnotationAssertion,
    SubAnnotationPropertyOf,
    AnnotationPropertyRange,
    AnnotationPropertyDomain,
    DatatypeDefinition,
}

impl AxiomKind {
    /// Every kind, in the OWL axiom type enumeration order.
    pub const ALL: [Self; 39] = [
        Self::Declaration,
        Self::EquivalentClasses,
        Self::SubClassOf,
        Self::DisjointClasses,
        Self::DisjointUnion,
        Self::ClassAssertion,
        Self::SameIndividual,
        Self::DifferentIndividuals,
        Self::ObjectPropertyAssertion,
        Self::NegativeObjectPropertyAssertion,
        Self::DataPropertyAssertion,
        Self::NegativeDataPropertyAssertion,
        Self::EquivalentObjectProperties,
        Self::SubObjectPropertyOf,
        Self::InverseObjectProperties,
        Self::FunctionalObjectProperty,
        Self::InverseFunctionalObjectProperty,
        Self::SymmetricObjectProperty,
        Self::AsymmetricObjectProperty,
        Self::TransitiveObjectProperty,
        Self::ReflexiveObjectProperty,
        Self::IrreflexiveObjectProperty,
        Self::ObjectPropertyDomain,
        Self::ObjectPropertyRange,
        Self::DisjointObjectProperties,
        Self::SubPropertyChainOf,
        Self::EquivalentDataProperties,
        Self::SubDataPropertyOf,
        Self::FunctionalDataProperty,
        Self::DataPropertyDomain,
        Self::DataPropertyRange,
        Self::DisjointDataProperties,
        Self::HasKey,
        Self::Rule,
        Self::AnnotationAssertion,
        Self::SubAnnotationPropertyOf,
        Self::AnnotationPropertyRange,
        Self::AnnotationPropertyDomain,
        Self::DatatypeDefinition,
    ];

    /// Functional syntax name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Declaration => "Declaration",
            Self::EquivalentClasses => "EquivalentClasses",
            Self::SubClassOf => "SubClassOf",
            Self::DisjointClasses => "DisjointClasses",
            Self::DisjointUnion => "DisjointUnion",
            Self::ClassAssertion => "ClassAssertion",
            Self::SameIndividual => "SameIndividual",
            Self::DifferentIndividuals => "DifferentIndividuals",
            Self::ObjectPropertyAssertion => "ObjectPropertyAssertion",
            Self::NegativeObjectPropertyAssertion => "NegativeObjectPropertyAssertion",
            Self::DataPropertyAssertion => "DataPropertyAssertion",
            Self::NegativeDataPropertyAssertion => "NegativeDataPropertyAssertion",
            Self::EquivalentObjectProperties => "EquivalentObjectProperties",
            Self::SubObjectPropertyOf | Self::SubPropertyChainOf => "SubObjectPropertyOf",
            Self::InverseObjectProperties => "InverseObjectProperties",
            Self::FunctionalObjectProperty => "FunctionalObjectProperty",
            Self::InverseFunctionalObjectProperty => "InverseFunctionalObjectProperty",
            Self::SymmetricObjectProperty => "SymmetricObjectProperty",
            Self::AsymmetricObjectProperty => "AsymmetricObjectProperty",
            Self::TransitiveObjectProperty => "TransitiveObjectProperty",
            Self::ReflexiveObjectProperty => "ReflexiveObjectProperty",
            Self::IrreflexiveObjectProperty => "IrreflexiveObjectProperty",
            Self::ObjectPropertyDomain => "ObjectPropertyDomain",
            Self::ObjectPropertyRange => "ObjectPropertyRange",
            Self::DisjointObjectProperties => "DisjointObjectProperties",
            Self::EquivalentDataProperties => "EquivalentDataProperties",
            Self::SubDataPropertyOf => "SubDataPropertyOf",
            Self::FunctionalDataProperty => "FunctionalDataProperty",
            Self::DataPropertyDomain => "DataPropertyDomain",
            Self::DataPropertyRange => "DataPropertyRange",
            Self::DisjointDataProperties => "DisjointDataProperties",
            Self::HasKey => "HasKey",
            Self::Rule => "DLSafeRule",
            Self::AnnotationAssertion => "AnnotationAssertion",
            Self::SubAnnotationPropertyOf => "SubAnnotationPropertyOf",
            Self::AnnotationPropertyRange => "AnnotationPropertyRange",
            Self::AnnotationPropertyDomain => "AnnotationPropertyDomain",
            Self::DatatypeDefinition => "DatatypeDefinition",
        }
    }

    /// Whether axioms of this kind carry logical meaning.
    ///
    /// Declarations and annotation axioms do not.
    pub fn is_logical(self) -> bool {
        !matches!(
            self,
            Self::Declaration
                | Self::AnnotationAssertion
                | Self::SubAnnotationPropertyOf
                | Self::AnnotationPropertyRange
                | Self::AnnotationPropertyDomain
        )
    }
}

impl fmt::Display for AxiomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Axiom {
    pub fn kind(&self) -> AxiomKind {
        match self {
            Self::Declaration(_) => AxiomKind::Declaration,
            Self::EquivalentClasses(_) => AxiomKind::EquivalentClasses,
            Self::SubClassOf { .. } => AxiomKind::SubClassOf,
            Self::DisjointClasses(_) => AxiomKind::DisjointClasses,
            Self::DisjointUnion { .. } => AxiomKind::DisjointUnion,
            Self::ClassAssertion { .. } => AxiomKind::ClassAssertion,
            Self::SameIndividual(_) => AxiomKind::SameIndividual,
            Self::DifferentIndividuals(_) => AxiomKind::DifferentIndividuals,
            Self::ObjectPropertyAssertion { .. } => AxiomKind::ObjectPropertyAssertion,
            Self::NegativeObjectPropertyAssertion { .. } => {
                AxiomKind::NegativeObjectPropertyAssertion
            }
            Self::DataPropertyAssertion { .. } => AxiomKind::DataPropertyAssertion,
            Self::NegativeDataPropertyAssertion { .. } => AxiomKind::NegativeDataPropertyAssertion,
            Self::EquivalentObjectProperties(_) => AxiomKind::EquivalentObjectProperties,
            Self::SubObjectPropertyOf { .. } => AxiomKind::SubObjectPropertyOf,
            Self::InverseObjectProperties(..) => AxiomKind::InverseObjectProperties,
            Self::FunctionalObjectProperty(_) => AxiomKind::FunctionalObjectProperty,
            Self::InverseFunctionalObjectProperty(_) => AxiomKind::InverseFunctionalObjectProperty,
            Self::SymmetricObjectProperty(_) => AxiomKind::SymmetricObjectProperty,
            Self::AsymmetricObjectProperty(_) => AxiomKind::AsymmetricObjectProperty,
            Self::TransitiveObjectProperty(_) => AxiomKind::TransitiveObjectProperty,
            Self::ReflexiveObjectProperty(_) => AxiomKind::ReflexiveObjectProperty,
            Self::IrreflexiveObjectProperty(_) => AxiomKind::IrreflexiveObjectProperty,
            Self::ObjectPropertyDomain { .. } => AxiomKind::ObjectPropertyDomain,
            Self::ObjectPropertyRange { .. } => AxiomKind::ObjectPropertyRange,
            Self::DisjointObjectProperties(_) => AxiomKind::DisjointObjectProperties,
            Self::SubPropertyChainOf { .. } => AxiomKind::SubPropertyChainOf,
            Self::EquivalentDataProperties(_) => AxiomKind::EquivalentDataProperties,
            Self::SubDataPropertyOf { .. } => AxiomKind::SubDataPropertyOf,
            Self::FunctionalDataProperty(_) => AxiomKind::FunctionalDataProperty,
            Self::DataPropertyDomain { .. } => AxiomKind::DataPropertyDomain,
            Self::DataPropertyRange { .. } => AxiomKind::DataPropertyRange,
            Self::DisjointDataProperties(_) => AxiomKind::DisjointDataProperties,
            Self::HasKey { .. } => AxiomKind::HasKey,
            Self::Rule(_) => AxiomKind::Rule,
            Self::AnnotationAssertion { .. } => AxiomKind::AnnotationAssertion,
            Self::SubAnnotationPropertyOf { .. } => AxiomKind::SubAnnotationPropertyOf,
            Self::AnnotationPropertyRange { .. } => AxiomKind::AnnotationPropertyRange,
            Self::AnnotationPropertyDomain { .. } => AxiomKind::AnnotationPropertyDomain,
            Self::DatatypeDefinition { .. } => AxiomKind::DatatypeDefinition,
        }
    }

    #[inline]
    pub fn is_logical(&self) -> bool {
        self.kind().is_logical()
    }

    /// Attaches annotations to this axiom.
    pub fn annotated(self, annotations: Vec<Annotation>) -> AnnotatedAxiom {
        AnnotatedAxiom::new(self, annotations)
    }

    /// The entities this axiom references, including the datatypes of its literals.
    ///
    /// Annotation subjects and IRI values are not entities and SWRL variables are not
    /// part of the signature.
    pub fn signature(&self) -> BTreeSet<Entity> {
        struct Collector(BTreeSet<Entity>);
        impl ComponentVisitor for Collector {
            fn visit_entity(&mut self, kind: EntityKind, iri: NamedNodeRef<'_>) {
                self.0.insert(kind.entity(iri.into_owned()));
            }
        }
        let mut collector = Collector(BTreeSet::new());
        walk_axiom(self, &mut collector);
        collector.0
    }

    /// Puts every set-valued operand in canonical order, recursively.
    pub fn normalize(&mut self) {
        match self {
            Self::Declaration(_)
            | Self::SameIndividual(_)
            | Self::DifferentIndividuals(_)
            | Self::ObjectPropertyAssertion { .. }
            | Self::NegativeObjectPropertyAssertion { .. }
            | Self::DataPropertyAssertion { .. }
            | Self::NegativeDataPropertyAssertion { .. }
            | Self::SubObjectPropertyOf { .. }
            | Self::FunctionalObjectProperty(_)
            | Self::InverseFunctionalObjectProperty(_)
            | Self::SymmetricObjectProperty(_)
            | Self::AsymmetricObjectProperty(_)
            | Self::TransitiveObjectProperty(_)
            | Self::ReflexiveObjectProperty(_)
            | Self::IrreflexiveObjectProperty(_)
            | Self::SubPropertyChainOf { .. }
            | Self::SubDataPropertyOf { .. }
            | Self::FunctionalDataProperty(_)
            | Self::AnnotationAssertion { .. }
            | Self::SubAnnotationPropertyOf { .. }
            | Self::AnnotationPropertyRange { .. }
            | Self::AnnotationPropertyDomain { .. } => (),
            Self::EquivalentClasses(classes) | Self::DisjointClasses(classes) => {
                normalize_class_set(classes);
            }
            Self::SubClassOf {
                sub_class,
                super_class,
            } => {
                sub_class.normalize();
                super_class.normalize();
            }
            Self::DisjointUnion {
                disjoint_classes, ..
            } => normalize_class_set(disjoint_classes),
            Self::ClassAssertion { class, .. } => class.normalize(),
            Self::EquivalentObjectProperties(properties)
            | Self::DisjointObjectProperties(properties) => properties.sort_unstable(),
            Self::InverseObjectProperties(first, second) => {
                if second < first {
                    std::mem::swap(first, second);
                }
            }
            Self::ObjectPropertyDomain { domain, .. } | Self::DataPropertyDomain { domain, .. } => {
                domain.normalize();
            }
            Self::ObjectPropertyRange { range, .. } => range.normalize(),
            Self::EquivalentDataProperties(properties)
            | Self::DisjointDataProperties(properties) => properties.sort_unstable(),
            Self::DataPropertyRange { range, .. } | Self::DatatypeDefinition { range, .. } => {
                range.normalize();
            }
            Self::HasKey {
                class,
                object_properties,
                data_properties,
            } => {
                class.normalize();
                object_properties.sort_unstable();
                object_properties.dedup();
                data_properties.sort_unstable();
                data_properties.dedup();
            }
            Self::Rule(rule) => rule.normalize(),
        }
        match self {
            Self::SameIndividual(individuals) | Self::DifferentIndividuals(individuals) => {
                canonical_sort(individuals);
            }
            Self::EquivalentObjectProperties(properties)
            | Self::DisjointObjectProperties(properties) => properties.dedup(),
            Self::EquivalentDataProperties(properties)
            | Self::DisjointDataProperties(properties) => properties.dedup(),
            _ => (),
        }
    }

    fn fmt_with_annotations(
        &self,
        f: &mut fmt::Formatter<'_>,
        annotations: &[Annotation],
    ) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        for annotation in annotations {
            write!(f, "{annotation} ")?;
        }
        match self {
            Self::Declaration(entity) => write!(f, "{entity}")?,
            Self::EquivalentClasses(classes) | Self::DisjointClasses(classes) => {
                write!(f, "{}", Spaced(classes))?;
            }
            Self::SubClassOf {
                sub_class,
                super_class,
            } => write!(f, "{sub_class} {super_class}")?,
            Self::DisjointUnion {
                class,
                disjoint_classes,
            } => write!(f, "{class} {}", Spaced(disjoint_classes))?,
            Self::ClassAssertion { class, individual } => write!(f, "{class} {individual}")?,
            Self::SameIndividual(individuals) | Self::DifferentIndividuals(individuals) => {
                write!(f, "{}", Spaced(individuals))?;
            }
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            }
            | Self::NegativeObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "{property} {subject} {object}")?,
            Self::DataPropertyAssertion {
                property,
                subject,
                value,
            }
            | Self::NegativeDataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "{property} {subject} {value}")?,
            Self::EquivalentObjectProperties(properties)
            | Self::DisjointObjectProperties(properties) => {
                write!(f, "{}", Spaced(properties))?;
            }
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "{sub_property} {super_property}")?,
            Self::InverseObjectProperties(first, second) => write!(f, "{first} {second}")?,
            Self::FunctionalObjectProperty(p)
            | Self::InverseFunctionalObjectProperty(p)
            | Self::SymmetricObjectProperty(p)
            | Self::AsymmetricObjectProperty(p)
            | Self::TransitiveObjectProperty(p)
            | Self::ReflexiveObjectProperty(p)
            | Self::IrreflexiveObjectProperty(p) => write!(f, "{p}")?,
            Self::ObjectPropertyDomain { property, domain } => write!(f, "{property} {domain}")?,
            Self::ObjectPropertyRange { property, range } => write!(f, "{property} {range}")?,
            Self::SubPropertyChainOf {
                chain,
                super_property,
            } => write!(
                f,
                "ObjectPropertyChain({}) {super_property}",
                Spaced(chain)
            )?,
            Self::EquivalentDataProperties(properties)
            | Self::DisjointDataProperties(properties) => write!(f, "{}", Spaced(properties))?,
            Self::SubDataPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "{sub_property} {super_property}")?,
            Self::FunctionalDataProperty(p) => write!(f, "{p}")?,
            Self::DataPropertyDomain { property, domain } => write!(f, "{property} {domain}")?,
            Self::DataPropertyRange { property, range } => write!(f, "{property} {range}")?,
            Self::HasKey {
                class,
                object_properties,
                data_properties,
            } => write!(
                f,
                "{class} ({}) ({})",
                Spaced(object_properties),
                Spaced(data_properties)
            )?,
            Self::Rule(rule) => write!(f, "{rule}")?,
            Self::AnnotationAssertion {
                property,
                subject,
                value,
            } => write!(f, "{property} {subject} {value}")?,
            Self::SubAnnotationPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "{sub_property} {super_property}")?,
            Self::AnnotationPropertyRange { property, range } => write!(f, "{property} {range}")?,
            Self::AnnotationPropertyDomain { property, domain } => {
                write!(f, "{property} {domain}")?;
            }
            Self::DatatypeDefinition { datatype, range } => write!(f, "{datatype} {range}")?,
        }
        f.write_str(")")
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_annotations(f, &[])
    }
}

fn normalize_class_set(classes: &mut Vec<ClassExpression>) {
    for class in classes.iter_mut() {
        class.normalize();
    }
    canonical_sort(classes);
}

/// An axiom together with its annotations.
///
/// Equality takes the annotations into account. Both the axiom and the annotations are kept
/// normalized, so the annotation order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotatedAxiom {
    axiom: Axiom,
    annotations: Vec<Annotation>,
}

impl AnnotatedAxiom {
    pub fn new(mut axiom: Axiom, mut annotations: Vec<Annotation>) -> Self {
        axiom.normalize();
        normalize_annotations(&mut annotations);
        Self { axiom, annotations }
    }

    #[inline]
    pub fn axiom(&self) -> &Axiom {
        &self.axiom
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn kind(&self) -> AxiomKind {
        self.axiom.kind()
    }

    #[inline]
    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn into_parts(self) -> (Axiom, Vec<Annotation>) {
        (self.axiom, self.annotations)
    }

    /// Equality that does not look at the annotations.
    pub fn equals_ignoring_annotations(&self, other: &Self) -> bool {
        self.axiom == other.axiom
    }

    pub(crate) fn walk(&self, visitor: &mut impl ComponentVisitor) {
        walk_axiom(&self.axiom, visitor);
        for annotation in &self.annotations {
            walk_annotation(annotation, visitor);
        }
    }

    /// Replaces every anonymous individual using the given mapping, then normalizes again.
    pub(crate) fn relabel_anonymous(&mut self, map: &mut impl FnMut(&BlankNode) -> BlankNode) {
        relabel_axiom(&mut self.axiom, map);
        for annotation in &mut self.annotations {
            relabel_annotation(annotation, map);
        }
        self.axiom.normalize();
        normalize_annotations(&mut self.annotations);
    }
}

impl From<Axiom> for AnnotatedAxiom {
    fn from(axiom: Axiom) -> Self {
        Self::new(axiom, Vec::new())
    }
}

impl fmt::Display for AnnotatedAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.axiom.fmt_with_annotations(f, &self.annotations)
    }
}

/// Callbacks for the components an axiom is made of.
pub(crate) trait ComponentVisitor {
    /// An entity reference, including the datatype of every literal.
    fn visit_entity(&mut self, _kind: EntityKind, _iri: NamedNodeRef<'_>) {}

    fn visit_anonymous(&mut self, _node: &BlankNode) {}

    /// An IRI that is not an entity: annotation subjects and values, annotation property
    /// domains and ranges.
    fn visit_iri(&mut self, _iri: NamedNodeRef<'_>) {}
}

pub(crate) fn walk_axiom(axiom: &Axiom, v: &mut impl ComponentVisitor) {
    match axiom {
        Axiom::Declaration(entity) => v.visit_entity(entity.kind(), entity.iri().as_ref()),
        Axiom::EquivalentClasses(classes) | Axiom::DisjointClasses(classes) => {
            for class in classes {
                walk_class(class, v);
            }
        }
        Axiom::SubClassOf {
            sub_class,
            super_class,
        } => {
            walk_class(sub_class, v);
            walk_class(super_class, v);
        }
        Axiom::DisjointUnion {
            class,
            disjoint_classes,
        } => {
            v.visit_entity(EntityKind::Class, class.as_iri_ref());
            for class in disjoint_classes {
                walk_class(class, v);
            }
        }
        Axiom::ClassAssertion { class, individual } => {
            walk_class(class, v);
            walk_individual(individual, v);
        }
        Axiom::SameIndividual(individuals) | Axiom::DifferentIndividuals(individuals) => {
            for individual in individuals {
                walk_individual(individual, v);
            }
        }
        Axiom::ObjectPropertyAssertion {
            property,
            subject,
            object,
        }
        | Axiom::NegativeObjectPropertyAssertion {
            property,
            subject,
            object,
        } => {
            walk_object_property(property, v);
            walk_individual(subject, v);
            walk_individual(object, v);
        }
        Axiom::DataPropertyAssertion {
            property,
            subject,
            value,
        }
        | Axiom::NegativeDataPropertyAssertion {
            property,
            subject,
            value,
        } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_individual(subject, v);
            walk_literal(value, v);
        }
        Axiom::EquivalentObjectProperties(properties)
        | Axiom::DisjointObjectProperties(properties) => {
            for property in properties {
                walk_object_property(property, v);
            }
        }
        Axiom::SubObjectPropertyOf {
            sub_property,
            super_property,
        } => {
            walk_object_property(sub_property, v);
            walk_object_property(super_property, v);
        }
        Axiom::InverseObjectProperties(first, second) => {
            walk_object_property(first, v);
            walk_object_property(second, v);
        }
        Axiom::FunctionalObjectProperty(p)
        | Axiom::InverseFunctionalObjectProperty(p)
        | Axiom::SymmetricObjectProperty(p)
        | Axiom::AsymmetricObjectProperty(p)
        | Axiom::TransitiveObjectProperty(p)
        | Axiom::ReflexiveObjectProperty(p)
        | Axiom::IrreflexiveObjectProperty(p) => walk_object_property(p, v),
        Axiom::ObjectPropertyDomain {
            property,
            domain: class,
        }
        | Axiom::ObjectPropertyRange {
            property,
            range: class,
        } => {
            walk_object_property(property, v);
            walk_class(class, v);
        }
        Axiom::SubPropertyChainOf {
            chain,
            super_property,
        } => {
            for property in chain {
                walk_object_property(property, v);
            }
            walk_object_property(super_property, v);
        }
        Axiom::EquivalentDataProperties(properties) | Axiom::DisjointDataProperties(properties) => {
            for property in properties {
                v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            }
        }
        Axiom::SubDataPropertyOf {
            sub_property,
            super_property,
        } => {
            v.visit_entity(EntityKind::DataProperty, sub_property.as_iri_ref());
            v.visit_entity(EntityKind::DataProperty, super_property.as_iri_ref());
        }
        Axiom::FunctionalDataProperty(property) => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
        }
        Axiom::DataPropertyDomain { property, domain } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_class(domain, v);
        }
        Axiom::DataPropertyRange { property, range } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_data_range(range, v);
        }
        Axiom::HasKey {
            class,
            object_properties,
            data_properties,
        } => {
            walk_class(class, v);
            for property in object_properties {
                walk_object_property(property, v);
            }
            for property in data_properties {
                v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            }
        }
        Axiom::Rule(rule) => {
            for atom in rule.body.iter().chain(&rule.head) {
                walk_atom(atom, v);
            }
        }
        Axiom::AnnotationAssertion {
            property,
            subject,
            value,
        } => {
            v.visit_entity(EntityKind::AnnotationProperty, property.as_iri_ref());
            match subject {
                AnnotationSubject::Iri(iri) => v.visit_iri(iri.as_ref()),
                AnnotationSubject::Anonymous(node) => v.visit_anonymous(node),
            }
            walk_annotation_value(value, v);
        }
        Axiom::SubAnnotationPropertyOf {
            sub_property,
            super_property,
        } => {
            v.visit_entity(EntityKind::AnnotationProperty, sub_property.as_iri_ref());
            v.visit_entity(EntityKind::AnnotationProperty, super_property.as_iri_ref());
        }
        Axiom::AnnotationPropertyRange { property, range: iri }
        | Axiom::AnnotationPropertyDomain {
            property,
            domain: iri,
        } => {
            v.visit_entity(EntityKind::AnnotationProperty, property.as_iri_ref());
            v.visit_iri(iri.as_ref());
        }
        Axiom::DatatypeDefinition { datatype, range } => {
            v.visit_entity(EntityKind::Datatype, datatype.as_iri_ref());
            walk_data_range(range, v);
        }
    }
}

fn walk_class(class: &ClassExpression, v: &mut impl ComponentVisitor) {
    match class {
        ClassExpression::Class(c) => v.visit_entity(EntityKind::Class, c.as_iri_ref()),
        ClassExpression::ObjectIntersectionOf(operands)
        | ClassExpression::ObjectUnionOf(operands) => {
            for operand in operands {
                walk_class(operand, v);
            }
        }
        ClassExpression::ObjectComplementOf(operand) => walk_class(operand, v),
        ClassExpression::ObjectOneOf(individuals) => {
            for individual in individuals {
                walk_individual(individual, v);
            }
        }
        ClassExpression::ObjectSomeValuesFrom { property, filler }
        | ClassExpression::ObjectAllValuesFrom { property, filler } => {
            walk_object_property(property, v);
            walk_class(filler, v);
        }
        ClassExpression::ObjectHasValue {
            property,
            individual,
        } => {
            walk_object_property(property, v);
            walk_individual(individual, v);
        }
        ClassExpression::ObjectHasSelf(property) => walk_object_property(property, v),
        ClassExpression::ObjectMinCardinality {
            property, filler, ..
        }
        | ClassExpression::ObjectMaxCardinality {
            property, filler, ..
        }
        | ClassExpression::ObjectExactCardinality {
            property, filler, ..
        } => {
            walk_object_property(property, v);
            if let Some(filler) = filler {
                walk_class(filler, v);
            }
        }
        ClassExpression::DataSomeValuesFrom { property, filler }
        | ClassExpression::DataAllValuesFrom { property, filler } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_data_range(filler, v);
        }
        ClassExpression::DataHasValue { property, value } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_literal(value, v);
        }
        ClassExpression::DataMinCardinality {
            property, filler, ..
        }
        | ClassExpression::DataMaxCardinality {
            property, filler, ..
        }
        | ClassExpression::DataExactCardinality {
            property, filler, ..
        } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            if let Some(filler) = filler {
                walk_data_range(filler, v);
            }
        }
    }
}

fn walk_object_property(property: &ObjectPropertyExpression, v: &mut impl ComponentVisitor) {
    v.visit_entity(EntityKind::ObjectProperty, property.named().as_iri_ref());
}

fn walk_data_range(range: &DataRange, v: &mut impl ComponentVisitor) {
    match range {
        DataRange::Datatype(d) => v.visit_entity(EntityKind::Datatype, d.as_iri_ref()),
        DataRange::DataIntersectionOf(operands) | DataRange::DataUnionOf(operands) => {
            for operand in operands {
                walk_data_range(operand, v);
            }
        }
        DataRange::DataComplementOf(operand) => walk_data_range(operand, v),
        DataRange::DataOneOf(values) => {
            for value in values {
                walk_literal(value, v);
            }
        }
        DataRange::DatatypeRestriction {
            datatype,
            restrictions,
        } => {
            v.visit_entity(EntityKind::Datatype, datatype.as_iri_ref());
            for restriction in restrictions {
                walk_literal(&restriction.value, v);
            }
        }
    }
}

fn walk_individual(individual: &Individual, v: &mut impl ComponentVisitor) {
    match individual {
        Individual::Named(n) => v.visit_entity(EntityKind::NamedIndividual, n.as_iri_ref()),
        Individual::Anonymous(b) => v.visit_anonymous(b),
    }
}

fn walk_literal(literal: &Literal, v: &mut impl ComponentVisitor) {
    v.visit_entity(EntityKind::Datatype, literal.datatype());
}

fn walk_annotation_value(value: &AnnotationValue, v: &mut impl ComponentVisitor) {
    match value {
        AnnotationValue::Iri(iri) => v.visit_iri(iri.as_ref()),
        AnnotationValue::Literal(literal) => walk_literal(literal, v),
        AnnotationValue::Anonymous(node) => v.visit_anonymous(node),
    }
}

fn walk_annotation(annotation: &Annotation, v: &mut impl ComponentVisitor) {
    v.visit_entity(
        EntityKind::AnnotationProperty,
        annotation.property.as_iri_ref(),
    );
    walk_annotation_value(&annotation.value, v);
    for nested in &annotation.annotations {
        walk_annotation(nested, v);
    }
}

fn walk_i_argument(argument: &IArgument, v: &mut impl ComponentVisitor) {
    if let IArgument::Individual(individual) = argument {
        walk_individual(individual, v);
    }
}

fn walk_d_argument(argument: &DArgument, v: &mut impl ComponentVisitor) {
    if let DArgument::Literal(literal) = argument {
        walk_literal(literal, v);
    }
}

fn walk_atom(atom: &Atom, v: &mut impl ComponentVisitor) {
    match atom {
        Atom::Class { class, argument } => {
            walk_class(class, v);
            walk_i_argument(argument, v);
        }
        Atom::DataRange { range, argument } => {
            walk_data_range(range, v);
            walk_d_argument(argument, v);
        }
        Atom::ObjectProperty {
            property,
            subject,
            object,
        } => {
            walk_object_property(property, v);
            walk_i_argument(subject, v);
            walk_i_argument(object, v);
        }
        Atom::DataProperty {
            property,
            subject,
            object,
        } => {
            v.visit_entity(EntityKind::DataProperty, property.as_iri_ref());
            walk_i_argument(subject, v);
            walk_d_argument(object, v);
        }
        Atom::SameIndividual(a, b) | Atom::DifferentIndividuals(a, b) => {
            walk_i_argument(a, v);
            walk_i_argument(b, v);
        }
        Atom::BuiltIn { arguments, .. } => {
            for argument in arguments {
                walk_d_argument(argument, v);
            }
        }
    }
}

fn relabel_axiom<F: FnMut(&BlankNode) -> BlankNode>(axiom: &mut Axiom, map: &mut F) {
    match axiom {
        Axiom::ClassAssertion { class, individual } => {
            relabel_class(class, map);
            relabel_individual(individual, map);
        }
        Axiom::SameIndividual(individuals) | Axiom::DifferentIndividuals(individuals) => {
            for individual in individuals {
                relabel_individual(individual, map);
            }
        }
        Axiom::ObjectPropertyAssertion {
            subject, object, ..
        }
        | Axiom::NegativeObjectPropertyAssertion {
            subject, object, ..
        } => {
            relabel_individual(subject, map);
            relabel_individual(object, map);
        }
        Axiom::DataPropertyAssertion { subject, .. }
        | Axiom::NegativeDataPropertyAssertion { subject, .. } => {
            relabel_individual(subject, map);
        }
        Axiom::EquivalentClasses(classes) | Axiom::DisjointClasses(classes) => {
            for class in classes {
                relabel_class(class, map);
            }
        }
        Axiom::DisjointUnion {
            disjoint_classes, ..
        } => {
            for class in disjoint_classes {
                relabel_class(class, map);
            }
        }
        Axiom::SubClassOf {
            sub_class,
            super_class,
        } => {
            relabel_class(sub_class, map);
            relabel_class(super_class, map);
        }
        Axiom::ObjectPropertyDomain { domain: class, .. }
        | Axiom::ObjectPropertyRange { range: class, .. }
        | Axiom::DataPropertyDomain { domain: class, .. }
        | Axiom::HasKey { class, .. } => relabel_class(class, map),
        Axiom::Rule(rule) => {
            for atom in rule.body.iter_mut().chain(rule.head.iter_mut()) {
                relabel_atom(atom, map);
            }
        }
        Axiom::AnnotationAssertion { subject, value, .. } => {
            if let AnnotationSubject::Anonymous(node) = subject {
                *node = map(node);
            }
            if let AnnotationValue::Anonymous(node) = value {
                *node = map(node);
            }
        }
        Axiom::Declaration(_)
        | Axiom::EquivalentObjectProperties(_)
        | Axiom::SubObjectPropertyOf { .. }
        | Axiom::InverseObjectProperties(..)
        | Axiom::FunctionalObjectProperty(_)
        | Axiom::InverseFunctionalObjectProperty(_)
        | Axiom::SymmetricObjectProperty(_)
        | Axiom::AsymmetricObjectProperty(_)
        | Axiom::TransitiveObjectProperty(_)
        | Axiom::ReflexiveObjectProperty(_)
        | Axiom::IrreflexiveObjectProperty(_)
        | Axiom::DisjointObjectProperties(_)
        | Axiom::SubPropertyChainOf { .. }
        | Axiom::EquivalentDataProperties(_)
        | Axiom::SubDataPropertyOf { .. }
        | Axiom::FunctionalDataProperty(_)
        | Axiom::DataPropertyRange { .. }
        | Axiom::DisjointDataProperties(_)
        | Axiom::SubAnnotationPropertyOf { .. }
        | Axiom::AnnotationPropertyRange { .. }
        | Axiom::AnnotationPropertyDomain { .. }
        | Axiom::DatatypeDefinition { .. } => (),
    }
}

fn relabel_class<F: FnMut(&BlankNode) -> BlankNode>(
    class: &mut ClassExpression,
    map: &mut F,
) {
    match class {
        ClassExpression::ObjectIntersectionOf(operands)
        | ClassExpression::ObjectUnionOf(operands) => {
            for operand in operands {
                relabel_class(operand, map);
            }
        }
        ClassExpression::ObjectComplementOf(operand) => relabel_class(operand, map),
        ClassExpression::ObjectOneOf(individuals) => {
            for individual in individuals {
                relabel_individual(individual, map);
            }
        }
        ClassExpression::ObjectSomeValuesFrom { filler, .. }
        | ClassExpression::ObjectAllValuesFrom { filler, .. } => relabel_class(filler, map),
        ClassExpression::ObjectHasValue { individual, .. } => relabel_individual(individual, map),
        ClassExpression::ObjectMinCardinality {
            filler: Some(filler),
            ..
        }
        | ClassExpression::ObjectMaxCardinality {
            filler: Some(filler),
            ..
        }
        | ClassExpression::ObjectExactCardinality {
            filler: Some(filler),
            ..
        } => relabel_class(filler, map),
        ClassExpression::Class(_)
        | ClassExpression::ObjectHasSelf(_)
        | ClassExpression::ObjectMinCardinality { filler: None, .. }
        | ClassExpression::ObjectMaxCardinality { filler: None, .. }
        | ClassExpression::ObjectExactCardinality { filler: None, .. }
        | ClassExpression::DataSomeValuesFrom { .. }
        | ClassExpression::DataAllValuesFrom { .. }
        | ClassExpression::DataHasValue { .. }
        | ClassExpression::DataMinCardinality { .. }
        | ClassExpression::DataMaxCardinality { .. }
        | ClassExpression::DataExactCardinality { .. } => (),
    }
}

fn relabel_individual<F: FnMut(&BlankNode) -> BlankNode>(
    individual: &mut Individual,
    map: &mut F,
) {
    if let Individual::Anonymous(node) = individual {
        *node = map(node);
    }
}

fn relabel_i_argument<F: FnMut(&BlankNode) -> BlankNode>(
    argument: &mut IArgument,
    map: &mut F,
) {
    if let IArgument::Individual(individual) = argument {
        relabel_individual(individual, map);
    }
}

fn relabel_atom<F: FnMut(&BlankNode) -> BlankNode>(atom: &mut Atom, map: &mut F) {
    match atom {
        Atom::Class { class, argument } => {
            relabel_class(class, map);
            relabel_i_argument(argument, map);
        }
        Atom::ObjectProperty {
            subject, object, ..
        } => {
            relabel_i_argument(subject, map);
            relabel_i_argument(object, map);
        }
        Atom::DataProperty { subject, .. } => relabel_i_argument(subject, map),
        Atom::SameIndividual(a, b) | Atom::DifferentIndividuals(a, b) => {
            relabel_i_argument(a, map);
            relabel_i_argument(b, map);
        }
        Atom::DataRange { .. } | Atom::BuiltIn { .. } => (),
    }
}

fn relabel_annotation<F: FnMut(&BlankNode) -> BlankNode>(
    annotation: &mut Annotation,
    map: &mut F,
) {
    if let AnnotationValue::Anonymous(node) = &mut annotation.value {
        *node = map(node);
    }
    for nested in &mut annotation.annotations {
        relabel_annotation(nested, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ObjectProperty;
    use oxrdf::vocab::{rdfs, xsd};

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn class(name: &str) -> ClassExpression {
        ClassExpression::class(iri(name))
    }

    #[test]
    fn test_kind_order_and_count() {
        assert_eq!(AxiomKind::ALL.len(), 39);
        assert_eq!(AxiomKind::ALL[0], AxiomKind::Declaration);
        assert_eq!(AxiomKind::ALL[38], AxiomKind::DatatypeDefinition);
        let mut sorted = AxiomKind::ALL;
        sorted.sort();
        assert_eq!(sorted, AxiomKind::ALL, "declaration order is the enumeration order");
    }

    #[test]
    fn test_is_logical() {
        assert!(AxiomKind::SubClassOf.is_logical());
        assert!(AxiomKind::Rule.is_logical());
        assert!(!AxiomKind::Declaration.is_logical());
        assert!(!AxiomKind::AnnotationAssertion.is_logical());
    }

    #[test]
    fn test_display() {
        let axiom = Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::some_values_from(ObjectProperty::new(iri("p")), class("C")),
        };
        assert_eq!(
            axiom.to_string(),
            "SubClassOf(<http://example.org/A> ObjectSomeValuesFrom(<http://example.org/p> <http://example.org/C>))"
        );
        let annotated = axiom.annotated(vec![Annotation::new(
            rdfs::COMMENT,
            Literal::new_simple_literal("note"),
        )]);
        assert_eq!(
            annotated.to_string(),
            "SubClassOf(Annotation(<http://www.w3.org/2000/01/rdf-schema#comment> \"note\") <http://example.org/A> ObjectSomeValuesFrom(<http://example.org/p> <http://example.org/C>))"
        );
    }

    #[test]
    fn test_equality_with_and_without_annotations() {
        let axiom = Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: class("B"),
        };
        let bare = AnnotatedAxiom::from(axiom.clone());
        let annotated = axiom.annotated(vec![Annotation::new(
            rdfs::LABEL,
            Literal::new_simple_literal("x"),
        )]);
        assert_ne!(bare, annotated);
        assert!(bare.equals_ignoring_annotations(&annotated));
    }

    #[test]
    fn test_normalized_sets_compare_equal() {
        let left = AnnotatedAxiom::from(Axiom::EquivalentClasses(vec![class("B"), class("A")]));
        let right = AnnotatedAxiom::from(Axiom::EquivalentClasses(vec![class("A"), class("B")]));
        assert_eq!(left, right);

        let chain = |order: [&str; 2]| {
            AnnotatedAxiom::from(Axiom::SubPropertyChainOf {
                chain: order
                    .iter()
                    .map(|name| ObjectProperty::new(iri(name)).into())
                    .collect(),
                super_property: ObjectProperty::new(iri("q")).into(),
            })
        };
        assert_ne!(chain(["a", "b"]), chain(["b", "a"]), "chains are ordered");
    }

    #[test]
    fn test_signature_includes_literal_datatypes() {
        let axiom = Axiom::DataPropertyAssertion {
            property: DataProperty::new(iri("age")),
            subject: Individual::from(iri("alice")),
            value: Literal::new_typed_literal("42", xsd::INTEGER),
        };
        let signature = axiom.signature();
        assert!(signature.contains(&Entity::Datatype(Datatype::from(xsd::INTEGER))));
        assert!(signature.contains(&EntityKind::NamedIndividual.entity(iri("alice"))));
        assert_eq!(signature.len(), 3);
    }

    #[test]
    fn test_signature_excludes_annotation_subject() {
        let axiom = Axiom::AnnotationAssertion {
            property: AnnotationProperty::from(rdfs::LABEL),
            subject: AnnotationSubject::Iri(iri("A")),
            value: AnnotationValue::Iri(iri("B")),
        };
        let signature = axiom.signature();
        assert_eq!(signature.len(), 1);
        assert!(signature.contains(&Entity::AnnotationProperty(AnnotationProperty::from(
            rdfs::LABEL
        ))));
    }

    #[test]
    fn test_relabel_anonymous() {
        let mut axiom = AnnotatedAxiom::from(Axiom::ClassAssertion {
            class: class("A"),
            individual: Individual::Anonymous(BlankNode::new_unchecked("x")),
        });
        axiom.relabel_anonymous(&mut |_| BlankNode::new_unchecked("y"));
        assert_eq!(
            axiom.axiom(),
            &Axiom::ClassAssertion {
                class: class("A"),
                individual: Individual::Anonymous(BlankNode::new_unchecked("y")),
            }
        );
    }
}
