//! Translation of the triples that carry axioms.
//!
//! Most axioms are a single triple dispatched on its predicate. Multi-triple axioms
//! (`owl:AllDisjointClasses`, `owl:NegativePropertyAssertion`, `swrl:Imp`, …) are entered
//! through the `rdf:type` triple of their node.

use super::consumer::{Consumer, Halt, N_ARY_TYPES, PropertyKind, Shape, Translation, invalid};
use super::store::TripleId;
use crate::annotation::AnnotationSubject;
use crate::axiom::{AnnotatedAxiom, Axiom};
use crate::entity::{AnnotationProperty, Datatype, EntityKind, OwlClass};
use crate::error::{TranslationError, TranslationErrorKind};
use crate::expression::{ClassExpression, ObjectPropertyExpression};
use crate::swrl::{Atom, Rule};
use crate::vocab::{owl, swrl};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNode, NamedNodeRef, NamedOrBlankNode, Term, Triple};

type Characteristic = fn(ObjectPropertyExpression) -> Axiom;

const CHARACTERISTICS: [(NamedNodeRef<'static>, Characteristic); 6] = [
    (
        owl::INVERSE_FUNCTIONAL_PROPERTY,
        Axiom::InverseFunctionalObjectProperty,
    ),
    (owl::TRANSITIVE_PROPERTY, Axiom::TransitiveObjectProperty),
    (owl::SYMMETRIC_PROPERTY, Axiom::SymmetricObjectProperty),
    (owl::ASYMMETRIC_PROPERTY, Axiom::AsymmetricObjectProperty),
    (owl::REFLEXIVE_PROPERTY, Axiom::ReflexiveObjectProperty),
    (owl::IRREFLEXIVE_PROPERTY, Axiom::IrreflexiveObjectProperty),
];

/// The axiom constructor of a characteristic only object properties can have.
pub(super) fn object_characteristic(class: NamedNodeRef<'_>) -> Option<Characteristic> {
    CHARACTERISTICS
        .iter()
        .find(|(characteristic, _)| *characteristic == class)
        .map(|(_, constructor)| *constructor)
}

impl Consumer<'_> {
    /// Translates the axiom the triple stands for.
    pub(super) fn handle_triple(&mut self, id: TripleId) -> Translation<Vec<AnnotatedAxiom>> {
        let Triple {
            subject,
            predicate,
            object,
        } = self.store.get(id).clone();
        if predicate == rdf::TYPE {
            if let Term::NamedNode(class) = &object {
                if N_ARY_TYPES.contains(&class.as_ref()) {
                    return Ok(vec![self.n_ary_axiom(&subject, class.as_ref())?]);
                }
            }
            return Ok(vec![self.type_axiom(&subject, &object)?.into()]);
        }
        Ok(vec![
            self.predicate_axiom(&subject, &predicate, &object)?.into(),
        ])
    }

    fn predicate_axiom(
        &mut self,
        subject: &NamedOrBlankNode,
        predicate: &NamedNode,
        object: &Term,
    ) -> Translation<Axiom> {
        let s = Term::from(subject.clone());
        let p = predicate.as_ref();
        if p == rdfs::SUB_CLASS_OF {
            Ok(Axiom::SubClassOf {
                sub_class: self.class_expression(&s)?,
                super_class: self.class_expression(object)?,
            })
        } else if p == owl::EQUIVALENT_CLASS {
            if self.defines_datatype(&s, object) {
                return Ok(Axiom::DatatypeDefinition {
                    datatype: Datatype::new(self.named(&s, "a datatype")?),
                    range: self.data_range(object)?,
                });
            }
            Ok(Axiom::EquivalentClasses(vec![
                self.class_expression(&s)?,
                self.class_expression(object)?,
            ]))
        } else if p == owl::DISJOINT_WITH {
            Ok(Axiom::DisjointClasses(vec![
                self.class_expression(&s)?,
                self.class_expression(object)?,
            ]))
        } else if p == owl::DISJOINT_UNION_OF {
            let class = self.named(&s, "a named class")?;
            self.learn(&class, EntityKind::Class);
            Ok(Axiom::DisjointUnion {
                class: OwlClass::new(class),
                disjoint_classes: self.class_list(object)?,
            })
        } else if p == owl::HAS_KEY {
            self.has_key(&s, object)
        } else if p == rdfs::SUB_PROPERTY_OF {
            Ok(match self.pair_kind(&s, object)? {
                PropertyKind::Object => Axiom::SubObjectPropertyOf {
                    sub_property: self.object_property_expression(&s)?,
                    super_property: self.object_property_expression(object)?,
                },
                PropertyKind::Data => Axiom::SubDataPropertyOf {
                    sub_property: self.data_property(&s)?,
                    super_property: self.data_property(object)?,
                },
                PropertyKind::Annotation => Axiom::SubAnnotationPropertyOf {
                    sub_property: self.named(&s, "an annotation property")?.into(),
                    super_property: self.named(object, "an annotation property")?.into(),
                },
            })
        } else if p == owl::PROPERTY_CHAIN_AXIOM {
            Ok(Axiom::SubPropertyChainOf {
                super_property: self.object_property_expression(&s)?,
                chain: self.object_property_list(object)?,
            })
        } else if p == owl::EQUIVALENT_PROPERTY {
            match self.pair_kind(&s, object)? {
                PropertyKind::Object => Ok(Axiom::EquivalentObjectProperties(vec![
                    self.object_property_expression(&s)?,
                    self.object_property_expression(object)?,
                ])),
                PropertyKind::Data => Ok(Axiom::EquivalentDataProperties(vec![
                    self.data_property(&s)?,
                    self.data_property(object)?,
                ])),
                PropertyKind::Annotation => Err(invalid(&s, "an object or data property")),
            }
        } else if p == owl::PROPERTY_DISJOINT_WITH {
            match self.pair_kind(&s, object)? {
                PropertyKind::Object => Ok(Axiom::DisjointObjectProperties(vec![
                    self.object_property_expression(&s)?,
                    self.object_property_expression(object)?,
                ])),
                PropertyKind::Data => Ok(Axiom::DisjointDataProperties(vec![
                    self.data_property(&s)?,
                    self.data_property(object)?,
                ])),
                PropertyKind::Annotation => Err(invalid(&s, "an object or data property")),
            }
        } else if p == owl::INVERSE_OF {
            Ok(Axiom::InverseObjectProperties(
                self.object_property_expression(&s)?,
                self.object_property_expression(object)?,
            ))
        } else if p == rdfs::DOMAIN {
            self.domain_axiom(subject, object)
        } else if p == rdfs::RANGE {
            self.range_axiom(subject, object)
        } else if p == owl::SAME_AS {
            Ok(Axiom::SameIndividual(vec![
                self.individual(&s)?,
                self.individual(object)?,
            ]))
        } else if p == owl::DIFFERENT_FROM {
            Ok(Axiom::DifferentIndividuals(vec![
                self.individual(&s)?,
                self.individual(object)?,
            ]))
        } else if p == owl::INTERSECTION_OF
            || p == owl::UNION_OF
            || p == owl::COMPLEMENT_OF
            || p == owl::ONE_OF
        {
            let class = self.class_expression(&s)?;
            let definition = self.class_definition(p, object)?;
            Ok(Axiom::EquivalentClasses(vec![class, definition]))
        } else {
            self.assertion_axiom(subject, predicate, object)
        }
    }

    /// Whether an `owl:equivalentClass` triple defines a datatype rather than relating classes.
    fn defines_datatype(&self, subject: &Term, object: &Term) -> bool {
        let Term::NamedNode(iri) = subject else {
            return false;
        };
        !self.has_kind(iri, EntityKind::Class)
            && (self.has_kind(iri, EntityKind::Datatype)
                || self.shape(object, 0) == Shape::DataRange)
    }

    /// A boolean constructor used directly on a named class.
    fn class_definition(
        &mut self,
        predicate: NamedNodeRef<'_>,
        object: &Term,
    ) -> Translation<ClassExpression> {
        Ok(if predicate == owl::INTERSECTION_OF {
            ClassExpression::ObjectIntersectionOf(self.class_list(object)?)
        } else if predicate == owl::UNION_OF {
            ClassExpression::ObjectUnionOf(self.class_list(object)?)
        } else if predicate == owl::COMPLEMENT_OF {
            ClassExpression::ObjectComplementOf(Box::new(self.class_expression(object)?))
        } else {
            ClassExpression::ObjectOneOf(self.individual_list(object)?)
        })
    }

    fn has_key(&mut self, subject: &Term, object: &Term) -> Translation<Axiom> {
        let class = self.class_expression(subject)?;
        let mut object_properties = Vec::new();
        let mut data_properties = Vec::new();
        for property in self.read_list(object)? {
            let kind = match &property {
                Term::NamedNode(iri) => self.resolve_property(iri, None)?,
                Term::BlankNode(_) => PropertyKind::Object,
                _ => return Err(invalid(&property, "a key property")),
            };
            match kind {
                PropertyKind::Object => {
                    object_properties.push(self.object_property_expression(&property)?);
                }
                PropertyKind::Data => data_properties.push(self.data_property(&property)?),
                PropertyKind::Annotation => {
                    return Err(invalid(&property, "an object or data property"));
                }
            }
        }
        Ok(Axiom::HasKey {
            class,
            object_properties,
            data_properties,
        })
    }

    /// The kind of a property in subject position. Inverse expressions are object properties.
    fn subject_kind(
        &mut self,
        subject: &NamedOrBlankNode,
        hint: Option<PropertyKind>,
    ) -> Translation<PropertyKind> {
        match subject {
            NamedOrBlankNode::NamedNode(iri) => self.resolve_property(iri, hint),
            NamedOrBlankNode::BlankNode(_) => Ok(PropertyKind::Object),
        }
    }

    fn domain_axiom(&mut self, subject: &NamedOrBlankNode, object: &Term) -> Translation<Axiom> {
        let s = Term::from(subject.clone());
        Ok(match self.subject_kind(subject, None)? {
            PropertyKind::Object => Axiom::ObjectPropertyDomain {
                property: self.object_property_expression(&s)?,
                domain: self.class_expression(object)?,
            },
            PropertyKind::Data => Axiom::DataPropertyDomain {
                property: self.data_property(&s)?,
                domain: self.class_expression(object)?,
            },
            PropertyKind::Annotation => Axiom::AnnotationPropertyDomain {
                property: self.named(&s, "an annotation property")?.into(),
                domain: self.named(object, "an IRI")?,
            },
        })
    }

    fn range_axiom(&mut self, subject: &NamedOrBlankNode, object: &Term) -> Translation<Axiom> {
        let s = Term::from(subject.clone());
        let hint = match self.shape(object, 0) {
            Shape::Class => Some(PropertyKind::Object),
            Shape::DataRange => Some(PropertyKind::Data),
            Shape::Unknown => None,
        };
        Ok(match self.subject_kind(subject, hint)? {
            PropertyKind::Object => Axiom::ObjectPropertyRange {
                property: self.object_property_expression(&s)?,
                range: self.class_expression(object)?,
            },
            PropertyKind::Data => Axiom::DataPropertyRange {
                property: self.data_property(&s)?,
                range: self.data_range(object)?,
            },
            PropertyKind::Annotation => Axiom::AnnotationPropertyRange {
                property: self.named(&s, "an annotation property")?.into(),
                range: self.named(object, "an IRI")?,
            },
        })
    }

    fn type_axiom(&mut self, subject: &NamedOrBlankNode, object: &Term) -> Translation<Axiom> {
        let s = Term::from(subject.clone());
        if let Term::NamedNode(class) = object {
            let class = class.as_ref();
            if class == owl::FUNCTIONAL_PROPERTY {
                return match self.subject_kind(subject, None)? {
                    PropertyKind::Object => Ok(Axiom::FunctionalObjectProperty(
                        self.object_property_expression(&s)?,
                    )),
                    PropertyKind::Data => {
                        Ok(Axiom::FunctionalDataProperty(self.data_property(&s)?))
                    }
                    PropertyKind::Annotation => Err(invalid(&s, "an object or data property")),
                };
            }
            if let Some(constructor) = object_characteristic(class) {
                return Ok(constructor(self.object_property_expression(&s)?));
            }
        }
        if matches!(object, Term::Literal(_)) {
            return Err(invalid(object, "a class"));
        }
        Ok(Axiom::ClassAssertion {
            class: self.class_expression(object)?,
            individual: self.individual(&s)?,
        })
    }

    /// An axiom spread over the triples of one node, with the annotations found on that node.
    fn n_ary_axiom(
        &mut self,
        node: &NamedOrBlankNode,
        class: NamedNodeRef<'_>,
    ) -> Translation<AnnotatedAxiom> {
        let axiom = if class == owl::ALL_DISJOINT_CLASSES {
            let members = self.single_object(node, owl::MEMBERS)?;
            Axiom::DisjointClasses(self.class_list(&members)?)
        } else if class == owl::ALL_DISJOINT_PROPERTIES {
            let members = self.single_object(node, owl::MEMBERS)?;
            let members = self.read_list(&members)?;
            self.disjoint_properties(&members)?
        } else if class == owl::ALL_DIFFERENT {
            let predicate = if self.store.matching(node, owl::MEMBERS).next().is_some() {
                owl::MEMBERS
            } else {
                owl::DISTINCT_MEMBERS
            };
            let members = self.single_object(node, predicate)?;
            Axiom::DifferentIndividuals(self.individual_list(&members)?)
        } else if class == owl::NEGATIVE_PROPERTY_ASSERTION {
            self.negative_assertion(node)?
        } else {
            Axiom::Rule(self.rule(node)?)
        };
        let annotations = self.annotations_on(node)?;
        Ok(axiom.annotated(annotations))
    }

    fn disjoint_properties(&mut self, members: &[Term]) -> Translation<Axiom> {
        let known = members.iter().find_map(|member| match member {
            Term::NamedNode(iri) => self.property_kind(iri),
            Term::BlankNode(_) => Some(PropertyKind::Object),
            _ => None,
        });
        let kind = match (known, members.first()) {
            (Some(kind), _) => kind,
            (None, Some(Term::NamedNode(iri))) => self.resolve_property(iri, None)?,
            (None, Some(other)) => return Err(invalid(other, "a property")),
            (None, None) => PropertyKind::Object,
        };
        match kind {
            PropertyKind::Object => Ok(Axiom::DisjointObjectProperties(
                members
                    .iter()
                    .map(|member| self.object_property_expression(member))
                    .collect::<Translation<_>>()?,
            )),
            PropertyKind::Data => Ok(Axiom::DisjointDataProperties(
                members
                    .iter()
                    .map(|member| self.data_property(member))
                    .collect::<Translation<_>>()?,
            )),
            PropertyKind::Annotation => Err(TranslationError::new(
                TranslationErrorKind::InvalidValue,
                "annotation properties cannot be disjoint",
            )
            .into()),
        }
    }

    fn negative_assertion(&mut self, node: &NamedOrBlankNode) -> Translation<Axiom> {
        let source = self.single_object(node, owl::SOURCE_INDIVIDUAL)?;
        let subject = self.individual(&source)?;
        let property = self.single_object(node, owl::ASSERTION_PROPERTY)?;
        if self.store.matching(node, owl::TARGET_VALUE).next().is_some() {
            let value = self.single_object(node, owl::TARGET_VALUE)?;
            Ok(Axiom::NegativeDataPropertyAssertion {
                property: self.data_property(&property)?,
                subject,
                value: self.literal(&value)?,
            })
        } else {
            let target = self.single_object(node, owl::TARGET_INDIVIDUAL)?;
            Ok(Axiom::NegativeObjectPropertyAssertion {
                property: self.object_property_expression(&property)?,
                subject,
                object: self.individual(&target)?,
            })
        }
    }

    fn rule(&mut self, node: &NamedOrBlankNode) -> Translation<Rule> {
        let body = self.single_object(node, swrl::BODY)?;
        let head = self.single_object(node, swrl::HEAD)?;
        Ok(Rule {
            body: self.atom_list(&body)?,
            head: self.atom_list(&head)?,
        })
    }

    fn atom_list(&mut self, head: &Term) -> Translation<Vec<Atom>> {
        self.read_list(head)?
            .iter()
            .map(|atom| self.atom(atom))
            .collect()
    }

    /// A triple whose predicate is not OWL vocabulary: an assertion of that property.
    fn assertion_axiom(
        &mut self,
        subject: &NamedOrBlankNode,
        predicate: &NamedNode,
        object: &Term,
    ) -> Translation<Axiom> {
        let s = Term::from(subject.clone());
        let kind = match self.property_kind(predicate) {
            Some(kind) => kind,
            None if !self.forced => return Err(Halt::Deferred(predicate.clone())),
            None if self.config.treat_dangling_triples_as_axiom => {
                self.learn(predicate, EntityKind::AnnotationProperty);
                PropertyKind::Annotation
            }
            None => {
                let kind = if matches!(object, Term::Literal(_)) {
                    PropertyKind::Data
                } else {
                    PropertyKind::Object
                };
                self.recover(
                    TranslationError::warning(
                        TranslationErrorKind::UnresolvedForwardReference,
                        format!(
                            "{predicate} is never declared, reading it as {} property from its value",
                            if kind == PropertyKind::Data {
                                "a data"
                            } else {
                                "an object"
                            }
                        ),
                    )
                    .with_node(predicate.clone()),
                )?;
                kind
            }
        };
        Ok(match kind {
            PropertyKind::Annotation => Axiom::AnnotationAssertion {
                property: AnnotationProperty::new(predicate.clone()),
                subject: match subject {
                    NamedOrBlankNode::NamedNode(iri) => AnnotationSubject::Iri(iri.clone()),
                    NamedOrBlankNode::BlankNode(node) => {
                        AnnotationSubject::Anonymous(self.anonymous(node))
                    }
                },
                value: self.annotation_value(object)?,
            },
            PropertyKind::Object => Axiom::ObjectPropertyAssertion {
                property: self.object_property_expression(&Term::from(predicate.clone()))?,
                subject: self.individual(&s)?,
                object: self.individual(object)?,
            },
            PropertyKind::Data => Axiom::DataPropertyAssertion {
                property: self.data_property(&Term::from(predicate.clone()))?,
                subject: self.individual(&s)?,
                value: self.literal(object)?,
            },
        })
    }
}

