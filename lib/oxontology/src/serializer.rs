//! Rendering of ontologies as RDF, following the OWL 2 RDF mapping.
//!
//! This is the inverse of the [parser](crate::RdfOntologyParser): loading the triples written
//! here gives back the same axioms, up to blank node labels. Axioms with no single RDF
//! counterpart are rendered pairwise (`EquivalentClasses` of more than two classes,
//! `SameIndividual`, `EquivalentObjectProperties`, …) and are read back as several binary axioms.

use crate::annotation::{Annotation, AnnotationSubject};
use crate::axiom::{AnnotatedAxiom, Axiom};
use crate::entity::{DataProperty, Entity, Individual};
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression};
use crate::ontology::Ontology;
use crate::swrl::{Atom, DArgument, IArgument};
use crate::vocab::{owl, swrl};
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, Triple};
use oxrdfio::{RdfFormat, RdfSerializer};
use std::io::{self, Write};

const PREFIXES: [(&str, &str); 4] = [
    ("owl", owl::NAMESPACE),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Renders an [`Ontology`] as an RDF graph.
///
/// ```
/// use oxontology::{Axiom, ClassExpression, Ontology, OntologySerializer};
/// use oxrdf::NamedNode;
///
/// let mut ontology = Ontology::default();
/// ontology.add_axiom(Axiom::SubClassOf {
///     sub_class: ClassExpression::class(NamedNode::new("http://example.com/Dog")?),
///     super_class: ClassExpression::class(NamedNode::new("http://example.com/Animal")?),
/// });
/// let graph = OntologySerializer::new().serialize(&ontology);
/// assert_eq!(graph.len(), 2); // the header and the axiom
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OntologySerializer {
    _private: (),
}

impl OntologySerializer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize(&self, ontology: &Ontology) -> Graph {
        let mut renderer = Renderer::default();
        renderer.header(ontology);
        for axiom in ontology.axioms() {
            renderer.annotated_axiom(axiom);
        }
        renderer.graph
    }

    /// Writes the rendering of the ontology in any RDF syntax.
    pub fn write<W: Write>(
        &self,
        ontology: &Ontology,
        format: RdfFormat,
        writer: W,
    ) -> io::Result<W> {
        let mut serializer = RdfSerializer::from_format(format);
        for (name, iri) in PREFIXES {
            serializer = serializer.with_prefix(name, iri).map_err(io::Error::other)?;
        }
        let mut writer = serializer.for_writer(writer);
        for triple in &self.serialize(ontology) {
            writer.serialize_triple(triple)?;
        }
        writer.finish()
    }
}

/// How an axiom ended up in the graph, which decides where its annotations go.
enum Rendered {
    /// Triples that each stand for the axiom, annotated through `owl:Axiom` reification.
    Triples(Vec<Triple>),
    /// A node gathering the axiom, annotated directly.
    Node(NamedOrBlankNode),
}

#[derive(Default)]
struct Renderer {
    graph: Graph,
}

impl Renderer {
    fn add(
        &mut self,
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) {
        self.graph.insert(&Triple::new(subject, predicate, object));
    }

    /// A fresh blank node typed with `class`.
    fn node(&mut self, class: NamedNodeRef<'_>) -> NamedOrBlankNode {
        let node = NamedOrBlankNode::from(BlankNode::default());
        self.add(node.clone(), rdf::TYPE, class);
        node
    }

    fn header(&mut self, ontology: &Ontology) {
        let node: NamedOrBlankNode = ontology
            .id()
            .ontology_iri()
            .map_or_else(|| BlankNode::default().into(), |iri| iri.clone().into());
        self.add(node.clone(), rdf::TYPE, owl::ONTOLOGY);
        if let Some(version) = ontology.id().version_iri() {
            self.add(node.clone(), owl::VERSION_IRI, version.clone());
        }
        for import in ontology.imports() {
            self.add(node.clone(), owl::IMPORTS, import.clone());
        }
        self.annotations(&node, ontology.annotations());
    }

    fn annotations(&mut self, subject: &NamedOrBlankNode, annotations: &[Annotation]) {
        for annotation in annotations {
            let value = Term::from(annotation.value.clone());
            self.add(
                subject.clone(),
                annotation.property.iri().clone(),
                value.clone(),
            );
            if !annotation.annotations.is_empty() {
                let reifier = self.node(owl::ANNOTATION);
                self.add(reifier.clone(), owl::ANNOTATED_SOURCE, subject.clone());
                self.add(
                    reifier.clone(),
                    owl::ANNOTATED_PROPERTY,
                    annotation.property.iri().clone(),
                );
                self.add(reifier.clone(), owl::ANNOTATED_TARGET, value);
                self.annotations(&reifier, &annotation.annotations);
            }
        }
    }

    fn annotated_axiom(&mut self, axiom: &AnnotatedAxiom) {
        match self.axiom(axiom.axiom()) {
            Rendered::Node(node) => self.annotations(&node, axiom.annotations()),
            Rendered::Triples(triples) => {
                for triple in triples {
                    self.graph.insert(&triple);
                    if axiom.is_annotated() {
                        let reifier = self.node(owl::AXIOM);
                        self.add(reifier.clone(), owl::ANNOTATED_SOURCE, triple.subject);
                        self.add(reifier.clone(), owl::ANNOTATED_PROPERTY, triple.predicate);
                        self.add(reifier.clone(), owl::ANNOTATED_TARGET, triple.object);
                        self.annotations(&reifier, axiom.annotations());
                    }
                }
            }
        }
    }

    #[expect(clippy::too_many_lines)]
    fn axiom(&mut self, axiom: &Axiom) -> Rendered {
        let triples = match axiom {
            Axiom::Declaration(entity) => vec![Triple::new(
                entity.iri().clone(),
                rdf::TYPE,
                declaration_type(entity),
            )],
            Axiom::EquivalentClasses(classes) => {
                let classes = self.class_expressions(classes);
                pairwise(&classes, owl::EQUIVALENT_CLASS)
            }
            Axiom::SubClassOf {
                sub_class,
                super_class,
            } => vec![Triple::new(
                self.class_expression(sub_class),
                rdfs::SUB_CLASS_OF,
                self.class_expression(super_class),
            )],
            Axiom::DisjointClasses(classes) => {
                let classes = self.class_expressions(classes);
                if classes.len() > 2 {
                    return self.members(owl::ALL_DISJOINT_CLASSES, owl::MEMBERS, classes);
                }
                pairwise(&classes, owl::DISJOINT_WITH)
            }
            Axiom::DisjointUnion {
                class,
                disjoint_classes,
            } => {
                let classes = self.class_expressions(disjoint_classes);
                vec![Triple::new(
                    class.iri().clone(),
                    owl::DISJOINT_UNION_OF,
                    self.list(classes),
                )]
            }
            Axiom::ClassAssertion { class, individual } => vec![Triple::new(
                individual_node(individual),
                rdf::TYPE,
                self.class_expression(class),
            )],
            Axiom::SameIndividual(individuals) => {
                pairwise(&individual_nodes(individuals), owl::SAME_AS)
            }
            Axiom::DifferentIndividuals(individuals) => {
                let individuals = individual_nodes(individuals);
                if individuals.len() > 2 {
                    return self.members(owl::ALL_DIFFERENT, owl::MEMBERS, individuals);
                }
                pairwise(&individuals, owl::DIFFERENT_FROM)
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                let (subject, object) = (individual_node(subject), individual_node(object));
                vec![match property {
                    ObjectPropertyExpression::ObjectProperty(p) => {
                        Triple::new(subject, p.iri().clone(), object)
                    }
                    ObjectPropertyExpression::InverseObjectProperty(p) => {
                        Triple::new(object, p.iri().clone(), subject)
                    }
                }]
            }
            Axiom::NegativeObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                let property = self.object_property(property);
                let node = self.negative_assertion(subject, property);
                self.add(node.clone(), owl::TARGET_INDIVIDUAL, individual_node(object));
                return Rendered::Node(node);
            }
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => vec![Triple::new(
                individual_node(subject),
                property.iri().clone(),
                value.clone(),
            )],
            Axiom::NegativeDataPropertyAssertion {
                property,
                subject,
                value,
            } => {
                let node = self.negative_assertion(subject, property.iri().clone().into());
                self.add(node.clone(), owl::TARGET_VALUE, value.clone());
                return Rendered::Node(node);
            }
            Axiom::EquivalentObjectProperties(properties) => {
                let properties = self.object_properties(properties);
                pairwise(&properties, owl::EQUIVALENT_PROPERTY)
            }
            Axiom::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => vec![Triple::new(
                self.object_property(sub_property),
                rdfs::SUB_PROPERTY_OF,
                self.object_property(super_property),
            )],
            Axiom::InverseObjectProperties(first, second) => vec![Triple::new(
                self.object_property(first),
                owl::INVERSE_OF,
                self.object_property(second),
            )],
            Axiom::FunctionalObjectProperty(p) => self.characteristic(p, owl::FUNCTIONAL_PROPERTY),
            Axiom::InverseFunctionalObjectProperty(p) => {
                self.characteristic(p, owl::INVERSE_FUNCTIONAL_PROPERTY)
            }
            Axiom::SymmetricObjectProperty(p) => self.characteristic(p, owl::SYMMETRIC_PROPERTY),
            Axiom::AsymmetricObjectProperty(p) => self.characteristic(p, owl::ASYMMETRIC_PROPERTY),
            Axiom::TransitiveObjectProperty(p) => {
                self.characteristic(p, owl::TRANSITIVE_PROPERTY)
            }
            Axiom::ReflexiveObjectProperty(p) => self.characteristic(p, owl::REFLEXIVE_PROPERTY),
            Axiom::IrreflexiveObjectProperty(p) => {
                self.characteristic(p, owl::IRREFLEXIVE_PROPERTY)
            }
            Axiom::ObjectPropertyDomain { property, domain } => vec![Triple::new(
                self.object_property(property),
                rdfs::DOMAIN,
                self.class_expression(domain),
            )],
            Axiom::ObjectPropertyRange { property, range } => vec![Triple::new(
                self.object_property(property),
                rdfs::RANGE,
                self.class_expression(range),
            )],
            Axiom::DisjointObjectProperties(properties) => {
                let properties = self.object_properties(properties);
                if properties.len() > 2 {
                    return self.members(owl::ALL_DISJOINT_PROPERTIES, owl::MEMBERS, properties);
                }
                pairwise(&properties, owl::PROPERTY_DISJOINT_WITH)
            }
            Axiom::SubPropertyChainOf {
                chain,
                super_property,
            } => {
                let chain = self.object_properties(chain);
                vec![Triple::new(
                    self.object_property(super_property),
                    owl::PROPERTY_CHAIN_AXIOM,
                    self.list(chain),
                )]
            }
            Axiom::EquivalentDataProperties(properties) => {
                pairwise(&data_properties(properties), owl::EQUIVALENT_PROPERTY)
            }
            Axiom::SubDataPropertyOf {
                sub_property,
                super_property,
            } => vec![Triple::new(
                sub_property.iri().clone(),
                rdfs::SUB_PROPERTY_OF,
                super_property.iri().clone(),
            )],
            Axiom::FunctionalDataProperty(property) => vec![Triple::new(
                property.iri().clone(),
                rdf::TYPE,
                owl::FUNCTIONAL_PROPERTY,
            )],
            Axiom::DataPropertyDomain { property, domain } => vec![Triple::new(
                property.iri().clone(),
                rdfs::DOMAIN,
                self.class_expression(domain),
            )],
            Axiom::DataPropertyRange { property, range } => vec![Triple::new(
                property.iri().clone(),
                rdfs::RANGE,
                self.data_range(range),
            )],
            Axiom::DisjointDataProperties(properties) => {
                let properties = data_properties(properties);
                if properties.len() > 2 {
                    return self.members(owl::ALL_DISJOINT_PROPERTIES, owl::MEMBERS, properties);
                }
                pairwise(&properties, owl::PROPERTY_DISJOINT_WITH)
            }
            Axiom::HasKey {
                class,
                object_properties,
                data_properties: keys,
            } => {
                let mut properties = self.object_properties(object_properties);
                properties.extend(data_properties(keys));
                vec![Triple::new(
                    self.class_expression(class),
                    owl::HAS_KEY,
                    self.list(properties),
                )]
            }
            Axiom::Rule(rule) => {
                let node = self.node(swrl::IMP);
                let body = self.atoms(&rule.body);
                let head = self.atoms(&rule.head);
                self.add(node.clone(), swrl::BODY, body);
                self.add(node.clone(), swrl::HEAD, head);
                return Rendered::Node(node);
            }
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => {
                let subject = match subject {
                    AnnotationSubject::Iri(iri) => NamedOrBlankNode::from(iri.clone()),
                    AnnotationSubject::Anonymous(node) => node.clone().into(),
                };
                vec![Triple::new(
                    subject,
                    property.iri().clone(),
                    value.clone(),
                )]
            }
            Axiom::SubAnnotationPropertyOf {
                sub_property,
                super_property,
            } => vec![Triple::new(
                sub_property.iri().clone(),
                rdfs::SUB_PROPERTY_OF,
                super_property.iri().clone(),
            )],
            Axiom::AnnotationPropertyRange { property, range } => vec![Triple::new(
                property.iri().clone(),
                rdfs::RANGE,
                range.clone(),
            )],
            Axiom::AnnotationPropertyDomain { property, domain } => vec![Triple::new(
                property.iri().clone(),
                rdfs::DOMAIN,
                domain.clone(),
            )],
            Axiom::DatatypeDefinition { datatype, range } => vec![Triple::new(
                datatype.iri().clone(),
                owl::EQUIVALENT_CLASS,
                self.data_range(range),
            )],
        };
        Rendered::Triples(triples)
    }

    fn characteristic(
        &mut self,
        property: &ObjectPropertyExpression,
        class: NamedNodeRef<'_>,
    ) -> Vec<Triple> {
        vec![Triple::new(self.object_property(property), rdf::TYPE, class)]
    }

    fn members(
        &mut self,
        class: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
        members: Vec<NamedOrBlankNode>,
    ) -> Rendered {
        let node = self.node(class);
        let list = self.list(members);
        self.add(node.clone(), predicate, list);
        Rendered::Node(node)
    }

    fn negative_assertion(
        &mut self,
        subject: &Individual,
        property: NamedOrBlankNode,
    ) -> NamedOrBlankNode {
        let node = self.node(owl::NEGATIVE_PROPERTY_ASSERTION);
        self.add(node.clone(), owl::SOURCE_INDIVIDUAL, individual_node(subject));
        self.add(node.clone(), owl::ASSERTION_PROPERTY, property);
        node
    }

    /// An `rdf:first`/`rdf:rest` collection of the given elements.
    fn list(&mut self, elements: impl IntoIterator<Item = impl Into<Term>>) -> Term {
        let elements = elements.into_iter().map(Into::into).collect::<Vec<Term>>();
        let mut rest = Term::from(rdf::NIL.into_owned());
        for element in elements.into_iter().rev() {
            let cell = BlankNode::default();
            self.add(cell.clone(), rdf::FIRST, element);
            self.add(cell.clone(), rdf::REST, rest);
            rest = cell.into();
        }
        rest
    }

    fn object_property(&mut self, property: &ObjectPropertyExpression) -> NamedOrBlankNode {
        match property {
            ObjectPropertyExpression::ObjectProperty(p) => p.iri().clone().into(),
            ObjectPropertyExpression::InverseObjectProperty(p) => {
                let node = NamedOrBlankNode::from(BlankNode::default());
                self.add(node.clone(), owl::INVERSE_OF, p.iri().clone());
                node
            }
        }
    }

    fn object_properties(
        &mut self,
        properties: &[ObjectPropertyExpression],
    ) -> Vec<NamedOrBlankNode> {
        properties.iter().map(|p| self.object_property(p)).collect()
    }

    fn class_expressions(&mut self, classes: &[ClassExpression]) -> Vec<NamedOrBlankNode> {
        classes.iter().map(|c| self.class_expression(c)).collect()
    }

    fn class_expression(&mut self, class: &ClassExpression) -> NamedOrBlankNode {
        match class {
            ClassExpression::Class(class) => class.iri().clone().into(),
            ClassExpression::ObjectIntersectionOf(operands) => {
                let operands = self.class_expressions(operands);
                self.boolean(owl::CLASS, owl::INTERSECTION_OF, operands)
            }
            ClassExpression::ObjectUnionOf(operands) => {
                let operands = self.class_expressions(operands);
                self.boolean(owl::CLASS, owl::UNION_OF, operands)
            }
            ClassExpression::ObjectComplementOf(operand) => {
                let operand = self.class_expression(operand);
                let node = self.node(owl::CLASS);
                self.add(node.clone(), owl::COMPLEMENT_OF, operand);
                node
            }
            ClassExpression::ObjectOneOf(individuals) => {
                self.boolean(owl::CLASS, owl::ONE_OF, individual_nodes(individuals))
            }
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let property = self.object_property(property);
                let filler = self.class_expression(filler);
                self.restriction(property, &[(owl::SOME_VALUES_FROM, filler.into())])
            }
            ClassExpression::ObjectAllValuesFrom { property, filler } => {
                let property = self.object_property(property);
                let filler = self.class_expression(filler);
                self.restriction(property, &[(owl::ALL_VALUES_FROM, filler.into())])
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                let property = self.object_property(property);
                self.restriction(
                    property,
                    &[(owl::HAS_VALUE, individual_node(individual).into())],
                )
            }
            ClassExpression::ObjectHasSelf(property) => {
                let property = self.object_property(property);
                self.restriction(property, &[(owl::HAS_SELF, Literal::from(true).into())])
            }
            ClassExpression::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            } => {
                let property = self.object_property(property);
                let filler = filler.as_deref().map(|c| Term::from(self.class_expression(c)));
                self.cardinality(
                    property,
                    *cardinality,
                    filler.map(|f| (owl::ON_CLASS, f)),
                    [owl::MIN_CARDINALITY, owl::MIN_QUALIFIED_CARDINALITY],
                )
            }
            ClassExpression::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => {
                let property = self.object_property(property);
                let filler = filler.as_deref().map(|c| Term::from(self.class_expression(c)));
                self.cardinality(
                    property,
                    *cardinality,
                    filler.map(|f| (owl::ON_CLASS, f)),
                    [owl::MAX_CARDINALITY, owl::MAX_QUALIFIED_CARDINALITY],
                )
            }
            ClassExpression::ObjectExactCardinality {
                cardinality,
                property,
                filler,
            } => {
                let property = self.object_property(property);
                let filler = filler.as_deref().map(|c| Term::from(self.class_expression(c)));
                self.cardinality(
                    property,
                    *cardinality,
                    filler.map(|f| (owl::ON_CLASS, f)),
                    [owl::CARDINALITY, owl::QUALIFIED_CARDINALITY],
                )
            }
            ClassExpression::DataSomeValuesFrom { property, filler } => {
                let filler = self.data_range(filler);
                self.restriction(
                    property.iri().clone().into(),
                    &[(owl::SOME_VALUES_FROM, filler.into())],
                )
            }
            ClassExpression::DataAllValuesFrom { property, filler } => {
                let filler = self.data_range(filler);
                self.restriction(
                    property.iri().clone().into(),
                    &[(owl::ALL_VALUES_FROM, filler.into())],
                )
            }
            ClassExpression::DataHasValue { property, value } => self.restriction(
                property.iri().clone().into(),
                &[(owl::HAS_VALUE, value.clone().into())],
            ),
            ClassExpression::DataMinCardinality {
                cardinality,
                property,
                filler,
            } => {
                let filler = filler.as_ref().map(|d| Term::from(self.data_range(d)));
                self.cardinality(
                    property.iri().clone().into(),
                    *cardinality,
                    filler.map(|f| (owl::ON_DATA_RANGE, f)),
                    [owl::MIN_CARDINALITY, owl::MIN_QUALIFIED_CARDINALITY],
                )
            }
            ClassExpression::DataMaxCardinality {
                cardinality,
                property,
                filler,
            } => {
                let filler = filler.as_ref().map(|d| Term::from(self.data_range(d)));
                self.cardinality(
                    property.iri().clone().into(),
                    *cardinality,
                    filler.map(|f| (owl::ON_DATA_RANGE, f)),
                    [owl::MAX_CARDINALITY, owl::MAX_QUALIFIED_CARDINALITY],
                )
            }
            ClassExpression::DataExactCardinality {
                cardinality,
                property,
                filler,
            } => {
                let filler = filler.as_ref().map(|d| Term::from(self.data_range(d)));
                self.cardinality(
                    property.iri().clone().into(),
                    *cardinality,
                    filler.map(|f| (owl::ON_DATA_RANGE, f)),
                    [owl::CARDINALITY, owl::QUALIFIED_CARDINALITY],
                )
            }
        }
    }

    fn boolean(
        &mut self,
        class: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
        operands: Vec<NamedOrBlankNode>,
    ) -> NamedOrBlankNode {
        let list = self.list(operands);
        let node = self.node(class);
        self.add(node.clone(), predicate, list);
        node
    }

    fn restriction(
        &mut self,
        property: NamedOrBlankNode,
        values: &[(NamedNodeRef<'_>, Term)],
    ) -> NamedOrBlankNode {
        let node = self.node(owl::RESTRICTION);
        self.add(node.clone(), owl::ON_PROPERTY, property);
        for (predicate, value) in values {
            self.add(node.clone(), *predicate, value.clone());
        }
        node
    }

    /// `[unqualified, qualified]` are the cardinality predicates, the latter used with a filler.
    fn cardinality(
        &mut self,
        property: NamedOrBlankNode,
        cardinality: u32,
        filler: Option<(NamedNodeRef<'_>, Term)>,
        [unqualified, qualified]: [NamedNodeRef<'_>; 2],
    ) -> NamedOrBlankNode {
        let cardinality =
            Literal::new_typed_literal(cardinality.to_string(), xsd::NON_NEGATIVE_INTEGER);
        match filler {
            Some((on, filler)) => self.restriction(
                property,
                &[(qualified, cardinality.into()), (on, filler)],
            ),
            None => self.restriction(property, &[(unqualified, cardinality.into())]),
        }
    }

    fn data_range(&mut self, range: &DataRange) -> NamedOrBlankNode {
        match range {
            DataRange::Datatype(datatype) => datatype.iri().clone().into(),
            DataRange::DataIntersectionOf(operands) => {
                let operands = self.data_ranges(operands);
                self.boolean(rdfs::DATATYPE, owl::INTERSECTION_OF, operands)
            }
            DataRange::DataUnionOf(operands) => {
                let operands = self.data_ranges(operands);
                self.boolean(rdfs::DATATYPE, owl::UNION_OF, operands)
            }
            DataRange::DataComplementOf(operand) => {
                let operand = self.data_range(operand);
                let node = self.node(rdfs::DATATYPE);
                self.add(node.clone(), owl::DATATYPE_COMPLEMENT_OF, operand);
                node
            }
            DataRange::DataOneOf(literals) => {
                let list = self.list(literals.iter().cloned());
                let node = self.node(rdfs::DATATYPE);
                self.add(node.clone(), owl::ONE_OF, list);
                node
            }
            DataRange::DatatypeRestriction {
                datatype,
                restrictions,
            } => {
                let facets = restrictions
                    .iter()
                    .map(|restriction| {
                        let facet = BlankNode::default();
                        self.add(
                            facet.clone(),
                            restriction.facet.clone(),
                            restriction.value.clone(),
                        );
                        facet
                    })
                    .collect::<Vec<_>>();
                let list = self.list(facets);
                let node = self.node(rdfs::DATATYPE);
                self.add(node.clone(), owl::ON_DATATYPE, datatype.iri().clone());
                self.add(node.clone(), owl::WITH_RESTRICTIONS, list);
                node
            }
        }
    }

    fn data_ranges(&mut self, ranges: &[DataRange]) -> Vec<NamedOrBlankNode> {
        ranges.iter().map(|r| self.data_range(r)).collect()
    }

    fn atoms(&mut self, atoms: &[Atom]) -> Term {
        let atoms = atoms.iter().map(|a| self.atom(a)).collect::<Vec<_>>();
        self.list(atoms)
    }

    fn atom(&mut self, atom: &Atom) -> NamedOrBlankNode {
        match atom {
            Atom::Class { class, argument } => {
                let class = self.class_expression(class);
                let argument = self.i_argument(argument);
                let node = self.node(swrl::CLASS_ATOM);
                self.add(node.clone(), swrl::CLASS_PREDICATE, class);
                self.add(node.clone(), swrl::ARGUMENT_1, argument);
                node
            }
            Atom::DataRange { range, argument } => {
                let range = self.data_range(range);
                let argument = self.d_argument(argument);
                let node = self.node(swrl::DATA_RANGE_ATOM);
                self.add(node.clone(), swrl::DATA_RANGE, range);
                self.add(node.clone(), swrl::ARGUMENT_1, argument);
                node
            }
            Atom::ObjectProperty {
                property,
                subject,
                object,
            } => {
                let property = self.object_property(property);
                let (subject, object) = (self.i_argument(subject), self.i_argument(object));
                self.binary_atom(swrl::INDIVIDUAL_PROPERTY_ATOM, Some(property), subject, object)
            }
            Atom::DataProperty {
                property,
                subject,
                object,
            } => {
                let (subject, object) = (self.i_argument(subject), self.d_argument(object));
                self.binary_atom(
                    swrl::DATAVALUED_PROPERTY_ATOM,
                    Some(property.iri().clone().into()),
                    subject,
                    object,
                )
            }
            Atom::SameIndividual(first, second) => {
                let (first, second) = (self.i_argument(first), self.i_argument(second));
                self.binary_atom(swrl::SAME_INDIVIDUAL_ATOM, None, first, second)
            }
            Atom::DifferentIndividuals(first, second) => {
                let (first, second) = (self.i_argument(first), self.i_argument(second));
                self.binary_atom(swrl::DIFFERENT_INDIVIDUALS_ATOM, None, first, second)
            }
            Atom::BuiltIn {
                predicate,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|a| self.d_argument(a))
                    .collect::<Vec<_>>();
                let list = self.list(arguments);
                let node = self.node(swrl::BUILTIN_ATOM);
                self.add(node.clone(), swrl::BUILTIN, predicate.clone());
                self.add(node.clone(), swrl::ARGUMENTS, list);
                node
            }
        }
    }

    fn binary_atom(
        &mut self,
        class: NamedNodeRef<'_>,
        property: Option<NamedOrBlankNode>,
        first: Term,
        second: Term,
    ) -> NamedOrBlankNode {
        let node = self.node(class);
        if let Some(property) = property {
            self.add(node.clone(), swrl::PROPERTY_PREDICATE, property);
        }
        self.add(node.clone(), swrl::ARGUMENT_1, first);
        self.add(node.clone(), swrl::ARGUMENT_2, second);
        node
    }

    fn variable(&mut self, variable: &NamedNode) -> Term {
        self.add(variable.clone(), rdf::TYPE, swrl::VARIABLE);
        variable.clone().into()
    }

    fn i_argument(&mut self, argument: &IArgument) -> Term {
        match argument {
            IArgument::Variable(v) => self.variable(&v.0),
            IArgument::Individual(i) => individual_node(i).into(),
        }
    }

    fn d_argument(&mut self, argument: &DArgument) -> Term {
        match argument {
            DArgument::Variable(v) => self.variable(&v.0),
            DArgument::Literal(l) => l.clone().into(),
        }
    }
}

fn declaration_type(entity: &Entity) -> NamedNodeRef<'static> {
    match entity {
        Entity::Class(_) => owl::CLASS,
        Entity::ObjectProperty(_) => owl::OBJECT_PROPERTY,
        Entity::DataProperty(_) => owl::DATATYPE_PROPERTY,
        Entity::AnnotationProperty(_) => owl::ANNOTATION_PROPERTY,
        Entity::Datatype(_) => rdfs::DATATYPE,
        Entity::NamedIndividual(_) => owl::NAMED_INDIVIDUAL,
    }
}

fn individual_node(individual: &Individual) -> NamedOrBlankNode {
    match individual {
        Individual::Named(i) => i.iri().clone().into(),
        Individual::Anonymous(node) => node.clone().into(),
    }
}

fn individual_nodes(individuals: &[Individual]) -> Vec<NamedOrBlankNode> {
    individuals.iter().map(individual_node).collect()
}

fn data_properties(properties: &[DataProperty]) -> Vec<NamedOrBlankNode> {
    properties.iter().map(|p| p.iri().clone().into()).collect()
}

/// One triple for each consecutive pair of operands.
fn pairwise(operands: &[NamedOrBlankNode], predicate: NamedNodeRef<'_>) -> Vec<Triple> {
    operands
        .windows(2)
        .map(|pair| Triple::new(pair[0].clone(), predicate, pair[1].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ObjectProperty, OwlClass};
    use oxrdf::TripleRef;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn class(name: &str) -> ClassExpression {
        ClassExpression::class(iri(name))
    }

    fn objects<'a>(graph: &'a Graph, predicate: NamedNodeRef<'a>) -> Vec<Term> {
        graph
            .triples_for_predicate(predicate)
            .map(|t| t.object.into_owned())
            .collect()
    }

    #[test]
    fn test_header_and_declaration() {
        let mut ontology = Ontology::new(
            crate::OntologyId::named(iri("o")).with_version(iri("o/1.0")),
        );
        ontology.add_import(iri("other"));
        ontology.add_axiom(Axiom::Declaration(Entity::Class(OwlClass::new(iri("A")))));
        let graph = OntologySerializer::new().serialize(&ontology);
        assert!(graph.contains(TripleRef::new(&iri("o"), rdf::TYPE, owl::ONTOLOGY)));
        assert!(graph.contains(TripleRef::new(&iri("o"), owl::VERSION_IRI, &iri("o/1.0"))));
        assert!(graph.contains(TripleRef::new(&iri("o"), owl::IMPORTS, &iri("other"))));
        assert!(graph.contains(TripleRef::new(&iri("A"), rdf::TYPE, owl::CLASS)));
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_restriction_and_list() {
        let mut ontology = Ontology::default();
        ontology.add_axiom(Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::ObjectSomeValuesFrom {
                property: ObjectProperty::new(iri("p")).into(),
                filler: Box::new(ClassExpression::ObjectUnionOf(vec![class("B"), class("C")])),
            },
        });
        let graph = OntologySerializer::new().serialize(&ontology);
        assert_eq!(objects(&graph, owl::ON_PROPERTY), [Term::from(iri("p"))]);
        assert_eq!(objects(&graph, rdf::FIRST).len(), 2);
        assert_eq!(
            objects(&graph, rdf::REST)
                .iter()
                .filter(|t| **t == Term::from(rdf::NIL.into_owned()))
                .count(),
            1
        );
    }

    #[test]
    fn test_annotated_axiom_is_reified() {
        let mut ontology = Ontology::default();
        ontology.add_axiom(
            Axiom::SubClassOf {
                sub_class: class("A"),
                super_class: class("B"),
            }
            .annotated(vec![Annotation::new(
                iri("note"),
                Literal::new_simple_literal("told"),
            )]),
        );
        let graph = OntologySerializer::new().serialize(&ontology);
        assert!(graph.contains(TripleRef::new(&iri("A"), rdfs::SUB_CLASS_OF, &iri("B"))));
        assert_eq!(objects(&graph, owl::ANNOTATED_SOURCE), [Term::from(iri("A"))]);
        assert_eq!(objects(&graph, owl::ANNOTATED_TARGET), [Term::from(iri("B"))]);
        assert_eq!(
            objects(&graph, iri("note").as_ref()),
            [Term::from(Literal::new_simple_literal("told"))]
        );
    }

    #[test]
    fn test_large_disjointness_uses_a_node() {
        let mut ontology = Ontology::default();
        ontology.add_axiom(Axiom::DisjointClasses(vec![
            class("A"),
            class("B"),
            class("C"),
        ]));
        let graph = OntologySerializer::new().serialize(&ontology);
        assert!(objects(&graph, owl::DISJOINT_WITH).is_empty());
        assert_eq!(objects(&graph, owl::MEMBERS).len(), 1);
        assert_eq!(objects(&graph, rdf::FIRST).len(), 3);
    }

    #[test]
    fn test_write_turtle() -> io::Result<()> {
        let mut ontology = Ontology::new(crate::OntologyId::named(iri("o")));
        ontology.add_axiom(Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: class("B"),
        });
        let turtle = OntologySerializer::new().write(&ontology, RdfFormat::Turtle, Vec::new())?;
        let turtle = String::from_utf8_lossy(&turtle);
        assert!(turtle.contains("@prefix owl:"), "{turtle}");
        assert!(turtle.contains("owl:Ontology"), "{turtle}");
        Ok(())
    }
}
