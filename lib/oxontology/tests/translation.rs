//! Translation of Turtle documents into axioms.

use oxontology::{
    AnnotatedAxiom, Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue, Atom,
    Axiom, AxiomKind, ClassExpression, DataProperty, IArgument, Individual, ObjectProperty,
    ObjectPropertyExpression, OntologyParseError, OwlClass, ParsedOntology, ParserConfig,
    RdfOntologyParser, Rule, TranslationErrorKind, Variable,
};
use oxrdf::vocab::{rdfs, xsd};
use oxrdf::{Literal, NamedNode};
use oxrdfio::RdfFormat;
use std::error::Error;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

const PREFIXES: &str = "
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix swrl: <http://www.w3.org/2003/11/swrl#> .
@prefix ex: <http://example.com/> .
";

fn iri(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn class(name: &str) -> ClassExpression {
    ClassExpression::class(iri(name))
}

fn property(name: &str) -> ObjectPropertyExpression {
    ObjectProperty::new(iri(name)).into()
}

/// Routes parser logs to the test output, filtered by `RUST_LOG`.
fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

fn individual(name: &str) -> Individual {
    iri(name).into()
}

fn error_kinds(parsed: &ParsedOntology) -> Vec<TranslationErrorKind> {
    parsed.errors.iter().map(|e| e.kind()).collect()
}

fn parse_with(config: ParserConfig, body: &str) -> Result<ParsedOntology, OntologyParseError> {
    init_logging();
    RdfOntologyParser::with_config(config)
        .parse_slice(RdfFormat::Turtle, format!("{PREFIXES}{body}").as_bytes())
}

fn parse(body: &str) -> Result<ParsedOntology, OntologyParseError> {
    parse_with(ParserConfig::new(), body)
}

fn logical_axioms(parsed: &ParsedOntology) -> Vec<&Axiom> {
    parsed
        .ontology
        .logical_axioms()
        .map(AnnotatedAxiom::axiom)
        .collect()
}

#[test]
fn test_existential_restriction() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:p a owl:ObjectProperty .
        ex:C a owl:Class .
        _:r a owl:Restriction ; owl:onProperty ex:p ; owl:someValuesFrom ex:C .
        ex:A rdfs:subClassOf _:r .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::some_values_from(property("p"), class("C")),
        }]
    );
    assert_eq!(parsed.ontology.axioms_of_kind(AxiomKind::Declaration).count(), 2);
    Ok(())
}

#[test]
fn test_cardinality_validation() -> Result<(), Box<dyn Error>> {
    let restriction = |value: &str| {
        format!(
            "ex:p a owl:ObjectProperty .
            ex:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:p ; owl:minCardinality {value} ] ."
        )
    };

    let parsed = parse(&restriction("\"-1\"^^xsd:nonNegativeInteger"))?;
    assert!(logical_axioms(&parsed).is_empty());
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::NumericFormat)
    );

    let parsed = parse(&restriction("\"3\"^^xsd:nonNegativeInteger"))?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::ObjectMinCardinality {
                cardinality: 3,
                property: property("p"),
                filler: None,
            },
        }]
    );

    let parsed = parse(&restriction("\"4294967296\"^^xsd:nonNegativeInteger"))?;
    assert!(logical_axioms(&parsed).is_empty());
    assert!(matches!(
        parsed.errors.as_slice(),
        [e] if e.kind() == TranslationErrorKind::NumericFormat && e.message().contains("larger than")
    ));

    let error = parse_with(
        ParserConfig::new().strict(),
        &restriction("\"-1\"^^xsd:nonNegativeInteger"),
    )
    .err()
    .and_then(|e| e.translation_error().map(|e| e.kind()));
    assert_eq!(error, Some(TranslationErrorKind::NumericFormat));
    Ok(())
}

#[test]
fn test_forward_references_resolve_over_passes() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        _:r a owl:Restriction .
        _:r owl:onProperty ex:p .
        _:r owl:someValuesFrom ex:X .
        ex:A rdfs:subClassOf _:r .
        ex:p rdfs:subPropertyOf ex:q .
        ex:q rdfs:subPropertyOf ex:r .
        ex:r a owl:ObjectProperty .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(parsed.passes, 3);
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(Axiom::SubClassOf {
        sub_class: class("A"),
        super_class: ClassExpression::some_values_from(property("p"), class("X")),
    })));
    assert_eq!(
        parsed
            .ontology
            .axioms_of_kind(AxiomKind::SubObjectPropertyOf)
            .count(),
        2
    );
    Ok(())
}

#[test]
fn test_undeclared_property_defaults_to_object() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "ex:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:p ; owl:allValuesFrom ex:X ] .",
    )?;
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::UnresolvedForwardReference)
    );
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::all_values_from(property("p"), class("X")),
        }]
    );
    Ok(())
}

#[test]
fn test_property_chain_keeps_list_order() -> Result<(), Box<dyn Error>> {
    for length in [1, 2, 5] {
        let names = (0..length).map(|i| format!("p{i}")).collect::<Vec<_>>();
        let list = names
            .iter()
            .map(|name| format!("ex:{name}"))
            .collect::<Vec<_>>()
            .join(" ");
        let parsed = parse(&format!(
            "ex:top a owl:ObjectProperty .
            ex:top owl:propertyChainAxiom ( {list} ) ."
        ))?;
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(
            logical_axioms(&parsed),
            [&Axiom::SubPropertyChainOf {
                super_property: property("top"),
                chain: names.iter().map(|name| property(name)).collect(),
            }]
        );
    }
    Ok(())
}

#[test]
fn test_empty_operand_list() -> Result<(), Box<dyn Error>> {
    let parsed = parse("ex:A owl:intersectionOf () .")?;
    assert_eq!(logical_axioms(&parsed).len(), 1);
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(
        Axiom::EquivalentClasses(vec![
            class("A"),
            ClassExpression::ObjectIntersectionOf(Vec::new()),
        ])
    )));
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::InvalidValue)
    );
    Ok(())
}

#[test]
fn test_cyclic_list_is_malformed() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:A owl:unionOf _:l1 .
        _:l1 rdf:first ex:B ; rdf:rest _:l2 .
        _:l2 rdf:first ex:C ; rdf:rest _:l1 .",
    )?;
    assert!(logical_axioms(&parsed).is_empty());
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::MalformedList)
    );
    Ok(())
}

#[test]
fn test_list_length_limit() -> Result<(), Box<dyn Error>> {
    let parsed = parse_with(
        ParserConfig::new().with_max_list_length(2),
        "ex:A owl:unionOf ( ex:B ex:C ex:D ) .",
    )?;
    assert!(logical_axioms(&parsed).is_empty());
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::MalformedList)
    );
    Ok(())
}

#[test]
fn test_extra_triple_is_lax_only() -> Result<(), Box<dyn Error>> {
    let document = "
        ex:p a owl:ObjectProperty .
        ex:A rdfs:subClassOf [
            a owl:Restriction ;
            owl:onProperty ex:p ;
            owl:someValuesFrom ex:C ;
            ex:note \"stray\"
        ] .";

    let parsed = parse(document)?;
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::some_values_from(property("p"), class("C")),
        }]
    );
    let warning = parsed
        .errors
        .iter()
        .find(|e| e.kind() == TranslationErrorKind::StructuralAmbiguity);
    assert!(warning.is_some_and(|w| w.matchers() == ["ObjectSomeValuesFrom"]));

    let Err(error) = parse_with(ParserConfig::new().strict(), document) else {
        panic!("strict mode accepted a non-conformant restriction");
    };
    assert_eq!(
        error.translation_error().map(|e| e.kind()),
        Some(TranslationErrorKind::StructuralAmbiguity)
    );
    Ok(())
}

#[test]
fn test_lax_tie_break_follows_class_expression_order() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:p a owl:ObjectProperty .
        ex:A rdfs:subClassOf [
            a owl:Restriction ;
            owl:onProperty ex:p ;
            owl:allValuesFrom ex:C ;
            owl:someValuesFrom ex:D
        ] .",
    )?;
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::some_values_from(property("p"), class("D")),
        }]
    );
    let warning = parsed
        .errors
        .iter()
        .find(|e| e.kind() == TranslationErrorKind::StructuralAmbiguity);
    assert!(warning.is_some_and(
        |w| w.matchers() == ["ObjectSomeValuesFrom", "ObjectAllValuesFrom"]
    ));
    Ok(())
}

#[test]
fn test_reified_axiom_annotation() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:A rdfs:subClassOf ex:B .
        _:x a owl:Axiom ;
            owl:annotatedSource ex:A ;
            owl:annotatedProperty rdfs:subClassOf ;
            owl:annotatedTarget ex:B ;
            rdfs:comment \"note\" .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let axioms = parsed.ontology.logical_axioms().collect::<Vec<_>>();
    assert_eq!(
        axioms,
        [&AnnotatedAxiom::new(
            Axiom::SubClassOf {
                sub_class: class("A"),
                super_class: class("B"),
            },
            vec![Annotation::new(rdfs::COMMENT, Literal::new_simple_literal("note"))],
        )]
    );
    Ok(())
}

#[test]
fn test_ontology_header() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:o a owl:Ontology ;
            owl:versionIRI ex:o1 ;
            owl:imports ex:base ;
            rdfs:label \"Zoo\" .
        ex:Dog a owl:Class ; rdfs:label \"Dog\"@en .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let ontology = &parsed.ontology;
    assert_eq!(ontology.id().ontology_iri(), Some(&iri("o")));
    assert_eq!(ontology.id().version_iri(), Some(&iri("o1")));
    assert_eq!(ontology.imports(), [iri("base")]);
    assert_eq!(ontology.annotations().len(), 1);
    assert_eq!(ontology.annotation_assertions(&iri("Dog")).count(), 1);
    assert!(
        ontology
            .declarations(&iri("Dog"))
            .any(|a| matches!(a.axiom(), Axiom::Declaration(e) if e.iri() == &iri("Dog")))
    );
    Ok(())
}

#[test]
fn test_unparsed_triple_is_reported() -> Result<(), Box<dyn Error>> {
    let parsed = parse("ex:A rdfs:subClassOf ex:B . _:b owl:onProperty ex:p .")?;
    assert_eq!(logical_axioms(&parsed).len(), 1);
    assert!(
        parsed
            .errors
            .iter()
            .any(|e| e.kind() == TranslationErrorKind::UnparsedTriple)
    );
    Ok(())
}

#[test]
fn test_cancellation() {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    let config = ParserConfig::new().with_cancellation(Arc::new(AtomicBool::new(true)));
    assert!(matches!(
        parse_with(config, "ex:A rdfs:subClassOf ex:B ."),
        Err(OntologyParseError::Cancelled { passes: 0 })
    ));
}

#[test]
fn test_entity_kinds_are_learned() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:age a owl:DatatypeProperty .
        ex:Adult owl:equivalentClass [
            a owl:Restriction ;
            owl:onProperty ex:age ;
            owl:someValuesFrom [
                a rdfs:Datatype ;
                owl:onDatatype xsd:integer ;
                owl:withRestrictions ( [ xsd:minInclusive 18 ] )
            ]
        ] .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let classes = parsed.ontology.classes_in_signature().collect::<Vec<_>>();
    assert_eq!(classes, [OwlClass::new(iri("Adult"))]);
    assert!(matches!(
        logical_axioms(&parsed).as_slice(),
        [Axiom::EquivalentClasses(operands)]
            if operands.iter().any(|o| matches!(o, ClassExpression::DataSomeValuesFrom { .. }))
    ));
    Ok(())
}

#[test]
fn test_failed_translation_forgets_learned_kinds() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:C a owl:Class .
        ex:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:p ; owl:onDataRange xsd:integer ] .
        ex:B rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:p ; owl:someValuesFrom ex:C ] .",
    )?;
    assert_eq!(
        error_kinds(&parsed),
        [TranslationErrorKind::MissingRequiredTriple]
    );
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("B"),
            super_class: ClassExpression::some_values_from(property("p"), class("C")),
        }]
    );
    assert_eq!(parsed.ontology.datatypes_in_signature().count(), 0);
    assert_eq!(parsed.ontology.data_properties_in_signature().count(), 0);
    Ok(())
}

#[test]
fn test_all_disjoint_classes() -> Result<(), Box<dyn Error>> {
    let parsed = parse("[] a owl:AllDisjointClasses ; owl:members ( ex:A ex:B ex:C ) .")?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::DisjointClasses(vec![class("A"), class("B"), class("C")])]
    );
    Ok(())
}

#[test]
fn test_all_disjoint_properties_take_the_declared_kind() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:height a owl:DatatypeProperty .
        [] a owl:AllDisjointProperties ; owl:members ( ex:height ex:weight ) .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::DisjointDataProperties(vec![
            DataProperty::new(iri("height")),
            DataProperty::new(iri("weight")),
        ])]
    );
    Ok(())
}

#[test]
fn test_all_different_with_distinct_members() -> Result<(), Box<dyn Error>> {
    let parsed = parse("[] a owl:AllDifferent ; owl:distinctMembers ( ex:a ex:b ) .")?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::DifferentIndividuals(vec![individual("a"), individual("b")])]
    );
    Ok(())
}

#[test]
fn test_negative_property_assertions() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:knows a owl:ObjectProperty .
        ex:age a owl:DatatypeProperty .
        [] a owl:NegativePropertyAssertion ;
            owl:sourceIndividual ex:a ;
            owl:assertionProperty ex:knows ;
            owl:targetIndividual ex:b .
        [] a owl:NegativePropertyAssertion ;
            owl:sourceIndividual ex:a ;
            owl:assertionProperty ex:age ;
            owl:targetValue 42 .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(logical_axioms(&parsed).len(), 2);
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(
        Axiom::NegativeObjectPropertyAssertion {
            property: property("knows"),
            subject: individual("a"),
            object: individual("b"),
        }
    )));
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(
        Axiom::NegativeDataPropertyAssertion {
            property: DataProperty::new(iri("age")),
            subject: individual("a"),
            value: Literal::new_typed_literal("42", xsd::INTEGER),
        }
    )));
    Ok(())
}

#[test]
fn test_swrl_rule() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:owns a owl:ObjectProperty .
        ex:x a swrl:Variable .
        ex:y a swrl:Variable .
        [] a swrl:Imp ;
            swrl:body (
                [ a swrl:ClassAtom ; swrl:classPredicate ex:Person ; swrl:argument1 ex:x ]
                [ a swrl:IndividualPropertyAtom ; swrl:propertyPredicate ex:owns ; swrl:argument1 ex:x ; swrl:argument2 ex:y ]
            ) ;
            swrl:head ( [ a swrl:ClassAtom ; swrl:classPredicate ex:Owner ; swrl:argument1 ex:x ] ) .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    let x = || IArgument::Variable(Variable(iri("x")));
    let rule = Axiom::Rule(Rule {
        body: vec![
            Atom::Class {
                class: class("Person"),
                argument: x(),
            },
            Atom::ObjectProperty {
                property: property("owns"),
                subject: x(),
                object: IArgument::Variable(Variable(iri("y"))),
            },
        ],
        head: vec![Atom::Class {
            class: class("Owner"),
            argument: x(),
        }],
    });
    assert_eq!(logical_axioms(&parsed).len(), 1);
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(rule)));
    Ok(())
}

#[test]
fn test_has_key_splits_property_kinds() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:ssn a owl:DatatypeProperty .
        ex:bornIn a owl:ObjectProperty .
        ex:Person owl:hasKey ( ex:ssn ex:bornIn ) .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::HasKey {
            class: class("Person"),
            object_properties: vec![property("bornIn")],
            data_properties: vec![DataProperty::new(iri("ssn"))],
        }]
    );
    Ok(())
}

#[test]
fn test_disjoint_union() -> Result<(), Box<dyn Error>> {
    let parsed = parse("ex:Pet owl:disjointUnionOf ( ex:Dog ex:Cat ) .")?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(logical_axioms(&parsed).len(), 1);
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(Axiom::DisjointUnion {
        class: OwlClass::new(iri("Pet")),
        disjoint_classes: vec![class("Dog"), class("Cat")],
    })));
    Ok(())
}

#[test]
fn test_annotations_on_n_ary_node() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "[] a owl:AllDisjointClasses ; owl:members ( ex:A ex:B ) ; rdfs:comment \"exclusive\" .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        parsed.ontology.logical_axioms().collect::<Vec<_>>(),
        [&AnnotatedAxiom::new(
            Axiom::DisjointClasses(vec![class("A"), class("B")]),
            vec![Annotation::new(rdfs::COMMENT, Literal::new_simple_literal("exclusive"))],
        )]
    );
    Ok(())
}

#[test]
fn test_nested_annotations() -> Result<(), Box<dyn Error>> {
    let parsed = parse(
        "
        ex:A rdfs:subClassOf ex:B .
        _:x a owl:Axiom ;
            owl:annotatedSource ex:A ;
            owl:annotatedProperty rdfs:subClassOf ;
            owl:annotatedTarget ex:B ;
            rdfs:comment \"why\" .
        [] a owl:Annotation ;
            owl:annotatedSource _:x ;
            owl:annotatedProperty rdfs:comment ;
            owl:annotatedTarget \"why\" ;
            rdfs:label \"source\" .",
    )?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(
        parsed.ontology.logical_axioms().collect::<Vec<_>>(),
        [&AnnotatedAxiom::new(
            Axiom::SubClassOf {
                sub_class: class("A"),
                super_class: class("B"),
            },
            vec![
                Annotation::new(rdfs::COMMENT, Literal::new_simple_literal("why"))
                    .with_annotations(vec![Annotation::new(
                        rdfs::LABEL,
                        Literal::new_simple_literal("source"),
                    )]),
            ],
        )]
    );
    Ok(())
}

#[test]
fn test_multiple_values() -> Result<(), Box<dyn Error>> {
    let restriction = "
        ex:p a owl:ObjectProperty .
        ex:q a owl:ObjectProperty .
        ex:A rdfs:subClassOf [
            a owl:Restriction ;
            owl:onProperty ex:p , ex:q ;
            owl:someValuesFrom ex:C
        ] .";
    let parsed = parse(restriction)?;
    assert_eq!(
        error_kinds(&parsed),
        [
            TranslationErrorKind::StructuralAmbiguity,
            TranslationErrorKind::MultipleValues
        ]
    );
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::SubClassOf {
            sub_class: class("A"),
            super_class: ClassExpression::some_values_from(property("p"), class("C")),
        }]
    );
    let Err(error) = parse_with(ParserConfig::new().strict(), restriction) else {
        panic!("strict mode accepted a restriction on two properties");
    };
    assert_eq!(
        error.translation_error().map(|e| e.kind()),
        Some(TranslationErrorKind::StructuralAmbiguity)
    );

    let header = "ex:o a owl:Ontology ; owl:versionIRI ex:v1 , ex:v2 .";
    let parsed = parse(header)?;
    assert_eq!(error_kinds(&parsed), [TranslationErrorKind::MultipleValues]);
    assert_eq!(parsed.ontology.id().version_iri(), Some(&iri("v1")));
    let Err(error) = parse_with(ParserConfig::new().strict(), header) else {
        panic!("strict mode accepted two version IRIs");
    };
    assert_eq!(
        error.translation_error().map(|e| e.kind()),
        Some(TranslationErrorKind::MultipleValues)
    );
    Ok(())
}

#[test]
fn test_dangling_triples() -> Result<(), Box<dyn Error>> {
    let document = "ex:a ex:rel ex:b .";

    let parsed = parse(document)?;
    assert_eq!(
        error_kinds(&parsed),
        [TranslationErrorKind::UnresolvedForwardReference]
    );
    assert_eq!(
        logical_axioms(&parsed),
        [&Axiom::ObjectPropertyAssertion {
            property: property("rel"),
            subject: individual("a"),
            object: individual("b"),
        }]
    );

    let parsed = parse_with(ParserConfig::new().treat_dangling_triples_as_axiom(), document)?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert!(logical_axioms(&parsed).is_empty());
    assert!(parsed.ontology.contains_axiom(&AnnotatedAxiom::from(
        Axiom::AnnotationAssertion {
            property: AnnotationProperty::new(iri("rel")),
            subject: AnnotationSubject::Iri(iri("a")),
            value: AnnotationValue::Iri(iri("b")),
        }
    )));
    Ok(())
}

#[test]
fn test_stack_traces() -> Result<(), Box<dyn Error>> {
    let document = "
        ex:p a owl:ObjectProperty .
        ex:A rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:p ] .";

    let parsed = parse(document)?;
    assert_eq!(
        error_kinds(&parsed),
        [TranslationErrorKind::MissingRequiredTriple]
    );
    assert!(
        parsed
            .errors
            .iter()
            .all(|e| !e.to_string().contains("attempted:"))
    );

    let parsed = parse_with(ParserConfig::new().with_stack_traces(), document)?;
    assert_eq!(
        error_kinds(&parsed),
        [TranslationErrorKind::MissingRequiredTriple]
    );
    let report = parsed.errors.iter().map(ToString::to_string).collect::<String>();
    assert!(report.contains("attempted: ObjectIntersectionOf"), "{report}");
    assert!(report.contains("triple: "), "{report}");
    Ok(())
}
