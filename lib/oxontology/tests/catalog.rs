//! Imports resolution between loaded ontologies, and reasoning over the imports closure.

use oxontology::{
    ImportsClosure, ImportsError, Individual, MissingImportHandling, Ontology, OntologyCatalog,
    OwlClass, ParserConfig, RdfOntologyParser, Reasoner, StructuralReasoner,
};
use oxrdf::NamedNode;
use oxrdfio::RdfFormat;
use std::error::Error;
use std::sync::Arc;

const PREFIXES: &str = "
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.com/> .
";

const BASE: &str = "
ex:base a owl:Ontology ; owl:versionIRI ex:base-1 .
ex:Animal a owl:Class .
ex:Mammal a owl:Class ; rdfs:subClassOf ex:Animal .
ex:Plant a owl:Class ; owl:disjointWith ex:Animal .
";

const ZOO: &str = "
ex:zoo a owl:Ontology ; owl:imports ex:base-1 .
ex:Dog a owl:Class ; rdfs:subClassOf ex:Mammal .
ex:Hound a owl:Class ; rdfs:subClassOf ex:Dog .
ex:rex a owl:NamedIndividual , ex:Hound .
";

fn iri(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn class(name: &str) -> OwlClass {
    OwlClass::new(iri(name))
}

fn load(document: &str, body: &str) -> Result<Ontology, Box<dyn Error>> {
    let parsed = RdfOntologyParser::new()
        .with_document_iri(iri(document))
        .parse_slice(RdfFormat::Turtle, format!("{PREFIXES}{body}").as_bytes())?;
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    Ok(parsed.ontology)
}

fn catalog() -> Result<(OntologyCatalog, Arc<Ontology>), Box<dyn Error>> {
    let mut catalog = OntologyCatalog::new();
    catalog.insert(load("base.ttl", BASE)?);
    let zoo = catalog.insert(load("zoo.ttl", ZOO)?);
    Ok((catalog, zoo))
}

#[test]
fn test_imports_resolved_through_version_iri() -> Result<(), Box<dyn Error>> {
    let (catalog, zoo) = catalog()?;
    assert_eq!(zoo.imports(), [iri("base-1")]);
    let closure = catalog.imports_closure(&zoo)?;
    assert_eq!(closure.len(), 2);
    assert_eq!(closure[1].id().ontology_iri(), Some(&iri("base")));
    assert!(
        catalog
            .get(&iri("base.ttl"))
            .is_some_and(|o| Arc::ptr_eq(o, &closure[1]))
    );
    Ok(())
}

#[test]
fn test_missing_import_follows_configuration() -> Result<(), Box<dyn Error>> {
    let zoo = load("zoo.ttl", ZOO)?;

    let mut lenient = OntologyCatalog::new();
    let root = lenient.insert(zoo.clone());
    assert_eq!(lenient.imports_closure(&root)?.len(), 1);

    let config = ParserConfig::new().with_missing_import_handling(MissingImportHandling::Fail);
    let mut failing = OntologyCatalog::with_config(&config);
    let root = failing.insert(zoo);
    assert_eq!(
        failing.imports_closure(&root).map(|closure| closure.len()),
        Err(ImportsError::MissingImport {
            iri: iri("base-1")
        })
    );
    Ok(())
}

#[test]
fn test_reasoning_over_imports_closure() -> Result<(), Box<dyn Error>> {
    let (catalog, zoo) = catalog()?;
    let alone = StructuralReasoner::new(zoo.as_ref());
    assert_eq!(alone.super_classes(&class("Hound"), false), [class("Dog"), class("Mammal")]);

    let mut reasoner = StructuralReasoner::new(ImportsClosure::new(&catalog, &zoo)?);
    reasoner.precompute();
    assert!(reasoner.is_consistent());
    assert_eq!(
        reasoner.super_classes(&class("Hound"), false),
        [class("Animal"), class("Dog"), class("Mammal")]
    );
    assert_eq!(reasoner.super_classes(&class("Hound"), true), [class("Dog")]);
    assert_eq!(
        reasoner.sub_classes(&class("Animal"), false),
        [class("Dog"), class("Hound"), class("Mammal")]
    );
    assert_eq!(
        reasoner.instances(&class("Animal"), false),
        [Individual::from(iri("rex"))]
    );
    assert!(reasoner.instances(&class("Animal"), true).is_empty());
    assert_eq!(
        reasoner.types(&Individual::from(iri("rex")), true),
        [class("Hound")]
    );
    Ok(())
}

#[test]
fn test_disjointness_across_imports() -> Result<(), Box<dyn Error>> {
    let (mut catalog, _) = catalog()?;
    let garden = catalog.insert(load(
        "garden.ttl",
        "
        ex:garden a owl:Ontology ; owl:imports ex:zoo .
        ex:Tree a owl:Class ; rdfs:subClassOf ex:Plant .
        ex:rex a ex:Tree .",
    )?);
    let closure = ImportsClosure::new(&catalog, &garden)?;
    assert_eq!(closure.len(), 3);
    assert!(!StructuralReasoner::new(closure).is_consistent());
    Ok(())
}
