//! Axiom indexes and shared ontologies.

use oxontology::{
    AnnotatedAxiom, Annotation, Axiom, AxiomKind, ClassExpression, Entity, ObjectProperty,
    Ontology, OwlClass, SharedOntology,
};
use oxrdf::vocab::rdfs;
use oxrdf::{Literal, NamedNode};
use std::thread;

fn iri(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn class(name: &str) -> ClassExpression {
    ClassExpression::class(iri(name))
}

fn sub_class_of(sub: ClassExpression, sup: ClassExpression) -> Axiom {
    Axiom::SubClassOf {
        sub_class: sub,
        super_class: sup,
    }
}

#[test]
fn test_referencing_axioms_follow_removals() {
    let e = Entity::from(OwlClass::new(iri("E")));
    let first = AnnotatedAxiom::from(sub_class_of(class("E"), class("A")));
    let second = AnnotatedAxiom::from(sub_class_of(
        class("B"),
        ClassExpression::some_values_from(ObjectProperty::new(iri("p")), class("E")),
    ));
    let third = AnnotatedAxiom::from(Axiom::DisjointClasses(vec![class("E"), class("C")]));

    let mut ontology = Ontology::default();
    ontology.add_axiom(sub_class_of(class("A"), class("B")));
    for axiom in [&first, &second, &third] {
        assert!(ontology.add_axiom(axiom.clone()));
    }
    assert_eq!(ontology.referencing_axioms(&e).count(), 3);

    assert!(ontology.remove_axiom(&second));
    assert!(!ontology.remove_axiom(&second));
    let mut remaining = ontology.referencing_axioms(&e).collect::<Vec<_>>();
    remaining.sort_by_key(|axiom| axiom.to_string());
    let mut expected = vec![&third, &first];
    expected.sort_by_key(|axiom| axiom.to_string());
    assert_eq!(remaining, expected);
    assert!(!ontology.contains_entity(&Entity::from(ObjectProperty::new(iri("p")))));
}

#[test]
fn test_annotated_versions_are_distinct_axioms() {
    let axiom = sub_class_of(class("A"), class("B"));
    let annotated = AnnotatedAxiom::new(
        axiom.clone(),
        vec![Annotation::new(
            rdfs::COMMENT,
            Literal::new_simple_literal("why"),
        )],
    );
    let mut ontology = Ontology::default();
    assert!(ontology.add_axiom(axiom.clone()));
    assert!(ontology.add_axiom(annotated.clone()));
    assert!(!ontology.add_axiom(axiom.clone()));
    assert_eq!(ontology.axiom_count(), 2);
    assert_eq!(ontology.annotated_versions(&axiom).len(), 2);
    assert!(annotated.equals_ignoring_annotations(&AnnotatedAxiom::from(axiom.clone())));

    assert!(ontology.remove_axiom(&AnnotatedAxiom::from(axiom.clone())));
    assert!(ontology.contains_axiom_ignoring_annotations(&axiom));
    assert_eq!(
        ontology
            .axioms_of_kind(AxiomKind::SubClassOf)
            .collect::<Vec<_>>(),
        [&annotated]
    );
}

#[test]
fn test_unordered_operands_are_sets() {
    let mut ontology = Ontology::default();
    assert!(ontology.add_axiom(Axiom::EquivalentClasses(vec![class("A"), class("B")])));
    assert!(!ontology.add_axiom(Axiom::EquivalentClasses(vec![class("B"), class("A")])));
    assert!(!ontology.add_axiom(Axiom::EquivalentClasses(vec![
        class("B"),
        class("A"),
        class("A"),
    ])));
    assert_eq!(ontology.axiom_count(), 1);
}

#[test]
fn test_told_hierarchy_from_index() {
    let mut ontology = Ontology::default();
    ontology.add_axiom(sub_class_of(class("Dog"), class("Mammal")));
    ontology.add_axiom(sub_class_of(class("Cat"), class("Mammal")));
    ontology.add_axiom(sub_class_of(
        class("Dog"),
        ClassExpression::some_values_from(ObjectProperty::new(iri("has")), class("Tail")),
    ));
    let mammal = OwlClass::new(iri("Mammal"));
    let dog = OwlClass::new(iri("Dog"));
    let mut subs = ontology.direct_sub_classes(&mammal).collect::<Vec<_>>();
    subs.sort();
    assert_eq!(subs, [&OwlClass::new(iri("Cat")), &dog]);
    assert_eq!(
        ontology.direct_super_classes(&dog).collect::<Vec<_>>(),
        [&mammal]
    );
}

#[test]
fn test_shared_ontology_across_threads() {
    let shared = SharedOntology::new(Ontology::default());
    let writers = (0..4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared.write().add_axiom(sub_class_of(
                    class(&format!("C{i}")),
                    class("Top"),
                ));
            })
        })
        .collect::<Vec<_>>();
    for writer in writers {
        assert!(writer.join().is_ok());
    }
    let top = Entity::from(OwlClass::new(iri("Top")));
    assert_eq!(shared.read().referencing_axioms(&top).count(), 4);
}
