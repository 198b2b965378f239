#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod annotation;
mod axiom;
mod catalog;
mod entity;
mod error;
mod expression;
mod internals;
mod ontology;
pub mod parser;
mod reasoner;
mod serializer;
mod swrl;
pub mod vocab;

pub use crate::annotation::{Annotation, AnnotationSubject, AnnotationValue};
pub use crate::axiom::{AnnotatedAxiom, Axiom, AxiomKind};
pub use crate::catalog::OntologyCatalog;
pub use crate::entity::{
    AnnotationProperty, DataProperty, Datatype, Entity, EntityKind, Individual, NamedIndividual,
    ObjectProperty, OwlClass,
};
pub use crate::error::{
    ImportsError, OntologyParseError, Severity, TranslationError, TranslationErrorKind,
};
pub use crate::expression::{ClassExpression, DataRange, FacetRestriction, ObjectPropertyExpression};
pub use crate::ontology::{Ontology, OntologyId, SharedOntology};
pub use crate::parser::{MissingImportHandling, ParsedOntology, ParserConfig, RdfOntologyParser};
pub use crate::reasoner::{AxiomSource, ImportsClosure, Reasoner, StructuralReasoner};
pub use crate::serializer::OntologySerializer;
pub use crate::swrl::{Atom, DArgument, IArgument, Rule, Variable};
