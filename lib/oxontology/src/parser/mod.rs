//! Translation of RDF graphs into [`Ontology`] values, following the OWL 2 RDF mapping.
//!
//! The translator consumes the triples of the graph: each construct it recognizes marks its
//! triples as used, and triples that nothing uses are reported at the end. Property kinds
//! learned during a pass may unlock triples deferred by the previous one, so axiom
//! translation loops until a pass makes no progress.
//!
//! ```
//! use oxontology::{RdfOntologyParser, Axiom};
//! use oxrdfio::RdfFormat;
//!
//! let file = br#"
//! @prefix owl: <http://www.w3.org/2002/07/owl#> .
//! @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//! <http://example.com/o> a owl:Ontology .
//! <http://example.com/A> a owl:Class ; rdfs:subClassOf <http://example.com/B> .
//! <http://example.com/B> a owl:Class ."#;
//!
//! let parsed = RdfOntologyParser::new().parse_slice(RdfFormat::Turtle, file)?;
//! assert!(parsed.errors.is_empty());
//! assert_eq!(
//!     parsed
//!         .ontology
//!         .axioms()
//!         .filter(|a| matches!(a.axiom(), Axiom::SubClassOf { .. }))
//!         .count(),
//!     1
//! );
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod annotations;
mod consumer;
mod handlers;
mod list;
mod matchers;
mod store;

use crate::error::{OntologyParseError, TranslationError};
use crate::ontology::Ontology;
use consumer::Consumer;
use oxrdf::{Graph, NamedNode, Triple};
use oxrdfio::{RdfFormat, RdfParser};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::warn;

/// What to do when an imported ontology cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingImportHandling {
    /// Log the missing import and carry on without it.
    #[default]
    Silent,
    /// Fail the imports closure computation.
    Fail,
}

/// Options of the RDF to OWL translation.
///
/// ```
/// use oxontology::{MissingImportHandling, ParserConfig};
///
/// let config = ParserConfig::new()
///     .strict()
///     .with_missing_import_handling(MissingImportHandling::Fail)
///     .with_max_list_length(1_000);
/// assert!(config.is_strict());
/// assert_eq!(config.max_list_length(), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub(crate) strict: bool,
    pub(crate) report_stack_traces: bool,
    pub(crate) missing_import_handling: MissingImportHandling,
    pub(crate) treat_dangling_triples_as_axiom: bool,
    pub(crate) max_list_length: usize,
    pub(crate) max_passes: usize,
    pub(crate) cancellation: Option<Arc<AtomicBool>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict: false,
            report_stack_traces: false,
            missing_import_handling: MissingImportHandling::Silent,
            treat_dangling_triples_as_axiom: false,
            max_list_length: 100_000,
            max_passes: 1_000,
            cancellation: None,
        }
    }
}

impl ParserConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses any non-conformant input instead of repairing it.
    ///
    /// The first translation problem aborts the load with [`OntologyParseError::Translation`].
    #[inline]
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Renders the offending triples and the attempted matchers of every error.
    #[inline]
    #[must_use]
    pub fn with_stack_traces(mut self) -> Self {
        self.report_stack_traces = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_missing_import_handling(mut self, handling: MissingImportHandling) -> Self {
        self.missing_import_handling = handling;
        self
    }

    /// Reads triples with an undeclared predicate as annotation assertions.
    #[inline]
    #[must_use]
    pub fn treat_dangling_triples_as_axiom(mut self) -> Self {
        self.treat_dangling_triples_as_axiom = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_list_length(mut self, max_list_length: usize) -> Self {
        self.max_list_length = max_list_length;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Stops the translation between two passes once `flag` is set.
    #[inline]
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    #[inline]
    pub fn reports_stack_traces(&self) -> bool {
        self.report_stack_traces
    }

    #[inline]
    pub fn missing_import_handling(&self) -> MissingImportHandling {
        self.missing_import_handling
    }

    #[inline]
    pub fn treats_dangling_triples_as_axiom(&self) -> bool {
        self.treat_dangling_triples_as_axiom
    }

    #[inline]
    pub fn max_list_length(&self) -> usize {
        self.max_list_length
    }

    #[inline]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}

/// The outcome of a successful load.
#[derive(Debug)]
pub struct ParsedOntology {
    pub ontology: Ontology,
    /// Problems met and recovered from, in the order they were found.
    pub errors: Vec<TranslationError>,
    /// Number of axiom translation passes, the final forced pass included.
    pub passes: usize,
}

/// Loads ontologies from RDF.
///
/// Every load gets its own translation session, so loads may run concurrently from
/// different threads.
#[derive(Debug, Clone, Default)]
pub struct RdfOntologyParser {
    config: ParserConfig,
    document_iri: Option<NamedNode>,
}

impl RdfOntologyParser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            document_iri: None,
        }
    }

    /// The IRI the document was loaded from, also used as base IRI when parsing syntaxes.
    #[inline]
    #[must_use]
    pub fn with_document_iri(mut self, iri: impl Into<NamedNode>) -> Self {
        self.document_iri = Some(iri.into());
        self
    }

    #[inline]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Translates an already parsed set of triples.
    pub fn parse_triples(
        &self,
        triples: impl IntoIterator<Item = Triple>,
    ) -> Result<ParsedOntology, OntologyParseError> {
        let mut consumer = Consumer::new(&self.config, self.document_iri.clone());
        for triple in triples {
            consumer.add_triple(triple);
        }
        consumer.finish()
    }

    pub fn parse_graph(&self, graph: &Graph) -> Result<ParsedOntology, OntologyParseError> {
        self.parse_triples(graph.iter().map(|t| t.into_owned()))
    }

    /// Parses a serialization of the ontology and translates its default graph.
    ///
    /// Triples of named graphs are skipped with a warning.
    pub fn parse_read(
        &self,
        format: RdfFormat,
        reader: impl Read,
    ) -> Result<ParsedOntology, OntologyParseError> {
        let mut parser = RdfParser::from_format(format);
        if let Some(iri) = &self.document_iri {
            parser = parser.with_base_iri(iri.as_str())?;
        }
        let mut consumer = Consumer::new(&self.config, self.document_iri.clone());
        let mut skipped = 0_usize;
        for quad in parser.for_reader(reader) {
            let quad = quad?;
            if quad.graph_name.is_default_graph() {
                consumer.add_triple(Triple::new(quad.subject, quad.predicate, quad.object));
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(skipped, "ignoring triples outside of the default graph");
        }
        consumer.finish()
    }

    pub fn parse_slice(
        &self,
        format: RdfFormat,
        slice: &[u8],
    ) -> Result<ParsedOntology, OntologyParseError> {
        self.parse_read(format, slice)
    }
}
