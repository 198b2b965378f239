//! Error types of the translation engine and of the imports catalog.

use oxrdf::{NamedNode, Term, Triple};
use oxrdfio::RdfParseError;
use std::fmt;

/// The kind of a [`TranslationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationErrorKind {
    /// A node matches no pattern, or several patterns, in strict mode.
    StructuralAmbiguity,
    /// A cyclic, non-terminating or otherwise broken `rdf:first`/`rdf:rest` chain.
    MalformedList,
    /// A triple the pattern requires is missing, e.g. a restriction without `owl:onProperty`.
    MissingRequiredTriple,
    /// A cardinality literal that is not a non-negative integer.
    NumericFormat,
    /// An entity whose kind is still unknown once no more progress can be made.
    UnresolvedForwardReference,
    /// Several values for a predicate that allows only one.
    MultipleValues,
    /// A value of the wrong shape, e.g. a literal where an individual is expected.
    InvalidValue,
    /// A triple no pattern consumed.
    UnparsedTriple,
}

impl fmt::Display for TranslationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StructuralAmbiguity => "structural ambiguity",
            Self::MalformedList => "malformed list",
            Self::MissingRequiredTriple => "missing required triple",
            Self::NumericFormat => "numeric format error",
            Self::UnresolvedForwardReference => "unresolved forward reference",
            Self::MultipleValues => "multiple values",
            Self::InvalidValue => "invalid value",
            Self::UnparsedTriple => "unparsed triple",
        })
    }
}

/// How bad a recorded [`TranslationError`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The input was repaired and translation went on.
    Warning,
    /// The enclosing axiom was dropped.
    Error,
}

/// A problem found while translating RDF triples into axioms.
///
/// In lax mode these are accumulated and returned next to the ontology. In strict mode the
/// first one aborts the load through [`OntologyParseError::Translation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationError {
    kind: TranslationErrorKind,
    severity: Severity,
    message: String,
    node: Option<Term>,
    triples: Vec<Triple>,
    matchers: Vec<&'static str>,
    verbose: bool,
}

impl TranslationError {
    pub(crate) fn new(kind: TranslationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            node: None,
            triples: Vec::new(),
            matchers: Vec::new(),
            verbose: false,
        }
    }

    pub(crate) fn warning(kind: TranslationErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, message).with_severity(Severity::Warning)
    }

    #[must_use]
    pub(crate) fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub(crate) fn with_node(mut self, node: impl Into<Term>) -> Self {
        self.node = Some(node.into());
        self
    }

    #[must_use]
    pub(crate) fn with_triples(mut self, triples: impl IntoIterator<Item = Triple>) -> Self {
        self.triples.extend(triples);
        self
    }

    #[must_use]
    pub(crate) fn with_matchers(mut self, matchers: impl IntoIterator<Item = &'static str>) -> Self {
        self.matchers.extend(matchers);
        self
    }

    pub(crate) fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    #[inline]
    pub fn kind(&self) -> TranslationErrorKind {
        self.kind
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The node the problem was found on.
    #[inline]
    pub fn node(&self) -> Option<&Term> {
        self.node.as_ref()
    }

    /// The offending triples.
    #[inline]
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Names of the patterns that were tried on the node.
    #[inline]
    pub fn matchers(&self) -> &[&'static str] {
        &self.matchers
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(node) = &self.node {
            write!(f, " (on {node})")?;
        }
        if self.verbose {
            for triple in &self.triples {
                write!(f, "\n  triple: {triple}")?;
            }
            if !self.matchers.is_empty() {
                write!(f, "\n  attempted: {}", self.matchers.join(", "))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for TranslationError {}

/// A fatal error while loading an ontology from RDF.
#[derive(Debug, thiserror::Error)]
pub enum OntologyParseError {
    /// Strict mode aborted on a translation error.
    #[error(transparent)]
    Translation(#[from] TranslationError),
    /// The RDF parser failed.
    #[error(transparent)]
    Syntax(#[from] RdfParseError),
    #[error("The document IRI is not a valid base IRI: {0}")]
    InvalidBaseIri(#[from] oxiri::IriParseError),
    /// The load was cancelled between two translation passes.
    #[error("Ontology loading cancelled after {passes} translation passes")]
    Cancelled { passes: usize },
}

impl OntologyParseError {
    /// The translation error that aborted a strict load, if that is what happened.
    pub fn translation_error(&self) -> Option<&TranslationError> {
        match self {
            Self::Translation(e) => Some(e),
            Self::Syntax(_) | Self::InvalidBaseIri(_) | Self::Cancelled { .. } => None,
        }
    }
}

/// An error while computing an imports closure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportsError {
    #[error("The imported ontology {iri} is not in the catalog")]
    MissingImport { iri: NamedNode },
    #[error("The ontology {iri} is not in the catalog")]
    UnknownOntology { iri: NamedNode },
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    #[test]
    fn test_display_is_terse_unless_verbose() {
        let node = NamedNode::new_unchecked("http://example.org/r");
        let mut error = TranslationError::new(TranslationErrorKind::MissingRequiredTriple, "no owl:onProperty")
            .with_node(node.clone())
            .with_triples([Triple::new(
                node.clone(),
                NamedNode::new_unchecked("http://example.org/p"),
                node,
            )])
            .with_matchers(["ObjectSomeValuesFrom"]);
        assert_eq!(
            error.to_string(),
            "missing required triple: no owl:onProperty (on <http://example.org/r>)"
        );
        error.set_verbose(true);
        assert!(error.to_string().contains("attempted: ObjectSomeValuesFrom"));
        assert_eq!(error.severity(), Severity::Error);
    }
}
