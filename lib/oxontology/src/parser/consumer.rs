//! The translation driver.
//!
//! A [`Consumer`] owns the triples of one loading session and turns them into axioms in
//! successive phases:
//!
//! 1. the ontology header (ontology IRI, version IRI, imports) is extracted,
//! 2. explicit declarations are read so that entity kinds are known,
//! 3. ontology annotations are read,
//! 4. every remaining axiom-shaped triple is translated by a work-list fixpoint: triples
//!    that need the kind of a property nobody has declared yet are deferred to the next pass,
//!    until a pass makes no progress, after which a final pass settles the remaining ones
//!    with default kinds,
//! 5. `owl:Axiom` reifications are merged into the axioms they annotate,
//! 6. triples nobody consumed are reported.
//!
//! Every tentative translation runs between a checkpoint and a commit: if it has to be
//! deferred or fails, the triples it consumed are handed back.

use super::handlers::object_characteristic;
use super::matchers::{ClassExpressionMatcher, DataRangeMatcher, Matcher, SwrlAtomMatcher};
use super::store::{LogPosition, TripleId, TripleStore};
use super::{ParsedOntology, ParserConfig};
use crate::annotation::AnnotationValue;
use crate::axiom::{AnnotatedAxiom, Axiom};
use crate::entity::{DataProperty, EntityKind, Individual, NamedIndividual};
use crate::error::{OntologyParseError, Severity, TranslationError, TranslationErrorKind};
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression};
use crate::ontology::{Ontology, OntologyId};
use crate::swrl::{DArgument, IArgument, Variable};
use crate::vocab::{self, owl, swrl};
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use std::num::IntErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

/// Loading sessions started by this process, used to scope anonymous individual labels.
static SESSIONS: AtomicU64 = AtomicU64::new(0);

/// Predicates of class axioms whose subject may be an anonymous class expression.
pub(super) const CLASS_AXIOM_PREDICATES: [NamedNodeRef<'static>; 4] = [
    rdfs::SUB_CLASS_OF,
    owl::EQUIVALENT_CLASS,
    owl::DISJOINT_WITH,
    owl::HAS_KEY,
];

const PROPERTY_AXIOM_PREDICATES: [NamedNodeRef<'static>; 10] = [
    owl::DISJOINT_UNION_OF,
    rdfs::SUB_PROPERTY_OF,
    owl::PROPERTY_CHAIN_AXIOM,
    owl::EQUIVALENT_PROPERTY,
    owl::PROPERTY_DISJOINT_WITH,
    rdfs::DOMAIN,
    rdfs::RANGE,
    owl::SAME_AS,
    owl::DIFFERENT_FROM,
    owl::INVERSE_OF,
];

/// Boolean class constructors, also read as class definitions on a named subject.
const BOOLEAN_PREDICATES: [NamedNodeRef<'static>; 4] = [
    owl::INTERSECTION_OF,
    owl::UNION_OF,
    owl::COMPLEMENT_OF,
    owl::ONE_OF,
];

/// Predicates that only ever describe the inside of a construct.
const STRUCTURAL_PREDICATES: [NamedNodeRef<'static>; 40] = [
    rdf::FIRST,
    rdf::REST,
    owl::ON_PROPERTY,
    owl::SOME_VALUES_FROM,
    owl::ALL_VALUES_FROM,
    owl::HAS_VALUE,
    owl::HAS_SELF,
    owl::MIN_CARDINALITY,
    owl::MAX_CARDINALITY,
    owl::CARDINALITY,
    owl::MIN_QUALIFIED_CARDINALITY,
    owl::MAX_QUALIFIED_CARDINALITY,
    owl::QUALIFIED_CARDINALITY,
    owl::ON_CLASS,
    owl::ON_DATA_RANGE,
    owl::ON_DATATYPE,
    owl::WITH_RESTRICTIONS,
    owl::INTERSECTION_OF,
    owl::UNION_OF,
    owl::COMPLEMENT_OF,
    owl::ONE_OF,
    owl::DATATYPE_COMPLEMENT_OF,
    owl::INVERSE_OF,
    owl::MEMBERS,
    owl::DISTINCT_MEMBERS,
    owl::ANNOTATED_SOURCE,
    owl::ANNOTATED_PROPERTY,
    owl::ANNOTATED_TARGET,
    owl::SOURCE_INDIVIDUAL,
    owl::ASSERTION_PROPERTY,
    owl::TARGET_INDIVIDUAL,
    owl::TARGET_VALUE,
    swrl::BODY,
    swrl::HEAD,
    swrl::CLASS_PREDICATE,
    swrl::PROPERTY_PREDICATE,
    swrl::DATA_RANGE,
    swrl::ARGUMENT_1,
    swrl::ARGUMENT_2,
    swrl::BUILTIN,
];

/// Types of nodes that stand for a whole axiom or for reification machinery.
const SPECIAL_TYPES: [NamedNodeRef<'static>; 15] = [
    owl::AXIOM,
    owl::ANNOTATION,
    owl::ALL_DISJOINT_CLASSES,
    owl::ALL_DISJOINT_PROPERTIES,
    owl::ALL_DIFFERENT,
    owl::NEGATIVE_PROPERTY_ASSERTION,
    swrl::IMP,
    swrl::ATOM_LIST,
    swrl::CLASS_ATOM,
    swrl::DATA_RANGE_ATOM,
    swrl::INDIVIDUAL_PROPERTY_ATOM,
    swrl::DATAVALUED_PROPERTY_ATOM,
    swrl::SAME_INDIVIDUAL_ATOM,
    swrl::DIFFERENT_INDIVIDUALS_ATOM,
    swrl::BUILTIN_ATOM,
];

/// Types of anonymous class expressions, data ranges and lists.
const CONSTRUCT_TYPES: [NamedNodeRef<'static>; 5] = [
    owl::RESTRICTION,
    owl::CLASS,
    rdfs::DATATYPE,
    owl::DATA_RANGE,
    rdf::LIST,
];

/// Types whose `rdf:type` triple is the entry point of a multi-triple axiom.
pub(super) const N_ARY_TYPES: [NamedNodeRef<'static>; 5] = [
    owl::ALL_DISJOINT_CLASSES,
    owl::ALL_DISJOINT_PROPERTIES,
    owl::ALL_DIFFERENT,
    owl::NEGATIVE_PROPERTY_ASSERTION,
    swrl::IMP,
];

/// The kind a property IRI resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyKind {
    Object,
    Data,
    Annotation,
}

impl PropertyKind {
    fn entity_kind(self) -> EntityKind {
        match self {
            Self::Object => EntityKind::ObjectProperty,
            Self::Data => EntityKind::DataProperty,
            Self::Annotation => EntityKind::AnnotationProperty,
        }
    }
}

/// Why a translation stopped before producing its result.
#[derive(Debug)]
pub(crate) enum Halt {
    /// The kind of this IRI is needed and not known yet.
    Deferred(NamedNode),
    Failed(TranslationError),
}

impl From<TranslationError> for Halt {
    fn from(error: TranslationError) -> Self {
        Self::Failed(error)
    }
}

pub(crate) type Translation<T> = Result<T, Halt>;

/// What a node looks like before it is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Class,
    DataRange,
    Unknown,
}

/// The triples describing one node, as seen by the matchers.
#[derive(Debug)]
pub(crate) struct NodeView {
    pub node: NamedOrBlankNode,
    pub triples: Vec<(TripleId, Triple)>,
    /// Kind of the property the node restricts, if it restricts one.
    pub property_kind: Option<PropertyKind>,
}

impl NodeView {
    pub fn types(&self) -> impl Iterator<Item = &NamedNode> {
        self.objects(rdf::TYPE).filter_map(|o| match o {
            Term::NamedNode(o) => Some(o),
            _ => None,
        })
    }

    pub fn objects<'a>(&'a self, predicate: NamedNodeRef<'a>) -> impl Iterator<Item = &'a Term> {
        self.triples
            .iter()
            .filter(move |(_, t)| t.predicate == predicate)
            .map(|(_, t)| &t.object)
    }

    pub fn count(&self, predicate: NamedNodeRef<'_>) -> usize {
        self.triples
            .iter()
            .filter(|(_, t)| t.predicate == predicate)
            .count()
    }

    pub fn has(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.triples.iter().any(|(_, t)| t.predicate == predicate)
    }

    pub fn first(&self, predicate: NamedNodeRef<'_>) -> Option<&Term> {
        self.triples
            .iter()
            .find(|(_, t)| t.predicate == predicate)
            .map(|(_, t)| &t.object)
    }

    fn cloned_triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.triples.iter().map(|(_, t)| t.clone())
    }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    log: LogPosition,
    pending: usize,
    learned: usize,
    kinds_changed: bool,
}

pub(crate) struct Consumer<'a> {
    pub(super) config: &'a ParserConfig,
    pub(super) store: TripleStore,
    pub(super) ontology: Ontology,
    errors: Vec<TranslationError>,
    /// Warnings of the translation in progress, reported once it is committed.
    pending: Vec<TranslationError>,
    kinds: FxHashMap<NamedNode, u8>,
    /// Kinds as they were before each `learn`, so tentative translations can forget them.
    learned: Vec<(NamedNode, u8)>,
    kinds_changed: bool,
    pub(super) variables: FxHashSet<NamedNode>,
    session: u64,
    anonymous: FxHashMap<BlankNode, BlankNode>,
    /// Axioms produced by each translated triple, used to attach reified annotations.
    pub(super) produced: FxHashMap<TripleId, Vec<AnnotatedAxiom>>,
    visiting: FxHashSet<NamedOrBlankNode>,
    /// Unknown property kinds get defaults instead of deferring.
    pub(super) forced: bool,
    ontology_node: Option<NamedOrBlankNode>,
    passes: usize,
}

impl<'a> Consumer<'a> {
    pub fn new(config: &'a ParserConfig, document_iri: Option<NamedNode>) -> Self {
        let mut ontology = Ontology::default();
        if let Some(iri) = document_iri {
            ontology.set_document_iri(iri);
        }
        Self {
            config,
            store: TripleStore::default(),
            ontology,
            errors: Vec::new(),
            pending: Vec::new(),
            kinds: FxHashMap::default(),
            learned: Vec::new(),
            kinds_changed: false,
            variables: FxHashSet::default(),
            session: SESSIONS.fetch_add(1, Ordering::Relaxed),
            anonymous: FxHashMap::default(),
            produced: FxHashMap::default(),
            visiting: FxHashSet::default(),
            forced: false,
            ontology_node: None,
            passes: 0,
        }
    }

    pub fn add_triple(&mut self, triple: Triple) {
        self.store.insert(triple);
    }

    /// Runs every phase and returns the ontology with the problems met on the way.
    pub fn finish(mut self) -> Result<ParsedOntology, OntologyParseError> {
        debug!(
            session = self.session,
            triples = self.store.len(),
            strict = self.config.strict,
            "translating RDF graph into an ontology"
        );
        self.read_header()?;
        self.read_declarations();
        self.read_header_annotations()?;
        self.translate_axioms()?;
        self.read_axiom_annotations()?;
        self.report_unparsed()?;
        debug!(
            session = self.session,
            axioms = self.ontology.axiom_count(),
            errors = self.errors.len(),
            passes = self.passes,
            "ontology translated"
        );
        Ok(ParsedOntology {
            ontology: self.ontology,
            errors: self.errors,
            passes: self.passes,
        })
    }

    // Error channel

    /// Records a problem, or aborts the load in strict mode.
    pub(super) fn report(&mut self, mut error: TranslationError) -> Result<(), OntologyParseError> {
        error.set_verbose(self.config.report_stack_traces);
        warn!(kind = %error.kind(), severity = ?error.severity(), "{error}");
        if self.config.report_stack_traces {
            debug!(
                triples = ?error.triples(),
                matchers = ?error.matchers(),
                "translation error context"
            );
        }
        if self.config.strict {
            return Err(error.with_severity(Severity::Error).into());
        }
        self.errors.push(error);
        Ok(())
    }

    /// Notes a repair of non-conformant input, which strict mode refuses.
    pub(super) fn recover(&mut self, error: TranslationError) -> Translation<()> {
        if self.config.strict {
            return Err(Halt::Failed(error.with_severity(Severity::Error)));
        }
        self.pending.push(error.with_severity(Severity::Warning));
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            log: self.store.checkpoint(),
            pending: self.pending.len(),
            learned: self.learned.len(),
            kinds_changed: self.kinds_changed,
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.store.rollback(checkpoint.log);
        self.pending.truncate(checkpoint.pending);
        for (iri, previous) in self.learned.drain(checkpoint.learned..).rev() {
            if previous == 0 {
                self.kinds.remove(&iri);
            } else {
                self.kinds.insert(iri, previous);
            }
        }
        self.kinds_changed = checkpoint.kinds_changed;
    }

    fn flush(&mut self) -> Result<(), OntologyParseError> {
        for error in std::mem::take(&mut self.pending) {
            self.report(error)?;
        }
        Ok(())
    }

    /// Runs a tentative translation, undoing its consumption if it does not succeed.
    pub(super) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Translation<T>,
    ) -> Result<Option<T>, OntologyParseError> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => {
                self.flush()?;
                Ok(Some(value))
            }
            Err(Halt::Deferred(iri)) => {
                self.rollback(checkpoint);
                trace!(iri = %iri, "translation deferred");
                Ok(None)
            }
            Err(Halt::Failed(error)) => {
                self.rollback(checkpoint);
                self.report(error)?;
                Ok(None)
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), OntologyParseError> {
        if self
            .config
            .cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            debug!(passes = self.passes, "ontology loading cancelled");
            return Err(OntologyParseError::Cancelled {
                passes: self.passes,
            });
        }
        Ok(())
    }

    // Phases

    fn read_header(&mut self) -> Result<(), OntologyParseError> {
        let mut nodes = Vec::new();
        for id in self.store.with_predicate(rdf::TYPE) {
            let triple = self.store.get(id);
            if matches!(&triple.object, Term::NamedNode(o) if *o == owl::ONTOLOGY)
                && !nodes.contains(&triple.subject)
            {
                nodes.push(triple.subject.clone());
            }
        }
        let imported = |store: &TripleStore, node: &NamedOrBlankNode| {
            store
                .with_object(&node.clone().into())
                .any(|id| store.get(id).predicate == owl::IMPORTS)
        };
        let chosen = nodes
            .iter()
            .find(|node| !imported(&self.store, *node))
            .or_else(|| nodes.first())
            .cloned();
        let Some(node) = chosen else {
            return Ok(());
        };
        for other in nodes.iter().filter(|other| **other != node) {
            self.report(
                TranslationError::warning(
                    TranslationErrorKind::MultipleValues,
                    format!("several ontology headers, {other} is ignored"),
                )
                .with_node(other.clone()),
            )?;
        }

        let mut id = match &node {
            NamedOrBlankNode::NamedNode(iri) => OntologyId::named(iri.clone()),
            NamedOrBlankNode::BlankNode(_) => OntologyId::anonymous(),
        };
        let ids = self.store.with_subject(&node).collect::<Vec<_>>();
        let mut has_version = false;
        for triple_id in ids {
            let triple = self.store.get(triple_id).clone();
            let predicate = triple.predicate.as_ref();
            if predicate == rdf::TYPE && matches!(&triple.object, Term::NamedNode(o) if *o == owl::ONTOLOGY) {
                self.store.consume(triple_id);
            } else if predicate == owl::VERSION_IRI {
                let Term::NamedNode(version) = triple.object else {
                    continue;
                };
                if has_version {
                    self.report(
                        TranslationError::warning(
                            TranslationErrorKind::MultipleValues,
                            format!("several version IRIs, {version} is ignored"),
                        )
                        .with_triples([self.store.get(triple_id).clone()]),
                    )?;
                } else {
                    id = id.with_version(version);
                    has_version = true;
                }
                self.store.consume(triple_id);
            } else if predicate == owl::IMPORTS {
                if let Term::NamedNode(import) = triple.object {
                    self.ontology.add_import(import);
                    self.store.consume(triple_id);
                }
            }
        }
        debug!(id = ?id, imports = self.ontology.imports().len(), "ontology header read");
        self.ontology.set_id(id);
        self.ontology_node = Some(node);
        Ok(())
    }

    /// Reads explicit declarations, which makes entity kinds known before any axiom.
    fn read_declarations(&mut self) {
        let ids = self
            .store
            .with_predicate(rdf::TYPE)
            .filter(|id| !self.store.is_consumed(*id))
            .collect::<Vec<_>>();
        for id in ids {
            let triple = self.store.get(id);
            let (NamedOrBlankNode::NamedNode(subject), Term::NamedNode(class)) =
                (&triple.subject, &triple.object)
            else {
                continue;
            };
            let (subject, class) = (subject.clone(), class.clone());
            let class = class.as_ref();
            if let Some(kind) = declared_kind(class) {
                self.learn(&subject, kind);
                self.store.consume(id);
                if !is_builtin(kind, subject.as_ref()) {
                    self.commit(id, vec![Axiom::Declaration(kind.entity(subject)).into()]);
                }
            } else if class == swrl::VARIABLE {
                self.variables.insert(subject);
                self.store.consume(id);
            } else if object_characteristic(class).is_some() {
                self.learn(&subject, EntityKind::ObjectProperty);
            } else if class == rdfs::CLASS && !self.config.strict {
                self.learn(&subject, EntityKind::Class);
            }
        }
        debug!(entities = self.kinds.len(), "declarations read");
    }

    fn read_header_annotations(&mut self) -> Result<(), OntologyParseError> {
        let Some(node) = self.ontology_node.clone() else {
            return Ok(());
        };
        if let Some(annotations) = self.attempt(|this| this.annotations_on(&node))? {
            for annotation in annotations {
                self.ontology.add_annotation(annotation);
            }
        }
        Ok(())
    }

    fn translate_axioms(&mut self) -> Result<(), OntologyParseError> {
        let mut work = self
            .store
            .unconsumed()
            .filter(|id| self.is_candidate(*id))
            .collect::<Vec<_>>();
        debug!(candidates = work.len(), "translating axioms");
        while !work.is_empty() {
            if self.passes >= self.config.max_passes {
                warn!(
                    passes = self.passes,
                    remaining = work.len(),
                    "translation pass limit reached"
                );
                break;
            }
            self.check_cancelled()?;
            self.passes += 1;
            self.kinds_changed = false;
            let before = work.len();
            work = self.run_pass(work)?;
            let translated = before - work.len();
            debug!(
                pass = self.passes,
                translated,
                deferred = work.len(),
                "translation pass done"
            );
            if translated == 0 && !self.kinds_changed {
                break;
            }
        }
        self.forced = true;
        if !work.is_empty() {
            self.check_cancelled()?;
            self.passes += 1;
            debug!(
                pass = self.passes,
                remaining = work.len(),
                "settling forward references"
            );
            for id in self.run_pass(work)? {
                let triple = self.store.get(id).clone();
                self.report(
                    TranslationError::new(
                        TranslationErrorKind::UnresolvedForwardReference,
                        "the triple could not be translated",
                    )
                    .with_triples([triple]),
                )?;
            }
        }
        Ok(())
    }

    /// Tries every candidate once, returns the deferred ones.
    fn run_pass(&mut self, work: Vec<TripleId>) -> Result<Vec<TripleId>, OntologyParseError> {
        let mut deferred = Vec::new();
        for id in work {
            if self.store.is_consumed(id) {
                continue;
            }
            if !self.translate_candidate(id)? {
                deferred.push(id);
            }
        }
        Ok(deferred)
    }

    /// Returns `false` if the triple has to wait for a later pass.
    fn translate_candidate(&mut self, id: TripleId) -> Result<bool, OntologyParseError> {
        let checkpoint = self.checkpoint();
        match self.handle_triple(id) {
            Ok(axioms) => {
                self.store.consume(id);
                self.commit(id, axioms);
                self.flush()?;
                Ok(true)
            }
            Err(Halt::Deferred(iri)) => {
                self.rollback(checkpoint);
                trace!(triple = %self.store.get(id), waiting_on = %iri, "axiom deferred");
                Ok(false)
            }
            Err(Halt::Failed(error)) => {
                self.rollback(checkpoint);
                let triple = self.store.get(id).clone();
                self.discard(id);
                self.report(error.with_triples([triple]))?;
                Ok(true)
            }
        }
    }

    pub(super) fn commit(&mut self, id: TripleId, axioms: Vec<AnnotatedAxiom>) {
        for axiom in axioms {
            trace!(axiom = %axiom, "axiom translated");
            self.produced.entry(id).or_default().push(axiom.clone());
            self.ontology.add_axiom(axiom);
        }
    }

    /// Consumes a failed triple and the anonymous constructs hanging from it.
    fn discard(&mut self, id: TripleId) {
        self.store.consume(id);
        let triple = self.store.get(id).clone();
        let mut stack = Vec::new();
        if self.is_structural(&triple.subject) {
            stack.push(triple.subject);
        }
        if let Term::BlankNode(object) = triple.object {
            let object = object.into();
            if self.is_structural(&object) {
                stack.push(object);
            }
        }
        let mut seen = FxHashSet::default();
        while let Some(node) = stack.pop() {
            if !seen.insert(node.clone()) {
                continue;
            }
            let ids = self.store.with_subject(&node).collect::<Vec<_>>();
            for id in ids {
                let triple = self.store.get(id);
                if CLASS_AXIOM_PREDICATES.contains(&triple.predicate.as_ref()) {
                    continue;
                }
                if let Term::BlankNode(object) = &triple.object {
                    let object = object.clone().into();
                    if self.is_structural(&object) {
                        stack.push(object);
                    }
                }
                self.store.consume(id);
            }
        }
    }

    fn report_unparsed(&mut self) -> Result<(), OntologyParseError> {
        let ids = self.store.unconsumed().collect::<Vec<_>>();
        for id in ids {
            self.store.consume(id);
            let triple = self.store.get(id).clone();
            if self.is_noise(&triple) {
                trace!(triple = %triple, "built-in vocabulary triple ignored");
                continue;
            }
            self.report(
                TranslationError::warning(
                    TranslationErrorKind::UnparsedTriple,
                    format!("{triple} was not translated into any axiom"),
                )
                .with_triples([triple]),
            )?;
        }
        Ok(())
    }

    fn is_noise(&self, triple: &Triple) -> bool {
        if triple.predicate != rdf::TYPE {
            return false;
        }
        let Term::NamedNode(class) = &triple.object else {
            return false;
        };
        let class = class.as_ref();
        if class == rdf::LIST {
            return true;
        }
        if class == rdfs::CLASS || class == rdf::PROPERTY {
            return match &triple.subject {
                NamedOrBlankNode::NamedNode(subject) => self
                    .kinds
                    .get(subject)
                    .is_some_and(|kinds| *kinds != 0),
                NamedOrBlankNode::BlankNode(_) => false,
            };
        }
        false
    }

    // Node classification

    pub(super) fn is_special(&self, node: &NamedOrBlankNode) -> bool {
        self.ontology_node.as_ref() == Some(node)
            || self
                .store
                .types(node)
                .any(|t| SPECIAL_TYPES.contains(&t.as_ref()))
    }

    /// Whether the blank node is part of a construct rather than an anonymous individual.
    pub(super) fn is_structural(&self, node: &NamedOrBlankNode) -> bool {
        if matches!(node, NamedOrBlankNode::NamedNode(_)) {
            return false;
        }
        self.store.with_subject(node).any(|id| {
            let triple = self.store.get(id);
            let predicate = triple.predicate.as_ref();
            if predicate == rdf::TYPE {
                matches!(&triple.object, Term::NamedNode(t) if CONSTRUCT_TYPES.contains(&t.as_ref()) || SPECIAL_TYPES.contains(&t.as_ref()))
            } else {
                STRUCTURAL_PREDICATES.contains(&predicate)
            }
        })
    }

    fn is_candidate(&self, id: TripleId) -> bool {
        let triple = self.store.get(id);
        let subject = &triple.subject;
        let predicate = triple.predicate.as_ref();
        if predicate == rdf::TYPE {
            return match &triple.object {
                Term::NamedNode(class) => {
                    let class = class.as_ref();
                    if N_ARY_TYPES.contains(&class) {
                        return true;
                    }
                    if self.is_special(subject) || self.is_structural(subject) {
                        return false;
                    }
                    object_characteristic(class).is_some()
                        || class == owl::FUNCTIONAL_PROPERTY
                        || vocab::is_builtin_class(class)
                        || !vocab::is_reserved(class)
                }
                Term::BlankNode(_) => !self.is_special(subject) && !self.is_structural(subject),
                _ => false,
            };
        }
        if self.is_special(subject) {
            return false;
        }
        if predicate == owl::INVERSE_OF || BOOLEAN_PREDICATES.contains(&predicate) {
            return matches!(subject, NamedOrBlankNode::NamedNode(_));
        }
        if CLASS_AXIOM_PREDICATES.contains(&predicate)
            || PROPERTY_AXIOM_PREDICATES.contains(&predicate)
        {
            return true;
        }
        if STRUCTURAL_PREDICATES.contains(&predicate) || self.is_structural(subject) {
            return false;
        }
        !vocab::is_reserved(predicate) || vocab::is_builtin_annotation_property(predicate)
    }

    /// The triples of a node that describe it, leaving out the class axioms it is subject of.
    pub(super) fn view(&self, node: &NamedOrBlankNode) -> NodeView {
        let triples = self
            .store
            .with_subject(node)
            .map(|id| (id, self.store.get(id).clone()))
            .filter(|(_, t)| !CLASS_AXIOM_PREDICATES.contains(&t.predicate.as_ref()))
            .collect();
        NodeView {
            node: node.clone(),
            triples,
            property_kind: None,
        }
    }

    /// What the term looks like: a class expression, a data range or neither.
    pub(super) fn shape(&self, term: &Term, depth: usize) -> Shape {
        match term {
            Term::NamedNode(iri) => {
                if self.has_kind(iri, EntityKind::Class) {
                    Shape::Class
                } else if self.has_kind(iri, EntityKind::Datatype) {
                    Shape::DataRange
                } else {
                    Shape::Unknown
                }
            }
            Term::BlankNode(node) if depth < 16 => {
                let node = node.clone().into();
                for class in self.store.types(&node) {
                    let class = class.as_ref();
                    if class == owl::RESTRICTION || class == owl::CLASS {
                        return Shape::Class;
                    }
                    if class == rdfs::DATATYPE || class == owl::DATA_RANGE {
                        return Shape::DataRange;
                    }
                }
                for id in self.store.with_subject(&node) {
                    let triple = self.store.get(id);
                    let predicate = triple.predicate.as_ref();
                    if predicate == owl::ON_PROPERTY || predicate == owl::COMPLEMENT_OF {
                        return Shape::Class;
                    }
                    if predicate == owl::DATATYPE_COMPLEMENT_OF
                        || predicate == owl::ON_DATATYPE
                        || predicate == owl::WITH_RESTRICTIONS
                    {
                        return Shape::DataRange;
                    }
                    if predicate == owl::INTERSECTION_OF || predicate == owl::UNION_OF {
                        return self.first_element(&triple.object).map_or(Shape::Unknown, |first| {
                            self.shape(first, depth + 1)
                        });
                    }
                    if predicate == owl::ONE_OF {
                        return match self.first_element(&triple.object) {
                            Some(Term::Literal(_)) => Shape::DataRange,
                            Some(_) => Shape::Class,
                            None => Shape::Unknown,
                        };
                    }
                }
                Shape::Unknown
            }
            _ => Shape::Unknown,
        }
    }

    fn first_element(&self, list: &Term) -> Option<&Term> {
        let node = resource(list)?;
        self.store.objects(&node, rdf::FIRST).next()
    }

    // Entity kinds

    pub(super) fn learn(&mut self, iri: &NamedNode, kind: EntityKind) {
        let kinds = self.kinds.entry(iri.clone()).or_default();
        if *kinds & kind.bit() == 0 {
            self.learned.push((iri.clone(), *kinds));
            *kinds |= kind.bit();
            self.kinds_changed = true;
            trace!(iri = %iri, kind = %kind, "entity kind learned");
        }
    }

    pub(super) fn has_kind(&self, iri: &NamedNode, kind: EntityKind) -> bool {
        is_builtin(kind, iri.as_ref())
            || self
                .kinds
                .get(iri)
                .is_some_and(|kinds| kinds & kind.bit() != 0)
    }

    pub(super) fn property_kind(&self, iri: &NamedNode) -> Option<PropertyKind> {
        [
            PropertyKind::Object,
            PropertyKind::Data,
            PropertyKind::Annotation,
        ]
        .into_iter()
        .find(|kind| self.has_kind(iri, kind.entity_kind()))
    }

    /// The kind of the property, inferred from the hint, deferred, or defaulted once
    /// nothing else can tell.
    pub(super) fn resolve_property(
        &mut self,
        iri: &NamedNode,
        hint: Option<PropertyKind>,
    ) -> Translation<PropertyKind> {
        if let Some(kind) = self.property_kind(iri) {
            return Ok(kind);
        }
        if let Some(kind) = hint {
            self.learn(iri, kind.entity_kind());
            return Ok(kind);
        }
        if !self.forced {
            return Err(Halt::Deferred(iri.clone()));
        }
        self.recover(
            TranslationError::warning(
                TranslationErrorKind::UnresolvedForwardReference,
                format!("{iri} is never declared, reading it as an object property"),
            )
            .with_node(iri.clone()),
        )?;
        self.learn(iri, EntityKind::ObjectProperty);
        Ok(PropertyKind::Object)
    }

    /// The common kind of two properties related by an axiom, learning it for both.
    pub(super) fn pair_kind(&mut self, a: &Term, b: &Term) -> Translation<PropertyKind> {
        let known = [a, b].into_iter().find_map(|term| match term {
            Term::NamedNode(iri) => self.property_kind(iri),
            Term::BlankNode(_) => Some(PropertyKind::Object),
            _ => None,
        });
        let kind = match (known, a) {
            (Some(kind), _) => kind,
            (None, Term::NamedNode(iri)) => self.resolve_property(iri, None)?,
            (None, _) => return Err(invalid(a, "a property")),
        };
        for term in [a, b] {
            if let Term::NamedNode(iri) = term {
                self.learn(iri, kind.entity_kind());
            }
        }
        Ok(kind)
    }

    // Components

    /// Translates a nested node, refusing cyclic structures.
    pub(super) fn nested<T>(
        &mut self,
        node: NamedOrBlankNode,
        f: impl FnOnce(&mut Self, &NamedOrBlankNode) -> Translation<T>,
    ) -> Translation<T> {
        if !self.visiting.insert(node.clone()) {
            return Err(TranslationError::new(
                TranslationErrorKind::InvalidValue,
                "the construct contains itself",
            )
            .with_node(node)
            .into());
        }
        let result = f(self, &node);
        self.visiting.remove(&node);
        result
    }

    /// Dispatches a node to the first matcher of the family that recognizes it.
    ///
    /// Strict matches are tried first. In lax mode, a node no strict pattern accepts is
    /// given to the first lenient match, which is reported.
    pub(super) fn dispatch<M: Matcher>(&mut self, view: &NodeView) -> Translation<M::Output> {
        let strict = M::ALL
            .iter()
            .copied()
            .filter(|m| m.matches_strict(view))
            .collect::<Vec<_>>();
        let matcher = if let [matcher, ..] = strict.as_slice() {
            *matcher
        } else {
            let lax = M::ALL
                .iter()
                .copied()
                .filter(|m| m.matches_lax(view))
                .collect::<Vec<_>>();
            let Some(first) = lax.first().copied() else {
                return Err(TranslationError::new(
                    TranslationErrorKind::MissingRequiredTriple,
                    format!("{} lacks the triples of every {} pattern", view.node, M::FAMILY),
                )
                .with_node(view.node.clone())
                .with_triples(view.cloned_triples())
                .with_matchers(M::ALL.iter().map(|m| m.name()))
                .into());
            };
            let message = if lax.len() == 1 {
                format!(
                    "{} does not follow the RDF mapping of {}, reading it leniently",
                    view.node,
                    first.name()
                )
            } else {
                format!(
                    "{} matches several {} patterns, using {}",
                    view.node,
                    M::FAMILY,
                    first.name()
                )
            };
            self.recover(
                TranslationError::warning(TranslationErrorKind::StructuralAmbiguity, message)
                    .with_node(view.node.clone())
                    .with_triples(view.cloned_triples())
                    .with_matchers(lax.iter().map(|m| m.name())),
            )?;
            first
        };
        trace!(node = %view.node, matcher = matcher.name(), "node matched");
        let output = matcher.translate(self, view)?;
        for (id, _) in &view.triples {
            self.store.consume(*id);
        }
        Ok(output)
    }

    /// The single value of a predicate in a view.
    pub(super) fn value(&mut self, view: &NodeView, predicate: NamedNodeRef<'_>) -> Translation<Term> {
        let mut values = view.objects(predicate);
        let Some(first) = values.next() else {
            return Err(TranslationError::new(
                TranslationErrorKind::MissingRequiredTriple,
                format!("{} has no {predicate} value", view.node),
            )
            .with_node(view.node.clone())
            .into());
        };
        let first = first.clone();
        if values.next().is_some() {
            self.recover(
                TranslationError::warning(
                    TranslationErrorKind::MultipleValues,
                    format!("{} has several {predicate} values, using {first}", view.node),
                )
                .with_node(view.node.clone())
                .with_triples(
                    view.triples
                        .iter()
                        .filter(|(_, t)| t.predicate == predicate)
                        .map(|(_, t)| t.clone()),
                ),
            )?;
        }
        Ok(first)
    }

    /// The single value of a predicate on a node, consuming the triples that carry it.
    pub(super) fn single_object(
        &mut self,
        node: &NamedOrBlankNode,
        predicate: NamedNodeRef<'_>,
    ) -> Translation<Term> {
        let mut view = self.view(node);
        view.triples.retain(|(_, t)| t.predicate == predicate);
        let value = self.value(&view, predicate)?;
        for (id, _) in view.triples {
            self.store.consume(id);
        }
        Ok(value)
    }

    pub(super) fn class_expression(&mut self, term: &Term) -> Translation<ClassExpression> {
        match term {
            Term::NamedNode(iri) => {
                self.learn(iri, EntityKind::Class);
                Ok(ClassExpression::class(iri.clone()))
            }
            Term::BlankNode(node) => self.nested(node.clone().into(), |this, node| {
                let mut view = this.view(node);
                view.property_kind = this.restriction_kind(&view)?;
                this.dispatch::<ClassExpressionMatcher>(&view)
            }),
            _ => Err(invalid(term, "a class expression")),
        }
    }

    /// The kind of the property a restriction is on, inferred from its filler if needed.
    fn restriction_kind(&mut self, view: &NodeView) -> Translation<Option<PropertyKind>> {
        let Some(property) = view.first(owl::ON_PROPERTY) else {
            return Ok(None);
        };
        match property {
            Term::BlankNode(_) => Ok(Some(PropertyKind::Object)),
            Term::NamedNode(iri) => {
                if let Some(kind) = self.property_kind(iri) {
                    return Ok(Some(kind));
                }
                let iri = iri.clone();
                let hint = self.restriction_hint(view);
                self.resolve_property(&iri, hint).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn restriction_hint(&self, view: &NodeView) -> Option<PropertyKind> {
        if view.has(owl::HAS_SELF) || view.has(owl::ON_CLASS) {
            return Some(PropertyKind::Object);
        }
        if view.has(owl::ON_DATA_RANGE) {
            return Some(PropertyKind::Data);
        }
        if let Some(value) = view.first(owl::HAS_VALUE) {
            return Some(if matches!(value, Term::Literal(_)) {
                PropertyKind::Data
            } else {
                PropertyKind::Object
            });
        }
        [owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM]
            .into_iter()
            .filter_map(|predicate| view.first(predicate))
            .find_map(|filler| match self.shape(filler, 0) {
                Shape::Class => Some(PropertyKind::Object),
                Shape::DataRange => Some(PropertyKind::Data),
                Shape::Unknown => None,
            })
    }

    pub(super) fn data_range(&mut self, term: &Term) -> Translation<DataRange> {
        match term {
            Term::NamedNode(iri) => {
                self.learn(iri, EntityKind::Datatype);
                Ok(DataRange::datatype(iri.clone()))
            }
            Term::BlankNode(node) => self.nested(node.clone().into(), |this, node| {
                let view = this.view(node);
                this.dispatch::<DataRangeMatcher>(&view)
            }),
            _ => Err(invalid(term, "a data range")),
        }
    }

    pub(super) fn object_property_expression(
        &mut self,
        term: &Term,
    ) -> Translation<ObjectPropertyExpression> {
        match term {
            Term::NamedNode(iri) => {
                self.learn(iri, EntityKind::ObjectProperty);
                Ok(ObjectPropertyExpression::ObjectProperty(iri.clone().into()))
            }
            Term::BlankNode(node) => {
                let node = NamedOrBlankNode::from(node.clone());
                match self.single_object(&node, owl::INVERSE_OF)? {
                    Term::NamedNode(iri) => {
                        self.learn(&iri, EntityKind::ObjectProperty);
                        Ok(ObjectPropertyExpression::InverseObjectProperty(iri.into()))
                    }
                    other => Err(invalid(&other, "a named object property")),
                }
            }
            _ => Err(invalid(term, "an object property expression")),
        }
    }

    pub(super) fn data_property(&mut self, term: &Term) -> Translation<DataProperty> {
        match term {
            Term::NamedNode(iri) => {
                self.learn(iri, EntityKind::DataProperty);
                Ok(DataProperty::new(iri.clone()))
            }
            _ => Err(invalid(term, "a data property")),
        }
    }

    pub(super) fn named(&self, term: &Term, expected: &str) -> Translation<NamedNode> {
        match term {
            Term::NamedNode(iri) => Ok(iri.clone()),
            _ => Err(invalid(term, expected)),
        }
    }

    /// The label of an anonymous individual: the session and the first occurrence of the node.
    pub(super) fn anonymous(&mut self, node: &BlankNode) -> BlankNode {
        if let Some(label) = self.anonymous.get(node) {
            return label.clone();
        }
        let index = self.store.blank_index(node);
        let label = BlankNode::new_unchecked(format!("s{}n{index}", self.session));
        self.anonymous.insert(node.clone(), label.clone());
        label
    }

    pub(super) fn individual(&mut self, term: &Term) -> Translation<Individual> {
        match term {
            Term::NamedNode(iri) => Ok(Individual::Named(NamedIndividual::new(iri.clone()))),
            Term::BlankNode(node) => Ok(Individual::Anonymous(self.anonymous(node))),
            _ => Err(invalid(term, "an individual")),
        }
    }

    pub(super) fn literal(&self, term: &Term) -> Translation<Literal> {
        match term {
            Term::Literal(literal) => Ok(literal.clone()),
            _ => Err(invalid(term, "a literal")),
        }
    }

    pub(super) fn annotation_value(&mut self, term: &Term) -> Translation<AnnotationValue> {
        match term {
            Term::NamedNode(iri) => Ok(AnnotationValue::Iri(iri.clone())),
            Term::Literal(literal) => Ok(AnnotationValue::Literal(literal.clone())),
            Term::BlankNode(node) => Ok(AnnotationValue::Anonymous(self.anonymous(node))),
            #[cfg(feature = "rdf-12")]
            Term::Triple(_) => Err(invalid(term, "an annotation value")),
        }
    }

    /// A cardinality: a literal holding a non-negative integer.
    pub(super) fn cardinality(&mut self, term: &Term) -> Translation<u32> {
        let literal = self.literal(term)?;
        let value = literal.value().trim();
        let cardinality = value.parse::<u32>().map_err(|e| {
            let message = if *e.kind() == IntErrorKind::PosOverflow {
                format!("the cardinality {literal} is larger than {}", u32::MAX)
            } else {
                format!("the cardinality {literal} is not a non-negative integer")
            };
            TranslationError::new(TranslationErrorKind::NumericFormat, message)
                .with_node(literal.clone())
        })?;
        let datatype = literal.datatype();
        if datatype != vocab::CARDINALITY_DATATYPE && datatype != xsd::INTEGER {
            self.recover(TranslationError::warning(
                TranslationErrorKind::InvalidValue,
                format!("the cardinality {literal} should be an xsd:nonNegativeInteger"),
            ))?;
        }
        Ok(cardinality)
    }

    pub(super) fn i_argument(&mut self, term: &Term) -> Translation<IArgument> {
        match term {
            Term::NamedNode(iri) if self.variables.contains(iri) => {
                Ok(IArgument::Variable(Variable(iri.clone())))
            }
            _ => Ok(IArgument::Individual(self.individual(term)?)),
        }
    }

    pub(super) fn d_argument(&mut self, term: &Term) -> Translation<DArgument> {
        match term {
            Term::NamedNode(iri) if self.variables.contains(iri) => {
                Ok(DArgument::Variable(Variable(iri.clone())))
            }
            _ => Ok(DArgument::Literal(self.literal(term)?)),
        }
    }

    pub(super) fn atom_property_kind(&mut self, view: &NodeView) -> Translation<Option<PropertyKind>> {
        let Some(Term::NamedNode(iri)) = view.first(swrl::PROPERTY_PREDICATE) else {
            return Ok(None);
        };
        let iri = iri.clone();
        let hint = view.types().find_map(|t| {
            if *t == swrl::INDIVIDUAL_PROPERTY_ATOM {
                Some(PropertyKind::Object)
            } else if *t == swrl::DATAVALUED_PROPERTY_ATOM {
                Some(PropertyKind::Data)
            } else {
                None
            }
        });
        let hint = hint.or_else(|| match view.first(swrl::ARGUMENT_2) {
            Some(Term::Literal(_)) => Some(PropertyKind::Data),
            _ => None,
        });
        self.resolve_property(&iri, hint).map(Some)
    }

    pub(super) fn atom(&mut self, term: &Term) -> Translation<crate::swrl::Atom> {
        let Some(node) = resource(term) else {
            return Err(invalid(term, "a SWRL atom"));
        };
        self.nested(node, |this, node| {
            let mut view = this.view(node);
            view.property_kind = this.atom_property_kind(&view)?;
            this.dispatch::<SwrlAtomMatcher>(&view)
        })
    }
}

fn declared_kind(class: NamedNodeRef<'_>) -> Option<EntityKind> {
    if class == owl::CLASS {
        Some(EntityKind::Class)
    } else if class == owl::OBJECT_PROPERTY {
        Some(EntityKind::ObjectProperty)
    } else if class == owl::DATATYPE_PROPERTY {
        Some(EntityKind::DataProperty)
    } else if class == owl::ANNOTATION_PROPERTY {
        Some(EntityKind::AnnotationProperty)
    } else if class == rdfs::DATATYPE {
        Some(EntityKind::Datatype)
    } else if class == owl::NAMED_INDIVIDUAL {
        Some(EntityKind::NamedIndividual)
    } else {
        None
    }
}

fn is_builtin(kind: EntityKind, iri: NamedNodeRef<'_>) -> bool {
    match kind {
        EntityKind::Class => vocab::is_builtin_class(iri),
        EntityKind::ObjectProperty => vocab::is_builtin_object_property(iri),
        EntityKind::DataProperty => vocab::is_builtin_data_property(iri),
        EntityKind::AnnotationProperty => vocab::is_builtin_annotation_property(iri),
        EntityKind::Datatype => vocab::is_builtin_datatype(iri),
        EntityKind::NamedIndividual => false,
    }
}

pub(super) fn resource(term: &Term) -> Option<NamedOrBlankNode> {
    match term {
        Term::NamedNode(iri) => Some(iri.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        _ => None,
    }
}

pub(super) fn invalid(term: &Term, expected: &str) -> Halt {
    TranslationError::new(
        TranslationErrorKind::InvalidValue,
        format!("expected {expected}, found {term}"),
    )
    .with_node(term.clone())
    .into()
}
