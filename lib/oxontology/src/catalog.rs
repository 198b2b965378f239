//! Published ontologies and `owl:imports` resolution.

use crate::error::ImportsError;
use crate::ontology::Ontology;
use crate::parser::{MissingImportHandling, ParserConfig};
use oxrdf::NamedNode;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// A set of published ontologies, looked up by ontology IRI, version IRI or document IRI.
///
/// Published ontologies are immutable and shared: the catalog hands out [`Arc`]s that stay
/// valid whatever happens to the catalog afterwards.
///
/// ```
/// use oxontology::{Ontology, OntologyCatalog, OntologyId};
/// use oxrdf::NamedNode;
///
/// let base = NamedNode::new("http://example.com/base")?;
/// let mut main = Ontology::new(OntologyId::named(NamedNode::new("http://example.com/main")?));
/// main.add_import(base.clone());
///
/// let mut catalog = OntologyCatalog::new();
/// catalog.insert(Ontology::new(OntologyId::named(base)));
/// let main = catalog.insert(main);
/// assert_eq!(catalog.imports_closure(&main)?.len(), 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OntologyCatalog {
    ontologies: Vec<Arc<Ontology>>,
    by_iri: FxHashMap<NamedNode, usize>,
    by_version: FxHashMap<NamedNode, usize>,
    by_document: FxHashMap<NamedNode, usize>,
    missing_import_handling: MissingImportHandling,
}

impl OntologyCatalog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog resolving imports the way the parser configuration asks for.
    pub fn with_config(config: &ParserConfig) -> Self {
        Self::new().with_missing_import_handling(config.missing_import_handling())
    }

    #[inline]
    #[must_use]
    pub fn with_missing_import_handling(mut self, handling: MissingImportHandling) -> Self {
        self.missing_import_handling = handling;
        self
    }

    /// Publishes an ontology.
    ///
    /// An ontology published earlier under one of the same IRIs stops being reachable through
    /// that IRI.
    pub fn insert(&mut self, ontology: impl Into<Arc<Ontology>>) -> Arc<Ontology> {
        let ontology = ontology.into();
        let position = self.ontologies.len();
        if let Some(iri) = ontology.id().ontology_iri() {
            self.by_iri.insert(iri.clone(), position);
        }
        if let Some(iri) = ontology.id().version_iri() {
            self.by_version.insert(iri.clone(), position);
        }
        if let Some(iri) = ontology.document_iri() {
            self.by_document.insert(iri.clone(), position);
        }
        debug!(id = ?ontology.id(), "ontology published");
        self.ontologies.push(Arc::clone(&ontology));
        ontology
    }

    /// The ontology an IRI designates: first as a version IRI, then as an ontology IRI, then
    /// as the IRI it was loaded from.
    pub fn get(&self, iri: &NamedNode) -> Option<&Arc<Ontology>> {
        self.by_version
            .get(iri)
            .or_else(|| self.by_iri.get(iri))
            .or_else(|| self.by_document.get(iri))
            .and_then(|position| self.ontologies.get(*position))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ontologies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ontologies.is_empty()
    }

    /// Every published ontology, in publication order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ontology>> {
        self.ontologies.iter()
    }

    /// The root ontology followed by everything it imports, directly or not.
    ///
    /// The walk is breadth-first and each ontology appears once, even when imports form a
    /// cycle.
    pub fn imports_closure(&self, root: &Arc<Ontology>) -> Result<Vec<Arc<Ontology>>, ImportsError> {
        let mut closure = vec![Arc::clone(root)];
        let mut seen = FxHashSet::default();
        seen.insert(Arc::as_ptr(root));
        let mut queue = VecDeque::from([Arc::clone(root)]);
        while let Some(ontology) = queue.pop_front() {
            for import in ontology.imports() {
                let Some(imported) = self.get(import) else {
                    match self.missing_import_handling {
                        MissingImportHandling::Silent => {
                            warn!(import = %import, "imported ontology not found, skipping it");
                            continue;
                        }
                        MissingImportHandling::Fail => {
                            return Err(ImportsError::MissingImport {
                                iri: import.clone(),
                            });
                        }
                    }
                };
                if seen.insert(Arc::as_ptr(imported)) {
                    closure.push(Arc::clone(imported));
                    queue.push_back(Arc::clone(imported));
                }
            }
        }
        debug!(size = closure.len(), "imports closure computed");
        Ok(closure)
    }

    /// The imports closure of the ontology an IRI designates.
    pub fn imports_closure_of(&self, iri: &NamedNode) -> Result<Vec<Arc<Ontology>>, ImportsError> {
        let root = self
            .get(iri)
            .ok_or_else(|| ImportsError::UnknownOntology { iri: iri.clone() })?;
        self.imports_closure(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::OntologyId;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn ontology(name: &str, imports: &[&str]) -> Ontology {
        let mut ontology = Ontology::new(OntologyId::named(iri(name)));
        for import in imports {
            ontology.add_import(iri(import));
        }
        ontology
    }

    fn names(closure: &[Arc<Ontology>]) -> Vec<&str> {
        closure
            .iter()
            .filter_map(|o| o.id().ontology_iri())
            .map(|iri| iri.as_str().trim_start_matches("http://example.org/"))
            .collect()
    }

    #[test]
    fn test_closure_is_breadth_first_and_deduplicated() -> Result<(), ImportsError> {
        let mut catalog = OntologyCatalog::new();
        catalog.insert(ontology("b", &["d"]));
        catalog.insert(ontology("c", &["d", "a"]));
        catalog.insert(ontology("d", &[]));
        let root = catalog.insert(ontology("a", &["b", "c"]));
        assert_eq!(names(&catalog.imports_closure(&root)?), ["a", "b", "c", "d"]);
        Ok(())
    }

    #[test]
    fn test_missing_import_handling() {
        let mut catalog = OntologyCatalog::new();
        let root = catalog.insert(ontology("a", &["missing"]));
        assert_eq!(catalog.imports_closure(&root).map(|c| c.len()), Ok(1));

        let catalog = catalog.with_missing_import_handling(MissingImportHandling::Fail);
        assert_eq!(
            catalog.imports_closure(&root).map(|c| c.len()),
            Err(ImportsError::MissingImport {
                iri: iri("missing")
            })
        );
    }

    #[test]
    fn test_lookup_by_version_and_document() {
        let mut versioned = Ontology::new(OntologyId::named(iri("o")).with_version(iri("o/2")));
        versioned.set_document_iri(iri("o.ttl"));
        let mut catalog = OntologyCatalog::new();
        let published = catalog.insert(versioned);
        for key in ["o", "o/2", "o.ttl"] {
            assert!(catalog.get(&iri(key)).is_some_and(|o| Arc::ptr_eq(o, &published)));
        }
        assert_eq!(
            catalog.imports_closure_of(&iri("other")).map(|c| c.len()),
            Err(ImportsError::UnknownOntology { iri: iri("other") })
        );
    }
}
