//! Pattern matchers: one per construct of the OWL 2 RDF mapping.
//!
//! Each matcher family is a closed enum whose `ALL` array is its registration order. The
//! consumer tries the strict pattern of every matcher first and only falls back to the
//! lenient ones when none matches, the first lenient match winning.

use super::consumer::{Consumer, NodeView, PropertyKind, Translation, invalid, resource};
use crate::error::{TranslationError, TranslationErrorKind};
use crate::expression::{
    ClassExpression, DataRange, FacetRestriction, ObjectPropertyExpression,
};
use crate::entity::{DataProperty, Datatype};
use crate::swrl::Atom;
use crate::vocab::{self, owl, swrl};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNodeRef, Term};

/// The triples a construct is made of.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pattern {
    pub name: &'static str,
    /// Accepted values of the single `rdf:type` triple.
    pub types: &'static [NamedNodeRef<'static>],
    /// Sets of predicates, any of which makes the construct.
    pub alternatives: Alternatives,
    /// Kind of the restricted property, if the construct restricts one.
    pub kind: Option<PropertyKind>,
}

impl Pattern {
    const fn new(
        name: &'static str,
        types: &'static [NamedNodeRef<'static>],
        alternatives: Alternatives,
        kind: Option<PropertyKind>,
    ) -> Self {
        Self {
            name,
            types,
            alternatives,
            kind,
        }
    }

    /// One accepted `rdf:type`, every predicate of an alternative exactly once and nothing else.
    fn matches_strict(&self, view: &NodeView) -> bool {
        let mut types = view.types();
        let typed = matches!(
            (types.next(), types.next()),
            (Some(t), None) if self.types.iter().any(|expected| t == expected)
        );
        typed
            && view.count(rdf::TYPE) == 1
            && self.kind_matches(view)
            && self.alternatives.iter().any(|alternative| {
                alternative.iter().all(|p| view.count(*p) == 1)
                    && view.triples.iter().all(|(_, t)| {
                        t.predicate == rdf::TYPE || alternative.iter().any(|p| t.predicate == *p)
                    })
            })
    }

    /// Every predicate of an alternative present, whatever the typing and the extra triples.
    fn matches_lax(&self, view: &NodeView) -> bool {
        self.kind_matches(view)
            && self
                .alternatives
                .iter()
                .any(|alternative| alternative.iter().all(|p| view.has(*p)))
    }

    fn kind_matches(&self, view: &NodeView) -> bool {
        self.kind.is_none() || self.kind == view.property_kind
    }
}

/// A family of matchers producing values of the same type.
pub(crate) trait Matcher: Copy + 'static {
    type Output;

    /// Human-readable name of the family.
    const FAMILY: &'static str;

    /// Every matcher of the family, in tie-break order.
    const ALL: &'static [Self];

    fn pattern(self) -> Pattern;

    /// Builds the value from a matched node. Consuming the node triples is left to the caller.
    fn translate(self, consumer: &mut Consumer<'_>, view: &NodeView) -> Translation<Self::Output>;

    fn name(self) -> &'static str {
        self.pattern().name
    }

    fn matches_strict(self, view: &NodeView) -> bool {
        self.pattern().matches_strict(view)
    }

    fn matches_lax(self, view: &NodeView) -> bool {
        self.pattern().matches_lax(view)
    }
}

const RESTRICTION: &[NamedNodeRef<'static>] = &[owl::RESTRICTION];
const CLASS: &[NamedNodeRef<'static>] = &[owl::CLASS];
const DATATYPE: &[NamedNodeRef<'static>] = &[rdfs::DATATYPE];

type Alternatives = &'static [&'static [NamedNodeRef<'static>]];

const INTERSECTION_OF: Alternatives = &[&[owl::INTERSECTION_OF]];
const UNION_OF: Alternatives = &[&[owl::UNION_OF]];
const DATATYPE_COMPLEMENT_OF: Alternatives = &[&[owl::DATATYPE_COMPLEMENT_OF]];
const ONE_OF: Alternatives = &[&[owl::ONE_OF]];
const ON_DATATYPE: Alternatives = &[&[owl::ON_DATATYPE, owl::WITH_RESTRICTIONS]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassExpressionMatcher {
    ObjectIntersectionOf,
    ObjectUnionOf,
    ObjectComplementOf,
    ObjectOneOf,
    ObjectSomeValuesFrom,
    ObjectAllValuesFrom,
    ObjectHasValue,
    ObjectHasSelf,
    ObjectMinCardinality,
    ObjectMaxCardinality,
    ObjectExactCardinality,
    DataSomeValuesFrom,
    DataAllValuesFrom,
    DataHasValue,
    DataMinCardinality,
    DataMaxCardinality,
    DataExactCardinality,
}

impl Matcher for ClassExpressionMatcher {
    type Output = ClassExpression;

    const FAMILY: &'static str = "class expression";

    const ALL: &'static [Self] = &[
        Self::ObjectIntersectionOf,
        Self::ObjectUnionOf,
        Self::ObjectComplementOf,
        Self::ObjectOneOf,
        Self::ObjectSomeValuesFrom,
        Self::ObjectAllValuesFrom,
        Self::ObjectHasValue,
        Self::ObjectHasSelf,
        Self::ObjectMinCardinality,
        Self::ObjectMaxCardinality,
        Self::ObjectExactCardinality,
        Self::DataSomeValuesFrom,
        Self::DataAllValuesFrom,
        Self::DataHasValue,
        Self::DataMinCardinality,
        Self::DataMaxCardinality,
        Self::DataExactCardinality,
    ];

    fn pattern(self) -> Pattern {
        use PropertyKind::{Data, Object};
        match self {
            Self::ObjectIntersectionOf => Pattern::new(
                "ObjectIntersectionOf",
                CLASS,
                &[&[owl::INTERSECTION_OF]],
                None,
            ),
            Self::ObjectUnionOf => Pattern::new("ObjectUnionOf", CLASS, &[&[owl::UNION_OF]], None),
            Self::ObjectComplementOf => Pattern::new(
                "ObjectComplementOf",
                CLASS,
                &[&[owl::COMPLEMENT_OF]],
                None,
            ),
            Self::ObjectOneOf => Pattern::new("ObjectOneOf", CLASS, &[&[owl::ONE_OF]], None),
            Self::ObjectSomeValuesFrom => Pattern::new(
                "ObjectSomeValuesFrom",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::SOME_VALUES_FROM]],
                Some(Object),
            ),
            Self::ObjectAllValuesFrom => Pattern::new(
                "ObjectAllValuesFrom",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::ALL_VALUES_FROM]],
                Some(Object),
            ),
            Self::ObjectHasValue => Pattern::new(
                "ObjectHasValue",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::HAS_VALUE]],
                Some(Object),
            ),
            Self::ObjectHasSelf => Pattern::new(
                "ObjectHasSelf",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::HAS_SELF]],
                Some(Object),
            ),
            Self::ObjectMinCardinality => Pattern::new(
                "ObjectMinCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::MIN_CARDINALITY],
                    &[owl::ON_PROPERTY, owl::MIN_QUALIFIED_CARDINALITY, owl::ON_CLASS],
                ],
                Some(Object),
            ),
            Self::ObjectMaxCardinality => Pattern::new(
                "ObjectMaxCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::MAX_CARDINALITY],
                    &[owl::ON_PROPERTY, owl::MAX_QUALIFIED_CARDINALITY, owl::ON_CLASS],
                ],
                Some(Object),
            ),
            Self::ObjectExactCardinality => Pattern::new(
                "ObjectExactCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::CARDINALITY],
                    &[owl::ON_PROPERTY, owl::QUALIFIED_CARDINALITY, owl::ON_CLASS],
                ],
                Some(Object),
            ),
            Self::DataSomeValuesFrom => Pattern::new(
                "DataSomeValuesFrom",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::SOME_VALUES_FROM]],
                Some(Data),
            ),
            Self::DataAllValuesFrom => Pattern::new(
                "DataAllValuesFrom",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::ALL_VALUES_FROM]],
                Some(Data),
            ),
            Self::DataHasValue => Pattern::new(
                "DataHasValue",
                RESTRICTION,
                &[&[owl::ON_PROPERTY, owl::HAS_VALUE]],
                Some(Data),
            ),
            Self::DataMinCardinality => Pattern::new(
                "DataMinCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::MIN_CARDINALITY],
                    &[owl::ON_PROPERTY, owl::MIN_QUALIFIED_CARDINALITY, owl::ON_DATA_RANGE],
                ],
                Some(Data),
            ),
            Self::DataMaxCardinality => Pattern::new(
                "DataMaxCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::MAX_CARDINALITY],
                    &[owl::ON_PROPERTY, owl::MAX_QUALIFIED_CARDINALITY, owl::ON_DATA_RANGE],
                ],
                Some(Data),
            ),
            Self::DataExactCardinality => Pattern::new(
                "DataExactCardinality",
                RESTRICTION,
                &[
                    &[owl::ON_PROPERTY, owl::CARDINALITY],
                    &[owl::ON_PROPERTY, owl::QUALIFIED_CARDINALITY, owl::ON_DATA_RANGE],
                ],
                Some(Data),
            ),
        }
    }

    fn translate(self, c: &mut Consumer<'_>, view: &NodeView) -> Translation<ClassExpression> {
        Ok(match self {
            Self::ObjectIntersectionOf => {
                let list = c.value(view, owl::INTERSECTION_OF)?;
                ClassExpression::ObjectIntersectionOf(c.class_list(&list)?)
            }
            Self::ObjectUnionOf => {
                let list = c.value(view, owl::UNION_OF)?;
                ClassExpression::ObjectUnionOf(c.class_list(&list)?)
            }
            Self::ObjectComplementOf => {
                let operand = c.value(view, owl::COMPLEMENT_OF)?;
                ClassExpression::ObjectComplementOf(Box::new(c.class_expression(&operand)?))
            }
            Self::ObjectOneOf => {
                let list = c.value(view, owl::ONE_OF)?;
                ClassExpression::ObjectOneOf(c.individual_list(&list)?)
            }
            Self::ObjectSomeValuesFrom => {
                let (property, filler) = object_filler(c, view, owl::SOME_VALUES_FROM)?;
                ClassExpression::ObjectSomeValuesFrom { property, filler }
            }
            Self::ObjectAllValuesFrom => {
                let (property, filler) = object_filler(c, view, owl::ALL_VALUES_FROM)?;
                ClassExpression::ObjectAllValuesFrom { property, filler }
            }
            Self::ObjectHasValue => {
                let property = object_property(c, view)?;
                let value = c.value(view, owl::HAS_VALUE)?;
                ClassExpression::ObjectHasValue {
                    property,
                    individual: c.individual(&value)?,
                }
            }
            Self::ObjectHasSelf => {
                let property = object_property(c, view)?;
                let value = c.value(view, owl::HAS_SELF)?;
                let literal = c.literal(&value)?;
                if !matches!(literal.value(), "true" | "1") {
                    return Err(TranslationError::new(
                        TranslationErrorKind::InvalidValue,
                        format!("owl:hasSelf must be true, found {literal}"),
                    )
                    .with_node(view.node.clone())
                    .into());
                }
                ClassExpression::ObjectHasSelf(property)
            }
            Self::ObjectMinCardinality => {
                let (cardinality, property, filler) = object_cardinality(
                    c,
                    view,
                    owl::MIN_CARDINALITY,
                    owl::MIN_QUALIFIED_CARDINALITY,
                )?;
                ClassExpression::ObjectMinCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
            Self::ObjectMaxCardinality => {
                let (cardinality, property, filler) = object_cardinality(
                    c,
                    view,
                    owl::MAX_CARDINALITY,
                    owl::MAX_QUALIFIED_CARDINALITY,
                )?;
                ClassExpression::ObjectMaxCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
            Self::ObjectExactCardinality => {
                let (cardinality, property, filler) =
                    object_cardinality(c, view, owl::CARDINALITY, owl::QUALIFIED_CARDINALITY)?;
                ClassExpression::ObjectExactCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
            Self::DataSomeValuesFrom => {
                let (property, filler) = data_filler(c, view, owl::SOME_VALUES_FROM)?;
                ClassExpression::DataSomeValuesFrom { property, filler }
            }
            Self::DataAllValuesFrom => {
                let (property, filler) = data_filler(c, view, owl::ALL_VALUES_FROM)?;
                ClassExpression::DataAllValuesFrom { property, filler }
            }
            Self::DataHasValue => {
                let property = data_property(c, view)?;
                let value = c.value(view, owl::HAS_VALUE)?;
                ClassExpression::DataHasValue {
                    property,
                    value: c.literal(&value)?,
                }
            }
            Self::DataMinCardinality => {
                let (cardinality, property, filler) = data_cardinality(
                    c,
                    view,
                    owl::MIN_CARDINALITY,
                    owl::MIN_QUALIFIED_CARDINALITY,
                )?;
                ClassExpression::DataMinCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
            Self::DataMaxCardinality => {
                let (cardinality, property, filler) = data_cardinality(
                    c,
                    view,
                    owl::MAX_CARDINALITY,
                    owl::MAX_QUALIFIED_CARDINALITY,
                )?;
                ClassExpression::DataMaxCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
            Self::DataExactCardinality => {
                let (cardinality, property, filler) =
                    data_cardinality(c, view, owl::CARDINALITY, owl::QUALIFIED_CARDINALITY)?;
                ClassExpression::DataExactCardinality {
                    cardinality,
                    property,
                    filler,
                }
            }
        })
    }
}

fn object_property(c: &mut Consumer<'_>, view: &NodeView) -> Translation<ObjectPropertyExpression> {
    let property = c.value(view, owl::ON_PROPERTY)?;
    c.object_property_expression(&property)
}

fn data_property(c: &mut Consumer<'_>, view: &NodeView) -> Translation<DataProperty> {
    let property = c.value(view, owl::ON_PROPERTY)?;
    c.data_property(&property)
}

fn object_filler(
    c: &mut Consumer<'_>,
    view: &NodeView,
    predicate: NamedNodeRef<'static>,
) -> Translation<(ObjectPropertyExpression, Box<ClassExpression>)> {
    let property = object_property(c, view)?;
    let filler = c.value(view, predicate)?;
    Ok((property, Box::new(c.class_expression(&filler)?)))
}

fn data_filler(
    c: &mut Consumer<'_>,
    view: &NodeView,
    predicate: NamedNodeRef<'static>,
) -> Translation<(DataProperty, DataRange)> {
    let property = data_property(c, view)?;
    let filler = c.value(view, predicate)?;
    Ok((property, c.data_range(&filler)?))
}

/// The cardinality and the property, with the `owl:onClass` filler of the qualified form.
fn object_cardinality(
    c: &mut Consumer<'_>,
    view: &NodeView,
    unqualified: NamedNodeRef<'static>,
    qualified: NamedNodeRef<'static>,
) -> Translation<(u32, ObjectPropertyExpression, Option<Box<ClassExpression>>)> {
    let property = object_property(c, view)?;
    if view.has(qualified) {
        let cardinality = c.value(view, qualified)?;
        let cardinality = c.cardinality(&cardinality)?;
        let filler = c.value(view, owl::ON_CLASS)?;
        Ok((
            cardinality,
            property,
            Some(Box::new(c.class_expression(&filler)?)),
        ))
    } else {
        let cardinality = c.value(view, unqualified)?;
        Ok((c.cardinality(&cardinality)?, property, None))
    }
}

fn data_cardinality(
    c: &mut Consumer<'_>,
    view: &NodeView,
    unqualified: NamedNodeRef<'static>,
    qualified: NamedNodeRef<'static>,
) -> Translation<(u32, DataProperty, Option<DataRange>)> {
    let property = data_property(c, view)?;
    if view.has(qualified) {
        let cardinality = c.value(view, qualified)?;
        let cardinality = c.cardinality(&cardinality)?;
        let filler = c.value(view, owl::ON_DATA_RANGE)?;
        Ok((cardinality, property, Some(c.data_range(&filler)?)))
    } else {
        let cardinality = c.value(view, unqualified)?;
        Ok((c.cardinality(&cardinality)?, property, None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataRangeMatcher {
    DataIntersectionOf,
    DataUnionOf,
    DataComplementOf,
    DataOneOf,
    DatatypeRestriction,
}

impl Matcher for DataRangeMatcher {
    type Output = DataRange;

    const FAMILY: &'static str = "data range";

    const ALL: &'static [Self] = &[
        Self::DataIntersectionOf,
        Self::DataUnionOf,
        Self::DataComplementOf,
        Self::DataOneOf,
        Self::DatatypeRestriction,
    ];

    fn pattern(self) -> Pattern {
        let (name, alternatives): (_, Alternatives) = match self {
            Self::DataIntersectionOf => ("DataIntersectionOf", INTERSECTION_OF),
            Self::DataUnionOf => ("DataUnionOf", UNION_OF),
            Self::DataComplementOf => ("DataComplementOf", DATATYPE_COMPLEMENT_OF),
            Self::DataOneOf => ("DataOneOf", ONE_OF),
            Self::DatatypeRestriction => ("DatatypeRestriction", ON_DATATYPE),
        };
        Pattern::new(name, DATATYPE, alternatives, None)
    }

    fn translate(self, c: &mut Consumer<'_>, view: &NodeView) -> Translation<DataRange> {
        Ok(match self {
            Self::DataIntersectionOf => {
                let list = c.value(view, owl::INTERSECTION_OF)?;
                DataRange::DataIntersectionOf(c.data_range_list(&list)?)
            }
            Self::DataUnionOf => {
                let list = c.value(view, owl::UNION_OF)?;
                DataRange::DataUnionOf(c.data_range_list(&list)?)
            }
            Self::DataComplementOf => {
                let operand = c.value(view, owl::DATATYPE_COMPLEMENT_OF)?;
                DataRange::DataComplementOf(Box::new(c.data_range(&operand)?))
            }
            Self::DataOneOf => {
                let list = c.value(view, owl::ONE_OF)?;
                DataRange::DataOneOf(c.literal_list(&list)?)
            }
            Self::DatatypeRestriction => {
                let datatype = c.value(view, owl::ON_DATATYPE)?;
                let datatype = Datatype::new(c.named(&datatype, "a datatype")?);
                let list = c.value(view, owl::WITH_RESTRICTIONS)?;
                let restrictions = c
                    .read_list(&list)?
                    .iter()
                    .map(|element| facet_restriction(c, element))
                    .collect::<Translation<_>>()?;
                DataRange::DatatypeRestriction {
                    datatype,
                    restrictions,
                }
            }
        })
    }
}

/// A `[ xsd:minInclusive 18 ]` list element.
fn facet_restriction(c: &mut Consumer<'_>, element: &Term) -> Translation<FacetRestriction> {
    let Some(node) = resource(element) else {
        return Err(invalid(element, "a facet restriction"));
    };
    let view = c.view(&node);
    let mut facets = view
        .triples
        .iter()
        .filter(|(_, t)| vocab::is_facet(t.predicate.as_ref()));
    let (Some((id, facet)), None) = (facets.next(), facets.next()) else {
        return Err(TranslationError::new(
            TranslationErrorKind::MissingRequiredTriple,
            format!("{node} should restrict exactly one facet"),
        )
        .with_node(node)
        .into());
    };
    let restriction = FacetRestriction {
        facet: facet.predicate.clone(),
        value: c.literal(&facet.object)?,
    };
    c.store.consume(*id);
    Ok(restriction)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwrlAtomMatcher {
    Class,
    DataRange,
    IndividualProperty,
    DatavaluedProperty,
    SameIndividual,
    DifferentIndividuals,
    BuiltIn,
}

impl Matcher for SwrlAtomMatcher {
    type Output = Atom;

    const FAMILY: &'static str = "SWRL atom";

    const ALL: &'static [Self] = &[
        Self::Class,
        Self::DataRange,
        Self::IndividualProperty,
        Self::DatavaluedProperty,
        Self::SameIndividual,
        Self::DifferentIndividuals,
        Self::BuiltIn,
    ];

    fn pattern(self) -> Pattern {
        use PropertyKind::{Data, Object};
        match self {
            Self::Class => Pattern::new(
                "ClassAtom",
                &[swrl::CLASS_ATOM],
                &[&[swrl::CLASS_PREDICATE, swrl::ARGUMENT_1]],
                None,
            ),
            Self::DataRange => Pattern::new(
                "DataRangeAtom",
                &[swrl::DATA_RANGE_ATOM],
                &[&[swrl::DATA_RANGE, swrl::ARGUMENT_1]],
                None,
            ),
            Self::IndividualProperty => Pattern::new(
                "IndividualPropertyAtom",
                &[swrl::INDIVIDUAL_PROPERTY_ATOM],
                &[&[swrl::PROPERTY_PREDICATE, swrl::ARGUMENT_1, swrl::ARGUMENT_2]],
                Some(Object),
            ),
            Self::DatavaluedProperty => Pattern::new(
                "DatavaluedPropertyAtom",
                &[swrl::DATAVALUED_PROPERTY_ATOM],
                &[&[swrl::PROPERTY_PREDICATE, swrl::ARGUMENT_1, swrl::ARGUMENT_2]],
                Some(Data),
            ),
            Self::SameIndividual => Pattern::new(
                "SameIndividualAtom",
                &[swrl::SAME_INDIVIDUAL_ATOM],
                &[&[swrl::ARGUMENT_1, swrl::ARGUMENT_2]],
                None,
            ),
            Self::DifferentIndividuals => Pattern::new(
                "DifferentIndividualsAtom",
                &[swrl::DIFFERENT_INDIVIDUALS_ATOM],
                &[&[swrl::ARGUMENT_1, swrl::ARGUMENT_2]],
                None,
            ),
            Self::BuiltIn => Pattern::new(
                "BuiltinAtom",
                &[swrl::BUILTIN_ATOM],
                &[&[swrl::BUILTIN, swrl::ARGUMENTS]],
                None,
            ),
        }
    }

    fn translate(self, c: &mut Consumer<'_>, view: &NodeView) -> Translation<Atom> {
        Ok(match self {
            Self::Class => {
                let class = c.value(view, swrl::CLASS_PREDICATE)?;
                let argument = c.value(view, swrl::ARGUMENT_1)?;
                Atom::Class {
                    class: c.class_expression(&class)?,
                    argument: c.i_argument(&argument)?,
                }
            }
            Self::DataRange => {
                let range = c.value(view, swrl::DATA_RANGE)?;
                let argument = c.value(view, swrl::ARGUMENT_1)?;
                Atom::DataRange {
                    range: c.data_range(&range)?,
                    argument: c.d_argument(&argument)?,
                }
            }
            Self::IndividualProperty => {
                let property = c.value(view, swrl::PROPERTY_PREDICATE)?;
                let (subject, object) = arguments(c, view)?;
                Atom::ObjectProperty {
                    property: c.object_property_expression(&property)?,
                    subject: c.i_argument(&subject)?,
                    object: c.i_argument(&object)?,
                }
            }
            Self::DatavaluedProperty => {
                let property = c.value(view, swrl::PROPERTY_PREDICATE)?;
                let (subject, object) = arguments(c, view)?;
                Atom::DataProperty {
                    property: c.data_property(&property)?,
                    subject: c.i_argument(&subject)?,
                    object: c.d_argument(&object)?,
                }
            }
            Self::SameIndividual => {
                let (a, b) = arguments(c, view)?;
                Atom::SameIndividual(c.i_argument(&a)?, c.i_argument(&b)?)
            }
            Self::DifferentIndividuals => {
                let (a, b) = arguments(c, view)?;
                Atom::DifferentIndividuals(c.i_argument(&a)?, c.i_argument(&b)?)
            }
            Self::BuiltIn => {
                let predicate = c.value(view, swrl::BUILTIN)?;
                let list = c.value(view, swrl::ARGUMENTS)?;
                Atom::BuiltIn {
                    predicate: c.named(&predicate, "a built-in")?,
                    arguments: c
                        .read_list(&list)?
                        .iter()
                        .map(|argument| c.d_argument(argument))
                        .collect::<Translation<_>>()?,
                }
            }
        })
    }
}

fn arguments(c: &mut Consumer<'_>, view: &NodeView) -> Translation<(Term, Term)> {
    Ok((
        c.value(view, swrl::ARGUMENT_1)?,
        c.value(view, swrl::ARGUMENT_2)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::store::TripleStore;
    use oxrdf::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Triple};

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn view(kind: Option<PropertyKind>, triples: &[(NamedNodeRef<'static>, Term)]) -> NodeView {
        let node = NamedOrBlankNode::from(BlankNode::new_unchecked("r"));
        let mut store = TripleStore::default();
        let triples = triples
            .iter()
            .filter_map(|(p, o)| {
                let triple = Triple::new(node.clone(), *p, o.clone());
                Some((store.insert(triple.clone())?, triple))
            })
            .collect();
        NodeView {
            node,
            triples,
            property_kind: kind,
        }
    }

    fn strict<M: Matcher>(view: &NodeView) -> Vec<&'static str> {
        M::ALL
            .iter()
            .filter(|m| m.matches_strict(view))
            .map(|m| m.name())
            .collect()
    }

    fn lax<M: Matcher>(view: &NodeView) -> Vec<&'static str> {
        M::ALL
            .iter()
            .filter(|m| m.matches_lax(view))
            .map(|m| m.name())
            .collect()
    }

    #[test]
    fn test_conformant_restriction_matches_one_pattern() {
        let view = view(
            Some(PropertyKind::Object),
            &[
                (rdf::TYPE, owl::RESTRICTION.into_owned().into()),
                (owl::ON_PROPERTY, iri("p").into()),
                (owl::SOME_VALUES_FROM, iri("C").into()),
            ],
        );
        assert_eq!(
            strict::<ClassExpressionMatcher>(&view),
            ["ObjectSomeValuesFrom"]
        );
    }

    #[test]
    fn test_extra_triple_breaks_strict_match_only() {
        let view = view(
            Some(PropertyKind::Object),
            &[
                (rdf::TYPE, owl::RESTRICTION.into_owned().into()),
                (owl::ON_PROPERTY, iri("p").into()),
                (owl::SOME_VALUES_FROM, iri("C").into()),
                (rdfs::COMMENT, Literal::new_simple_literal("extra").into()),
            ],
        );
        assert!(strict::<ClassExpressionMatcher>(&view).is_empty());
        assert_eq!(lax::<ClassExpressionMatcher>(&view), ["ObjectSomeValuesFrom"]);
    }

    #[test]
    fn test_property_kind_selects_object_or_data_variant() {
        let triples = [
            (rdf::TYPE, owl::RESTRICTION.into_owned().into()),
            (owl::ON_PROPERTY, iri("p").into()),
            (owl::MIN_CARDINALITY, Literal::from(1).into()),
        ];
        assert_eq!(
            strict::<ClassExpressionMatcher>(&view(Some(PropertyKind::Data), &triples)),
            ["DataMinCardinality"]
        );
        assert_eq!(
            strict::<ClassExpressionMatcher>(&view(Some(PropertyKind::Object), &triples)),
            ["ObjectMinCardinality"]
        );
    }

    #[test]
    fn test_qualified_cardinality_requires_filler() {
        let view = view(
            Some(PropertyKind::Object),
            &[
                (rdf::TYPE, owl::RESTRICTION.into_owned().into()),
                (owl::ON_PROPERTY, iri("p").into()),
                (owl::QUALIFIED_CARDINALITY, Literal::from(2).into()),
            ],
        );
        assert!(strict::<ClassExpressionMatcher>(&view).is_empty());
        assert!(lax::<ClassExpressionMatcher>(&view).is_empty());
    }

    #[test]
    fn test_lax_ties_follow_registration_order() {
        let restriction = view(
            Some(PropertyKind::Object),
            &[
                (owl::ON_PROPERTY, iri("p").into()),
                (owl::SOME_VALUES_FROM, iri("C").into()),
                (owl::ALL_VALUES_FROM, iri("D").into()),
            ],
        );
        assert_eq!(
            lax::<ClassExpressionMatcher>(&restriction),
            ["ObjectSomeValuesFrom", "ObjectAllValuesFrom"]
        );

        let atom = view(
            None,
            &[
                (swrl::ARGUMENT_1, iri("x").into()),
                (swrl::ARGUMENT_2, iri("y").into()),
            ],
        );
        assert_eq!(
            lax::<SwrlAtomMatcher>(&atom),
            ["SameIndividualAtom", "DifferentIndividualsAtom"]
        );
    }

    #[test]
    fn test_datatype_restriction_pattern() {
        let view = view(
            None,
            &[
                (rdf::TYPE, rdfs::DATATYPE.into_owned().into()),
                (owl::ON_DATATYPE, iri("dt").into()),
                (owl::WITH_RESTRICTIONS, BlankNode::new_unchecked("l").into()),
            ],
        );
        assert_eq!(strict::<DataRangeMatcher>(&view), ["DatatypeRestriction"]);
    }
}
