//! OWL 2 class expressions, object property expressions and data ranges.

use crate::entity::{DataProperty, Datatype, Individual, ObjectProperty, OwlClass};
use crate::vocab::owl;
use oxrdf::{Literal, NamedNode};
use std::fmt;

/// An object property expression: a named object property or the inverse of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectPropertyExpression {
    ObjectProperty(ObjectProperty),
    /// ObjectInverseOf(P)
    InverseObjectProperty(ObjectProperty),
}

impl ObjectPropertyExpression {
    /// The named property this expression is built on.
    pub fn named(&self) -> &ObjectProperty {
        match self {
            Self::ObjectProperty(p) | Self::InverseObjectProperty(p) => p,
        }
    }

    pub fn as_object_property(&self) -> Option<&ObjectProperty> {
        match self {
            Self::ObjectProperty(p) => Some(p),
            Self::InverseObjectProperty(_) => None,
        }
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::ObjectProperty(p) => Self::InverseObjectProperty(p.clone()),
            Self::InverseObjectProperty(p) => Self::ObjectProperty(p.clone()),
        }
    }
}

impl From<ObjectProperty> for ObjectPropertyExpression {
    fn from(property: ObjectProperty) -> Self {
        Self::ObjectProperty(property)
    }
}

impl fmt::Display for ObjectPropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectProperty(p) => write!(f, "{p}"),
            Self::InverseObjectProperty(p) => write!(f, "ObjectInverseOf({p})"),
        }
    }
}

/// An OWL 2 class expression.
///
/// Class expressions describe sets of individuals through various constructors.
/// Set-valued operands (intersections, unions, enumerations) are kept in canonical
/// order once [normalized](Self::normalize), so that derived equality is set equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    /// A named class.
    Class(OwlClass),
    /// ObjectIntersectionOf(C1 ... Cn)
    ObjectIntersectionOf(Vec<ClassExpression>),
    /// ObjectUnionOf(C1 ... Cn)
    ObjectUnionOf(Vec<ClassExpression>),
    /// ObjectComplementOf(C)
    ObjectComplementOf(Box<ClassExpression>),
    /// ObjectOneOf(a1 ... an)
    ObjectOneOf(Vec<Individual>),
    /// ObjectSomeValuesFrom(P C)
    ObjectSomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    /// ObjectAllValuesFrom(P C)
    ObjectAllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    /// ObjectHasValue(P a)
    ObjectHasValue {
        property: ObjectPropertyExpression,
        individual: Individual,
    },
    /// ObjectHasSelf(P)
    ObjectHasSelf(ObjectPropertyExpression),
    /// ObjectMinCardinality(n P [C])
    ObjectMinCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
    /// ObjectMaxCardinality(n P [C])
    ObjectMaxCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
    /// ObjectExactCardinality(n P [C])
    ObjectExactCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Option<Box<ClassExpression>>,
    },
    /// DataSomeValuesFrom(P D)
    DataSomeValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },
    /// DataAllValuesFrom(P D)
    DataAllValuesFrom {
        property: DataProperty,
        filler: DataRange,
    },
    /// DataHasValue(P v)
    DataHasValue { property: DataProperty, value: Literal },
    /// DataMinCardinality(n P [D])
    DataMinCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },
    /// DataMaxCardinality(n P [D])
    DataMaxCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },
    /// DataExactCardinality(n P [D])
    DataExactCardinality {
        cardinality: u32,
        property: DataProperty,
        filler: Option<DataRange>,
    },
}

impl ClassExpression {
    pub fn class(class: impl Into<OwlClass>) -> Self {
        Self::Class(class.into())
    }

    pub fn thing() -> Self {
        Self::Class(OwlClass::from(owl::THING))
    }

    pub fn nothing() -> Self {
        Self::Class(OwlClass::from(owl::NOTHING))
    }

    pub fn some_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectSomeValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    pub fn all_values_from(
        property: impl Into<ObjectPropertyExpression>,
        filler: ClassExpression,
    ) -> Self {
        Self::ObjectAllValuesFrom {
            property: property.into(),
            filler: Box::new(filler),
        }
    }

    /// Returns the class if this expression is a named class.
    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this expression is a named class (not a complex expression).
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    /// Sorts and deduplicates every set-valued operand, recursively.
    pub fn normalize(&mut self) {
        match self {
            Self::Class(_) | Self::DataHasValue { .. } | Self::ObjectHasSelf(_) => (),
            Self::ObjectIntersectionOf(operands) | Self::ObjectUnionOf(operands) => {
                for operand in operands.iter_mut() {
                    operand.normalize();
                }
                canonical_sort(operands);
            }
            Self::ObjectComplementOf(operand) => operand.normalize(),
            Self::ObjectOneOf(individuals) => canonical_sort(individuals),
            Self::ObjectSomeValuesFrom { filler, .. } | Self::ObjectAllValuesFrom { filler, .. } => {
                filler.normalize();
            }
            Self::ObjectHasValue { .. } => (),
            Self::ObjectMinCardinality { filler, .. }
            | Self::ObjectMaxCardinality { filler, .. }
            | Self::ObjectExactCardinality { filler, .. } => {
                if let Some(filler) = filler {
                    filler.normalize();
                }
            }
            Self::DataSomeValuesFrom { filler, .. } | Self::DataAllValuesFrom { filler, .. } => {
                filler.normalize();
            }
            Self::DataMinCardinality { filler, .. }
            | Self::DataMaxCardinality { filler, .. }
            | Self::DataExactCardinality { filler, .. } => {
                if let Some(filler) = filler {
                    filler.normalize();
                }
            }
        }
    }
}

impl From<OwlClass> for ClassExpression {
    fn from(class: OwlClass) -> Self {
        Self::Class(class)
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{c}"),
            Self::ObjectIntersectionOf(operands) => {
                write!(f, "ObjectIntersectionOf({})", Spaced(operands))
            }
            Self::ObjectUnionOf(operands) => write!(f, "ObjectUnionOf({})", Spaced(operands)),
            Self::ObjectComplementOf(operand) => write!(f, "ObjectComplementOf({operand})"),
            Self::ObjectOneOf(individuals) => write!(f, "ObjectOneOf({})", Spaced(individuals)),
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectAllValuesFrom { property, filler } => {
                write!(f, "ObjectAllValuesFrom({property} {filler})")
            }
            Self::ObjectHasValue {
                property,
                individual,
            } => write!(f, "ObjectHasValue({property} {individual})"),
            Self::ObjectHasSelf(property) => write!(f, "ObjectHasSelf({property})"),
            Self::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "ObjectMinCardinality", *cardinality, property, filler),
            Self::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "ObjectMaxCardinality", *cardinality, property, filler),
            Self::ObjectExactCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "ObjectExactCardinality", *cardinality, property, filler),
            Self::DataSomeValuesFrom { property, filler } => {
                write!(f, "DataSomeValuesFrom({property} {filler})")
            }
            Self::DataAllValuesFrom { property, filler } => {
                write!(f, "DataAllValuesFrom({property} {filler})")
            }
            Self::DataHasValue { property, value } => {
                write!(f, "DataHasValue({property} {value})")
            }
            Self::DataMinCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "DataMinCardinality", *cardinality, property, filler),
            Self::DataMaxCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "DataMaxCardinality", *cardinality, property, filler),
            Self::DataExactCardinality {
                cardinality,
                property,
                filler,
            } => fmt_cardinality(f, "DataExactCardinality", *cardinality, property, filler),
        }
    }
}

fn fmt_cardinality(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    cardinality: u32,
    property: &impl fmt::Display,
    filler: &Option<impl fmt::Display>,
) -> fmt::Result {
    write!(f, "{name}({cardinality} {property}")?;
    if let Some(filler) = filler {
        write!(f, " {filler}")?;
    }
    f.write_str(")")
}

/// A restriction of a datatype facet, e.g. `xsd:minInclusive 18`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacetRestriction {
    pub facet: NamedNode,
    pub value: Literal,
}

impl fmt::Display for FacetRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.facet, self.value)
    }
}

/// An OWL 2 data range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataRange {
    Datatype(Datatype),
    /// DataIntersectionOf(D1 ... Dn)
    DataIntersectionOf(Vec<DataRange>),
    /// DataUnionOf(D1 ... Dn)
    DataUnionOf(Vec<DataRange>),
    /// DataComplementOf(D)
    DataComplementOf(Box<DataRange>),
    /// DataOneOf(v1 ... vn)
    DataOneOf(Vec<Literal>),
    /// DatatypeRestriction(DT f1 v1 ... fn vn)
    DatatypeRestriction {
        datatype: Datatype,
        restrictions: Vec<FacetRestriction>,
    },
}

impl DataRange {
    pub fn datatype(datatype: impl Into<Datatype>) -> Self {
        Self::Datatype(datatype.into())
    }

    pub fn as_datatype(&self) -> Option<&Datatype> {
        match self {
            Self::Datatype(d) => Some(d),
            _ => None,
        }
    }

    /// Sorts and deduplicates every set-valued operand, recursively.
    ///
    /// Facet restrictions keep their order.
    pub fn normalize(&mut self) {
        match self {
            Self::Datatype(_) | Self::DatatypeRestriction { .. } => (),
            Self::DataIntersectionOf(operands) | Self::DataUnionOf(operands) => {
                for operand in operands.iter_mut() {
                    operand.normalize();
                }
                canonical_sort(operands);
            }
            Self::DataComplementOf(operand) => operand.normalize(),
            Self::DataOneOf(values) => canonical_sort(values),
        }
    }
}

impl From<Datatype> for DataRange {
    fn from(datatype: Datatype) -> Self {
        Self::Datatype(datatype)
    }
}

impl fmt::Display for DataRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datatype(d) => write!(f, "{d}"),
            Self::DataIntersectionOf(operands) => {
                write!(f, "DataIntersectionOf({})", Spaced(operands))
            }
            Self::DataUnionOf(operands) => write!(f, "DataUnionOf({})", Spaced(operands)),
            Self::DataComplementOf(operand) => write!(f, "DataComplementOf({operand})"),
            Self::DataOneOf(values) => write!(f, "DataOneOf({})", Spaced(values)),
            Self::DatatypeRestriction {
                datatype,
                restrictions,
            } => write!(f, "DatatypeRestriction({datatype} {})", Spaced(restrictions)),
        }
    }
}

/// Writes its items separated by single spaces.
pub(crate) struct Spaced<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for Spaced<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Orders a set-valued operand by its functional syntax rendering and drops duplicates.
///
/// Blank nodes and literals have no total order in `oxrdf`, the rendering gives one.
pub(crate) fn canonical_sort<T: fmt::Display>(items: &mut Vec<T>) {
    let mut keyed = items
        .drain(..)
        .map(|item| (item.to_string(), item))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    keyed.dedup_by(|(a, _), (b, _)| a == b);
    items.extend(keyed.into_iter().map(|(_, item)| item));
}
