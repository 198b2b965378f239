//! SWRL rules.

use crate::entity::{DataProperty, Individual};
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression, Spaced};
use oxrdf::{Literal, NamedNode};
use std::fmt;

/// A rule variable, identified by an IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub NamedNode);

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.0)
    }
}

/// An argument ranging over individuals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IArgument {
    Variable(Variable),
    Individual(Individual),
}

impl fmt::Display for IArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => v.fmt(f),
            Self::Individual(i) => i.fmt(f),
        }
    }
}

/// An argument ranging over literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DArgument {
    Variable(Variable),
    Literal(Literal),
}

impl fmt::Display for DArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => v.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    Class {
        class: ClassExpression,
        argument: IArgument,
    },
    DataRange {
        range: DataRange,
        argument: DArgument,
    },
    ObjectProperty {
        property: ObjectPropertyExpression,
        subject: IArgument,
        object: IArgument,
    },
    DataProperty {
        property: DataProperty,
        subject: IArgument,
        object: DArgument,
    },
    SameIndividual(IArgument, IArgument),
    DifferentIndividuals(IArgument, IArgument),
    BuiltIn {
        predicate: NamedNode,
        arguments: Vec<DArgument>,
    },
}

impl Atom {
    pub(crate) fn normalize(&mut self) {
        match self {
            Self::Class { class, .. } => class.normalize(),
            Self::DataRange { range, .. } => range.normalize(),
            Self::ObjectProperty { .. }
            | Self::DataProperty { .. }
            | Self::SameIndividual(..)
            | Self::DifferentIndividuals(..)
            | Self::BuiltIn { .. } => (),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { class, argument } => write!(f, "ClassAtom({class} {argument})"),
            Self::DataRange { range, argument } => write!(f, "DataRangeAtom({range} {argument})"),
            Self::ObjectProperty {
                property,
                subject,
                object,
            } => write!(f, "ObjectPropertyAtom({property} {subject} {object})"),
            Self::DataProperty {
                property,
                subject,
                object,
            } => write!(f, "DataPropertyAtom({property} {subject} {object})"),
            Self::SameIndividual(a, b) => write!(f, "SameIndividualAtom({a} {b})"),
            Self::DifferentIndividuals(a, b) => write!(f, "DifferentIndividualsAtom({a} {b})"),
            Self::BuiltIn {
                predicate,
                arguments,
            } => write!(f, "BuiltInAtom({predicate} {})", Spaced(arguments)),
        }
    }
}

/// A DL-safe rule: the conjunction of the body atoms implies the conjunction of the head atoms.
///
/// Both sides are conjunctions, their atoms are kept in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub body: Vec<Atom>,
    pub head: Vec<Atom>,
}

impl Rule {
    pub(crate) fn normalize(&mut self) {
        for atom in self.body.iter_mut().chain(self.head.iter_mut()) {
            atom.normalize();
        }
        crate::expression::canonical_sort(&mut self.body);
        crate::expression::canonical_sort(&mut self.head);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Body({}) Head({})",
            Spaced(&self.body),
            Spaced(&self.head)
        )
    }
}
