use std::fmt::{Display, Formatter};

use fieldgate_core::{GroupId, UserId};
use serde_json::Value;
use thiserror::Error;

use crate::value::{loosely_equal, value_as_i64};

mod parser;
#[cfg(test)]
mod tests;

/// Parsed grant condition.
///
/// Conditions are small boolean expressions such as
/// `equals(self.id, user.id) && in(property, ["email", "locale"])`.
/// They are parsed once when a grant is loaded and evaluated against a
/// [`FactSource`] for every authorization query.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `always()`.
    Always,
    /// `equals(a, b)`.
    Equals(Operand, Operand),
    /// `in(x, [...])`.
    In(Operand, Operand),
    /// `in_group(user_id, group_id)`.
    InGroup(Operand, Operand),
    /// `!expr`.
    Not(Box<Condition>),
    /// `left && right`.
    And(Box<Condition>, Box<Condition>),
}

/// One argument of a condition function.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Dotted reference into the evaluation facts, e.g. `self.id`.
    Path(FactPath),
    /// Literal string, number, boolean or null.
    Literal(Value),
    /// Bracketed list of operands.
    List(Vec<Operand>),
}

/// Dotted fact reference split into segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactPath {
    segments: Vec<String>,
}

/// Error raised when a grant condition cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid condition at offset {position}: {message}")]
pub struct ConditionParseError {
    /// Byte offset of the offending token.
    pub position: usize,
    /// Human-readable failure description.
    pub message: String,
}

/// Error raised while evaluating a parsed condition.
///
/// Callers treat any evaluation error as the condition evaluating false.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// A referenced fact does not exist.
    #[error("unknown fact '{0}'")]
    UnknownFact(String),
    /// The second argument of `in` did not resolve to a list.
    #[error("operand '{0}' is not a list")]
    NotAList(String),
    /// An `in_group` argument did not resolve to a numeric identifier.
    #[error("operand '{0}' is not a numeric identifier")]
    NotAnIdentifier(String),
}

/// Facts a condition can reference during evaluation.
pub trait FactSource {
    /// Returns the root fact registered under `name` (`self`, `user`, `property`, ...).
    fn fact(&self, name: &str) -> Option<&Value>;

    /// Returns whether the user belongs to the group.
    fn is_member(&self, user_id: UserId, group_id: GroupId) -> bool;
}

impl Condition {
    /// Parses a condition expression.
    pub fn parse(source: &str) -> Result<Self, ConditionParseError> {
        parser::parse(source)
    }

    /// Evaluates the condition against the supplied facts.
    pub fn evaluate(&self, facts: &dyn FactSource) -> Result<bool, EvaluationError> {
        match self {
            Self::Always => Ok(true),
            Self::Equals(left, right) => Ok(loosely_equal(
                &left.resolve(facts)?,
                &right.resolve(facts)?,
            )),
            Self::In(needle, haystack) => {
                let needle_value = needle.resolve(facts)?;
                match haystack.resolve(facts)? {
                    Value::Array(items) => Ok(items
                        .iter()
                        .any(|item| loosely_equal(&needle_value, item))),
                    _ => Err(EvaluationError::NotAList(haystack.to_string())),
                }
            }
            Self::InGroup(user, group) => {
                let user_id = Self::resolve_identifier(user, facts)?;
                let group_id = Self::resolve_identifier(group, facts)?;
                Ok(facts.is_member(UserId::new(user_id), GroupId::new(group_id)))
            }
            Self::Not(inner) => inner.evaluate(facts).map(|value| !value),
            Self::And(left, right) => Ok(left.evaluate(facts)? && right.evaluate(facts)?),
        }
    }

    fn resolve_identifier(operand: &Operand, facts: &dyn FactSource) -> Result<i64, EvaluationError> {
        value_as_i64(&operand.resolve(facts)?)
            .ok_or_else(|| EvaluationError::NotAnIdentifier(operand.to_string()))
    }
}

impl Operand {
    /// Resolves the operand into a concrete value.
    pub fn resolve(&self, facts: &dyn FactSource) -> Result<Value, EvaluationError> {
        match self {
            Self::Path(path) => path.resolve(facts).cloned(),
            Self::Literal(value) => Ok(value.clone()),
            Self::List(items) => items
                .iter()
                .map(|item| item.resolve(facts))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(formatter, "{path}"),
            Self::Literal(value) => write!(formatter, "{value}"),
            Self::List(items) => {
                formatter.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                formatter.write_str("]")
            }
        }
    }
}

impl FactPath {
    /// Creates a path from its segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.segments.as_slice()
    }

    fn resolve<'a>(&self, facts: &'a dyn FactSource) -> Result<&'a Value, EvaluationError> {
        let unknown = || EvaluationError::UnknownFact(self.to_string());
        let (root, rest) = self.segments.split_first().ok_or_else(unknown)?;

        let mut current = facts.fact(root.as_str()).ok_or_else(unknown)?;
        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(segment.as_str()),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            }
            .ok_or_else(unknown)?;
        }

        Ok(current)
    }
}

impl Display for FactPath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.segments.join(".").as_str())
    }
}
