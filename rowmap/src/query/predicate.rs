use std::fmt::{Display, Formatter};

/// Comparison operators a predicate can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Like,
    Is,
    IsNot,
}

impl Operator {
    /// SQL token for the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::Like => "LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single `<column> <operator> <literal>` condition.
///
/// The literal is already rendered SQL text and is embedded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    column: String,
    operator: Operator,
    literal: String,
}

impl Predicate {
    pub fn new(column: &str, operator: Operator, literal: String) -> Self {
        Predicate {
            column: column.to_string(),
            operator,
            literal,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.literal)
    }
}
