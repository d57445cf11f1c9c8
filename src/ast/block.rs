use std::fmt::{self, Display};

use super::Statement;

/// A brace-delimited sequence of statements, e.g. the body of a function or
/// the consequence/alternative of an `if`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
