use std::fmt::{self, Display};

use super::{BlockStatement, Expression, LetStatement, ReturnStatement};

/// Every statement shape this language's grammar produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(Expression),
    Block(BlockStatement),
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(let_stmt) => write!(f, "{let_stmt}"),
            Statement::Return(return_stmt) => write!(f, "{return_stmt}"),
            Statement::Expression(expr) => write!(f, "{expr}"),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}
