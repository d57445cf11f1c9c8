use std::fmt::{self, Display};

use super::{
    ArrayLiteral, CallExpression, FunctionLiteral, HashLiteral, Identifier, IfExpression,
    IndexExpression, InfixExpression, PrefixExpression,
};

/// Every expression shape this language's grammar produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(ArrayLiteral),
    HashLiteral(HashLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    FunctionLiteral(FunctionLiteral),
    Call(CallExpression),
    Index(IndexExpression),
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{ident}"),
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::BooleanLiteral(value) => write!(f, "{value}"),
            Expression::StringLiteral(value) => write!(f, "{value}"),
            Expression::ArrayLiteral(array) => write!(f, "{array}"),
            Expression::HashLiteral(hash) => write!(f, "{hash}"),
            Expression::Prefix(prefix) => write!(f, "{prefix}"),
            Expression::Infix(infix) => write!(f, "{infix}"),
            Expression::If(if_expr) => write!(f, "{if_expr}"),
            Expression::FunctionLiteral(func) => write!(f, "{func}"),
            Expression::Call(call) => write!(f, "{call}"),
            Expression::Index(index) => write!(f, "{index}"),
        }
    }
}
