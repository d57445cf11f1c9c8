use std::fmt::{self, Display};

/// The list of messages a [`crate::parser::Parser`] accumulated while parsing
/// a program. Parsing never stops at the first bad token, so this can hold
/// more than one entry; it implements `Display`/`Error` so a binary boundary
/// can propagate it with `?` while library callers can still inspect the raw
/// list via `Parser::errors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserErrors(pub Vec<String>);

impl Display for ParserErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Woops! We ran into some monkey business here!")?;
        writeln!(f, " parser errors:")?;
        for message in &self.0 {
            writeln!(f, "\t{message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParserErrors {}
