use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use sha2::{Digest, Sha256};

use crate::ast::{BlockStatement, Identifier};

use super::Environment;

/// The runtime value universe. `String`/`Array`/`Hash`/`Function` share their
/// payload behind an `Rc` so passing a value around (binding it, returning
/// it, capturing it in a closure) never deep-copies.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashMap<HashKey, (Object, Object)>>),
    Function(Rc<FunctionObject>),
    Builtin(BuiltinFunction),
    ReturnValue(Box<Object>),
    Error(Rc<str>),
}

/// The tag side of [`Object`], used verbatim in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    ReturnValue,
    Error,
    Function,
    Builtin,
    Array,
    Hash,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
        };
        f.write_str(name)
    }
}

/// A native function exposed to user code under a fixed name; see
/// [`crate::eval::builtins`].
pub type BuiltinFunction = fn(&[Object]) -> Object;

/// A user-defined function, paired with the environment it closes over.
#[derive(Debug)]
pub struct FunctionObject {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

impl Object {
    pub fn type_tag(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }

    /// The user-facing form printed by `puts` and the REPL. Distinct from AST
    /// `Display`, which reconstructs parseable source text rather than a
    /// value's runtime shape.
    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::String(value) => value.to_string(),
            Object::Null => "null".to_string(),
            Object::Array(elements) => {
                let elems: Vec<String> = elements.iter().map(Object::inspect).collect();
                format!("[{}]", elems.join(", "))
            }
            Object::Hash(pairs) => {
                let entries: Vec<String> = pairs
                    .values()
                    .map(|(key, value)| format!("{}: {}", key.inspect(), value.inspect()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Object::Function(func) => {
                let params: Vec<String> = func.parameters.iter().map(|p| p.to_string()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Object::Builtin(_) => "builtin function".to_string(),
            Object::ReturnValue(value) => value.inspect(),
            Object::Error(message) => format!("ERROR: {message}"),
        }
    }
}

/// A uniform, hashable summary of a primitive value, used as the key type of
/// [`Object::Hash`]. The tag disambiguates equal numeric fields across kinds
/// -- `Integer(1)` and `Boolean(true)` never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(u64),
}

impl HashKey {
    pub fn from_object(object: &Object) -> Option<HashKey> {
        match object {
            Object::Integer(value) => Some(HashKey::Integer(*value)),
            Object::Boolean(value) => Some(HashKey::Boolean(*value)),
            Object::String(value) => Some(HashKey::String(string_hash(value))),
            _ => None,
        }
    }
}

/// Truncates a sha256 digest to 64 bits; collisions across distinct strings
/// are astronomically unlikely and the type tag still separates kinds.
fn string_hash(value: &str) -> u64 {
    let digest = Sha256::digest(value.as_bytes());
    u64::from_be_bytes(digest[0..8].try_into().expect("sha256 digest is 32 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_hash_equal() {
        let a = HashKey::from_object(&Object::String(Rc::from("foo"))).unwrap();
        let b = HashKey::from_object(&Object::String(Rc::from("foo"))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_kinds_never_collide() {
        let int_one = HashKey::from_object(&Object::Integer(1)).unwrap();
        let bool_true = HashKey::from_object(&Object::Boolean(true)).unwrap();
        assert_ne!(int_one, bool_true);
    }

    #[test]
    fn non_primitives_are_unhashable() {
        assert!(HashKey::from_object(&Object::Null).is_none());
    }
}
