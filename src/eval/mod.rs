//! Tree-walking evaluation. Every function here takes a borrowed AST node
//! and the current environment and returns a bare `Object` -- `Object::Error`
//! is this language's exception mechanism, so there is no `Result` to thread
//! through the recursion. `Object::ReturnValue` plays the same role for
//! `return`, unwound by the nearest enclosing function call.
mod builtins;
mod environment;
mod object;

pub use environment::Environment;
pub use object::{BuiltinFunction, FunctionObject, HashKey, Object, ObjectType};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::ast::{
    BlockStatement, CallExpression, Expression, HashLiteral, Identifier, IfExpression,
    IndexExpression, LetStatement, Program, Statement,
};

// Cached so repeated boolean/null results don't allocate; compared by value
// since a two-valued type's value equality already coincides with identity.
static TRUE: Lazy<Object> = Lazy::new(|| Object::Boolean(true));
static FALSE: Lazy<Object> = Lazy::new(|| Object::Boolean(false));
static NULL: Lazy<Object> = Lazy::new(|| Object::Null);

pub fn eval(program: &Program, env: &Rc<RefCell<Environment>>) -> Object {
    let mut result = NULL.clone();

    for statement in &program.statements {
        result = eval_statement(statement, env);

        if let Object::ReturnValue(value) = result {
            return *value;
        }
        if matches!(result, Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Rc<RefCell<Environment>>) -> Object {
    match statement {
        Statement::Let(let_stmt) => eval_let_statement(let_stmt, env),
        Statement::Return(return_stmt) => {
            let value = eval_expression(&return_stmt.value, env);
            if is_error(&value) {
                return value;
            }
            Object::ReturnValue(Box::new(value))
        }
        Statement::Expression(expr) => eval_expression(expr, env),
        Statement::Block(block) => eval_block_statement(block, env),
    }
}

/// Unlike [`eval`], does not unwrap `RETURN_VALUE` -- it must keep unwinding
/// through nested blocks until a function call catches it.
fn eval_block_statement(block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> Object {
    let mut result = NULL.clone();

    for statement in &block.statements {
        result = eval_statement(statement, env);
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_let_statement(let_stmt: &LetStatement, env: &Rc<RefCell<Environment>>) -> Object {
    let value = eval_expression(&let_stmt.value, env);
    if is_error(&value) {
        return value;
    }
    env.borrow_mut().set(let_stmt.name.value.clone(), value.clone());
    value
}

fn eval_expression(expr: &Expression, env: &Rc<RefCell<Environment>>) -> Object {
    match expr {
        Expression::IntegerLiteral(value) => Object::Integer(*value),
        Expression::BooleanLiteral(value) => native_bool_to_object(*value),
        Expression::StringLiteral(value) => Object::String(Rc::from(value.as_str())),
        Expression::Identifier(ident) => eval_identifier(ident, env),
        Expression::Prefix(prefix) => {
            let right = eval_expression(&prefix.right, env);
            if is_error(&right) {
                return right;
            }
            eval_prefix_expression(&prefix.operator, right)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env);
            if is_error(&left) {
                return left;
            }
            let right = eval_expression(&infix.right, env);
            if is_error(&right) {
                return right;
            }
            eval_infix_expression(&infix.operator, left, right)
        }
        Expression::If(if_expr) => eval_if_expression(if_expr, env),
        Expression::FunctionLiteral(func) => Object::Function(Rc::new(FunctionObject {
            parameters: func.parameters.clone(),
            body: func.body.clone(),
            env: Rc::clone(env),
        })),
        Expression::Call(call) => eval_call_expression(call, env),
        Expression::ArrayLiteral(array) => match eval_expressions(&array.elements, env) {
            Ok(elements) => Object::Array(Rc::new(elements)),
            Err(err) => err,
        },
        Expression::HashLiteral(hash) => eval_hash_literal(hash, env),
        Expression::Index(index) => eval_index_expression(index, env),
    }
}

fn eval_identifier(ident: &Identifier, env: &Rc<RefCell<Environment>>) -> Object {
    if let Some(value) = env.borrow().get(&ident.value) {
        return value;
    }
    if let Some(builtin) = builtins::lookup(&ident.value) {
        return builtin;
    }
    error(format!("identifier not found: {}", ident.value))
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => native_bool_to_object(!is_truthy(&right)),
        "-" => match right {
            Object::Integer(value) => Object::Integer(-value),
            other => error(format!("unknown operator: -{}", other.type_tag())),
        },
        _ => unreachable!("parser only produces ! and - prefix operators"),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        _ if operator == "==" => native_bool_to_object(objects_identical(&left, &right)),
        _ if operator == "!=" => native_bool_to_object(!objects_identical(&left, &right)),
        _ if left.type_tag() != right.type_tag() => error(format!(
            "type mismatch: {} {operator} {}",
            left.type_tag(),
            right.type_tag()
        )),
        _ => error(format!(
            "unknown operator: {} {operator} {}",
            left.type_tag(),
            right.type_tag()
        )),
    }
}

/// Identity-style comparison used for `==`/`!=` on non-primitives: booleans
/// compare equal by value (the only two instances ever produced), `null`
/// always equals `null`, and every other pairing of non-numeric/non-string
/// objects compares unequal (§9 open question: cross-type comparisons on
/// compound values have no reference-equality concept here, so they are
/// simply false rather than panicking or deep-comparing).
fn objects_identical(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Boolean(a), Object::Boolean(b)) => a == b,
        (Object::Null, Object::Null) => true,
        _ => false,
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        // Rounds toward zero, matching float-division-then-truncate.
        "/" => Object::Integer((left as f64 / right as f64) as i64),
        "<" => native_bool_to_object(left < right),
        ">" => native_bool_to_object(left > right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        other => error(format!("unknown operator: INTEGER {other} INTEGER")),
    }
}

fn eval_string_infix_expression(operator: &str, left: &Rc<str>, right: &Rc<str>) -> Object {
    if operator != "+" {
        return error(format!("unknown operator: STRING {operator} STRING"));
    }
    Object::String(Rc::from(format!("{left}{right}").as_str()))
}

fn eval_if_expression(if_expr: &IfExpression, env: &Rc<RefCell<Environment>>) -> Object {
    let condition = eval_expression(&if_expr.condition, env);
    if is_error(&condition) {
        return condition;
    }

    if is_truthy(&condition) {
        eval_block_statement(&if_expr.consequence, env)
    } else if let Some(alternative) = &if_expr.alternative {
        eval_block_statement(alternative, env)
    } else {
        NULL.clone()
    }
}

/// Evaluates left-to-right, short-circuiting on the first error -- used for
/// both call arguments and array literal elements.
fn eval_expressions(
    exprs: &[Expression],
    env: &Rc<RefCell<Environment>>,
) -> Result<Vec<Object>, Object> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let evaluated = eval_expression(expr, env);
        if is_error(&evaluated) {
            return Err(evaluated);
        }
        result.push(evaluated);
    }
    Ok(result)
}

fn eval_call_expression(call: &CallExpression, env: &Rc<RefCell<Environment>>) -> Object {
    let function = eval_expression(&call.function, env);
    if is_error(&function) {
        return function;
    }

    let args = match eval_expressions(&call.arguments, env) {
        Ok(args) => args,
        Err(err) => return err,
    };

    apply_function(function, &args)
}

fn apply_function(function: Object, args: &[Object]) -> Object {
    match function {
        Object::Function(func) => {
            let extended_env = extend_function_env(&func, args);
            unwrap_return_value(eval_block_statement(&func.body, &extended_env))
        }
        Object::Builtin(builtin) => builtin(args),
        other => error(format!("not a function: {}", other.type_tag())),
    }
}

/// Binds parameters to arguments positionally. Extra arguments are ignored;
/// missing ones are simply never bound, so referencing them later surfaces
/// the ordinary `identifier not found` error rather than panicking.
fn extend_function_env(func: &FunctionObject, args: &[Object]) -> Rc<RefCell<Environment>> {
    let env = Environment::new_enclosed(Rc::clone(&func.env));
    for (param, arg) in func.parameters.iter().zip(args) {
        env.borrow_mut().set(param.value.clone(), arg.clone());
    }
    env
}

fn unwrap_return_value(obj: Object) -> Object {
    match obj {
        Object::ReturnValue(value) => *value,
        other => other,
    }
}

fn eval_hash_literal(hash: &HashLiteral, env: &Rc<RefCell<Environment>>) -> Object {
    let mut pairs = HashMap::new();

    for (key_expr, value_expr) in &hash.pairs {
        let key = eval_expression(key_expr, env);
        if is_error(&key) {
            return key;
        }

        let value = eval_expression(value_expr, env);
        if is_error(&value) {
            return value;
        }

        let hash_key = match HashKey::from_object(&key) {
            Some(hash_key) => hash_key,
            None => return error(format!("unusable as hash key: {}", key.type_tag())),
        };

        pairs.insert(hash_key, (key, value));
    }

    Object::Hash(Rc::new(pairs))
}

fn eval_index_expression(index_expr: &IndexExpression, env: &Rc<RefCell<Environment>>) -> Object {
    let left = eval_expression(&index_expr.left, env);
    if is_error(&left) {
        return left;
    }

    let index = eval_expression(&index_expr.index, env);
    if is_error(&index) {
        return index;
    }

    match &left {
        Object::Array(elements) => match &index {
            Object::Integer(i) => eval_array_index_expression(elements, *i),
            _ => error(format!("index operator not supported: {}", left.type_tag())),
        },
        Object::Hash(pairs) => eval_hash_index_expression(pairs, index),
        _ => error(format!("index operator not supported: {}", left.type_tag())),
    }
}

fn eval_array_index_expression(elements: &[Object], index: i64) -> Object {
    if index < 0 || index as usize >= elements.len() {
        return NULL.clone();
    }
    elements[index as usize].clone()
}

fn eval_hash_index_expression(pairs: &HashMap<HashKey, (Object, Object)>, index: Object) -> Object {
    let hash_key = match HashKey::from_object(&index) {
        Some(hash_key) => hash_key,
        None => return error(format!("unusable as hash key: {}", index.type_tag())),
    };

    match pairs.get(&hash_key) {
        Some((_, value)) => value.clone(),
        None => NULL.clone(),
    }
}

fn native_bool_to_object(value: bool) -> Object {
    if value {
        TRUE.clone()
    } else {
        FALSE.clone()
    }
}

fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Null | Object::Boolean(false))
}

fn is_error(obj: &Object) -> bool {
    matches!(obj, Object::Error(_))
}

fn error(message: impl Into<String>) -> Object {
    Object::Error(Rc::from(message.into().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn eval_input(input: &str) -> Object {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer);
        let program = parser.parse_program();
        assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
        let env = Environment::new();
        eval(&program, &env)
    }

    #[test]
    fn evaluates_integer_arithmetic() {
        let result = eval_input("(5 + 10 * 2 + 15 / 3) * 2 + -10");
        assert!(matches!(result, Object::Integer(50)));
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let result = eval_input(
            "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(2)",
        );
        assert!(matches!(result, Object::Integer(4)));
    }

    #[test]
    fn return_unwinds_through_nested_blocks() {
        let result = eval_input("if (10 > 1) { if (10 > 1) { return 10; } return 1; }");
        assert!(matches!(result, Object::Integer(10)));
    }

    #[test]
    fn string_concatenation() {
        let result = eval_input(r#""Hello" + " " + "World!""#);
        match result {
            Object::String(s) => assert_eq!(s.as_ref(), "Hello World!"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_array_index_is_null() {
        assert!(matches!(eval_input("[1, 2, 3][-1]"), Object::Null));
    }

    #[test]
    fn functions_as_hash_keys_are_rejected() {
        let result = eval_input(r#"{"name": "Monkey"}[fn(x){ x }]"#);
        match result {
            Object::Error(m) => assert_eq!(m.as_ref(), "unusable as hash key: FUNCTION"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn error_messages_are_exact() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            ("foobar", "identifier not found: foobar"),
            ("999[1]", "index operator not supported: INTEGER"),
        ];

        for (input, expected) in cases {
            match eval_input(input) {
                Object::Error(m) => assert_eq!(m.as_ref(), expected, "input was {input:?}"),
                other => panic!("expected error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn builtins_cover_array_helpers() {
        assert!(matches!(eval_input("len([1,2,3])"), Object::Integer(3)));
        match eval_input("push([], 1)") {
            Object::Array(elements) => assert_eq!(elements.len(), 1),
            other => panic!("expected array, got {other:?}"),
        }
        match eval_input("rest([1,2,3])") {
            Object::Array(elements) => assert_eq!(elements.len(), 2),
            other => panic!("expected array, got {other:?}"),
        }
    }
}
