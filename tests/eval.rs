use monkey_rs::eval::{eval, Environment, Object};
use monkey_rs::lexer::Lexer;
use monkey_rs::parser::Parser;

fn run(input: &str) -> Object {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
    let env = Environment::new();
    eval(&program, &env)
}

#[test]
fn arithmetic_precedence_end_to_end() {
    assert!(matches!(
        run("(5 + 10 * 2 + 15 / 3) * 2 + -10"),
        Object::Integer(50)
    ));
}

#[test]
fn closures_capture_their_defining_environment() {
    let result = run(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(2)",
    );
    assert!(matches!(result, Object::Integer(4)));
}

#[test]
fn return_unwinds_through_nested_blocks_to_the_enclosing_function() {
    let result = run("if (10 > 1) { if (10 > 1) { return 10; } return 1; }");
    assert!(matches!(result, Object::Integer(10)));
}

#[test]
fn string_literals_concatenate() {
    match run(r#""Hello" + " " + "World!""#) {
        Object::String(s) => assert_eq!(s.as_ref(), "Hello World!"),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn hash_literal_with_mixed_key_kinds() {
    let result = run(
        r#"let two = "two"; { "one": 10 - 9, two: 1 + 1, "thr" + "ee": 6 / 2, 4: 4, true: 5, false: 6 }"#,
    );
    match result {
        Object::Hash(pairs) => assert_eq!(pairs.len(), 6),
        other => panic!("expected hash, got {other:?}"),
    }
}

#[test]
fn function_used_as_hash_key_is_rejected() {
    match run(r#"{"name": "Monkey"}[fn(x){ x }]"#) {
        Object::Error(m) => assert_eq!(m.as_ref(), "unusable as hash key: FUNCTION"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn negative_array_index_is_null() {
    assert!(matches!(run("[1, 2, 3][-1]"), Object::Null));
}

#[test]
fn array_builtins() {
    assert!(matches!(run("len([1,2,3])"), Object::Integer(3)));
    match run("push([], 1)") {
        Object::Array(elements) => assert_eq!(elements.len(), 1),
        other => panic!("expected array, got {other:?}"),
    }
    match run("rest([1,2,3])") {
        Object::Array(elements) => assert_eq!(elements.len(), 2),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn exact_error_messages() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
        ("foobar", "identifier not found: foobar"),
        ("999[1]", "index operator not supported: INTEGER"),
    ];

    for (input, expected) in cases {
        match run(input) {
            Object::Error(m) => assert_eq!(m.as_ref(), expected, "input was {input:?}"),
            other => panic!("expected error for {input:?}, got {other:?}"),
        }
    }
}
