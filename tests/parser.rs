use monkey_rs::lexer::Lexer;
use monkey_rs::parser::Parser;

fn parse(input: &str) -> String {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    assert!(parser.errors().is_empty(), "parser errors: {:?}", parser.errors());
    program.to_string()
}

#[test]
fn operator_precedence_normalization_table() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
        ),
        (
            "a * [1, 2, 3, 4][b * c] * d",
            "((a * ([1, 2, 3, 4][(b * c)])) * d)",
        ),
        (
            "add(a + b + c * d / f + g)",
            "add((((a + b) + ((c * d) / f)) + g))",
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input), expected, "input was {input:?}");
    }
}

#[test]
fn let_statement_is_a_fixed_point_of_stringify_then_reparse() {
    let original = "let myVar = anotherVar;";
    let once = parse(original);
    assert_eq!(once, original);
    let twice = parse(&once);
    assert_eq!(twice, once);
}
