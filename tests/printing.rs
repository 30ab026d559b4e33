use ember::ast::Program;
use ember::{Lexer, Parser};

fn parse(source: &str) -> Program {
    let mut parser = Parser::new();
    parser.init(Lexer::new(source));
    let program = parser.parse_program();
    assert!(
        parser.errors().is_empty(),
        "parse errors for {source:?}: {:?}",
        parser.errors()
    );
    program
}

#[test]
fn operator_precedence() {
    let cases = [
        ("-a * b", "((-a) * b);"),
        ("!-a", "(!(-a));"),
        ("a + b + c", "((a + b) + c);"),
        ("a + b - c", "((a + b) - c);"),
        ("a * b * c", "((a * b) * c);"),
        ("a * b / c", "((a * b) / c);"),
        ("a + b / c", "(a + (b / c));"),
        ("a % b", "(a % b);"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f);"),
        ("3 + 4; -5 * 5", "(3 + 4);((-5) * 5);"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));"),
        ("5 >= 4 == 3 <= 4", "((5 >= 4) == (3 <= 4));"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));",
        ),
        ("true", "true;"),
        ("false", "false;"),
        ("3 > 5 == false", "((3 > 5) == false);"),
        ("3 < 5 == true", "((3 < 5) == true);"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);"),
        ("(5 + 5) * 2", "((5 + 5) * 2);"),
        ("2 / (5 + 5)", "(2 / (5 + 5));"),
        ("-(5 + 5)", "(-(5 + 5));"),
        ("!(true == true)", "(!(true == true));"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d);"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g));"),
        ("a * b[2]", "(a * (b[2]));"),
        ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d);"),
        ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])));"),
        ("5 + 5 ** 2", "(5 + (5 ** 2));"),
        ("5 * 5 ** 2", "(5 * (5 ** 2));"),
        ("(5 + 5) ** 2", "((5 + 5) ** 2);"),
        ("2 ** 3 ** 2", "((2 ** 3) ** 2);"),
    ];

    for (source, expected) in cases {
        assert_eq!(parse(source).to_string(), expected, "for {source}");
    }
}

#[test]
fn assignment_and_return_rendering() {
    assert_eq!(parse("myVar = anotherVar;").to_string(), "myVar = anotherVar;");
    assert_eq!(parse("return 2 * 3;").to_string(), "return (2 * 3);");
    assert_eq!(parse("return;").to_string(), "return;");
}

#[test]
fn block_bodies_indent_four_spaces_per_level() {
    let rendered = parse("|x| { x + 2; }").to_string();
    assert_eq!(rendered, "|x| {\n    (x + 2);\n};");

    let rendered = parse("|x| { |y| { x + y } }").to_string();
    assert_eq!(rendered, "|x| {\n    |y| {\n        (x + y);\n    };\n};");

    let rendered = parse("{ x = 1; { y = 2; } }").to_string();
    assert_eq!(rendered, "{\n    x = 1;\n    {\n        y = 2;\n    }\n}");
}

#[test]
fn if_statements_render_without_trailing_semicolon() {
    let rendered = parse("if x < y { x } else { y }").to_string();
    assert_eq!(rendered, "if (x < y) {\n    x;\n} else {\n    y;\n}");
}

#[test]
fn while_rendering() {
    let rendered = parse("while x < 10 { x = x + 1; break; }").to_string();
    assert_eq!(rendered, "while (x < 10) {\n    x = (x + 1);\n    break;\n}");
}

#[test]
fn literal_rendering() {
    assert_eq!(parse("x = {};").to_string(), "x = {};");
    assert_eq!(
        parse(r#"x = {"a": 1, 2: b};"#).to_string(),
        "x = {\"a\": 1, 2: b};"
    );
    assert_eq!(parse("x = [1, 2 * 2];").to_string(), "x = [1, (2 * 2)];");
    assert_eq!(
        parse(r#"print("a\nb\t\"c\"");"#).to_string(),
        "print(\"a\\nb\\t\\\"c\\\"\");"
    );
    assert_eq!(
        parse("m = macro(x, y) { x + y; };").to_string(),
        "m = macro(x, y) {\n    (x + y);\n};"
    );
}

#[test]
fn printed_programs_reparse_to_equal_trees() {
    let sources = [
        "x = 5;",
        "foobar = y",
        "y = |a, b| { a + b; };",
        "f = || { return 1; };",
        "if x < y { x } else { y }",
        "if x { y }",
        "while i < 10 { i = i + 1; if i % 2 == 0 { continue; } }",
        "arr = [1, 2 * 2, push(arr, 3)];",
        r#"m = {"one": 1, two: 2, 3: three};"#,
        "{ x = 1; y = x; }",
        "{ { x = 1 } }",
        r#"{ "a": 1 }"#,
        r#"print("a\nb");"#,
        r#"s = "foo\qbar";"#,
        "quote(unquote(4 + 4) + 8);",
        "mymacro = macro(a) { quote(unquote(a)); };",
        "-a * b;",
        "adder = |x| { |y| { x + y } };",
        "x = {}",
        r#"{"a": 1}["a"]"#,
        "index = a[b[1]];",
    ];

    for source in sources {
        let program = parse(source);
        let rendered = program.to_string();
        let reparsed = parse(&rendered);
        assert_eq!(reparsed, program, "round trip failed for {source:?}\nrendered: {rendered}");
        // Canonical form is a fixed point.
        assert_eq!(reparsed.to_string(), rendered, "for {source:?}");
    }
}
