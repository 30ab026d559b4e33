use ember::interpreter::{self, Environment, RunError};
use ember::Value;

fn run(source: &str) -> Result<Option<Value>, RunError> {
    interpreter::run(source, &Environment::new())
}

fn run_value(source: &str) -> Value {
    run(source)
        .unwrap_or_else(|error| panic!("{source:?} failed: {error}"))
        .unwrap_or_else(|| panic!("{source:?} produced no value"))
}

#[test]
fn integer_arithmetic() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("5 + 5 * 2", 15),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("5 ** 2", 25),
        ("5 + 5 ** 2", 30),
        ("(5 + 5) ** 2", 100),
        ("5 * 5 ** 2", 125),
        ("2 ** 0", 1),
        ("2 ** 10", 1024),
        ("10 % 3", 1),
        ("10 % 2", 0),
        ("7 / 2", 3),
    ];

    for (source, expected) in cases {
        assert_eq!(run_value(source), Value::Integer(expected), "for {source}");
    }
}

#[test]
fn boolean_comparisons() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 <= 1", true),
        ("1 >= 2", false),
        ("2 >= 2", true),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
        // Mixed types compare unequal rather than erroring.
        ("1 == true", false),
        ("1 != true", true),
        (r#""1" == 1"#, false),
    ];

    for (source, expected) in cases {
        assert_eq!(run_value(source), Value::Boolean(expected), "for {source}");
    }
}

#[test]
fn bang_operator() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!0", true),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
    ];

    for (source, expected) in cases {
        assert_eq!(run_value(source), Value::Boolean(expected), "for {source}");
    }
}

#[test]
fn string_values() {
    match run_value(r#""Hello, world""#) {
        Value::String(value) => assert_eq!(value.as_ref(), "Hello, world"),
        other => panic!("expected string, got {}", other.type_name()),
    }
}

#[test]
fn string_concatenation() {
    match run_value(r#""Hello" + ", " + "world""#) {
        Value::String(value) => assert_eq!(value.as_ref(), "Hello, world"),
        other => panic!("expected string, got {}", other.type_name()),
    }
}

#[test]
fn string_comparisons() {
    let cases = [
        (r#""a" == "a""#, true),
        (r#""a" == "b""#, false),
        (r#""a" != "b""#, true),
        (r#""a" < "b""#, true),
        (r#""a" > "b""#, false),
        (r#""abc" < "abd""#, true),
    ];

    for (source, expected) in cases {
        assert_eq!(run_value(source), Value::Boolean(expected), "for {source}");
    }
}

#[test]
fn exponent_edge_cases() {
    // The squaring loop never runs for a negative exponent.
    assert_eq!(run_value("2 ** -3"), Value::Integer(1));
    assert_eq!(run_value("0 ** 0"), Value::Integer(1));
    assert_eq!(run_value("(-2) ** 3"), Value::Integer(-8));
}
