//! Tests for expression parsing

use formula_explorer::expression::{BinaryOp, Expression, ExpressionError, UnaryOp};

#[test]
fn test_operator_structure() {
    // Subtraction is left-associative
    let expr = Expression::parse("a - b - c").unwrap();
    match expr {
        Expression::Binary(BinaryOp::Sub, left, right) => {
            assert!(matches!(*left, Expression::Binary(BinaryOp::Sub, _, _)));
            assert_eq!(*right, Expression::Variable("c".to_string()));
        }
        other => panic!("unexpected tree: {other:?}"),
    }

    // Exponentiation binds tighter than unary minus
    let expr = Expression::parse("-x^2").unwrap();
    match expr {
        Expression::Unary(UnaryOp::Neg, operand) => {
            assert!(matches!(*operand, Expression::Binary(BinaryOp::Pow, _, _)));
        }
        other => panic!("unexpected tree: {other:?}"),
    }
}

#[test]
fn test_seed_style_expressions_parse() {
    let sources = [
        "a * x + b",
        "L / (1 + e^(-k * (x - x0)))",
        "a * e^(-((x - b)^2) / (2 * c^2))",
        "a - (0.0592/b) * log10(x)",
        "(8.314 * c) / (x - b) - a / (x^2)",
        "a * (0.5)^(x/b)",
        "max(0, a * x + b)",
        "log(1 + e^(a*x))",
    ];
    for source in sources {
        assert!(Expression::parse(source).is_ok(), "{source}");
    }
}

#[test]
fn test_identifier_listing() {
    let expr = Expression::parse("L / (1 + e^(-k * (x - x0)))").unwrap();
    assert_eq!(expr.variables(), vec!["L", "e", "k", "x", "x0"]);

    let expr = Expression::parse("max(sin(x), cos(x), 0)").unwrap();
    assert_eq!(expr.functions(), vec!["cos", "max", "sin"]);
}

#[test]
fn test_syntax_errors() {
    assert_eq!(Expression::parse("   "), Err(ExpressionError::EmptyExpression));
    assert!(matches!(
        Expression::parse("a * (x + 1"),
        Err(ExpressionError::UnbalancedParentheses { position: 4 })
    ));
    assert!(matches!(
        Expression::parse("x + 1)"),
        Err(ExpressionError::UnbalancedParentheses { position: 5 })
    ));
    assert!(matches!(
        Expression::parse("2x"),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        Expression::parse("x + * 2"),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        Expression::parse("sin()"),
        Err(ExpressionError::ParseError { .. })
    ));
}

#[test]
fn test_decimal_literals_keep_their_fraction() {
    for (source, value) in [("2.5", 2.5), ("0.0592", 0.0592), (".25", 0.25), ("6.02e23", 6.02e23)] {
        assert_eq!(Expression::parse(source).unwrap(), Expression::Number(value), "{source}");
    }
    assert_eq!(
        Expression::parse("x^0.5").unwrap(),
        Expression::Binary(
            BinaryOp::Pow,
            Box::new(Expression::Variable("x".to_string())),
            Box::new(Expression::Number(0.5))
        )
    );
}

#[test]
fn test_deep_operator_chains_are_rejected() {
    let sources = [
        format!("{}x", "-".repeat(1000)),
        format!("{}x", "+-".repeat(300)),
        "1^".repeat(500) + "1",
        "x^-".repeat(300) + "x",
    ];
    for source in &sources {
        assert!(
            matches!(Expression::parse(source), Err(ExpressionError::ParseError { .. })),
            "{} bytes",
            source.len()
        );
    }
}
