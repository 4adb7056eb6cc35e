//! Tests for compiling and evaluating expressions

use approx::assert_relative_eq;
use formula_explorer::expression::{
    Arity, Binding, CompiledExpression, ExpressionError, ParameterShape, Value,
};

const TOL: f64 = 1e-10;

fn evaluate(source: &str, names: &[&str], values: &[f64], x: f64) -> Result<Value, ExpressionError> {
    let shape = ParameterShape::new(names.iter().copied());
    let compiled = CompiledExpression::compile(source, &shape)?;
    let binding = Binding::new(&shape, values, x)?;
    compiled.evaluate(&binding)
}

fn real(source: &str, names: &[&str], values: &[f64], x: f64) -> Option<f64> {
    evaluate(source, names, values, x).ok()?.to_real(TOL)
}

#[test]
fn test_compile_once_evaluate_many() {
    let shape = ParameterShape::new(["a", "b", "c"]);
    let compiled = CompiledExpression::compile("a * x^2 + b * x + c", &shape).unwrap();

    let values = [1.0, -2.0, 1.0];
    for x in [-3.0, 0.0, 1.0, 2.5] {
        let binding = Binding::new(&shape, &values, x).unwrap();
        let y = compiled.evaluate(&binding).unwrap().to_real(TOL).unwrap();
        assert_relative_eq!(y, (x - 1.0) * (x - 1.0), epsilon = 1e-12);
    }
}

#[test]
fn test_precedence_values() {
    assert_eq!(real("-x^2", &[], &[], 3.0), Some(-9.0));
    assert_eq!(real("2^-1", &[], &[], 0.0), Some(0.5));
    assert_eq!(real("2^3^2", &[], &[], 0.0), Some(512.0));
    assert_eq!(real("10 - 4 - 3", &[], &[], 0.0), Some(3.0));
    assert_eq!(real("12 / 3 / 2", &[], &[], 0.0), Some(2.0));
}

#[test]
fn test_exponential_forms_agree() {
    let a = real("a * e^(b * x) + c", &["a", "b", "c"], &[2.0, 0.5, 1.0], 1.5).unwrap();
    let b = real("a * exp(b * x) + c", &["a", "b", "c"], &[2.0, 0.5, 1.0], 1.5).unwrap();
    assert_relative_eq!(a, b, epsilon = 1e-12);
    assert_relative_eq!(a, 2.0 * (0.75f64).exp() + 1.0, epsilon = 1e-12);
}

#[test]
fn test_builtin_functions() {
    assert_relative_eq!(real("log(x)", &[], &[], std::f64::consts::E).unwrap(), 1.0, epsilon = TOL);
    assert_relative_eq!(real("log(x, 2)", &[], &[], 8.0).unwrap(), 3.0, epsilon = TOL);
    assert_relative_eq!(real("log10(x)", &[], &[], 1000.0).unwrap(), 3.0, epsilon = TOL);
    assert_relative_eq!(real("cos(pi)", &[], &[], 0.0).unwrap(), -1.0, epsilon = TOL);
    assert_eq!(real("abs(x)", &[], &[], -2.5), Some(2.5));
    assert_eq!(real("max(0, x)", &[], &[], -2.0), Some(0.0));
    assert_eq!(real("min(3, x, 7)", &[], &[], 5.0), Some(3.0));
    assert_relative_eq!(real("tanh(x)", &[], &[], 100.0).unwrap(), 1.0, epsilon = TOL);
}

#[test]
fn test_parameter_shadows_constant() {
    assert_eq!(real("e * x", &["e"], &[3.0], 2.0), Some(6.0));
    assert_relative_eq!(
        real("e * x", &[], &[], 2.0).unwrap(),
        2.0 * std::f64::consts::E,
        epsilon = TOL
    );
}

#[test]
fn test_complex_results() {
    // sqrt of a negative is genuinely complex
    assert_eq!(real("sqrt(x)", &[], &[], -4.0), None);
    // ...unless it cancels back to the real line
    assert_relative_eq!(real("(x^2)^0.5", &[], &[], -4.0).unwrap(), 4.0, epsilon = TOL);
    assert_relative_eq!(real("sqrt(x)^2", &[], &[], -4.0).unwrap(), -4.0, epsilon = 1e-9);
    // Negative base with a non-integer exponent
    assert_eq!(real("x^0.5", &[], &[], -1.0), None);
    assert_eq!(real("x^3", &[], &[], -2.0), Some(-8.0));
    assert_eq!(real("log(x)", &[], &[], -1.0), None);
}

#[test]
fn test_evaluation_errors() {
    assert_eq!(
        evaluate("1 / x", &[], &[], 0.0),
        Err(ExpressionError::DivisionByZero)
    );
    assert_eq!(
        evaluate("k * x", &[], &[], 1.0),
        Err(ExpressionError::UndefinedVariable {
            name: "k".to_string()
        })
    );
    assert!(matches!(
        evaluate("max(sqrt(x), 1)", &[], &[], -4.0),
        Err(ExpressionError::InvalidOperation { .. })
    ));
}

#[test]
fn test_compile_errors() {
    let shape = ParameterShape::default();
    assert_eq!(
        CompiledExpression::compile("foo(x)", &shape),
        Err(ExpressionError::UndefinedFunction {
            name: "foo".to_string()
        })
    );
    assert_eq!(
        CompiledExpression::compile("sin(x, 2)", &shape),
        Err(ExpressionError::ArityMismatch {
            name: "sin".to_string(),
            expected: Arity::Exactly(1),
            found: 2,
        })
    );
    // Unresolved identifiers compile and are reported
    let compiled = CompiledExpression::compile("k * x + m", &shape).unwrap();
    assert_eq!(compiled.unresolved(), vec!["k", "m"]);
}

#[test]
fn test_binding_validation() {
    let shape = ParameterShape::new(["x"]);
    assert_eq!(
        Binding::new(&shape, &[1.0], 0.0).unwrap_err(),
        ExpressionError::ReservedName {
            name: "x".to_string()
        }
    );

    let shape = ParameterShape::new(["a", "a"]);
    assert_eq!(
        Binding::new(&shape, &[1.0, 2.0], 0.0).unwrap_err(),
        ExpressionError::DuplicateParameter {
            name: "a".to_string()
        }
    );

    let shape = ParameterShape::new(["a", "b"]);
    assert_eq!(
        Binding::new(&shape, &[1.0], 0.0).unwrap_err(),
        ExpressionError::ShapeMismatch {
            expected: 2,
            found: 1
        }
    );
}
