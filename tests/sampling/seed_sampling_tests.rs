//! Tests sampling the built-in formulas

use approx::assert_relative_eq;
use formula_explorer::catalog::builtin_formulas;
use formula_explorer::config::SamplingConfig;
use formula_explorer::formula::Formula;
use formula_explorer::sampling::{sample_formula, AxisRange};

fn builtin(id: &str) -> Formula {
    builtin_formulas()
        .unwrap()
        .into_iter()
        .find(|f| f.id == id)
        .unwrap()
}

/// Value of a formula at a single x
fn value_at(formula: &Formula, x: f64) -> Option<f64> {
    let config = SamplingConfig {
        sample_count: 2,
        ..SamplingConfig::default()
    };
    sample_formula(formula, AxisRange::new(x, x + 1.0), &config)[0].y
}

#[test]
fn test_every_seed_formula_plots() {
    let config = SamplingConfig::default();
    for formula in builtin_formulas().unwrap() {
        let samples = sample_formula(&formula, AxisRange::default(), &config);
        assert_eq!(samples.len(), 300, "{}", formula.id);
        assert!(
            samples.iter().any(|s| s.y.is_some()),
            "{} has no defined samples",
            formula.id
        );
    }
}

#[test]
fn test_domain_restricted_seeds() {
    let config = SamplingConfig::default();
    for id in ["sqrt", "ln", "nernst", "henderson_hasselbalch"] {
        let samples = sample_formula(&builtin(id), AxisRange::default(), &config);
        for s in &samples {
            if s.x < -1e-9 {
                assert_eq!(s.y, None, "{id} at {}", s.x);
            }
        }
        assert!(samples.iter().filter(|s| s.x > 0.0).all(|s| s.y.is_some()), "{id}");
    }
}

#[test]
fn test_seed_values() {
    let mut logistic = builtin("logistic");
    assert_relative_eq!(value_at(&logistic, 0.0).unwrap(), 2.5);
    logistic.param_mut("x0").unwrap().value = 2.0;
    assert_relative_eq!(value_at(&logistic, 2.0).unwrap(), 2.5);

    let decay = builtin("radioactive_decay");
    assert_relative_eq!(value_at(&decay, 5.0).unwrap(), 50.0, epsilon = 1e-12);

    let relu = builtin("relu");
    assert_eq!(value_at(&relu, -3.0), Some(0.0));
    assert_eq!(value_at(&relu, 3.0), Some(3.0));

    let gaussian = builtin("gaussian");
    assert_relative_eq!(value_at(&gaussian, 0.0).unwrap(), 3.0);

    let michaelis = builtin("michaelis_menten");
    assert_relative_eq!(value_at(&michaelis, 2.0).unwrap(), 5.0);

    let second_order = builtin("kinetics_2nd");
    assert_relative_eq!(value_at(&second_order, 0.0).unwrap(), 10.0, epsilon = 1e-12);
}

#[test]
fn test_power_with_fractional_exponent() {
    let mut power = builtin("power");
    power.param_mut("a").unwrap().value = 0.5;
    assert_eq!(value_at(&power, -4.0), None);
    assert_relative_eq!(value_at(&power, 4.0).unwrap(), 2.0);

    power.param_mut("a").unwrap().value = -1.0;
    assert_eq!(value_at(&power, 0.0), None);
    assert_relative_eq!(value_at(&power, -2.0).unwrap(), -0.5);
}
