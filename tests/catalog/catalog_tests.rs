//! Tests for the formula catalog

use formula_explorer::catalog::{Admission, Catalog};
use formula_explorer::config::AdmissionPolicy;
use formula_explorer::formula::{Formula, FormulaError, Parameter};
use formula_explorer::ExplorerError;

fn cardioid() -> Formula {
    Formula::new("cardioid", "Cardioid (upper half)", "Curves", "a * (1 - cos(x))")
        .with_latex("r = a(1 - \\cos\\theta)")
        .with_param(Parameter::new("a", 1.0, 0.1, 5.0, 0.1))
}

#[test]
fn test_seed_order_is_stable() {
    let catalog = Catalog::builtin().unwrap();
    let ids: Vec<&str> = catalog.iter().take(6).map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["linear", "quadratic", "cubic", "inverse", "abs", "sqrt"]);
}

#[test]
fn test_admission_upsert() {
    let mut catalog = Catalog::builtin().unwrap();
    let len = catalog.len();

    assert_eq!(catalog.admit(cardioid()).unwrap(), Admission::Inserted);
    assert_eq!(catalog.len(), len + 1);
    assert_eq!(catalog.iter().last().unwrap().id, "cardioid");

    let mut changed = cardioid();
    changed.param_mut("a").unwrap().value = 2.0;
    assert_eq!(catalog.admit(changed).unwrap(), Admission::Replaced);
    assert_eq!(catalog.len(), len + 1);
    assert_eq!(catalog.get("cardioid").unwrap().param("a").unwrap().value, 2.0);
}

#[test]
fn test_admitting_same_formula_twice_is_idempotent() {
    let mut once = Catalog::builtin().unwrap();
    once.admit(cardioid()).unwrap();

    let mut twice = Catalog::builtin().unwrap();
    twice.admit(cardioid()).unwrap();
    twice.admit(cardioid()).unwrap();

    let a: Vec<&Formula> = once.iter().collect();
    let b: Vec<&Formula> = twice.iter().collect();
    assert_eq!(a, b);
}

#[test]
fn test_blank_id_is_rejected() {
    let mut catalog = Catalog::builtin().unwrap();
    let len = catalog.len();
    let mut formula = cardioid();
    formula.id = String::new();

    assert!(matches!(
        catalog.admit(formula),
        Err(ExplorerError::Formula(FormulaError::EmptyId))
    ));
    assert_eq!(catalog.len(), len);
}

#[test]
fn test_strict_policy_rejects_uncovered_identifiers() {
    let mut catalog = Catalog::builtin().unwrap().with_policy(AdmissionPolicy::Strict);
    assert_eq!(catalog.admit(cardioid()).unwrap(), Admission::Inserted);

    let missing = Formula::new("missing", "Missing", "Curves", "a * (1 - cos(b * x))")
        .with_param(Parameter::new("a", 1.0, 0.1, 5.0, 0.1));
    let err = catalog.admit(missing).unwrap_err();
    assert!(err.to_string().contains("undeclared identifiers: b"));
}

#[test]
fn test_search_and_grouping() {
    let catalog = Catalog::builtin().unwrap();

    let ids: Vec<&str> = catalog.search("GAS").iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["boyle", "charles", "van_der_waals"]);

    let groups = catalog.grouped("");
    assert_eq!(groups.len(), catalog.categories().len());
    let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
    assert_eq!(total, catalog.len());
    assert_eq!(groups[0].0, "Basic Algebra");
    assert_eq!(groups[0].1.len(), 6);
}

#[test]
fn test_json_export_round_trip() {
    let catalog = Catalog::builtin().unwrap();
    let json = catalog.to_json().unwrap();
    let formulas: Vec<Formula> = serde_json::from_str(&json).unwrap();
    assert_eq!(formulas.len(), catalog.len());
    assert_eq!(&formulas[12], catalog.get("logistic").unwrap());
}
