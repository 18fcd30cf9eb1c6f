//! Tests for the predicate pushdown (DNF) target

use filter_compiler::{DnfCondition, DnfOperator, DnfValue, FilterError, to_pushdown_dnf};
use filter_syntax::Literal;

fn dnf(filter: &str) -> Vec<Vec<DnfCondition>> {
    to_pushdown_dnf(filter).unwrap_or_else(|e| panic!("Failed to compile {filter:?}: {e}"))
}

fn cond(column: &str, operator: DnfOperator, value: impl Into<DnfValue>) -> DnfCondition {
    DnfCondition::new(column, operator, value)
}

#[test]
fn test_single_condition() {
    assert_eq!(
        dnf("a.column != 0"),
        vec![vec![cond("a.column", DnfOperator::NotEqual, 0i64)]]
    );
}

#[test]
fn test_conjunctions_in_disjunction() {
    assert_eq!(
        dnf("a > 1 and b <= 3 or c = 'abc'"),
        vec![
            vec![
                cond("a", DnfOperator::GreaterThan, 1i64),
                cond("b", DnfOperator::LessOrEqual, 3i64),
            ],
            vec![cond("c", DnfOperator::Equal, "abc")],
        ]
    );
}

#[test]
fn test_grouped_conjunction() {
    assert_eq!(
        dnf("(a = 1 AND b = 2) OR c = 3"),
        vec![
            vec![
                cond("a", DnfOperator::Equal, 1i64),
                cond("b", DnfOperator::Equal, 2i64),
            ],
            vec![cond("c", DnfOperator::Equal, 3i64)],
        ]
    );
}

#[test]
fn test_disjunction_of_bare_conditions() {
    let result = dnf("a = 1 OR b = 2.5 OR c IS NOT NULL");
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|group| group.len() == 1));
    assert_eq!(result[1][0].as_tuple(), ("b", "=", &DnfValue::Float(2.5)));
    assert_eq!(result[2][0].as_tuple(), ("c", "!=", &DnfValue::from("null")));
}

#[test]
fn test_null_checks() {
    assert_eq!(
        dnf("A IS NULL"),
        vec![vec![cond("A", DnfOperator::Equal, DnfValue::NULL)]]
    );
    assert_eq!(
        dnf("A IS NOT NULL"),
        vec![vec![cond("A", DnfOperator::NotEqual, DnfValue::NULL)]]
    );
}

#[test]
fn test_membership_uses_sets() {
    let expected = DnfValue::set([10, 20, 30].map(Literal::Integer));
    assert_eq!(
        dnf("a in (10,20,30)"),
        vec![vec![cond("a", DnfOperator::In, expected.clone())]]
    );
    assert_eq!(
        dnf("a NOT IN (30, 10, 20, 10)"),
        vec![vec![cond("a", DnfOperator::NotIn, expected)]]
    );
}

#[test]
fn test_literal_classification() {
    let values: Vec<_> = dnf("a = 5 AND b = 5.5 AND c = 5e2")
        .remove(0)
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(
        values,
        [DnfValue::Int(5), DnfValue::Float(5.5), DnfValue::Float(500.0)]
    );
}

#[test]
fn test_negation_is_unsupported() {
    for filter in ["NOT a > 5", "NOT a > 5 AND b < 2", "b < 2 OR NOT a IS NULL"] {
        let err = to_pushdown_dnf(filter).unwrap_err();
        let FilterError::UnsupportedOperator { operator, .. } = &err else {
            panic!("expected unsupported operator for {filter:?}, got {err:?}");
        };
        assert_eq!(operator, "NOT");
    }
}

#[test]
fn test_column_comparison_is_structure_error() {
    let err = to_pushdown_dnf("col1 = col2").unwrap_err();
    let FilterError::Structure { expression, .. } = &err else {
        panic!("expected structure error, got {err:?}");
    };
    assert_eq!(expression, "(= Column<col1> Column<col2>)");
}

#[test]
fn test_disjunction_under_conjunction_is_structure_error() {
    let err = to_pushdown_dnf("a = 1 AND (b = 2 OR c = 3)").unwrap_err();
    assert!(matches!(err, FilterError::Structure { .. }), "{err:?}");
    assert!(err.to_string().contains("DNF"), "{err}");
}

#[test]
fn test_json_shape() {
    let json = serde_json::to_string(&dnf("a > 1 and b <= 3 or c = 'abc'")).unwrap();
    assert_eq!(json, r#"[[["a",">",1],["b","<=",3]],[["c","=","abc"]]]"#);

    let json = serde_json::to_value(dnf("a in (10, 10)")).unwrap();
    assert_eq!(json, serde_json::json!([[["a", "in", [10]]]]));
}

#[test]
fn test_signed_zeros_are_one_member() {
    let result = dnf("a IN (0.0, -0.0)");
    let DnfValue::Set(members) = &result[0][0].value else {
        panic!("expected a set, got {:?}", result[0][0].value);
    };
    assert_eq!(members.len(), 1);
}

#[test]
fn test_set_json_is_sorted() {
    let json = serde_json::to_string(&dnf("a NOT IN ('z', 30, 'b', 10, 20)")).unwrap();
    assert_eq!(json, r#"[[["a","not in",[10,20,30,"b","z"]]]]"#);
}
