//! Tests for large filters: long chains and deep nesting

use filter_compiler::{FilterError, to_prefix_notation, to_psql, to_pushdown_dnf};
use filter_syntax::builder::MAX_NESTING_DEPTH;

const CHAIN_LEN: usize = 50_000;

fn chain(connective: &str) -> String {
    (0..CHAIN_LEN)
        .map(|i| format!("c{i} = {i}"))
        .collect::<Vec<_>>()
        .join(connective)
}

#[test]
fn test_long_conjunction_chain() {
    let filter = chain(" AND ");

    let prefix = to_prefix_notation(&filter).unwrap();
    assert!(prefix.starts_with(&"(AND ".repeat(CHAIN_LEN - 1)));
    assert!(prefix.ends_with("(= Column<c49999> 49999))"));

    let dnf = to_pushdown_dnf(&filter).unwrap();
    assert_eq!(dnf.len(), 1);
    assert_eq!(dnf[0].len(), CHAIN_LEN);
    assert_eq!(dnf[0][CHAIN_LEN - 1].column, "c49999");

    let sql = to_psql(&filter).unwrap();
    assert!(sql.starts_with(r#""c0" = 0 AND "c1" = 1 AND"#));
    assert!(sql.ends_with(r#"AND "c49999" = 49999"#));
}

#[test]
fn test_long_disjunction_chain() {
    let filter = chain(" OR ");

    let dnf = to_pushdown_dnf(&filter).unwrap();
    assert_eq!(dnf.len(), CHAIN_LEN);
    assert!(dnf.iter().all(|group| group.len() == 1));

    assert!(to_prefix_notation(&filter).unwrap().starts_with("(OR (OR "));
    assert_eq!(to_psql(&filter).unwrap().matches(" OR ").count(), CHAIN_LEN - 1);
}

#[test]
fn test_long_chain_errors_are_reported() {
    let filter = format!("{} AND NOT z = 1", chain(" AND "));
    let err = to_pushdown_dnf(&filter).unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedOperator { .. }), "{err:?}");

    let filter = format!("{} AND (y = 1 OR z = 1)", chain(" AND "));
    let err = to_pushdown_dnf(&filter).unwrap_err();
    assert!(matches!(err, FilterError::Structure { .. }), "{err:?}");
}

#[test]
fn test_nesting_up_to_limit() {
    let depth = MAX_NESTING_DEPTH - 1;
    let filter = format!("{}x = 0{}", "a = 1 AND (".repeat(depth), ")".repeat(depth));

    let innermost = format!("(= Column<x> 0)){}", ")".repeat(depth - 1));
    assert!(to_prefix_notation(&filter).unwrap().ends_with(&innermost));
    assert!(to_psql(&filter).unwrap().ends_with(r#""x" = 0"#));
    assert_eq!(to_pushdown_dnf(&filter).unwrap()[0].len(), depth + 1);
}

#[test]
fn test_nesting_beyond_limit_is_a_syntax_error() {
    let filter = format!("{}a = 1{}", "(".repeat(20_000), ")".repeat(20_000));

    for result in [to_prefix_notation(&filter), to_psql(&filter)] {
        let Err(FilterError::Syntax(err)) = &result else {
            panic!("expected syntax error, got {result:?}");
        };
        assert_eq!(err.column, MAX_NESTING_DEPTH + 1);
        assert_eq!(err.token.as_deref(), Some("("));
        assert!(err.message.len() < 100, "{}", err.message);
    }
}
