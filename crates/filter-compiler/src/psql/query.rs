//! Composes the `SELECT` statement a relational reader issues for a table,
//! with the row filter rendered by [`PsqlCompiler`](super::PsqlCompiler).

use super::{PsqlCompiler, quote_identifier};
use crate::{compiler::FilterCompiler, error::FilterError};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadQuery {
    table: String,
    columns: Vec<String>,
    filter: Option<String>,
    distinct: bool,
    limit: Option<u64>,
    sample: Option<u64>,
}

impl ReadQuery {
    /// Query over `table`, optionally prefixed by a schema (`schema.table`).
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    /// Columns to select. All columns when empty.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Random sample of `sample` rows.
    pub fn sample(mut self, sample: u64) -> Self {
        self.sample = Some(sample);
        self
    }

    pub fn to_sql(&self) -> Result<String, FilterError> {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            let columns = self
                .columns
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>();
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&quote_table(&self.table));

        if let Some(filter) = &self.filter {
            let expr = filter_syntax::parse(filter)?;
            sql.push_str(" WHERE ");
            sql.push_str(&PsqlCompiler::compile(&expr)?);
        }

        // A sample is already bounded, so the plain limit only narrows it.
        let (limit, sample) = match (self.limit, self.sample) {
            (Some(limit), Some(sample)) => (None, Some(limit.min(sample))),
            other => other,
        };

        if let Some(sample) = sample {
            sql.push_str(&format!(" ORDER BY RANDOM() LIMIT {sample}"));
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        debug!(table = %self.table, %sql, "Composed read query");
        Ok(sql)
    }
}

fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        let sql = ReadQuery::new("events").to_sql().unwrap();
        assert_eq!(sql, r#"SELECT * FROM "events""#);
    }

    #[test]
    fn test_schema_and_columns() {
        let sql = ReadQuery::new("public.events")
            .columns(["id", "kind"])
            .distinct(true)
            .to_sql()
            .unwrap();
        assert_eq!(sql, r#"SELECT DISTINCT "id", "kind" FROM "public"."events""#);
    }

    #[test]
    fn test_filter_and_limit() {
        let sql = ReadQuery::new("events")
            .filter("kind = 'click' AND id != 3")
            .limit(10)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            r#"SELECT * FROM "events" WHERE "kind" = 'click' AND "id" <> 3 LIMIT 10"#
        );
    }

    #[test]
    fn test_limit_caps_sample() {
        let sql = ReadQuery::new("t").limit(5).sample(20).to_sql().unwrap();
        assert_eq!(sql, r#"SELECT * FROM "t" ORDER BY RANDOM() LIMIT 5"#);

        let sql = ReadQuery::new("t").limit(50).sample(20).to_sql().unwrap();
        assert_eq!(sql, r#"SELECT * FROM "t" ORDER BY RANDOM() LIMIT 20"#);
    }

    #[test]
    fn test_invalid_filter_fails() {
        let err = ReadQuery::new("t").filter("a >").to_sql().unwrap_err();
        assert!(matches!(err, FilterError::Syntax(_)));
    }
}
