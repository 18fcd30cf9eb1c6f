use crate::{error::CliError, output};
use clap::{Args, Subcommand};
use filter_compiler::{FilterError, ReadQuery, to_prefix_notation, to_psql, to_pushdown_dnf};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a filter in prefix notation
    Prefix {
        #[command(flatten)]
        input: FilterInput,
    },
    /// Print the predicate pushdown form (DNF) of a filter as JSON
    Dnf {
        #[command(flatten)]
        input: FilterInput,

        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    /// Print a filter as a PostgreSQL condition
    Psql {
        #[command(flatten)]
        input: FilterInput,
    },
    /// Print the syntax tree of a filter as JSON
    Ast {
        #[command(flatten)]
        input: FilterInput,
    },
    /// Print the SELECT statement reading a table
    Query {
        #[arg(long, help = "Table name, optionally prefixed by a schema")]
        table: String,

        #[arg(long, value_delimiter = ',', help = "Comma separated columns to select")]
        columns: Vec<String>,

        #[arg(long, help = "Row filter")]
        filter: Option<String>,

        #[arg(long, help = "Select distinct rows only")]
        distinct: bool,

        #[arg(long, help = "Maximum number of rows")]
        limit: Option<u64>,

        #[arg(long, help = "Number of randomly sampled rows")]
        sample: Option<u64>,
    },
}

/// A filter given inline or read from a file
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct FilterInput {
    /// Filter expression, e.g. "a > 1 AND b IS NULL"
    pub filter: Option<String>,

    #[arg(long, value_name = "PATH", help = "Read the filter from a file")]
    pub file: Option<PathBuf>,
}

impl FilterInput {
    pub fn read(&self) -> Result<String, CliError> {
        match (&self.filter, &self.file) {
            (Some(filter), _) => Ok(filter.clone()),
            (None, Some(path)) => {
                debug!(path = %path.display(), "Reading filter file");
                let text = std::fs::read_to_string(path).map_err(|source| CliError::FilterFileRead {
                    path: path.clone(),
                    source,
                })?;
                Ok(text.trim_end().to_string())
            }
            (None, None) => Err(CliError::MissingFilter),
        }
    }
}

impl Commands {
    /// Runs the command and returns what should be printed.
    pub fn run(self) -> Result<String, CliError> {
        match self {
            Commands::Prefix { input } => Ok(to_prefix_notation(&input.read()?)?),
            Commands::Dnf { input, pretty } => {
                let dnf = to_pushdown_dnf(&input.read()?)?;
                output::to_json(&dnf, pretty)
            }
            Commands::Psql { input } => Ok(to_psql(&input.read()?)?),
            Commands::Ast { input } => {
                let filter = input.read()?;
                let expr = filter_syntax::parse(&filter).map_err(FilterError::from)?;
                output::to_json(&expr, true)
            }
            Commands::Query {
                table,
                columns,
                filter,
                distinct,
                limit,
                sample,
            } => {
                info!(%table, "Composing read query");
                let mut query = ReadQuery::new(&table).columns(columns).distinct(distinct);
                if let Some(filter) = &filter {
                    query = query.filter(filter);
                }
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                if let Some(sample) = sample {
                    query = query.sample(sample);
                }
                Ok(query.to_sql()?)
            }
        }
    }
}
