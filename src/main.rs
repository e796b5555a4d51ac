//! sqleval - evaluate SQL scalar expressions from the command line

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};
use sqleval::access::{ColumnCache, Value};
use sqleval::expression::{evaluate_expression, like_match, translate_like, Expression};

/// sqleval - typed scalar-expression evaluator
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a bincode-encoded expression tree
    Eval {
        /// File holding the encoded expression tree
        tree: PathBuf,

        /// Column value as [table.]name=<type>:<value>, e.g. t1.id=int:5
        #[arg(short, long = "column", value_name = "BINDING")]
        columns: Vec<String>,

        /// Table assigned to bindings without a table qualifier
        #[arg(short = 't', long, default_value = "row")]
        default_table: String,
    },

    /// Test a subject string against a LIKE pattern
    Like { subject: String, pattern: String },

    /// Print the regular expression a LIKE pattern translates to
    Translate { pattern: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Eval {
            tree,
            columns,
            default_table,
        } => {
            let expr = load_expression(&tree)?;
            debug!("Loaded expression: {}", expr);

            let mut cache = ColumnCache::new();
            for binding in &columns {
                let (table, column, value) = parse_column_binding(binding, &default_table)?;
                cache.insert(column, table, value);
            }
            info!("Evaluating with {} cached column values", cache.len());

            let value = evaluate_expression(&expr, &cache)
                .with_context(|| format!("Failed to evaluate {}", expr))?;
            println!("{}", value);
        }
        Command::Like { subject, pattern } => {
            println!("{}", like_match(&subject, &pattern));
        }
        Command::Translate { pattern } => {
            println!("{}", translate_like(&pattern));
        }
    }

    Ok(())
}

/// Read an expression tree handed over by the parser
fn load_expression(path: &Path) -> Result<Expression> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read expression file {}", path.display()))?;
    bincode::deserialize(&bytes).context("Failed to decode expression tree")
}

/// Parse `[table.]name=<type>:<value>` into `(table, column, value)`
fn parse_column_binding(binding: &str, default_table: &str) -> Result<(String, String, Value)> {
    let (target, value) = binding
        .split_once('=')
        .ok_or_else(|| anyhow!("Column binding '{}' is missing '='", binding))?;

    let (table, column) = match target.split_once('.') {
        Some((table, column)) => (table, column),
        None => (default_table, target),
    };
    if column.is_empty() || table.is_empty() {
        bail!("Column binding '{}' has an empty name", binding);
    }

    Ok((table.to_string(), column.to_string(), parse_value(value)?))
}

/// Parse `<type>:<value>`, or `null`
fn parse_value(text: &str) -> Result<Value> {
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    let (kind, raw) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("Value '{}' must look like <type>:<value>", text))?;

    let value = match kind.to_ascii_lowercase().as_str() {
        "int" => Value::Int(raw.parse().context("Invalid int value")?),
        "double" => Value::Double(raw.parse().context("Invalid double value")?),
        "bool" => Value::Bool(raw.parse().context("Invalid bool value")?),
        "str" | "string" => Value::String(raw.to_string()),
        other => bail!("Unknown value type '{}'", other),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_value() -> Result<()> {
        assert_eq!(parse_value("int:-5")?, Value::Int(-5));
        assert_eq!(parse_value("double:1.5")?, Value::Double(1.5));
        assert_eq!(parse_value("bool:true")?, Value::Bool(true));
        assert_eq!(parse_value("str:a:b")?, Value::String("a:b".to_string()));
        assert_eq!(parse_value("NULL")?, Value::Null);

        assert!(parse_value("int:abc").is_err());
        assert!(parse_value("date:2024-01-01").is_err());
        assert!(parse_value("42").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_column_binding() -> Result<()> {
        assert_eq!(
            parse_column_binding("t1.id=int:1", "row")?,
            ("t1".to_string(), "id".to_string(), Value::Int(1))
        );
        assert_eq!(
            parse_column_binding("name=str:bob", "row")?,
            ("row".to_string(), "name".to_string(), Value::String("bob".to_string()))
        );
        assert!(parse_column_binding("id", "row").is_err());
        assert!(parse_column_binding("t1.=int:1", "row").is_err());
        Ok(())
    }

    #[test]
    fn test_load_and_evaluate_expression() -> Result<()> {
        let expr = Expression::and(
            Expression::eq(Expression::qualified_column("t1", "id"), Expression::int(1)),
            Expression::like(Expression::column("name"), Expression::string("b%")),
        );

        let mut file = NamedTempFile::new()?;
        file.write_all(&bincode::serialize(&expr)?)?;
        file.flush()?;

        let loaded = load_expression(file.path())?;
        assert_eq!(loaded, expr);

        let mut cache = ColumnCache::new();
        for binding in ["t1.id=int:1", "t2.id=int:2", "name=str:bob"] {
            let (table, column, value) = parse_column_binding(binding, "row")?;
            cache.insert(column, table, value);
        }
        assert_eq!(evaluate_expression(&loaded, &cache)?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn test_load_garbage_fails() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&[0xff, 0xff, 0xff, 0xff, 0xff])?;
        file.flush()?;
        assert!(load_expression(file.path()).is_err());
        Ok(())
    }
}
