//! sqltree CLI
//!
//! Command-line front end for inspecting how oxide-sqltree tokenizes and
//! folds SQL.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_sqltree::schema::Schemas;
use oxide_sqltree::{Ast, ExecutionContext, NodeId, NodeKind, ParserConfig};

/// Inspect SQL through the oxide-sqltree parser.
#[derive(Parser)]
#[command(name = "sqltree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Parser configuration file (JSON).
    #[arg(short, long, env = "SQLTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the SQL comes from.
#[derive(clap::Args)]
struct Input {
    /// SQL text.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    sql: Option<String>,

    /// Read the SQL from a file instead.
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> anyhow::Result<String> {
        match (&self.sql, &self.file) {
            (Some(sql), _) => Ok(sql.clone()),
            (None, Some(path)) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
            (None, None) => anyhow::bail!("no SQL given"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print one `line,offset,KIND` line per token.
    Tokens {
        #[command(flatten)]
        input: Input,
    },

    /// Print the tree of every statement.
    Ast {
        #[command(flatten)]
        input: Input,
    },

    /// Regenerate SQL from the tree of every statement.
    Format {
        #[command(flatten)]
        input: Input,
    },

    /// Print the equations AND-ed together in each statement.
    Equations {
        #[command(flatten)]
        input: Input,
    },

    /// Bind every column reference to a table of a catalog.
    Resolve {
        /// Catalog file (JSON).
        #[arg(long)]
        catalog: PathBuf,

        #[command(flatten)]
        input: Input,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => load_json::<ParserConfig>(path)?,
        None => ParserConfig::default(),
    };
    let parser = oxide_sqltree::Parser::from_config(&config);
    debug!(rules = parser.engine().mutator_names().count(), "Parser ready");

    match cli.command {
        Commands::Tokens { input } => {
            let sql = input.read()?;
            let tokens = report(parser.tokenize(&sql))?;
            println!("{}", tokens.dump());
        }

        Commands::Ast { input } => {
            let ast = report(parser.parse(&input.read()?))?;
            println!("{}", ast.dump_statements());
        }

        Commands::Format { input } => {
            let ast = report(parser.parse(&input.read()?))?;
            for statement in ast.statements() {
                println!("{};", ast.to_sql(statement));
            }
        }

        Commands::Equations { input } => {
            let ast = report(parser.parse(&input.read()?))?;
            for statement in ast.statements() {
                let equations = ast.fundamental_equations(statement);
                if equations.is_empty() {
                    info!("No equations in {}", ast.kind(statement));
                }
                for equation in equations {
                    println!("{}", ast.to_sql(equation));
                }
            }
        }

        Commands::Resolve { catalog, input } => {
            let schemas = load_json::<Schemas>(&catalog)?;
            let ast = report(parser.parse(&input.read()?))?;
            for statement in ast.statements() {
                if !matches!(ast.kind(statement), NodeKind::Select | NodeKind::Update) {
                    info!("Skipping {}", ast.kind(statement));
                    continue;
                }
                let context = report(ExecutionContext::from_statement(&schemas, &ast, statement).map_err(Into::into))?;
                for column in own_columns(&ast, statement) {
                    let resolved = report(context.resolve_column(&ast, column).map_err(Into::into))?;
                    println!(
                        "{} -> {}.{}",
                        ast.to_sql(column),
                        resolved.table.name,
                        resolved.column.name
                    );
                }
            }
        }
    }

    Ok(())
}

/// Columns of a statement, leaving out those of nested subqueries.
fn own_columns(ast: &Ast, statement: NodeId) -> Vec<NodeId> {
    let mut columns = Vec::new();
    ast.walk(statement, &mut |ast, node, _| {
        if ast.kind(node) != NodeKind::Column {
            return;
        }
        let owner = ast
            .ancestors(node)
            .find(|&id| matches!(ast.kind(id), NodeKind::Select | NodeKind::Update));
        if owner == Some(statement) {
            columns.push(node);
        }
    });
    columns
}

/// Prints the location of lexing and parsing errors before handing the
/// error back.
fn report<T>(result: oxide_sqltree::Result<T>) -> anyhow::Result<T> {
    result.map_err(|err| {
        if let Some(dump) = err.location_dump() {
            eprintln!("{dump}");
        }
        err.into()
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
