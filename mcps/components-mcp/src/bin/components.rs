//! Components CLI
//!
//! Loads the corpus once and answers a single query, printing JSON to stdout.
//!
//! Usage:
//!   components frameworks
//!   components list hyperui --category application
//!   components get hyperui application modals 1-dark
//!   components path daisyui/all/components/modal --raw
//!   components search modal dark --framework hyperui --limit 5
//!   components status
//!
//! Exit status: 0 success, 1 unknown framework or component (or a cancelled
//! search), 2 corpus unavailable, 3 malformed path or empty query.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use components_mcp::{
    CatalogHandle, ComponentRecord, ComponentsConfig, QueryEngine, QueryError, SearchRequest,
};

const EXIT_FAILURE: u8 = 1;
const EXIT_CORPUS_UNAVAILABLE: u8 = 2;

#[derive(Parser)]
#[command(name = "components")]
#[command(about = "Query the frontend component reference index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus root directory
    #[arg(long, env = "COMPONENTS_CORPUS_DIR", global = true)]
    corpus: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List frameworks
    Frameworks,
    /// List the components of a framework
    List {
        framework: String,
        /// Restrict to one category
        #[arg(long, short)]
        category: Option<String>,
    },
    /// Get a component by its fields
    Get {
        framework: String,
        category: String,
        component_type: String,
        variant: String,
        /// Print only the component content
        #[arg(long)]
        raw: bool,
    },
    /// Get a component by framework/category/component_type/variant
    Path {
        path: String,
        /// Print only the component content
        #[arg(long)]
        raw: bool,
    },
    /// Search components by keywords
    Search {
        /// Keywords; all must match
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, short)]
        framework: Option<String>,
        #[arg(long, short)]
        limit: Option<usize>,
        /// Include component content in results
        #[arg(long)]
        content: bool,
        /// Search time budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Show load status and warnings
    Status,
}

/// A failed invocation: message for stderr and process exit status
struct Failure {
    message: String,
    code: u8,
}

impl From<QueryError> for Failure {
    fn from(e: QueryError) -> Self {
        Self {
            code: e.exit_code(),
            message: e.to_string(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    if let Err(e) = mcp_common::init_tracing_at("components_mcp", level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("error: {}", failure.message);
            ExitCode::from(failure.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), Failure> {
    let config = load_config(cli.corpus)?;
    let loader = config.loader().map_err(unavailable)?;

    let handle = Arc::new(CatalogHandle::new());
    handle.reload(&loader).map_err(unavailable)?;
    let engine = QueryEngine::new(handle).with_page_size(config.page_size);

    match cli.command {
        Commands::Frameworks => print_json(&engine.list_frameworks()?),
        Commands::List {
            framework,
            category,
        } => print_json(&engine.list_components(&framework, category.as_deref())?),
        Commands::Get {
            framework,
            category,
            component_type,
            variant,
            raw,
        } => print_record(
            &engine.get_component(&framework, &category, &component_type, &variant)?,
            raw,
        ),
        Commands::Path { path, raw } => print_record(&engine.get_component_by_path(&path)?, raw),
        Commands::Search {
            query,
            framework,
            limit,
            content,
            timeout_ms,
        } => {
            let request = SearchRequest {
                query: query.join(" "),
                framework,
                limit,
                include_content: content,
            };
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.search_timeout());
            let hits = engine.search_components(
                &request,
                CancellationToken::new(),
                Some(Instant::now() + timeout),
            )?;
            print_json(&hits)
        }
        Commands::Status => print_json(&engine.status()),
    }
}

fn load_config(corpus: Option<PathBuf>) -> Result<ComponentsConfig, Failure> {
    let mut config = ComponentsConfig::load().map_err(|e| Failure {
        message: e.to_string(),
        code: EXIT_FAILURE,
    })?;
    if let Some(corpus) = corpus {
        config.corpus_root = Some(corpus);
    }
    Ok(config)
}

fn unavailable(e: impl std::fmt::Display) -> Failure {
    Failure {
        message: e.to_string(),
        code: EXIT_CORPUS_UNAVAILABLE,
    }
}

fn print_record(record: &ComponentRecord, raw: bool) -> Result<(), Failure> {
    if raw {
        print!("{}", record.content);
        return Ok(());
    }
    print_json(record)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Failure> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Failure {
        message: format!("failed to serialize output: {}", e),
        code: EXIT_FAILURE,
    })?;
    println!("{}", json);
    Ok(())
}
