use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde_json::{Map, Value};

use acr_client::config::{self, CONFIG_FILE_NAME};
use acr_client::{Client, ClientConfig};
use acr_core::parse::document::ApiDocument;
use acr_core::{flatten, parse, CommandTable};

#[derive(Parser)]
#[command(name = "acr", about = "Runtime client for declarative API surfaces", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the flattened command surface
    List {
        /// API document files (YAML or JSON), flattened in order
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Restrict the listing to one domain
        #[arg(long)]
        domain: Option<String>,
    },

    /// Invoke a single command
    Call {
        /// API document files (YAML or JSON), flattened in order
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Base URL of the target server
        #[arg(long)]
        host: Option<String>,

        /// Command domain, e.g. "core"
        domain: String,

        /// Command member, e.g. "version"
        member: String,

        /// Argument as key=value; values parse as JSON with string fallback
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Parse and flatten documents, reporting the resulting surface
    Validate {
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { input, domain } => cmd_list(&input, domain.as_deref()),

        Commands::Call {
            input,
            host,
            domain,
            member,
            args,
        } => cmd_call(&input, host, &domain, &member, &args).await,

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "acr", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_docs(paths: &[PathBuf]) -> Result<Vec<ApiDocument>> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
        let doc = match ext {
            "json" => parse::from_json(&content)?,
            _ => parse::from_yaml(&content)?,
        };
        docs.push(doc);
    }
    Ok(docs)
}

fn load_table(paths: &[PathBuf]) -> Result<(Vec<ApiDocument>, CommandTable)> {
    let docs = load_docs(paths)?;
    let table = flatten::flatten(&docs)?;
    Ok((docs, table))
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ClientConfig>> {
    config::load_config(Path::new(CONFIG_FILE_NAME)).map_err(|e| anyhow::anyhow!(e))
}

fn cmd_list(input: &[PathBuf], domain: Option<&str>) -> Result<()> {
    let (_docs, table) = load_table(input)?;

    for name in table.domains() {
        if domain.is_some_and(|d| d != name) {
            continue;
        }
        println!("{name}");
        for command in table.commands().filter(|c| &c.domain == name) {
            let marker = if command.deprecated { " (deprecated)" } else { "" };
            println!(
                "  {:<40} {:>6} {}{}",
                command.name, command.method, command.path, marker
            );
        }
    }
    Ok(())
}

async fn cmd_call(
    input: &[PathBuf],
    host: Option<String>,
    domain: &str,
    member: &str,
    raw_args: &[String],
) -> Result<()> {
    let (docs, table) = load_table(input)?;

    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(host) = host {
        cfg.host = host;
    }
    if cfg.host.is_empty() {
        if let Some(server) = docs.iter().flat_map(|d| &d.servers).next() {
            cfg.host = server.url.clone();
        }
    }
    anyhow::ensure!(
        !cfg.host.is_empty(),
        "no host configured; pass --host or set one in {CONFIG_FILE_NAME}"
    );

    let mut args = Map::new();
    for raw in raw_args {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("invalid --arg '{raw}', expected key=value"))?;
        let value = serde_json::from_str(value).unwrap_or(Value::String(value.to_string()));
        args.insert(key.to_string(), value);
    }

    let client = Client::new(Arc::new(table), cfg);
    let body = client.call(domain, member, Some(args)).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn cmd_validate(input: &[PathBuf]) -> Result<()> {
    let (docs, table) = load_table(input)?;

    for doc in &docs {
        log::info!("loaded document '{}'", doc.info.title);
    }
    println!(
        "{} commands across {} domains",
        table.len(),
        table.domains().len()
    );
    Ok(())
}
