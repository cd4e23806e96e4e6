use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{BotConfig, ConfigOverrides};
use kb_catalog::KnowledgeBase;
use kb_codec::{decode, encode, Namespace};
use kb_engine::Planner;
use kb_protocol::{serialize_json, serialize_json_pretty, Reply, TOKEN_MAX_CHARS};
use kb_search::KeywordResolver;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
mod poller;
pub mod telegram;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "kb-bot")]
#[command(about = "Homeline knowledge-base chat bot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (default: ./kb-bot.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Documents root (env: KB_BOT_DOCUMENTS)
    #[arg(long, global = true)]
    documents: Option<PathBuf>,

    /// Catalog TOML instead of the bundled one (env: KB_BOT_CATALOG)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Long-poll the Bot API and answer users
    Run,

    /// Validate the catalog and the documents on disk, print a JSON report
    Check(CheckArgs),

    /// Resolve free text offline and print the reply as JSON
    Resolve(ResolveArgs),

    /// Print the JSON schema of a reply
    Schema,
}

#[derive(Args)]
struct CheckArgs {
    /// Do not fail when documents are missing on disk
    #[arg(long)]
    allow_missing: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Message text, as a user would type it
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // reqwest/hyper are chatty at debug
    if !cli.verbose {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = BotConfig::load(cli.config.as_deref())?;
    config.apply_env();
    config.apply_overrides(ConfigOverrides {
        documents_dir: cli.documents,
        catalog: cli.catalog,
    });
    config.validate()?;
    log::debug!("{config:?}");

    match cli.command {
        Commands::Run => {
            let kb = load_knowledge_base(&config)?;
            poller::run(&config, Arc::new(kb)).await?;
        }
        Commands::Check(args) => run_check(&config, args)?,
        Commands::Resolve(args) => run_resolve(&config, args)?,
        Commands::Schema => {
            let schema = schemars::schema_for!(Reply);
            print_stdout(&serialize_json_pretty(&schema)?)?;
        }
    }
    Ok(())
}

fn load_knowledge_base(config: &BotConfig) -> Result<KnowledgeBase> {
    match &config.catalog {
        Some(path) => KnowledgeBase::from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(KnowledgeBase::builtin()),
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serialize_json_pretty(value)?
    } else {
        serialize_json(value)?
    };
    print_stdout(&json)
}

#[derive(Debug, Serialize)]
struct CheckReport {
    ok: bool,
    title: String,
    categories: usize,
    documents: usize,
    keywords: usize,
    documents_dir: PathBuf,
    missing: Vec<PathBuf>,
    token_errors: Vec<String>,
}

fn run_check(config: &BotConfig, args: CheckArgs) -> Result<()> {
    let kb = load_knowledge_base(config)?;
    let catalog = kb.catalog();

    let mut missing = Vec::new();
    let mut token_errors = Vec::new();
    for doc in catalog.documents() {
        let path = config.documents_dir.join(catalog.relative_path(&doc));
        if !path.is_file() {
            missing.push(path);
        }
        for namespace in [Namespace::Search, Namespace::File] {
            match encode(namespace, &doc) {
                Ok(token) if token.len() > TOKEN_MAX_CHARS => {
                    token_errors.push(format!("{token}: longer than {TOKEN_MAX_CHARS}"));
                }
                Ok(token) => match decode(&token, catalog) {
                    Ok(decoded) if decoded == doc => {}
                    Ok(decoded) => token_errors.push(format!(
                        "{token}: decodes to '{}', expected '{}'",
                        decoded.filename(),
                        doc.filename()
                    )),
                    Err(err) => token_errors.push(format!("{token}: {err}")),
                },
                Err(err) => token_errors.push(format!("{}: {err}", doc.filename())),
            }
        }
    }

    let ok = token_errors.is_empty() && (args.allow_missing || missing.is_empty());
    let report = CheckReport {
        ok,
        title: kb.title().to_string(),
        categories: catalog.categories().len(),
        documents: catalog.document_count(),
        keywords: kb.keywords().len(),
        documents_dir: config.documents_dir.clone(),
        missing,
        token_errors,
    };
    for path in &report.missing {
        log::warn!("missing document: {}", path.display());
    }
    emit(&report, args.pretty)?;
    if !report.ok {
        anyhow::bail!("catalog check failed");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    query: String,
    matched_keywords: Vec<String>,
    filenames: Vec<String>,
    reply: Reply,
}

fn run_resolve(config: &BotConfig, args: ResolveArgs) -> Result<()> {
    let kb = Arc::new(load_knowledge_base(config)?);
    let text = args.text.join(" ");
    let resolution = KeywordResolver::new(kb.keywords()).resolve(&text);
    let planner = Planner::new(Arc::clone(&kb), config.documents_dir.clone());
    let planned = planner.plan_message("kb-bot", &text);
    emit(
        &ResolveOutput {
            query: resolution.query,
            matched_keywords: resolution.matched_keywords,
            filenames: resolution.filenames,
            reply: planned.turn.reply,
        },
        args.pretty,
    )
}
