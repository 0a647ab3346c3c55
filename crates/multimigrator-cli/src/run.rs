//! Command dispatch for the `multimigrator` binary.
//!
//! Grounded on `pgorm_cli::migrate_cmd`'s `connect`/`run_up` shape: resolve inputs, open one
//! connection, dispatch, report.

use crate::cli::{CodegenArgs, Command, UpArgs};
use anyhow::Context;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = crate::cli::parse_args(&args)?;
    match cmd {
        Command::Help(topic) => {
            crate::cli::print_help(topic);
            Ok(())
        }
        Command::Up(args) => run_up(args).await,
        Command::Codegen(args) => run_codegen(args),
    }
}

fn resolve_database_url(explicit: Option<String>) -> anyhow::Result<String> {
    if let Some(url) = explicit {
        return Ok(url);
    }
    std::env::var("DATABASE_URL")
        .context("database URL is required: pass --conn-str or set $DATABASE_URL")
}

async fn connect(database_url: &str) -> anyhow::Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, tokio_postgres::NoTls)
        .await
        .with_context(|| format!("failed to connect to database: {database_url}"))?;

    tokio::spawn(async move {
        if let Err(err) = connection.await {
            eprintln!("connection error: {err}");
        }
    });

    Ok(client)
}

fn load_schema_ordering(dir: &std::path::Path) -> anyhow::Result<Vec<String>> {
    let loaded = multimigrator::manifest::load(dir)
        .with_context(|| format!("failed to load ordering manifest under {}", dir.display()))?;
    Ok(loaded.manifest.schema_ordering)
}

async fn run_up(args: UpArgs) -> anyhow::Result<()> {
    let schemata = load_schema_ordering(&args.migrations)?;
    let database_url = resolve_database_url(args.conn_str)?;
    let mut client = connect(&database_url).await?;

    #[cfg(feature = "tracing")]
    tracing::info!(level = %args.level, migrations = %args.migrations.display(), "starting migration run");

    let applied = multimigrator::up(&args.migrations, &schemata, &args.level, &mut client, args.refuse_dirty)
        .await
        .context("migration run failed")?;

    println!("applied {applied} migration step(s)");
    Ok(())
}

fn run_codegen(args: CodegenArgs) -> anyhow::Result<()> {
    let schemata = load_schema_ordering(&args.migrations)?;
    let rendered = multimigrator::codegen::generate_schema_level(&args.package, &schemata)
        .context("failed to generate schema level enum")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
