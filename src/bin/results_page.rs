use anyhow::{Context, Result, bail};
use solve_results_lib::infrastructure::view::render_text;
use solve_results_lib::{
    AppConfig, AppError, ConnectionPool, DisplayRow, InMemoryResultsTable, ReplicatedDocument, ResultsPage,
    SqliteAttemptStore, StaticViewHost, init_logging,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};
use tokio::runtime::Runtime;

const SYNC_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Delete(String),
    Import(PathBuf),
}

#[derive(Debug, Clone)]
struct CliOptions {
    command: Command,
    json: bool,
    database_url: Option<String>,
}

fn usage() -> &'static str {
    "Usage: results_page [--database-url <url>] [--json] <list | delete <id> | import <file.json>>"
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;

    let mut config = AppConfig::from_env();
    if let Some(url) = &options.database_url {
        config.database.url = url.clone();
    }
    config
        .validate()
        .map_err(|err| anyhow::anyhow!("Invalid configuration: {err}"))?;

    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(run(&config, &options))
}

async fn run(config: &AppConfig, options: &CliOptions) -> Result<()> {
    let pool = ConnectionPool::new(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open {}", config.database.url))?;
    let store = Arc::new(SqliteAttemptStore::new(
        pool.clone(),
        config.sync.channel_capacity,
    ));
    store
        .initialize()
        .await
        .context("Failed to apply database migrations")?;

    let table = Arc::new(InMemoryResultsTable::new());
    let host = StaticViewHost::new().with_table(config.view.mount_selector.clone(), table);
    let page = ResultsPage::load(config, store.clone(), &host)
        .await
        .context("Failed to load results page")?;

    match &options.command {
        Command::List => {}
        Command::Delete(id) => {
            let rows = page.rows().await;
            let row = find_row(&rows, id)?;
            let outcome = page.delete(&row.delete).await;
            if let Some(err) = outcome.store_error {
                eprintln!("Removal failed: {err}");
            }
        }
        Command::Import(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let documents: Vec<ReplicatedDocument> = serde_json::from_str(&data)
                .with_context(|| format!("Invalid attempt documents in {}", path.display()))?;

            let rendered_before = page.reconciler().stats().rendered;
            let batch = store.apply_remote_batch(documents).await?;
            eprintln!("Applied {} of the imported documents", batch.len());
            if !batch.is_empty() {
                wait_for_render(&page, rendered_before).await?;
            }
        }
    }

    print_rows(&page.rows().await, options.json)?;
    pool.close().await;
    Ok(())
}

fn find_row<'a>(rows: &'a [DisplayRow], id: &str) -> Result<&'a DisplayRow, AppError> {
    rows.iter()
        .find(|row| row.attempt_id().as_str() == id)
        .ok_or_else(|| AppError::NotFound(format!("No rendered attempt with id {id}")))
}

async fn wait_for_render(page: &ResultsPage, rendered_before: u64) -> Result<()> {
    tokio::time::timeout(SYNC_WAIT, async {
        while page.reconciler().stats().rendered <= rendered_before {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .context("Timed out waiting for the results table to refresh")
}

fn print_rows(rows: &[DisplayRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print!("{}", render_text(rows));
    }
    Ok(())
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut json = false;
    let mut database_url: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => {
                json = true;
            }
            "--database-url" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--database-url requires a value\n{}", usage())
                })?;
                database_url = Some(value);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                bail!("Unknown argument: {other}\n{}", usage());
            }
            _ => positional.push(arg),
        }
    }

    let command = match positional.as_slice() {
        [] => Command::List,
        [cmd] if cmd == "list" => Command::List,
        [cmd, id] if cmd == "delete" => Command::Delete(id.clone()),
        [cmd, path] if cmd == "import" => Command::Import(PathBuf::from(path)),
        _ => bail!("Unexpected arguments: {}\n{}", positional.join(" "), usage()),
    };

    Ok(CliOptions {
        command,
        json,
        database_url,
    })
}
