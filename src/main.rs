use anyhow::{Context, bail};
use clap::Parser;
use docsify_search::builder::{FsSource, PassReport, sidebar_links};
use docsify_search::cli::{Cli, Commands};
use docsify_search::config::SearchConfig;
use docsify_search::debounce::{self, DEFAULT_DELAY};
use docsify_search::error::Result;
use docsify_search::session::{SearchSession, initial_query};
use docsify_search::store::FileStore;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

type Session = SearchSession<FileStore, FsSource>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    docsify_search::tracing::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SearchConfig::default(),
    };
    let store_path = match &cli.store {
        Some(path) => path.clone(),
        None => FileStore::default_path().context("No cache directory available; pass --store")?,
    };
    tracing::debug!("Using index storage at {}", store_path.display());

    let mut session = SearchSession::new(
        config,
        FileStore::open(store_path),
        FsSource::new(&cli.root),
    );

    match cli.command {
        Commands::Index { sidebar } => {
            let report = prepare(&mut session, &cli.root, sidebar, &cli.route).await?;
            print_report(report.as_ref())?;
        }
        Commands::Search {
            query,
            url,
            json,
            limit,
            sidebar,
        } => {
            let query = match (query, url) {
                (Some(query), _) => query,
                (None, Some(url)) => initial_query(&url)
                    .with_context(|| format!("No search query in URL '{}'", url))?,
                (None, None) => bail!("Pass a query or --url"),
            };
            prepare(&mut session, &cli.root, sidebar, &cli.route).await?;
            print_results(&session, &query, json, limit)?;
        }
        Commands::Interactive { limit, sidebar } => {
            prepare(&mut session, &cli.root, sidebar, &cli.route).await?;
            interactive(&session, limit).await?;
        }
    }

    Ok(())
}

/// Bring the index up to date for `route`: mount with a fixed path list, or
/// navigate with the links of the sidebar file in automatic mode.
async fn prepare(
    session: &mut Session,
    root: &Path,
    sidebar: Option<PathBuf>,
    route: &str,
) -> Result<Option<PassReport>> {
    if !session.config().is_auto() {
        let report = session.mount().await.context("Failed to store search index")?;
        session.navigate(route, Vec::<String>::new()).await?;
        return Ok(report);
    }

    let sidebar = sidebar.unwrap_or_else(|| root.join("_sidebar.md"));
    let hrefs = match tokio::fs::read_to_string(&sidebar).await {
        Ok(markdown) => sidebar_links(&markdown),
        Err(e) => {
            tracing::warn!("No navigation at {}: {}", sidebar.display(), e);
            Vec::new()
        }
    };
    session
        .navigate(route, hrefs)
        .await
        .context("Failed to store search index")
}

fn print_report(report: Option<&PassReport>) -> Result<()> {
    let Some(report) = report else {
        println!("Search index is up to date");
        return Ok(());
    };

    println!(
        "Indexed {} documents ({} reused){}",
        report.fetched.len(),
        report.reused,
        if report.committed { ", index saved" } else { "" }
    );
    for (path, error) in &report.failed {
        println!("  failed {}: {}", path, error);
    }
    if !report.is_complete() {
        bail!(
            "{} documents could not be indexed; the index was not saved",
            report.failed.len()
        );
    }
    Ok(())
}

fn print_results(session: &Session, query: &str, json: bool, limit: usize) -> Result<()> {
    let outcome = session.query(query);
    let results = &outcome.results()[..outcome.results().len().min(limit)];

    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    if outcome.is_cleared() {
        return Ok(());
    }
    if results.is_empty() {
        println!("{}", session.no_data());
        return Ok(());
    }
    for result in results {
        println!("{:>3}  {}  {}", result.score, result.title, result.url);
        if !result.content.is_empty() {
            println!("     {}", result.content);
        }
    }
    Ok(())
}

/// Answer queries typed on stdin, running only the last of a burst.
async fn interactive(session: &Session, limit: usize) -> Result<()> {
    let (tx, mut queries) = debounce::channel(DEFAULT_DELAY);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if !tx.send(line) {
                break;
            }
        }
    });

    println!("{}", session.placeholder());
    while let Some(query) = queries.next_settled().await {
        print_results(session, &query, false, limit)?;
    }
    reader.await.context("stdin reader failed")?;
    Ok(())
}
