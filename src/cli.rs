use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsify-search")]
#[command(about = "Full-text search over a markdown documentation site", long_about = None)]
pub struct Cli {
    /// Documentation root containing README.md
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,
    /// Search configuration (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Index storage file [default: <cache dir>/docsify-search/storage.json]
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,
    /// Route the reader is on; selects localized texts and the namespace
    #[arg(long, global = true, default_value = "/")]
    pub route: String,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or refresh the search index
    Index {
        /// Navigation file for automatic path discovery [default: <root>/_sidebar.md]
        #[arg(long)]
        sidebar: Option<PathBuf>,
    },
    /// Run one query
    Search {
        query: Option<String>,
        /// Take the query from the `s` parameter of a page URL
        #[arg(long, conflicts_with = "query")]
        url: Option<String>,
        #[arg(long)]
        json: bool,
        #[arg(short = 'n', long, default_value = "25")]
        limit: usize,
        #[arg(long)]
        sidebar: Option<PathBuf>,
    },
    /// Read queries from stdin, one per line
    Interactive {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        sidebar: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_index_with_global_args() {
        let cli = Cli::parse_from([
            "docsify-search",
            "index",
            "--root",
            "docs",
            "--sidebar",
            "docs/_nav.md",
        ]);
        check!(cli.root == PathBuf::from("docs"));
        check!(cli.route == "/");
        let_assert!(Commands::Index { sidebar: Some(sidebar) } = cli.command);
        check!(sidebar == PathBuf::from("docs/_nav.md"));
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::parse_from(["docsify-search", "search", "install", "--json", "-n", "3"]);
        let_assert!(Commands::Search { query, url, json, limit, .. } = cli.command);
        check!(query.as_deref() == Some("install"));
        check!(url.is_none());
        check!(json);
        check!(limit == 3);
    }

    #[test]
    fn test_query_and_url_conflict() {
        let parsed = Cli::try_parse_from(["docsify-search", "search", "a", "--url", "#/?s=b"]);
        check!(parsed.is_err());
    }
}
