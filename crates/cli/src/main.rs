use anyhow::Context;
use clap::Parser;
use showfinder_core::{Config, ProviderKind, SearchResultSet, ShowDetails};
use showfinder_cli::{SearchSession, render};
use showfinder_query::QueryClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ProviderArg {
    /// OMDb, ids like `tt0903747`
    Omdb,
    /// TMDB, numeric ids
    Tmdb,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Omdb => ProviderKind::Omdb,
            ProviderArg::Tmdb => ProviderKind::Tmdb,
        }
    }
}

#[derive(Parser)]
#[command(name = "showfinder")]
#[command(about = "Search TV shows by title and view their details")]
struct Cli {
    /// Metadata provider to query
    #[arg(long, value_enum, default_value = "omdb")]
    provider: ProviderArg,
}

enum Command<'a> {
    Quit,
    Show(&'a str),
    Search(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim() == ":quit" {
            Self::Quit
        } else if let Some(id) = line.trim_start().strip_prefix(":show") {
            Self::Show(id.trim())
        } else {
            Self::Search(line)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is the rendered view.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;
    let kind = ProviderKind::from(cli.provider);
    info!(provider = %kind, stale_secs = config.stale_time.as_secs(), "starting");

    let provider = showfinder_metadata::build_provider(kind, &config);
    let search_cache: QueryClient<SearchResultSet> = QueryClient::new(config.stale_time);
    let details_cache: QueryClient<ShowDetails> = QueryClient::new(config.stale_time);

    // Periodically drop cache entries nobody is looking at.
    {
        let search_cache = search_cache.clone();
        let details_cache = details_cache.clone();
        let period = config.stale_time.max(std::time::Duration::from_secs(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let evicted = search_cache.evict_idle() + details_cache.evict_idle();
                if evicted > 0 {
                    debug!(evicted, "evicted idle cache entries");
                }
            }
        });
    }

    let mut session = SearchSession::with_clients(
        provider,
        search_cache,
        details_cache,
        config.min_query_chars,
    );

    println!("Type a title and press Enter to search. `:show <id>` opens details, `:quit` exits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Show(id) => {
                session.show_details(id);
                if session.details_state().is_loading() {
                    println!("{}", render::LOADING);
                }
                let state = session.details_settled().await;
                println!("{}", render::details_view(&state));
            }
            Command::Search(text) => {
                session.input(text);
                let Some(query) = session.submit() else {
                    println!(
                        "Type at least {} characters to search.",
                        session.gate().min_chars()
                    );
                    continue;
                };
                if session.search_state().is_loading() {
                    println!("{}", render::LOADING);
                }
                let state = session.search_settled().await;
                println!("{}", render::search_view(query.as_str(), &state));
            }
        }
    }

    session.close_details();
    Ok(())
}
