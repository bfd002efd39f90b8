use std::process::ExitCode;

use anyhow::Context;
use booklens_app::books::{
    models::{AuthorResponse, SearchBody, SearchMode, TitleResponse},
    source, BookSearch, SearchOutcome,
};
use booklens_kernel::settings::Settings;
use clap::{Args, Parser, Subcommand};

/// Search Google Books from the command line
#[derive(Debug, Parser)]
#[command(name = "booklens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Books written by exactly this author, newest first
    Author {
        name: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Books matching this title, longest description first
    Title {
        title: String,
        /// Narrow the search to an author
        #[arg(long)]
        author: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
}

#[derive(Debug, Args)]
struct Paging {
    /// Index of the first result
    #[arg(long, default_value_t = 0)]
    start_offset: u32,
    /// Results per page (0 lets the upstream decide)
    #[arg(long, default_value_t = 0)]
    page_size: u32,
    /// Pages fetched after the first
    #[arg(long, default_value_t = 0)]
    extra_pages: u32,
}

impl Command {
    fn into_body(self) -> (SearchMode, SearchBody) {
        match self {
            Command::Author { name, paging } => (
                SearchMode::Author,
                SearchBody {
                    author: name,
                    start_offset: paging.start_offset,
                    page_size: paging.page_size,
                    extra_pages: paging.extra_pages,
                    ..SearchBody::default()
                },
            ),
            Command::Title {
                title,
                author,
                paging,
            } => (
                SearchMode::Title,
                SearchBody {
                    title,
                    author: author.unwrap_or_default(),
                    start_offset: paging.start_offset,
                    page_size: paging.page_size,
                    extra_pages: paging.extra_pages,
                },
            ),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load booklens settings")?;
    booklens_telemetry::init(&settings.telemetry)?;

    let search = BookSearch::new(source::from_settings(&settings.upstream)?, &settings.upstream);
    let (mode, body) = cli.command.into_body();

    let request = match body.into_request(mode, search.max_extra_pages()) {
        Ok(request) => request,
        Err(errors) => {
            for e in &errors {
                eprintln!("invalid {}: {}", e.field, e.error);
            }
            return Ok(ExitCode::from(2));
        }
    };

    let outcome = match mode {
        SearchMode::Author => search.by_author(&request).await?,
        SearchMode::Title => search.by_title(&request).await?,
    };

    match outcome {
        SearchOutcome::Found(result) => {
            let json = match mode {
                SearchMode::Author => {
                    serde_json::to_string_pretty(&AuthorResponse::new(request.author, result))?
                }
                SearchMode::Title => {
                    serde_json::to_string_pretty(&TitleResponse::new(request.title, result))?
                }
            };
            println!("{json}");
        }
        SearchOutcome::NoContent { total_items } => {
            tracing::info!(total_items, "search returned no content");
            eprintln!("no matching books");
        }
    }
    Ok(ExitCode::SUCCESS)
}
