mod config;
mod error;
mod news;
mod open_url;
mod pages;
mod search;
mod ui;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use console::Term;
use news::categories::{category_name, category_slug};
use news::ContentApi;
use pages::{Context, Route, View};
use std::path::PathBuf;
use std::sync::Arc;

/// Terminal reader for AGC Newsnet
#[derive(Parser, Debug)]
#[command(name = "agc-news", version, about)]
struct Cli {
    /// Path to a config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print one screen and exit; omit for the interactive reader
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Homepage blocks
    Home,
    /// A category section, e.g. `politics`
    Section {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// A single story with its sidebars
    Story { id: u64 },
    /// Search recent stories
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load(cli.config.as_deref())?;
    let api = ContentApi::new(&cfg).context("failed to build API client")?;
    let ctx = Context {
        cfg,
        source: Arc::new(api),
    };

    match cli.command {
        Some(cmd) => one_shot(&ctx, cmd).await,
        None => interactive(&ctx).await,
    }
}

async fn one_shot(ctx: &Context, cmd: Command) -> Result<()> {
    let source = ctx.source.as_ref();
    let screen = match cmd {
        Command::Home => pages::home::HomeView::load(source).await.render(),
        Command::Section { slug, page } => {
            pages::section::SectionView::load(source, &slug, page).await.render()
        }
        Command::Story { id } => pages::story::StoryView::load(source, id).await.render(),
        Command::Search { query } => {
            let query = query.join(" ");
            let state = search::search(source, &query, ctx.cfg.search_per_page).await;
            let lines = search::overlay::render_state(&state);
            if lines.is_empty() {
                println!("Nothing to search for.");
            }
            for line in lines {
                println!("{}", line);
            }
            return Ok(());
        }
    };
    print!("{}", screen.to_plain_text());
    Ok(())
}

async fn interactive(ctx: &Context) -> Result<()> {
    // Clear terminal at startup for a clean UI
    let _ = Term::stdout().clear_screen();
    let items = ["Home", "Sections", "Search", "Open story by id", "Quit"];
    loop {
        let sel = ui::prompt_menu(
            "Main Menu (b = back/quit)",
            &items,
            ctx.cfg.header.as_deref(),
        )?;
        match sel {
            ui::MenuChoice::Back | ui::MenuChoice::Quit => break,
            ui::MenuChoice::Index(0) => pages::browse(ctx, Route::Home).await?,
            ui::MenuChoice::Index(1) => {
                if let Some(slug) = choose_section(ctx).await? {
                    pages::browse(ctx, Route::Section { slug, page: 1 }).await?;
                }
            }
            ui::MenuChoice::Index(2) => pages::browse(ctx, Route::Search).await?,
            ui::MenuChoice::Index(3) => {
                let Some(input) = ui::prompt_text("Story id")? else {
                    continue;
                };
                match input.parse::<u64>() {
                    Ok(id) => pages::browse(ctx, Route::Story(id)).await?,
                    Err(_) => eprintln!("Not a story id: {}", input),
                }
            }
            ui::MenuChoice::Index(_) => break,
        }
    }
    Ok(())
}

async fn choose_section(ctx: &Context) -> Result<Option<String>> {
    let names: Vec<String> = match ctx.source.categories().await {
        Ok(cats) if !cats.is_empty() => cats.into_iter().map(|c| c.category_name).collect(),
        Ok(_) => (1..=4).map(|id| category_name(id).to_string()).collect(),
        Err(err) => {
            log::warn!("Failed to load categories: {}", err);
            (1..=4).map(|id| category_name(id).to_string()).collect()
        }
    };
    let labels: Vec<String> = names
        .iter()
        .map(|n| util::sanitize::sanitize_for_terminal(n))
        .collect();
    match ui::prompt_index("Sections (b = back)", &labels, Some(0), ctx.cfg.header.as_deref(), None)? {
        ui::MenuChoice::Index(i) => Ok(names.get(i).map(|n| category_slug(n))),
        ui::MenuChoice::Back | ui::MenuChoice::Quit => Ok(None),
    }
}
