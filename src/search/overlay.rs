use super::{debounce, SearchResults, SearchState};
use crate::config::RuntimeConfig;
use crate::news::{ContentSource, SearchStory, StoryId};
use crate::ui::{prompt_index, MenuChoice};
use crate::util::dates::short_date;
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::{Context, Result};
use console::{style, Key, Term};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Live search: every keystroke updates the query, results arrive once the
/// debounce settles. Returns the story the user picked, if any.
pub async fn run(source: Arc<dyn ContentSource>, cfg: &RuntimeConfig) -> Result<Option<StoryId>> {
    let (qtx, qrx) = watch::channel(String::new());
    let (stx, mut srx) = watch::channel(SearchState::Idle);
    let worker = tokio::spawn(debounce::run(
        source,
        qrx,
        stx,
        cfg.search_debounce(),
        cfg.search_per_page,
    ));

    let term = Term::stdout();
    let mut query = String::new();
    let mut pending = read_key(&term);
    let picked = loop {
        let lines = render_state(&srx.borrow_and_update());
        draw(&term, &query, &lines, cfg.header.as_deref())?;

        tokio::select! {
            key = &mut pending => {
                let key = key.context("key reader stopped")?.context("failed to read key")?;
                match key {
                    Key::Escape => break None,
                    Key::Enter => {
                        let state = srx.borrow().clone();
                        if let SearchState::Done { query: q, results } = state {
                            if let Some(id) = pick(&q, &results, cfg.header.as_deref())? {
                                break Some(id);
                            }
                        }
                    }
                    Key::Backspace => {
                        query.pop();
                    }
                    Key::Char(c) if !c.is_control() => query.push(c),
                    _ => {}
                }
                qtx.send_if_modified(|current| {
                    if *current == query {
                        return false;
                    }
                    current.clone_from(&query);
                    true
                });
                pending = read_key(&term);
            }
            changed = srx.changed() => {
                if changed.is_err() {
                    break None;
                }
            }
        }
    };

    // closing the overlay clears the search and abandons one in flight
    drop(qtx);
    if let Err(err) = worker.await {
        log::warn!("search worker ended abnormally: {}", err);
    }
    Ok(picked)
}

fn read_key(term: &Term) -> JoinHandle<std::io::Result<Key>> {
    let term = term.clone();
    tokio::task::spawn_blocking(move || term.read_key())
}

fn draw(term: &Term, query: &str, lines: &[String], header: Option<&str>) -> Result<()> {
    term.clear_screen()?;
    if let Some(h) = header {
        println!("{}", h);
    }
    println!("Search AGC Newsnet: {}_", sanitize_for_terminal(query));
    println!("Type to search. Enter = pick a result, Esc = close.");
    println!();
    let (rows, _) = term.size();
    let room = (rows as usize).saturating_sub(5).max(3);
    for line in lines.iter().take(room) {
        println!("{}", line);
    }
    Ok(())
}

fn pick(query: &str, results: &SearchResults, header: Option<&str>) -> Result<Option<StoryId>> {
    if results.is_empty() {
        return Ok(None);
    }
    let stories: Vec<&SearchStory> = results.iter().collect();
    let labels: Vec<String> = stories
        .iter()
        .map(|s| match meta_line(s) {
            Some(meta) => format!("{} ({})", sanitize_for_terminal(&s.title), meta),
            None => sanitize_for_terminal(&s.title),
        })
        .collect();
    let prompt = format!("Search Results for \"{}\" (b = back)", sanitize_for_terminal(query));
    match prompt_index(&prompt, &labels, Some(0), header, None)? {
        MenuChoice::Index(i) => {
            let id = stories.get(i).map(|s| s.id);
            if let Some(s) = id.and_then(|id| results.get(id)) {
                log::debug!("opening search result {} ({})", s.id, s.title);
            }
            Ok(id)
        }
        MenuChoice::Back | MenuChoice::Quit => Ok(None),
    }
}

/// `By Ogechi Joseph • Politics • 2/29/2024`, with missing parts left out.
pub fn meta_line(story: &SearchStory) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(a) = story.author.as_deref().filter(|a| !a.trim().is_empty()) {
        parts.push(format!("By {}", a));
    }
    if let Some(c) = story.category.as_deref().filter(|c| !c.trim().is_empty()) {
        parts.push(c.to_string());
    }
    if let Some(d) = story.created_at.as_deref().filter(|d| !d.trim().is_empty()) {
        parts.push(short_date(d));
    }
    (!parts.is_empty()).then(|| sanitize_for_terminal(&parts.join(" • ")))
}

pub fn render_state(state: &SearchState) -> Vec<String> {
    let heading = |q: &str| {
        style(format!("Search Results for \"{}\"", sanitize_for_terminal(q)))
            .bold()
            .to_string()
    };
    match state {
        SearchState::Idle => Vec::new(),
        SearchState::Searching { query } => vec![heading(query), "Searching...".into()],
        SearchState::Done { query, results } if results.is_empty() => vec![
            heading(query),
            "No results found".into(),
            "Try searching with different keywords or check your spelling.".into(),
        ],
        SearchState::Done { query, results } => {
            let n = results.len();
            let mut lines = vec![
                heading(query),
                format!("Found {} result{}", n, if n == 1 { "" } else { "s" }),
            ];
            for s in results.iter() {
                lines.push(format!("- {}", sanitize_for_terminal(&s.title)));
                if let Some(sub) = s.subtitle.as_deref().filter(|v| !v.trim().is_empty()) {
                    lines.push(format!("    {}", sanitize_for_terminal(sub)));
                }
                if let Some(meta) = meta_line(s) {
                    lines.push(format!("    {}", meta));
                }
            }
            lines
        }
    }
}
