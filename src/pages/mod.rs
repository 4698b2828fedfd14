//! Terminal screens: each one fetches fresh data, renders to a [`Screen`] and
//! is dropped when the user navigates away.

pub mod home;
pub mod paging;
pub mod section;
pub mod story;

use crate::config::RuntimeConfig;
use crate::error::ApiResult;
use crate::news::{ContentSource, Story, StoryId};
use crate::open_url::open_url;
use crate::search;
use crate::ui::{prompt_index, MenuChoice};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::Result;
use std::sync::Arc;

/// A block's data, or the inline error text shown in its place.
pub type Block<T> = std::result::Result<T, String>;

pub(crate) fn block<T>(res: ApiResult<T>, what: &str) -> Block<T> {
    res.map_err(|err| {
        log::warn!("Failed to load {}: {}", what, err);
        format!("Failed to load {}.", what)
    })
}

pub struct Context {
    pub cfg: RuntimeConfig,
    pub source: Arc<dyn ContentSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselId {
    Latest,
    Missed,
    AlsoReading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Home,
    Section { slug: String, page: u32 },
    Story(StoryId),
    OpenInBrowser(StoryId),
    Search,
    Slide { carousel: CarouselId, forward: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    Text(String),
    Link { label: String, action: Action },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Screen {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: sanitize_for_terminal(title.as_ref()),
            lines: Vec::new(),
        }
    }

    pub fn heading(&mut self, text: impl AsRef<str>) {
        self.lines.push(Line::Heading(sanitize_for_terminal(text.as_ref())));
    }

    pub fn text(&mut self, text: impl AsRef<str>) {
        self.lines.push(Line::Text(sanitize_for_terminal(text.as_ref())));
    }

    /// Body text keeps its full length.
    pub fn paragraph(&mut self, text: String) {
        self.lines.push(Line::Text(text));
    }

    pub fn link(&mut self, label: impl AsRef<str>, action: Action) {
        self.lines.push(Line::Link {
            label: sanitize_for_terminal(label.as_ref()),
            action,
        });
    }

    pub fn story_link(&mut self, story: &Story) {
        self.link(story_label(story), Action::Story(story.id));
    }

    /// Stories, or the error/empty text in their place.
    pub fn story_list(&mut self, stories: &Block<Vec<Story>>) {
        match stories {
            Err(e) => self.text(e),
            Ok(list) if list.is_empty() => self.text("No stories available."),
            Ok(list) => list.iter().for_each(|s| self.story_link(s)),
        }
    }

    pub fn links(&self) -> impl Iterator<Item = &Action> {
        self.lines.iter().filter_map(|l| match l {
            Line::Link { action, .. } => Some(action),
            _ => None,
        })
    }

    /// Menu labels plus the indices of headings (Tab jumps between them).
    pub fn labels(&self) -> (Vec<String>, Vec<usize>) {
        let mut labels = Vec::with_capacity(self.lines.len());
        let mut headings = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            match line {
                Line::Heading(h) => {
                    headings.push(i);
                    labels.push(format!("== {} ==", h.to_uppercase()));
                }
                Line::Text(t) => labels.push(format!("    {}", t)),
                Line::Link { label, .. } => labels.push(format!("  - {}", label)),
            }
        }
        (labels, headings)
    }

    /// Plain rendering for one-shot subcommands.
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for line in &self.lines {
            match line {
                Line::Heading(h) => out.push_str(&format!("\n== {} ==\n", h.to_uppercase())),
                Line::Text(t) => out.push_str(&format!("    {}\n", t)),
                Line::Link { label, action } => match action {
                    Action::Story(id) => out.push_str(&format!("  - {} [{}]\n", label, id)),
                    Action::Slide { .. } | Action::Search | Action::OpenInBrowser(_) => {}
                    _ => out.push_str(&format!("  - {}\n", label)),
                },
            }
        }
        out
    }
}

/// `[POLITICS] Senate passes budget`
pub fn story_label(story: &Story) -> String {
    match story.category_name() {
        Some(cat) => format!("[{}] {}", cat.to_uppercase(), story.title),
        None => story.title.clone(),
    }
}

/// A loaded screen with its local carousel state.
pub trait View {
    fn render(&self) -> Screen;

    /// Handle a selected link locally; anything returned is navigation.
    fn handle(&mut self, action: Action) -> Option<Action> {
        Some(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Section { slug: String, page: u32 },
    Story(StoryId),
    Search,
}

enum Outcome {
    Back,
    Quit,
    Go(Route),
}

/// Interactive browsing loop; `b` walks back through visited screens.
pub async fn browse(ctx: &Context, start: Route) -> Result<()> {
    let mut visited = vec![start];
    while let Some(route) = visited.last().cloned() {
        let outcome = match route {
            Route::Home => {
                let mut view = home::HomeView::load(ctx.source.as_ref()).await;
                run_view(ctx, &mut view)?
            }
            Route::Section { slug, page } => {
                let mut view = section::SectionView::load(ctx.source.as_ref(), &slug, page).await;
                run_view(ctx, &mut view)?
            }
            Route::Story(id) => {
                let mut view = story::StoryView::load(ctx.source.as_ref(), id).await;
                run_view(ctx, &mut view)?
            }
            Route::Search => {
                let picked = search::overlay::run(ctx.source.clone(), &ctx.cfg).await?;
                visited.pop();
                if let Some(id) = picked {
                    visited.push(Route::Story(id));
                }
                continue;
            }
        };
        match outcome {
            Outcome::Back => {
                visited.pop();
            }
            Outcome::Quit => break,
            Outcome::Go(next) => visited.push(next),
        }
    }
    Ok(())
}

fn run_view(ctx: &Context, view: &mut dyn View) -> Result<Outcome> {
    loop {
        let mut screen = view.render();
        screen.link("Search AGC Newsnet", Action::Search);
        let (labels, headings) = screen.labels();
        let default = screen
            .lines
            .iter()
            .position(|l| matches!(l, Line::Link { .. }));
        let prompt = format!("{} (b = back, q = quit)", screen.title);
        let choice = prompt_index(
            &prompt,
            &labels,
            default,
            ctx.cfg.header.as_deref(),
            Some(&headings),
        )?;
        let index = match choice {
            MenuChoice::Back => return Ok(Outcome::Back),
            MenuChoice::Quit => return Ok(Outcome::Quit),
            MenuChoice::Index(i) => i,
        };
        let Some(Line::Link { action, .. }) = screen.lines.get(index).cloned() else {
            continue;
        };
        let next = match view.handle(action) {
            None => continue,
            Some(Action::Home) => Route::Home,
            Some(Action::Section { slug, page }) => Route::Section { slug, page },
            Some(Action::Story(id)) => Route::Story(id),
            Some(Action::Search) => Route::Search,
            Some(Action::OpenInBrowser(id)) => {
                let url = ctx.cfg.story_url(id);
                if let Err(err) = open_url(&url, ctx.cfg.open_command.as_deref()) {
                    log::warn!("Failed to open {}: {}", url, err);
                }
                continue;
            }
            Some(Action::Slide { .. }) => continue,
        };
        return Ok(Outcome::Go(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::fake;

    #[test]
    fn labels_mark_heading_positions() {
        let mut s = Screen::new("Home");
        s.heading("Top Stories");
        s.story_link(&fake::in_category(fake::story(5, "Budget"), "Politics"));
        s.text("By Ogechi Joseph");
        s.heading("Latest");
        let (labels, headings) = s.labels();
        assert_eq!(headings, vec![0, 3]);
        assert_eq!(labels[1], "  - [POLITICS] Budget");
        assert_eq!(labels[2], "    By Ogechi Joseph");
    }

    #[test]
    fn story_list_shows_error_or_empty_text() {
        let mut s = Screen::new("x");
        s.story_list(&Err("Failed to load latest news.".into()));
        s.story_list(&Ok(vec![]));
        assert_eq!(
            s.lines,
            vec![
                Line::Text("Failed to load latest news.".into()),
                Line::Text("No stories available.".into()),
            ]
        );
    }

    #[test]
    fn plain_text_skips_navigation_only_links() {
        let mut s = Screen::new("Story");
        s.link("Next >", Action::Slide {
            carousel: CarouselId::Missed,
            forward: true,
        });
        s.story_link(&fake::story(7, "Flights disrupted"));
        let out = s.to_plain_text();
        assert!(out.contains("  - Flights disrupted [7]"));
        assert!(!out.contains("Next >"));
    }
}
