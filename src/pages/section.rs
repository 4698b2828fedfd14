use super::paging::Pager;
use super::{Action, Block, Screen, View};
use crate::error::ApiError;
use crate::news::categories::{self, Section};
use crate::news::{ContentSource, PageRequest, Story};
use crate::util::dates::long_date;

const LATEST_COUNT: u32 = 4;
const PER_PAGE: u32 = 10;

pub enum SectionView {
    /// `home` is not a section; following the link goes to the homepage.
    Redirect,
    Loaded(Box<SectionPage>),
}

pub struct SectionPage {
    pub slug: String,
    pub name: String,
    pub latest: Block<Vec<Story>>,
    pub others: Block<Vec<Story>>,
    pub pager: Pager,
}

impl SectionView {
    pub async fn load(source: &dyn ContentSource, slug: &str, page: u32) -> Self {
        let mut pager = Pager::new(page, PER_PAGE);
        let (id, name) = match categories::resolve(source, slug).await {
            Ok(Section::Home) => return Self::Redirect,
            Ok(Section::Category { id, name }) => (id, name),
            Err(err) => {
                let msg = err.to_string();
                return Self::Loaded(Box::new(SectionPage {
                    slug: slug.to_string(),
                    name: slug.to_string(),
                    latest: Err(msg.clone()),
                    others: Err(msg),
                    pager,
                }));
            }
        };

        let (latest, others) = futures_util::join!(
            source.category_stories(id, PageRequest::first(LATEST_COUNT)),
            source.category_stories(id, PageRequest::new(pager.current, PER_PAGE)),
        );
        let others = others.map(|p| {
            pager.last_page = p.last_page();
            pager.total = p.total();
            p.data
        });
        Self::Loaded(Box::new(SectionPage {
            slug: slug.to_string(),
            name,
            latest: latest.map(|p| p.data).map_err(stories_error),
            others: others.map_err(stories_error),
            pager,
        }))
    }
}

fn stories_error(err: ApiError) -> String {
    log::warn!("Failed to fetch stories: {}", err);
    "Failed to fetch stories".to_string()
}

impl View for SectionView {
    fn render(&self) -> Screen {
        let page = match self {
            Self::Redirect => {
                let mut screen = Screen::new("Home");
                screen.link("Go to the homepage", Action::Home);
                return screen;
            }
            Self::Loaded(page) => page,
        };
        let mut screen = Screen::new(&page.name);

        screen.heading(format!("Latest in {}", page.name));
        screen.story_list(&page.latest);

        screen.heading("Other Stories");
        match &page.others {
            Err(e) => screen.text(e),
            Ok(list) if list.is_empty() => {
                screen.text("No stories available.");
                render_pager(&mut screen, &page.slug, &page.pager);
            }
            Ok(list) => {
                for s in list {
                    screen.story_link(s);
                    if let Some(d) = s.created_at.as_deref().filter(|d| !d.trim().is_empty()) {
                        screen.text(long_date(d));
                    }
                    screen.text(s.excerpt());
                }
                render_pager(&mut screen, &page.slug, &page.pager);
            }
        }
        screen
    }
}

fn render_pager(screen: &mut Screen, slug: &str, pager: &Pager) {
    let goto = |page: u32| Action::Section {
        slug: slug.to_string(),
        page,
    };
    if pager.start_item() <= pager.total {
        screen.heading(pager.summary());
    }
    if pager.has_prev() {
        screen.link("< Previous", goto(pager.current - 1));
    }
    for n in pager.page_numbers() {
        let label = if n == pager.current {
            format!("[{}]", n)
        } else {
            format!("Page {}", n)
        };
        screen.link(label, goto(n));
    }
    if pager.has_next() {
        screen.link("Next >", goto(pager.current + 1));
    }
}
