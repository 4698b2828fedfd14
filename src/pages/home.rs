use super::paging::Carousel;
use super::{block, Action, Block, CarouselId, Screen, View};
use crate::news::categories::{category_name, category_slug};
use crate::news::{Category, CategoryId, ContentSource, PageRequest, Story};
use crate::util::dates::long_date;

/// Category blocks shown on the homepage, in order.
const HOME_SECTIONS: [CategoryId; 3] = [1, 2, 3];
const CAROUSEL_SIZE: usize = 4;

pub struct HomeData {
    pub categories: Block<Vec<Category>>,
    pub top: Block<Vec<Story>>,
    pub latest: Block<Vec<Story>>,
    pub sections: Vec<(CategoryId, Block<Vec<Story>>)>,
    pub picks: Block<Vec<Story>>,
    pub missed: Block<Vec<Story>>,
}

impl HomeData {
    pub async fn fetch(source: &dyn ContentSource) -> Self {
        let [politics, business, sports] = HOME_SECTIONS;
        let (categories, top, latest, p, b, s, picks, missed) = futures_util::join!(
            source.categories(),
            source.top_stories(),
            source.latest_stories(PageRequest::first(8)),
            source.category_stories(politics, PageRequest::first(6)),
            source.category_stories(business, PageRequest::first(6)),
            source.category_stories(sports, PageRequest::first(6)),
            source.editor_picks(PageRequest::first(15)),
            source.missed_stories(PageRequest::first(5)),
        );
        Self {
            categories: block(categories, "categories"),
            top: block(top, "top stories").map(|t| t.into_iter().map(|t| t.story).collect()),
            latest: block(latest, "latest news").map(|p| p.data),
            sections: vec![
                (politics, block(p, "politics stories").map(|p| p.data)),
                (business, block(b, "business stories").map(|p| p.data)),
                (sports, block(s, "sports stories").map(|p| p.data)),
            ],
            picks: block(picks, "editor's picks").map(|p| p.data.into_iter().map(|p| p.story).collect()),
            missed: block(missed, "missed stories").map(|p| p.data),
        }
    }
}

pub struct HomeView {
    data: HomeData,
    latest: Carousel,
    missed: Carousel,
}

impl HomeView {
    pub fn new(data: HomeData) -> Self {
        let len = |b: &Block<Vec<Story>>| b.as_ref().map(Vec::len).unwrap_or(0);
        Self {
            latest: Carousel::new(CAROUSEL_SIZE, len(&data.latest)),
            missed: Carousel::new(CAROUSEL_SIZE, len(&data.missed)),
            data,
        }
    }

    pub async fn load(source: &dyn ContentSource) -> Self {
        Self::new(HomeData::fetch(source).await)
    }

    fn render_carousel(screen: &mut Screen, title: &str, id: CarouselId, c: &Carousel, stories: &Block<Vec<Story>>) {
        match stories {
            Ok(list) if !list.is_empty() => {
                screen.heading(format!("{}  {}", title, c.dots()));
                list[c.visible()].iter().for_each(|s| screen.story_link(s));
                if c.has_prev() {
                    screen.link("< Previous", Action::Slide { carousel: id, forward: false });
                }
                if c.has_next() {
                    screen.link("Next >", Action::Slide { carousel: id, forward: true });
                }
            }
            other => {
                screen.heading(title);
                screen.story_list(other);
            }
        }
    }
}

fn byline(story: &Story) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(a) = story.author.as_deref().filter(|a| !a.trim().is_empty()) {
        parts.push(format!("By {}", a));
    }
    if let Some(d) = story.created_at.as_deref().filter(|d| !d.trim().is_empty()) {
        parts.push(format!("Posted {}", long_date(d)));
    }
    (!parts.is_empty()).then(|| parts.join(" • "))
}

impl View for HomeView {
    fn render(&self) -> Screen {
        let d = &self.data;
        let mut screen = Screen::new("AGC Newsnet");

        screen.heading("Sections");
        match &d.categories {
            Ok(cats) => {
                for c in cats {
                    let slug = category_slug(&c.category_name);
                    screen.link(&c.category_name, Action::Section { slug, page: 1 });
                }
            }
            Err(e) => screen.text(e),
        }

        screen.heading("Top Stories");
        match &d.top {
            Ok(top) if !top.is_empty() => top.iter().take(4).for_each(|s| screen.story_link(s)),
            other => screen.story_list(other),
        }

        Self::render_carousel(&mut screen, "Latest News", CarouselId::Latest, &self.latest, &d.latest);

        for (id, stories) in &d.sections {
            let name = category_name(*id);
            screen.heading(name);
            match stories {
                Ok(list) if !list.is_empty() => {
                    let lead = &list[0];
                    screen.story_link(lead);
                    screen.text(lead.excerpt());
                    if let Some(line) = byline(lead) {
                        screen.text(line);
                    }
                    list[1..].iter().for_each(|s| screen.story_link(s));
                    screen.link(
                        format!("More in {} >", name),
                        Action::Section {
                            slug: category_slug(name),
                            page: 1,
                        },
                    );
                }
                other => screen.story_list(other),
            }
        }

        screen.heading("Featured Stories");
        match &d.picks {
            Ok(picks) if !picks.is_empty() => {
                for s in picks.iter().take(2) {
                    screen.story_link(s);
                    screen.text(s.excerpt());
                }
                for (title, range) in [("Editor's Picks", 2..7), ("More Headlines", 7..12)] {
                    let slice = picks.get(range.start.min(picks.len())..range.end.min(picks.len()));
                    if let Some(slice) = slice.filter(|s| !s.is_empty()) {
                        screen.heading(title);
                        slice.iter().for_each(|s| screen.story_link(s));
                    }
                }
            }
            other => screen.story_list(other),
        }

        Self::render_carousel(
            &mut screen,
            "Stories You May Have Missed",
            CarouselId::Missed,
            &self.missed,
            &d.missed,
        );
        screen
    }

    fn handle(&mut self, action: Action) -> Option<Action> {
        match action {
            Action::Slide { carousel, forward } => {
                let c = match carousel {
                    CarouselId::Latest => &mut self.latest,
                    _ => &mut self.missed,
                };
                if forward { c.next() } else { c.prev() }
                None
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::fake::{self, EditorPick, FakeSource, TopStory};
    use crate::pages::Line;

    fn stories(range: std::ops::Range<u64>) -> Vec<Story> {
        range.map(|i| fake::story(i, &format!("Story {}", i))).collect()
    }

    fn populated() -> FakeSource {
        let mut source = FakeSource {
            categories: Some(vec![Category {
                category_id: 7,
                category_name: "World News".into(),
                ..Default::default()
            }]),
            top_stories: Some(stories(1..6).into_iter().map(|story| TopStory { story }).collect()),
            latest: Some(stories(10..17)),
            editor_picks: Some(
                stories(20..32)
                    .into_iter()
                    .map(|story| EditorPick { id: story.id + 100, story })
                    .collect(),
            ),
            missed: Some(stories(40..45)),
            ..Default::default()
        };
        source.category_stories.insert(1, stories(50..56));
        source.category_stories.insert(2, stories(60..62));
        source
    }

    fn story_ids(screen: &Screen) -> Vec<u64> {
        screen
            .links()
            .filter_map(|a| match a {
                Action::Story(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn renders_all_blocks_and_isolates_failures() {
        let view = HomeView::load(&populated()).await;
        let screen = view.render();
        let ids = story_ids(&screen);

        // top stories capped at four, carousels show their first page
        assert!(ids.starts_with(&[1, 2, 3, 4, 10, 11, 12, 13, 50]));
        assert!(!ids.contains(&5));
        assert!(!ids.contains(&14));
        // editor picks unwrap to their story ids
        assert!(ids.contains(&20) && ids.contains(&31));
        assert!(ids.ends_with(&[40, 41, 42, 43]));

        // sports has no stories registered, so only that block errors
        assert!(screen
            .lines
            .contains(&Line::Text("Failed to load sports stories.".into())));
        assert!(screen.links().any(|a| *a
            == Action::Section {
                slug: "world-news".into(),
                page: 1
            }));
    }

    #[tokio::test]
    async fn sliding_carousel_changes_visible_stories() {
        let mut view = HomeView::load(&populated()).await;
        let slide = Action::Slide {
            carousel: CarouselId::Latest,
            forward: true,
        };
        assert_eq!(view.handle(slide), None);
        let ids = story_ids(&view.render());
        assert!(ids.contains(&14) && ids.contains(&16));
        assert!(!ids.contains(&10));
        assert_eq!(view.handle(Action::Story(14)), Some(Action::Story(14)));
    }
}
