use super::paging::Carousel;
use super::{Action, Block, CarouselId, Screen, View};
use crate::error::ApiError;
use crate::news::{ContentSource, PageRequest, Story, StoryId};
use crate::util::dates::{long_date, medium_date};
use crate::util::html::html_to_paragraphs;

const SIDEBAR_MIN: usize = 5;
const CAROUSEL_SIZE: usize = 4;

pub struct StoryView {
    pub story: Block<Story>,
    pub top: Block<Vec<Story>>,
    pub also_reading: Block<Vec<Story>>,
    pub missed: Block<Vec<Story>>,
    also_carousel: Carousel,
    missed_carousel: Carousel,
}

/// Pads a short, non-empty list up to `min` entries by repeating its first item.
pub fn fill_to<T: Clone>(mut items: Vec<T>, min: usize) -> Vec<T> {
    if let Some(first) = items.first().cloned() {
        while items.len() < min {
            items.push(first.clone());
        }
    }
    items
}

impl StoryView {
    pub async fn load(source: &dyn ContentSource, id: StoryId) -> Self {
        let (story, top, also, missed) = futures_util::join!(
            source.story(id),
            source.top_stories(),
            source.latest_stories(PageRequest::first(7)),
            source.missed_stories(PageRequest::first(5)),
        );
        let story = story.map_err(|err| {
            log::warn!("Failed to load story {}: {}", id, err);
            match err {
                ApiError::StoryNotFound => err.to_string(),
                _ => "Failed to fetch story.".to_string(),
            }
        });
        let top = top
            .map(|t| fill_to(t.into_iter().map(|t| t.story).collect(), SIDEBAR_MIN))
            .map_err(|err| {
                log::warn!("Failed to load top stories: {}", err);
                "Failed to load top stories.".to_string()
            });
        let also_reading = also.map(|p| p.data).map_err(|err| {
            log::warn!("Failed to load latest news: {}", err);
            "Failed to load latest news.".to_string()
        });
        let missed = missed.map(|p| p.data).map_err(|err| {
            log::warn!("Failed to load missed stories: {}", err);
            "Failed to load missed stories.".to_string()
        });
        let len = |b: &Block<Vec<Story>>| b.as_ref().map(Vec::len).unwrap_or(0);
        Self {
            also_carousel: Carousel::new(CAROUSEL_SIZE, len(&also_reading)),
            missed_carousel: Carousel::new(CAROUSEL_SIZE, len(&missed)),
            story,
            top,
            also_reading,
            missed,
        }
    }
}

fn render_carousel(
    screen: &mut Screen,
    id: CarouselId,
    c: &Carousel,
    stories: &[Story],
    describe: impl Fn(&Story) -> Option<String>,
) {
    for s in &stories[c.visible()] {
        screen.story_link(s);
        if let Some(extra) = describe(s) {
            screen.text(extra);
        }
    }
    if c.has_prev() {
        screen.link("< Previous", Action::Slide { carousel: id, forward: false });
    }
    if c.has_next() {
        screen.link("Next >", Action::Slide { carousel: id, forward: true });
    }
}

impl View for StoryView {
    fn render(&self) -> Screen {
        let mut screen = match &self.story {
            Ok(story) => {
                let mut screen = Screen::new(&story.title);
                screen.heading(&story.title);
                if let Some(sub) = story.subtitle.as_deref().filter(|s| !s.trim().is_empty()) {
                    screen.text(sub);
                }
                let posted = story.created_at.as_deref().map(long_date).unwrap_or_default();
                screen.text(format!("Posted {}", posted).trim_end());
                let author = story
                    .author
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or("Unknown");
                screen.text(format!("By {}", author));
                for p in html_to_paragraphs(story.content.as_deref().unwrap_or_default()) {
                    screen.paragraph(p);
                }
                screen.link("Open in browser", Action::OpenInBrowser(story.id));
                screen
            }
            Err(e) => {
                let mut screen = Screen::new("Story");
                screen.text(e);
                screen
            }
        };

        screen.heading("Top Stories");
        screen.story_list(&self.top);

        match &self.also_reading {
            Ok(list) if !list.is_empty() => {
                screen.heading(format!("Also Reading  {}", self.also_carousel.dots()));
                render_carousel(&mut screen, CarouselId::AlsoReading, &self.also_carousel, list, |_| None);
            }
            Ok(_) => {
                screen.heading("Also Reading");
                screen.text("No news available.");
            }
            Err(e) => {
                screen.heading("Also Reading");
                screen.text(e);
            }
        }

        screen.heading(format!("Stories You May Have Missed  {}", self.missed_carousel.dots()));
        match &self.missed {
            Ok(list) => render_carousel(&mut screen, CarouselId::Missed, &self.missed_carousel, list, |s| {
                let mut parts = Vec::new();
                if let Some(d) = s.created_at.as_deref() {
                    parts.push(medium_date(d));
                }
                if let Some(c) = s.category_name() {
                    parts.push(c.to_string());
                }
                (!parts.is_empty()).then(|| parts.join(" • "))
            }),
            Err(e) => screen.text(e),
        }
        screen
    }

    fn handle(&mut self, action: Action) -> Option<Action> {
        match action {
            Action::Slide { carousel, forward } => {
                let c = match carousel {
                    CarouselId::AlsoReading => &mut self.also_carousel,
                    _ => &mut self.missed_carousel,
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
    use crate::news::fake::{self, FakeSource, TopStory};
    use crate::pages::Line;
    use reqwest::StatusCode;

    #[test]
    fn fill_repeats_first_only_when_short() {
        assert_eq!(fill_to(vec![1, 2], 5), vec![1, 2, 1, 1, 1]);
        assert_eq!(fill_to(Vec::<u8>::new(), 5), Vec::<u8>::new());
        assert_eq!(fill_to(vec![1, 2, 3, 4, 5, 6], 5).len(), 6);
    }

    #[tokio::test]
    async fn renders_story_body_and_sidebar() {
        let mut source = FakeSource {
            top_stories: Some(vec![TopStory {
                story: fake::story(2, "Gunfire near airport"),
            }]),
            latest: Some((10..17).map(|i| fake::story(i, "Latest")).collect()),
            ..Default::default()
        };
        let mut main = fake::story(1, "Putin promises grains");
        main.content = Some("<p>First para.</p><p>Second &amp; last.</p>".into());
        main.created_at = Some("2024-02-29T15:04:00Z".into());
        source.stories.insert(1, main);

        let view = StoryView::load(&source, 1).await;
        assert_eq!(view.top.as_ref().unwrap().len(), 5);

        let screen = view.render();
        assert_eq!(screen.title, "Putin promises grains");
        assert!(screen.lines.contains(&Line::Text("By Unknown".into())));
        assert!(screen
            .lines
            .contains(&Line::Text("Posted Thu, February 29, 2024 at 3:04 PM".into())));
        assert!(screen.lines.contains(&Line::Text("Second & last.".into())));
        assert!(screen
            .lines
            .contains(&Line::Text("Failed to load missed stories.".into())));
        assert_eq!(
            screen.links().filter(|a| **a == Action::Story(2)).count(),
            5
        );
    }

    #[tokio::test]
    async fn missing_story_shows_not_found() {
        let view = StoryView::load(&FakeSource::default(), 99).await;
        let screen = view.render();
        assert!(screen.lines.contains(&Line::Text("Story not found.".into())));
        assert!(screen
            .lines
            .contains(&Line::Text("Failed to load top stories.".into())));
        assert!(screen
            .lines
            .contains(&Line::Text("Failed to load latest news.".into())));
    }

    #[tokio::test]
    async fn upstream_failure_hides_error_details() {
        let source = FakeSource {
            story_status: Some(StatusCode::NOT_FOUND),
            ..Default::default()
        };
        let view = StoryView::load(&source, 5).await;
        let screen = view.render();
        assert_eq!(screen.title, "Story");
        assert_eq!(screen.lines[0], Line::Text("Failed to fetch story.".into()));
        assert!(!screen.to_plain_text().contains("stories/5"));
    }

    #[tokio::test]
    async fn also_reading_slides_by_four() {
        let source = FakeSource {
            latest: Some((10..17).map(|i| fake::story(i, "Latest")).collect()),
            ..Default::default()
        };
        let mut view = StoryView::load(&source, 1).await;
        view.handle(Action::Slide {
            carousel: CarouselId::AlsoReading,
            forward: true,
        });
        let ids: Vec<_> = view.render().links().cloned().collect();
        assert!(ids.contains(&Action::Story(14)));
        assert!(!ids.contains(&Action::Story(10)));
    }
}
