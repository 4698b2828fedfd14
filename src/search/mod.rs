//! Client-side search: fan out to the fixed list endpoints, merge by story id
//! (first seen wins) and filter in memory.

pub mod debounce;
pub mod overlay;

use crate::error::ApiResult;
use crate::news::{ContentSource, PageRequest, SearchStory, Story, StoryId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    EditorPicks,
    TopStories,
    LatestStories,
    MissedStories,
}

/// Merge order; earlier endpoints win on duplicate ids.
pub const ENDPOINTS: [Endpoint; 4] = [
    Endpoint::EditorPicks,
    Endpoint::TopStories,
    Endpoint::LatestStories,
    Endpoint::MissedStories,
];

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::EditorPicks => "editor-picks",
            Endpoint::TopStories => "top-stories",
            Endpoint::LatestStories => "stories/latest-stories",
            Endpoint::MissedStories => "stories/missed-stories",
        }
    }

    async fn fetch(self, source: &dyn ContentSource, per_page: u32) -> ApiResult<Vec<Story>> {
        let req = PageRequest::first(per_page);
        Ok(match self {
            Endpoint::EditorPicks => source
                .editor_picks(req)
                .await?
                .data
                .into_iter()
                .map(|p| p.story)
                .collect(),
            Endpoint::TopStories => source
                .top_stories()
                .await?
                .into_iter()
                .map(|t| t.story)
                .collect(),
            Endpoint::LatestStories => source.latest_stories(req).await?.data,
            Endpoint::MissedStories => source.missed_stories(req).await?.data,
        })
    }
}

/// Stories keyed by id, remembering the order they were first seen in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    order: Vec<StoryId>,
    by_id: HashMap<StoryId, SearchStory>,
}

impl SearchResults {
    /// Returns false (and keeps the existing entry) when the id was already seen.
    pub fn insert(&mut self, story: SearchStory) -> bool {
        if self.by_id.contains_key(&story.id) {
            return false;
        }
        self.order.push(story.id);
        self.by_id.insert(story.id, story);
        true
    }

    pub fn get(&self, id: StoryId) -> Option<&SearchStory> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchStory> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&SearchStory) -> bool) {
        let by_id = &mut self.by_id;
        self.order.retain(|id| match by_id.get(id) {
            Some(s) if keep(s) => true,
            _ => {
                by_id.remove(id);
                false
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// Nothing searched yet, or the query was cleared.
    #[default]
    Idle,
    Searching { query: String },
    Done { query: String, results: SearchResults },
}

/// Fetch every endpoint in order and merge. Failed endpoints are logged and
/// skipped.
pub async fn collect_stories(source: &dyn ContentSource, per_page: u32) -> SearchResults {
    let mut all = SearchResults::default();
    for endpoint in ENDPOINTS {
        match endpoint.fetch(source, per_page).await {
            Ok(stories) => {
                for story in stories.into_iter().filter(|s| s.id != 0) {
                    all.insert(SearchStory::from(story));
                }
            }
            Err(err) => log::warn!("Failed to fetch from {}: {}", endpoint.name(), err),
        }
    }
    all
}

/// Case-insensitive substring match on title, subtitle, description, author
/// or category name. `needle` must already be lowercase.
pub fn matches(story: &SearchStory, needle: &str) -> bool {
    let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(needle));
    hit(Some(&story.title))
        || hit(story.subtitle.as_deref())
        || hit(story.description.as_deref())
        || hit(story.author.as_deref())
        || hit(story.category.as_deref())
}

pub async fn search(source: &dyn ContentSource, query: &str, per_page: u32) -> SearchState {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return SearchState::Idle;
    }
    let needle = trimmed.to_lowercase();
    let mut results = collect_stories(source, per_page).await;
    results.retain(|s| matches(s, &needle));
    log::debug!("search {:?}: {} results", trimmed, results.len());
    SearchState::Done {
        query: query.to_string(),
        results,
    }
}
