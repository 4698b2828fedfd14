//! In-memory content source for tests.

use super::fetch::{ContentSource, PageRequest};
use super::model::{Category, CategoryId, Page, PageMeta, Story, StoryId};
pub use super::model::{EditorPick, TopStory};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// `None` for a list makes that endpoint fail with a 500. A non-zero `delay`
/// holds every call for that long before answering.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub categories: Option<Vec<Category>>,
    pub category_stories: HashMap<CategoryId, Vec<Story>>,
    pub editor_picks: Option<Vec<EditorPick>>,
    pub top_stories: Option<Vec<TopStory>>,
    pub latest: Option<Vec<Story>>,
    pub missed: Option<Vec<Story>>,
    pub stories: HashMap<StoryId, Story>,
    /// Makes `story` fail with this status instead of looking it up.
    pub story_status: Option<StatusCode>,
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

pub fn story(id: StoryId, title: &str) -> Story {
    Story {
        id,
        title: title.into(),
        ..Default::default()
    }
}

pub fn in_category(mut s: Story, name: &str) -> Story {
    s.category = Some(Category {
        category_id: 1,
        category_name: name.into(),
        ..Default::default()
    });
    s
}

fn failure(endpoint: &str) -> ApiError {
    ApiError::Status {
        url: endpoint.to_string(),
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn paginate<T: Clone>(items: &[T], req: PageRequest) -> Page<T> {
    let per_page = req.per_page.max(1) as usize;
    let start = (req.page.max(1) as usize - 1) * per_page;
    let data: Vec<T> = items.iter().skip(start).take(per_page).cloned().collect();
    let last_page = items.len().div_ceil(per_page).max(1) as u32;
    Page {
        data,
        meta: Some(PageMeta {
            current_page: req.page,
            from: None,
            last_page,
            path: None,
            per_page: req.per_page,
            to: None,
            total: items.len() as u64,
        }),
        links: None,
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.record("categories").await;
        self.categories.clone().ok_or_else(|| failure("categories"))
    }

    async fn category_stories(&self, id: CategoryId, req: PageRequest) -> ApiResult<Page<Story>> {
        self.record(format!("categories/{}/stories?page={}", id, req.page)).await;
        self.category_stories
            .get(&id)
            .map(|items| paginate(items, req))
            .ok_or_else(|| failure("categories/stories"))
    }

    async fn editor_picks(&self, req: PageRequest) -> ApiResult<Page<EditorPick>> {
        self.record("editor-picks").await;
        self.editor_picks
            .as_deref()
            .map(|items| paginate(items, req))
            .ok_or_else(|| failure("editor-picks"))
    }

    async fn top_stories(&self) -> ApiResult<Vec<TopStory>> {
        self.record("top-stories").await;
        self.top_stories.clone().ok_or_else(|| failure("top-stories"))
    }

    async fn latest_stories(&self, req: PageRequest) -> ApiResult<Page<Story>> {
        self.record("latest-stories").await;
        self.latest
            .as_deref()
            .map(|items| paginate(items, req))
            .ok_or_else(|| failure("latest-stories"))
    }

    async fn missed_stories(&self, req: PageRequest) -> ApiResult<Page<Story>> {
        self.record("missed-stories").await;
        self.missed
            .as_deref()
            .map(|items| paginate(items, req))
            .ok_or_else(|| failure("missed-stories"))
    }

    async fn story(&self, id: StoryId) -> ApiResult<Story> {
        self.record(format!("stories/{}", id)).await;
        if let Some(status) = self.story_status {
            return Err(ApiError::Status {
                url: format!("stories/{}", id),
                status,
            });
        }
        self.stories.get(&id).cloned().ok_or(ApiError::StoryNotFound)
    }
}
