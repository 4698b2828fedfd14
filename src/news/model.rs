use serde::{Deserialize, Deserializer, Serialize};

pub type StoryId = u64;
pub type CategoryId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Category {
    pub category_id: CategoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(default)]
    pub total_stories: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Story {
    #[serde(default)]
    pub id: StoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub featured: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Story {
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_ref()
            .map(|c| c.category_name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Short teaser text: description, then subtitle, then the title itself.
    pub fn excerpt(&self) -> &str {
        non_empty(self.description.as_deref())
            .or_else(|| non_empty(self.subtitle.as_deref()))
            .unwrap_or(&self.title)
    }
}

/// An editor-picks list item; the story is nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPick {
    #[serde(default)]
    pub id: u64,
    pub story: Story,
}

/// A top-stories list item; the story is nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopStory {
    pub story: Story,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Page<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

impl<T> Page<T> {
    /// Total number of items across all pages, falling back to this page's length.
    pub fn total(&self) -> usize {
        self.meta
            .as_ref()
            .map(|m| m.total as usize)
            .unwrap_or(self.data.len())
    }

    pub fn last_page(&self) -> u32 {
        self.meta.as_ref().map(|m| m.last_page.max(1)).unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    #[serde(default)]
    pub from: Option<u64>,
    pub last_page: u32,
    #[serde(default)]
    pub path: Option<String>,
    pub per_page: u32,
    #[serde(default)]
    pub to: Option<u64>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Flattened story as held by the search overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStory {
    pub id: StoryId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub banner_image: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<String>,
    pub slug: String,
}

impl From<Story> for SearchStory {
    fn from(s: Story) -> Self {
        let category = s.category_name().map(str::to_string);
        Self {
            id: s.id,
            slug: s.id.to_string(),
            title: s.title,
            subtitle: s.subtitle,
            description: s.description,
            author: s.author,
            banner_image: s.banner_image,
            category,
            created_at: s.created_at,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
