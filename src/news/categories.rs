use super::fetch::ContentSource;
use super::model::{Category, CategoryId};
use crate::error::{ApiError, ApiResult};

/// Section slugs the site has always routed, independent of `/categories`.
const KNOWN_SECTIONS: &[(&str, CategoryId)] = &[
    ("politics", 1),
    ("business", 2),
    ("sports", 3),
    ("sport", 3),
    ("entertainment", 4),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Home,
    Category { id: CategoryId, name: String },
}

pub fn category_id(section: &str) -> Option<CategoryId> {
    let normalized = section.trim().to_lowercase();
    KNOWN_SECTIONS
        .iter()
        .find(|(slug, _)| *slug == normalized)
        .map(|(_, id)| *id)
}

pub fn category_name(id: CategoryId) -> &'static str {
    match id {
        1 => "Politics",
        2 => "Business",
        3 => "Sports",
        4 => "Entertainment",
        _ => "Unknown",
    }
}

/// `"World News"` -> `"world-news"`
pub fn category_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Resolve a section against an already-fetched category list.
pub fn resolve_in(section: &str, categories: &[Category]) -> Option<Section> {
    let slug = section.trim().to_lowercase();
    if slug == "home" {
        return Some(Section::Home);
    }
    if let Some(id) = category_id(&slug) {
        let name = categories
            .iter()
            .find(|c| c.category_id == id)
            .map(|c| c.category_name.clone())
            .unwrap_or_else(|| category_name(id).to_string());
        return Some(Section::Category { id, name });
    }
    categories
        .iter()
        .find(|c| category_slug(&c.category_name) == slug)
        .map(|c| Section::Category {
            id: c.category_id,
            name: c.category_name.clone(),
        })
}

/// Resolve a section slug, consulting `/categories` only when the slug is not
/// one of the fixed sections.
pub async fn resolve(source: &dyn ContentSource, section: &str) -> ApiResult<Section> {
    if let Some(found) = resolve_in(section, &[]) {
        return Ok(found);
    }
    let categories = match source.categories().await {
        Ok(c) => c,
        Err(err) => {
            log::warn!("Failed to load categories: {}", err);
            Vec::new()
        }
    };
    resolve_in(section, &categories).ok_or_else(|| ApiError::UnknownSection(section.to_string()))
}
