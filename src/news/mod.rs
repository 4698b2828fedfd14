//! Content API access: DTOs, the HTTP client and section lookup.

pub mod categories;
mod fetch;
mod model;

#[cfg(test)]
pub mod fake;

pub use fetch::{ContentApi, ContentSource, PageRequest};
pub use model::{Category, CategoryId, SearchStory, Story, StoryId};
