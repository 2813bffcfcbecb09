//! Post list filtering and pagination.
//!
//! # Responsibility
//! - Filter published posts by search term, category, author and tags.
//! - Derive filter option lists and page slices for the list view.
//!
//! # Invariants
//! - Filtering is pure and preserves input order.
//! - Search matches the sanitized plain text of the content, never markup.

use crate::model::post::Post;
use crate::sanitize::{plain_text, SanitizationPolicy};
use std::collections::BTreeSet;

/// Active filters. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    /// Every listed tag must be present on a matching post.
    pub tags: Vec<String>,
}

/// One page of items plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually returned after clamping.
    pub page: usize,
    pub total_pages: usize,
}

/// Returns the posts matching every set filter of `query`.
pub fn filter_posts<'a>(posts: &'a [Post], query: &PostQuery) -> Vec<&'a Post> {
    let search = active(&query.search).map(str::to_lowercase);
    let category = active(&query.category);
    let author = active(&query.author);

    posts
        .iter()
        .filter(|post| category.map_or(true, |category| post.category == category))
        .filter(|post| author.map_or(true, |author| post.author == author))
        .filter(|post| query.tags.iter().all(|tag| post.tags.contains(tag)))
        .filter(|post| {
            search
                .as_deref()
                .map_or(true, |term| matches_search(post, term))
        })
        .collect()
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn matches_search(post: &Post, term: &str) -> bool {
    post.title.to_lowercase().contains(term)
        || plain_text(&post.content, SanitizationPolicy::article())
            .to_lowercase()
            .contains(term)
}

/// Distinct categories in first-seen order.
pub fn categories(posts: &[Post]) -> Vec<String> {
    distinct(posts.iter().map(|post| post.category.as_str()))
}

/// Distinct authors in first-seen order.
pub fn authors(posts: &[Post]) -> Vec<String> {
    distinct(posts.iter().map(|post| post.author.as_str()))
}

/// Every tag used by any post, sorted.
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Returns the 1-based `page` of `items`, `per_page` at a time.
///
/// Out-of-range pages clamp to the nearest valid page; an empty list has one
/// empty page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total_pages,
    }
}
