use quillpost_core::model::post::Post;
use quillpost_core::service::post_service::{
    all_tags, authors, categories, filter_posts, paginate, PostQuery,
};

fn post(id: u64, title: &str, content: &str, author: &str, category: &str, tags: &[&str]) -> Post {
    Post {
        id,
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        date: "2024-01-15".to_string(),
        read_time: 5,
        category: category.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn posts() -> Vec<Post> {
    vec![
        post(1, "Getting Started with Rust", "<p>Ownership <b>basics</b></p>", "Ana", "technology", &["rust", "beginner"]),
        post(2, "Slow Travel", "<p>Trains across <em>Europe</em></p>", "Ben", "travel", &["europe"]),
        post(3, "Async Rust", "<p>Futures and executors</p>", "Ana", "technology", &["rust", "async"]),
        post(4, "Morning Routines", "<p>Coffee first<script>rust()</script></p>", "Cy", "lifestyle", &[]),
    ]
}

fn ids(found: &[&Post]) -> Vec<u64> {
    found.iter().map(|post| post.id).collect()
}

#[test]
fn empty_query_matches_everything() {
    let posts = posts();
    assert_eq!(ids(&filter_posts(&posts, &PostQuery::default())), vec![1, 2, 3, 4]);
}

#[test]
fn category_author_and_tags_must_all_match() {
    let posts = posts();
    let query = PostQuery {
        category: Some("technology".to_string()),
        author: Some("Ana".to_string()),
        tags: vec!["rust".to_string(), "async".to_string()],
        ..PostQuery::default()
    };
    assert_eq!(ids(&filter_posts(&posts, &query)), vec![3]);

    let blank = PostQuery {
        category: Some(String::new()),
        ..PostQuery::default()
    };
    assert_eq!(filter_posts(&posts, &blank).len(), 4);
}

#[test]
fn search_matches_title_and_visible_text_only() {
    let posts = posts();
    let search = |term: &str| {
        ids(&filter_posts(
            &posts,
            &PostQuery {
                search: Some(term.to_string()),
                ..PostQuery::default()
            },
        ))
    };
    assert_eq!(search("RUST"), vec![1, 3]);
    assert_eq!(search("europe"), vec![2]);
    assert_eq!(search("b>"), Vec::<u64>::new());
}

#[test]
fn option_lists_are_distinct() {
    let posts = posts();
    assert_eq!(categories(&posts), vec!["technology", "travel", "lifestyle"]);
    assert_eq!(authors(&posts), vec!["Ana", "Ben", "Cy"]);
    assert_eq!(all_tags(&posts), vec!["async", "beginner", "europe", "rust"]);
}

#[test]
fn pages_clamp_to_valid_range() {
    let items: Vec<u32> = (1..=7).collect();
    let page = paginate(&items, 3, 3);
    assert_eq!(page.items, vec![7]);
    assert_eq!(page.total_pages, 3);

    let clamped = paginate(&items, 9, 3);
    assert_eq!(clamped.page, 3);
    assert_eq!(paginate(&items, 0, 3).items, vec![1, 2, 3]);

    let empty = paginate::<u32>(&[], 1, 3);
    assert_eq!(empty.total_pages, 1);
    assert!(empty.items.is_empty());
}
