//! Search/Filter Engine.
//!
//! Answers filter queries over a built [`ContentIndex`]: an optional tag
//! restriction plus a case-insensitive substring match over title, summary,
//! and tags. Results keep the index's listing order; there is no relevance
//! ranking.

use crate::application::index::ContentIndex;
use crate::domain::articles::Article;

/// The sentinel value a tag filter control sends when no tag is selected.
pub const ALL_TAGS_SENTINEL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagSelector {
    #[default]
    All,
    Tag(String),
}

impl TagSelector {
    /// Interpret raw user input: absent or the `all` sentinel means no filter.
    pub fn from_input(value: Option<&str>) -> Self {
        match value {
            None => TagSelector::All,
            Some(tag) if tag.eq_ignore_ascii_case(ALL_TAGS_SENTINEL) => TagSelector::All,
            Some(tag) => TagSelector::Tag(tag.to_string()),
        }
    }
}

/// A transient query: free text (possibly empty) plus a tag selector.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub tag: TagSelector,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, tag: TagSelector) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// Run `query` against the index.
///
/// An unknown tag yields an empty result, not an error. Empty text matches
/// every candidate, so `search("", All)` returns the full listing. Read-only
/// over the index; safe to call repeatedly and concurrently.
pub fn search<'index>(index: &'index ContentIndex, query: &SearchQuery) -> Vec<&'index Article> {
    let mut candidates: Vec<&Article> = match &query.tag {
        TagSelector::All => index.articles().iter().collect(),
        TagSelector::Tag(tag) => match index.tag_entry(tag) {
            Some(entry) => entry
                .slugs
                .iter()
                .filter_map(|slug| index.find_by_slug(slug))
                .collect(),
            None => Vec::new(),
        },
    };

    if !query.text.is_empty() {
        let needle = query.text.to_lowercase();
        candidates.retain(|article| matches_text(article, &needle));
    }

    candidates
}

fn matches_text(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article.summary.to_lowercase().contains(needle)
        || article
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::application::index::{ContentIndex, IndexOptions};
    use crate::domain::articles::BodySource;

    use super::*;

    fn article(slug: &str, title: &str, date: time::Date, tags: &[&str], summary: &str) -> Article {
        Article {
            slug: slug.to_string(),
            title: title.to_string(),
            date,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            summary: summary.to_string(),
            body: BodySource {
                path: format!("content/{slug}.md").into(),
                offset: 0,
            },
        }
    }

    fn sample_index() -> ContentIndex {
        ContentIndex::build(
            vec![
                article(
                    "a",
                    "Budget alarms",
                    date!(2024 - 01 - 01),
                    &["AWS"],
                    "Keeping spend visible.",
                ),
                article(
                    "b",
                    "Regions and zones",
                    date!(2024 - 06 - 01),
                    &["AWS", "Cloud"],
                    "Where workloads actually run.",
                ),
            ],
            IndexOptions::default(),
        )
        .expect("index")
    }

    fn slugs(results: &[&Article]) -> Vec<String> {
        results.iter().map(|article| article.slug.clone()).collect()
    }

    #[test]
    fn empty_query_without_tag_returns_full_listing() {
        let index = sample_index();
        let results = search(&index, &SearchQuery::new("", TagSelector::All));
        assert_eq!(slugs(&results), ["b", "a"]);
    }

    #[test]
    fn tag_filter_restricts_to_entry_members() {
        let index = sample_index();

        let aws = search(&index, &SearchQuery::new("", TagSelector::from_input(Some("AWS"))));
        assert_eq!(slugs(&aws), ["b", "a"]);

        let cloud = search(&index, &SearchQuery::new("", TagSelector::from_input(Some("Cloud"))));
        assert_eq!(slugs(&cloud), ["b"]);
    }

    #[test]
    fn unknown_tag_yields_empty_result() {
        let index = sample_index();
        let results = search(
            &index,
            &SearchQuery::new("", TagSelector::Tag("unknown-tag".to_string())),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn all_sentinel_means_no_tag_filter() {
        let index = sample_index();
        let results = search(&index, &SearchQuery::new("", TagSelector::from_input(Some("all"))));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn text_matches_tags_case_insensitively() {
        let index = sample_index();
        let results = search(&index, &SearchQuery::new("cloud", TagSelector::All));
        assert_eq!(slugs(&results), ["b"]);
    }

    #[test]
    fn text_matches_title_and_summary() {
        let index = sample_index();

        let by_title = search(&index, &SearchQuery::new("ALARMS", TagSelector::All));
        assert_eq!(slugs(&by_title), ["a"]);

        let by_summary = search(&index, &SearchQuery::new("workloads", TagSelector::All));
        assert_eq!(slugs(&by_summary), ["b"]);
    }

    #[test]
    fn text_never_widens_a_tag_filter() {
        let index = sample_index();
        let tag = TagSelector::Tag("AWS".to_string());

        let unfiltered = search(&index, &SearchQuery::new("", tag.clone()));
        let filtered = search(&index, &SearchQuery::new("regions", tag));

        let unfiltered = slugs(&unfiltered);
        for slug in slugs(&filtered) {
            assert!(unfiltered.contains(&slug));
        }
    }

    #[test]
    fn results_keep_listing_order() {
        let index = ContentIndex::build(
            vec![
                article("beta", "Same day", date!(2024 - 04 - 01), &["x"], ""),
                article("alpha", "Same day", date!(2024 - 04 - 01), &["x"], ""),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let results = search(&index, &SearchQuery::new("same", TagSelector::All));
        assert_eq!(slugs(&results), ["alpha", "beta"]);
    }
}
