//! Content Index Builder.
//!
//! Scans the loaded article set once and produces the immutable structures
//! everything else reads: the chronologically ordered article list, the tag
//! index, and per-tag counts. Built at startup and never mutated afterwards,
//! so any number of concurrent readers need no coordination.

use std::collections::HashMap;

use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::articles::Article;
use crate::domain::tags::{self, TagCasing};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("article `{title}` has an empty slug")]
    EmptySlug { title: String },
    #[error("duplicate article slug `{slug}`")]
    DuplicateSlug { slug: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexOptions {
    pub tag_casing: TagCasing,
}

/// One tag index entry: the articles carrying a tag, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    /// Normalized index key (trimmed, whitespace-collapsed, lowercased).
    pub key: String,
    /// Display label resolved by the configured casing policy.
    pub label: String,
    /// Slugs of member articles, ordered by date descending, slug ascending.
    pub slugs: Vec<String>,
}

/// Tag-to-count mapping consumed by navigation collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub key: String,
    pub label: String,
    pub count: usize,
}

/// The immutable content index: ordered articles plus derived tag structures.
#[derive(Debug)]
pub struct ContentIndex {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
    tag_index: HashMap<String, TagEntry>,
}

impl ContentIndex {
    /// Build the index from the full article set.
    ///
    /// Articles are sorted by slug ascending first and then stably by date
    /// descending, so the resulting order never depends on how the content
    /// loader happened to iterate the filesystem. An empty or duplicate slug
    /// is a configuration error that halts construction.
    pub fn build(mut articles: Vec<Article>, options: IndexOptions) -> Result<Self, IndexError> {
        for article in &articles {
            if article.slug.trim().is_empty() {
                return Err(IndexError::EmptySlug {
                    title: article.title.clone(),
                });
            }
        }

        articles.sort_by(|a, b| a.slug.cmp(&b.slug));
        for pair in articles.windows(2) {
            if pair[0].slug == pair[1].slug {
                return Err(IndexError::DuplicateSlug {
                    slug: pair[0].slug.clone(),
                });
            }
        }
        articles.sort_by(|a, b| b.date.cmp(&a.date));

        let by_slug = articles
            .iter()
            .enumerate()
            .map(|(position, article)| (article.slug.clone(), position))
            .collect();

        let tag_index = build_tag_index(&articles, options.tag_casing);

        counter!("foglio_articles_indexed_total").increment(articles.len() as u64);
        counter!("foglio_tags_indexed_total").increment(tag_index.len() as u64);
        debug!(
            articles = articles.len(),
            tags = tag_index.len(),
            "content index built"
        );

        Ok(Self {
            articles,
            by_slug,
            tag_index,
        })
    }

    /// All articles in listing order (date descending, slug ascending).
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Article> {
        self.by_slug
            .get(slug)
            .map(|position| &self.articles[*position])
    }

    /// Tag index entry for `tag`, normalized the same way the index was built.
    pub fn tag_entry(&self, tag: &str) -> Option<&TagEntry> {
        self.tag_index.get(&tags::normalize_key(tag))
    }

    pub fn is_known_tag(&self, tag: &str) -> bool {
        self.tag_entry(tag).is_some()
    }

    /// Per-tag article counts, ordered by count descending then key ascending.
    pub fn tag_counts(&self) -> Vec<TagCount> {
        let mut counts: Vec<TagCount> = self
            .tag_index
            .values()
            .map(|entry| TagCount {
                key: entry.key.clone(),
                label: entry.label.clone(),
                count: entry.slugs.len(),
            })
            .collect();

        counts.sort_by(|left, right| {
            right
                .count
                .cmp(&left.count)
                .then_with(|| left.key.cmp(&right.key))
        });
        counts
    }
}

fn build_tag_index(articles: &[Article], casing: TagCasing) -> HashMap<String, TagEntry> {
    let mut index: HashMap<String, TagEntry> = HashMap::new();

    // Articles are already in listing order, so entry slug lists and the
    // first-seen label both follow that order.
    for article in articles {
        for raw in &article.tags {
            let key = tags::normalize_key(raw);
            if key.is_empty() {
                continue;
            }

            let entry = index.entry(key.clone()).or_insert_with(|| TagEntry {
                label: match casing {
                    TagCasing::FirstSeen => tags::display_form(raw),
                    TagCasing::Lowercase => key.clone(),
                },
                key,
                slugs: Vec::new(),
            });

            // The same tag may appear twice in one article's tag set.
            if entry.slugs.last().map(String::as_str) != Some(article.slug.as_str()) {
                entry.slugs.push(article.slug.clone());
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::domain::articles::BodySource;

    use super::*;

    fn article(slug: &str, date: time::Date, tags: &[&str]) -> Article {
        Article {
            slug: slug.to_string(),
            title: format!("Title for {slug}"),
            date,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            summary: format!("Summary for {slug}"),
            body: BodySource {
                path: format!("content/{slug}.md").into(),
                offset: 0,
            },
        }
    }

    #[test]
    fn listing_order_is_date_descending() {
        let index = ContentIndex::build(
            vec![
                article("older", date!(2024 - 01 - 01), &[]),
                article("newer", date!(2024 - 06 - 01), &[]),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let slugs: Vec<&str> = index
            .articles()
            .iter()
            .map(|article| article.slug.as_str())
            .collect();
        assert_eq!(slugs, ["newer", "older"]);
    }

    #[test]
    fn equal_dates_break_ties_by_slug_ascending() {
        // Input order is reversed on purpose: the result must not depend on it.
        let index = ContentIndex::build(
            vec![
                article("beta", date!(2024 - 03 - 10), &[]),
                article("alpha", date!(2024 - 03 - 10), &[]),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let slugs: Vec<&str> = index
            .articles()
            .iter()
            .map(|article| article.slug.as_str())
            .collect();
        assert_eq!(slugs, ["alpha", "beta"]);
    }

    #[test]
    fn duplicate_slug_is_fatal() {
        let result = ContentIndex::build(
            vec![
                article("repeat", date!(2024 - 01 - 01), &[]),
                article("repeat", date!(2024 - 02 - 01), &[]),
            ],
            IndexOptions::default(),
        );

        assert!(matches!(
            result,
            Err(IndexError::DuplicateSlug { slug }) if slug == "repeat"
        ));
    }

    #[test]
    fn empty_slug_is_fatal() {
        let mut bad = article("x", date!(2024 - 01 - 01), &[]);
        bad.slug = "  ".to_string();

        assert!(matches!(
            ContentIndex::build(vec![bad], IndexOptions::default()),
            Err(IndexError::EmptySlug { .. })
        ));
    }

    #[test]
    fn tag_entries_hold_exactly_the_member_slugs_in_order() {
        let index = ContentIndex::build(
            vec![
                article("a", date!(2024 - 01 - 01), &["AWS"]),
                article("b", date!(2024 - 06 - 01), &["AWS", "Cloud"]),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let aws = index.tag_entry("aws").expect("aws entry");
        assert_eq!(aws.slugs, ["b", "a"]);
        assert_eq!(aws.label, "AWS");

        let cloud = index.tag_entry("Cloud").expect("cloud entry");
        assert_eq!(cloud.slugs, ["b"]);
    }

    #[test]
    fn mixed_casing_collapses_to_one_entry_with_first_seen_label() {
        let index = ContentIndex::build(
            vec![
                article("a", date!(2024 - 01 - 01), &["rust "]),
                article("b", date!(2024 - 06 - 01), &["Rust"]),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let counts = index.tag_counts();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 2);
        // `b` sorts first (newer date), so its casing wins.
        assert_eq!(counts[0].label, "Rust");
    }

    #[test]
    fn lowercase_policy_overrides_authored_casing() {
        let index = ContentIndex::build(
            vec![article("a", date!(2024 - 01 - 01), &["GitOps"])],
            IndexOptions {
                tag_casing: TagCasing::Lowercase,
            },
        )
        .expect("index");

        assert_eq!(index.tag_counts()[0].label, "gitops");
    }

    #[test]
    fn repeated_tag_within_one_article_counts_once() {
        let index = ContentIndex::build(
            vec![article("a", date!(2024 - 01 - 01), &["Rust", "rust"])],
            IndexOptions::default(),
        )
        .expect("index");

        assert_eq!(index.tag_entry("rust").expect("entry").slugs, ["a"]);
    }

    #[test]
    fn tag_counts_order_by_count_then_key() {
        let index = ContentIndex::build(
            vec![
                article("a", date!(2024 - 01 - 01), &["zig", "ops"]),
                article("b", date!(2024 - 02 - 01), &["ops"]),
                article("c", date!(2024 - 03 - 01), &["ada"]),
            ],
            IndexOptions::default(),
        )
        .expect("index");

        let counts = index.tag_counts();
        let keys: Vec<&str> = counts.iter().map(|count| count.key.as_str()).collect();
        assert_eq!(keys, ["ops", "ada", "zig"]);
    }

    #[test]
    fn rebuild_from_shuffled_input_is_identical() {
        let set = vec![
            article("gamma", date!(2024 - 02 - 01), &["Ops"]),
            article("alpha", date!(2024 - 02 - 01), &["Ops"]),
            article("beta", date!(2024 - 05 - 01), &[]),
        ];

        let mut reversed = set.clone();
        reversed.reverse();

        let first = ContentIndex::build(set, IndexOptions::default()).expect("index");
        let second = ContentIndex::build(reversed, IndexOptions::default()).expect("index");

        assert_eq!(first.articles(), second.articles());
        assert_eq!(first.tag_counts(), second.tag_counts());
    }
}
