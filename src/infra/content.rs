//! Content loader: turns a directory of markdown files into `Article` records.
//!
//! Each article is a `*.md` file opening with a TOML front matter block
//! fenced by `+++` lines:
//!
//! ```text
//! +++
//! title = "Regions and zones"
//! date = "2024-06-01"
//! tags = ["AWS", "Cloud"]
//! summary = "Where workloads actually run."
//! +++
//!
//! Body markdown follows and is never parsed here.
//! ```
//!
//! `title` and `date` are required; a file that cannot produce a valid record
//! is a fatal configuration error naming the offending path, never a silent
//! drop. The body stays behind an opaque [`BodySource`] handle for rendering
//! collaborators.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use metrics::counter;
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use tracing::{debug, info};

use crate::domain::articles::{Article, BodySource, ISO_DATE_FORMAT};
use crate::domain::slug::{self, SlugError};

const FRONT_MATTER_FENCE: &str = "+++";
const SUMMARY_ELLIPSIS: char = '…';

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content directory `{path}`: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{path}` is missing a `+++` front matter block")]
    MissingFrontMatter { path: PathBuf },
    #[error("invalid front matter in `{path}`: {source}")]
    InvalidFrontMatter {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("invalid date `{value}` in `{path}`: expected YYYY-MM-DD")]
    InvalidDate { path: PathBuf, value: String },
    #[error("cannot derive a slug for `{path}`: {source}")]
    Slug {
        path: PathBuf,
        #[source]
        source: SlugError,
    },
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Character budget for summaries derived from the body's first paragraph.
    pub summary_max_chars: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            summary_max_chars: 240,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    /// Calendar date as a quoted `YYYY-MM-DD` string.
    date: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
    /// Optional explicit slug; otherwise derived from the file stem.
    #[serde(default)]
    slug: Option<String>,
}

/// Load every `*.md` article under `directory` (non-recursive).
///
/// Files are visited in path order so derived-slug disambiguation is
/// deterministic; listing order itself is re-established by the index
/// builder and does not depend on this pass.
pub fn load_articles(
    directory: &Path,
    options: &LoaderOptions,
) -> Result<Vec<Article>, ContentError> {
    let entries = fs::read_dir(directory).map_err(|source| ContentError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ContentError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut articles = Vec::with_capacity(paths.len());
    let mut assigned: HashSet<String> = HashSet::new();

    for path in paths {
        let article = load_article(&path, options, &mut assigned)?;
        debug!(slug = %article.slug, path = %path.display(), "loaded article");
        articles.push(article);
    }

    counter!("foglio_articles_loaded_total").increment(articles.len() as u64);
    info!(
        count = articles.len(),
        directory = %directory.display(),
        "content directory loaded"
    );

    Ok(articles)
}

fn load_article(
    path: &Path,
    options: &LoaderOptions,
    assigned: &mut HashSet<String>,
) -> Result<Article, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let (front_raw, body_offset) =
        split_front_matter(&raw).ok_or_else(|| ContentError::MissingFrontMatter {
            path: path.to_path_buf(),
        })?;

    let front: FrontMatter =
        toml::from_str(front_raw).map_err(|source| ContentError::InvalidFrontMatter {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    let date = Date::parse(front.date.trim(), ISO_DATE_FORMAT).map_err(|_| {
        ContentError::InvalidDate {
            path: path.to_path_buf(),
            value: front.date.clone(),
        }
    })?;

    let slug = resolve_slug(path, front.slug.as_deref(), assigned)?;
    assigned.insert(slug.clone());

    let summary = match front.summary {
        Some(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
        _ => summarize_body(&raw[body_offset..], options.summary_max_chars),
    };

    Ok(Article {
        slug,
        title: front.title.trim().to_string(),
        date,
        tags: front.tags,
        summary,
        body: BodySource {
            path: path.to_path_buf(),
            offset: body_offset,
        },
    })
}

/// Explicit front-matter slugs are taken verbatim (the index builder enforces
/// uniqueness across the collection); derived slugs are disambiguated against
/// already-assigned ones so two stems that slugify identically both load.
fn resolve_slug(
    path: &Path,
    explicit: Option<&str>,
    assigned: &HashSet<String>,
) -> Result<String, ContentError> {
    if let Some(slug) = explicit {
        return Ok(slug.trim().to_string());
    }

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();

    slug::derive_unique_slug(stem, |candidate| !assigned.contains(candidate)).map_err(|source| {
        ContentError::Slug {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Split a raw file into its front matter text and the byte offset where the
/// body begins (just past the closing fence line).
fn split_front_matter(raw: &str) -> Option<(&str, usize)> {
    let after_open = raw.strip_prefix(FRONT_MATTER_FENCE)?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;
    let front_start = raw.len() - after_open.len();

    let mut search_from = 0;
    loop {
        let found = after_open[search_from..].find(FRONT_MATTER_FENCE)? + search_from;
        let at_line_start = found == 0 || after_open.as_bytes()[found - 1] == b'\n';
        let after_close = &after_open[found + FRONT_MATTER_FENCE.len()..];

        let fence_tail = if after_close.starts_with("\r\n") {
            Some(2)
        } else if after_close.starts_with('\n') {
            Some(1)
        } else if after_close.is_empty() {
            Some(0)
        } else {
            None
        };

        if at_line_start {
            if let Some(tail) = fence_tail {
                let front = &after_open[..found];
                let body_offset = front_start + found + FRONT_MATTER_FENCE.len() + tail;
                return Some((front, body_offset));
            }
        }

        search_from = found + FRONT_MATTER_FENCE.len();
    }
}

/// First paragraph of the body, whitespace-collapsed and truncated on a char
/// boundary.
fn summarize_body(body: &str, max_chars: usize) -> String {
    let paragraph = body
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty())
        .unwrap_or_default();

    let mut collapsed = String::with_capacity(paragraph.len());
    for word in paragraph.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut truncated: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push(SUMMARY_ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_front_matter_returns_body_offset() {
        let raw = "+++\ntitle = \"A\"\n+++\nbody starts here";
        let (front, offset) = split_front_matter(raw).expect("front matter");
        assert_eq!(front, "title = \"A\"\n");
        assert_eq!(&raw[offset..], "body starts here");
    }

    #[test]
    fn split_front_matter_requires_opening_fence() {
        assert!(split_front_matter("title = \"A\"\n").is_none());
        assert!(split_front_matter("+++title\n+++\n").is_none());
    }

    #[test]
    fn split_front_matter_ignores_fence_mid_line() {
        let raw = "+++\nvalue = \"a +++ b\"\n+++\nbody";
        let (front, offset) = split_front_matter(raw).expect("front matter");
        assert_eq!(front, "value = \"a +++ b\"\n");
        assert_eq!(&raw[offset..], "body");
    }

    #[test]
    fn split_front_matter_accepts_fence_at_eof() {
        let raw = "+++\ntitle = \"A\"\n+++";
        let (_, offset) = split_front_matter(raw).expect("front matter");
        assert_eq!(offset, raw.len());
    }

    #[test]
    fn summarize_body_takes_first_paragraph() {
        let body = "\nFirst paragraph\nstill first.\n\nSecond paragraph.";
        assert_eq!(
            summarize_body(body, 240),
            "First paragraph still first."
        );
    }

    #[test]
    fn summarize_body_truncates_on_char_boundary() {
        let body = "héllo wörld, this paragraph keeps going";
        let summary = summarize_body(body, 10);
        assert_eq!(summary.chars().count(), 10);
        assert!(summary.ends_with(SUMMARY_ELLIPSIS));
    }

    #[test]
    fn summarize_body_of_empty_body_is_empty() {
        assert_eq!(summarize_body("\n\n", 240), "");
    }
}
