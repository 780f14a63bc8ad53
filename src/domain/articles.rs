//! Article records and their date formatting rules.

use std::path::PathBuf;

use serde::Serialize;
use time::{Date, format_description::FormatItem, macros::format_description};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

/// Opaque handle to an article's full body content.
///
/// The indexing subsystem never parses article bodies; a handle records where
/// the body starts in its source file so a rendering collaborator can read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodySource {
    pub path: PathBuf,
    pub offset: usize,
}

/// A single blog article as loaded from the content set.
///
/// `slug` must be unique within the collection and `date` is the sole sort
/// key for listing order (descending). `tags` keep the casing the author
/// wrote; normalization happens when the tag index is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub date: Date,
    pub tags: Vec<String>,
    pub summary: String,
    pub body: BodySource,
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).expect("valid calendar date")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn human_date_format_is_long_form() {
        assert_eq!(format_human_date(date!(2024 - 06 - 01)), "June 1, 2024");
    }

    #[test]
    fn iso_date_format_pads_components() {
        assert_eq!(format_iso_date(date!(2024 - 06 - 01)), "2024-06-01");
    }
}
