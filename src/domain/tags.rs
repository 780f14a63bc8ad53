//! Tag normalization rules shared by the index builder and the search engine.

use serde::Deserialize;

/// Display casing policy for tag labels.
///
/// The content set does not guarantee consistent casing across articles
/// (`"AWS"` in one file, `"aws"` in another), so the label shown for a
/// normalized key is a policy decision rather than a fixed rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCasing {
    /// The first casing seen for a key (in index order) becomes its label.
    #[default]
    FirstSeen,
    /// Labels are always the lowercased key.
    Lowercase,
}

impl TagCasing {
    pub fn as_str(self) -> &'static str {
        match self {
            TagCasing::FirstSeen => "first-seen",
            TagCasing::Lowercase => "lowercase",
        }
    }
}

impl TryFrom<&str> for TagCasing {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "first-seen" => Ok(TagCasing::FirstSeen),
            "lowercase" => Ok(TagCasing::Lowercase),
            _ => Err(()),
        }
    }
}

/// Canonical index key for a tag: trimmed, internal whitespace collapsed to
/// single spaces, lowercased.
pub fn normalize_key(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// Display form of a tag before any casing policy applies: trimmed and
/// whitespace-collapsed, original casing preserved.
pub fn display_form(raw: &str) -> String {
    collapse_whitespace(raw)
}

fn collapse_whitespace(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !output.is_empty() {
            output.push(' ');
        }
        output.push_str(word);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_trims_collapses_and_lowercases() {
        assert_eq!(normalize_key("  Cloud   Native\tOps "), "cloud native ops");
    }

    #[test]
    fn display_form_preserves_casing() {
        assert_eq!(display_form("  Cloud   Native "), "Cloud Native");
    }

    #[test]
    fn normalize_key_handles_unicode_casing() {
        assert_eq!(normalize_key("Straße"), "straße");
    }

    #[test]
    fn tag_casing_parses_kebab_names() {
        assert_eq!(TagCasing::try_from("first-seen"), Ok(TagCasing::FirstSeen));
        assert_eq!(TagCasing::try_from("lowercase"), Ok(TagCasing::Lowercase));
        assert!(TagCasing::try_from("mixed").is_err());
    }
}
