//! Business category taxonomy and segment classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category assigned to a restaurant record.
///
/// This is a closed set. Anything that doesn't match one of the specific
/// categories falls back to [`Category::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Drugstore,
    Convenience,
    Cafe,
    Super,
    Default,
}

/// Markers checked in priority order. The first category with any marker
/// contained in the segment wins.
const RULES: &[(Category, &[&str])] = &[
    (Category::Drugstore, &["ドラッグ"]),
    (Category::Convenience, &["コンビニ"]),
    (Category::Cafe, &["喫茶", "カフェ", "バー", "ラウンジ"]),
    (Category::Super, &["スーパー", "小売", "百貨店"]),
];

impl Category {
    /// All categories, in classification priority order.
    pub const ALL: [Category; 5] = [
        Category::Drugstore,
        Category::Convenience,
        Category::Cafe,
        Category::Super,
        Category::Default,
    ];

    /// The token used in feeds, filters and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drugstore => "drugstore",
            Category::Convenience => "convenience",
            Category::Cafe => "cafe",
            Category::Super => "super",
            Category::Default => "default",
        }
    }

    /// Display label for map popups.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Drugstore => "ドラッグストア",
            Category::Convenience => "コンビニ",
            Category::Cafe => "カフェ・喫茶店",
            Category::Super => "スーパー",
            Category::Default => "レストラン",
        }
    }

    /// Parse a category token. Returns `None` for unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == token)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw business segment string.
///
/// Matching is by substring containment on the trimmed input. Empty and
/// unmatched input both yield [`Category::Default`]; this never fails.
///
/// # Examples
///
/// ```
/// use poi_server::domain::{Category, classify};
///
/// assert_eq!(classify("ドラッグストア"), Category::Drugstore);
/// assert_eq!(classify("  "), Category::Default);
/// assert_eq!(classify("一般食堂"), Category::Default);
/// ```
pub fn classify(raw_segment: &str) -> Category {
    let s = raw_segment.trim();
    if s.is_empty() {
        return Category::Default;
    }

    RULES
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| s.contains(m)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Default)
}
