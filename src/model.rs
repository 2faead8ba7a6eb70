//! Catalog records and the filter value object
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Category string meaning "no category filter".
pub const ALL_CATEGORIES: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog item. Owned by the caller's data source; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: FeatureId,
    pub display_name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Feature {
    pub fn new(
        id: u64,
        display_name: impl Into<String>,
        category_id: u64,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            id: FeatureId(id),
            display_name: display_name.into(),
            category_id: CategoryId(category_id),
            keywords,
        }
    }

    /// Case-insensitive containment against the display name or any keyword.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        contains_folded(&self.display_name, needle)
            || self
                .keywords
                .iter()
                .any(|keyword| contains_folded(keyword, needle))
    }
}

/// Case-insensitive `contains` against an already lowercased needle. ASCII
/// text is compared in place; anything else goes through `to_lowercase`.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()));
    }
    haystack.to_lowercase().contains(needle)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
        }
    }
}

/// Read-only identifier to display-name map, built once by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLookup {
    names: HashMap<CategoryId, String>,
}

impl CategoryLookup {
    pub fn from_categories(categories: &[Category]) -> Self {
        Self {
            names: categories
                .iter()
                .map(|category| (category.id, category.name.clone()))
                .collect(),
        }
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(CategoryId, String)> for CategoryLookup {
    fn from_iter<I: IntoIterator<Item = (CategoryId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Parsed form of the category selection string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    All,
    Id(CategoryId),
    /// Not a decimal identifier. Matches nothing.
    Invalid(String),
}

impl CategoryFilter {
    /// Only `"0"` disables the filter. Blank input is not an identifier and
    /// matches nothing, like any other unparsable value.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == ALL_CATEGORIES {
            return CategoryFilter::All;
        }
        match trimmed.parse::<u64>() {
            Ok(id) => CategoryFilter::Id(CategoryId(id)),
            Err(_) => CategoryFilter::Invalid(trimmed.to_string()),
        }
    }

    pub fn admits(&self, feature: &Feature) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => feature.category_id == *id,
            CategoryFilter::Invalid(_) => false,
        }
    }
}

/// The whole browse state. Every intent produces a new value; fields are
/// never updated one at a time from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    search_text: String,
    category: String,
    page: usize,
    offset: usize,
    page_size: usize,
}

impl Filters {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            category: ALL_CATEGORIES.to_string(),
            page: 1,
            offset: 0,
            page_size,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::parse(&self.category)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_search(&self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self.clone()
        }
        .with_page(1)
    }

    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
        .with_page(1)
    }

    pub fn with_page(&self, page: usize) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: crate::pagination::offset(page, self.page_size),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("0"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::Invalid(String::new()));
        assert_eq!(CategoryFilter::parse(" \t "), CategoryFilter::Invalid(String::new()));
        assert_eq!(CategoryFilter::parse(" 7 "), CategoryFilter::Id(CategoryId(7)));
        assert_eq!(
            CategoryFilter::parse("2abc"),
            CategoryFilter::Invalid("2abc".to_string())
        );
        assert_eq!(
            CategoryFilter::parse("-1"),
            CategoryFilter::Invalid("-1".to_string())
        );
    }

    #[test]
    fn test_invalid_category_admits_nothing() {
        let feature = Feature::new(1, "Alpha", 1, vec![]);
        assert!(!CategoryFilter::parse("abc").admits(&feature));
        assert!(CategoryFilter::parse("1").admits(&feature));
        assert!(!CategoryFilter::parse("2").admits(&feature));
    }

    #[test]
    fn test_text_match_is_case_insensitive_over_name_and_keywords() {
        let feature = Feature::new(1, "Dark Mode", 1, vec!["Theme".to_string()]);
        assert!(feature.matches_text("dark"));
        assert!(feature.matches_text("eme"));
        assert!(!feature.matches_text("light"));
    }

    #[test]
    fn test_text_match_folds_non_ascii() {
        let feature = Feature::new(1, "Überblick", 1, vec!["ÉTAT".to_string()]);
        assert!(feature.matches_text("über"));
        assert!(feature.matches_text("état"));
        assert!(!feature.matches_text("uber"));
    }

    #[test]
    fn test_blank_category_admits_nothing() {
        let feature = Feature::new(1, "Alpha", 1, vec![]);
        for raw in ["", "   ", "\t"] {
            assert!(!CategoryFilter::parse(raw).admits(&feature), "{raw:?}");
        }
    }

    #[test]
    fn test_filters_keep_offset_in_step_with_page() {
        let filters = Filters::new(5).with_page(3);
        assert_eq!(filters.page(), 3);
        assert_eq!(filters.offset(), 10);

        let reset = filters.with_category("2");
        assert_eq!(reset.page(), 1);
        assert_eq!(reset.offset(), 0);
        assert_eq!(reset.category(), "2");

        assert_eq!(Filters::new(5).with_page(0).page(), 1);
    }

    #[test]
    fn test_feature_json_shape() {
        let feature: Feature = serde_json::from_str(
            r#"{"id": 3, "displayName": "Export", "categoryId": 2, "keywords": ["csv"]}"#,
        )
        .unwrap();
        assert_eq!(feature, Feature::new(3, "Export", 2, vec!["csv".to_string()]));

        let bare: Feature =
            serde_json::from_str(r#"{"id": 4, "displayName": "Import", "categoryId": 2}"#).unwrap();
        assert!(bare.keywords.is_empty());
    }

    #[test]
    fn test_lookup_from_categories() {
        let lookup = CategoryLookup::from_categories(&[
            Category::new(1, "Core"),
            Category::new(2, "Extras"),
        ]);
        assert_eq!(lookup.name(CategoryId(2)), Some("Extras"));
        assert_eq!(lookup.name(CategoryId(9)), None);
        assert_eq!(lookup.len(), 2);
    }
}
