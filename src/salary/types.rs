use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of salary signal a mention belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ZeroHourContract,
    Hourly,
    Daily,
    Weekly,
    Annual,
    NationalLivingWage,
    MinimumWage,
    Competitive,
    Negotiable,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::ZeroHourContract,
        Category::Hourly,
        Category::Daily,
        Category::Weekly,
        Category::Annual,
        Category::NationalLivingWage,
        Category::MinimumWage,
        Category::Competitive,
        Category::Negotiable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ZeroHourContract => "zero_hour_contract",
            Category::Hourly => "hourly",
            Category::Daily => "daily",
            Category::Weekly => "weekly",
            Category::Annual => "annual",
            Category::NationalLivingWage => "national_living_wage",
            Category::MinimumWage => "minimum_wage",
            Category::Competitive => "competitive",
            Category::Negotiable => "negotiable",
        }
    }

    /// Whether mentions of this category carry numeric bounds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Category::Hourly | Category::Daily | Category::Weekly | Category::Annual
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected wage statement.
///
/// `high` is only set when a range was found. Source text is not always
/// consistent, so `high < low` is kept as-is rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryMention {
    pub category: Category,
    pub low: Option<f64>,
    pub high: Option<f64>,
    /// Byte offset of the match in the description.
    pub start: usize,
    /// The matched text, kept for auditing.
    pub span: String,
}

impl SalaryMention {
    pub fn phrase(category: Category, text: &str, start: usize, end: usize) -> Self {
        Self {
            category,
            low: None,
            high: None,
            start,
            span: text[start..end].to_string(),
        }
    }

    /// True when both bounds are present and the upper one is below the lower one.
    pub fn is_inverted(&self) -> bool {
        matches!((self.low, self.high), (Some(low), Some(high)) if high < low)
    }
}

/// Policy knobs for the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum number of filler words between a figure and its frequency keyword.
    pub keyword_window: usize,
    /// Maximum number of words between a `salar*` word and a bare k figure.
    pub salary_word_window: usize,
}

impl ExtractorConfig {
    pub const DEFAULT_KEYWORD_WINDOW: usize = 4;
    pub const DEFAULT_SALARY_WORD_WINDOW: usize = 2;
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keyword_window: Self::DEFAULT_KEYWORD_WINDOW,
            salary_word_window: Self::DEFAULT_SALARY_WORD_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::ZeroHourContract).unwrap();
        assert_eq!(json, r#""zero_hour_contract""#);
        assert_eq!(Category::NationalLivingWage.to_string(), "national_living_wage");
    }

    #[test]
    fn test_only_frequency_categories_are_numeric() {
        let numeric: Vec<Category> = Category::ALL
            .iter()
            .copied()
            .filter(Category::is_numeric)
            .collect();
        assert_eq!(
            numeric,
            vec![Category::Hourly, Category::Daily, Category::Weekly, Category::Annual]
        );
    }

    #[test]
    fn test_inverted_range_is_flagged_not_rejected() {
        let mention = SalaryMention {
            category: Category::Hourly,
            low: Some(12.0),
            high: Some(10.0),
            start: 0,
            span: "£12 to £10".to_string(),
        };
        assert!(mention.is_inverted());
    }
}
