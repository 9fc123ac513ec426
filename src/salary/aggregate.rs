use super::classify::{FrequencyClassifier, MissingSuffixRange, SalaryWordThousands};
use super::phrases::PhraseDetector;
use super::types::{Category, ExtractorConfig, SalaryMention};
use serde::{Deserialize, Serialize};

/// One independent predicate over a description.
pub trait Detector: Send + Sync {
    fn category(&self) -> Category;

    /// Every mention found, in text order.
    fn detect(&self, text: &str) -> Vec<SalaryMention>;
}

/// All salary signals found in one description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub mentions: Vec<SalaryMention>,
}

impl SalaryRecord {
    /// Sorts by position and drops mentions overlapping an earlier one of the same category.
    pub fn from_mentions(mut mentions: Vec<SalaryMention>) -> Self {
        mentions.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.start.cmp(&b.start))
                .then(b.span.len().cmp(&a.span.len()))
        });

        let mut kept: Vec<SalaryMention> = Vec::with_capacity(mentions.len());
        for mention in mentions {
            let overlaps = kept.last().is_some_and(|prev| {
                prev.category == mention.category && mention.start < prev.start + prev.span.len()
            });
            if !overlaps {
                kept.push(mention);
            }
        }

        kept.sort_by_key(|m| m.start);
        Self { mentions: kept }
    }

    pub fn flag(&self, category: Category) -> bool {
        self.mentions.iter().any(|m| m.category == category)
    }

    /// Earliest mention of `category`.
    pub fn first(&self, category: Category) -> Option<&SalaryMention> {
        self.mentions.iter().find(|m| m.category == category)
    }

    pub fn bounds(&self, category: Category) -> (Option<f64>, Option<f64>) {
        self.first(category)
            .map_or((None, None), |m| (m.low, m.high))
    }

    pub fn mentions_of(&self, category: Category) -> impl Iterator<Item = &SalaryMention> {
        self.mentions.iter().filter(move |m| m.category == category)
    }

    /// Flagged categories in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.flag(*c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}

/// Runs every detector over the same text; no match suppresses another.
pub struct SalaryExtractor {
    config: ExtractorConfig,
    detectors: Vec<Box<dyn Detector>>,
}

impl SalaryExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(PhraseDetector::zero_hours()),
            Box::new(FrequencyClassifier::hourly(config.keyword_window)),
            Box::new(FrequencyClassifier::daily(config.keyword_window)),
            Box::new(FrequencyClassifier::weekly(config.keyword_window)),
            Box::new(FrequencyClassifier::annual()),
            Box::new(FrequencyClassifier::annual_thousands()),
            Box::new(MissingSuffixRange),
            Box::new(SalaryWordThousands::new(config.salary_word_window)),
            Box::new(PhraseDetector::national_living_wage()),
            Box::new(PhraseDetector::minimum_wage()),
            Box::new(PhraseDetector::competitive()),
            Box::new(PhraseDetector::negotiable()),
        ];
        Self { config, detectors }
    }

    pub fn extract(&self, text: &str) -> SalaryRecord {
        let mentions = self
            .detectors
            .iter()
            .flat_map(|detector| detector.detect(text))
            .collect();
        SalaryRecord::from_mentions(mentions)
    }
}

impl Default for SalaryExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl std::fmt::Debug for SalaryExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalaryExtractor")
            .field("config", &self.config)
            .field("detectors", &self.detectors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> SalaryRecord {
        SalaryExtractor::default().extract(text)
    }

    fn numeric_categories(record: &SalaryRecord) -> Vec<Category> {
        record
            .categories()
            .into_iter()
            .filter(Category::is_numeric)
            .collect()
    }

    #[test]
    fn test_annual_only_for_per_annum() {
        let record = extract("£45,000 per annum");
        assert_eq!(record.bounds(Category::Annual), (Some(45000.0), None));
        assert_eq!(numeric_categories(&record), vec![Category::Annual]);
    }

    #[test]
    fn test_hourly_range() {
        let record = extract("£10 to £12 per hour");
        assert_eq!(record.bounds(Category::Hourly), (Some(10.0), Some(12.0)));
    }

    #[test]
    fn test_k_notation_range() {
        let record = extract("£10k-£120k");
        assert!(!record.flag(Category::Hourly));
        assert!(!record.flag(Category::Daily));
        assert!(!record.flag(Category::Weekly));
        assert_eq!(record.bounds(Category::Annual), (Some(10000.0), Some(120000.0)));
        assert_eq!(record.mentions_of(Category::Annual).count(), 1);
    }

    #[test]
    fn test_competitive_without_figures() {
        let record = extract("Salary is competitive");
        assert!(record.flag(Category::Competitive));
        assert!(numeric_categories(&record).is_empty());
    }

    #[test]
    fn test_zero_hours_and_hourly_together() {
        let record = extract("Zero hours contract, paid £9.50 per hour");
        assert!(record.flag(Category::ZeroHourContract));
        assert_eq!(record.bounds(Category::Hourly), (Some(9.5), None));
    }

    #[test]
    fn test_bare_figure_is_not_hourly_daily_or_weekly() {
        let record = extract("£10,000");
        assert_eq!(numeric_categories(&record), vec![Category::Annual]);
        assert_eq!(record.bounds(Category::Annual), (Some(10000.0), None));
    }

    #[test]
    fn test_missing_suffix_range_wins_over_its_second_half() {
        let record = extract("Salary £50-£55k");
        let annual: Vec<&SalaryMention> = record.mentions_of(Category::Annual).collect();
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].low, Some(50000.0));
        assert_eq!(annual[0].high, Some(55000.0));
    }

    #[test]
    fn test_categories_are_independent() {
        let record = extract(
            "Competitive salary of £24,000 plus overtime at £15 per hour. \
             Night shifts £120 per day. National living wage guaranteed for trainees.",
        );
        assert_eq!(
            record.categories(),
            vec![
                Category::Hourly,
                Category::Daily,
                Category::Annual,
                Category::NationalLivingWage,
                Category::Competitive,
            ]
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = SalaryExtractor::default();
        let text = "£8.91 - £9.50 per hour, zero hour contract, salary negotiable";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }

    #[test]
    fn test_empty_text_has_no_signals() {
        let record = extract("");
        assert!(record.is_empty());
        assert_eq!(record.bounds(Category::Hourly), (None, None));
    }
}
