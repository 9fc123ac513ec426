//! Frequency classifiers: currency anchors checked against a bucket, an
//! optional range and, for hourly/daily/weekly, a nearby keyword.

use super::aggregate::Detector;
use super::anchor::{AnchorScanner, CurrencyAnchor, DigitShape};
use super::exclusion::{Admitted, Bucket, MagnitudeFilter, ScalePolicy};
use super::range::{Connector, OversizeGuard, RangeExtractor};
use super::types::{Category, SalaryMention};
use super::window::{
    is_filler, ContextWindow, Direction, KeywordSet, DAILY_KEYWORDS, HOURLY_KEYWORDS,
    SALARY_KEYWORDS, WEEKLY_KEYWORDS,
};
use regex::Regex;
use std::sync::LazyLock;

const HOURLY_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Unscaled, Bucket::new(1, 99));
const DAILY_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Unscaled, Bucket::new(50, 999));
const DAILY_SECOND_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Unscaled, Bucket::new(10, 999));
const WEEKLY_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Unscaled, Bucket::new(100, 3_999));
const ANNUAL_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Unscaled, Bucket::new(10_000, 199_999));
const THOUSANDS_FILTER: MagnitudeFilter =
    MagnitudeFilter::new(ScalePolicy::Thousands, Bucket::new(10, 199));

/// A digit at the start of a whitespace-delimited word.
static BARE_FIGURE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s[1-9]").unwrap());

/// Classifier for one currency-anchored bucket.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyClassifier {
    category: Category,
    shape: DigitShape,
    filter: MagnitudeFilter,
    range: RangeExtractor,
    guard: OversizeGuard,
    /// `None` when magnitude alone qualifies.
    keywords: Option<KeywordSet>,
    keyword_window: usize,
}

impl FrequencyClassifier {
    pub fn hourly(keyword_window: usize) -> Self {
        Self {
            category: Category::Hourly,
            shape: DigitShape::HOURLY,
            filter: HOURLY_FILTER,
            range: RangeExtractor {
                connector: Connector::Standard,
                shape: DigitShape::HOURLY,
                filter: HOURLY_FILTER,
            },
            guard: OversizeGuard::ScaledOrHundreds,
            keywords: Some(HOURLY_KEYWORDS),
            keyword_window,
        }
    }

    pub fn daily(keyword_window: usize) -> Self {
        Self {
            category: Category::Daily,
            shape: DigitShape::DAILY,
            filter: DAILY_FILTER,
            range: RangeExtractor {
                connector: Connector::Standard,
                shape: DigitShape::DAILY,
                filter: DAILY_SECOND_FILTER,
            },
            guard: OversizeGuard::Off,
            keywords: Some(DAILY_KEYWORDS),
            keyword_window,
        }
    }

    pub fn weekly(keyword_window: usize) -> Self {
        Self {
            category: Category::Weekly,
            shape: DigitShape::WEEKLY,
            filter: WEEKLY_FILTER,
            range: RangeExtractor {
                connector: Connector::Standard,
                shape: DigitShape::WEEKLY,
                filter: WEEKLY_FILTER,
            },
            guard: OversizeGuard::Off,
            keywords: Some(WEEKLY_KEYWORDS),
            keyword_window,
        }
    }

    /// Five or six digit figures; no keyword needed.
    pub fn annual() -> Self {
        Self {
            category: Category::Annual,
            shape: DigitShape::ANNUAL,
            filter: ANNUAL_FILTER,
            range: RangeExtractor {
                connector: Connector::Standard,
                shape: DigitShape::ANNUAL,
                filter: ANNUAL_FILTER,
            },
            guard: OversizeGuard::AboveAnnualBucket,
            keywords: None,
            keyword_window: 0,
        }
    }

    /// `£45k`, `£32.5k - £40k`.
    pub fn annual_thousands() -> Self {
        Self {
            category: Category::Annual,
            shape: DigitShape::THOUSANDS,
            filter: THOUSANDS_FILTER,
            range: RangeExtractor {
                connector: Connector::Standard,
                shape: DigitShape::THOUSANDS,
                filter: THOUSANDS_FILTER,
            },
            guard: OversizeGuard::Off,
            keywords: None,
            keyword_window: 0,
        }
    }

    /// Returns the mention and the offset up to which the text is consumed,
    /// which includes a trailing keyword. `floor` bounds the keyword-before search.
    fn evaluate(
        &self,
        text: &str,
        anchor: &CurrencyAnchor<'_>,
        floor: usize,
    ) -> Option<(SalaryMention, usize)> {
        let first = match self.filter.admit(&anchor.figure, anchor.trailing_context()) {
            Ok(admitted) => admitted,
            Err(reason) => {
                tracing::trace!(category = %self.category, %reason, offset = anchor.position, "anchor rejected");
                return None;
            }
        };

        let second = self.range.second_bound(text, first.end);
        let (high, consumed) = match &self.keywords {
            Some(keywords) => self.keyword_bounds(text, anchor, floor, &first, second, keywords)?,
            None => {
                if self.oversized(text, anchor, &first) {
                    return None;
                }
                (second, second.map_or(first.end, |s| s.end))
            }
        };

        let end = high.map_or(first.end, |h| h.end);
        let mention = SalaryMention {
            category: self.category,
            low: Some(first.value),
            high: high.map(|h| h.value),
            start: anchor.position,
            span: text[anchor.position..end].to_string(),
        };
        Some((mention, consumed))
    }

    fn oversized(&self, text: &str, anchor: &CurrencyAnchor<'_>, first: &Admitted) -> bool {
        let trips = self.guard.trips(text, first.end);
        if trips {
            tracing::trace!(category = %self.category, offset = anchor.position, "oversized range half");
        }
        trips
    }

    /// Keyword before the first figure, keyword after the whole range, or keyword
    /// straight after a single figure. Returns the second bound to keep and the
    /// consumed offset.
    fn keyword_bounds(
        &self,
        text: &str,
        anchor: &CurrencyAnchor<'_>,
        floor: usize,
        first: &Admitted,
        second: Option<Admitted>,
        keywords: &KeywordSet,
    ) -> Option<(Option<Admitted>, usize)> {
        let gap = self.keyword_window;
        let leading = &text[floor..];
        if keywords.near(leading, anchor.position - floor, Direction::Before, gap) {
            return Some((second, second.map_or(first.end, |s| s.end)));
        }

        if self.oversized(text, anchor, first) {
            return None;
        }
        if let Some(second) = second {
            if let Some(end) = keywords.end_after(text, second.end, gap) {
                return Some((Some(second), end));
            }
        }
        keywords
            .end_after(text, first.end, gap)
            .map(|end| (None, end))
    }
}

impl Detector for FrequencyClassifier {
    fn category(&self) -> Category {
        self.category
    }

    fn detect(&self, text: &str) -> Vec<SalaryMention> {
        let mut mentions: Vec<SalaryMention> = Vec::new();
        let mut consumed = 0;

        for anchor in AnchorScanner::new(text).anchors(self.shape) {
            if anchor.position < consumed {
                continue;
            }
            if let Some((mention, end)) = self.evaluate(text, &anchor, consumed) {
                consumed = end;
                mentions.push(mention);
            }
        }

        mentions
    }
}

/// `£50-£55k`: a dash-joined annual range where only the second half carries the `k`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingSuffixRange;

impl MissingSuffixRange {
    fn evaluate(&self, text: &str, anchor: &CurrencyAnchor<'_>) -> Option<SalaryMention> {
        if !THOUSANDS_FILTER.bucket.contains(anchor.figure.integer) {
            return None;
        }
        let start = Connector::Dash.second_figure_start(text, anchor.end())?;
        let figure = DigitShape::THOUSANDS.capture(text, start)?;
        let second = THOUSANDS_FILTER
            .admit(&figure, &text[figure.end..])
            .ok()?;

        Some(SalaryMention {
            category: Category::Annual,
            low: Some(anchor.figure.thousands()),
            high: Some(second.value),
            start: anchor.position,
            span: text[anchor.position..second.end].to_string(),
        })
    }
}

impl Detector for MissingSuffixRange {
    fn category(&self) -> Category {
        Category::Annual
    }

    fn detect(&self, text: &str) -> Vec<SalaryMention> {
        let mut mentions: Vec<SalaryMention> = Vec::new();
        for anchor in AnchorScanner::new(text).anchors(DigitShape::THOUSANDS) {
            if mentions
                .last()
                .is_some_and(|m| anchor.position < m.start + m.span.len())
            {
                continue;
            }
            if let Some(mention) = self.evaluate(text, &anchor) {
                mentions.push(mention);
            }
        }
        mentions
    }
}

/// Bare k figures introduced by a `salar*` word: `salary of 50k-55k`.
#[derive(Debug, Clone, Copy)]
pub struct SalaryWordThousands {
    window: usize,
    range: RangeExtractor,
}

impl SalaryWordThousands {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            range: RangeExtractor {
                connector: Connector::SingleWord,
                shape: DigitShape::THOUSANDS,
                filter: THOUSANDS_FILTER,
            },
        }
    }

    /// A `salar*` word with one to `window` filler words between it and the figure.
    fn introduced(&self, text: &str, start: usize) -> bool {
        let mut words = ContextWindow::before(text, start, self.window + 1);
        match words.next() {
            Some(word) if is_filler(word) => SALARY_KEYWORDS.found_in(words),
            _ => false,
        }
    }

    fn evaluate(&self, text: &str, start: usize) -> Option<SalaryMention> {
        let figure = DigitShape::THOUSANDS.capture(text, start)?;
        let first = THOUSANDS_FILTER
            .admit(&figure, &text[figure.end..])
            .ok()?;
        if !self.introduced(text, start) {
            return None;
        }

        let second = self.range.second_bound(text, first.end);
        let end = second.map_or(first.end, |s| s.end);
        Some(SalaryMention {
            category: Category::Annual,
            low: Some(first.value),
            high: second.map(|s| s.value),
            start,
            span: text[start..end].to_string(),
        })
    }
}

impl Detector for SalaryWordThousands {
    fn category(&self) -> Category {
        Category::Annual
    }

    fn detect(&self, text: &str) -> Vec<SalaryMention> {
        let mut mentions: Vec<SalaryMention> = Vec::new();
        let mut consumed = 0;
        for m in BARE_FIGURE.find_iter(text) {
            let start = m.end() - 1;
            if start < consumed {
                continue;
            }
            if let Some(mention) = self.evaluate(text, start) {
                consumed = start + mention.span.len();
                mentions.push(mention);
            }
        }
        mentions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(detector: &dyn Detector, text: &str) -> Option<(Option<f64>, Option<f64>)> {
        let mentions = detector.detect(text);
        assert!(mentions.len() <= 1, "{mentions:?}");
        mentions.first().map(|m| (m.low, m.high))
    }

    #[test]
    fn test_hourly_keyword_after_and_before() {
        let hourly = FrequencyClassifier::hourly(4);
        assert_eq!(single(&hourly, "Pay: £9.50 per hour"), Some((Some(9.5), None)));
        assert_eq!(single(&hourly, "£11/hour"), Some((Some(11.0), None)));
        assert_eq!(single(&hourly, "£11ph"), Some((Some(11.0), None)));
        assert_eq!(single(&hourly, "Hourly rate: £12"), None);
        assert_eq!(single(&hourly, "Hourly rate £12"), Some((Some(12.0), None)));
        assert_eq!(single(&hourly, "Pay is £12"), None);
    }

    #[test]
    fn test_hourly_range() {
        let hourly = FrequencyClassifier::hourly(4);
        assert_eq!(
            single(&hourly, "£10 to £12 per hour"),
            Some((Some(10.0), Some(12.0)))
        );
        assert_eq!(
            single(&hourly, "hours paid at £10.50-£11.25"),
            Some((Some(10.5), Some(11.25)))
        );
    }

    #[test]
    fn test_hourly_rejects_oversized_second_half() {
        let hourly = FrequencyClassifier::hourly(4);
        assert_eq!(single(&hourly, "£10 - £150 per hour"), None);
        assert_eq!(single(&hourly, "£10 - 25k per hour"), None);
    }

    #[test]
    fn test_keyword_before_skips_oversize_check() {
        let hourly = FrequencyClassifier::hourly(4);
        assert_eq!(single(&hourly, "hourly rate £10 to £150"), Some((Some(10.0), None)));
        assert_eq!(single(&hourly, "Hourly pay £12 - £150 bonus"), Some((Some(12.0), None)));
        assert_eq!(single(&hourly, "hourly £10 - £15k"), Some((Some(10.0), None)));
    }

    #[test]
    fn test_trailing_keyword_is_consumed_with_its_figure() {
        let hourly = FrequencyClassifier::hourly(4);
        let mentions = hourly.detect("£10 per hour and £12 bonus");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].low, Some(10.0));

        let weekly = FrequencyClassifier::weekly(4);
        let mentions = weekly.detect("£300 per week, then weekly £350");
        assert_eq!(mentions.len(), 2);
    }

    #[test]
    fn test_hourly_ignores_scaled_figures() {
        let hourly = FrequencyClassifier::hourly(4);
        assert_eq!(single(&hourly, "£10k per hour"), None);
        assert_eq!(single(&hourly, "£10m turnover, hourly"), None);
        assert_eq!(single(&hourly, "£10.5 million for hours"), None);
        assert_eq!(single(&hourly, "£100 per hour"), None);
    }

    #[test]
    fn test_range_fallback_keeps_first_bound() {
        let hourly = FrequencyClassifier::hourly(4);
        // second half is scaled, so only the first figure survives
        assert_eq!(single(&hourly, "hourly £10 or £12m"), Some((Some(10.0), None)));
    }

    #[test]
    fn test_daily_bucket_and_keywords() {
        let daily = FrequencyClassifier::daily(4);
        assert_eq!(single(&daily, "£450 per day"), Some((Some(450.0), None)));
        assert_eq!(single(&daily, "£45 per day"), None);
        assert_eq!(
            single(&daily, "£80 - £120 per shift"),
            Some((Some(80.0), Some(120.0)))
        );
        assert_eq!(single(&daily, "£350 p/day"), Some((Some(350.0), None)));
        assert_eq!(single(&daily, "night rate of £95.00"), Some((Some(95.0), None)));
        assert_eq!(single(&daily, "£1500 per day"), None);
    }

    #[test]
    fn test_weekly_bucket_and_keywords() {
        let weekly = FrequencyClassifier::weekly(4);
        assert_eq!(single(&weekly, "£1,250 per week"), Some((Some(1250.0), None)));
        assert_eq!(single(&weekly, "£400 p/w"), Some((Some(400.0), None)));
        assert_eq!(
            single(&weekly, "weekly pay £300 to £350"),
            Some((Some(300.0), Some(350.0)))
        );
        assert_eq!(single(&weekly, "£4,500 per week"), None);
        assert_eq!(single(&weekly, "£500k per week"), None);
    }

    #[test]
    fn test_annual_plain() {
        let annual = FrequencyClassifier::annual();
        assert_eq!(single(&annual, "£45,000 per annum"), Some((Some(45000.0), None)));
        assert_eq!(
            single(&annual, "£25,000 - £30,000 DOE"),
            Some((Some(25000.0), Some(30000.0)))
        );
        assert_eq!(single(&annual, "£150000"), Some((Some(150000.0), None)));
        assert_eq!(single(&annual, "£250,000"), None);
        assert_eq!(single(&annual, "£20,000 - £250,000 turnover"), None);
        assert_eq!(single(&annual, "£20,000m"), None);
    }

    #[test]
    fn test_annual_thousands() {
        let annual = FrequencyClassifier::annual_thousands();
        assert_eq!(
            single(&annual, "£10k-£120k"),
            Some((Some(10000.0), Some(120000.0)))
        );
        assert_eq!(single(&annual, "£32.5k"), Some((Some(32500.0), None)));
        assert_eq!(single(&annual, "£5k bonus"), None);
        assert_eq!(single(&annual, "£45 kilos"), None);
    }

    #[test]
    fn test_missing_suffix_range() {
        let detector = MissingSuffixRange;
        assert_eq!(
            single(&detector, "£50-£55k"),
            Some((Some(50000.0), Some(55000.0)))
        );
        assert_eq!(
            single(&detector, "£50 - 55k + bonus"),
            Some((Some(50000.0), Some(55000.0)))
        );
        assert_eq!(single(&detector, "£50k-£55k"), None);
        assert_eq!(single(&detector, "£50-£55"), None);
    }

    #[test]
    fn test_salary_word_thousands() {
        let detector = SalaryWordThousands::new(2);
        assert_eq!(
            single(&detector, "Salary of 50k-55k"),
            Some((Some(50000.0), Some(55000.0)))
        );
        assert_eq!(single(&detector, "salary up to 60k"), Some((Some(60000.0), None)));
        assert_eq!(single(&detector, "Salaries will be around 60k"), None);
        assert_eq!(single(&detector, "Salary 45k"), None);
        assert_eq!(single(&detector, "salary 50k"), None);
        assert_eq!(single(&detector, "salary of 50k"), Some((Some(50000.0), None)));
        assert_eq!(single(&detector, "team of 50k users"), None);
    }

    #[test]
    fn test_consumed_anchor_not_reported_twice() {
        let hourly = FrequencyClassifier::hourly(4);
        let mentions = hourly.detect("£10 to £12 per hour, overtime £15 per hour");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].span, "£10 to £12");
        assert_eq!(mentions[1].low, Some(15.0));
    }
}
