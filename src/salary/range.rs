use super::anchor::DigitShape;
use super::exclusion::{Admitted, MagnitudeFilter};
use regex::Regex;
use std::sync::LazyLock;

// Each connector ends on the first digit of the second figure.
static STANDARD_CONNECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s(?:[A-Za-z]+\s){1,2}|\s*[-/\\]\s*)£?[1-9]").unwrap()
});
static SINGLE_WORD_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s[A-Za-z]+\s|\s*[-/\\]\s*)£?[1-9]").unwrap());
static DASH_CONNECTOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s?-\s?£?[1-9]").unwrap());

static SCALED_OR_HUNDREDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{1,2}[Kk]|\d{2},\d|\d{3})").unwrap());
static ABOVE_ANNUAL_BUCKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[2-9]\d\d|\d{1,3},?\d{3}),?\d{3}").unwrap());

/// What may join the two halves of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// One or two words (`to`, `up to`), or a dash/slash/backslash.
    Standard,
    /// Exactly one word, or a dash/slash/backslash.
    SingleWord,
    /// A dash with at most one space either side.
    Dash,
}

impl Connector {
    fn regex(&self) -> &'static Regex {
        match self {
            Connector::Standard => &*STANDARD_CONNECTOR,
            Connector::SingleWord => &*SINGLE_WORD_CONNECTOR,
            Connector::Dash => &*DASH_CONNECTOR,
        }
    }

    /// Byte offset of the second figure's first digit, if a connector starts at `after`.
    pub fn second_figure_start(&self, text: &str, after: usize) -> Option<usize> {
        self.regex()
            .find(&text[after..])
            .map(|m| after + m.end() - 1)
    }
}

/// Checks on a would-be second half that discard the whole first figure.
///
/// They stop two unrelated numbers from being read as one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OversizeGuard {
    Off,
    /// Second half in k-notation or with three or more digits.
    ScaledOrHundreds,
    /// Second half of 200,000 or more.
    AboveAnnualBucket,
}

impl OversizeGuard {
    pub fn trips(&self, text: &str, first_end: usize) -> bool {
        let regex: &Regex = match self {
            OversizeGuard::Off => return false,
            OversizeGuard::ScaledOrHundreds => &*SCALED_OR_HUNDREDS,
            OversizeGuard::AboveAnnualBucket => &*ABOVE_ANNUAL_BUCKET,
        };
        match Connector::Standard.second_figure_start(text, first_end) {
            Some(start) => regex.is_match(&text[start..]),
            None => false,
        }
    }
}

/// Finds the second bound of a range starting after an accepted figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeExtractor {
    pub connector: Connector,
    pub shape: DigitShape,
    pub filter: MagnitudeFilter,
}

impl RangeExtractor {
    /// `first_end` is the end of the first figure after exclusion. A second half
    /// that fails its own filter yields `None` and leaves the first figure alone.
    pub fn second_bound(&self, text: &str, first_end: usize) -> Option<Admitted> {
        let start = self.connector.second_figure_start(text, first_end)?;
        let figure = self.shape.capture(text, start)?;
        match self.filter.admit(&figure, &text[figure.end..]) {
            Ok(admitted) => Some(admitted),
            Err(reason) => {
                tracing::trace!(%reason, offset = start, "range second half rejected");
                None
            }
        }
    }
}
