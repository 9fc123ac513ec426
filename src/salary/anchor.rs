use regex::Regex;
use std::sync::LazyLock;

pub const CURRENCY_SYMBOL: char = '£';

/// A currency symbol directly followed by a non-zero digit.
static ANCHOR_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"£[1-9]").unwrap());

/// Digit layout a frequency bucket accepts for one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitShape {
    pub min_digits: usize,
    pub max_digits: usize,
    /// Allow a single thousands separator (`1,000`).
    pub thousands_comma: bool,
    /// Accepted digit count after a decimal point, `(0, 0)` when fractions are not part of the shape.
    pub fraction: (usize, usize),
}

impl DigitShape {
    /// `[1-9]\d?` with optional pence.
    pub const HOURLY: DigitShape = DigitShape {
        min_digits: 1,
        max_digits: 2,
        thousands_comma: false,
        fraction: (2, 2),
    };
    /// Two or three digits with optional pence.
    pub const DAILY: DigitShape = DigitShape {
        min_digits: 2,
        max_digits: 3,
        thousands_comma: false,
        fraction: (2, 2),
    };
    /// Three or four digits, comma optional at thousands.
    pub const WEEKLY: DigitShape = DigitShape {
        min_digits: 3,
        max_digits: 4,
        thousands_comma: true,
        fraction: (2, 2),
    };
    /// Five or six digits, comma optional at thousands.
    pub const ANNUAL: DigitShape = DigitShape {
        min_digits: 5,
        max_digits: 6,
        thousands_comma: true,
        fraction: (2, 2),
    };
    /// Leading part of a k-notation figure such as `45` or `32.5`.
    pub const THOUSANDS: DigitShape = DigitShape {
        min_digits: 2,
        max_digits: 3,
        thousands_comma: false,
        fraction: (1, 2),
    };

    /// Captures the longest figure matching this shape starting at byte `from`.
    ///
    /// No backtracking happens here: whatever follows the capture is left to
    /// the exclusion filter.
    pub fn capture(&self, text: &str, from: usize) -> Option<Figure> {
        let bytes = text.as_bytes();
        match bytes.get(from) {
            Some(b'1'..=b'9') => {}
            _ => return None,
        }

        let mut i = from;
        let mut digits = String::with_capacity(self.max_digits);
        let mut after_comma: Option<usize> = None;

        while digits.len() < self.max_digits && after_comma != Some(3) {
            match bytes.get(i) {
                Some(b) if b.is_ascii_digit() => {
                    digits.push(*b as char);
                    if let Some(count) = after_comma.as_mut() {
                        *count += 1;
                    }
                    i += 1;
                }
                Some(b',')
                    if self.thousands_comma
                        && after_comma.is_none()
                        && digits.len() + 3 <= self.max_digits
                        && bytes
                            .get(i + 1..i + 4)
                            .is_some_and(|group| group.iter().all(u8::is_ascii_digit)) =>
                {
                    after_comma = Some(0);
                    i += 1;
                }
                _ => break,
            }
        }

        if digits.len() < self.min_digits {
            return None;
        }

        let mut fraction = String::new();
        let (min_fraction, max_fraction) = self.fraction;
        if max_fraction > 0 && bytes.get(i) == Some(&b'.') {
            let available = bytes[i + 1..]
                .iter()
                .take(max_fraction)
                .take_while(|b| b.is_ascii_digit())
                .count();
            if available >= min_fraction {
                fraction.push_str(&text[i + 1..i + 1 + available]);
                i += 1 + available;
            }
        }

        let integer = digits.parse::<u64>().ok()?;
        Some(Figure {
            start: from,
            end: i,
            integer,
            fraction,
        })
    }
}

/// A captured number: integer part plus raw fractional digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub start: usize,
    pub end: usize,
    pub integer: u64,
    pub fraction: String,
}

impl Figure {
    /// All digits as one integer over a power of ten, e.g. `9.50` -> (950, 100).
    fn ratio(&self) -> (u64, u64) {
        self.fraction
            .bytes()
            .fold((self.integer, 1), |(num, den), digit| {
                (num * 10 + u64::from(digit - b'0'), den * 10)
            })
    }

    /// The figure as written, e.g. `9.50` -> 9.5.
    pub fn value(&self) -> f64 {
        let (num, den) = self.ratio();
        num as f64 / den as f64
    }

    /// The figure read as thousands, e.g. `32.5` -> 32500.
    pub fn thousands(&self) -> f64 {
        let (num, den) = self.ratio();
        (num * 1000) as f64 / den as f64
    }
}

/// A currency-marked figure found in a description.
#[derive(Debug, Clone)]
pub struct CurrencyAnchor<'t> {
    text: &'t str,
    /// Byte offset of the currency symbol.
    pub position: usize,
    pub figure: Figure,
}

impl<'t> CurrencyAnchor<'t> {
    pub fn value(&self) -> f64 {
        self.figure.value()
    }

    pub fn end(&self) -> usize {
        self.figure.end
    }

    /// Text right after the captured digits.
    pub fn trailing_context(&self) -> &'t str {
        &self.text[self.figure.end..]
    }
}

/// Locates currency anchors in a description, earliest first.
#[derive(Debug, Clone, Copy)]
pub struct AnchorScanner<'t> {
    text: &'t str,
}

impl<'t> AnchorScanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text }
    }

    /// Byte offsets of every currency symbol followed by a digit 1-9.
    pub fn candidates(&self) -> impl Iterator<Item = usize> + 't {
        ANCHOR_START.find_iter(self.text).map(|m| m.start())
    }

    /// Candidates whose digits fit `shape`, parsed into anchors.
    pub fn anchors(&self, shape: DigitShape) -> impl Iterator<Item = CurrencyAnchor<'t>> + 't {
        let text = self.text;
        self.candidates().filter_map(move |position| {
            let figure = shape.capture(text, position + CURRENCY_SYMBOL.len_utf8())?;
            Some(CurrencyAnchor {
                text,
                position,
                figure,
            })
        })
    }
}
