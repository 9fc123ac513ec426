use super::anchor::Figure;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Why a captured figure was dropped from a frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// More digits follow the capture (`£100` read as `£10`).
    TrailingDigit,
    /// `k`, `m`, `b` or `bn` right after the digits.
    ScaledNotation,
    /// `mill` / `bill` right after the digits.
    ScaleWord,
    /// `£10.5m`, `£2.5 bill` and friends.
    FractionalScale,
    /// k-notation bucket without the `k`.
    MissingThousandsSuffix,
    OutOfBucket,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExclusionReason::TrailingDigit => "trailing digit",
            ExclusionReason::ScaledNotation => "scaled notation",
            ExclusionReason::ScaleWord => "scale word",
            ExclusionReason::FractionalScale => "fractional scale",
            ExclusionReason::MissingThousandsSuffix => "missing thousands suffix",
            ExclusionReason::OutOfBucket => "outside bucket",
        };
        f.write_str(text)
    }
}

struct Guard {
    reason: ExclusionReason,
    regex: Regex,
}

fn guard(reason: ExclusionReason, pattern: &str) -> Guard {
    Guard {
        reason,
        regex: Regex::new(pattern).unwrap(),
    }
}

/// Checked in order against the text right after a figure.
static GUARDS: LazyLock<Vec<Guard>> = LazyLock::new(|| {
    vec![
        guard(ExclusionReason::TrailingDigit, r"^,?\d"),
        guard(ExclusionReason::ScaledNotation, r"(?i)^(?:[kmb]|bn)\b"),
        guard(ExclusionReason::ScaleWord, r"(?i)^\s?[mb]ill"),
        guard(
            ExclusionReason::FractionalScale,
            r"(?i)^\.\d\s?(?:[mbk]\b|bn\b|[mb]ill)",
        ),
    ]
});

static THOUSANDS_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^k\b").unwrap());

/// How a bucket treats scale suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalePolicy {
    /// Plain figures only; any scale suffix rejects.
    Unscaled,
    /// The figure must carry a `k` and is read as thousands.
    Thousands,
}

/// Inclusive bounds on the integer part of a figure, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub min: u64,
    pub max: u64,
}

impl Bucket {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A figure that survived the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admitted {
    /// Effective value (scaled when the bucket is in thousands).
    pub value: f64,
    /// End of the figure including any consumed suffix.
    pub end: usize,
}

/// Rejects figures that do not belong to a frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnitudeFilter {
    pub policy: ScalePolicy,
    pub bucket: Bucket,
}

impl MagnitudeFilter {
    pub const fn new(policy: ScalePolicy, bucket: Bucket) -> Self {
        Self { policy, bucket }
    }

    /// `trailing` is the text directly after `figure`.
    pub fn admit(&self, figure: &Figure, trailing: &str) -> Result<Admitted, ExclusionReason> {
        let (value, suffix_len) = match self.policy {
            ScalePolicy::Unscaled => {
                check_unscaled(trailing)?;
                (figure.value(), 0)
            }
            ScalePolicy::Thousands => {
                let suffix = THOUSANDS_SUFFIX
                    .find(trailing)
                    .ok_or(ExclusionReason::MissingThousandsSuffix)?;
                (figure.thousands(), suffix.end())
            }
        };

        if !self.bucket.contains(figure.integer) {
            return Err(ExclusionReason::OutOfBucket);
        }

        Ok(Admitted {
            value,
            end: figure.end + suffix_len,
        })
    }
}

/// Runs the ordered scale guards over the text after an unscaled figure.
pub fn check_unscaled(trailing: &str) -> Result<(), ExclusionReason> {
    match GUARDS.iter().find(|g| g.regex.is_match(trailing)) {
        Some(g) => Err(g.reason),
        None => Ok(()),
    }
}
