use super::aggregate::Detector;
use super::types::{Category, SalaryMention};
use regex::Regex;
use std::sync::LazyLock;

static ZERO_HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:zero|0)[\s-]hour|casual\scontract|piece\swork|hours\snot\sguaranteed|no\shours\sguarantee|can[’']t\sguarantee\shours|no\sguarantee\sof\shours",
    )
    .unwrap()
});

static NATIONAL_LIVING_WAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)national\sliving\swage").unwrap());

static MINIMUM_WAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)minimum\swage").unwrap());

static COMPETITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)competitive\ssalar[a-z]+|salar[a-z]+\s(?:[a-z]+\s){0,2}competitive").unwrap()
});

static NEGOTIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)negoti[a-z]+\s(?:[a-z]+\s){0,2}salar[a-z]+|salar[a-z]+\s(?:[a-z]+\s){0,2}negoti[a-z]+",
    )
    .unwrap()
});

/// Flags a category whenever its phrase occurs anywhere in the text.
#[derive(Debug, Clone, Copy)]
pub struct PhraseDetector {
    category: Category,
    pattern: &'static LazyLock<Regex>,
}

impl PhraseDetector {
    pub fn zero_hours() -> Self {
        Self {
            category: Category::ZeroHourContract,
            pattern: &ZERO_HOURS,
        }
    }

    pub fn national_living_wage() -> Self {
        Self {
            category: Category::NationalLivingWage,
            pattern: &NATIONAL_LIVING_WAGE,
        }
    }

    pub fn minimum_wage() -> Self {
        Self {
            category: Category::MinimumWage,
            pattern: &MINIMUM_WAGE,
        }
    }

    pub fn competitive() -> Self {
        Self {
            category: Category::Competitive,
            pattern: &COMPETITIVE,
        }
    }

    pub fn negotiable() -> Self {
        Self {
            category: Category::Negotiable,
            pattern: &NEGOTIABLE,
        }
    }
}

impl Detector for PhraseDetector {
    fn category(&self) -> Category {
        self.category
    }

    fn detect(&self, text: &str) -> Vec<SalaryMention> {
        self.pattern
            .find_iter(text)
            .map(|m| SalaryMention::phrase(self.category, text, m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(detector: PhraseDetector, text: &str) -> bool {
        !detector.detect(text).is_empty()
    }

    #[test]
    fn test_zero_hours_variants() {
        for text in [
            "Zero hours contract available",
            "this is a 0-hour role",
            "CASUAL CONTRACT",
            "paid by piece work",
            "Hours not guaranteed",
            "no hours guarantee",
            "we can't guarantee hours",
            "we can’t guarantee hours",
            "there is no guarantee of hours",
        ] {
            assert!(fires(PhraseDetector::zero_hours(), text), "{text}");
        }
        assert!(!fires(PhraseDetector::zero_hours(), "40 hours guaranteed"));
        assert!(!fires(PhraseDetector::zero_hours(), "hero hours"));
    }

    #[test]
    fn test_wage_floor_phrases() {
        assert!(fires(
            PhraseDetector::national_living_wage(),
            "Paid at the National Living Wage"
        ));
        assert!(fires(PhraseDetector::minimum_wage(), "above minimum wage"));
        assert!(!fires(PhraseDetector::national_living_wage(), "living wage"));
    }

    #[test]
    fn test_competitive_either_order() {
        assert!(fires(PhraseDetector::competitive(), "Competitive salary and benefits"));
        assert!(fires(PhraseDetector::competitive(), "Salary is competitive"));
        assert!(fires(PhraseDetector::competitive(), "salary will be competitive"));
        assert!(!fires(PhraseDetector::competitive(), "a competitive market"));
    }

    #[test]
    fn test_negotiable_either_order() {
        assert!(fires(PhraseDetector::negotiable(), "Negotiable salary"));
        assert!(fires(PhraseDetector::negotiable(), "negotiable starting salary"));
        assert!(fires(PhraseDetector::negotiable(), "Salary negotiable"));
        assert!(fires(PhraseDetector::negotiable(), "salary is negotiable"));
        assert!(!fires(PhraseDetector::negotiable(), "price negotiable"));
    }
}
