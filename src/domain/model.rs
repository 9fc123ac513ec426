use crate::salary::{Category, SalaryMention, SalaryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One job posting as read from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    /// `None` when the description is missing, null or not text.
    pub description: Option<String>,
}

/// Where postings come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Csv {
        path: String,
    },
    Api {
        endpoint: String,
        headers: HashMap<String, String>,
        timeout_seconds: Option<u64>,
    },
}

/// Column/field names used to read postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Row number (1-based) is used as id when unset.
    pub id: Option<String>,
    pub description: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: None,
            description: "description".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "salary_signals.csv",
            OutputFormat::Tsv => "salary_signals.tsv",
            OutputFormat::Json => "salary_signals.json",
        }
    }
}

/// Flat per-posting output row.
///
/// Bounds come from the earliest mention of each frequency category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRow {
    pub id: String,
    pub has_zero_hour_contract: bool,
    pub has_hourly: bool,
    pub hourly_low: Option<f64>,
    pub hourly_high: Option<f64>,
    pub has_daily: bool,
    pub daily_low: Option<f64>,
    pub daily_high: Option<f64>,
    pub has_weekly: bool,
    pub weekly_low: Option<f64>,
    pub weekly_high: Option<f64>,
    pub has_annual: bool,
    pub annual_low: Option<f64>,
    pub annual_high: Option<f64>,
    pub has_national_living_wage: bool,
    pub has_minimum_wage: bool,
    pub has_competitive: bool,
    pub has_negotiable: bool,
}

impl ExtractedRow {
    pub fn from_record(id: impl Into<String>, record: &SalaryRecord) -> Self {
        let (hourly_low, hourly_high) = record.bounds(Category::Hourly);
        let (daily_low, daily_high) = record.bounds(Category::Daily);
        let (weekly_low, weekly_high) = record.bounds(Category::Weekly);
        let (annual_low, annual_high) = record.bounds(Category::Annual);

        Self {
            id: id.into(),
            has_zero_hour_contract: record.flag(Category::ZeroHourContract),
            has_hourly: record.flag(Category::Hourly),
            hourly_low,
            hourly_high,
            has_daily: record.flag(Category::Daily),
            daily_low,
            daily_high,
            has_weekly: record.flag(Category::Weekly),
            weekly_low,
            weekly_high,
            has_annual: record.flag(Category::Annual),
            annual_low,
            annual_high,
            has_national_living_wage: record.flag(Category::NationalLivingWage),
            has_minimum_wage: record.flag(Category::MinimumWage),
            has_competitive: record.flag(Category::Competitive),
            has_negotiable: record.flag(Category::Negotiable),
        }
    }

    pub fn flag(&self, category: Category) -> bool {
        match category {
            Category::ZeroHourContract => self.has_zero_hour_contract,
            Category::Hourly => self.has_hourly,
            Category::Daily => self.has_daily,
            Category::Weekly => self.has_weekly,
            Category::Annual => self.has_annual,
            Category::NationalLivingWage => self.has_national_living_wage,
            Category::MinimumWage => self.has_minimum_wage,
            Category::Competitive => self.has_competitive,
            Category::Negotiable => self.has_negotiable,
        }
    }

    pub fn has_any_signal(&self) -> bool {
        Category::ALL.iter().any(|c| self.flag(*c))
    }
}

/// Every mention found in one posting, spans included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPosting {
    pub id: String,
    pub mentions: Vec<SalaryMention>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Same order as the extracted postings, skipped ones left out.
    pub rows: Vec<ExtractedRow>,
    pub records: Vec<ExtractedPosting>,
    /// Ids of postings without a usable description.
    pub skipped: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl TransformResult {
    pub fn total(&self) -> usize {
        self.rows.len() + self.skipped.len()
    }
}

/// Written next to the outputs as `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub extracted: usize,
    pub skipped: usize,
    /// Number of postings flagged per category.
    pub per_category: BTreeMap<Category, usize>,
}

impl RunSummary {
    pub const FILE_NAME: &'static str = "summary.json";

    pub fn from_result(result: &TransformResult, finished_at: DateTime<Utc>) -> Self {
        let per_category = Category::ALL
            .into_iter()
            .map(|category| {
                let count = result.rows.iter().filter(|r| r.flag(category)).count();
                (category, count)
            })
            .collect();

        Self {
            started_at: result.started_at,
            finished_at,
            total: result.total(),
            extracted: result.rows.len(),
            skipped: result.skipped.len(),
            per_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salary::SalaryExtractor;

    #[test]
    fn test_row_takes_earliest_mention_bounds() {
        let record = SalaryExtractor::default()
            .extract("£10 per hour, rising to £11 per hour after probation");
        let row = ExtractedRow::from_record("7", &record);

        assert_eq!(row.id, "7");
        assert!(row.has_hourly);
        assert_eq!(row.hourly_low, Some(10.0));
        assert_eq!(row.hourly_high, None);
        assert!(!row.has_annual);
        assert!(row.has_any_signal());
    }

    #[test]
    fn test_summary_counts_flags() {
        let extractor = SalaryExtractor::default();
        let rows = vec![
            ExtractedRow::from_record("1", &extractor.extract("£25,000 per annum, competitive salary")),
            ExtractedRow::from_record("2", &extractor.extract("£30k")),
            ExtractedRow::from_record("3", &extractor.extract("no pay details")),
        ];
        let started_at = Utc::now();
        let result = TransformResult {
            rows,
            records: Vec::new(),
            skipped: vec!["4".to_string()],
            started_at,
        };

        let summary = RunSummary::from_result(&result, started_at);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.extracted, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.per_category[&Category::Annual], 2);
        assert_eq!(summary.per_category[&Category::Competitive], 1);
        assert_eq!(summary.per_category[&Category::Hourly], 0);
    }

    #[test]
    fn test_summary_serializes_category_keys() {
        let started_at = Utc::now();
        let result = TransformResult {
            rows: Vec::new(),
            records: Vec::new(),
            skipped: Vec::new(),
            started_at,
        };
        let json = serde_json::to_value(RunSummary::from_result(&result, started_at)).unwrap();
        assert_eq!(json["per_category"]["zero_hour_contract"], 0);
    }
}
