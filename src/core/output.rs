use crate::domain::model::{ExtractedPosting, ExtractedRow, OutputFormat, RunSummary};
use crate::utils::error::{EtlError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// A rendered output file.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub data: Vec<u8>,
}

fn delimited(rows: &[ExtractedRow], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("failed to flush delimited output: {}", e),
    })
}

pub fn render(
    format: OutputFormat,
    rows: &[ExtractedRow],
    records: &[ExtractedPosting],
) -> Result<OutputFile> {
    let data = match format {
        OutputFormat::Csv => delimited(rows, b',')?,
        OutputFormat::Tsv => delimited(rows, b'\t')?,
        OutputFormat::Json => serde_json::to_vec_pretty(records)?,
    };
    Ok(OutputFile {
        name: format.file_name().to_string(),
        data,
    })
}

pub fn render_summary(summary: &RunSummary) -> Result<OutputFile> {
    Ok(OutputFile {
        name: RunSummary::FILE_NAME.to_string(),
        data: serde_json::to_vec_pretty(summary)?,
    })
}

pub fn zip_files(files: &[OutputFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for file in files {
        zip.start_file(file.name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(&file.data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salary::SalaryExtractor;
    use std::io::Read;

    fn rows() -> Vec<ExtractedRow> {
        let extractor = SalaryExtractor::default();
        vec![
            ExtractedRow::from_record("1", &extractor.extract("£10 to £12 per hour")),
            ExtractedRow::from_record("2", &extractor.extract("Salary negotiable")),
        ]
    }

    #[test]
    fn test_csv_has_header_and_empty_bounds() {
        let file = render(OutputFormat::Csv, &rows(), &[]).unwrap();
        let text = String::from_utf8(file.data).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("id,has_zero_hour_contract,has_hourly,hourly_low,hourly_high"));
        assert!(lines.next().unwrap().starts_with("1,false,true,10.0,12.0,false,,"));
        assert!(lines.next().unwrap().ends_with("false,true"));
        assert_eq!(file.name, "salary_signals.csv");
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let file = render(OutputFormat::Tsv, &rows(), &[]).unwrap();
        let text = String::from_utf8(file.data).unwrap();
        assert!(text.lines().next().unwrap().starts_with("id\thas_zero_hour_contract\t"));
    }

    #[test]
    fn test_zip_round_trip_names() {
        let files = vec![
            render(OutputFormat::Csv, &rows(), &[]).unwrap(),
            OutputFile {
                name: "summary.json".to_string(),
                data: b"{}".to_vec(),
            },
        ];
        let bytes = zip_files(&files).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut summary = String::new();
        archive
            .by_name("summary.json")
            .unwrap()
            .read_to_string(&mut summary)
            .unwrap();
        assert_eq!(summary, "{}");
    }
}
