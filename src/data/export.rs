//! CSV Export Module
//! Writes a price series to disk and loads exported files back using Polars.

use crate::data::PriceSeries;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] PolarsError),
}

/// Writes and reads the comma-delimited price table.
pub struct CsvExporter;

impl CsvExporter {
    /// Write the full table, header row included, Date as the first column.
    ///
    /// Returns the number of data rows written.
    pub fn write_csv(series: &PriceSeries, path: &Path) -> Result<usize, ExportError> {
        let mut df = series.to_dataframe()?;
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        Ok(df.height())
    }

    /// Load an exported CSV file.
    pub fn read_csv(path: &Path) -> Result<DataFrame, ExportError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Dates and closing prices of a loaded table, in file order.
    pub fn dates_and_closes(df: &DataFrame) -> Result<Vec<(String, f64)>, ExportError> {
        let dates = df.column("Date")?.cast(&DataType::String)?;
        let closes = df.column("Close")?.cast(&DataType::Float64)?;
        let dates = dates.str()?;
        let closes = closes.f64()?;

        Ok(dates
            .into_iter()
            .zip(closes.into_iter())
            .filter_map(|(d, c)| Some((d?.to_string(), c?)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::series::tests::bar;

    #[test]
    fn writes_header_and_one_line_per_bar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("btc.csv");
        let series = PriceSeries::new("BTC-USD", vec![bar(1, 10.0), bar(2, 20.5), bar(3, 30.25)]);

        let rows = CsvExporter::write_csv(&series, &path).unwrap();
        assert_eq!(rows, 3);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,Open,High,Low,Close,Adj Close,Volume"));
        assert!(lines.next().unwrap().starts_with("2024-03-01,"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn read_back_reproduces_dates_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eth.csv");
        let series = PriceSeries::new("ETH-USD", vec![bar(4, 3120.5), bar(5, 3099.75)]);

        CsvExporter::write_csv(&series, &path).unwrap();
        let df = CsvExporter::read_csv(&path).unwrap();
        let rows = CsvExporter::dates_and_closes(&df).unwrap();

        assert_eq!(
            rows,
            vec![
                ("2024-03-04".to_string(), 3120.5),
                ("2024-03-05".to_string(), 3099.75),
            ]
        );
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let series = PriceSeries::new("BTC-USD", vec![bar(1, 10.0)]);

        let err = CsvExporter::write_csv(&series, &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(!path.exists());
    }
}
