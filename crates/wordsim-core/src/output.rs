use crate::engine::ComparisonRow;
use crate::error::Error;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// `<jsd> <file_a> <file_b>`, JSD printed with six decimals.
pub fn render_line(row: &ComparisonRow<'_>) -> String {
    format!(
        "{:.6} {} {}",
        row.jsd,
        row.file_a.display(),
        row.file_b.display()
    )
}

#[derive(Serialize)]
struct CsvRow<'a> {
    jsd: f64,
    file_a: Cow<'a, str>,
    file_b: Cow<'a, str>,
    combined_word_count: usize,
}

impl<'a> From<ComparisonRow<'a>> for CsvRow<'a> {
    fn from(row: ComparisonRow<'a>) -> Self {
        Self {
            jsd: row.jsd,
            file_a: row.file_a.to_string_lossy(),
            file_b: row.file_b.to_string_lossy(),
            combined_word_count: row.combined_word_count,
        }
    }
}

/// Write `rows` to a new CSV file at `path`. Returns the number of data rows.
pub fn write_csv<'a, I>(rows: I, path: &Path) -> Result<usize, Error>
where
    I: IntoIterator<Item = ComparisonRow<'a>>,
{
    let file = std::fs::File::create(path)?;
    write_csv_to(rows, file)
}

pub fn write_csv_to<'a, I, W>(rows: I, writer: W) -> Result<usize, Error>
where
    I: IntoIterator<Item = ComparisonRow<'a>>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;
    for row in rows {
        csv_writer.serialize(CsvRow::from(row))?;
        written += 1;
    }
    if written == 0 {
        csv_writer.write_record(["jsd", "file_a", "file_b", "combined_word_count"])?;
    }
    csv_writer.flush()?;
    Ok(written)
}
