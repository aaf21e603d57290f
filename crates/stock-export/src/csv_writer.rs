use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ExportResult;
use crate::row::{headers, ExportRow};

/// Byte-order mark so spreadsheet tools read the file as UTF-8
pub const BOM: &str = "\u{feff}";

/// Render rows as CSV: BOM, header line, one line per row.
///
/// Fields are quoted only when they contain a comma, a quote or a line
/// break; quotes are doubled. Lines are joined by `\n` with no trailing newline.
pub fn write_csv(rows: &[ExportRow], include_dates: bool) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(headers(include_dates))?;
    for row in rows {
        writer.write_record(row.values(include_dates))?;
    }

    let mut bytes = writer.into_inner().map_err(|e| e.into_error())?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}
