use crate::error::{ImportError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use foodorder_core::domain::RawOrder;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedUpload {
    pub orders: Vec<RawOrder>,
    pub skipped_empty: usize,
}

pub fn read_orders_csv(path: &Path) -> Result<ParsedUpload> {
    let data = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_orders_csv(&data)
}

/// Reads a form-tool CSV export with a header row into raw order rows.
///
/// Every cell is kept as text under its header name. Blank lines and rows
/// whose cells are all empty are skipped. Delimiter is `,` or `;`,
/// whichever appears first in the header line.
pub fn parse_orders_csv(data: &str) -> Result<ParsedUpload> {
    let data = data.strip_prefix(BOM).unwrap_or(data);
    let delimiter = detect_delimiter(data);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(Trim::Headers)
        .from_reader(data.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let mut orders = Vec::new();
    let mut skipped_empty = 0;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            skipped_empty += 1;
            continue;
        }
        orders.push(order_from_record(&headers, &record));
    }

    debug!(rows = orders.len(), skipped_empty, "parsed CSV upload");
    Ok(ParsedUpload {
        orders,
        skipped_empty,
    })
}

fn order_from_record(headers: &StringRecord, record: &StringRecord) -> RawOrder {
    let mut order = RawOrder::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        if header.is_empty() || order.get(header).is_some() {
            continue;
        }
        order.insert(header, cell);
    }
    order
}

fn detect_delimiter(data: &str) -> u8 {
    let header_line = data.lines().next().unwrap_or_default();
    let comma = header_line.find(',');
    let semicolon = header_line.find(';');
    match (comma, semicolon) {
        (Some(c), Some(s)) if s < c => b';',
        (None, Some(_)) => b';',
        _ => b',',
    }
}

fn csv_error(err: csv::Error) -> ImportError {
    let line = err.position().map(|pos| pos.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        _ => err.to_string(),
    };
    ImportError::Csv { line, message }
}

#[cfg(test)]
mod tests {
    use super::parse_orders_csv;
    use crate::error::ImportError;

    const EXPORT: &str = "\u{feff}Timestamp,Email Address,meal\n\
        2020/01/01 11:21:43 AM GMT+2,rosa.parks@x.com,[Fafa] Salad\n\
        \n\
        2020/01/01 11:25:00 AM GMT+2,ada@x.com,\"[Sushi] Maki, extra wasabi\"\n\
        ,,\n";

    #[test]
    fn parses_form_export() {
        let parsed = parse_orders_csv(EXPORT).expect("parse");
        assert_eq!(parsed.orders.len(), 2);
        assert_eq!(parsed.skipped_empty, 1);

        let first = &parsed.orders[0];
        assert_eq!(first.timestamp().as_deref(), Some("2020/01/01 11:21:43 AM GMT+2"));
        assert_eq!(first.email(), Some("rosa.parks@x.com"));
        assert_eq!(parsed.orders[1].meal(), Some("[Sushi] Maki, extra wasabi"));
    }

    #[test]
    fn semicolon_delimited_files_are_detected() {
        let parsed =
            parse_orders_csv("Timestamp;Email Address;meal\n2020-01-01;a@x.com;[Fafa] Salad\n")
                .expect("parse");
        assert_eq!(parsed.orders[0].meal(), Some("[Fafa] Salad"));
    }

    #[test]
    fn header_only_file_is_an_empty_batch() {
        let parsed = parse_orders_csv("Timestamp,Email Address,meal\n").expect("parse");
        assert!(parsed.orders.is_empty());
    }

    #[test]
    fn ragged_rows_are_rejected_with_line() {
        let err = parse_orders_csv("Timestamp,Email Address,meal\n2020-01-01,a@x.com\n")
            .unwrap_err();
        match err {
            ImportError::Csv { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected 3 fields"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_file_has_no_header() {
        assert!(matches!(
            parse_orders_csv(""),
            Err(ImportError::MissingHeader)
        ));
    }
}
