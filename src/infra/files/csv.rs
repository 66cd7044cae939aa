use super::ParsedTable;
use crate::error::AppError;

const BOM: &str = "\u{feff}";

/// Parses CSV text into headers and string rows. The delimiter is detected
/// from the header line (semicolon vs comma, German spreadsheet exports use
/// either), quoted fields may contain the delimiter, doubled quotes and
/// newlines, and fully empty records are skipped.
pub fn parse(input: &str) -> Result<ParsedTable, AppError> {
    let input = input.strip_prefix(BOM).unwrap_or(input);

    let first_line = input.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut records = split_records(input, delimiter);
    if records.is_empty() {
        return Err(AppError::Validation("The file contains no data".into()));
    }

    let headers: Vec<String> = records.remove(0);
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::Validation("The file has no header row".into()));
    }

    let rows = records
        .into_iter()
        .filter(|record| !record.iter().all(|cell| cell.is_empty()))
        .map(|mut record| {
            record.resize(headers.len(), String::new());
            record.truncate(headers.len());
            record
        })
        .collect();

    Ok(ParsedTable { headers, rows })
}

fn detect_delimiter(header_line: &str) -> char {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    if semicolons > commas { ';' } else { ',' }
}

fn split_records(input: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // A record consisting of a single empty field is a blank line.
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    records
}

/// Writes semicolon-delimited CSV with a UTF-8 byte-order mark so spreadsheet
/// applications pick the right encoding. Values containing the delimiter,
/// quotes or newlines are wrapped in double quotes with inner quotes doubled.
pub fn write(headers: &[&str], rows: &[Vec<String>]) -> String {
    let delimiter = ';';
    let mut out = String::from(BOM);

    let header_line: Vec<String> = headers.iter().map(|h| escape(h, delimiter)).collect();
    out.push_str(&header_line.join(&delimiter.to_string()));

    for row in rows {
        out.push('\n');
        let line: Vec<String> = row.iter().map(|v| escape(v, delimiter)).collect();
        out.push_str(&line.join(&delimiter.to_string()));
    }

    out
}

fn escape(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
