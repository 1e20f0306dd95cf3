//! Output rendering for retrieved records.
//!
//! - `render_table`: fixed-width columns, header row, dashed separator
//! - `render_jsonl`: one JSON object per record, identifiers as hex strings

use serde_json::json;

use crate::models::{BulletTrain, Cell};

const COLUMN_GAP: &str = "  ";

/// Renders `rows` under `headers` as an aligned text table.
///
/// Each column is as wide as its widest cell; numbers are right-aligned and
/// text is left-aligned. Trailing whitespace is trimmed from every line.
pub fn render_table(headers: &[String], rows: &[Vec<Cell>]) -> String {
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut out = String::new();
    push_line(
        &mut out,
        headers.iter().enumerate().map(|(i, h)| format!("{:<w$}", h, w = widths[i])),
    );
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)));
    for (row, cells) in rendered.iter().zip(rows) {
        push_line(
            &mut out,
            row.iter().zip(cells).enumerate().map(|(i, (text, cell))| {
                if cell.is_numeric() {
                    format!("{:>w$}", text, w = widths[i])
                } else {
                    format!("{:<w$}", text, w = widths[i])
                }
            }),
        );
    }
    out
}

fn push_line(out: &mut String, columns: impl Iterator<Item = String>) {
    let line = columns.collect::<Vec<_>>().join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders one JSON object per record, newline-terminated.
pub fn render_jsonl(records: &[BulletTrain]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        let line = json!({
            "id": record.id_hex(),
            "velocity": record.velocity,
            "capacity": record.capacity,
            "altitude": record.altitude,
            "last_lat": record.last_lat,
            "last_long": record.last_long,
        });
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');
    }
    Ok(out)
}
