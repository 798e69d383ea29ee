//! Text rendering of [`StatsTable`]

use crate::stats::{StatsTable, TOTAL_LABEL};

/// Title embedded in the boxed table's top border
pub const TABLE_TITLE: &str = "Raw Dataset Stats";

/// Column width of the plain layout
pub const PLAIN_COLUMN_WIDTH: usize = 25;

const HEADERS: [&str; 6] = [
    "Tag \nName",
    "Num. Seq.",
    "Frames/Sequence \nMean",
    "Frames/Sequence \nStd.",
    "Time/Sequence (ms) \nMean",
    "Time/Sequence (ms) \nStd.",
];

fn cells(table: &StatsTable) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = vec![HEADERS.iter().map(|h| h.to_string()).collect()];
    for row in &table.rows {
        rows.push(vec![
            row.tag.clone(),
            row.sequences.to_string(),
            format!("{:.2}", row.mean_frames),
            format!("{:.2}", row.std_frames),
            row.mean_time_ms.to_string(),
            row.std_time_ms.to_string(),
        ]);
    }
    let mut total = vec![String::new(); HEADERS.len()];
    total[0] = TOTAL_LABEL.to_string();
    total[1] = table.total_sequences.to_string();
    rows.push(total);
    rows
}

/// Fixed-width, left-justified columns with a blank line after every row
pub fn render_plain(table: &StatsTable) -> String {
    let mut out = String::new();
    for row in cells(table) {
        for cell in row {
            let cell = cell.replace('\n', "");
            out.push_str(&format!("{cell:<width$}", width = PLAIN_COLUMN_WIDTH));
        }
        out.push_str("\n\n");
    }
    out
}

/// Box-drawn table with a titled top border and a rule under the header.
/// The first column is left-aligned, the rest centered.
pub fn render_pretty(table: &StatsTable) -> String {
    let rows: Vec<Vec<Vec<String>>> = cells(table)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.split('\n').map(str::to_string).collect())
                .collect()
        })
        .collect();

    let mut widths = vec![0usize; HEADERS.len()];
    for row in &rows {
        for (col, lines) in row.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&top_border(&widths, TABLE_TITLE));
    for (idx, row) in rows.iter().enumerate() {
        let height = row.iter().map(Vec::len).max().unwrap_or(1);
        for line_idx in 0..height {
            out.push('│');
            for (col, lines) in row.iter().enumerate() {
                let text = lines.get(line_idx).map(String::as_str).unwrap_or("");
                let width = widths[col];
                let padded = if col == 0 {
                    format!("{text:<width$}")
                } else {
                    format!("{text:^width$}")
                };
                out.push(' ');
                out.push_str(&padded);
                out.push(' ');
                out.push('│');
            }
            out.push('\n');
        }
        if idx == 0 {
            out.push_str(&border(&widths, '├', '┼', '┤'));
        }
    }
    out.push_str(&border(&widths, '└', '┴', '┘'));
    out
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(mid.to_string().as_str()))
}

fn top_border(widths: &[usize], title: &str) -> String {
    let plain = border(widths, '┌', '┬', '┐');
    let inner: Vec<char> = plain.trim_end().chars().collect();
    let inner = &inner[1..inner.len() - 1];
    let title_len = title.chars().count();
    if title_len > inner.len() {
        return plain;
    }
    let rest: String = inner[title_len..].iter().collect();
    format!("┌{title}{rest}┐\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsRow;
    use pretty_assertions::assert_eq;

    fn sample() -> StatsTable {
        StatsTable {
            rows: vec![StatsRow {
                tag: "SITTING".to_string(),
                sequences: 3,
                mean_frames: 2.0,
                std_frames: 0.0,
                mean_time_ms: 8,
                std_time_ms: 8,
            }],
            total_sequences: 3,
        }
    }

    #[test]
    fn test_plain_layout() {
        let out = render_plain(&sample());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Tag Name                 Num. Seq."));
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with(&format!("{:<25}{:<25}2.00", "SITTING", "3")));
        assert!(lines[4].starts_with(&format!("{:<25}3", "T O T A L")));
        assert_eq!(lines[2].chars().count(), 25 * 6);
    }

    #[test]
    fn test_pretty_layout() {
        let out = render_pretty(&sample());
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("┌Raw Dataset Stats"));
        assert!(lines[0].ends_with('┐'));
        // two header lines, rule, one class row, totals, bottom border
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("│ Tag       │"));
        assert!(lines[2].starts_with("│ Name      │"));
        assert!(lines[3].starts_with('├'));
        assert!(lines[5].starts_with("│ T O T A L │"));
        assert!(lines[6].starts_with('└'));

        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }
}
