use crate::domain::entities::{DisplayRow, SolutionCell};

const HEADERS: [&str; 5] = ["Time", "Scramble", "Solution", "Event", "Date"];

/// Renders rows as an aligned plain-text table.
pub fn render_text(rows: &[DisplayRow]) -> String {
    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            let solution = match &row.solution {
                SolutionCell::Empty => String::new(),
                SolutionCell::Link { label, .. } => label.clone(),
                SolutionCell::Unavailable(_) => "!".to_string(),
            };
            [
                row.time.clone(),
                row.scramble.text.replace('\n', " "),
                solution,
                row.event.clone(),
                row.recorded_at.clone(),
            ]
        })
        .collect();

    let mut widths: [usize; 5] = HEADERS.map(|h| h.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("-+-").as_str());
    out.push('\n');
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let fill = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
