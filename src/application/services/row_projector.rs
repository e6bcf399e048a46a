use crate::application::ports::link_encoder::{LinkEncoder, LinkRequest};
use crate::application::ports::time_formatter::TimeFormatter;
use crate::application::shared::timestamp::TimestampFormatter;
use crate::domain::entities::{
    AttemptRecord, DeleteControl, DisplayRow, SOLUTION_LINK_GLYPH, ScrambleCell, SolutionCell,
};
use std::sync::Arc;

/// Derives the display fields of one attempt row.
pub struct RowProjector {
    time_formatter: Arc<dyn TimeFormatter>,
    link_encoder: Arc<dyn LinkEncoder>,
    timestamps: TimestampFormatter,
    identity_tag: Option<String>,
}

impl RowProjector {
    pub fn new(
        time_formatter: Arc<dyn TimeFormatter>,
        link_encoder: Arc<dyn LinkEncoder>,
        timestamps: TimestampFormatter,
    ) -> Self {
        Self {
            time_formatter,
            link_encoder,
            timestamps,
            identity_tag: None,
        }
    }

    pub fn with_identity_tag(mut self, identity_tag: Option<String>) -> Self {
        self.identity_tag = identity_tag.filter(|tag| !tag.trim().is_empty());
        self
    }

    /// Returns `None` for incomplete attempts; those never become rows. Link failures stay in
    /// the row as errors.
    pub fn project(&self, record: &AttemptRecord) -> Option<DisplayRow> {
        let total_result_ms = record.total_result_ms?;
        let time = self.time_formatter.format(total_result_ms);
        let scramble = record.scramble.as_deref().unwrap_or_default();

        let scramble_link = self.link_encoder.encode(&LinkRequest::setup_only(scramble));

        let solution = match record.solution.as_deref() {
            Some(solution) if record.has_solution() => {
                let title = self.solution_title(&time, record.unix_date);
                let request = LinkRequest {
                    setup: scramble,
                    alg: solution,
                    title: Some(&title),
                };
                match self.link_encoder.encode(&request) {
                    Ok(href) => SolutionCell::Link {
                        label: SOLUTION_LINK_GLYPH.to_string(),
                        href,
                        title,
                    },
                    Err(err) => SolutionCell::Unavailable(err),
                }
            }
            _ => SolutionCell::Empty,
        };

        Some(DisplayRow {
            time,
            scramble: ScrambleCell {
                text: scramble.to_string(),
                link: scramble_link,
            },
            solution,
            event: record.event.clone(),
            recorded_at: record
                .unix_date
                .map(|ms| self.timestamps.recorded_at(ms))
                .unwrap_or_default(),
            delete: DeleteControl {
                attempt: record.reference(),
            },
        })
    }

    fn solution_title(&self, time: &str, unix_date: Option<i64>) -> String {
        let mut title = format!("{time}s");
        if let Some(tag) = &self.identity_tag {
            title.push('\n');
            title.push_str(tag);
        }
        if let Some(ms) = unix_date {
            let date = self.timestamps.date(ms);
            if !date.is_empty() {
                title.push('\n');
                title.push_str(&date);
            }
        }
        title
    }
}
