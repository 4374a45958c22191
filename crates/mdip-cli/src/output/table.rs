//! Aligned text tables for `--format table`.
//!
//! Cells carry a [`Tone`] picked from the domain value they show, so colour
//! never depends on sniffing the rendered text.

use std::fmt::Display;

use mdip_core::enums::{IncidentStatus, Severity, TicketPriority, TicketStatus};

const GAP: &str = "  ";
const MIN_CLIP: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Number,
    Good,
    Warn,
    Alert,
}

impl Tone {
    const fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Plain | Self::Number => None,
            Self::Good => Some("32"),
            Self::Warn => Some("33"),
            Self::Alert => Some("31"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    text: String,
    tone: Tone,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    /// `-` for an absent value.
    pub fn optional(value: Option<impl Display>) -> Self {
        value.map_or_else(|| Self::text("-"), |v| Self::text(v.to_string()))
    }

    pub fn number(value: impl Display) -> Self {
        Self {
            text: value.to_string(),
            tone: Tone::Number,
        }
    }

    pub fn hours(value: Option<f64>) -> Self {
        value.map_or_else(|| Self::text("-"), |h| Self::number(format!("{h:.1}")))
    }

    fn toned(text: &str, tone: Tone) -> Self {
        Self {
            text: text.to_string(),
            tone,
        }
    }

    fn chars(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<Severity> for Cell {
    fn from(value: Severity) -> Self {
        let tone = match value {
            Severity::Low => Tone::Good,
            Severity::Medium => Tone::Warn,
            Severity::High | Severity::Critical => Tone::Alert,
        };
        Self::toned(value.as_str(), tone)
    }
}

impl From<TicketPriority> for Cell {
    fn from(value: TicketPriority) -> Self {
        let tone = match value {
            TicketPriority::Low => Tone::Good,
            TicketPriority::Medium => Tone::Warn,
            TicketPriority::High | TicketPriority::Critical => Tone::Alert,
        };
        Self::toned(value.as_str(), tone)
    }
}

impl From<IncidentStatus> for Cell {
    fn from(value: IncidentStatus) -> Self {
        let tone = match value {
            IncidentStatus::Open | IncidentStatus::InProgress => Tone::Warn,
            IncidentStatus::Resolved | IncidentStatus::Closed => Tone::Good,
        };
        Self::toned(value.as_str(), tone)
    }
}

impl From<TicketStatus> for Cell {
    fn from(value: TicketStatus) -> Self {
        let tone = match value {
            TicketStatus::Open | TicketStatus::InProgress | TicketStatus::WaitingForUser => {
                Tone::Warn
            }
            TicketStatus::Resolved | TicketStatus::Closed => Tone::Good,
        };
        Self::toned(value.as_str(), tone)
    }
}

/// A header row plus body rows, all the same length.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Two-column `field | value` layout for a single record.
    #[must_use]
    pub fn record() -> Self {
        Self::new(&["field", "value"])
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// Append a `field | value` row. Values in a record are left-aligned.
    pub fn field(&mut self, name: &str, value: Cell) {
        let value = match value.tone {
            Tone::Number => Cell::text(value.text),
            _ => value,
        };
        self.push(vec![Cell::text(name), value]);
    }

    /// Lay the table out. With `max_width`, only the last column is
    /// clipped; the columns before it are always shown in full.
    #[must_use]
    pub fn render(&self, max_width: Option<usize>, color: bool) -> String {
        if self.rows.is_empty() {
            return String::from("(no rows)");
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars());
            }
        }
        if let (Some(max), Some((last, leading))) = (max_width, widths.split_last_mut()) {
            let used: usize = leading.iter().map(|w| w + GAP.len()).sum();
            *last = (*last).min(max.saturating_sub(used).max(MIN_CLIP));
        }

        let header = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:<w$}"))
            .collect::<Vec<_>>()
            .join(GAP);
        let mut lines = vec![header.trim_end().to_string(), "-".repeat(header.chars().count())];
        for row in &self.rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| layout_cell(cell, *width, color))
                .collect::<Vec<_>>()
                .join(GAP);
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

fn layout_cell(cell: &Cell, width: usize, color: bool) -> String {
    let text = clip(&cell.text, width);
    let padded = if cell.tone == Tone::Number {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    };
    match cell.tone.ansi() {
        // Colour wraps the padded text so escapes never count toward width.
        Some(code) if color => {
            let trimmed = padded.trim_end();
            let pad = &padded[trimmed.len()..];
            format!("\u{1b}[{code}m{trimmed}\u{1b}[0m{pad}")
        }
        _ => padded,
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        let mut table = Table::new(&["id", "severity", "title"]);
        table.push(vec![
            Cell::number(7),
            Severity::Critical.into(),
            Cell::text("Ransomware on file share"),
        ]);
        table.push(vec![
            Cell::number(12),
            Severity::Low.into(),
            Cell::text("Lost badge"),
        ]);
        table
    }

    #[test]
    fn numbers_align_right_and_text_left() {
        let out = sample().render(None, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id  severity  title");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], " 7  Critical  Ransomware on file share");
        assert_eq!(lines[3], "12  Low       Lost badge");
    }

    #[test]
    fn only_last_column_is_clipped() {
        let out = sample().render(Some(24), false);
        let row = out.lines().nth(2).unwrap();
        assert!(row.starts_with(" 7  Critical  "));
        assert!(row.ends_with('…'));
        assert_eq!(row.chars().count(), 24);
    }

    #[test]
    fn colour_follows_domain_value_not_width() {
        let out = sample().render(None, true);
        let row = out.lines().nth(2).unwrap();
        assert!(row.contains("\u{1b}[31mCritical\u{1b}[0m  "));
        let plain = out.lines().nth(3).unwrap();
        assert!(plain.contains("\u{1b}[32mLow\u{1b}[0m     "));
    }

    #[test]
    fn ticket_states_pick_tones() {
        assert_eq!(Cell::from(TicketStatus::WaitingForUser).tone, Tone::Warn);
        assert_eq!(Cell::from(TicketStatus::Closed).tone, Tone::Good);
        assert_eq!(Cell::from(TicketPriority::High).tone, Tone::Alert);
        assert_eq!(Cell::from(IncidentStatus::Resolved).tone, Tone::Good);
    }

    #[test]
    fn missing_values_and_hours() {
        assert_eq!(Cell::optional(None::<&str>).text, "-");
        assert_eq!(Cell::hours(Some(5.26)).text, "5.3");
        assert_eq!(Cell::hours(None).text, "-");
    }

    #[test]
    fn empty_table_renders_placeholder() {
        assert_eq!(Table::new(&["id"]).render(None, false), "(no rows)");
    }
}
