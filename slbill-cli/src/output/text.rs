//! Text output formatting with aligned columns and colors.

use slbill_core::{CostTotal, ReportTable};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";

/// Gap between table columns.
const COLUMN_GAP: &str = "  ";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a report table: header, rule, then one line per row.
    ///
    /// An empty table renders the header and rule only.
    pub fn format_table(&self, table: &ReportTable) -> String {
        let widths = table.column_widths();
        let mut lines = Vec::with_capacity(table.len() + 2);

        let header = ReportTable::header().map(String::from);
        lines.push(self.bold(&Self::pad_row(&header, &widths)));
        lines.push(self.dim(&Self::rule(&widths)));

        for row in table.rows() {
            lines.push(Self::pad_row(row, &widths));
        }

        lines.join("\n")
    }

    /// Formats an accumulated cost.
    pub fn format_total(&self, total: &CostTotal) -> String {
        let mut lines = vec![
            format!("Resources:  {}", total.resources),
            format!("Total cost: {}", self.green(&format!("{:.2}", total.total))),
        ];

        if total.unpriced() > 0 {
            lines.push(self.dim(&format!("({} without a cost)", total.unpriced())));
        }

        lines.join("\n")
    }

    /// Pads each cell to its column width. The last column is not padded.
    fn pad_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
        let last = cells.len() - 1;
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == last {
                    cell.clone()
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_string()
    }

    fn rule(widths: &[usize]) -> String {
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.use_colors {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
