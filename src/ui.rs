//! Terminal rendering of a build matrix.
//!
//! `--format table` shows the matrix as a box-drawn table sized to the
//! terminal. Columns follow the schema the matrix was built with, so a
//! `basic` matrix has no package columns and only `container` has an image
//! column.

use colored::*;
use console::{measure_text_width, truncate_str};
use std::io::{self, Write};

use crate::matrix::{Configuration, Matrix, Schema};

/// Columns never shrink below this when the terminal is narrow
const MIN_COLUMN_WIDTH: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn from_matrix(matrix: &Matrix, schema: Schema) -> Self {
        let mut headers = vec!["#", "Qt", "Platform", "Compiler", "Runner", "QtDBus"];
        if schema.carries_qt_packages() {
            headers.extend(["Archives", "Modules"]);
        }
        if schema.carries_base_image() {
            headers.push("Image");
        }

        let mut table = Table::new(&headers);
        for (index, config) in matrix.include.iter().enumerate() {
            table.add_row(matrix_row(index + 1, config, schema));
        }
        table
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&sanitize_content(cell)));
            }
        }

        let overhead = 3 + 3 * self.headers.len();
        let available = max_width.saturating_sub(overhead);
        let mut total: usize = widths.iter().sum();

        // Shave the widest column one char at a time until the table fits
        while total > available {
            let Some((widest, &width)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if width <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[widest] -= 1;
            total -= 1;
        }

        widths
    }

    /// Render to lines no wider than `max_width` where the columns allow it
    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let widths = self.column_widths(max_width);
        let separator = |left: &str, mid: &str, right: &str| -> String {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, inner.join(mid), right)
        };
        let line = |cells: Vec<String>| -> String {
            let mut s = String::from("  │");
            for (cell, &width) in cells.iter().zip(&widths) {
                let visible = measure_text_width(cell);
                s.push_str(&format!(" {}{} │", cell, " ".repeat(width.saturating_sub(visible))));
            }
            s
        };

        let mut lines = vec![separator("┌", "┬", "┐")];
        lines.push(line(
            self.headers
                .iter()
                .zip(&widths)
                .map(|(h, &w)| truncate_str(h, w, "...").bold().to_string())
                .collect(),
        ));
        lines.push(separator("├", "┼", "┤"));
        for row in &self.rows {
            lines.push(line(
                row.iter()
                    .zip(&widths)
                    .map(|(cell, &w)| truncate_str(&sanitize_content(cell), w, "...").to_string())
                    .collect(),
            ));
        }
        lines.push(separator("└", "┴", "┘"));
        lines
    }

    /// Write to `out`, sized to the terminal stdout is attached to
    pub fn print(&self, out: &mut impl Write) -> io::Result<()> {
        let (_rows, cols) = console::Term::stdout().size();
        for line in self.render(cols as usize) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

fn matrix_row(index: usize, config: &Configuration, schema: Schema) -> Vec<String> {
    let dbus = if config.with_qtdbus == "ON" {
        config.with_qtdbus.green().to_string()
    } else {
        config.with_qtdbus.yellow().to_string()
    };

    let mut row = vec![
        index.to_string(),
        config.qt_version.clone(),
        config.platform.clone(),
        config.compiler_full.clone(),
        config.runs_on.clone(),
        dbus,
    ];
    if schema.carries_qt_packages() {
        row.push(config.qt_archives.clone().unwrap_or_default());
        row.push(config.qt_modules.clone().unwrap_or_default());
    }
    if schema.carries_base_image() {
        let image = config
            .compiler_base_image
            .as_ref()
            .and_then(|image| image.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| "-".dimmed().to_string());
        row.push(image);
    }
    row
}

fn sanitize_content(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatrixConfig;
    use console::strip_ansi_codes;

    /// Visible text of rendered lines
    fn plain(lines: &[String]) -> Vec<String> {
        lines.iter().map(|l| strip_ansi_codes(l).to_string()).collect()
    }

    #[test]
    fn test_rows_with_wrong_arity_are_dropped() {
        let mut table = Table::new(&["a", "b"]);
        table.add_row(vec!["1".to_string()]);
        table.add_row(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_render_matrix_has_one_line_per_configuration() {
        let config = MatrixConfig::builtin();
        let matrix = config.builder(Some("linux")).build().unwrap();
        let table = Table::from_matrix(&matrix, config.schema);

        let lines = plain(&table.render(200));
        // top border, header, separator, rows, bottom border
        assert_eq!(lines.len(), matrix.len() + 4);
        assert!(lines[1].contains("Archives"));
        assert!(lines[3].contains("gcc-10.3.0"));
        assert!(lines[3].contains("ubuntu-20.04"));
    }

    #[test]
    fn test_render_columns_follow_schema() {
        let mut config = MatrixConfig::builtin();
        config.schema = Schema::Container;
        let matrix = config.builder(Some("windows")).build().unwrap();
        let lines = plain(&Table::from_matrix(&matrix, Schema::Container).render(200));
        assert!(lines[1].contains("Image"));
        assert!(lines[3].contains(" - "));

        let lines = plain(&Table::from_matrix(&matrix, Schema::Basic).render(200));
        assert!(!lines[1].contains("Archives"));
    }

    #[test]
    fn test_print_writes_rendered_lines() {
        let mut table = Table::new(&["name"]);
        table.add_row(vec!["gcc".to_string()]);
        let mut out = Vec::new();
        table.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(strip_ansi_codes(&text).contains("gcc"));
    }

    #[test]
    fn test_render_shrinks_to_width() {
        let mut table = Table::new(&["name", "value"]);
        table.add_row(vec!["x".repeat(40), "y".repeat(40)]);
        let lines = plain(&table.render(40));
        for line in &lines {
            assert!(measure_text_width(line) <= 40, "too wide: {}", line);
        }
        assert!(lines[3].contains("..."));
    }

    #[test]
    fn test_render_all_lines_same_width() {
        let config = MatrixConfig::builtin();
        let matrix = config.builder(None).build().unwrap();
        let lines = plain(&Table::from_matrix(&matrix, config.schema).render(300));
        let width = measure_text_width(&lines[0]);
        assert!(lines.iter().all(|l| measure_text_width(l) == width));
    }
}
