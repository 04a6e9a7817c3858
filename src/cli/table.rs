//! Plain padded-column tables for listings, widths computed from content.

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Renders header, dashed underline, and rows. Empty result sets render
    /// as `(none)` instead of a bare header.
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "(none)".into();
        }
        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.len());
                }
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_line(&self.headers, &widths));
        let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        lines.push(format_line(&dashes, &widths));
        for row in &self.rows {
            lines.push(format_line(row, &widths));
        }
        lines.join("\n")
    }
}

fn format_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::new();
    for (index, width) in widths.iter().enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let cell = cells.get(index).map(AsRef::as_ref).unwrap_or("");
        line.push_str(&format!("{cell:<width$}"));
    }
    line.trim_end().to_string()
}
