/// Fixed-width table with a leading index column
///
/// Values and headers are right-aligned, the index is left-aligned and has
/// no header, and columns are separated by two spaces.
pub struct CompactTable {
    header: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

impl CompactTable {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, index: usize, fields: &[String]) {
        self.rows.push((index.to_string(), fields.to_vec()));
    }

    pub fn render(&self) -> String {
        let index_width = self.rows.iter().map(|(i, _)| i.len()).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .map(|(col, h)| {
                self.rows
                    .iter()
                    .filter_map(|(_, fields)| fields.get(col))
                    .map(|f| f.chars().count())
                    .fold(h.chars().count(), usize::max)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(Self::line(" ", index_width, &self.header, &widths));
        for (index, fields) in &self.rows {
            lines.push(Self::line(index, index_width, fields, &widths));
        }
        lines.join("\n")
    }

    fn line(index: &str, index_width: usize, cells: &[String], widths: &[usize]) -> String {
        let mut out = format!("{:<index_width$}", index);
        for (cell, &width) in cells.iter().zip(widths) {
            out.push_str(&format!("  {:>width$}", cell));
        }
        out
    }
}
