//! Table rendering utilities for CLI outputs.

pub struct Column {
    pub header: String,
    pub width: usize,
    pub right: bool,
}

impl Column {
    pub fn left(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            right: false,
        }
    }

    pub fn right(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
            right: true,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    separator: char,
}

impl Table {
    pub fn new(columns: Vec<Column>, separator: char) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            separator,
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn cell(col: &Column, value: &str) -> String {
        let w = col.width.max(col.header.chars().count());
        if col.right {
            format!("{:>w$} ", value, w = w)
        } else {
            format!("{:<w$} ", value, w = w)
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for col in &self.columns {
            out.push_str(&Self::cell(col, &col.header));
        }
        let width = out.chars().count();
        out.push('\n');
        out.push_str(&self.separator.to_string().repeat(width));
        out.push('\n');

        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let value = row.get(i).map(String::as_str).unwrap_or("");
                out.push_str(&Self::cell(col, value));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_rows() {
        let mut t = Table::new(vec![Column::left("ID", 4), Column::right("MIN", 5)], '-');
        t.add_row(vec!["ab".into(), "90".into()]);
        t.add_row(vec!["c".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].trim_end(), "ID     MIN");
        assert_eq!(lines[1], "-".repeat(11));
        assert_eq!(lines[2].trim_end(), "ab      90");
        assert_eq!(lines[3].trim_end(), "c");
    }
}
