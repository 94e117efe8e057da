use std::fmt::{self, Write};

/// A plain-text table with left-aligned columns separated by two spaces.
///
/// Headers must be free of whitespace so that headerless output can be piped through `awk`.
pub(crate) struct Table {
    header: Vec<&'static str>,
    body: Vec<Vec<String>>,
    print_header: bool,
}

impl Table {
    pub(crate) fn new(header: &[&'static str]) -> Table {
        debug_assert!(
            header.iter().all(|h| !h.contains(char::is_whitespace)),
            "table header contains whitespace"
        );

        Table {
            header: header.to_vec(),
            body: Vec::new(),
            print_header: true,
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    /// Appends a row. Missing cells are rendered empty and extra cells are dropped.
    pub(crate) fn add_row(&mut self, mut row: Vec<String>) {
        row.resize(self.header.len(), String::new());

        self.body.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.len()).collect();

        for row in &self.body {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        widths
    }
}

fn write_row<'a, I>(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a str>,
{
    let mut line = String::new();

    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);

        let pad = widths[i].saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }

    f.write_str(line.trim_end())?;
    f.write_char('\n')
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        if self.print_header {
            write_row(f, &widths, self.header.iter().copied())?;
        }

        for row in &self.body {
            write_row(f, &widths, row.iter().map(String::as_str))?;
        }

        Ok(())
    }
}

pub(crate) trait IntoTable: Into<Table> + Sized {
    fn into_table(self) -> Table {
        self.into()
    }
}

impl<T> IntoTable for T where T: Into<Table> + Sized {}
