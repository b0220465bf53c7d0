use anyhow::{bail, Result};
use pad::PadStr;

pub struct Table {
    ncol: usize,
    rows: Vec<Vec<String>>,
    headless: bool,
}

impl Table {
    pub fn with_capacity(size: usize, headless: bool) -> Table {
        Table {
            ncol: 0,
            rows: Vec::with_capacity(size),
            headless,
        }
    }

    /// The first row added is the title row, it fixes the column count.
    pub fn add(&mut self, row: Vec<String>) -> Result<()> {
        if self.ncol == 0 {
            self.ncol = row.len();
            if self.headless {
                return Ok(());
            }
        } else if row.len() != self.ncol {
            bail!(
                "unexpected row len {}, table has {} columns",
                row.len(),
                self.ncol
            );
        }
        self.rows.push(row);
        Ok(())
    }

    fn column_widths(&self) -> Vec<usize> {
        (0..self.ncol)
            .map(|coli| {
                self.rows
                    .iter()
                    .map(|row| console::measure_text_width(&row[coli]))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(self) -> Vec<String> {
        let pads = self.column_widths();

        let mut split = String::from("+");
        for pad in pads.iter() {
            split.push_str(&"-".repeat(*pad + 2));
            split.push('+');
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        for (rowi, row) in self.rows.into_iter().enumerate() {
            if rowi == 0 {
                lines.push(split.clone());
            }
            let mut line = String::from("|");
            for (coli, cell) in row.into_iter().enumerate() {
                let pad = pads[coli];
                let text = cell.pad_to_width_with_alignment(pad, pad::Alignment::Left);
                line.push_str(&format!(" {text} |"));
            }
            lines.push(line);

            if !self.headless && rowi == 0 {
                lines.push(split.clone());
            }
        }
        lines.push(split);
        lines
    }

    pub fn show(self) {
        for line in self.render() {
            println!("{line}");
        }
    }
}
