use cellgraph_engine::engine::Position;
use std::io::{self, Write};

use super::{Cell, Sheet};

/// Dimensions of the printable area, counted from A1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Sheet {
    /// Smallest area anchored at A1 that contains every cell with non-empty text.
    pub fn printable_size(&self) -> Size {
        self.cells
            .iter()
            .filter(|(_, cell)| !cell.content.is_empty())
            .fold(Size::default(), |size, (pos, _)| Size {
                rows: size.rows.max(pos.row + 1),
                cols: size.cols.max(pos.col + 1),
            })
    }

    /// Write values of the printable area, one row per line, tab-separated.
    pub fn print_values(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_with(out, |sheet, pos, _| {
            sheet
                .value(pos)
                .map(|v| v.to_string())
                .unwrap_or_default()
        })
    }

    /// Write texts of the printable area, one row per line, tab-separated.
    pub fn print_texts(&self, out: &mut impl Write) -> io::Result<()> {
        self.print_with(out, |_, _, cell| cell.text())
    }

    fn print_with(
        &self,
        out: &mut impl Write,
        render: impl Fn(&Sheet, Position, &Cell) -> String,
    ) -> io::Result<()> {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    write!(out, "\t")?;
                }
                let pos = Position::new(row, col);
                if let Some(cell) = self.cells.get(&pos) {
                    write!(out, "{}", render(self, pos, cell))?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
