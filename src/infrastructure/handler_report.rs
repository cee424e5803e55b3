use std::io::Write;

use crate::{ItemHandler, ReportEntry, StdResult};

const SEPARATOR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 16;

/// A handler writing each item as a block of labelled, fixed-width lines.
pub struct ReportPrinter<W: Write> {
    writer: W,
}

impl<W: Write> ReportPrinter<W> {
    /// Creates a new `ReportPrinter` writing to the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the printer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_separator(&mut self) -> StdResult<()> {
        writeln!(self.writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;

        Ok(())
    }
}

impl<T: ReportEntry + 'static, W: Write> ItemHandler<T> for ReportPrinter<W> {
    fn handle(&mut self, item: &T) -> StdResult<()> {
        self.write_separator()?;
        for (label, value) in item.report_fields() {
            writeln!(self.writer, "{label:<width$}: {value}", width = LABEL_WIDTH)?;
        }

        Ok(())
    }

    fn finish(&mut self) -> StdResult<()> {
        self.write_separator()?;
        self.writer.flush()?;

        Ok(())
    }
}
