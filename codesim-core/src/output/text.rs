use std::io;

use crate::output::Reporter;
use crate::scheduler::PairReport;

/// Line written in place of a score for a pair that could not be compared.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Plain score file: one line per pair, two decimal places.
#[derive(Debug, Default)]
pub struct TextReporter;

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reporter for TextReporter {
    fn report(&self, reports: &[PairReport], writer: &mut dyn io::Write) -> io::Result<()> {
        for report in reports {
            match &report.result {
                Ok(cmp) => writeln!(writer, "{}", cmp.score)?,
                Err(_) => writeln!(writer, "{ERROR_SENTINEL}")?,
            }
        }
        Ok(())
    }
}
