use crate::{FileReport, Month, MonthlyStats, TemperatureRow};

/// Folds rows of one file into twelve monthly accumulators.
#[derive(Debug, Clone)]
pub struct MonthlyAggregator {
    months: [MonthlyStats; 12],
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MonthlyAggregator {
    pub fn new() -> MonthlyAggregator {
        MonthlyAggregator {
            months: std::array::from_fn(|i| MonthlyStats::empty(Month(i as u8 + 1))),
        }
    }

    /// `Month` is range-checked on construction, so every row has a slot.
    pub fn absorb(&mut self, row: TemperatureRow) {
        self.months[row.month.index()].absorb(row.temperature_c);
    }

    pub fn stats(&self, month: Month) -> &MonthlyStats {
        &self.months[month.index()]
    }

    /// Drops months without data and returns the rest in ascending order.
    pub fn finalize(self, file_name: impl Into<String>, skipped_lines: u64) -> FileReport {
        FileReport {
            file_name: file_name.into(),
            monthly: self
                .months
                .into_iter()
                .filter(|stats| stats.count > 0)
                .collect(),
            skipped_lines,
        }
    }
}
