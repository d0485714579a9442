/// Number of records between two progress updates.
pub const UPDATE_INTERVAL: u64 = 10000;

pub struct ProgressBar {
    bar: indicatif::ProgressBar,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        let bar = indicatif::ProgressBar::new(1);
        bar.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner} {elapsed_precise} {msg}")
                .expect("Invalid progress bar template"),
        );

        Self { bar }
    }

    pub fn update(&self, num_records: u64, num_called: u64) {
        self.bar.inc_length(UPDATE_INTERVAL);
        self.bar.inc(UPDATE_INTERVAL);
        self.bar.set_message(format!(
            "Processed {} records, called {} reads.",
            num_records, num_called
        ));
    }

    pub fn finish(&self, num_records: u64, num_called: u64) {
        self.bar.finish_with_message(format!(
            "Processed {} records, called {} reads.",
            num_records, num_called
        ));
    }
}
