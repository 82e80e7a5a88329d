//! Transfer progress with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "  {spinner:.cyan} {prefix} {bar:24.cyan/dim} {bytes}/{total_bytes} {bytes_per_sec:.dim}  {eta:.dim}";
const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {prefix} {bytes} {bytes_per_sec:.dim}";

/// Byte progress for a single transfer.
///
/// Draws an indicatif bar on stderr in interactive mode and stays hidden
/// otherwise; the transfer is logged either way.
#[derive(Clone)]
pub struct TransferProgress {
    bar: ProgressBar,
}

impl TransferProgress {
    /// Create a progress indicator for a transfer of `len` bytes, if known
    pub fn new(ctx: &UiContext, label: &str, len: Option<u64>) -> Self {
        if !ctx.use_fancy_output() {
            return Self::hidden();
        }

        let bar = match len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        bar.set_draw_target(ProgressDrawTarget::stderr());

        let template = if len.is_some() {
            BAR_TEMPLATE
        } else {
            SPINNER_TEMPLATE
        };
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            bar.set_style(
                style
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                    .progress_chars("━╸─"),
            );
        }
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// A progress indicator that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Wrap a writer so every byte written advances the bar
    pub fn wrap_write<W: Write>(&self, writer: W) -> indicatif::ProgressBarIter<W> {
        self.bar.wrap_write(writer)
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
    }
}
