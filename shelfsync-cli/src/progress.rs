//! Terminal progress display for sync runs.

use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use shelfsync_import::ImportProgress;

/// Shows phases as log lines and image conversion as a progress bar.
///
/// A fresh bar is created for each batch's image phase and cleared when the
/// last image finishes.
pub(crate) struct BarProgress {
    quiet: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl BarProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        Self {
            quiet,
            bar: RefCell::new(None),
        }
    }

    fn new_bar(&self, total: usize) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(
            Some(total as u64),
            if self.quiet {
                ProgressDrawTarget::hidden()
            } else {
                ProgressDrawTarget::stderr()
            },
        );
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("=> "));
        bar
    }
}

impl ImportProgress for BarProgress {
    fn on_phase(&self, message: &str) {
        let line = || {
            log::info!(
                "{}",
                message.if_supports_color(Stdout, |t| t.dimmed())
            )
        };
        match self.bar.borrow().as_ref() {
            Some(bar) => bar.suspend(line),
            None => line(),
        }
    }

    fn on_image(&self, current: usize, total: usize, name: &str) {
        let mut slot = self.bar.borrow_mut();
        let bar = slot.get_or_insert_with(|| self.new_bar(total));
        bar.set_position(current as u64);
        bar.set_message(name.to_string());
        if current >= total {
            bar.finish_and_clear();
            *slot = None;
        }
    }

    fn on_complete(&self, _message: &str) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}
