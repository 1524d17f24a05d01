use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{fetched, pending};

/// Spinner shown on stderr while a request is in flight.
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    pub fn start(what: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(template) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(template);
        }
        pb.set_message(pending(what).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self, count: usize, noun: &str) {
        self.pb.finish_with_message(fetched(count, noun).to_string());
    }
}
