use indicatif::{ProgressBar, ProgressStyle};
use std::io::{stderr, IsTerminal};

/// Styled progress bar for long passes. Returns None when stderr is not a
/// terminal so scheduled runs keep clean logs.
pub fn progress_bar(len: u64, message: String) -> Option<ProgressBar> {
    if !stderr().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .ok()?
            .progress_chars("##-")
    );
    bar.set_message(message);

    Some(bar)
}
