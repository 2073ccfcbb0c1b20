//! Bridges session notices to terminal output.

use pokedex_core::{NoticeLevel, Notifier};

use crate::output;

/// Prints session notices the way the CLI prints its own messages.
///
/// The session layer reports logins, logouts and request failures through
/// its notifier; routing those through [`output`] keeps the terminal
/// presentation in one place.
#[derive(Debug, Default)]
pub struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => output::success(message),
            NoticeLevel::Info => output::note(message),
            NoticeLevel::Warning => output::warn(message),
            NoticeLevel::Error => output::error(message),
        }
    }
}
