//! Terminal confirmation prompt.

use std::io::BufRead;
use std::io::Write;

use dataframe_lib::action::Confirm;

/// Asks on stderr and reads the answer from stdin.
///
/// Anything other than `y` or `yes` declines, as does a closed stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, title: &str, message: &str) -> bool {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{title}: {message} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                log::warn!("[confirm] could not read answer: {e}");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
