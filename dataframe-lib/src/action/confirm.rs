//! Confirmation prompt collaborator.

/// A confirmation prompt.
///
/// Returns `true` if confirmed, `false` if cancelled.
pub trait Confirm {
    fn confirm(&self, title: &str, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str, &str) -> bool,
{
    fn confirm(&self, title: &str, message: &str) -> bool {
        self(title, message)
    }
}

/// A prompt that always gives the same answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        self.0
    }
}
