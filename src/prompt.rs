use std::io;
use std::path::Path;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

/// Asks the user to approve actions that cannot be undone or cost requests.
pub trait Prompter {
    /// Whether an existing file at `path` may be overwritten.
    fn confirm_overwrite(&self, path: &Path) -> io::Result<bool>;

    /// Whether `count` requests may be sent.
    fn confirm_requests(&self, count: usize) -> io::Result<bool>;
}

/// Interactive prompts on the controlling terminal. Enter accepts.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn ask(prompt: String) -> io::Result<bool> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(io::Error::other)?;
        Ok(answer)
    }
}

impl Prompter for TerminalPrompter {
    fn confirm_overwrite(&self, path: &Path) -> io::Result<bool> {
        Self::ask(format!(
            "Are you sure you want to overwrite '{}'?",
            path.display()
        ))
    }

    fn confirm_requests(&self, count: usize) -> io::Result<bool> {
        Self::ask(format!(
            "This search needs {} requests to GitHub. Send them?",
            count
        ))
    }
}
