use crate::cli::actions::{Action, counter, generate, validate};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub fn execute(action: Action) -> Result<()> {
    match action {
        Action::Validate(args) => validate::execute(&args),
        Action::Generate(args) => generate::execute(&args),
        Action::Counter(args) => counter::execute(&args),
    }
}
