use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const SETUP_COMMAND_HINT: &str = "moneycoach setup --api-key <sk-...> --budget <amount>";
pub(crate) const RESET_COMMAND: &str = "moneycoach reset --yes";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `moneycoach {cmd} --help` for usage."),
            None => "Run `moneycoach --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_credential(command: &str) -> Self {
        Self::invalid_argument_with_recovery(
            "Please enter a valid OpenAI API key (starts with sk-)",
            vec![
                "Copy the secret key from your OpenAI dashboard; it begins with `sk-`.".to_string(),
                format!("Rerun `moneycoach {command}` with `--api-key <sk-...>`."),
            ],
        )
        .with_data(json!({ "field": "api_key" }))
    }

    pub fn invalid_budget(command: &str) -> Self {
        Self::invalid_argument_with_recovery(
            "Please enter a valid monthly budget",
            vec![
                "Use a whole number greater than zero, e.g. `--budget 20000`.".to_string(),
                format!("Rerun `moneycoach {command}` with a corrected budget."),
            ],
        )
        .with_data(json!({ "field": "budget" }))
    }

    pub fn invalid_description() -> Self {
        Self::invalid_argument_for_command("Please enter a description", Some("log"))
            .with_data(json!({ "field": "description" }))
    }

    pub fn invalid_amount() -> Self {
        Self::invalid_argument_for_command("Please enter a valid amount", Some("log"))
            .with_data(json!({ "field": "amount" }))
    }

    pub fn invalid_category(received: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Unknown category `{received}`."),
            vec![
                "Use one of: food, coffee, shopping, transport, entertainment, bills, other."
                    .to_string(),
            ],
        )
        .with_data(json!({ "field": "category", "received": received }))
    }

    pub fn setup_required() -> Self {
        Self::new(
            "setup_required",
            "Money Coach is not set up yet: an API key and a monthly budget are required.",
            vec![format!("Run `{SETUP_COMMAND_HINT}` first.")],
        )
    }

    pub fn confirmation_required() -> Self {
        Self::new(
            "confirmation_required",
            "Reset deletes all your data including expenses, budget, and API key.",
            vec![format!("Rerun `{RESET_COMMAND}` to confirm.")],
        )
    }

    pub fn invalid_config(variable: &str, detail: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("Environment variable `{variable}` is invalid: {detail}"),
            vec![format!("Fix or unset `{variable}` and rerun the command.")],
        )
        .with_data(json!({ "variable": variable }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn internal_runtime(message: &str) -> Self {
        Self::new("internal_runtime_error", message, Vec::new())
    }

    pub fn store_corrupt(key: &str, detail: &str) -> Self {
        Self::new(
            "store_corrupt",
            &format!("Stored value for `{key}` could not be decoded: {detail}"),
            vec![
                "Restore the store file from a backup if you have one.".to_string(),
                format!("Or run `{RESET_COMMAND}` to start over with an empty store."),
            ],
        )
        .with_data(json!({ "key": key }))
    }

    pub fn store_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_permission_denied",
            &format!("Cannot open the store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `MONEYCOACH_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Store database is locked at `{location}`."),
            vec![format!(
                "Close other moneycoach processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_file_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Store database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid store file or delete it to start over."
            )],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_") || self.code.starts_with("store_")
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::ClientError;

    #[test]
    fn store_errors_are_internal() {
        assert!(ClientError::store_locked(Path::new("/tmp/x.db")).is_internal());
        assert!(ClientError::store_corrupt("moneyCoach_expenses", "eof").is_internal());
        assert!(ClientError::internal_runtime("boom").is_internal());
    }

    #[test]
    fn validation_errors_are_not_internal() {
        assert!(!ClientError::invalid_amount().is_internal());
        assert!(!ClientError::setup_required().is_internal());
        assert!(!ClientError::confirmation_required().is_internal());
    }

    #[test]
    fn store_corrupt_names_the_key_and_reset_command() {
        let error = ClientError::store_corrupt("moneyCoach_budget", "not a number");
        assert_eq!(error.code, "store_corrupt");
        assert!(error.message.contains("moneyCoach_budget"));
        assert!(
            error
                .recovery_steps
                .iter()
                .any(|step| step.contains("moneycoach reset --yes"))
        );
    }
}
