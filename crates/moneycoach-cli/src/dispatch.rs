use moneycoach_client::commands::{self, log::LogRunOptions};
use moneycoach_client::config::CoachConfig;
use moneycoach_client::contracts::envelope::success;
use moneycoach_client::contracts::types::CoachData;
use moneycoach_client::{ClientError, ClientResult, SuccessEnvelope};
use tracing::debug;

use crate::cli::{Cli, Commands, SettingsCommand};
use crate::output::{self, OutputMode};
use crate::stdout_io::write_stdout_line;

pub fn dispatch(cli: &Cli, mode: OutputMode) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Setup {
            api_key, budget, ..
        } => commands::setup::run(api_key, budget),
        Commands::Settings { command } => match command {
            SettingsCommand::Show { .. } => commands::settings::show(),
            SettingsCommand::Update {
                api_key, budget, ..
            } => commands::settings::update(api_key.as_deref(), budget.as_deref()),
        },
        Commands::Log {
            description,
            amount,
            category,
            no_coach,
            ..
        } => {
            let coach = (!*no_coach).then(CoachConfig::from_env);
            let options = LogRunOptions {
                description: description.clone(),
                amount: amount.clone(),
                category: category.clone(),
                coach,
                ..LogRunOptions::default()
            };
            match (mode, options.coach.is_some()) {
                (OutputMode::Text, true) => log_then_coach(options),
                _ => commands::log::run_with_options(options),
            }
        }
        Commands::Dash { .. } => commands::dash::run(),
        Commands::Reset { yes, .. } => commands::reset::run(*yes),
    }
}

/// Prints the refreshed dashboard as soon as the expense is saved, then
/// waits for the coach and returns only its reply.
fn log_then_coach(mut options: LogRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let Some(config) = options.coach.take() else {
        return commands::log::run_with_options(options);
    };

    let logged = commands::log::record_with_options(&options)?;
    let recorded = success("log", logged.clone().into_data(None))?;
    output::print_success(&recorded, OutputMode::Text).map_err(output_error)?;
    write_stdout_line(&output::thinking_line()).map_err(output_error)?;

    if let Ok(config) = &config {
        debug!(endpoint = %config.endpoint, model = %config.model, "requesting coach reply");
    }
    let reply = commands::log::coach_blocking(&logged, config);
    success("log coach", CoachData::from_reply(reply))
}

fn output_error(error: std::io::Error) -> ClientError {
    ClientError::internal_runtime(&format!("failed to write output: {error}"))
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;
    use crate::output::{OutputMode, mode_for_command};

    use super::dispatch;

    #[test]
    fn reset_without_confirmation_is_rejected_before_opening_the_store() {
        let parsed = parse_from(["moneycoach", "reset"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let mode = mode_for_command(&cli.command);
            assert_eq!(mode, OutputMode::Text);
            let response = dispatch(&cli, mode);
            assert!(matches!(response, Err(ref error) if error.code == "confirmation_required"));
        }
    }

    #[test]
    fn invalid_setup_key_is_rejected_before_opening_the_store() {
        let parsed = parse_from([
            "moneycoach",
            "setup",
            "--api-key",
            "pk-wrong",
            "--budget",
            "20000",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli, OutputMode::Json);
            assert!(matches!(
                response,
                Err(ref error) if error.message == "Please enter a valid OpenAI API key (starts with sk-)"
            ));
        }
    }
}
