mod dashboard_text;
mod error_text;
mod format;
mod json;
mod mode;
mod profile_text;

use std::io;

use moneycoach_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use dashboard_text::thinking_line;
pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "setup" | "settings update" => {
            profile_text::render_profile_saved(&success.command, &success.data)
        }
        "settings show" => profile_text::render_settings(&success.data),
        "log" => dashboard_text::render_log(&success.data),
        "log coach" => dashboard_text::render_coach(&success.data),
        "dash" => dashboard_text::render_dash(&success.data),
        "reset" => profile_text::render_reset(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
