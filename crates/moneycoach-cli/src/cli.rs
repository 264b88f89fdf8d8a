use clap::{Parser, Subcommand};

/// Extended help shown after `moneycoach log --help`.
pub const LOG_AFTER_HELP: &str = "\
Categories:
  food (default), coffee, shopping, transport, entertainment, bills, other

What happens:
  1. The expense is saved and the dashboard is printed.
  2. Your coach reads this week's numbers and replies in a line or two.
     Press Ctrl-C while it is thinking to skip the reply; the expense stays saved.

Examples:
  moneycoach log \"Latte\" 180 --category coffee
  moneycoach log \"Groceries\" 1240.50
  moneycoach log \"Metro card\" 500 --category transport --no-coach
";

#[derive(Debug, Parser)]
#[command(
    name = "moneycoach",
    version,
    about = "expense tracker with a witty money coach",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Save your OpenAI API key and monthly budget
    Setup {
        /// OpenAI API key (starts with sk-)
        #[arg(long = "api-key", value_name = "KEY")]
        api_key: String,
        /// Monthly budget in rupees
        #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
        budget: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show or change the saved API key and budget
    #[command(arg_required_else_help = true)]
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Record an expense and hear from your coach
    #[command(after_long_help = LOG_AFTER_HELP, allow_negative_numbers = true)]
    Log {
        /// What the money went on (e.g. "Latte")
        description: String,
        /// Amount in rupees, greater than zero
        amount: String,
        /// Expense category
        #[arg(long, short = 'c', value_name = "CATEGORY")]
        category: Option<String>,
        /// Skip the coach request
        #[arg(long = "no-coach")]
        no_coach: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show this week's stats and recent expenses
    Dash {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Delete all data: expenses, budget and API key
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommand {
    /// Show the masked API key and monthly budget
    Show {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Change the API key, the budget, or both
    Update {
        /// New OpenAI API key (starts with sk-)
        #[arg(long = "api-key", value_name = "KEY")]
        api_key: Option<String>,
        /// New monthly budget in rupees
        #[arg(long, value_name = "AMOUNT", allow_negative_numbers = true)]
        budget: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
