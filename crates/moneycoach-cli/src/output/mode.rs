use crate::cli::{Commands, SettingsCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Setup { json, .. }
        | Commands::Log { json, .. }
        | Commands::Dash { json }
        | Commands::Reset { json, .. } => *json,
        Commands::Settings { command } => match command {
            SettingsCommand::Show { json } | SettingsCommand::Update { json, .. } => *json,
        },
    };
    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
