use moneycoach_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let heading = if error.is_internal() {
        "Money Coach could not read or write its data."
    } else {
        "That didn't work, but it's easy to fix."
    };

    let mut lines = vec![
        heading.to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        lines.extend(
            error
                .recovery_steps
                .iter()
                .enumerate()
                .map(|(index, step)| format!("  {}. {step}", index + 1)),
        );
    }

    lines.join("\n")
}
