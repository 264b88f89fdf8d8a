use std::io;

use serde_json::Value;

use super::dashboard_text::dashboard_lines;
use super::format::key_value_rows;

pub fn render_profile_saved(command: &str, data: &Value) -> io::Result<String> {
    let profile = data
        .get("profile")
        .ok_or_else(|| io::Error::other("profile output requires profile"))?;
    let dashboard = data
        .get("dashboard")
        .ok_or_else(|| io::Error::other("profile output requires dashboard"))?;

    let heading = if command == "setup" {
        "Setup complete. Your coach is ready."
    } else {
        "Settings saved."
    };

    let mut lines = vec![heading.to_string()];
    lines.extend(profile_rows(profile));
    lines.push(String::new());
    lines.extend(dashboard_lines(dashboard)?);
    Ok(lines.join("\n"))
}

pub fn render_settings(data: &Value) -> io::Result<String> {
    let configured = data
        .get("configured")
        .and_then(Value::as_bool)
        .ok_or_else(|| io::Error::other("settings output requires configured"))?;

    if !configured {
        return Ok([
            "Money Coach is not set up yet.",
            "",
            "Get started:",
            "  moneycoach setup --api-key <sk-...> --budget <amount>",
        ]
        .join("\n"));
    }

    let mut lines = vec!["Settings:".to_string()];
    lines.extend(profile_rows(data));
    Ok(lines.join("\n"))
}

pub fn render_reset(data: &Value) -> io::Result<String> {
    let cleared = data
        .get("cleared_keys")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("reset output requires cleared_keys"))?;

    let mut lines = vec![
        "All data has been reset.".to_string(),
        String::new(),
        format!("Cleared {} stored entries.", cleared.len()),
    ];
    if let Some(path) = data.get("store_path").and_then(Value::as_str) {
        lines.push(format!("Store: {path}"));
    }
    lines.push(String::new());
    lines.push("Run `moneycoach setup` to start again.".to_string());
    Ok(lines.join("\n"))
}

fn profile_rows(profile: &Value) -> Vec<String> {
    let api_key = profile
        .get("api_key")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let budget = profile
        .get("monthly_budget")
        .and_then(Value::as_u64)
        .map(moneycoach_client::view::format_budget)
        .unwrap_or_default();
    key_value_rows(
        &[
            ("API key:", api_key),
            ("Monthly budget:", format!("₹{budget}")),
        ],
        2,
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_reset, render_settings};

    #[test]
    fn settings_show_masks_and_formats() {
        let rendered = render_settings(&json!({
            "api_key": "sk-****abcd",
            "monthly_budget": 150000,
            "configured": true
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("  API key:         sk-****abcd"));
            assert!(text.contains("  Monthly budget:  ₹1,50,000"));
        }
    }

    #[test]
    fn unconfigured_settings_point_at_setup() {
        let rendered = render_settings(&json!({
            "api_key": "",
            "monthly_budget": 0,
            "configured": false
        }));
        assert!(matches!(rendered, Ok(ref text) if text.contains("moneycoach setup")));
    }

    #[test]
    fn reset_reports_cleared_entries() {
        let rendered = render_reset(&json!({
            "cleared_keys": ["moneyCoach_apiKey", "moneyCoach_budget", "moneyCoach_expenses"],
            "store_path": "/tmp/home/moneycoach.db"
        }));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Cleared 3 stored entries."));
            assert!(text.contains("/tmp/home/moneycoach.db"));
        }
    }
}
