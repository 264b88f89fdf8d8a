use std::io;

use moneycoach_client::contracts::envelope::failure_from_error;
use moneycoach_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::json;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let failure = failure_from_error(error);
    let mut payload = json!({
        "error": failure.error,
    });
    if let Some(data) = failure.data {
        payload["data"] = data;
    }
    serialize_json_pretty(&payload)
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
