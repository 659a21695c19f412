use std::io::Write;

use super::Report;

/// Encode the report as compact JSON followed by a newline.
pub fn write_report<W: Write>(mut writer: W, report: &Report) -> serde_json::Result<()> {
    serde_json::to_writer(&mut writer, report)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)
}

/// Encode the report into an owned buffer, ready to be written in one go.
pub fn to_json_bytes(report: &Report) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, report)?;
    Ok(buffer)
}

/// Render the report as a JSON string without the trailing newline (useful for tests and snapshots).
pub fn render_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string(report)
}
