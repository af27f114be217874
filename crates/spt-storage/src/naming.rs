use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// `{stem}{YYYY-MM-DD-HH-mm-ss}.{extension}`
pub fn stored_file_name(stem: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{}{}.{}", stem, at.format(TIMESTAMP_FORMAT), extension)
}
