use chrono::{DateTime, Utc};

pub const INPUT_PREFIX: &str = "input";
pub const OUTPUT_PREFIX: &str = "output";
pub const OUTPUT_EXTENSION: &str = "csv";

/// `MM-DD-YYYY-HH:MM:SS.mmm`
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H:%M:%S%.3f";

pub fn input_object_key(file_name: &str) -> String {
    format!("{INPUT_PREFIX}/{file_name}")
}

/// Everything before the first `.` of the file name.
pub fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

pub fn output_object_key(completed_at: DateTime<Utc>, file_name: &str) -> String {
    format!(
        "{OUTPUT_PREFIX}/{}-{}.{OUTPUT_EXTENSION}",
        completed_at.format(OUTPUT_TIMESTAMP_FORMAT),
        file_stem(file_name),
    )
}

pub fn local_output_file_name(file_name: &str) -> String {
    format!("{}_out.{OUTPUT_EXTENSION}", file_stem(file_name))
}
