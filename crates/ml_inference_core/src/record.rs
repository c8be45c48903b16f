//! Text encodings of a classification result.
//!
//! The batch pipeline persists a small comma-separated table; the real-time
//! handler answers with a one-line sentence per prediction. Neither format
//! quotes or escapes its fields, so labels containing commas are written as-is.

use crate::contract::Prediction;

pub const OUTPUT_RECORD_HEADER: [&str; 3] = ["InputFile", "Probability", "Label"];

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to encode output record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush output record: {0}")]
    Flush(String),
    #[error("output record is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders the header plus one row per prediction, rows joined by `\n` with
/// no trailing newline.
pub fn render_output_record(
    file_name: &str,
    predictions: &[Prediction],
) -> Result<String, RecordError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_RECORD_HEADER)?;
    for prediction in predictions {
        let probability = format!("{:.2}", prediction.probability);
        writer.write_record([file_name, probability.as_str(), prediction.label.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| RecordError::Flush(error.to_string()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Header-only record written when classification produced nothing.
pub fn empty_output_record() -> String {
    OUTPUT_RECORD_HEADER.join(",")
}

pub fn describe_predictions(predictions: &[Prediction]) -> String {
    predictions
        .iter()
        .map(|prediction| {
            format!(
                "With prob = {:.5}, it contains {}. ",
                prediction.probability, prediction.label
            )
        })
        .collect()
}
