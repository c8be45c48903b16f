use chrono::{TimeZone, Utc};
use ml_inference_core::contract::DEFAULT_TOP_K;
use ml_inference_core::ranking::{softmax, top_k};
use ml_inference_core::record::render_output_record;
use ml_inference_core::storage_keys::{output_object_key, OUTPUT_TIMESTAMP_FORMAT};

fn vocabulary(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| format!("n{index:08} class {index}"))
        .collect()
}

fn synthetic_logits(count: usize) -> Vec<f32> {
    (0..count)
        .map(|index| ((index * 7919) % 1000) as f32 / 97.0)
        .collect()
}

#[test]
fn top_five_record_matches_published_shape() {
    let labels = vocabulary(1000);
    let probabilities = softmax(&synthetic_logits(1000));
    let predictions = top_k(&probabilities, &labels, DEFAULT_TOP_K);

    let record = render_output_record("cat.jpg", &predictions).expect("record should render");
    let lines: Vec<&str> = record.split('\n').collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "InputFile,Probability,Label");

    let mut previous = f32::INFINITY;
    for line in &lines[1..] {
        let mut fields = line.splitn(3, ',');
        assert_eq!(fields.next(), Some("cat.jpg"));
        let probability_text = fields.next().expect("probability column");
        let label = fields.next().expect("label column");

        assert_eq!(probability_text.split_once('.').map(|(_, d)| d.len()), Some(2));
        assert!(labels.iter().any(|known| known == label));

        let probability: f32 = probability_text.parse().expect("probability parses");
        assert!(probability <= previous);
        previous = probability;
    }
}

#[test]
fn top_five_probabilities_are_bounded() {
    let labels = vocabulary(1000);
    let probabilities = softmax(&synthetic_logits(1000));
    let predictions = top_k(&probabilities, &labels, DEFAULT_TOP_K);

    let total: f32 = predictions.iter().map(|entry| entry.probability).sum();
    assert!(total <= 1.0 + f32::EPSILON);
    assert!(predictions.iter().all(|entry| entry.probability >= 0.0));
}

#[test]
fn output_key_starts_with_parseable_timestamp() {
    let completed_at = Utc
        .with_ymd_and_hms(2026, 12, 31, 23, 59, 58)
        .single()
        .expect("valid timestamp")
        + chrono::Duration::milliseconds(999);
    let key = output_object_key(completed_at, "holiday.photo.jpeg");

    let name = key.strip_prefix("output/").expect("output prefix");
    assert!(name.ends_with("-holiday.csv"));

    let timestamp = &name[.."MM-DD-YYYY-HH:MM:SS.mmm".len()];
    let parsed = chrono::NaiveDateTime::parse_from_str(timestamp, OUTPUT_TIMESTAMP_FORMAT)
        .expect("timestamp should parse back");
    assert_eq!(parsed, completed_at.naive_utc());
}
