use crate::contract::Prediction;

/// Parses a label vocabulary, one label per line with trailing whitespace removed.
/// Line position is the class index, so only blank lines at the end are dropped.
pub fn parse_labels(text: &str) -> Vec<String> {
    let mut labels: Vec<String> = text
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    while labels.last().is_some_and(String::is_empty) {
        labels.pop();
    }
    labels
}

/// Numerically stable softmax over raw model scores. `NaN` scores get no
/// probability mass and `+inf` is treated as the largest finite score.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let scores: Vec<f32> = logits
        .iter()
        .map(|&value| {
            if value.is_nan() {
                f32::NEG_INFINITY
            } else {
                value.min(f32::MAX)
            }
        })
        .collect();
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![0.0; logits.len()];
    }

    let exps: Vec<f32> = scores.iter().map(|&value| (value - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|value| value / sum).collect()
}

/// Highest `k` probabilities, descending; ties keep vocabulary order.
pub fn top_k(probabilities: &[f32], labels: &[String], k: usize) -> Vec<Prediction> {
    let mut indices: Vec<usize> = (0..probabilities.len().min(labels.len())).collect();
    indices.sort_by(|&left, &right| {
        probabilities[right]
            .total_cmp(&probabilities[left])
            .then(left.cmp(&right))
    });

    indices
        .into_iter()
        .take(k)
        .map(|index| Prediction {
            label: labels[index].clone(),
            probability: probabilities[index],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("label-{index}")).collect()
    }

    #[test]
    fn parse_labels_strips_trailing_whitespace() {
        let parsed = parse_labels("n01440764 tench, Tinca tinca  \nn01443537 goldfish\r\n\n");
        assert_eq!(
            parsed,
            vec!["n01440764 tench, Tinca tinca", "n01443537 goldfish"]
        );
    }

    #[test]
    fn parse_labels_keeps_interior_positions() {
        let parsed = parse_labels("a\n\nc\n");
        assert_eq!(parsed, vec!["a", "", "c"]);
    }

    #[test]
    fn softmax_produces_distribution() {
        let probabilities = softmax(&[1.0, 2.0, 3.0, 1000.0]);
        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probabilities.iter().all(|value| (0.0..=1.0).contains(value)));
        assert!(probabilities[3] > 0.99);
    }

    #[test]
    fn softmax_of_non_finite_scores_is_zero() {
        assert_eq!(softmax(&[f32::NAN, f32::NAN]), vec![0.0, 0.0]);
    }

    #[test]
    fn softmax_gives_infinite_score_all_mass() {
        let probabilities = softmax(&[1.0, f32::INFINITY, 2.0, f32::NEG_INFINITY, f32::NAN]);
        assert_eq!(probabilities, vec![0.0, 1.0, 0.0, 0.0, 0.0]);

        let ranked = top_k(&probabilities, &labels(5), 3);
        assert_eq!(ranked[0].label, "label-1");
        assert!(ranked.iter().all(|entry| entry.probability.is_finite()));
    }

    #[test]
    fn top_k_orders_descending() {
        let probabilities = [0.05, 0.4, 0.1, 0.3, 0.02, 0.13];
        let ranked = top_k(&probabilities, &labels(6), 5);

        assert_eq!(ranked.len(), 5);
        let order: Vec<&str> = ranked.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(
            order,
            vec!["label-1", "label-3", "label-5", "label-2", "label-0"]
        );
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].probability >= pair[1].probability));
    }

    #[test]
    fn top_k_breaks_ties_by_vocabulary_order() {
        let ranked = top_k(&[0.25, 0.25, 0.5], &labels(3), 3);
        assert_eq!(ranked[1].label, "label-0");
        assert_eq!(ranked[2].label, "label-1");
    }

    #[test]
    fn top_k_is_bounded_by_vocabulary() {
        let ranked = top_k(&[0.6, 0.4], &labels(2), 5);
        assert_eq!(ranked.len(), 2);
    }
}
