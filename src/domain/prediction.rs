use serde::{Deserialize, Serialize};

use super::errors::DomainResult;
use super::labels::ClassNames;
use super::ranking::RankedPrediction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPrediction {
    pub rank: usize,
    pub class_index: usize,
    pub label: String,
    pub score: f32,
    pub percent: u8,
}

/// Resultado de una petición de predicción, listo para la superficie de
/// visualización.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFrame {
    pub request_id: u64,
    pub entries: Vec<LabeledPrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsPredictionMessage {
    pub r#type: String,
    pub frame: PredictionFrame,
}

/// Porcentaje entero que se muestra en la tabla: `round(score * 100)`.
pub fn percent_of(score: f32) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

impl PredictionFrame {
    pub fn build(
        request_id: u64,
        ranked: &[RankedPrediction],
        names: &ClassNames,
    ) -> DomainResult<Self> {
        let indices: Vec<usize> = ranked.iter().map(|r| r.class_index).collect();
        let labels = names.names_for(&indices)?;
        let entries = ranked
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(rank, (r, label))| LabeledPrediction {
                rank: rank + 1,
                class_index: r.class_index,
                label,
                score: r.score,
                percent: percent_of(r.score),
            })
            .collect();
        Ok(Self { request_id, entries })
    }
}

pub fn summarize_predictions(frame: &PredictionFrame) -> String {
    frame
        .entries
        .iter()
        .map(|e| format!("{} {}%", e.label, e.percent))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    #[test]
    fn percent_is_rounded_and_clamped() {
        assert_eq!(percent_of(0.0), 0);
        assert_eq!(percent_of(0.125), 13);
        assert_eq!(percent_of(0.994), 99);
        assert_eq!(percent_of(1.0), 100);
        assert_eq!(percent_of(1.2), 100);
        assert_eq!(percent_of(-0.1), 0);
    }

    #[test]
    fn frame_labels_entries_in_rank_order() {
        let names = ClassNames::parse("cat\ndog\nsun\n").unwrap();
        let ranked = [
            RankedPrediction { class_index: 2, score: 0.6 },
            RankedPrediction { class_index: 0, score: 0.3 },
        ];
        let frame = PredictionFrame::build(7, &ranked, &names).unwrap();
        assert_eq!(frame.request_id, 7);
        assert_eq!(frame.entries[0].label, "sun");
        assert_eq!(frame.entries[0].rank, 1);
        assert_eq!(frame.entries[1].percent, 30);
        assert_eq!(summarize_predictions(&frame), "sun 60%, cat 30%");
    }

    #[test]
    fn unknown_class_index_fails_the_frame() {
        let names = ClassNames::parse("cat\n").unwrap();
        let ranked = [RankedPrediction { class_index: 4, score: 0.9 }];
        assert!(matches!(
            PredictionFrame::build(1, &ranked, &names),
            Err(DomainError::IndexOutOfRange { index: 4, len: 1 })
        ));
    }
}
