//! Selección top-K sobre el vector de probabilidades del modelo.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    pub class_index: usize,
    pub score: f32,
}

/// Score descendente; en empate, índice ascendente.
fn by_rank(a: &RankedPrediction, b: &RankedPrediction) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.class_index.cmp(&b.class_index))
}

/// Devuelve los `k` índices con mayor score, ordenados de mayor a menor.
///
/// Se mantiene un conjunto de trabajo de como mucho `k` candidatos: cada
/// vez que lo supera se ordena y se descarta el último. Los empates se
/// resuelven siempre por índice ascendente, así que el resultado no depende
/// de la estabilidad del algoritmo de ordenación.
pub fn select_top_k(probabilities: &[f32], k: usize) -> Vec<RankedPrediction> {
    if k == 0 {
        return Vec::new();
    }

    let mut working: Vec<RankedPrediction> = Vec::with_capacity(k + 1);
    for (class_index, &score) in probabilities.iter().enumerate() {
        working.push(RankedPrediction { class_index, score });
        if working.len() > k {
            working.sort_unstable_by(by_rank);
            working.pop();
        }
    }

    working.sort_unstable_by(by_rank);
    working
}
