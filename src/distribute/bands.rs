//! Quantile banding of predicted scores.
//!
//! Each student is labelled with one of up to five bands (`E` lowest .. `A`
//! highest) by the quantile of their score within the roster. Fewer than five
//! students means fewer bands. Tied scores always share a band.
//!
//! The label is an annotation only. The engine shuffles the whole roster and
//! never orders placement by band; doing so would change which assignment a
//! given seed produces.

use crate::domain::{Band, Student};

/// Number of bands used for a roster of `n` students.
pub fn band_count(n: usize) -> usize {
    n.min(Band::ALL.len())
}

/// Label every student with their quantile band.
pub fn assign_bands(students: &mut [Student]) {
    let n = students.len();
    let q = band_count(n);
    if q == 0 {
        return;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        students[a]
            .predicted_score
            .total_cmp(&students[b].predicted_score)
    });

    let mut tie_start = 0usize;
    for (rank, &idx) in order.iter().enumerate() {
        if rank > 0 {
            let prev = students[order[rank - 1]].predicted_score;
            if students[idx].predicted_score.total_cmp(&prev).is_ne() {
                tie_start = rank;
            }
        }
        let band_idx = (tie_start * q / n).min(q - 1);
        students[idx].band = Band::from_index(band_idx);
    }
}
