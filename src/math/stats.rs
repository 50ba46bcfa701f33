//! Population statistics over score slices.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`), `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// `None` when fewer than two observations exist or `actual` has no variance.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() < 2 || actual.len() != predicted.len() {
        return None;
    }
    let m = mean(actual)?;
    let ss_tot: f64 = actual.iter().map(|y| (y - m) * (y - m)).sum();
    if ss_tot <= f64::EPSILON {
        return None;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p) * (y - p))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_dev_is_population_form() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v).unwrap() - 5.0).abs() < 1e-12);
        assert!((std_dev(&v).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_slices_have_no_stats() {
        assert!(mean(&[]).is_none());
        assert!(std_dev(&[]).is_none());
    }

    #[test]
    fn r_squared_perfect_and_undefined() {
        let y = [1.0, 2.0, 3.0];
        assert!((r_squared(&y, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!(r_squared(&[1.0], &[1.0]).is_none());
        assert!(r_squared(&[4.0, 4.0], &[3.0, 5.0]).is_none());
    }
}
