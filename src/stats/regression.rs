//! Least-squares trend line over match results

use serde::Serialize;

use super::oldest_first;
use crate::MatchRecord;

/// Fitted line y = intercept + slope * x over games numbered 1..=n
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted value at the first game
    pub start_y: f64,
    /// Fitted value at the last game
    pub end_y: f64,
    pub n: usize,
}

impl RegressionLine {
    /// Fitted value at game `x` (1-based)
    pub fn value_at(&self, x: usize) -> f64 {
        self.intercept + self.slope * x as f64
    }

    /// Fitted value for every game, oldest first
    pub fn points(&self) -> Vec<f64> {
        (1..=self.n).map(|x| self.value_at(x)).collect()
    }
}

/// Fit wins (+1) and non-wins (-1) against game order; `None` for fewer than two games
pub fn linear_regression(records: &[MatchRecord]) -> Option<RegressionLine> {
    if records.len() < 2 {
        return None;
    }

    let sorted = oldest_first(records);
    let n = sorted.len() as f64;

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, record) in sorted.iter().enumerate() {
        let x = (i + 1) as f64;
        let y = if record.is_win() { 1.0 } else { -1.0 };
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    // x is always 1..n, so the denominator is positive for n >= 2
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    Some(RegressionLine {
        slope,
        intercept,
        start_y: intercept + slope,
        end_y: intercept + slope * n,
        n: sorted.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::sequence;
    use crate::MatchResult::*;

    #[test]
    fn test_too_few_records() {
        assert_eq!(linear_regression(&[]), None);
        assert_eq!(linear_regression(&sequence(&[Win])), None);
    }

    #[test]
    fn test_two_wins_is_flat() {
        let line = linear_regression(&sequence(&[Win, Win])).unwrap();
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 1.0);
        assert_eq!(line.start_y, 1.0);
        assert_eq!(line.end_y, 1.0);
        assert_eq!(line.n, 2);
    }

    #[test]
    fn test_loss_then_win() {
        let line = linear_regression(&sequence(&[Loss, Win])).unwrap();
        assert_eq!(line.slope, 2.0);
        assert_eq!(line.intercept, -3.0);
        assert_eq!(line.start_y, -1.0);
        assert_eq!(line.end_y, 1.0);
    }

    #[test]
    fn test_draw_counts_as_non_win() {
        let with_draw = linear_regression(&sequence(&[Win, Draw, Win])).unwrap();
        let with_loss = linear_regression(&sequence(&[Win, Loss, Win])).unwrap();
        assert_eq!(with_draw, with_loss);
        assert!(with_draw.slope.abs() < 1e-12);
    }

    #[test]
    fn test_improving_form_has_positive_slope() {
        let line = linear_regression(&sequence(&[Loss, Loss, Draw, Win, Win, Win])).unwrap();
        assert!(line.slope > 0.0);
        assert!(line.end_y > line.start_y);

        let points = line.points();
        assert_eq!(points.len(), 6);
        assert!((points[0] - line.start_y).abs() < 1e-12);
        assert!((points[5] - line.end_y).abs() < 1e-12);
    }

    #[test]
    fn test_sorts_by_date_first() {
        let mut records = sequence(&[Loss, Win]);
        records.reverse();
        let line = linear_regression(&records).unwrap();
        assert_eq!(line.slope, 2.0);
    }
}
