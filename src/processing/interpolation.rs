use crate::error::{AnalyticsError, AnalyticsResult};
use crate::state::sample_series::SampleSeries;

/// Give every position of `series` a concrete height.
///
/// With `interpolate` set, an absent sample takes the value on the straight
/// line between its nearest present neighbours, or the single neighbour's
/// value at either end of the series. Without it, absent samples are 0.
pub fn resolve_heights(series: &SampleSeries, interpolate: bool) -> AnalyticsResult<Vec<f64>> {
    let points = series.present_points();
    if points.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }

    if !interpolate {
        return Ok(series.samples().iter().map(|s| s.unwrap_or(0.0)).collect());
    }

    let heights = series
        .samples()
        .iter()
        .enumerate()
        .map(|(i, sample)| match sample {
            Some(v) => *v,
            None => interpolate_at(&points, i),
        })
        .collect();
    Ok(heights)
}

/// `points` is sorted by index and non-empty.
fn interpolate_at(points: &[(usize, f64)], index: usize) -> f64 {
    let pos = points.partition_point(|&(i, _)| i < index);

    let left = pos.checked_sub(1).map(|p| points[p]);
    let right = points.get(pos).copied();

    match (left, right) {
        (Some((li, lv)), Some((ri, rv))) => {
            let t = (index - li) as f64 / (ri - li) as f64;
            lv + (rv - lv) * t
        }
        (Some((_, v)), None) | (None, Some((_, v))) => v,
        (None, None) => 0.0,
    }
}
