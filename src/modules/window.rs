use std::collections::BTreeMap;

use crate::models::MetricPoint;

/// Trailing windows the UI displays over the day series.
pub const DEFAULT_WINDOW_SIZES: [usize; 3] = [7, 28, 90];

/// Slice the day-granularity series into trailing windows, keyed
/// `last{N}Days`. A series shorter than N yields a shorter slice; no
/// padding, no recomputation.
pub fn assemble_windows(
    day_series: &[MetricPoint],
    sizes: &[usize],
) -> BTreeMap<String, Vec<MetricPoint>> {
    let mut windows = BTreeMap::new();

    for &size in sizes {
        let start = day_series.len().saturating_sub(size);
        windows.insert(format!("last{}Days", size), day_series[start..].to_vec());
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<MetricPoint> {
        (0..n)
            .map(|i| MetricPoint {
                period_label: format!("2024-03-{:02}", i + 1),
                engagement_rate: i as f64,
                like_to_view_ratio: 0.0,
                comment_rate: 0.0,
                estimated_earnings: 0.0,
            })
            .collect()
    }

    #[test]
    fn window_length_is_min_of_size_and_series() {
        let day_series = series(10);
        let windows = assemble_windows(&day_series, &[7, 28]);
        assert_eq!(windows["last7Days"].len(), 7);
        assert_eq!(windows["last28Days"].len(), 10);
    }

    #[test]
    fn windows_keep_chronological_order_and_the_last_entry() {
        let day_series = series(10);
        let windows = assemble_windows(&day_series, &[7]);

        let window = &windows["last7Days"];
        assert_eq!(window.first().unwrap().period_label, "2024-03-04");
        assert_eq!(
            window.last().unwrap(),
            day_series.last().unwrap()
        );
    }

    #[test]
    fn empty_series_yields_empty_windows() {
        let windows = assemble_windows(&[], &[7, 28, 90]);
        assert_eq!(windows.len(), 3);
        assert!(windows.values().all(|w| w.is_empty()));
    }
}
