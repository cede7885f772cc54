use chrono::Timelike;
use std::collections::VecDeque;

/// Number of samples each chart keeps unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 30;

/// Rolling window of `N` parallel series sharing one label sequence.
///
/// `N = 1` backs the single-line charts (CPU, GPU, memory); `N = 2` backs the
/// download/upload network chart.  Every append pushes one label and one value
/// per series in lock-step, and once the window is full exactly one sample,
/// the oldest, is evicted.
#[derive(Debug, Clone)]
pub struct RollingSeries<const N: usize> {
    capacity: usize,
    labels:   VecDeque<String>,
    series:   [VecDeque<f64>; N],
}

pub type SingleSeries = RollingSeries<1>;
pub type DualSeries = RollingSeries<2>;

impl<const N: usize> RollingSeries<N> {
    /// Create an empty window.  A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity + 1),
            series: std::array::from_fn(|_| VecDeque::with_capacity(capacity + 1)),
        }
    }

    /// Push a new sample, evicting the oldest if the window overflows.
    pub fn append(&mut self, label: impl Into<String>, values: [f64; N]) {
        self.labels.push_back(label.into());
        for (series, value) in self.series.iter_mut().zip(values) {
            series.push_back(value);
        }

        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            for series in &mut self.series {
                series.pop_front();
            }
        }
    }

    /// Copy of the current window, oldest sample first.
    pub fn snapshot(&self) -> SeriesSnapshot<N> {
        SeriesSnapshot {
            labels: self.labels.iter().cloned().collect(),
            series: std::array::from_fn(|i| self.series[i].iter().copied().collect()),
        }
    }

    /// Values of the most recent sample.
    pub fn latest(&self) -> Option<[f64; N]> {
        if self.labels.is_empty() {
            return None;
        }
        Some(std::array::from_fn(|i| self.series[i][self.series[i].len() - 1]))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Point-in-time copy of a [`RollingSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot<const N: usize> {
    pub labels: Vec<String>,
    pub series: [Vec<f64>; N],
}

/// Display label for a sample taken at `time`: unpadded `minute:second`.
///
/// Labels are cosmetic and may repeat across hours; nothing keys on them.
pub fn time_label(time: &impl Timelike) -> String {
    format!("{}:{}", time.minute(), time.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn evicts_oldest_once_full() {
        let mut buf = SingleSeries::new(3);
        buf.append("t1", [10.0]);
        buf.append("t2", [20.0]);
        buf.append("t3", [30.0]);
        buf.append("t4", [40.0]);

        let snap = buf.snapshot();
        assert_eq!(snap.series[0], vec![20.0, 30.0, 40.0]);
        assert_eq!(snap.labels, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn dual_series_stay_in_lock_step() {
        let mut buf = DualSeries::new(2);
        buf.append("t1", [5.0, 1.0]);
        buf.append("t2", [6.0, 2.0]);

        let snap = buf.snapshot();
        assert_eq!(snap.series[0], vec![5.0, 6.0]);
        assert_eq!(snap.series[1], vec![1.0, 2.0]);
        assert_eq!(snap.labels, vec!["t1", "t2"]);
    }

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        for capacity in 1..6 {
            let mut buf = DualSeries::new(capacity);
            for n in 1..=15 {
                buf.append(format!("t{n}"), [n as f64, -(n as f64)]);
                let snap = buf.snapshot();
                assert_eq!(buf.len(), n.min(capacity));
                assert_eq!(snap.labels.len(), snap.series[0].len());
                assert_eq!(snap.labels.len(), snap.series[1].len());
            }
        }
    }

    #[test]
    fn window_holds_the_newest_samples_in_order() {
        let mut buf = SingleSeries::new(4);
        for n in 0usize..11 {
            buf.append(n.to_string(), [n as f64]);
            let values = &buf.snapshot().series[0];
            let first = n.saturating_sub(3) as f64;
            let expected: Vec<f64> = (0..values.len()).map(|i| first + i as f64).collect();
            assert_eq!(values, &expected);
            assert_eq!(*values.last().unwrap(), n as f64);
        }
    }

    #[test]
    fn snapshot_is_repeatable() {
        let mut buf = SingleSeries::new(3);
        buf.append("a", [1.0]);
        buf.append("b", [2.0]);
        assert_eq!(buf.snapshot(), buf.snapshot());
    }

    #[test]
    fn duplicate_labels_are_kept() {
        let mut buf = SingleSeries::new(3);
        buf.append("5:7", [1.0]);
        buf.append("5:7", [2.0]);
        assert_eq!(buf.snapshot().labels, vec!["5:7", "5:7"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buf = SingleSeries::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.append("a", [1.0]);
        buf.append("b", [2.0]);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.latest(), Some([2.0]));
    }

    #[test]
    fn empty_buffer_has_no_latest() {
        let buf = DualSeries::new(5);
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);
    }

    #[test]
    fn time_label_is_unpadded() {
        let t = NaiveTime::from_hms_opt(14, 7, 5).unwrap();
        assert_eq!(time_label(&t), "7:5");
        let t = NaiveTime::from_hms_opt(9, 42, 30).unwrap();
        assert_eq!(time_label(&t), "42:30");
    }
}
