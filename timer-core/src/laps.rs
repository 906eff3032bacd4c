//! Append-only lap list with fastest/slowest statistics.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    /// 1-based position in the list.
    pub index: usize,
    pub time_ms: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LapLabel {
    Fastest,
    Slowest,
    Ordinal(usize),
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Laps {
    laps: Vec<Lap>,
}

impl Laps {
    pub fn new() -> Self {
        Self { laps: Vec::new() }
    }

    pub fn push(&mut self, time_ms: u64) -> Lap {
        let lap = Lap {
            index: self.laps.len() + 1,
            time_ms,
        };
        self.laps.push(lap);
        lap
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lap> {
        self.laps.iter()
    }

    pub fn as_slice(&self) -> &[Lap] {
        &self.laps
    }

    pub fn fastest(&self) -> Option<u64> {
        if self.laps.len() < 2 {
            return None;
        }
        self.laps.iter().map(|l| l.time_ms).min()
    }

    pub fn slowest(&self) -> Option<u64> {
        if self.laps.len() < 2 {
            return None;
        }
        self.laps.iter().map(|l| l.time_ms).max()
    }

    /// Labels follow the lap's time, so tied laps share a label.
    pub fn label(&self, lap: &Lap) -> LapLabel {
        if self.fastest() == Some(lap.time_ms) {
            LapLabel::Fastest
        } else if self.slowest() == Some(lap.time_ms) {
            LapLabel::Slowest
        } else {
            LapLabel::Ordinal(lap.index)
        }
    }
}

impl<'a> IntoIterator for &'a Laps {
    type Item = &'a Lap;
    type IntoIter = std::slice::Iter<'a, Lap>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps_of(times: &[u64]) -> Laps {
        let mut laps = Laps::new();
        for &t in times {
            laps.push(t);
        }
        laps
    }

    #[test]
    fn test_indices_contiguous() {
        let laps = laps_of(&[1500, 2500, 4500]);
        let idx: Vec<usize> = laps.iter().map(|l| l.index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
        assert_eq!(laps.fastest(), Some(1500));
        assert_eq!(laps.slowest(), Some(4500));
    }

    #[test]
    fn test_single_lap_has_no_stats() {
        let laps = laps_of(&[800]);
        assert_eq!(laps.fastest(), None);
        assert_eq!(laps.slowest(), None);
        assert_eq!(laps.label(&laps.as_slice()[0]), LapLabel::Ordinal(1));
    }

    #[test]
    fn test_labels_and_ties() {
        let laps = laps_of(&[2000, 1000, 3000, 1000, 3000, 2500]);
        let labels: Vec<LapLabel> = laps.iter().map(|l| laps.label(l)).collect();
        assert_eq!(
            labels,
            vec![
                LapLabel::Ordinal(1),
                LapLabel::Fastest,
                LapLabel::Slowest,
                LapLabel::Fastest,
                LapLabel::Slowest,
                LapLabel::Ordinal(6),
            ]
        );
    }

    #[test]
    fn test_all_equal_are_fastest() {
        let laps = laps_of(&[500, 500]);
        assert!(laps.iter().all(|l| laps.label(l) == LapLabel::Fastest));
    }

    #[test]
    fn test_clear_restarts_indices() {
        let mut laps = laps_of(&[10, 20, 30]);
        laps.clear();
        assert!(laps.is_empty());
        assert_eq!(laps.push(10).index, 1);
    }
}
