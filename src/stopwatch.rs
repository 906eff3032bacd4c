use timer_core::{Lap, Laps};

/// Scroll position of the lap list. Newest laps are shown first.
pub struct LapView {
    pub scroll_offset: usize,
}

impl LapView {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, lap_count: usize, rows: usize) {
        if self.scroll_offset + rows < lap_count {
            self.scroll_offset += 1;
        }
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn visible<'a>(&self, laps: &'a Laps, rows: usize) -> impl Iterator<Item = &'a Lap> {
        let offset = self.scroll_offset.min(laps.len().saturating_sub(rows));
        laps.as_slice().iter().rev().skip(offset).take(rows)
    }
}
