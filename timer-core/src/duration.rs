//! Countdown duration as edited before the countdown is configured.

/// Quick presets offered by the countdown screen, in minutes.
pub const PRESET_MINUTES: [u32; 6] = [1, 5, 15, 30, 45, 60];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DurationField {
    Hours,
    Minutes,
    Seconds,
}

impl DurationField {
    pub fn max(self) -> u32 {
        match self {
            DurationField::Hours => 23,
            DurationField::Minutes | DurationField::Seconds => 59,
        }
    }

    pub fn next(self) -> Self {
        match self {
            DurationField::Hours => DurationField::Minutes,
            DurationField::Minutes => DurationField::Seconds,
            DurationField::Seconds => DurationField::Hours,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DurationField::Hours => DurationField::Seconds,
            DurationField::Minutes => DurationField::Hours,
            DurationField::Seconds => DurationField::Minutes,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationField::Hours => "Hours",
            DurationField::Minutes => "Minutes",
            DurationField::Seconds => "Seconds",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PendingDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for PendingDuration {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 5,
            seconds: 0,
        }
    }
}

impl PendingDuration {
    /// Out-of-range fields are clamped, not rejected.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours: hours.min(DurationField::Hours.max()),
            minutes: minutes.min(DurationField::Minutes.max()),
            seconds: seconds.min(DurationField::Seconds.max()),
        }
    }

    /// Preset in whole minutes, carrying full hours into the hours field.
    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes / 60, minutes % 60, 0)
    }

    pub fn get(&self, field: DurationField) -> u32 {
        match field {
            DurationField::Hours => self.hours,
            DurationField::Minutes => self.minutes,
            DurationField::Seconds => self.seconds,
        }
    }

    pub fn set(&mut self, field: DurationField, value: u32) {
        let value = value.min(field.max());
        match field {
            DurationField::Hours => self.hours = value,
            DurationField::Minutes => self.minutes = value,
            DurationField::Seconds => self.seconds = value,
        }
    }

    /// Step one field, wrapping at its modulus in both directions.
    pub fn adjust(&mut self, field: DurationField, delta: i32) {
        let modulus = field.max() as i64 + 1;
        let value = (self.get(field) as i64 + delta as i64).rem_euclid(modulus);
        self.set(field, value as u32);
    }

    pub fn total_ms(&self) -> u64 {
        self.hours as u64 * 3_600_000 + self.minutes as u64 * 60_000 + self.seconds as u64 * 1000
    }
}

/// Index into `PRESET_MINUTES` of the preset matching `pending`, if any.
pub fn preset_index(pending: &PendingDuration) -> Option<usize> {
    PRESET_MINUTES
        .iter()
        .position(|&m| PendingDuration::from_minutes(m) == *pending)
}

/// Coerce typed text into a field value. Anything that is not a plain
/// non-negative number gives 0; large numbers clamp to `max`.
pub fn parse_field(s: &str, max: u32) -> u32 {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    match s.parse::<u64>() {
        Ok(v) => v.min(max as u64) as u32,
        // Overflowing digit strings are still "too large".
        Err(_) => max,
    }
}
