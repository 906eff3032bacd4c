use std::fmt;

use crate::config::StopwatchFormat;

/// Format milliseconds as "HH:MM:SS"
pub fn format_hms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format milliseconds as "MM:SS"; minutes are not capped at 59.
pub fn format_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}", m, s)
}

/// Centiseconds within the current second.
pub fn centis(ms: u64) -> u64 {
    (ms % 1000) / 10
}

/// A display string split the way the widget shows it: the main clock and,
/// for the stopwatch, a smaller centiseconds part.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FormattedTime {
    pub main: String,
    pub centis: Option<String>,
}

impl fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.centis {
            Some(cs) => write!(f, "{}.{}", self.main, cs),
            None => f.write_str(&self.main),
        }
    }
}

pub fn format_stopwatch(ms: u64, format: StopwatchFormat) -> FormattedTime {
    let main = match format {
        StopwatchFormat::PromoteHours if ms >= 3_600_000 => format_hms(ms),
        _ => format_ms(ms),
    };
    FormattedTime {
        main,
        centis: Some(format!("{:02}", centis(ms))),
    }
}

pub fn format_countdown(ms: u64) -> FormattedTime {
    FormattedTime {
        main: format_hms(ms),
        centis: None,
    }
}
