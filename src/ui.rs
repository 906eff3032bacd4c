use std::fmt::Write;

use serde::{Deserialize, Serialize};
use timer_core::{
    format_hms, format_stopwatch, preset_index, DurationField, LapLabel, Mode, RunState,
    TimerEngine, PRESET_MINUTES,
};

use crate::countdown::CountdownEditor;
use crate::stopwatch::LapView;

const LAP_ROWS: usize = 8;
const BAR_WIDTH: usize = 30;
const FIELDS: [DurationField; 3] = [
    DurationField::Hours,
    DurationField::Minutes,
    DurationField::Seconds,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Single clock line with start/pause and reset.
    Plain,
    /// Full layout: mode tabs, progress, duration wheels and laps.
    #[default]
    Material,
}

/// Everything a renderer may look at for one frame.
pub struct View<'a> {
    pub engine: &'a TimerEngine,
    pub editor: &'a CountdownEditor,
    pub laps: &'a LapView,
    pub notice: Option<&'a str>,
    pub help_visible: bool,
    pub confirm_exit: bool,
}

pub trait Renderer {
    fn render(&self, view: &View<'_>) -> Vec<String>;
}

pub fn renderer_for(style: Style) -> Box<dyn Renderer> {
    match style {
        Style::Plain => Box::new(PlainRenderer),
        Style::Material => Box::new(MaterialRenderer),
    }
}

pub const HELP_TEXT: &str = "lapwatch help
space    start / pause / resume
enter    set countdown from the wheels, or start / pause
r        reset
l        record a lap
m        switch stopwatch / countdown
+        add one minute (while running)
p        next countdown preset
0-9      type into the selected wheel
arrows   select wheel / adjust it, or scroll laps
?        this help
q        quit";

/// Overlays shared by every style. Returns `None` when the normal screen
/// should be drawn.
fn render_overlay(view: &View<'_>) -> Option<Vec<String>> {
    if view.help_visible {
        let mut lines: Vec<String> = HELP_TEXT.lines().map(str::to_string).collect();
        lines.push(String::new());
        lines.push("Press any key to close".to_string());
        return Some(lines);
    }
    if view.confirm_exit {
        return Some(vec![
            "Timer Running".to_string(),
            String::new(),
            "A timer is still running.".to_string(),
            "Exit anyway?".to_string(),
            String::new(),
            "  y = Stop & exit".to_string(),
            "  any other key = Cancel".to_string(),
        ]);
    }
    None
}

fn start_label(engine: &TimerEngine) -> &'static str {
    match engine.run_state() {
        RunState::Running => "Pause",
        RunState::Paused => "Resume",
        RunState::Idle | RunState::Finished => "Start",
    }
}

pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Whole-second clock in the style of the basic widget.
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, view: &View<'_>) -> Vec<String> {
        if let Some(lines) = render_overlay(view) {
            return lines;
        }
        let engine = view.engine;
        let mut lines = vec![
            "Timer".to_string(),
            String::new(),
            format!("  {}", engine.formatted_time().main),
            String::new(),
            format!("[space] {}   [r] Reset", start_label(engine)),
        ];
        if let Some(notice) = view.notice {
            lines.push(notice.to_string());
        }
        lines
    }
}

pub struct MaterialRenderer;

impl MaterialRenderer {
    fn tabs(mode: Mode) -> String {
        match mode {
            Mode::Stopwatch => "[Stopwatch]  Countdown ".to_string(),
            Mode::Countdown => " Stopwatch  [Countdown]".to_string(),
        }
    }

    fn stopwatch(view: &View<'_>, lines: &mut Vec<String>) {
        let engine = view.engine;
        lines.push(format!("  {}", engine.formatted_time()));
        lines.push(format!("  {}", progress_bar(engine.second_fraction() * 100.0, BAR_WIDTH)));
        lines.push(String::new());
        lines.push(format!(
            "[r] Reset   [space] {}   [l] Lap",
            start_label(engine)
        ));

        let laps = engine.laps();
        if laps.is_empty() {
            return;
        }
        lines.push(String::new());
        let format = engine.config().stopwatch_format;
        for lap in view.laps.visible(laps, LAP_ROWS) {
            let label = match laps.label(lap) {
                LapLabel::Fastest => "Fastest".to_string(),
                LapLabel::Slowest => "Slowest".to_string(),
                LapLabel::Ordinal(n) => format!("Lap {}", n),
            };
            lines.push(format!(
                "  {:02}  {:<8}  {}",
                lap.index,
                label,
                format_stopwatch(lap.time_ms, format)
            ));
        }
        if laps.len() > LAP_ROWS {
            lines.push(format!("  ({} laps, up/down to scroll)", laps.len()));
        }
    }

    fn wheel_row(view: &View<'_>) -> String {
        let pending = view.engine.pending();
        let mut row = String::new();
        for field in FIELDS {
            let value = pending.get(field);
            let max = field.max();
            let prev = if value == 0 { max } else { value - 1 };
            let next = if value == max { 0 } else { value + 1 };
            let (open, close) = if field == view.editor.cursor {
                ('>', '<')
            } else {
                (' ', ' ')
            };
            write!(row, " {:02} {}{:02}{} {:02} |", prev, open, value, close, next).ok();
        }
        row
    }

    fn countdown(view: &View<'_>, lines: &mut Vec<String>) {
        let engine = view.engine;
        if !engine.is_configured() {
            lines.push("  Set duration".to_string());
            lines.push(Self::wheel_row(view));
            let labels: String = FIELDS
                .iter()
                .map(|f| format!(" {:^10} |", f.label()))
                .collect();
            lines.push(labels);
            let active = preset_index(engine.pending());
            let presets: Vec<String> = PRESET_MINUTES
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    if Some(i) == active {
                        format!("[{}min]", m)
                    } else {
                        format!(" {}min ", m)
                    }
                })
                .collect();
            lines.push(format!("  {}", presets.join(" ")));
            lines.push(String::new());
            lines.push("[enter] Set   [p] Preset".to_string());
            return;
        }

        lines.push(format!("  {}", engine.formatted_time()));
        lines.push(format!(
            "  of {}   {}",
            format_hms(engine.initial_duration_ms()),
            if engine.is_finished() { "Finished" } else { "" }
        ));
        lines.push(format!(
            "  {} {:.0}%",
            progress_bar(engine.progress_percent(), BAR_WIDTH),
            engine.progress_percent()
        ));
        lines.push(String::new());
        lines.push(format!(
            "[r] Reset   [space] {}   [+] 1 min",
            start_label(engine)
        ));
    }
}

impl Renderer for MaterialRenderer {
    fn render(&self, view: &View<'_>) -> Vec<String> {
        if let Some(lines) = render_overlay(view) {
            return lines;
        }
        let mut lines = vec![Self::tabs(view.engine.mode()), String::new()];
        match view.engine.mode() {
            Mode::Stopwatch => Self::stopwatch(view, &mut lines),
            Mode::Countdown => Self::countdown(view, &mut lines),
        }
        if let Some(notice) = view.notice {
            lines.push(String::new());
            lines.push(format!("** {} **", notice));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use timer_core::EngineConfig;

    use super::*;

    fn render(style: Style, engine: &TimerEngine) -> Vec<String> {
        let editor = CountdownEditor::new();
        let laps = LapView::new();
        let view = View {
            engine,
            editor: &editor,
            laps: &laps,
            notice: None,
            help_visible: false,
            confirm_exit: false,
        };
        renderer_for(style).render(&view)
    }

    fn contains(lines: &[String], needle: &str) -> bool {
        lines.iter().any(|l| l.contains(needle))
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[....]");
        assert_eq!(progress_bar(50.0, 4), "[##..]");
        assert_eq!(progress_bar(150.0, 4), "[####]");
    }

    #[test]
    fn test_plain_stopwatch() {
        let mut engine = TimerEngine::default();
        let lines = render(Style::Plain, &engine);
        assert!(contains(&lines, "00:00"));
        assert!(contains(&lines, "[space] Start"));

        engine.start();
        let lines = render(Style::Plain, &engine);
        assert!(contains(&lines, "[space] Pause"));
    }

    #[test]
    fn test_material_lap_labels() {
        let mut engine = TimerEngine::default();
        engine.start();
        for ms in [150, 100, 300] {
            for _ in 0..ms / 10 {
                engine.tick();
            }
            engine.add_lap();
        }
        let lines = render(Style::Material, &engine);
        assert!(contains(&lines, "Fastest"));
        assert!(contains(&lines, "Slowest"));
        assert!(contains(&lines, "Lap 2"));
        assert!(contains(&lines, "00:00.55"));
    }

    #[test]
    fn test_material_countdown_wheels() {
        let engine = TimerEngine::with_mode(EngineConfig::default(), Mode::Countdown);
        let lines = render(Style::Material, &engine);
        assert!(contains(&lines, ">05<"));
        assert!(contains(&lines, "[5min]"));
        assert!(contains(&lines, "[enter] Set"));
    }

    #[test]
    fn test_material_finished_countdown() {
        let mut engine = TimerEngine::with_mode(EngineConfig::default(), Mode::Countdown);
        engine.configure_countdown(0, 0, 1);
        engine.start();
        for _ in 0..100 {
            engine.tick();
        }
        let lines = render(Style::Material, &engine);
        assert!(contains(&lines, "00:00:00"));
        assert!(contains(&lines, "of 00:00:01"));
        assert!(contains(&lines, "Finished"));
        assert!(contains(&lines, "100%"));
    }

    #[test]
    fn test_overlays_take_precedence() {
        let engine = TimerEngine::default();
        let editor = CountdownEditor::new();
        let laps = LapView::new();
        let view = View {
            engine: &engine,
            editor: &editor,
            laps: &laps,
            notice: None,
            help_visible: false,
            confirm_exit: true,
        };
        let lines = PlainRenderer.render(&view);
        assert_eq!(lines[0], "Timer Running");
    }
}
