mod alerts;
mod countdown;
mod pump;
mod stopwatch;
mod storage;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use simplelog::{Config, WriteLogger};
use timer_core::{
    preset_index, EngineConfig, Granularity, Mode, ResetPolicy, Scheduler, StopwatchFormat,
    TimerEngine, PRESET_MINUTES,
};

use crate::alerts::fire_alert;
use crate::countdown::CountdownEditor;
use crate::pump::PumpHandle;
use crate::stopwatch::LapView;
use crate::storage::{Settings, SettingsStore};
use crate::ui::{Renderer, Style, View};

const APP_NAME: &str = "lapwatch";
const LAP_SCROLL_ROWS: usize = 8;

#[derive(Debug)]
pub enum AppOp {
    Redraw,
    Key(KeyEvent),
    Pump,
    Quit,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum GranularityArg {
    Centis,
    Seconds,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ResetArg {
    Restore,
    Clear,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModeArg {
    Stopwatch,
    Countdown,
}

#[derive(Parser, Debug)]
#[command(name = APP_NAME, version, about = "Stopwatch and countdown timer with laps")]
struct Cli {
    /// Settings file (JSON). Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    style: Option<Style>,

    /// Tick size: 10 ms with centiseconds, or whole seconds.
    #[arg(long, value_enum)]
    granularity: Option<GranularityArg>,

    /// Countdown reset: restore the configured duration or clear it.
    #[arg(long, value_enum)]
    reset: Option<ResetArg>,

    /// Show the stopwatch as HH:MM:SS once an hour has passed.
    #[arg(long)]
    hours: bool,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    save: bool,

    #[arg(long, default_value = "lapwatch.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(style) = self.style {
            settings.style = style;
        }
        if let Some(g) = self.granularity {
            settings.engine.granularity = match g {
                GranularityArg::Centis => Granularity::Centiseconds,
                GranularityArg::Seconds => Granularity::Seconds,
            };
        }
        if let Some(r) = self.reset {
            settings.engine.reset_policy = match r {
                ResetArg::Restore => ResetPolicy::RestoreConfigured,
                ResetArg::Clear => ResetPolicy::Clear,
            };
        }
        if self.hours {
            settings.engine.stopwatch_format = StopwatchFormat::PromoteHours;
        }
        if let Some(m) = self.mode {
            settings.start_mode = match m {
                ModeArg::Stopwatch => Mode::Stopwatch,
                ModeArg::Countdown => Mode::Countdown,
            };
        }
    }
}

struct LapwatchApp {
    engine: TimerEngine,
    settings: Settings,
    renderer: Box<dyn Renderer>,
    editor: CountdownEditor,
    lap_view: LapView,
    notice: Option<String>,
    ring_bell: bool,
    help_visible: bool,
    confirm_exit: bool,
    quit: bool,
}

impl LapwatchApp {
    fn new(settings: Settings, scheduler: Box<dyn Scheduler>) -> Self {
        let config: EngineConfig = settings.engine;
        let mut engine = TimerEngine::with_mode(config, settings.start_mode);
        engine.attach_scheduler(scheduler);
        Self {
            engine,
            renderer: ui::renderer_for(settings.style),
            settings,
            editor: CountdownEditor::new(),
            lap_view: LapView::new(),
            notice: None,
            ring_bell: false,
            help_visible: false,
            confirm_exit: false,
            quit: false,
        }
    }

    fn redraw<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let view = View {
            engine: &self.engine,
            editor: &self.editor,
            laps: &self.lap_view,
            notice: self.notice.as_deref(),
            help_visible: self.help_visible,
            confirm_exit: self.confirm_exit,
        };
        let lines = self.renderer.render(&view);

        queue!(out, MoveTo(0, 0))?;
        for line in &lines {
            queue!(out, Print(line), Clear(ClearType::UntilNewLine), MoveToNextLine(1))?;
        }
        queue!(out, Clear(ClearType::FromCursorDown))?;
        if self.ring_bell {
            self.ring_bell = false;
            queue!(out, Print('\u{7}'))?;
        }
        out.flush()
    }

    fn handle_pump(&mut self) {
        let was_running = self.engine.state().running;
        self.engine.tick();
        if was_running && self.engine.is_finished() {
            let alert = fire_alert(&self.settings.alerts, "Countdown finished");
            self.ring_bell = alert.bell;
            self.notice = alert.notice;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            return;
        }
        if self.confirm_exit {
            match key.code {
                KeyCode::Char('y') => self.quit = true,
                _ => self.confirm_exit = false,
            }
            return;
        }

        self.notice = None;
        let editing = self.engine.mode() == Mode::Countdown && !self.engine.is_configured();

        match key.code {
            KeyCode::Char('?') => self.help_visible = true,
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.engine.is_ticking() {
                    self.confirm_exit = true;
                } else {
                    self.quit = true;
                }
            }
            KeyCode::Char(' ') => self.engine.toggle_run_pause(),
            KeyCode::Enter => {
                if editing {
                    self.engine.configure_from_pending();
                    self.editor.clear_typed();
                } else {
                    self.engine.toggle_run_pause();
                }
            }
            KeyCode::Char('r') => {
                self.engine.reset();
                self.lap_view.reset();
                self.editor.clear_typed();
            }
            KeyCode::Char('l') => self.engine.add_lap(),
            KeyCode::Char('m') => {
                self.engine.set_mode(self.engine.mode().toggled());
                self.editor.clear_typed();
            }
            KeyCode::Char('+') => self.engine.add_minute(),
            KeyCode::Char('p') if editing => {
                let next = match preset_index(self.engine.pending()) {
                    Some(i) => (i + 1) % PRESET_MINUTES.len(),
                    None => 0,
                };
                self.engine.apply_preset(PRESET_MINUTES[next]);
                self.editor.clear_typed();
            }
            KeyCode::Char(c) if editing && c.is_ascii_digit() => {
                let updated = self.editor.type_char(c, self.engine.pending());
                self.engine.set_pending(updated);
            }
            KeyCode::Left if editing => self.editor.move_left(),
            KeyCode::Right if editing => self.editor.move_right(),
            KeyCode::Up if editing => {
                self.editor.clear_typed();
                self.engine.adjust_pending_field(self.editor.cursor, 1);
            }
            KeyCode::Down if editing => {
                self.editor.clear_typed();
                self.engine.adjust_pending_field(self.editor.cursor, -1);
            }
            KeyCode::Up => self.lap_view.scroll_up(),
            KeyCode::Down => self
                .lap_view
                .scroll_down(self.engine.laps().len(), LAP_SCROLL_ROWS),
            _ => {}
        }
    }
}

fn spawn_key_reader(tx: Sender<AppOp>) {
    std::thread::spawn(move || loop {
        let op = match event::read() {
            Ok(Event::Key(key)) => AppOp::Key(key),
            Ok(Event::Resize(_, _)) => AppOp::Redraw,
            Ok(_) => continue,
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                AppOp::Quit
            }
        };
        let quit = matches!(op, AppOp::Quit);
        if tx.send(op).is_err() || quit {
            break;
        }
    });
}

fn run<W: Write>(app: &mut LapwatchApp, rx: &Receiver<AppOp>, out: &mut W) -> io::Result<()> {
    app.redraw(out)?;
    loop {
        match rx.recv() {
            Ok(AppOp::Key(key)) => app.handle_key(key),
            Ok(AppOp::Pump) => app.handle_pump(),
            Ok(AppOp::Redraw) => {}
            Ok(AppOp::Quit) | Err(_) => break,
        }
        if app.quit {
            break;
        }
        app.redraw(out)?;
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let file = File::create(&cli.log_file)?;
    WriteLogger::init(cli.log_level, Config::default(), file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let store = match &cli.config {
        Some(path) => SettingsStore::with_path(path),
        None => SettingsStore::new(),
    };
    let mut settings = store.load();
    cli.apply(&mut settings);
    log::info!(
        "{} starting: style {:?}, mode {:?}, tick {} ms",
        APP_NAME,
        settings.style,
        settings.start_mode,
        settings.engine.interval_ms()
    );
    if cli.save {
        match store.save(&settings) {
            Ok(()) => log::info!("settings saved to {}", store.path().display()),
            Err(e) => log::error!("Failed to save settings: {}", e),
        }
    }

    let (tx, rx) = mpsc::channel();
    let pump = PumpHandle::spawn(tx.clone());
    spawn_key_reader(tx);

    let mut app = LapwatchApp::new(settings, Box::new(pump.scheduler()));

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run(&mut app, &rx, &mut stdout);

    execute!(stdout, Show, LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();

    // Dropping the app cancels the engine's pump before the thread quits.
    drop(app);
    pump.shutdown();
    log::info!("{} exiting", APP_NAME);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullScheduler;

    impl Scheduler for NullScheduler {
        fn arm(&mut self, _interval_ms: u64) {}
        fn cancel(&mut self) {}
    }

    fn app_with(settings: Settings) -> LapwatchApp {
        LapwatchApp::new(settings, Box::new(NullScheduler))
    }

    fn press(app: &mut LapwatchApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_space_toggles_and_lap_records() {
        let mut app = app_with(Settings::default());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.engine.is_ticking());
        for _ in 0..50 {
            app.handle_pump();
        }
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.engine.laps().len(), 1);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.engine.is_ticking());
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.engine.elapsed_ms(), 0);
        assert!(app.engine.laps().is_empty());
    }

    #[test]
    fn test_countdown_editing_and_finish_alert() {
        let settings = Settings {
            start_mode: Mode::Countdown,
            engine: EngineConfig {
                granularity: Granularity::Seconds,
                ..EngineConfig::default()
            },
            ..Settings::default()
        };
        let mut app = app_with(settings);

        // Minutes wheel: type "00", then seconds "02".
        for c in ['0', '0', '0', '2'] {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine.initial_duration_ms(), 2000);

        press(&mut app, KeyCode::Char(' '));
        app.handle_pump();
        assert!(app.notice.is_none());
        app.handle_pump();
        assert!(app.engine.is_finished());
        assert_eq!(app.notice.as_deref(), Some("Countdown finished"));
        assert!(app.ring_bell);

        // A late pump after finishing changes nothing.
        app.handle_pump();
        assert_eq!(app.engine.elapsed_ms(), 0);
    }

    #[test]
    fn test_presets_cycle_while_unconfigured() {
        let settings = Settings {
            start_mode: Mode::Countdown,
            ..Settings::default()
        };
        let mut app = app_with(settings);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.engine.pending().minutes, 15);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.engine.pending().minutes, 16);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.engine.pending().minutes, 1);
    }

    #[test]
    fn test_quit_asks_while_running() {
        let mut app = app_with(Settings::default());
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.confirm_exit);
        assert!(!app.quit);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_exit);
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.quit);
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from(["lapwatch", "--style", "plain", "--granularity", "seconds", "--reset", "clear", "--hours"]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.style, Style::Plain);
        assert_eq!(settings.engine.granularity, Granularity::Seconds);
        assert_eq!(settings.engine.reset_policy, ResetPolicy::Clear);
        assert_eq!(settings.engine.stopwatch_format, StopwatchFormat::PromoteHours);
        assert_eq!(settings.start_mode, Mode::Stopwatch);
    }

    #[test]
    fn test_redraw_writes_frame() {
        let mut app = app_with(Settings::default());
        let mut out = Vec::new();
        app.redraw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("[Stopwatch]"));
    }
}
