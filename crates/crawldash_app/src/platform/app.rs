use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crawldash_core::{update, AppState, Msg};
use crawldash_logging::{dash_debug, dash_info, dash_warn};

use super::commands::{parse_command, Command, HELP};
use super::config::{config_path, DashConfig};
use super::effects::EffectRunner;
use super::ui;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Print(String),
    Redraw,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let path = config_path();
    let config = DashConfig::load(path.as_deref()).context("loading configuration")?;
    crawldash_logging::initialize(config.log_destination.into(), config.level_filter()?);
    match &path {
        Some(path) => dash_info!("loaded config from {}", path.display()),
        None => dash_info!("no config file given; using defaults"),
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.service_settings(), event_tx.clone())
        .context("starting job service")?;

    spawn_ticker(config.tick_interval(), event_tx.clone());
    spawn_stdin_reader(event_tx.clone());
    let _ = event_tx.send(AppEvent::Msg(Msg::Started));

    let mut app = App {
        state: AppState::with_settings(config.poll_settings()),
        runner,
    };
    println!("{HELP}");

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch_msg(msg),
            AppEvent::Print(text) => println!("{text}"),
            AppEvent::Redraw => app.redraw(),
            AppEvent::Quit => break,
        }
    }

    dash_info!("shutting down after {} ticks", app.state.ticks());
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    fn dispatch_msg(&mut self, msg: Msg) {
        if !matches!(msg, Msg::Tick { .. }) {
            dash_debug!("dispatch {:?}", msg);
        }
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.redraw();
        }
    }

    fn redraw(&self) {
        let view = self.state.view();
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", ui::render::render(&view));
        let _ = stdout.flush();
    }
}

fn spawn_ticker(interval: Duration, event_tx: mpsc::Sender<AppEvent>) {
    let start = Instant::now();
    thread::spawn(move || {
        while event_tx
            .send(AppEvent::Msg(Msg::Tick {
                now: start.elapsed(),
            }))
            .is_ok()
        {
            thread::sleep(interval);
        }
    });
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    dash_warn!("failed to read stdin: {}", err);
                    break;
                }
            };
            let event = match parse_command(&line) {
                Ok(Command::Dispatch(msg)) => AppEvent::Msg(msg),
                Ok(Command::Redraw) => AppEvent::Redraw,
                Ok(Command::Help) => AppEvent::Print(HELP.to_string()),
                Ok(Command::Quit) => AppEvent::Quit,
                Err(err) => AppEvent::Print(err.to_string()),
            };
            let quit = matches!(event, AppEvent::Quit);
            if event_tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
