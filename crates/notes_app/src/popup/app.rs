use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use notes_core::{update, AppState, Msg};
use notes_engine::{ClientSettings, EngineHandle};
use notes_logging::{notes_debug, notes_info};

use super::effects::EffectRunner;
use super::host::TerminalHost;
use super::logging::{self, LogDestination};
use super::ui::constants::{HELP, PROMPT};
use super::ui::input::{self, Command};
use super::ui::render;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File, LevelFilter::Info);

    let export_dir = std::env::current_dir()
        .context("cannot resolve working directory")?
        .join("output");
    let engine = EngineHandle::new(ClientSettings::default(), export_dir)
        .context("failed to start the notes engine")?;
    let host = Arc::new(TerminalHost::default());
    let mut popup = Popup::new(EffectRunner::new(engine, host.clone()));

    let lines = spawn_input_reader();
    println!("{HELP}");
    popup.draw()?;

    loop {
        match lines.recv_timeout(TICK) {
            Ok(line) => match input::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Open(url))) => {
                    host.set_active_url(url);
                    println!("active page set");
                }
                Ok(Some(Command::Show)) => popup.draw()?,
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(Command::Popup(msg))) => popup.dispatch(msg),
                Ok(None) => {}
                Err(message) => println!("{message}"),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        popup.pump_engine();
        popup.dispatch(Msg::Tick);
        popup.draw_if_dirty()?;
    }

    popup.runner.shutdown();
    notes_info!("Popup closed");
    Ok(())
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Owns the popup state and threads every message through `update`.
struct Popup {
    state: AppState,
    runner: EffectRunner,
}

impl Popup {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            if !matches!(msg, Msg::Tick) {
                notes_debug!("Dispatch {:?}", msg);
            }
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.drain_events() {
            self.dispatch(msg);
        }
    }

    fn draw_if_dirty(&mut self) -> io::Result<()> {
        if self.state.consume_dirty() {
            self.draw()?;
        }
        Ok(())
    }

    fn draw(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out)?;
        for line in render::render(&self.state.view()) {
            writeln!(out, "{line}")?;
        }
        write!(out, "{PROMPT}")?;
        out.flush()
    }
}
