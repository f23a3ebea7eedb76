//! Keymap replay tool.
//!
//! Thin wrapper around the library: loads a TOML keymap, starts an overlay
//! session against a recording host, and replays a script of key presses and
//! clock advances, printing every host operation the engine triggers.
//!
//! # Usage
//!
//! ```text
//! overlay-keys <keymap.toml> [script]
//! ```
//!
//! The script is read from the given file or from stdin. One command per line:
//!
//! - `key <chord> [target]`: press a key (`g`, `C-f`, `S-Enter`, `Escape`).
//!   `target` is `page` (default), `status`, `command`, `filter`, `search`
//!   or `entry:<id>`.
//! - `wait <ms>`: advance the clock
//! - `page <type>`: set the page type used for page-specific layers
//! - `state`: print the current mode and accumulated sequence
//!
//! Blank lines and lines starting with `#` are skipped.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use overlay_keys::app::{derive_mode, setup, AppState, Direction, Engine, Host, PaletteMode, PALETTE_DRAWER};
use overlay_keys::input::{EngineInputKind, InputPipeline, InputTarget, KeyEvent};
use overlay_keys::{Config, KeymapConfig, OverlayError, Result};
use serde_json::{json, Value};

/// Host that applies drawer/palette operations to its state and prints
/// everything else.
struct Replay {
    state: AppState,
}

impl Replay {
    fn emit(&self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
    }
}

impl Host for Replay {
    fn state(&self) -> AppState {
        self.state.clone()
    }

    fn set_state(&mut self, state: AppState) {
        self.state = state;
    }

    fn render(&mut self) {
        self.emit(format!("render [{}]", derive_mode(&self.state)));
    }

    fn navigate(&mut self, direction: Direction) {
        self.emit(format!("navigate {direction:?}"));
    }

    fn select(&mut self, new_tab: bool) {
        self.emit(if new_tab { "select (new tab)" } else { "select" });
    }

    fn open_palette(&mut self, mode: PaletteMode) {
        self.emit(format!("open palette {mode:?}"));
        self.state = self.state.clone().open_drawer(PALETTE_DRAWER);
        self.render();
    }

    fn open_drawer(&mut self, id: &str) {
        self.emit(format!("open drawer {id}"));
        self.state = self.state.clone().open_drawer(id);
        self.render();
    }

    fn close_drawer(&mut self) {
        self.emit("close drawer");
        self.state = self.state.clone().close_drawer();
        self.render();
    }

    fn on_drawer_key(&mut self, drawer: &str, event: &KeyEvent, _site: Option<&Value>) -> bool {
        self.emit(format!("drawer {drawer} <- {event}"));
        true
    }

    fn focus_status_bar(&mut self) {
        tracing::trace!("status bar focused");
    }

    fn invoke(&mut self, name: &str) {
        self.emit(format!("invoke {name}"));
    }
}

fn parse_target(raw: Option<&str>) -> Result<InputTarget> {
    Ok(match raw {
        None | Some("page") => InputTarget::Page,
        Some("status") => InputTarget::StatusBar,
        Some("command") => InputTarget::EngineInput(EngineInputKind::Command),
        Some("filter") => InputTarget::EngineInput(EngineInputKind::Filter),
        Some("search") => InputTarget::EngineInput(EngineInputKind::Search),
        Some(other) => match other.strip_prefix("entry:") {
            Some(id) => InputTarget::TextEntry { id: id.to_string() },
            None => return Err(OverlayError::Config(format!("unknown target '{other}'"))),
        },
    })
}

fn run(keymap_path: &str, script: &str) -> Result<()> {
    let mut settings = BTreeMap::new();
    settings.insert("keymap_file".to_string(), keymap_path.to_string());
    if let Ok(level) = std::env::var("OVERLAY_KEYS_TRACE") {
        settings.insert("trace_level".to_string(), level);
    }
    let config = Config::from_map(&settings);
    overlay_keys::observability::init_tracing(&config);

    let keymap = overlay_keys::initialize(&config)?;
    tracing::debug!(bindings = keymap.binding_count(), "keymap ready");

    let host = Replay {
        state: AppState::active(),
    };
    let mut pipeline = InputPipeline::new();
    let mut session = setup(&mut pipeline, Engine::new(host, KeymapConfig::new(keymap), &config));

    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bad = |msg: &str| OverlayError::Config(format!("line {}: {msg}", index + 1));

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("key"), Some(chord)) => {
                let event = KeyEvent::parse_chord(chord).on(parse_target(words.next())?);
                let outcome = pipeline.dispatch(&event);
                println!("> {chord}: {outcome:?}");
            }
            (Some("wait"), Some(ms)) => {
                let ms = ms.parse::<u64>().map_err(|_| bad("wait expects milliseconds"))?;
                session.advance(Duration::from_millis(ms));
            }
            (Some("page"), Some(kind)) => {
                let mut engine = session.engine_mut();
                let host = engine.host_mut();
                host.state = host.state.clone().with_page(json!({ "type": kind }));
            }
            (Some("state"), None) => {
                let engine = session.engine();
                println!(
                    "= {} sequence={:?} pending={}",
                    derive_mode(&engine.host().state),
                    engine.sequence(),
                    engine.has_pending()
                );
            }
            _ => return Err(bad("unrecognized command")),
        }
    }

    session.cleanup(&mut pipeline);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(keymap_path) = args.get(1) else {
        eprintln!("usage: overlay-keys <keymap.toml> [script]");
        return ExitCode::from(2);
    };

    let script = match args.get(2) {
        Some(path) => std::fs::read_to_string(path).map_err(OverlayError::from),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map(|_| buf)
                .map_err(OverlayError::from)
        }
    };

    match script.and_then(|script| run(keymap_path, &script)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("overlay-keys: {e}");
            ExitCode::FAILURE
        }
    }
}
