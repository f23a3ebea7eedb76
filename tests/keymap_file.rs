use std::io::Write;
use std::time::Duration;

use overlay_keys::app::{AppState, Direction, Engine, Host, PaletteMode};
use overlay_keys::input::{InputTarget, KeyEvent, KeyOutcome};
use overlay_keys::{initialize, Config, Keymap, KeymapConfig, OverlayError};
use serde_json::json;
use tempfile::NamedTempFile;

const KEYMAP: &str = r#"
blocked_keys = ["f"]
native_search_inputs = ["masthead"]

[global]
"C-k" = { command = "open_palette", arg = "commands" }

[normal]
j = { command = "navigate", arg = "down" }
gh = { command = "invoke", arg = "home" }
gs = { command = "invoke", arg = "subscriptions" }
m = { command = "invoke", arg = "mark" }
mw = { command = "invoke", arg = "mark-watched" }
"/" = { command = "start_filter" }
o = { command = "select" }
O = { command = "select_new_tab" }

[filter]
"C-n" = { command = "navigate", arg = "down" }

[pages.watch]
m = { command = "invoke", arg = "mute" }
"#;

#[derive(Default)]
struct Page {
    state: AppState,
    log: Vec<String>,
}

impl Host for Page {
    fn state(&self) -> AppState {
        self.state.clone()
    }

    fn set_state(&mut self, state: AppState) {
        self.state = state;
    }

    fn render(&mut self) {
        self.log.push("render".into());
    }

    fn navigate(&mut self, direction: Direction) {
        self.log.push(format!("navigate {direction:?}"));
    }

    fn select(&mut self, new_tab: bool) {
        self.log.push(format!("select {new_tab}"));
    }

    fn open_palette(&mut self, mode: PaletteMode) {
        self.log.push(format!("palette {mode:?}"));
    }

    fn invoke(&mut self, name: &str) {
        self.log.push(name.to_string());
    }
}

fn keymap_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(KEYMAP.as_bytes()).unwrap();
    file
}

fn engine_from(file: &NamedTempFile, state: AppState) -> Engine<Page, KeymapConfig> {
    let config = Config {
        keymap_file: Some(file.path().to_string_lossy().into_owned()),
        ..Config::default()
    };
    let keymap = initialize(&config).unwrap();
    Engine::new(
        Page {
            state,
            ..Page::default()
        },
        KeymapConfig::new(keymap),
        &config,
    )
}

#[test]
fn loads_keymap_from_file() {
    let file = keymap_file();
    let keymap = Keymap::from_file(file.path()).unwrap();
    assert_eq!(keymap.binding_count(), 11);
    assert_eq!(keymap.blocked_keys, vec!["f"]);
}

#[test]
fn malformed_file_is_a_keymap_error() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[normal\nj = 1").unwrap();
    assert!(matches!(Keymap::from_file(file.path()), Err(OverlayError::Keymap(_))));
}

#[test]
fn sequences_resolve_through_keymap_commands() {
    let file = keymap_file();
    let mut engine = engine_from(&file, AppState::active());

    engine.handle_key(&KeyEvent::plain("g"));
    engine.handle_key(&KeyEvent::plain("s"));
    engine.handle_key(&KeyEvent::plain("j"));
    engine.handle_key(&KeyEvent::shift("O"));
    engine.handle_key(&KeyEvent::ctrl("k"));

    assert_eq!(
        engine.host().log,
        vec!["subscriptions", "navigate Down", "select true", "palette Commands"]
    );
}

#[test]
fn ambiguous_mark_waits_for_window() {
    let file = keymap_file();
    let mut engine = engine_from(&file, AppState::active());

    assert_eq!(engine.handle_key(&KeyEvent::plain("m")), KeyOutcome::Consumed);
    assert!(engine.host().log.is_empty());
    engine.advance(Duration::from_millis(500));
    assert_eq!(engine.host().log, vec!["mark"]);
}

#[test]
fn page_layer_replaces_ambiguous_binding() {
    let file = keymap_file();
    let state = AppState::active().with_page(json!({ "type": "watch" }));
    let mut engine = engine_from(&file, state);

    // `m` is now `mute`, but `mw` from the normal layer still extends it.
    engine.handle_key(&KeyEvent::plain("m"));
    engine.handle_key(&KeyEvent::plain("x"));
    assert_eq!(engine.host().log, vec!["mute"]);
}

#[test]
fn filter_mode_switches_layers() {
    let file = keymap_file();
    let mut engine = engine_from(&file, AppState::active());

    engine.handle_key(&KeyEvent::plain("/"));
    assert!(engine.host().state.ui.filter_active);

    assert_eq!(engine.handle_key(&KeyEvent::plain("j")), KeyOutcome::Passed);
    engine.handle_key(&KeyEvent::ctrl("n"));
    assert_eq!(engine.host().log, vec!["render", "navigate Down"]);

    assert_eq!(engine.handle_key(&KeyEvent::plain("Escape")), KeyOutcome::Consumed);
    assert!(!engine.host().state.ui.filter_active);
}

#[test]
fn blocked_and_native_search_keys() {
    let file = keymap_file();
    let mut engine = engine_from(&file, AppState::active());

    assert_eq!(engine.handle_key(&KeyEvent::plain("f")), KeyOutcome::Consumed);
    let search = InputTarget::TextEntry { id: "masthead".into() };
    assert_eq!(engine.handle_key(&KeyEvent::plain("Escape").on(search)), KeyOutcome::Blurred);
    assert!(engine.host().log.is_empty());
}
