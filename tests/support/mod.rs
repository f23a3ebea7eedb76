#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use overlay_keys::app::{action, Action, AppState, BindingTable, Engine, Host, KeyContext, SiteConfig};
use overlay_keys::input::{InputTarget, KeyEvent};
use overlay_keys::Config;
use serde_json::Value;

/// Host that counts every operation the engine triggers.
#[derive(Default)]
pub struct Recorder {
    pub state: AppState,
    pub fired: BTreeMap<String, usize>,
    pub renders: usize,
    pub focuses: usize,
    pub drawer_keys: Vec<String>,
    pub drawer_handles: bool,
    pub site: Option<Value>,
    pub seen_site: Vec<Option<Value>>,
}

impl Recorder {
    pub fn active() -> Self {
        Self {
            state: AppState::active(),
            ..Self::default()
        }
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn hit(&mut self, label: &str) {
        *self.fired.entry(label.to_string()).or_default() += 1;
    }

    pub fn count(&self, label: &str) -> usize {
        self.fired.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.fired.values().sum()
    }
}

impl Host for Recorder {
    fn state(&self) -> AppState {
        self.state.clone()
    }

    fn set_state(&mut self, state: AppState) {
        self.state = state;
    }

    fn render(&mut self) {
        self.renders += 1;
    }

    fn site_state(&self) -> Option<Value> {
        self.site.clone()
    }

    fn on_drawer_key(&mut self, drawer: &str, event: &KeyEvent, site: Option<&Value>) -> bool {
        self.drawer_keys.push(format!("{drawer}:{}", event.key));
        self.seen_site.push(site.cloned());
        self.drawer_handles
    }

    fn focus_status_bar(&mut self) {
        self.focuses += 1;
    }
}

/// Site whose every binding records its own sequence when fired.
#[derive(Default)]
pub struct TableSite {
    pub sequences: Vec<String>,
    pub blocked: Vec<String>,
    pub native_search: Option<String>,
    pub page_type: Option<String>,
    pub contexts: Rc<RefCell<Vec<KeyContext>>>,
}

impl TableSite {
    pub fn new(sequences: &[&str]) -> Self {
        Self {
            sequences: sequences.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn blocking(mut self, keys: &[&str]) -> Self {
        self.blocked = keys.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn native_search(mut self, id: &str) -> Self {
        self.native_search = Some(id.to_string());
        self
    }

    pub fn on_page(mut self, page_type: &str) -> Self {
        self.page_type = Some(page_type.to_string());
        self
    }
}

impl SiteConfig<Recorder> for TableSite {
    fn page_type(&self, _host: &Recorder) -> Option<String> {
        self.page_type.clone()
    }

    fn key_sequences(&self, context: &KeyContext) -> BindingTable<Action<Recorder>> {
        self.contexts.borrow_mut().push(context.clone());
        self.sequences
            .iter()
            .map(|seq| {
                let label = seq.clone();
                (seq.clone(), action(move |host: &mut Recorder| host.hit(&label)))
            })
            .collect()
    }

    fn blocked_native_keys(&self, _context: &KeyContext) -> Vec<String> {
        self.blocked.clone()
    }

    fn is_native_search_input(&self, target: &InputTarget) -> bool {
        matches!(
            (target, &self.native_search),
            (InputTarget::TextEntry { id }, Some(native)) if id == native
        )
    }
}

pub type TestEngine = Engine<Recorder, TableSite>;

pub fn engine(sequences: &[&str]) -> TestEngine {
    Engine::new(Recorder::active(), TableSite::new(sequences), &Config::default())
}

pub fn engine_with(host: Recorder, site: TableSite) -> TestEngine {
    Engine::new(host, site, &Config::default())
}

pub fn key(label: &str) -> KeyEvent {
    KeyEvent::parse_chord(label)
}

pub fn press(engine: &mut TestEngine, keys: &[&str]) {
    for k in keys {
        engine.handle_key(&key(k));
    }
}
