//! Site configuration: where binding tables come from.

use super::actions::Action;
use super::matcher::BindingTable;
use crate::input::InputTarget;

/// Everything a site needs to pick the bindings for the current keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyContext {
    pub page_type: Option<String>,
    pub filter_active: bool,
    pub search_active: bool,
    pub drawer: Option<String>,
}

/// Per-site binding source.
///
/// The engine asks for a fresh table on every key, so a site may change its
/// bindings at any time (after a page navigation, say) without telling the
/// engine.
pub trait SiteConfig<H> {
    /// Kind of page currently shown, if the site distinguishes any.
    fn page_type(&self, _host: &H) -> Option<String> {
        None
    }

    /// Bindings active in `context`.
    fn key_sequences(&self, context: &KeyContext) -> BindingTable<Action<H>>;

    /// Tokens whose default host behavior is always suppressed in `context`,
    /// whether or not anything is bound to them.
    fn blocked_native_keys(&self, _context: &KeyContext) -> Vec<String> {
        Vec::new()
    }

    /// Whether `target` is the host page's own search box.
    fn is_native_search_input(&self, _target: &InputTarget) -> bool {
        false
    }
}
