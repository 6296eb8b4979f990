use crate::config::EnvConfig;
use crate::editor::{
    apply_input, dispatch, insert_image, save_allowed, Command, InputAction, NodeLimit, Outcome,
};
use crate::engine::{Editor, EditorEngine, Range, Value};
use crate::storage::{self, BrowserStore, KeyValueStore, StorageError};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Notifications auto-hide after this long.
pub(crate) const NOTICE_TIMEOUT_MS: i32 = 5000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub id: u64,
    pub message: String,
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<EnvConfig>,
    pub is_mac: bool,

    /// Current editor value. Replaced whole on every change.
    pub value: RwSignal<Value>,

    /// Drives save gating as soon as the settings input changes; only the
    /// dropdown's Save writes it to storage.
    pub node_limit: RwSignal<NodeLimit>,

    pub settings_open: RwSignal<bool>,

    /// Open URL prompt, holding the selection to insert at.
    pub image_prompt: RwSignal<Option<Range>>,

    pub notice: RwSignal<Option<Notice>>,
    next_notice: StoredValue<u64>,
}

impl AppState {
    pub fn new(config: EnvConfig) -> Self {
        let store = BrowserStore;
        Self {
            config: StoredValue::new(config),
            is_mac: crate::util::is_mac(),
            value: RwSignal::new(storage::load_document(&store)),
            node_limit: RwSignal::new(storage::load_node_limit(&store)),
            settings_open: RwSignal::new(false),
            image_prompt: RwSignal::new(None),
            notice: RwSignal::new(None),
            next_notice: StoredValue::new(0),
        }
    }

    /// Run `f` against an editor over the current value; the result is
    /// committed only when `f` reports the change as handled.
    fn edit(&self, f: impl FnOnce(&mut Editor) -> Outcome) -> Outcome {
        let mut editor = Editor::new(self.value.get_untracked());
        let outcome = f(&mut editor);
        if outcome == Outcome::Handled {
            self.value.set(editor.into_value());
        }
        outcome
    }

    pub fn apply(&self, command: &Command) -> Outcome {
        self.edit(|editor| dispatch(editor, command))
    }

    pub fn input(&self, action: &InputAction) -> Outcome {
        self.edit(|editor| apply_input(editor, action))
    }

    pub fn select(&self, range: Range) {
        if self.value.with_untracked(|v| v.selection() == range) {
            return;
        }
        self.edit(|editor| {
            editor.select(range);
            Outcome::Handled
        });
    }

    pub fn insert_image(&self, src: &str, target: Option<Range>) {
        self.edit(|editor| insert_image(editor, src, target));
    }

    /// Reactive: whether the current document fits within the node limit.
    pub fn can_save(&self) -> bool {
        let limit = self.node_limit.get();
        self.value.with(|v| save_allowed(limit, v.document()))
    }

    pub fn save(&self) {
        let limit = self.node_limit.get_untracked();
        let saved = self
            .value
            .with_untracked(|v| save_if_allowed(&BrowserStore, limit, v));
        match saved {
            Ok(true) => {}
            Ok(false) => tracing::warn!(limit = %limit, "document exceeds node limit, not saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save document"),
        }
    }

    /// Discard unsaved edits.
    pub fn revert(&self) {
        self.value.set(storage::load_document(&BrowserStore));
    }

    pub fn set_node_limit_input(&self, raw: &str) {
        self.node_limit.set(NodeLimit::parse(raw));
    }

    pub fn persist_node_limit(&self) {
        if let Err(e) = storage::save_node_limit(&BrowserStore, self.node_limit.get_untracked()) {
            tracing::warn!(error = %e, "failed to save node limit");
        }
        self.settings_open.set(false);
    }

    pub fn notify(&self, message: impl Into<String>) {
        let id = self.post_notice(message);
        let state = *self;
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || state.expire_notice(id))
                .as_ref()
                .unchecked_ref(),
            NOTICE_TIMEOUT_MS,
        );
    }

    /// Show `message` under a fresh id. Ids never repeat, even after a dismiss.
    fn post_notice(&self, message: impl Into<String>) -> u64 {
        let id = self.next_notice.get_value();
        self.next_notice.set_value(id + 1);
        self.notice.set(Some(Notice {
            id,
            message: message.into(),
        }));
        id
    }

    /// Hide notice `id` if it is still the one showing.
    fn expire_notice(&self, id: u64) {
        if self
            .notice
            .with_untracked(|n| n.as_ref().is_some_and(|n| n.id == id))
        {
            self.notice.set(None);
        }
    }

    pub fn dismiss_notice(&self) {
        self.notice.set(None);
    }
}

/// Persist `value` unless it has more blocks than `limit` allows.
pub(crate) fn save_if_allowed(
    store: &impl KeyValueStore,
    limit: NodeLimit,
    value: &Value,
) -> Result<bool, StorageError> {
    if !save_allowed(limit, value.document()) {
        return Ok(false);
    }
    storage::save_document(store, value)?;
    Ok(true)
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::begin_upload;
    use crate::engine::testing::*;
    use crate::storage::{MemoryStore, DATA_KEY};

    fn state(value: Value) -> AppState {
        AppState {
            config: StoredValue::new(EnvConfig::default()),
            is_mac: false,
            value: RwSignal::new(value),
            node_limit: RwSignal::new(NodeLimit::UNLIMITED),
            settings_open: RwSignal::new(false),
            image_prompt: RwSignal::new(None),
            notice: RwSignal::new(None),
            next_notice: StoredValue::new(0),
        }
    }

    fn shown(state: &AppState) -> Option<String> {
        state
            .notice
            .with_untracked(|n| n.as_ref().map(|n| n.message.clone()))
    }

    #[test]
    fn test_save_refused_over_limit() {
        let store = MemoryStore::default();
        let e = editor(vec![p("a"), p("b"), p("c")]);

        assert_eq!(save_if_allowed(&store, NodeLimit(2), e.value()).ok(), Some(false));
        assert_eq!(store.get_item(DATA_KEY), None);

        assert_eq!(save_if_allowed(&store, NodeLimit(3), e.value()).ok(), Some(true));
        assert_eq!(store.get_item(DATA_KEY), Some(json(&e)));
    }

    #[test]
    fn test_unlimited_always_saves() {
        let store = MemoryStore::default();
        let e = editor((0..50).map(|i| p(&i.to_string())).collect());
        assert_eq!(
            save_if_allowed(&store, NodeLimit::UNLIMITED, e.value()).ok(),
            Some(true)
        );
        assert!(store.get_item(DATA_KEY).is_some());
    }

    #[test]
    fn test_stale_timer_keeps_newer_notice_after_dismiss() {
        let state = state(editor(vec![p("a")]).into_value());

        let first = state.post_notice("first");
        state.dismiss_notice();
        let second = state.post_notice("second");
        assert_ne!(first, second);

        state.expire_notice(first);
        assert_eq!(shown(&state).as_deref(), Some("second"));

        state.expire_notice(second);
        assert_eq!(shown(&state), None);
    }

    #[test]
    fn test_newer_notice_replaces_and_outlives_older_timer() {
        let state = state(editor(vec![p("a")]).into_value());
        let first = state.post_notice("first");
        let second = state.post_notice("second");

        state.expire_notice(first);
        assert_eq!(shown(&state).as_deref(), Some("second"));
        state.expire_notice(second);
        assert_eq!(shown(&state), None);
    }

    #[test]
    fn test_rejected_upload_notifies_once_and_keeps_document() {
        let state = state(editor(vec![p("a"), p("b")]).into_value());
        let before = state.value.with_untracked(|v| v.to_json().expect("serializes"));

        let mut posted = Vec::new();
        let task = begin_upload("image/png", |message| {
            posted.push(message.clone());
            state.post_notice(message);
        });

        assert!(task.is_none());
        assert_eq!(posted, vec!["Only JPEG file".to_string()]);
        assert_eq!(shown(&state).as_deref(), Some("Only JPEG file"));
        assert_eq!(
            state.value.with_untracked(|v| v.to_json().expect("serializes")),
            before
        );
    }
}
