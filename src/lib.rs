mod app;
mod components;
mod config;
mod editor;
mod engine;
mod models;
mod pages;
mod state;
mod storage;
mod util;

use crate::app::App;
use crate::config::EnvConfig;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::from_window();
    util::init_tracing(&config);
    tracing::info!(level = %config.max_level(), "starting editor");

    mount_to_body(move || view! { <App config=config.clone() /> });
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use crate::editor::{default_value, NodeLimit};
    use crate::engine::{Document, Value};
    use crate::storage::{
        load_document, load_node_limit, save_document, save_node_limit, BrowserStore,
        KeyValueStore, DATA_KEY, NODE_LIMIT_KEY,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn clear() {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(DATA_KEY);
            let _ = storage.remove_item(NODE_LIMIT_KEY);
        }
    }

    #[wasm_bindgen_test]
    fn local_storage_document_round_trip() {
        clear();
        let store = BrowserStore;
        let value = default_value();
        save_document(&store, &value).expect("localStorage write");

        let reloaded = load_document(&store);
        assert_eq!(
            reloaded.to_json().expect("serializes"),
            value.to_json().expect("serializes")
        );
        clear();
    }

    #[wasm_bindgen_test]
    fn local_storage_node_limit_round_trip() {
        clear();
        let store = BrowserStore;
        assert_eq!(load_node_limit(&store), NodeLimit::UNLIMITED);
        save_node_limit(&store, NodeLimit(7)).expect("localStorage write");
        assert_eq!(store.get_item(NODE_LIMIT_KEY).as_deref(), Some("7"));
        assert_eq!(load_node_limit(&store), NodeLimit(7));
        clear();
    }

    #[wasm_bindgen_test]
    fn local_storage_garbage_loads_default() {
        clear();
        let store = BrowserStore;
        store.set_item(DATA_KEY, "not json").expect("localStorage write");
        let loaded = load_document(&store);
        let empty = Value::new(Document::default());
        assert_ne!(
            loaded.to_json().expect("serializes"),
            empty.to_json().expect("serializes")
        );
        assert_eq!(
            loaded.to_json().expect("serializes"),
            default_value().to_json().expect("serializes")
        );
        clear();
    }
}
