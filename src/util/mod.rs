use crate::config::EnvConfig;

/// Install the console tracing subscriber. Browser only; a no-op elsewhere.
pub(crate) fn init_tracing(config: &EnvConfig) {
    #[cfg(target_arch = "wasm32")]
    {
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::Registry;

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(config.max_level())
                .build(),
        );
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = config;
}

/// `mod` hotkeys use Cmd on Apple platforms.
pub(crate) fn is_mac() -> bool {
    web_sys::window()
        .and_then(|w| w.navigator().platform().ok())
        .is_some_and(|p| is_mac_platform(&p))
}

pub(crate) fn is_mac_platform(platform: &str) -> bool {
    let p = platform.to_ascii_lowercase();
    p.starts_with("mac") || p.contains("iphone") || p.contains("ipad")
}

/// DOM selection offsets count UTF-16 code units; the engine counts chars.
pub(crate) fn utf16_to_char_idx(s: &str, pos_utf16: u32) -> usize {
    let mut acc: u32 = 0;
    for (i, ch) in s.chars().enumerate() {
        if acc >= pos_utf16 {
            return i;
        }
        acc += ch.len_utf16() as u32;
    }
    s.chars().count()
}

pub(crate) fn char_idx_to_utf16(s: &str, chars: usize) -> u32 {
    s.chars().take(chars).map(|c| c.len_utf16() as u32).sum()
}
