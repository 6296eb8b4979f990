use crate::config::EnvConfig;
use crate::pages::EditorPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;

#[component]
pub fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(config)));

    view! {
        <div class="flex min-h-screen flex-col bg-background text-foreground">
            <Header />
            <main class="flex-1">
                <EditorPage />
            </main>
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <nav class="bg-slate-900 py-3 text-center text-emerald-400">
            <p class="text-lg font-light">"Twisker - Rich Text Demo"</p>
            <p class="text-xs font-light">"Formatting, lists, images and local saves"</p>
        </nav>
    }
}
