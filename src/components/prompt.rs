use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::editor::url_from_prompt;
use crate::state::AppContext;
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Asks for an image URL and inserts it at the selection captured when the
/// prompt was opened.
#[component]
pub fn ImageUrlPrompt() -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();
    let url = RwSignal::new(String::new());
    let input_ref = NodeRef::<html::Input>::new();

    let close = move || {
        state.image_prompt.set(None);
        url.set(String::new());
    };

    let confirm = move || {
        let Some(target) = state.image_prompt.get_untracked() else {
            return;
        };
        match url_from_prompt(Some(&url.get_untracked())) {
            Some(src) => state.insert_image(&src, Some(target)),
            None => tracing::debug!("empty image url, nothing inserted"),
        }
        close();
    };

    // Focus the input once the prompt is mounted.
    Effect::new(move |_| {
        if state.image_prompt.get().is_none() {
            return;
        }
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                if let Some(el) = input_ref.get_untracked() {
                    let _ = el.focus();
                }
            })
            .as_ref()
            .unchecked_ref(),
            0,
        );
    });

    view! {
        <Show when=move || state.image_prompt.get().is_some()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                <div
                    data-name="ImageUrlPrompt"
                    class="w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg"
                    on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                        "Enter" => {
                            ev.prevent_default();
                            confirm();
                        }
                        "Escape" => close(),
                        _ => {}
                    }
                >
                    <div class="mb-3 text-sm font-medium">"Please enter image url"</div>
                    <Input
                        node_ref=input_ref
                        placeholder="Enter image url"
                        class="h-8 text-sm"
                        value=url
                        on_input=Callback::new(move |value: String| url.set(value))
                    />
                    <div class="flex items-center justify-end gap-2 pt-3">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| close()
                        >
                            "Cancel"
                        </Button>
                        <Button
                            variant=ButtonVariant::Success
                            size=ButtonSize::Sm
                            on:click=move |_| confirm()
                        >
                            "OK"
                        </Button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
