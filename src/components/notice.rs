use crate::components::ui::{Alert, AlertDescription, AlertTitle};
use crate::state::AppContext;
use icons::X;
use leptos::prelude::*;

/// Error notification; hides itself after a few seconds or on dismiss.
#[component]
pub fn NoticeAlert() -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();

    move || {
        state.notice.get().map(|notice| {
            view! {
                <div class="fixed right-4 top-4 z-50 w-72">
                    <Alert class="border-destructive/30 bg-background">
                        <button
                            type="button"
                            class="absolute right-3 top-3 rounded-sm opacity-70 hover:opacity-100 [&_svg]:size-4"
                            aria-label="Dismiss"
                            on:click=move |_| state.dismiss_notice()
                        >
                            <X />
                        </button>
                        <AlertTitle class="text-destructive">"Error"</AlertTitle>
                        <AlertDescription class="text-destructive text-xs">
                            {notice.message}
                        </AlertDescription>
                    </Alert>
                </div>
            }
        })
    }
}
