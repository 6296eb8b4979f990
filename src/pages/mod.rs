use crate::components::ui::{Button, ButtonVariant};
use crate::components::{EditorSurface, ImageUrlPrompt, NoticeAlert, Toolbar};
use crate::editor::{node_count, UploadTask};
use crate::state::AppContext;
use leptos::prelude::*;

#[component]
pub fn EditorPage() -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();

    // Uploads still reading when the page goes away must not insert.
    let uploads = StoredValue::new(Vec::<UploadTask>::new());
    on_cleanup(move || {
        let _ = uploads.try_with_value(|tasks| tasks.iter().for_each(UploadTask::cancel));
    });

    let count = move || state.value.with(|v| node_count(v.document()));
    let status = move || {
        let limit = state.node_limit.get();
        if limit.is_unlimited() {
            format!("{} nodes", count())
        } else {
            format!("{} / {} nodes", count(), limit)
        }
    };

    view! {
        <div data-name="EditorPage" class="mx-auto w-full max-w-3xl px-4 py-6">
            <Toolbar uploads=uploads />
            <EditorSurface />
            <hr class="my-4 border-border" />
            <div class="flex items-center justify-end gap-2">
                <span
                    class="mr-auto text-xs text-muted-foreground"
                    class:text-destructive=move || !state.can_save()
                >
                    {status}
                </span>
                <Button
                    variant=ButtonVariant::Destructive
                    on:click=move |_| state.revert()
                >
                    "Cancel"
                </Button>
                <Button
                    variant=ButtonVariant::Success
                    attr:disabled=move || !state.can_save()
                    on:click=move |_| state.save()
                >
                    "Save"
                </Button>
            </div>
            <ImageUrlPrompt />
            <NoticeAlert />
        </div>
    }
}
