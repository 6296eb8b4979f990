use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Label};
use crate::editor::{begin_upload, read_file, Command, ImageError, ToolbarButton, UploadTask};
use crate::models::{BlockType, ListKind, MarkType};
use crate::state::{AppContext, AppState};
use icons::{
    Bold, CloudUpload, Code, Heading1, Heading2, Image, Italic, List, ListOrdered, Quote,
    Settings, Underline,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

fn button_icon(button: ToolbarButton) -> AnyView {
    match button {
        ToolbarButton::Mark(MarkType::Bold) => view! { <Bold /> }.into_any(),
        ToolbarButton::Mark(MarkType::Italic) => view! { <Italic /> }.into_any(),
        ToolbarButton::Mark(MarkType::Underlined) => view! { <Underline /> }.into_any(),
        ToolbarButton::Mark(MarkType::Code) => view! { <Code /> }.into_any(),
        ToolbarButton::Block(BlockType::HeadingOne) => view! { <Heading1 /> }.into_any(),
        ToolbarButton::Block(BlockType::HeadingTwo) => view! { <Heading2 /> }.into_any(),
        ToolbarButton::Block(_) => view! { <Quote /> }.into_any(),
        ToolbarButton::List(ListKind::Numbered) => view! { <ListOrdered /> }.into_any(),
        ToolbarButton::List(ListKind::Bulleted) => view! { <List /> }.into_any(),
        ToolbarButton::ImageUrl => view! { <Image /> }.into_any(),
        ToolbarButton::ImageFile => view! { <CloudUpload /> }.into_any(),
    }
}

#[component]
pub fn Toolbar(uploads: StoredValue<Vec<UploadTask>>) -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();

    let buttons = ToolbarButton::ALL
        .into_iter()
        .map(|button| match button {
            ToolbarButton::ImageFile => view! { <UploadButton uploads=uploads /> }.into_any(),
            button => view! { <FormatButton button=button /> }.into_any(),
        })
        .collect::<Vec<_>>();

    view! {
        <div
            data-name="Toolbar"
            class="relative mb-5 flex flex-wrap items-center gap-1 rounded bg-slate-700 px-4 py-2"
        >
            {buttons}
            <div class="ml-auto">
                <Button
                    variant=ButtonVariant::Toolbar
                    size=ButtonSize::Icon
                    attr:title="Settings"
                    on:click=move |_| state.settings_open.update(|open| *open = !*open)
                >
                    <Settings class="text-emerald-400" />
                </Button>
                <Show when=move || state.settings_open.get()>
                    <SettingsDropdown />
                </Show>
            </div>
        </div>
    }
}

/// Mark, block, list and image-from-URL buttons. Acting on mousedown keeps
/// the editor's selection in place.
#[component]
fn FormatButton(button: ToolbarButton) -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();
    let active = move || state.value.with(|v| button.is_active(v));

    let on_mousedown = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        match Command::from_button(button) {
            Some(command) => {
                state.apply(&command);
            }
            None => {
                let target = state.value.with_untracked(|v| v.selection());
                state.image_prompt.set(Some(target));
            }
        }
    };

    view! {
        <Button
            variant=ButtonVariant::Toolbar
            size=ButtonSize::Icon
            attr:title=button.title()
            attr:aria-pressed=move || active().to_string()
            on:mousedown=on_mousedown
        >
            {button_icon(button)}
        </Button>
    }
}

#[component]
fn UploadButton(uploads: StoredValue<Vec<UploadTask>>) -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();
    let active = move || state.value.with(|v| ToolbarButton::ImageFile.is_active(v));

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        // Allow picking the same file again.
        input.set_value("");
        start_upload(state, uploads, file);
    };

    view! {
        <label
            title=ToolbarButton::ImageFile.title()
            aria-pressed=move || active().to_string()
            class="inline-flex size-8 cursor-pointer items-center justify-center text-white hover:text-emerald-200 aria-pressed:text-emerald-400 [&_svg]:size-4"
        >
            {button_icon(ToolbarButton::ImageFile)}
            <input type="file" class="hidden" on:change=on_change />
        </label>
    }
}

fn start_upload(state: AppState, uploads: StoredValue<Vec<UploadTask>>, file: Option<web_sys::File>) {
    let Some(file) = file else {
        tracing::debug!(error = %ImageError::NoFile, "upload skipped");
        return;
    };
    let Some(task) = begin_upload(&file.type_(), |message| state.notify(message)) else {
        return;
    };
    uploads.update_value(|tasks| tasks.push(task.clone()));

    spawn_local(async move {
        let result = task.finish(read_file(file)).await;
        let _ = uploads.try_update_value(|tasks| tasks.retain(|t| !t.is_same(&task)));
        match result {
            Ok(src) => {
                state.apply(&Command::InsertImage(src));
            }
            Err(ImageError::Cancelled) => tracing::debug!("upload cancelled"),
            Err(e) => tracing::warn!(error = %e, "image upload failed"),
        }
    });
}

#[component]
fn SettingsDropdown() -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();
    let raw = RwSignal::new(state.node_limit.get_untracked().to_string());

    view! {
        <div
            data-name="SettingsDropdown"
            class="absolute right-4 top-full z-20 mt-1 w-64 rounded-md border border-border bg-background p-3 shadow-lg"
        >
            <Label html_for="nodeLimit">
                "Node limit (Keep 0 if there is no limit)"
                <Input
                    r#type="number"
                    id="nodeLimit"
                    min="0"
                    placeholder="Enter number"
                    class="h-8"
                    value=raw
                    on_input=Callback::new(move |value: String| {
                        state.set_node_limit_input(&value);
                        raw.set(value);
                    })
                />
            </Label>
            <div class="mt-3 flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| state.settings_open.set(false)
                >
                    "Cancel"
                </Button>
                <Button
                    variant=ButtonVariant::Success
                    size=ButtonSize::Sm
                    on:click=move |_| state.persist_node_limit()
                >
                    "Save"
                </Button>
            </div>
        </div>
    }
}
