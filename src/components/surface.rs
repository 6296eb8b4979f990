use crate::components::selection::{read_dom_selection, restore_dom_selection};
use crate::editor::{parse_input_type, translate_key, KeyCombo, Outcome};
use crate::engine::{Block, Leaf, Node, Point, Range, Text};
use crate::models::{BlockType, MarkType};
use crate::state::{AppContext, AppState};
use leptos::html;
use leptos::prelude::*;

/// The editable document. The DOM under it is only ever written by
/// re-rendering the engine value; native edits are intercepted.
#[component]
pub fn EditorSurface() -> impl IntoView {
    let AppContext(state) = expect_context::<AppContext>();
    let root = NodeRef::<html::Div>::new();

    let document = Memo::new(move |_| state.value.with(|v| v.document().clone()));
    let is_empty = Memo::new(move |_| {
        document.with(|d| {
            let texts = d.texts();
            d.leaf_blocks().len() == 1 && texts.iter().all(|t| t.is_empty())
        })
    });
    let placeholder = state.config.with_value(|c| c.placeholder.clone());

    Effect::new(move |_| {
        let selection = state.value.with(|v| v.selection());
        document.track();
        request_animation_frame(move || {
            if let Some(root) = root.get_untracked() {
                restore_dom_selection(&root, selection);
            }
        });
    });

    let sync_selection = move || {
        if let Some(range) = root.get_untracked().and_then(|el| read_dom_selection(&el)) {
            state.select(range);
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let combo = KeyCombo::from_keyboard_event(&ev);
        let Some(command) = translate_key(&combo, state.is_mac) else {
            return;
        };
        sync_selection();
        if state.apply(&command) == Outcome::Handled {
            ev.prevent_default();
        }
    };

    let on_beforeinput = move |ev: web_sys::InputEvent| {
        if ev.is_composing() {
            return;
        }
        ev.prevent_default();
        sync_selection();
        state.input(&parse_input_type(&ev.input_type(), ev.data()));
    };

    view! {
        <div class="relative">
            <Show when=move || is_empty.get()>
                <div class="pointer-events-none absolute left-0 top-0 select-none text-muted-foreground">
                    {placeholder.clone()}
                </div>
            </Show>
            <div
                data-name="EditorSurface"
                node_ref=root
                contenteditable="true"
                spellcheck="true"
                autofocus=true
                class="min-h-[12rem] whitespace-pre-wrap break-words outline-none [&_ol]:list-decimal [&_ul]:list-disc [&_ol]:pl-6 [&_ul]:pl-6"
                on:keydown=on_keydown
                on:beforeinput=on_beforeinput
                on:keyup=move |_| sync_selection()
                on:mouseup=move |_| sync_selection()
                on:focus=move |_| sync_selection()
            >
                {move || document.with(|d| render_nodes(state, &d.nodes))}
            </div>
        </div>
    }
}

fn render_nodes(state: AppState, nodes: &[Node]) -> Vec<AnyView> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Block(block) => render_block(state, block),
            Node::Text(text) => render_text(text),
        })
        .collect()
}

fn render_block(state: AppState, block: &Block) -> AnyView {
    if block.kind == BlockType::Image {
        return render_image(state, block);
    }
    let children = render_nodes(state, &block.nodes);
    match block.kind {
        BlockType::HeadingOne => {
            view! { <h1 class="mb-2 text-3xl font-semibold">{children}</h1> }.into_any()
        }
        BlockType::HeadingTwo => {
            view! { <h2 class="mb-2 text-2xl font-semibold">{children}</h2> }.into_any()
        }
        BlockType::BlockQuote => view! {
            <blockquote class="my-2 border-l-4 border-border pl-3 italic text-muted-foreground">
                {children}
            </blockquote>
        }
        .into_any(),
        BlockType::BulletedList => view! { <ul>{children}</ul> }.into_any(),
        BlockType::NumberedList => view! { <ol>{children}</ol> }.into_any(),
        BlockType::ListItem => view! { <li>{children}</li> }.into_any(),
        BlockType::Paragraph | BlockType::Image => {
            view! { <p class="my-1">{children}</p> }.into_any()
        }
    }
}

fn render_image(state: AppState, block: &Block) -> AnyView {
    let src = block.data.src.clone().unwrap_or_default();
    let block_key = block.key;
    let text_key = block.text().map(|t| t.key);
    let selected = move || {
        state
            .value
            .with(|v| v.focus_block().map(|b| b.key) == Some(block_key))
    };
    let hidden_text = block.text().map(render_text);

    view! {
        <div
            data-void="true"
            contenteditable="false"
            class="my-2"
            on:mousedown=move |ev: web_sys::MouseEvent| {
                ev.prevent_default();
                if let Some(key) = text_key {
                    state.select(Range::collapsed(Point::new(key, 0)));
                }
            }
        >
            <img
                src=src
                class=move || {
                    if selected() {
                        "block max-h-[20em] max-w-full ring-2 ring-blue-600"
                    } else {
                        "block max-h-[20em] max-w-full"
                    }
                }
            />
            <span class="hidden">{hidden_text}</span>
        </div>
    }
    .into_any()
}

fn render_text(text: &Text) -> AnyView {
    let key = text.key.0.to_string();
    if text.is_empty() {
        return view! {
            <span data-key=key data-length="0">
                <span data-offset="0"><br /></span>
            </span>
        }
        .into_any();
    }

    let mut start = 0;
    let leaves: Vec<AnyView> = text
        .leaves
        .iter()
        .filter(|leaf| !leaf.is_empty())
        .map(|leaf| {
            let offset = start;
            start += leaf.len();
            render_leaf(leaf, offset)
        })
        .collect();

    view! { <span data-key=key data-length=text.len().to_string()>{leaves}</span> }.into_any()
}

fn render_leaf(leaf: &Leaf, offset: usize) -> AnyView {
    let mut content = leaf.text.clone().into_any();
    for mark in leaf.marks.iter().rev() {
        content = match mark {
            MarkType::Bold => view! { <strong>{content}</strong> }.into_any(),
            MarkType::Italic => view! { <em>{content}</em> }.into_any(),
            MarkType::Underlined => view! { <u>{content}</u> }.into_any(),
            MarkType::Code => view! {
                <code class="rounded bg-muted px-1 font-mono text-sm">{content}</code>
            }
            .into_any(),
        };
    }
    view! { <span data-offset=offset.to_string()>{content}</span> }.into_any()
}
