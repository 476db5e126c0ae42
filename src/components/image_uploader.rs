use gloo::file::callbacks::{read_as_data_url, FileReader};
use gloo::file::File;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::util::cwarn;

#[derive(Properties, PartialEq, Clone)]
pub struct ImageUploaderProps {
    /// Data URL of a newly chosen image.
    pub on_image: Callback<String>,
    /// Recognized card text to turn into a card.
    pub on_text: Callback<String>,
    pub has_image: bool,
    pub on_remove: Callback<()>,
}

#[function_component]
pub fn ImageUploader(props: &ImageUploaderProps) -> Html {
    // Dropping the reader aborts the read, so it lives until the next pick.
    let reader = use_mut_ref(|| None::<FileReader>);
    let loading = use_state(|| false);
    let text = use_state(String::new);

    let on_file = {
        let reader = reader.clone();
        let loading = loading.clone();
        let cb = props.on_image.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            loading.set(true);
            let loading = loading.clone();
            let cb = cb.clone();
            let task = read_as_data_url(&File::from(file), move |result| {
                loading.set(false);
                match result {
                    Ok(url) => cb.emit(url),
                    Err(err) => cwarn(&format!("image read failed: {}", err)),
                }
            });
            *reader.borrow_mut() = Some(task);
        })
    };
    let on_text_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                text.set(area.value());
            }
        })
    };
    let submit_text = {
        let text = text.clone();
        let cb = props.on_text.clone();
        Callback::from(move |_| cb.emit((*text).clone()))
    };
    let remove_cb = {
        let cb = props.on_remove.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <h3 style="margin:0; font-size:15px;">{"Bingo Card"}</h3>
        <input type="file" accept="image/*" onchange={on_file} />
        if *loading {
            <div style="font-size:12px; opacity:0.7;">{"Loading image..."}</div>
        }
        if props.has_image {
            <button onclick={remove_cb}>{"Remove image"}</button>
        }
        <label style="font-size:12px;">{"Card numbers (one row per line)"}</label>
        <textarea rows="4" value={(*text).clone()} oninput={on_text_input} style="width:100%; box-sizing:border-box;" />
        <button onclick={submit_text} disabled={text.trim().is_empty()}>{"Use Numbers"}</button>
    </div>}
}
