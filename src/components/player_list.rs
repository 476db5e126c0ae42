use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::model::{fit_names, Axis};

#[derive(Properties, PartialEq, Clone)]
pub struct PlayerListProps {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// Number of row / column slots to show.
    pub row_count: usize,
    pub col_count: usize,
    pub show_rows: bool,
    pub show_cols: bool,
    pub on_names: Callback<(Axis, Vec<String>)>,
    pub on_show: Callback<(Axis, bool)>,
}

fn name_inputs(axis: Axis, names: Vec<String>, on_names: &Callback<(Axis, Vec<String>)>) -> Html {
    let prefix = match axis {
        Axis::Row => "Row",
        Axis::Col => "Col",
    };
    html! {<>
        { for names.iter().enumerate().map(|(i, name)| {
            let on_input = {
                let names = names.clone();
                let cb = on_names.clone();
                Callback::from(move |e: InputEvent| {
                    if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                        let mut next = names.clone();
                        next[i] = input.value();
                        cb.emit((axis, next));
                    }
                })
            };
            html! {
                <div key={i} style="display:flex; gap:8px; align-items:center;">
                    <label style="width:56px; font-size:12px;">{ format!("{} {}", prefix, i + 1) }</label>
                    <input value={name.clone()} oninput={on_input} style="flex:1;" />
                </div>
            }
        }) }
    </>}
}

#[function_component]
pub fn PlayerList(props: &PlayerListProps) -> Html {
    let toggle = |axis: Axis, current: bool| {
        let cb = props.on_show.clone();
        Callback::from(move |_| cb.emit((axis, !current)))
    };
    let rows = fit_names(&props.rows, props.row_count);
    let cols = fit_names(&props.cols, props.col_count);
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:6px;">
        <h3 style="margin:0; font-size:15px;">{"Players"}</h3>
        <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
            <input type="checkbox" checked={props.show_rows} onclick={toggle(Axis::Row, props.show_rows)} />
            <span>{"Show row labels"}</span>
        </label>
        <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
            <input type="checkbox" checked={props.show_cols} onclick={toggle(Axis::Col, props.show_cols)} />
            <span>{"Show column labels"}</span>
        </label>
        if props.show_rows {<>
            <div style="font-size:13px; font-weight:700;">{"Row players"}</div>
            { name_inputs(Axis::Row, rows, &props.on_names) }
        </>}
        if props.show_cols {<>
            <div style="font-size:13px; font-weight:700;">{"Column players"}</div>
            { name_inputs(Axis::Col, cols, &props.on_names) }
        </>}
    </div>}
}
