use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::model::{Grid, GridDefaults, NumberOrder, OverlayType};

#[derive(Properties, PartialEq, Clone)]
pub struct DabOverlayControlsProps {
    pub defaults: GridDefaults,
    pub grid: Option<Grid>,
    pub has_image: bool,
    pub on_defaults: Callback<GridDefaults>,
    pub on_design: Callback<()>,
    pub on_clear: Callback<()>,
}

fn overlay_key(t: OverlayType) -> &'static str {
    match t {
        OverlayType::Dab => "dab",
        OverlayType::Player => "player",
        OverlayType::Both => "both",
    }
}

fn overlay_from_key(key: &str) -> Option<OverlayType> {
    match key {
        "dab" => Some(OverlayType::Dab),
        "player" => Some(OverlayType::Player),
        "both" => Some(OverlayType::Both),
        _ => None,
    }
}

fn overlay_label(t: OverlayType) -> &'static str {
    match t {
        OverlayType::Dab => "Dab only",
        OverlayType::Player => "Players only",
        OverlayType::Both => "Dab + Players",
    }
}

/// Number input committing a positive integer through `apply`.
fn number_field(
    label: &'static str,
    value: i64,
    min: i64,
    defaults: &GridDefaults,
    on_defaults: &Callback<GridDefaults>,
    apply: fn(&mut GridDefaults, i64),
) -> Html {
    let onchange = {
        let defaults = defaults.clone();
        let cb = on_defaults.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Ok(n) = input.value().trim().parse::<i64>() {
                let mut next = defaults.clone();
                apply(&mut next, n.max(min));
                cb.emit(next);
            }
        })
    };
    html! {
        <label style="display:flex; flex-direction:column; font-size:12px; gap:2px;">
            <span>{ label }</span>
            <input type="number" min={min.to_string()} value={value.to_string()} {onchange} style="width:70px;" />
        </label>
    }
}

/// Side panel for grid defaults plus the design / clear actions.
#[function_component]
pub fn DabOverlayControls(props: &DabOverlayControlsProps) -> Html {
    let d = &props.defaults;
    let on_order = {
        let defaults = d.clone();
        let cb = props.on_defaults.clone();
        Callback::from(move |e: Event| {
            if let Some(sel) = e.target_dyn_into::<HtmlSelectElement>() {
                let order = if sel.value() == "row" { NumberOrder::Row } else { NumberOrder::Column };
                cb.emit(GridDefaults { order, ..defaults.clone() });
            }
        })
    };
    let on_overlay = {
        let defaults = d.clone();
        let cb = props.on_defaults.clone();
        Callback::from(move |e: Event| {
            let Some(sel) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            if let Some(overlay_type) = overlay_from_key(&sel.value()) {
                cb.emit(GridDefaults { overlay_type, ..defaults.clone() });
            }
        })
    };
    let on_scrambled = {
        let defaults = d.clone();
        let cb = props.on_defaults.clone();
        Callback::from(move |_| {
            cb.emit(GridDefaults {
                scrambled: !defaults.scrambled,
                ..defaults.clone()
            })
        })
    };
    let design_cb = {
        let cb = props.on_design.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear_cb = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <h3 style="margin:0; font-size:15px;">{"Card Grid"}</h3>
        <div style="display:flex; gap:8px; flex-wrap:wrap;">
            { number_field("Rows", d.rows as i64, 1, d, &props.on_defaults, |g, n| g.rows = n as usize) }
            { number_field("Cols", d.cols as i64, 1, d, &props.on_defaults, |g, n| g.cols = n as usize) }
            { number_field("Start", d.first_num, 1, d, &props.on_defaults, |g, n| g.first_num = n) }
        </div>
        <label style="display:flex; gap:6px; align-items:center; font-size:12px;">
            <span>{"Numbering"}</span>
            <select onchange={on_order}>
                <option value="column" selected={d.order == NumberOrder::Column}>{"Down columns"}</option>
                <option value="row" selected={d.order == NumberOrder::Row}>{"Across rows"}</option>
            </select>
        </label>
        <label style="display:flex; gap:6px; align-items:center; font-size:12px;">
            <span>{"Overlay"}</span>
            <select onchange={on_overlay}>
                { for [OverlayType::Both, OverlayType::Dab, OverlayType::Player].into_iter().map(|t| html!{
                    <option value={overlay_key(t)} selected={d.overlay_type == t}>{ overlay_label(t) }</option>
                }) }
            </select>
        </label>
        <label style="display:flex; gap:6px; align-items:center; font-size:12px; cursor:pointer;">
            <input type="checkbox" checked={d.scrambled} onclick={on_scrambled} />
            <span>{"Scrambled (enter numbers by hand)"}</span>
        </label>
        <div style="display:flex; gap:8px;">
            <button onclick={design_cb} disabled={!props.has_image}>{"Design Grid"}</button>
            <button onclick={clear_cb} disabled={props.grid.is_none()}>{"Clear Grid"}</button>
        </div>
        if !props.has_image {
            <div style="font-size:12px; opacity:0.7;">{"Upload a card image to design a grid."}</div>
        }
        if let Some(g) = props.grid.as_ref() {
            <div style="font-size:12px; opacity:0.8;">
                { format!("Current grid: {}x{}, {}, {} numbered cells", g.rows, g.cols, overlay_label(g.overlay_type), g.numbered_cell_count()) }
            </div>
        }
    </div>}
}
