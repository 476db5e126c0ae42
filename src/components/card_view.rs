use std::cell::Cell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use web_sys::{Element, HtmlInputElement};
use yew::prelude::*;

use crate::game::{Session, SessionAction};
use crate::geometry::{DisplayRect, Point};
use crate::model::{Axis, CellValue};
use crate::overlay::{self, GlobalNames, LabelRect, OverlayGeometry};
use crate::state::{capture_pointer, GestureSlot, PointerSubscription, PreviewResize, PreviewSize, SharedSlot};
use crate::storage::{self, PREVIEW_SIZE_KEY, SHOW_EDITABLE_KEY};
use crate::util::{client_rect, clog, cwarn};

/// Image rectangle relative to the container, re-measured on load, window
/// resize, any scroll and mouseup. Returns the rect and a re-measure hook.
#[hook]
pub fn use_image_rect(container: NodeRef, image: NodeRef) -> (Option<DisplayRect>, Rc<dyn Fn()>) {
    let rect = use_state_eq(|| None::<DisplayRect>);
    let measure: Rc<dyn Fn()> = {
        let rect = rect.clone();
        Rc::new(move || {
            let next = match (container.cast::<Element>(), image.cast::<Element>()) {
                (Some(c), Some(i)) => Some(client_rect(&i).relative_to(&client_rect(&c))),
                _ => None,
            };
            if next.is_some_and(|r| r.is_empty()) {
                clog("card image not displayed yet; overlay hidden");
            }
            rect.set(next);
        })
    };
    {
        let measure = measure.clone();
        use_effect_with((), move |_| {
            let listeners = web_sys::window().map(|window| {
                let on = |event: &'static str, options: EventListenerOptions| {
                    let measure = measure.clone();
                    EventListener::new_with_options(&window, event, options, move |_| measure())
                };
                [
                    on("resize", EventListenerOptions::default()),
                    on("scroll", EventListenerOptions::run_in_capture_phase()),
                    on("mouseup", EventListenerOptions::default()),
                ]
            });
            measure();
            move || drop(listeners)
        });
    }
    (*rect, measure)
}

fn label_html(label: &LabelRect, full: bool, session: &UseReducerHandle<Session>) -> Html {
    let onclick = {
        let session = session.clone();
        let (axis, index) = (label.axis, label.index);
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            session.dispatch(SessionAction::ToggleLine { axis, index });
        })
    };
    let color = if full { "#d1242f" } else { "#012" };
    let rotate = if label.rotated() {
        " justify-content:center; transform:rotate(-90deg); transform-origin:center bottom;"
    } else {
        ""
    };
    let style = format!(
        "position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; align-items:center; padding:4px 6px; box-sizing:border-box; cursor:pointer; border-radius:4px; font-size:{}px; font-weight:{}; color:{}; white-space:nowrap; overflow:hidden;{}",
        label.left,
        label.top,
        label.width,
        label.height,
        label.font_px,
        if full { 700 } else { 500 },
        color,
        rotate
    );
    let key = format!("{:?}{}", label.axis, label.index);
    html! { <div {key} {onclick} {style}>{ label.name.clone() }</div> }
}

fn overlay_html(geo: &OverlayGeometry, session: &UseReducerHandle<Session>) -> Html {
    let dabbed = session.dabbed();
    let line_full = |axis: Axis, i: usize| dabbed.is_some_and(|d| d.line_full(axis, i));
    let b = &geo.bbox;
    html! {<div style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px;", b.x0, b.y0, b.width(), b.height())}>
        { for geo.cells.iter().map(|cell| {
            let (row, col) = (cell.row, cell.col);
            let marked = dabbed.is_some_and(|d| d.get(row, col));
            let onclick = {
                let session = session.clone();
                Callback::from(move |e: MouseEvent| {
                    e.stop_propagation();
                    session.dispatch(SessionAction::ClickCell { row, col });
                })
            };
            let style = format!(
                "position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; align-items:center; justify-content:center; cursor:pointer;",
                cell.left, cell.top, cell.width.floor().max(0.0), cell.height.floor().max(0.0)
            );
            let dot = cell.width.min(cell.height) * 0.8;
            html! {
                <div key={format!("{}-{}", row, col)} {onclick} {style}>
                    if marked {
                        <div style={format!("width:{dot}px; height:{dot}px; border-radius:50%; background:rgba(209,36,47,0.45); pointer-events:none;")}></div>
                    }
                </div>
            }
        }) }
        { for geo.row_labels.iter().map(|l| label_html(l, line_full(Axis::Row, l.index), session)) }
        { for geo.col_labels.iter().map(|l| label_html(l, line_full(Axis::Col, l.index), session)) }
    </div>}
}

/// Card numbers as editable inputs; clicking a cell dabs it in manual mode.
fn editable_grid(session: &UseReducerHandle<Session>) -> Html {
    let card = session.card();
    let dabbed = session.dabbed();
    let cols = card.cols();
    html! {<div style="display:flex; flex-direction:column; gap:6px; margin-top:12px;">
        { for card.0.iter().enumerate().map(|(r, row)| {
            let name = session
                .players_rows
                .get(r)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Row {}", r + 1));
            html! {
                <div key={r} style="display:flex; gap:8px; align-items:center;">
                    <strong style="width:90px; font-size:13px;">{ name }</strong>
                    <div style={format!("flex:1; display:grid; grid-template-columns:repeat({}, 1fr); gap:6px;", cols)}>
                        { for row.iter().enumerate().map(|(c, cell)| {
                            let marked = dabbed.is_some_and(|d| d.get(r, c));
                            let onclick = {
                                let session = session.clone();
                                Callback::from(move |_| session.dispatch(SessionAction::ClickCell { row: r, col: c }))
                            };
                            let onchange = {
                                let session = session.clone();
                                Callback::from(move |e: Event| {
                                    if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                                        session.dispatch(SessionAction::SetCell {
                                            row: r,
                                            col: c,
                                            value: CellValue::parse(&input.value()),
                                        });
                                    }
                                })
                            };
                            let bg = if marked { "#d1242f" } else { "#1c2128" };
                            let value = cell.as_ref().map(ToString::to_string).unwrap_or_default();
                            html! {
                                <div key={c} {onclick} style={format!("border:1px solid #30363d; border-radius:6px; padding:4px; background:{};", bg)}>
                                    <input {value} {onchange} style="width:100%; border:none; background:transparent; color:inherit; text-align:center;" />
                                </div>
                            }
                        }) }
                    </div>
                </div>
            }
        }) }
    </div>}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImageLoad {
    Pending,
    Loaded,
    Failed,
}

/// True when the card image cannot carry the overlay, so the value grid
/// has to stand in for it.
fn image_missing(load: ImageLoad, rect: Option<&DisplayRect>) -> bool {
    match load {
        ImageLoad::Pending => false,
        ImageLoad::Failed => true,
        ImageLoad::Loaded => rect.is_none_or(DisplayRect::is_empty),
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct CardViewProps {
    pub session: UseReducerHandle<Session>,
    pub image: Option<AttrValue>,
    #[prop_or(false)]
    pub fullscreen: bool,
}

#[function_component]
pub fn CardView(props: &CardViewProps) -> Html {
    let session = &props.session;
    let container_ref = use_node_ref();
    let image_ref = use_node_ref();
    let (image_rect, measure) = use_image_rect(container_ref.clone(), image_ref.clone());
    let show_editable = use_state(|| storage::load::<bool>(SHOW_EDITABLE_KEY).unwrap_or(false));
    let load = use_state_eq(|| ImageLoad::Pending);
    let size = use_state_eq(|| {
        storage::load::<PreviewSize>(PREVIEW_SIZE_KEY)
            .map(PreviewSize::sanitized)
            .unwrap_or_default()
    });
    let resize_slot: SharedSlot<PointerSubscription> = use_mut_ref(GestureSlot::default);
    {
        let load = load.clone();
        use_effect_with(props.image.clone(), move |_| {
            load.set(ImageLoad::Pending);
            || ()
        });
    }
    {
        // Runs after every render that changed the grid, the image or the
        // preview size, so each resize frame is measured once laid out.
        let measure = measure.clone();
        use_effect_with((session.grid().cloned(), props.image.clone(), *size), move |_| {
            measure();
            || ()
        });
    }
    let toggle_editable = {
        let show_editable = show_editable.clone();
        Callback::from(move |_| {
            let next = !*show_editable;
            storage::store(SHOW_EDITABLE_KEY, &next);
            show_editable.set(next);
        })
    };
    let title = if props.fullscreen { "Bingo Caller Pro" } else { "Card View" };
    let hint = if session.settings.auto_mode {
        "Auto dab is on; calls mark the card"
    } else {
        "Click cells to dab"
    };

    let Some(src) = props.image.clone() else {
        return html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:12px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0;">{ title }</h3>
                <span style="font-size:12px; opacity:0.7;">{ hint }</span>
            </div>
            { editable_grid(session) }
        </div>};
    };

    let onload = {
        let measure = measure.clone();
        let load = load.clone();
        Callback::from(move |_| {
            load.set(ImageLoad::Loaded);
            measure();
        })
    };
    let onerror = {
        let load = load.clone();
        Callback::from(move |_| {
            cwarn("card image failed to load; showing the number grid");
            load.set(ImageLoad::Failed);
        })
    };
    let on_resize_start = {
        let size = size.clone();
        let slot = resize_slot.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            let Some(el) = container_ref.cast::<Element>() else {
                return;
            };
            let drag = PreviewResize::begin(
                Point::new(e.client_x() as f64, e.client_y() as f64),
                el.client_width() as f64,
                el.client_height() as f64,
            );
            let latest = Rc::new(Cell::new(*size));
            let on_move = {
                let size = size.clone();
                let latest = latest.clone();
                move |me: &MouseEvent| {
                    let next = drag.size_at(Point::new(me.client_x() as f64, me.client_y() as f64));
                    latest.set(next);
                    size.set(next);
                }
            };
            capture_pointer(&slot, on_move, move || storage::store(PREVIEW_SIZE_KEY, &latest.get()));
        })
    };
    let reset_size = {
        let size = size.clone();
        Callback::from(move |_: MouseEvent| {
            storage::remove(PREVIEW_SIZE_KEY);
            size.set(PreviewSize::default());
        })
    };
    let names = GlobalNames {
        rows: &session.players_rows,
        cols: &session.players_cols,
    };
    let geometry = match (session.grid(), image_rect.as_ref()) {
        (Some(grid), Some(rect)) => overlay::render(grid, rect, names),
        _ => None,
    };
    let missing = image_missing(*load, image_rect.as_ref());
    let sized = !size.is_auto();
    let image_style = if sized {
        "max-width:100%; max-height:100%; width:auto; height:auto; display:block; border:1px solid #ddd;"
    } else {
        "max-width:100%; height:auto; display:block; border:1px solid #ddd;"
    };
    html! {<div style="background:rgba(6,34,58,0.95); border-radius:8px; padding:12px;">
        <div style="display:flex; justify-content:space-between; align-items:center; gap:8px;">
            <h3 style="margin:0; color:#fff;">{ title }</h3>
            <div style="display:flex; align-items:center; gap:8px; font-size:12px; color:#cbd5e1;">
                <span>{ hint }</span>
                if sized {
                    <button onclick={reset_size} style="font-size:12px;">{"Reset size"}</button>
                }
                <label style="display:flex; align-items:center; gap:6px; cursor:pointer;">
                    <input type="checkbox" checked={*show_editable} onclick={toggle_editable} />
                    <span>{"Show editable grid"}</span>
                </label>
            </div>
        </div>
        <div style="margin-top:8px;">
            <div ref={container_ref} style={format!("position:relative; display:inline-block; box-sizing:border-box;{}", size.style())}>
                <img ref={image_ref} {src} alt="Bingo card" {onload} {onerror} style={image_style} />
                if let Some(geo) = geometry.as_ref() {
                    { overlay_html(geo, session) }
                }
                <div
                    title="Drag to resize"
                    onmousedown={on_resize_start}
                    style="position:absolute; right:0; bottom:0; width:14px; height:14px; cursor:nwse-resize; background:linear-gradient(135deg, transparent 50%, rgba(203,213,225,0.8) 50%); z-index:2;"
                ></div>
            </div>
        </div>
        if missing {
            <div style="margin-top:8px; font-size:12px; color:#f0b429;">{"The card image can't be shown; edit the numbers below instead."}</div>
        }
        if *show_editable || missing {
            { editable_grid(session) }
        }
    </div>}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_grid_stands_in_for_an_unusable_image() {
        let shown = DisplayRect::new(0.0, 0.0, 400.0, 300.0);
        let collapsed = DisplayRect::new(0.0, 0.0, 0.0, 0.0);
        assert!(!image_missing(ImageLoad::Pending, None));
        assert!(!image_missing(ImageLoad::Loaded, Some(&shown)));
        assert!(image_missing(ImageLoad::Loaded, Some(&collapsed)));
        assert!(image_missing(ImageLoad::Loaded, None));
        assert!(image_missing(ImageLoad::Failed, Some(&shown)));
    }
}
