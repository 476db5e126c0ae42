use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Element, HtmlInputElement};
use yew::prelude::*;

use crate::geometry::{DisplayRect, Point};
use crate::model::{Axis, Grid, GridDefaults, NumberOrder, OverlayType};
use crate::overlay::{col_label_size, row_label_size};
use crate::state::{capture_pointer, Designer, GestureSlot, PointerSubscription, SharedSlot};
use crate::util::client_rect;

#[derive(Properties, PartialEq, Clone)]
pub struct GridDesignerProps {
    pub image: AttrValue,
    pub grid: Option<Grid>,
    pub defaults: GridDefaults,
    pub players_rows: Vec<String>,
    pub players_cols: Vec<String>,
    pub on_save: Callback<Grid>,
    pub on_cancel: Callback<()>,
    /// Name edits made here are mirrored into the player list.
    pub on_names: Callback<(Axis, Vec<String>)>,
}

type SharedDesigner = Rc<RefCell<Designer>>;

fn input_text(e: &Event) -> Option<String> {
    e.target_dyn_into::<HtmlInputElement>().map(|i| i.value())
}

fn input_checked(e: &Event) -> Option<bool> {
    e.target_dyn_into::<HtmlInputElement>().map(|i| i.checked())
}

/// Container rect and image rect relative to it.
fn measure(container: &NodeRef, image: &NodeRef) -> Option<(DisplayRect, DisplayRect)> {
    let c = client_rect(&container.cast::<Element>()?);
    let i = client_rect(&image.cast::<Element>()?).relative_to(&c);
    Some((c, i))
}

fn local_point(container: &NodeRef, e: &MouseEvent) -> Option<(Point, DisplayRect)> {
    let rect = client_rect(&container.cast::<Element>()?);
    Some((
        Point::new(e.client_x() as f64 - rect.left, e.client_y() as f64 - rect.top),
        rect,
    ))
}

/// Callback that edits the designer and re-renders.
fn edit<E: 'static>(
    designer: &SharedDesigner,
    redraw: &UseForceUpdateHandle,
    f: impl Fn(&mut Designer, E) + 'static,
) -> Callback<E> {
    let designer = designer.clone();
    let redraw = redraw.clone();
    Callback::from(move |e: E| {
        f(&mut designer.borrow_mut(), e);
        redraw.force_update();
    })
}

/// Hands the rest of a drag to window listeners.
fn follow_drag(
    slot: &SharedSlot<PointerSubscription>,
    designer: &SharedDesigner,
    redraw: &UseForceUpdateHandle,
    on_move: impl Fn(&mut Designer, &MouseEvent) + 'static,
    on_up: impl Fn(&mut Designer) + 'static,
) {
    let (dm, rm) = (designer.clone(), redraw.clone());
    let (du, ru) = (designer.clone(), redraw.clone());
    capture_pointer(
        slot,
        move |e| {
            on_move(&mut dm.borrow_mut(), e);
            rm.force_update();
        },
        move || {
            on_up(&mut du.borrow_mut());
            ru.force_update();
        },
    );
}

fn along(axis: Axis, e: &MouseEvent) -> f64 {
    match axis {
        Axis::Row => e.client_y() as f64,
        Axis::Col => e.client_x() as f64,
    }
}

#[function_component]
pub fn GridDesigner(props: &GridDesignerProps) -> Html {
    let designer: SharedDesigner = use_mut_ref(|| Designer::new(&props.defaults, 0.0, 0.0));
    let seeded = use_mut_ref(|| false);
    let slot: SharedSlot<PointerSubscription> = use_mut_ref(GestureSlot::default);
    let redraw = use_force_update();
    let container_ref = use_node_ref();
    let image_ref = use_node_ref();
    let error = use_state(|| None::<String>);

    let on_image_load = {
        let designer = designer.clone();
        let seeded = seeded.clone();
        let redraw = redraw.clone();
        let (container_ref, image_ref) = (container_ref.clone(), image_ref.clone());
        let props = props.clone();
        Callback::from(move |_| {
            let Some((container, image)) = measure(&container_ref, &image_ref) else {
                return;
            };
            let mut d = designer.borrow_mut();
            if *seeded.borrow() {
                d.set_container(container.width, container.height);
            } else {
                *seeded.borrow_mut() = true;
                *d = match props.grid.as_ref() {
                    Some(g) => Designer::from_grid(g, &props.defaults, &image, container.width, container.height),
                    None => Designer::new(&props.defaults, container.width, container.height),
                };
                let rows = if props.players_rows.is_empty() {
                    d.player_names(Axis::Row).to_vec()
                } else {
                    props.players_rows.clone()
                };
                let cols = if props.players_cols.is_empty() {
                    d.player_names(Axis::Col).to_vec()
                } else {
                    props.players_cols.clone()
                };
                d.sync_player_names(&rows, &cols);
            }
            drop(d);
            redraw.force_update();
        })
    };

    let on_mouse_down = {
        let designer = designer.clone();
        let slot = slot.clone();
        let redraw = redraw.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            let Some((p, rect)) = local_point(&container_ref, &e) else {
                return;
            };
            {
                let mut d = designer.borrow_mut();
                d.set_container(rect.width, rect.height);
                if !d.pointer_down(p) {
                    return;
                }
            }
            e.prevent_default();
            let container = container_ref.clone();
            follow_drag(
                &slot,
                &designer,
                &redraw,
                move |d, me| {
                    if let Some((p, _)) = local_point(&container, me) {
                        d.pointer_move(p);
                    }
                },
                Designer::pointer_up,
            );
            redraw.force_update();
        })
    };

    let on_hover = {
        let designer = designer.clone();
        let slot = slot.clone();
        let redraw = redraw.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: MouseEvent| {
            if slot.borrow().is_active() {
                return;
            }
            let Some((p, _)) = local_point(&container_ref, &e) else {
                return;
            };
            let mut d = designer.borrow_mut();
            let before = d.editor().hover();
            d.pointer_move(p);
            if d.editor().hover() != before {
                drop(d);
                redraw.force_update();
            }
        })
    };

    // Leaving the surface ends any gesture and drops its window listeners.
    let on_leave = {
        let designer = designer.clone();
        let slot = slot.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            let held = slot.borrow_mut().end();
            designer.borrow_mut().end_gestures();
            if held {
                redraw.force_update();
            }
        })
    };

    let divider_down = |axis: Axis, index: usize| {
        let designer = designer.clone();
        let slot = slot.clone();
        let redraw = redraw.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            if !designer.borrow_mut().begin_divider_drag(axis, index, along(axis, &e)) {
                return;
            }
            follow_drag(
                &slot,
                &designer,
                &redraw,
                move |d, me| {
                    d.update_divider_drag(along(axis, me));
                },
                Designer::end_divider_drag,
            );
        })
    };

    // Row labels move horizontally, column labels vertically.
    let label_down = |axis: Axis| {
        let designer = designer.clone();
        let slot = slot.clone();
        let redraw = redraw.clone();
        let client = move |e: &MouseEvent| match axis {
            Axis::Row => e.client_x() as f64,
            Axis::Col => e.client_y() as f64,
        };
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            if !designer.borrow_mut().begin_label_drag(axis, client(&e)) {
                return;
            }
            follow_drag(
                &slot,
                &designer,
                &redraw,
                move |d, me| d.update_label_drag(client(me)),
                Designer::end_label_drag,
            );
        })
    };

    let snap = {
        let (container_ref, image_ref) = (container_ref.clone(), image_ref.clone());
        edit(&designer, &redraw, move |d, e: MouseEvent| {
            e.stop_propagation();
            if let Some((container, image)) = measure(&container_ref, &image_ref) {
                d.set_container(container.width, container.height);
                d.snap_to_image(&image);
            }
        })
    };
    let on_rows = edit(&designer, &redraw, |d, e: Event| {
        if let Some(n) = input_text(&e).and_then(|t| t.trim().parse::<usize>().ok()) {
            d.set_shape(n.clamp(1, 50), d.cols());
        }
    });
    let on_cols = edit(&designer, &redraw, |d, e: Event| {
        if let Some(n) = input_text(&e).and_then(|t| t.trim().parse::<usize>().ok()) {
            d.set_shape(d.rows(), n.clamp(1, 100));
        }
    });
    let on_first = edit(&designer, &redraw, |d, e: Event| {
        if let Some(n) = input_text(&e).and_then(|t| t.trim().parse::<i64>().ok()) {
            d.set_first(n);
        }
    });
    let order_cb = |order: NumberOrder| edit(&designer, &redraw, move |d, _: Event| d.set_order(order));
    let overlay_cb = |t: OverlayType| edit(&designer, &redraw, move |d, _: Event| d.overlay_type = t);
    let on_manual = edit(&designer, &redraw, |d, e: Event| {
        if let Some(checked) = input_checked(&e) {
            d.set_manual(checked);
        }
    });
    let on_show_rows = edit(&designer, &redraw, |d, e: Event| {
        if let Some(checked) = input_checked(&e) {
            d.show_rows = checked;
        }
    });
    let on_show_cols = edit(&designer, &redraw, |d, e: Event| {
        if let Some(checked) = input_checked(&e) {
            d.show_cols = checked;
        }
    });
    let on_row_offset = edit(&designer, &redraw, |d, e: Event| {
        if let Some(v) = input_text(&e).and_then(|t| t.trim().parse::<f64>().ok()) {
            d.row_offset = v;
        }
    });
    let on_col_offset = edit(&designer, &redraw, |d, e: Event| {
        if let Some(v) = input_text(&e).and_then(|t| t.trim().parse::<f64>().ok()) {
            d.col_offset = v;
        }
    });
    let reset_defaults = {
        let defaults = props.defaults.clone();
        edit(&designer, &redraw, move |d, _: MouseEvent| d.reset_defaults(&defaults))
    };
    let emit_names = {
        let on_names = props.on_names.clone();
        move |d: &Designer| {
            on_names.emit((Axis::Row, d.player_names(Axis::Row).to_vec()));
            on_names.emit((Axis::Col, d.player_names(Axis::Col).to_vec()));
        }
    };
    let populate_names = {
        let emit_names = emit_names.clone();
        edit(&designer, &redraw, move |d, _: MouseEvent| {
            d.populate_default_names();
            emit_names(d);
        })
    };
    let clear_names = {
        let emit_names = emit_names.clone();
        edit(&designer, &redraw, move |d, _: MouseEvent| {
            d.clear_names();
            emit_names(d);
        })
    };
    let name_input = |axis: Axis, index: usize| {
        let on_names = props.on_names.clone();
        edit(&designer, &redraw, move |d, e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                d.set_player_name(axis, index, input.value());
                on_names.emit((axis, d.player_names(axis).to_vec()));
            }
        })
    };
    let cell_input = |r: usize, c: usize| {
        edit(&designer, &redraw, move |d, e: Event| {
            if let Some(text) = input_text(&e) {
                d.set_cell(r, c, text.trim().parse::<i64>().ok());
            }
        })
    };
    let on_save = {
        let designer = designer.clone();
        let error = error.clone();
        let cb = props.on_save.clone();
        let (container_ref, image_ref) = (container_ref.clone(), image_ref.clone());
        Callback::from(move |_| {
            let Some((_, image)) = measure(&container_ref, &image_ref) else {
                error.set(Some("The card image is not displayed".to_string()));
                return;
            };
            let result = designer.borrow().build_grid(&image);
            match result {
                Ok(grid) => cb.emit(grid),
                Err(err) => error.set(Some(err.to_string())),
            }
        })
    };
    let cancel_cb = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let d = designer.borrow();
    let rows = d.rows();
    let cols = d.cols();
    let hover = d.editor().hover();
    let (cell_w, cell_h) = d.cell_size();
    let too_small = d.cell_too_small();
    let manual = d.numbering().is_manual();
    let with_players = d.overlay_type.includes_players();
    let values = d.numbering().values();
    let cursor = if hover.any() { hover.cursor() } else { "crosshair" };

    let preview = match (d.editor().bbox(), d.dividers()) {
        (Some(b), Some(div)) => {
            let rp = div.row_pos();
            let cp = div.col_pos();
            let box_style = if hover.any() {
                "border:3px solid #f59e0b; background:rgba(245,158,11,0.06); box-shadow:0 4px 12px rgba(245,158,11,0.12);"
            } else {
                "border:2px dashed #00a; background:rgba(0,160,255,0.08);"
            };
            html! {<>
                <div style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; box-sizing:border-box; overflow:hidden; pointer-events:none; {}", b.x0, b.y0, b.width(), b.height(), box_style)}>
                    <div style="position:absolute; left:6px; top:6px; background:rgba(255,255,255,0.92); padding:4px 6px; border-radius:3px; font-size:12px; color:#000;">
                        { format!("{} x {}, {}x{} px", rows, cols, cell_w.floor().max(0.0), cell_h.floor().max(0.0)) }
                    </div>
                </div>
                <div style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; pointer-events:none;", b.x0, b.y0, b.width(), b.height())}>
                    { for (0..rows).flat_map(|r| (0..cols).map(move |c| (r, c))).map(|(r, c)| {
                        let text = values.get(r).and_then(|row| row.get(c)).copied().flatten().map(|v| v.to_string()).unwrap_or_default();
                        html! {
                            <div key={format!("{}-{}", r, c)} style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; align-items:center; justify-content:center; font-size:16px; font-weight:700; color:#012;", cp[c], rp[r], (cp[c + 1] - cp[c]).max(0.0), (rp[r + 1] - rp[r]).max(0.0))}>{ text }</div>
                        }
                    }) }
                    { for (1..rows).map(|i| html! {
                        <div key={format!("r{}", i)} onmousedown={divider_down(Axis::Row, i)} style={format!("position:absolute; left:0; top:{}px; width:100%; height:4px; background:rgba(0,0,0,0.5); cursor:ns-resize; pointer-events:auto;", rp[i] - 2.0)}></div>
                    }) }
                    { for (1..cols).map(|i| html! {
                        <div key={format!("c{}", i)} onmousedown={divider_down(Axis::Col, i)} style={format!("position:absolute; top:0; left:{}px; height:100%; width:4px; background:rgba(0,0,0,0.5); cursor:ew-resize; pointer-events:auto;", cp[i] - 2.0)}></div>
                    }) }
                    if with_players && d.show_rows {
                        { for d.player_names(Axis::Row).iter().take(rows).enumerate().map(|(r, name)| {
                            let band = (rp[r + 1] - rp[r]).max(1.0);
                            let (w, h, font) = row_label_size(d.row_offset, band);
                            let top = (rp[r] + rp[r + 1]) / 2.0 - h / 2.0;
                            html! {
                                <div key={format!("pr{}", r)} onmousedown={label_down(Axis::Row)} style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; align-items:center; padding:4px 6px; box-sizing:border-box; color:#012; cursor:grab; font-size:{}px; pointer-events:auto; white-space:nowrap; overflow:hidden;", -d.row_offset, top, w, h, font)}>{ name.clone() }</div>
                            }
                        }) }
                    }
                    if with_players && d.show_cols {
                        { for d.player_names(Axis::Col).iter().take(cols).enumerate().map(|(c, name)| {
                            let band = (cp[c + 1] - cp[c]).max(1.0);
                            let (w, h, font) = col_label_size(d.col_offset, band);
                            let left = (cp[c] + cp[c + 1]) / 2.0 - w / 2.0;
                            html! {
                                <div key={format!("pc{}", c)} onmousedown={label_down(Axis::Col)} style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; display:flex; align-items:center; justify-content:center; padding:4px 6px; box-sizing:border-box; color:#012; cursor:grab; font-size:{}px; pointer-events:auto; transform:rotate(-90deg); transform-origin:center bottom; white-space:nowrap; overflow:hidden;", left, -d.col_offset - h + 8.0, w, h, font)}>{ name.clone() }</div>
                            }
                        }) }
                    }
                </div>
            </>}
        }
        _ => html! {},
    };

    let name_editors = |axis: Axis, title: &'static str| {
        html! {<>
            <div style="font-size:12px; font-weight:600; margin:6px 0;">{ title }</div>
            { for d.player_names(axis).iter().enumerate().map(|(i, name)| html! {
                <input key={i} value={name.clone()} oninput={name_input(axis, i)} style="width:100%; margin-bottom:6px;" />
            }) }
        </>}
    };

    html! {<div style="position:fixed; inset:0; background:rgba(0,0,0,0.4); z-index:90; display:flex; align-items:center; justify-content:center;">
        <div style="width:85vw; height:85vh; max-width:1200px; min-width:520px; min-height:360px; overflow:auto; background:#161b22; border:1px solid #30363d; border-radius:12px; padding:14px; box-sizing:border-box;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0;">{"Design Dab Grid"}</h3>
                <div style="display:flex; gap:8px;">
                    <button onclick={cancel_cb}>{"Cancel"}</button>
                    <button onclick={on_save} disabled={d.editor().bbox().is_none() || too_small} style="background:#238636; border:1px solid #2ea043; color:#fff;">{"Save Grid"}</button>
                </div>
            </div>
            if let Some(msg) = (*error).clone() {
                <div style="margin-top:6px; color:#f85149; font-size:12px;">{ msg }</div>
            }
            <div style="margin-top:8px; display:flex; gap:12px; align-items:stretch; height:calc(100% - 60px);">
                <div style="flex:1 1 auto; min-width:240px; overflow:auto; padding:120px 0 0 170px;">
                    <div ref={container_ref} onmousedown={on_mouse_down} onmousemove={on_hover} onmouseleave={on_leave} style={format!("position:relative; display:inline-block; user-select:none; cursor:{};", cursor)}>
                        <img ref={image_ref} src={props.image.clone()} alt="Design" onload={on_image_load} draggable="false" style="display:block; max-width:100%; max-height:70vh; object-fit:contain;" />
                        <div style="position:absolute; left:8px; top:8px; background:rgba(255,255,255,0.95); padding:6px 8px; border-radius:4px; font-size:12px; color:#111; max-width:260px;">
                            {"Click and drag to draw the grid box, then drag edges, dividers or labels to fine tune."}
                            <div style="margin-top:6px;"><button onmousedown={Callback::from(|e: MouseEvent| e.stop_propagation())} onclick={snap}>{"Snap to image"}</button></div>
                        </div>
                        { preview }
                    </div>
                </div>
                <div style="width:340px; flex:0 0 340px; display:flex; flex-direction:column; gap:8px; font-size:13px;">
                    <strong>{"Grid Size"}</strong>
                    <div style="display:flex; gap:8px;">
                        <label>{"Rows "}<input type="number" min="1" max="50" value={rows.to_string()} onchange={on_rows} style="width:70px;" /></label>
                        <label>{"Columns "}<input type="number" min="1" max="100" value={cols.to_string()} onchange={on_cols} style="width:70px;" /></label>
                    </div>
                    <strong>{"Numbering"}</strong>
                    <label><input type="radio" name="order" checked={d.numbering().order() == NumberOrder::Column} onchange={order_cb(NumberOrder::Column)} />{" Down columns"}</label>
                    <label><input type="radio" name="order" checked={d.numbering().order() == NumberOrder::Row} onchange={order_cb(NumberOrder::Row)} />{" Across rows"}</label>
                    <label><input type="checkbox" checked={manual} onchange={on_manual} />{" Scrambled grid (fill numbers by hand)"}</label>
                    if manual {
                        <div style="max-height:240px; overflow:auto; border:1px solid #30363d; padding:8px;">
                            { for (0..rows).map(|r| html! {
                                <div key={r} style="display:flex; gap:6px; margin-bottom:6px;">
                                    { for (0..cols).map(|c| {
                                        let v = values.get(r).and_then(|row| row.get(c)).copied().flatten().map(|v| v.to_string()).unwrap_or_default();
                                        html! { <input key={c} value={v} onchange={cell_input(r, c)} style="width:48px; text-align:center;" /> }
                                    }) }
                                </div>
                            }) }
                        </div>
                    } else {
                        <label>{"First number "}<input type="number" value={d.numbering().first().to_string()} onchange={on_first} style="width:100px;" /></label>
                    }
                    <div style="display:flex; gap:8px; align-items:center;">
                        <button onclick={reset_defaults}>{"Reset Defaults"}</button>
                        <span style={if too_small { "color:#f85149; font-size:12px;" } else { "opacity:0.7; font-size:12px;" }}>
                            { if too_small {
                                "Bounding box too small for this grid; enlarge the box".to_string()
                            } else {
                                format!("Cell size: {}x{} px", cell_w.floor().max(0.0), cell_h.floor().max(0.0))
                            } }
                        </span>
                    </div>
                    <strong>{"Overlay"}</strong>
                    <label><input type="radio" name="overlay" checked={d.overlay_type == OverlayType::Dab} onchange={overlay_cb(OverlayType::Dab)} />{" Dab overlay"}</label>
                    <label><input type="radio" name="overlay" checked={d.overlay_type == OverlayType::Player} onchange={overlay_cb(OverlayType::Player)} />{" Player overlay"}</label>
                    <label><input type="radio" name="overlay" checked={d.overlay_type == OverlayType::Both} onchange={overlay_cb(OverlayType::Both)} />{" Both"}</label>
                    if with_players {
                        <label><input type="checkbox" checked={d.show_rows} onchange={on_show_rows} />{" Show players in rows"}</label>
                        <label><input type="checkbox" checked={d.show_cols} onchange={on_show_cols} />{" Show players in columns"}</label>
                        <div style="max-height:220px; overflow:auto; border:1px solid #30363d; padding:8px;">
                            { name_editors(Axis::Row, "Player names for rows") }
                            { name_editors(Axis::Col, "Player names for columns") }
                            <div style="display:flex; gap:8px; margin-top:6px;">
                                <button onclick={populate_names}>{"Populate defaults"}</button>
                                <button onclick={clear_names}>{"Clear"}</button>
                            </div>
                        </div>
                        <div style="display:flex; gap:8px; font-size:12px;">
                            <label>{"Row label offset "}<input type="number" value={d.row_offset.to_string()} onchange={on_row_offset} style="width:70px;" /></label>
                            <label>{"Column label offset "}<input type="number" value={d.col_offset.to_string()} onchange={on_col_offset} style="width:70px;" /></label>
                        </div>
                    }
                </div>
            </div>
        </div>
    </div>}
}
