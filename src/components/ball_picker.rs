use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use crate::game::{BallRng, JsRandom, Session, SessionAction};
use crate::model::Settings;

const DRAW_DELAY_MS: u32 = 600;

/// Delayed draw shared by the picker and the board. Returns the trigger and
/// whether a draw is in flight.
#[hook]
fn use_ball_draw(dispatcher: UseReducerDispatcher<Session>) -> (Rc<dyn Fn()>, bool) {
    let animating = use_state(|| false);
    let busy = use_mut_ref(|| false);
    let pending: Rc<RefCell<Option<Timeout>>> = use_mut_ref(|| None);
    let trigger: Rc<dyn Fn()> = {
        let animating = animating.clone();
        Rc::new(move || {
            if *busy.borrow() {
                return;
            }
            *busy.borrow_mut() = true;
            animating.set(true);
            let dispatcher = dispatcher.clone();
            let busy = busy.clone();
            let animating = animating.clone();
            let timeout = Timeout::new(DRAW_DELAY_MS, move || {
                *busy.borrow_mut() = false;
                animating.set(false);
                dispatcher.dispatch(SessionAction::Draw {
                    roll: JsRandom.next_f64(),
                });
            });
            *pending.borrow_mut() = Some(timeout);
        })
    };
    (trigger, *animating)
}

fn max_ball_input(
    session: &UseReducerHandle<Session>,
    text: &UseStateHandle<String>,
) -> (Callback<InputEvent>, Callback<()>) {
    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                text.set(input.value());
            }
        })
    };
    let commit = {
        let text = text.clone();
        let session = session.clone();
        Callback::from(move |_| match text.trim().parse::<u32>() {
            Ok(n) if n >= 1 => session.dispatch(SessionAction::SetSettings(Settings {
                max_ball: n,
                ..session.settings
            })),
            _ => text.set(session.settings.max_ball.to_string()),
        })
    };
    (on_input, commit)
}

#[derive(Properties, PartialEq, Clone)]
pub struct BallPickerProps {
    pub session: UseReducerHandle<Session>,
}

/// Compact picker for the side panel.
#[function_component]
pub fn BallPicker(props: &BallPickerProps) -> Html {
    let session = &props.session;
    let (draw, animating) = use_ball_draw(session.dispatcher());
    let max_text = use_state(|| session.settings.max_ball.to_string());
    {
        let max_text = max_text.clone();
        use_effect_with(session.settings.max_ball, move |max| {
            max_text.set(max.to_string());
            || ()
        });
    }
    let (on_max_input, commit_max) = max_ball_input(session, &max_text);
    let on_max_blur = {
        let commit = commit_max.clone();
        Callback::from(move |_: FocusEvent| commit.emit(()))
    };
    let on_max_key = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            commit_max.emit(());
        }
    });
    let toggle_auto = {
        let session = session.clone();
        Callback::from(move |_| {
            session.dispatch(SessionAction::SetSettings(Settings {
                auto_mode: !session.settings.auto_mode,
                ..session.settings
            }))
        })
    };
    let draw_cb = Callback::from(move |_| draw());
    let reset_cb = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::Reset))
    };
    let current = session.calls().current();
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <h3 style="margin:0; font-size:15px;">{"Ball Picker"}</h3>
        <div style="display:flex; gap:8px; align-items:center; flex-wrap:wrap;">
            <label>{"Max Balls:"}</label>
            <input type="number" min="1" value={(*max_text).clone()} oninput={on_max_input} onblur={on_max_blur} onkeydown={on_max_key} style="width:70px;" />
            <label style="display:flex; align-items:center; gap:4px; cursor:pointer;">
                <input type="checkbox" checked={session.settings.auto_mode} onclick={toggle_auto} />
                <span>{"Auto Dab"}</span>
            </label>
        </div>
        <div style="display:flex; gap:8px;">
            <button onclick={draw_cb} disabled={animating}>{ if animating { "Drawing..." } else { "Draw Ball" } }</button>
            <button onclick={reset_cb}>{"Reset Dabs"}</button>
        </div>
        <div>{"Current Ball: "}<strong style="font-size:20px;">{ current.map_or("-".to_string(), |n| n.to_string()) }</strong></div>
        <div style="display:flex; flex-wrap:wrap; gap:4px;">
            { for session.calls().called().iter().map(|n| html!{
                <span key={*n} style="min-width:26px; text-align:center; padding:2px 4px; border-radius:12px; background:#1c2128; border:1px solid #30363d; font-size:12px;">{ *n }</span>
            }) }
        </div>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct BallBoardProps {
    pub session: UseReducerHandle<Session>,
    pub on_back: Callback<()>,
}

/// Full-screen ball board; Space draws.
#[function_component]
pub fn BallBoard(props: &BallBoardProps) -> Html {
    let session = &props.session;
    let (draw, animating) = use_ball_draw(session.dispatcher());
    {
        let draw = draw.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "keydown", move |e| {
                    let Some(ke) = e.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let typing = ke.target().is_some_and(|t| {
                        t.dyn_ref::<HtmlInputElement>().is_some()
                            || t.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
                    });
                    if !typing && (ke.code() == "Space" || ke.key() == " ") {
                        ke.prevent_default();
                        draw();
                    }
                })
            });
            move || drop(listener)
        });
    }
    let max_ball = session.settings.max_ball;
    let current = session.calls().current();
    let called = session.calls().called();
    let draw_cb = Callback::from(move |_| draw());
    let reset_cb = {
        let session = session.clone();
        Callback::from(move |_| session.dispatch(SessionAction::Reset))
    };
    let toggle_auto = {
        let session = session.clone();
        Callback::from(move |_| {
            session.dispatch(SessionAction::SetSettings(Settings {
                auto_mode: !session.settings.auto_mode,
                ..session.settings
            }))
        })
    };
    let back_cb = {
        let cb = props.on_back.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let glow = if animating {
        "0 0 24px rgba(255,255,255,0.9)"
    } else {
        "0 8px 24px rgba(0,0,0,0.6)"
    };
    html! {<div style="position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:#0d1117; z-index:40;">
        <div style="width:100%; max-width:1100px; display:flex; gap:20px; align-items:flex-start; padding:18px; flex-wrap:wrap;">
            <div style="width:320px;">
                <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:8px;">
                    <strong>{"Balls in Play"}</strong>
                    <span style="font-size:12px; opacity:0.7;">{ format!("{}/{}", called.len(), max_ball) }</span>
                </div>
                <div style="display:grid; grid-template-columns:repeat(10, 1fr); gap:6px;">
                    { for (1..=max_ball).map(|n| {
                        let is_current = current == Some(n);
                        let was_called = called.contains(&n);
                        let style = if is_current {
                            "height:30px; display:flex; align-items:center; justify-content:center; border-radius:6px; font-size:12px; font-weight:700; background:#f2cc60; color:#111; border:2px solid #bb8009;"
                        } else if was_called {
                            "height:30px; display:flex; align-items:center; justify-content:center; border-radius:6px; font-size:12px; font-weight:700; background:#1f6feb; color:#fff; border:1px solid #388bfd;"
                        } else {
                            "height:30px; display:flex; align-items:center; justify-content:center; border-radius:6px; font-size:12px; font-weight:700; background:#161b22; border:1px solid #30363d;"
                        };
                        html!{ <div key={n} style={style}>{ n }</div> }
                    }) }
                </div>
            </div>
            <div style="flex:1; display:flex; flex-direction:column; align-items:center; gap:14px;">
                <div style="display:flex; align-items:center; gap:12px;">
                    <span style="font-size:20px;">{"Bingo Draw"}</span>
                    <button onclick={toggle_auto}>{ if session.settings.auto_mode { "Auto: On" } else { "Auto: Off" } }</button>
                    <button onclick={back_cb}>{"Back to Card"}</button>
                </div>
                <div style={format!("width:240px; height:240px; display:flex; align-items:center; justify-content:center; border-radius:50%; background:#fff; color:#111; font-size:64px; box-shadow:{}; transition:box-shadow 300ms ease;", glow)}>
                    { current.map_or("-".to_string(), |n| n.to_string()) }
                </div>
                <div style="display:flex; gap:12px;">
                    <button onclick={draw_cb} disabled={animating}>{"Draw Next"}</button>
                    <button onclick={reset_cb}>{"Reset"}</button>
                </div>
                <div style="font-size:12px; opacity:0.7;">{ format!("Press Space to draw. Called: {}/{}", called.len(), max_ball) }</div>
            </div>
        </div>
    </div>}
}
