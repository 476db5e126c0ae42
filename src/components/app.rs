use yew::prelude::*;

use super::{
    ball_picker::{BallBoard, BallPicker},
    card_view::CardView,
    confirm_modal::ConfirmModal,
    dab_overlay_controls::DabOverlayControls,
    grid_designer::GridDesigner,
    image_uploader::ImageUploader,
    player_list::PlayerList,
    win_modal::WinModal,
};
use crate::extract::card_from_text;
use crate::game::{ActiveView, CelebrationLatch, GameMode, Session, SessionAction};
use crate::model::{Axis, Card, Grid, GridDefaults, Settings};
use crate::storage::{self, Stored};
use crate::util::{clog, cwarn};

/// Callback dispatching a fixed action, whatever the event.
fn send<E: 'static>(session: &UseReducerHandle<Session>, action: SessionAction) -> Callback<E> {
    let session = session.clone();
    Callback::from(move |_| session.dispatch(action.clone()))
}

#[function_component]
pub fn App() -> Html {
    let stored = use_memo((), |_| storage::load_all());
    let session = {
        let stored = stored.clone();
        use_reducer(move || {
            let Stored {
                card,
                dabbed,
                called,
                settings,
                grid,
                players_rows,
                players_cols,
                ..
            } = (*stored).clone();
            Session::restore(card, dabbed, called, grid, settings).with_players(players_rows, players_cols)
        })
    };
    let defaults = use_state(|| stored.defaults.clone());
    let image = use_state(|| storage::load::<String>(storage::IMAGE_KEY));
    let designer_open = use_state(|| false);
    let show_win = use_state(|| false);
    let latch = use_mut_ref(CelebrationLatch::default);

    // Persist each record when it changes.
    use_effect_with(session.card().clone(), |card| {
        storage::store(storage::CARD_KEY, card);
        || ()
    });
    use_effect_with(session.dabbed().cloned(), |dabbed| {
        storage::store(storage::DABBED_KEY, dabbed);
        || ()
    });
    use_effect_with(session.calls().called().to_vec(), |called| {
        storage::store(storage::CALLED_KEY, called);
        || ()
    });
    use_effect_with(session.settings, |settings| {
        storage::store(storage::SETTINGS_KEY, settings);
        || ()
    });
    use_effect_with(session.grid().cloned(), |grid| {
        storage::store(storage::GRID_KEY, grid);
        || ()
    });
    use_effect_with(session.players_rows.clone(), |names| {
        storage::store(storage::PLAYERS_ROWS_KEY, names);
        || ()
    });
    use_effect_with(session.players_cols.clone(), |names| {
        storage::store(storage::PLAYERS_COLS_KEY, names);
        || ()
    });
    use_effect_with((*defaults).clone(), |defaults| {
        storage::store(storage::GRID_DEFAULTS_KEY, defaults);
        || ()
    });
    use_effect_with((*image).clone(), |image| {
        match image {
            Some(url) => storage::store(storage::IMAGE_KEY, url),
            None => storage::remove(storage::IMAGE_KEY),
        }
        || ()
    });

    // Celebrate each new winner once.
    {
        let latch = latch.clone();
        let show_win = show_win.clone();
        let sound = session.settings.sound_enabled;
        use_effect_with(session.winner().cloned(), move |winner| {
            if latch.borrow_mut().should_fire(winner.as_ref()) {
                if let Some(w) = winner {
                    clog(&format!("celebrating: {} (sound {})", w.message(), if sound { "on" } else { "off" }));
                }
                show_win.set(true);
            } else if winner.is_none() {
                show_win.set(false);
            }
            || ()
        });
    }

    let toggle_auto = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            session.dispatch(SessionAction::SetSettings(Settings {
                auto_mode: !session.settings.auto_mode,
                ..session.settings
            }))
        })
    };
    let toggle_sound = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            session.dispatch(SessionAction::SetSettings(Settings {
                sound_enabled: !session.settings.sound_enabled,
                ..session.settings
            }))
        })
    };
    // A new picture is a new card: start from a blank one and a fresh game.
    let on_image = {
        let image = image.clone();
        let session = session.clone();
        Callback::from(move |url: String| {
            session.dispatch(SessionAction::LoadCard(Card::default()));
            image.set(Some(url));
        })
    };
    let on_remove_image = {
        let image = image.clone();
        Callback::from(move |_| image.set(None))
    };
    let on_text = {
        let session = session.clone();
        Callback::from(move |text: String| match card_from_text(&text) {
            Some(card) => session.dispatch(SessionAction::LoadCard(card)),
            None => cwarn("no numbers found in card text"),
        })
    };
    let on_defaults = {
        let defaults = defaults.clone();
        Callback::from(move |d: GridDefaults| defaults.set(d))
    };
    let open_designer = {
        let designer_open = designer_open.clone();
        Callback::from(move |_| designer_open.set(true))
    };
    let close_designer = {
        let designer_open = designer_open.clone();
        Callback::from(move |_| designer_open.set(false))
    };
    let on_save_grid = {
        let session = session.clone();
        let designer_open = designer_open.clone();
        Callback::from(move |grid: Grid| {
            session.dispatch(SessionAction::SaveGrid(grid));
            designer_open.set(false);
        })
    };
    let on_names = {
        let session = session.clone();
        Callback::from(move |(axis, names): (Axis, Vec<String>)| {
            session.dispatch(SessionAction::SetPlayers { axis, names })
        })
    };
    let on_show = {
        let defaults = defaults.clone();
        Callback::from(move |(axis, show): (Axis, bool)| {
            let mut next = (*defaults).clone();
            match axis {
                Axis::Row => next.show_player_rows = show,
                Axis::Col => next.show_player_cols = show,
            }
            defaults.set(next);
        })
    };
    let close_win = {
        let show_win = show_win.clone();
        Callback::from(move |_| show_win.set(false))
    };

    let (row_count, col_count) = session
        .grid()
        .map_or((defaults.rows, defaults.cols), |g| (g.rows, g.cols));
    let running = session.mode == GameMode::Running;

    let header = html! {
        <div style="display:flex; align-items:center; gap:10px; padding:10px 14px; border-bottom:1px solid #30363d;">
            <strong style="font-size:18px; margin-right:auto;">{"Bingo Caller Pro"}</strong>
            <button onclick={toggle_auto}>{ if session.settings.auto_mode { "Auto: On" } else { "Auto: Off" } }</button>
            <button onclick={toggle_sound}>{ if session.settings.sound_enabled { "Sound: On" } else { "Sound: Off" } }</button>
            if running {
                <button onclick={send(&session, SessionAction::SetView(ActiveView::Card))} disabled={session.view == ActiveView::Card}>{"Card"}</button>
                <button onclick={send(&session, SessionAction::SetView(ActiveView::Ball))} disabled={session.view == ActiveView::Ball}>{"Ball"}</button>
                <button onclick={send(&session, SessionAction::StopGame)}>{"Stop"}</button>
            } else {
                <button onclick={send(&session, SessionAction::StartGame)} style="background:#238636; border:1px solid #2ea043; color:#fff;">{"Game On"}</button>
            }
        </div>
    };

    let body = if running {
        match session.view {
            ActiveView::Card => html! {
                <div style="position:fixed; inset:0; top:52px; overflow:auto; background:rgba(6,34,58,0.95); z-index:30; padding:12px;">
                    <CardView session={session.clone()} image={(*image).clone().map(AttrValue::from)} fullscreen={true} />
                </div>
            },
            ActiveView::Ball => html! {
                <BallBoard session={session.clone()} on_back={send(&session, SessionAction::SetView(ActiveView::Card))} />
            },
        }
    } else {
        html! {
            <div style="display:flex; gap:14px; padding:14px; align-items:flex-start; flex-wrap:wrap;">
                <div style="width:320px; display:flex; flex-direction:column; gap:12px;">
                    <ImageUploader on_image={on_image} on_text={on_text} has_image={image.is_some()} on_remove={on_remove_image} />
                    <DabOverlayControls
                        defaults={(*defaults).clone()}
                        grid={session.grid().cloned()}
                        has_image={image.is_some()}
                        on_defaults={on_defaults}
                        on_design={open_designer}
                        on_clear={send(&session, SessionAction::ClearGrid)}
                    />
                    <PlayerList
                        rows={session.players_rows.clone()}
                        cols={session.players_cols.clone()}
                        {row_count}
                        {col_count}
                        show_rows={defaults.show_player_rows}
                        show_cols={defaults.show_player_cols}
                        on_names={on_names.clone()}
                        {on_show}
                    />
                    <BallPicker session={session.clone()} />
                </div>
                <div style="flex:1; min-width:320px;">
                    <CardView session={session.clone()} image={(*image).clone().map(AttrValue::from)} />
                </div>
            </div>
        }
    };

    let designer = match (&*image, *designer_open) {
        (Some(url), true) => html! {
            <GridDesigner
                image={AttrValue::from(url.clone())}
                grid={session.grid().cloned()}
                defaults={(*defaults).clone()}
                players_rows={session.players_rows.clone()}
                players_cols={session.players_cols.clone()}
                on_save={on_save_grid}
                on_cancel={close_designer}
                {on_names}
            />
        },
        _ => html! {},
    };

    let start_warning = session.pending_start.as_ref().map(|w| w.message()).unwrap_or_default();

    html! {<div style="min-height:100vh; background:#0d1117; color:#c9d1d9; font-family:system-ui, sans-serif;">
        { header }
        { body }
        { designer }
        <ConfirmModal
            show={session.pending_start.is_some()}
            title="Start game?"
            confirm_label="Start anyway"
            on_confirm={send(&session, SessionAction::ConfirmStart)}
            on_cancel={send(&session, SessionAction::CancelStart)}
        >
            { start_warning }
        </ConfirmModal>
        <WinModal winner={session.winner().cloned()} show={*show_win} on_close={close_win} />
    </div>}
}
