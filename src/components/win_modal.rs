use yew::prelude::*;

use super::confirm_modal::ConfirmModal;
use crate::model::WinnerResult;

#[derive(Properties, PartialEq, Clone)]
pub struct WinModalProps {
    pub winner: Option<WinnerResult>,
    pub show: bool,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn WinModal(props: &WinModalProps) -> Html {
    let Some(winner) = props.winner.as_ref().filter(|_| props.show) else {
        return html! {};
    };
    html! {
        <ConfirmModal
            show={true}
            title="Bingo!"
            confirm_label="OK"
            cancel_label="Close"
            on_confirm={props.on_close.clone()}
            on_cancel={props.on_close.clone()}
        >
            <div style="font-size:18px; font-weight:600; color:#f2cc60;">{ winner.message() }</div>
        </ConfirmModal>
    }
}
