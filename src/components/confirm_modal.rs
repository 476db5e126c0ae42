use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ConfirmModalProps {
    pub show: bool,
    #[prop_or(AttrValue::from("Confirm"))]
    pub title: AttrValue,
    #[prop_or(AttrValue::from("Continue"))]
    pub confirm_label: AttrValue,
    #[prop_or(AttrValue::from("Cancel"))]
    pub cancel_label: AttrValue,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

#[function_component]
pub fn ConfirmModal(props: &ConfirmModalProps) -> Html {
    if !props.show {
        return html! {};
    }
    let confirm_cb = {
        let cb = props.on_confirm.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cancel_cb = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.6); z-index:100;">
        <div role="dialog" aria-modal="true" style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; width:460px; max-width:92%; display:flex; flex-direction:column; gap:12px;">
            <h3 style="margin:0; font-size:16px;">{ props.title.clone() }</h3>
            <div style="font-size:14px; line-height:1.4;">{ props.children.clone() }</div>
            <div style="display:flex; gap:8px; justify-content:flex-end;">
                <button onclick={cancel_cb} style="padding:6px 10px;">{ props.cancel_label.clone() }</button>
                <button onclick={confirm_cb} style="padding:6px 12px; background:#238636; border:1px solid #2ea043; color:#fff;">{ props.confirm_label.clone() }</button>
            </div>
        </div>
    </div>}
}
