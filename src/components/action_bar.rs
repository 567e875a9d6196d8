use crate::state::InputClaim;
use web_sys::TouchEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ActionBarProps {
    pub poster_url: Option<String>,
    pub is_favorite: bool,
    pub on_toggle_favorite: Callback<()>,
    pub is_muted: bool,
    pub on_toggle_mute: Callback<()>,
    pub on_toggle_info: Callback<()>,
    pub is_playing: bool,
    /// Shared with the card surface so taps here never start a gesture there.
    pub claim: InputClaim,
}

/// Right-edge overlay controls (favorite, info, mute disc).
///
/// Every control claims the touch at touchstart and fires its action at
/// touchend with the default suppressed, so neither the card's gesture
/// machine nor a trailing synthetic click can double-handle the tap.
#[function_component(ActionBar)]
pub fn action_bar(props: &ActionBarProps) -> Html {
    let claim_touch = {
        let claim = props.claim.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            claim.claim();
        })
    };
    let control_end = |action: Callback<()>| {
        let claim = props.claim.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            e.prevent_default();
            claim.release();
            action.emit(());
        })
    };
    // Desktop fallback; on touch the suppressed default means no click arrives.
    let control_click = |action: Callback<()>| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            action.emit(());
        })
    };
    // Interrupted control touch: release the claim, fire nothing. Without
    // this a touchcancel would leave the claim set and the card surface inert.
    let control_cancel = {
        let claim = props.claim.clone();
        Callback::from(move |e: TouchEvent| {
            e.stop_propagation();
            claim.release();
        })
    };

    let fav_color = if props.is_favorite {
        "color:#ef4444;"
    } else {
        "color:#fff;"
    };
    let disc_border = if props.is_muted {
        "border:4px solid rgba(239,68,68,0.8);"
    } else {
        "border:4px solid #27272a;"
    };
    let disc_anim = if props.is_playing {
        "animation:spin 4s linear infinite;"
    } else {
        ""
    };

    html! {<div style="position:absolute; right:8px; bottom:96px; display:flex; flex-direction:column; align-items:center; gap:24px; z-index:20;">
        <div style="width:48px; height:48px; border-radius:50%; border:2px solid #fff; overflow:hidden; background:#27272a;">
            { if let Some(url) = &props.poster_url {
                html! { <img src={url.clone()} style="width:100%; height:100%; object-fit:cover;" /> }
            } else {
                html! { <div style="width:100%; height:100%; display:flex; align-items:center; justify-content:center; background:#4f46e5; font-size:10px; color:#fff;">{"Media"}</div> }
            } }
        </div>

        <div style="display:flex; flex-direction:column; align-items:center; gap:4px;">
            <button
                ontouchstart={claim_touch.clone()}
                ontouchend={control_end(props.on_toggle_favorite.clone())}
                ontouchcancel={control_cancel.clone()}
                onclick={control_click(props.on_toggle_favorite.clone())}
                style={format!("background:none; border:none; font-size:30px; {}", fav_color)}
            >{ if props.is_favorite { "\u{2764}" } else { "\u{2661}" } }</button>
            <span style="color:#fff; font-size:11px; font-weight:700;">
                { if props.is_favorite { "Liked" } else { "Like" } }
            </span>
        </div>

        <div style="display:flex; flex-direction:column; align-items:center; gap:4px;">
            <button
                ontouchstart={claim_touch.clone()}
                ontouchend={control_end(props.on_toggle_info.clone())}
                ontouchcancel={control_cancel.clone()}
                onclick={control_click(props.on_toggle_info.clone())}
                style="background:rgba(255,255,255,0.1); border:none; border-radius:50%; width:42px; height:42px; color:#fff; font-size:20px;"
            >{"\u{2139}"}</button>
            <span style="color:#fff; font-size:11px; font-weight:700;">{"Info"}</span>
        </div>

        <div
            ontouchstart={claim_touch}
            ontouchend={control_end(props.on_toggle_mute.clone())}
            ontouchcancel={control_cancel}
            onclick={control_click(props.on_toggle_mute.clone())}
            style={format!("margin-top:16px; width:40px; height:40px; border-radius:50%; background:#18181b; overflow:hidden; display:flex; align-items:center; justify-content:center; cursor:pointer; {} {}", disc_border, disc_anim)}
        >
            { if let Some(url) = &props.poster_url {
                html! { <img src={url.clone()} style="width:100%; height:100%; object-fit:cover; opacity:0.7;" /> }
            } else {
                html! { <span style="color:#71717a; font-size:18px;">{"\u{25cf}"}</span> }
            } }
        </div>
    </div>}
}
