use crate::state::InputClaim;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, PointerEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ProgressBarProps {
    /// Displayed position: the scrub preview while a drag is in flight,
    /// otherwise the mirrored playback position.
    pub position_secs: f64,
    pub duration_secs: f64,
    pub scrubbing: bool,
    pub claim: InputClaim,
    /// (pointer_x within the track, track width), emitted per pointer sample.
    pub on_scrub_start: Callback<(f64, f64)>,
    pub on_scrub_move: Callback<(f64, f64)>,
    pub on_scrub_end: Callback<()>,
}

/// Bottom progress track for long clips. The whole strip is a scrub surface;
/// its pointer handlers claim the event and stop propagation so the card's
/// gesture machine never competes with a scrub.
#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    let track_ref = use_node_ref();

    let sample = {
        let track_ref = track_ref.clone();
        move |e: &PointerEvent| -> Option<(f64, f64)> {
            let track = track_ref.cast::<HtmlElement>()?;
            let rect = track.get_bounding_client_rect();
            Some((e.client_x() as f64 - rect.left(), rect.width()))
        }
    };

    let on_down = {
        let claim = props.claim.clone();
        let cb = props.on_scrub_start.clone();
        let sample = sample.clone();
        Callback::from(move |e: PointerEvent| {
            e.stop_propagation();
            e.prevent_default();
            claim.claim();
            if let Some(target) = e.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
                let _ = target.set_pointer_capture(e.pointer_id());
            }
            if let Some(point) = sample(&e) {
                cb.emit(point);
            }
        })
    };
    let on_move = {
        let cb = props.on_scrub_move.clone();
        let sample = sample.clone();
        Callback::from(move |e: PointerEvent| {
            e.stop_propagation();
            if let Some(point) = sample(&e) {
                cb.emit(point);
            }
        })
    };
    let on_up = {
        let claim = props.claim.clone();
        let cb = props.on_scrub_end.clone();
        Callback::from(move |e: PointerEvent| {
            e.stop_propagation();
            claim.release();
            cb.emit(());
        })
    };

    let fraction = if props.duration_secs > 0.0 {
        (props.position_secs / props.duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let bar_height = if props.scrubbing { 8 } else { 4 };

    html! {<div
        ref={track_ref}
        onpointerdown={on_down}
        onpointermove={on_move}
        onpointerup={on_up.clone()}
        onpointercancel={on_up}
        style="position:absolute; bottom:0; left:0; right:0; height:20px; display:flex; align-items:flex-end; z-index:50; touch-action:none;"
    >
        <div style={format!("width:100%; height:{}px; background:rgba(255,255,255,0.2);", bar_height)}>
            <div style={format!("height:100%; width:{:.2}%; background:#6366f1;", fraction * 100.0)} />
        </div>
    </div>}
}
