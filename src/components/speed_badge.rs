use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SpeedBadgeProps {
    pub show: bool,
}

/// Top-center pill shown while the sustained press holds playback at 2x.
#[function_component(SpeedBadge)]
pub fn speed_badge(props: &SpeedBadgeProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {<div style="position:absolute; top:96px; left:0; right:0; display:flex; justify-content:center; z-index:50; pointer-events:none;">
        <div style="display:flex; align-items:center; gap:8px; background:rgba(0,0,0,0.6); padding:8px 16px; border-radius:999px;">
            <span style="color:#facc15; font-size:14px;">{"\u{26a1}"}</span>
            <span style="color:#fff; font-weight:700; font-size:13px;">{"2x speed"}</span>
            <span style="color:#fff; font-size:14px;">{"\u{00bb}"}</span>
        </div>
    </div>}
}
