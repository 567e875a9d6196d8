use crate::util::format_clock;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SeekBadgeProps {
    /// Pending relative offset in whole seconds; sign gives direction.
    pub offset_secs: i32,
    pub current_time: f64,
    pub duration: f64,
}

/// Drag-seek readout: direction arrow, signed offset and the projected
/// position over the clip length.
#[function_component(SeekBadge)]
pub fn seek_badge(props: &SeekBadgeProps) -> Html {
    let arrow = if props.offset_secs > 0 {
        "\u{23e9}"
    } else {
        "\u{23ea}"
    };
    let signed = if props.offset_secs > 0 {
        format!("+{}s", props.offset_secs)
    } else {
        format!("{}s", props.offset_secs)
    };
    let projected = (props.current_time + props.offset_secs as f64).max(0.0);
    html! {<div style="position:absolute; top:96px; left:0; right:0; display:flex; flex-direction:column; align-items:center; z-index:50; pointer-events:none;">
        <div style="display:flex; flex-direction:column; align-items:center; gap:8px; background:rgba(0,0,0,0.4); padding:16px 24px; border-radius:16px;">
            <span style="font-size:34px; color:rgba(255,255,255,0.9);">{ arrow }</span>
            <span style="font-size:24px; font-weight:700; color:#fff;">{ signed }</span>
            <span style="font-size:11px; color:rgba(255,255,255,0.7); font-family:monospace;">
                { format!("{} / {}", format_clock(projected), format_clock(props.duration)) }
            </span>
        </div>
    </div>}
}
