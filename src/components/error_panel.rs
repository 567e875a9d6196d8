use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ErrorPanelProps {
    pub message: String,
}

/// Persistent full-surface panel for a failed video load. Sits over the
/// surface; the gesture layer underneath stays inert but alive.
#[function_component(ErrorPanel)]
pub fn error_panel(props: &ErrorPanelProps) -> Html {
    html! {<div style="position:absolute; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; background:#111827; color:#fff; padding:16px; z-index:10;">
        <span style="font-size:40px; color:#ef4444; margin-bottom:8px;">{"\u{26a0}"}</span>
        <p style="text-align:center; margin:0;">{ props.message.clone() }</p>
    </div>}
}
