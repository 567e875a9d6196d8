use crate::model::MediaItem;
use crate::util::format_runtime_ticks;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct InfoPanelProps {
    pub item: MediaItem,
    pub expanded: bool,
    pub on_toggle: Callback<()>,
}

/// Bottom metadata drawer: title, year, runtime, type badge and the overview,
/// expandable to two thirds of the card. Text area does not claim touches, so
/// gestures keep working over it; only the explicit toggles do.
#[function_component(InfoPanel)]
pub fn info_panel(props: &InfoPanelProps) -> Html {
    let toggle = {
        let cb = props.on_toggle.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            cb.emit(());
        })
    };

    let container_style = if props.expanded {
        "position:absolute; bottom:0; left:0; right:0; height:66%; padding:16px; background:linear-gradient(to top, rgba(0,0,0,0.95), rgba(0,0,0,0.4), transparent);"
    } else {
        "position:absolute; bottom:0; left:0; right:0; padding:96px 16px 16px 16px; background:linear-gradient(to top, rgba(0,0,0,0.9), rgba(0,0,0,0.4), transparent);"
    };
    let overview_style = if props.expanded {
        "color:rgba(255,255,255,0.8); font-size:14px; overflow-y:auto; max-height:40vh; cursor:pointer;"
    } else {
        "color:rgba(255,255,255,0.8); font-size:14px; display:-webkit-box; -webkit-line-clamp:2; -webkit-box-orient:vertical; overflow:hidden; cursor:pointer;"
    };
    let item = &props.item;
    let overview = item.overview.clone().unwrap_or_else(|| "No overview".to_string());
    let has_overview = item.overview.is_some();

    html! {<div style={container_style}>
        <div style="display:flex; flex-direction:column; align-items:flex-start; max-width:80%;">
            <h3 style="color:#fff; font-weight:700; font-size:18px; margin:0 0 8px 0; line-height:1.2;">
                { item.name.clone() }
            </h3>
            <div style="display:flex; align-items:center; gap:12px; font-size:11px; color:rgba(255,255,255,0.9); margin-bottom:8px; font-weight:500;">
                { if let Some(year) = item.production_year {
                    html! { <span style="background:rgba(255,255,255,0.2); padding:2px 6px; border-radius:4px;">{ year }</span> }
                } else { html! {} } }
                <span>{ format_runtime_ticks(item.run_time_ticks) }</span>
                <span style="text-transform:uppercase; border:1px solid rgba(255,255,255,0.3); padding:0 4px; border-radius:4px; font-size:10px;">
                    { item.media_type.clone().unwrap_or_else(|| "Video".to_string()) }
                </span>
            </div>
            <div onclick={toggle.clone()} style={overview_style}>{ overview }</div>
            { if !props.expanded && has_overview {
                html! { <button onclick={toggle} style="background:none; border:none; color:rgba(255,255,255,0.6); font-size:11px; font-weight:600; margin-top:4px; padding:0;">{"More"}</button> }
            } else { html! {} } }
        </div>
    </div>}
}
