use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::model::{ServerConfig, ServerKind};
use crate::services::client_for;
use crate::util::clog;

#[derive(Properties, PartialEq, Clone)]
pub struct LoginViewProps {
    /// Fired with a fully authenticated session config.
    pub on_login: Callback<ServerConfig>,
}

/// Server connection form. Builds an unauthenticated probe config, runs the
/// chosen backend's authenticate call and hands the resulting session up.
/// For Plex the password field carries the access token.
#[function_component(LoginView)]
pub fn login_view(props: &LoginViewProps) -> Html {
    let server_kind = use_state(|| ServerKind::Emby);
    let url = use_state(String::new);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);

    let input_value = |e: &InputEvent| {
        e.target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .map(|el| el.value())
            .unwrap_or_default()
    };

    let on_kind_change = {
        let server_kind = server_kind.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target().and_then(|t| t.dyn_into::<HtmlSelectElement>().ok()) {
                server_kind.set(match select.value().as_str() {
                    "plex" => ServerKind::Plex,
                    _ => ServerKind::Emby,
                });
            }
        })
    };
    let on_url = {
        let url = url.clone();
        Callback::from(move |e: InputEvent| url.set(input_value(&e)))
    };
    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| username.set(input_value(&e)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(input_value(&e)))
    };

    let submit = {
        let server_kind = server_kind.clone();
        let url = url.clone();
        let username = username.clone();
        let password = password.clone();
        let busy = busy.clone();
        let error = error.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy || url.is_empty() {
                return;
            }
            busy.set(true);
            error.set(None);
            let probe = ServerConfig {
                url: (*url).clone(),
                username: (*username).clone(),
                user_id: String::new(),
                token: String::new(),
                server_kind: *server_kind,
            };
            let user = (*username).clone();
            let pass = (*password).clone();
            let busy = busy.clone();
            let error = error.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                match client_for(&probe).authenticate(user, pass).await {
                    Ok(config) => on_login.emit(config),
                    Err(err) => {
                        clog(&format!("login failed: {err}"));
                        error.set(Some(
                            "Could not sign in. Check the address and credentials.".to_string(),
                        ));
                        busy.set(false);
                    }
                }
            });
        })
    };

    let field_style = "width:100%; box-sizing:border-box; padding:10px 12px; margin-bottom:12px; background:#18181b; color:#fff; border:1px solid #3f3f46; border-radius:8px; font-size:15px;";
    let is_plex = *server_kind == ServerKind::Plex;

    html! {<div style="position:fixed; inset:0; background:#000; display:flex; align-items:center; justify-content:center; padding:24px;">
        <form onsubmit={submit} style="width:100%; max-width:360px;">
            <h1 style="color:#fff; font-size:24px; font-weight:800; margin:0 0 4px 0;">{"Vertical Feed"}</h1>
            <p style="color:rgba(255,255,255,0.5); font-size:13px; margin:0 0 24px 0;">
                {"Sign in to your media server"}
            </p>

            <select onchange={on_kind_change} style={field_style}>
                <option value="emby" selected={!is_plex}>{"Emby / Jellyfin"}</option>
                <option value="plex" selected={is_plex}>{"Plex"}</option>
            </select>
            <input
                type="url"
                placeholder="Server address (https://...)"
                value={(*url).clone()}
                oninput={on_url}
                style={field_style}
            />
            { if !is_plex {
                html! { <input
                    type="text"
                    placeholder="Username"
                    value={(*username).clone()}
                    oninput={on_username}
                    style={field_style}
                /> }
            } else { html! {} } }
            <input
                type="password"
                placeholder={if is_plex { "Plex token" } else { "Password" }}
                value={(*password).clone()}
                oninput={on_password}
                style={field_style}
            />

            { if let Some(message) = (*error).clone() {
                html! { <p style="color:#ef4444; font-size:13px; margin:0 0 12px 0;">{ message }</p> }
            } else { html! {} } }

            <button
                type="submit"
                disabled={*busy}
                style="width:100%; padding:12px; background:#6366f1; color:#fff; border:none; border-radius:8px; font-size:15px; font-weight:700;"
            >
                { if *busy { "Signing in\u{2026}" } else { "Sign in" } }
            </button>
        </form>
    </div>}
}
