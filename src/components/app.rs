use yew::prelude::*;

use super::{feed_view::FeedView, login_view::LoginView};
use crate::model::ServerConfig;
use crate::services::client_for;

const SESSION_KEY: &str = "vertical_feed_session";

fn load_session() -> Option<ServerConfig> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

fn store_session(config: Option<&ServerConfig>) {
    let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };
    match config {
        Some(config) => {
            if let Ok(raw) = serde_json::to_string(config) {
                let _ = storage.set_item(SESSION_KEY, &raw);
            }
        }
        None => {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

/// Root switch: restored or fresh session shows the feed, otherwise the login
/// form. The session client is built once per config and shared by identity.
#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(load_session);

    let client = use_memo((*session).clone(), |config| {
        config.as_ref().map(client_for)
    });

    let on_login = {
        let session = session.clone();
        Callback::from(move |config: ServerConfig| {
            store_session(Some(&config));
            session.set(Some(config));
        })
    };
    let on_logout = {
        let session = session.clone();
        Callback::from(move |_| {
            store_session(None);
            session.set(None);
        })
    };

    match (session.as_ref(), client.as_ref()) {
        (Some(config), Some(client)) => html! {
            <FeedView
                client={client.clone()}
                username={config.username.clone()}
                on_logout={on_logout}
            />
        },
        _ => html! { <LoginView on_login={on_login} /> },
    }
}
