//! Backend clients for the two supported media servers.
//!
//! Both servers expose the same informal capability set (paginated portrait
//! video listings, playable/poster URL resolution, favorites); [`MediaClient`]
//! makes that contract explicit and the app picks one variant per session.

pub mod emby;
pub mod plex;

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::model::{FeedType, Library, MediaItem, ServerConfig, ServerKind, VideoPage};

pub use emby::EmbyClient;
pub use plex::PlexClient;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("authentication failed")]
    AuthFailed,
    #[error("server returned status {0}")]
    Status(u16),
    #[error("network request failed: {0}")]
    Network(String),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MediaError {
    pub(crate) fn from_js(value: JsValue) -> Self {
        MediaError::Network(format!("{:?}", value))
    }
}

pub type ClientFuture<T> = Pin<Box<dyn Future<Output = Result<T, MediaError>>>>;

/// Capability interface over one media server. URL resolution is synchronous
/// (pure string building); everything else is a fetch.
pub trait MediaClient {
    fn server_kind(&self) -> ServerKind;

    fn authenticate(&self, username: String, password: String) -> ClientFuture<ServerConfig>;

    fn libraries(&self) -> ClientFuture<Vec<Library>>;

    /// One page of the portrait-filtered feed. `skip` is the server cursor
    /// from the previous page's `next_start_index`.
    fn vertical_videos(
        &self,
        parent_id: Option<String>,
        library_name: String,
        feed_type: FeedType,
        skip: usize,
        limit: usize,
    ) -> ClientFuture<VideoPage>;

    fn video_url(&self, item: &MediaItem) -> String;

    fn poster_url(&self, item: &MediaItem) -> Option<String>;

    fn favorites(&self, library_name: String) -> ClientFuture<HashSet<String>>;

    fn toggle_favorite(
        &self,
        item_id: String,
        is_favorite: bool,
        library_name: String,
    ) -> ClientFuture<()>;
}

/// Shared handle to the session client, comparable by identity so it can sit
/// inside component `Properties`.
#[derive(Clone)]
pub struct SharedClient(pub std::rc::Rc<dyn MediaClient>);

impl PartialEq for SharedClient {
    fn eq(&self, other: &Self) -> bool {
        std::rc::Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for SharedClient {
    type Target = dyn MediaClient;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

/// Build the session client once; the rest of the app only sees the trait.
pub fn client_for(config: &ServerConfig) -> SharedClient {
    match config.server_kind {
        ServerKind::Emby => SharedClient(std::rc::Rc::new(EmbyClient::new(config.clone()))),
        ServerKind::Plex => SharedClient(std::rc::Rc::new(PlexClient::new(config.clone()))),
    }
}

/// Per-type fetch batch sizes: random feeds over-fetch so the portrait filter
/// still leaves a usable page.
pub(crate) fn batch_size(feed_type: FeedType) -> usize {
    match feed_type {
        FeedType::Random => 80,
        _ => 50,
    }
}

pub(crate) fn clean_url(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// fetch + JSON decode. Non-2xx statuses surface as [`MediaError::Status`].
pub(crate) async fn http_json<T: DeserializeOwned>(
    method: &str,
    url: &str,
    headers: &[(&str, String)],
    body: Option<String>,
) -> Result<T, MediaError> {
    let text = http_text(method, url, headers, body).await?;
    Ok(serde_json::from_str(&text)?)
}

/// fetch without decoding; used for endpoints whose body we ignore.
pub(crate) async fn http_text(
    method: &str,
    url: &str,
    headers: &[(&str, String)],
    body: Option<String>,
) -> Result<String, MediaError> {
    let init = RequestInit::new();
    init.set_method(method);
    let header_map = Headers::new().map_err(MediaError::from_js)?;
    for (name, value) in headers {
        header_map.set(name, value).map_err(MediaError::from_js)?;
    }
    init.set_headers(&header_map);
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(&body));
    }

    let request = Request::new_with_str_and_init(url, &init).map_err(MediaError::from_js)?;
    let window = web_sys::window().ok_or_else(|| MediaError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(MediaError::from_js)?
        .dyn_into()
        .map_err(MediaError::from_js)?;

    if !response.ok() {
        return Err(MediaError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(MediaError::from_js)?)
        .await
        .map_err(MediaError::from_js)?;
    Ok(text.as_string().unwrap_or_default())
}
