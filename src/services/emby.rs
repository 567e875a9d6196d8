//! Emby/Jellyfin-compatible client.
//!
//! Feed queries go through `/Users/{id}/Items`; favorites are modelled as a
//! per-library `Tok-` playlist so they survive across devices without any
//! custom server state.

use std::collections::HashSet;

use serde::Deserialize;

use super::{
    batch_size, clean_url, http_json, http_text, ClientFuture, MediaClient, MediaError,
};
use crate::model::{FeedType, Library, MediaItem, ServerConfig, ServerKind, VideoPage};
use crate::util::clog;

const CLIENT_NAME: &str = "TokFeed Web";
const CLIENT_VERSION: &str = "1.0.0";
const DEVICE_NAME: &str = "Web Browser";

#[derive(Clone)]
pub struct EmbyClient {
    config: ServerConfig,
}

#[derive(Deserialize)]
struct AuthUser {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Id")]
    id: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "User")]
    user: AuthUser,
    #[serde(rename = "AccessToken")]
    access_token: String,
}

#[derive(Deserialize, Default)]
struct ItemsEnvelope<T> {
    #[serde(rename = "Items", default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "TotalRecordCount", default)]
    total_record_count: usize,
}

#[derive(Deserialize)]
struct PlaylistEntry {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "PlaylistItemId", default)]
    playlist_item_id: Option<String>,
}

/// MediaBrowser authorization header; the token is appended once a session
/// exists so the same builder serves login and authenticated calls.
fn auth_header(config: &ServerConfig) -> String {
    let mut header = format!(
        "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"tokfeed-web-emby\", Version=\"{}\"",
        CLIENT_NAME, DEVICE_NAME, CLIENT_VERSION
    );
    if !config.token.is_empty() {
        header.push_str(&format!(", Token=\"{}\"", config.token));
    }
    header
}

fn headers(config: &ServerConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Content-Type", "application/json".to_string()),
        ("X-Emby-Authorization", auth_header(config)),
    ]
}

fn stream_url(config: &ServerConfig, item_id: &str) -> String {
    format!(
        "{}/Videos/{}/stream.mp4?Static=true&api_key={}",
        clean_url(&config.url),
        item_id,
        config.token
    )
}

fn image_url(config: &ServerConfig, item_id: &str, tag: &str) -> String {
    format!(
        "{}/Items/{}/Images/Primary?maxWidth=800&tag={}&quality=90",
        clean_url(&config.url),
        item_id,
        tag
    )
}

/// Favorites are paged client-side: portrait only, newest addition first.
fn page_favorites(items: Vec<MediaItem>, skip: usize, limit: usize) -> VideoPage {
    let mut portrait: Vec<MediaItem> = items.into_iter().filter(MediaItem::is_portrait).collect();
    portrait.reverse();
    let total = portrait.len();
    let paged: Vec<MediaItem> = portrait.into_iter().skip(skip).take(limit).collect();
    VideoPage {
        items: paged,
        next_start_index: skip + limit,
        total_count: total,
    }
}

async fn find_or_create_playlist(
    config: ServerConfig,
    library_name: String,
) -> Result<String, MediaError> {
    let base = clean_url(&config.url).to_string();
    let playlist_name = format!("Tok-{}", library_name);
    let headers = headers(&config);

    let search_url = format!(
        "{}/Users/{}/Items?IncludeItemTypes=Playlist&Recursive=true&Fields=Id,Name",
        base, config.user_id
    );
    if let Ok(found) = http_json::<ItemsEnvelope<PlaylistEntry>>("GET", &search_url, &headers, None)
        .await
    {
        if let Some(existing) = found.items.into_iter().find(|p| p.name == playlist_name) {
            return Ok(existing.id);
        }
    }

    let create_url = format!(
        "{}/Playlists?Name={}&UserId={}",
        base, playlist_name, config.user_id
    );
    let created: PlaylistEntry = http_json("POST", &create_url, &headers, None).await?;
    Ok(created.id)
}

/// Current contents of the library's Tok playlist. Failures degrade to an
/// empty list so a missing playlist never breaks the feed.
async fn playlist_items(config: ServerConfig, library_name: String) -> Vec<MediaItem> {
    let Ok(pid) = find_or_create_playlist(config.clone(), library_name).await else {
        return Vec::new();
    };
    let url = format!(
        "{}/Playlists/{}/Items?UserId={}&Fields=MediaSources,Width,Height,Overview,UserData",
        clean_url(&config.url),
        pid,
        config.user_id
    );
    match http_json::<ItemsEnvelope<MediaItem>>("GET", &url, &headers(&config), None).await {
        Ok(envelope) => envelope.items,
        Err(err) => {
            clog(&format!("playlist fetch failed: {}", err));
            Vec::new()
        }
    }
}

impl EmbyClient {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl MediaClient for EmbyClient {
    fn server_kind(&self) -> ServerKind {
        ServerKind::Emby
    }

    fn authenticate(&self, username: String, password: String) -> ClientFuture<ServerConfig> {
        let config = self.config.clone();
        Box::pin(async move {
            let url = format!("{}/Users/AuthenticateByName", clean_url(&config.url));
            let body = serde_json::json!({ "Username": username, "Pw": password }).to_string();
            let auth: AuthResponse = http_json("POST", &url, &headers(&config), Some(body))
                .await
                .map_err(|err| match err {
                    MediaError::Status(_) => MediaError::AuthFailed,
                    other => other,
                })?;
            Ok(ServerConfig {
                url: config.url,
                username: auth.user.name,
                user_id: auth.user.id,
                token: auth.access_token,
                server_kind: ServerKind::Emby,
            })
        })
    }

    fn libraries(&self) -> ClientFuture<Vec<Library>> {
        let config = self.config.clone();
        Box::pin(async move {
            let url = format!("{}/Users/{}/Views", clean_url(&config.url), config.user_id);
            let envelope: ItemsEnvelope<Library> =
                http_json("GET", &url, &headers(&config), None).await?;
            Ok(envelope.items)
        })
    }

    fn vertical_videos(
        &self,
        parent_id: Option<String>,
        library_name: String,
        feed_type: FeedType,
        skip: usize,
        limit: usize,
    ) -> ClientFuture<VideoPage> {
        let config = self.config.clone();
        Box::pin(async move {
            if feed_type == FeedType::Favorites {
                let items = playlist_items(config, library_name).await;
                return Ok(page_favorites(items, skip, limit));
            }

            let mut query = format!(
                "IncludeItemTypes=Movie,Video,Episode&Recursive=true\
                 &Fields=MediaSources,Width,Height,Overview,UserData\
                 &Limit={}&StartIndex={}&ImageTypeLimit=1\
                 &EnableImageTypes=Primary,Backdrop,Banner,Thumb&_t={}",
                batch_size(feed_type),
                skip,
                js_sys::Date::now() as u64
            );
            match feed_type {
                FeedType::Random => query.push_str("&SortBy=Random"),
                _ => query.push_str("&SortBy=DateCreated&SortOrder=Descending"),
            }
            if let Some(parent) = parent_id {
                query.push_str(&format!("&ParentId={}", parent));
            }

            let url = format!(
                "{}/Users/{}/Items?{}",
                clean_url(&config.url),
                config.user_id,
                query
            );
            let envelope: ItemsEnvelope<MediaItem> =
                http_json("GET", &url, &headers(&config), None).await?;

            let fetched = envelope.items.len();
            Ok(VideoPage {
                items: envelope
                    .items
                    .into_iter()
                    .filter(MediaItem::is_portrait)
                    .collect(),
                next_start_index: skip + fetched,
                total_count: envelope.total_record_count,
            })
        })
    }

    fn video_url(&self, item: &MediaItem) -> String {
        stream_url(&self.config, &item.id)
    }

    fn poster_url(&self, item: &MediaItem) -> Option<String> {
        let tag = item.primary_tag()?;
        Some(image_url(&self.config, &item.id, tag))
    }

    fn favorites(&self, library_name: String) -> ClientFuture<HashSet<String>> {
        let config = self.config.clone();
        Box::pin(async move {
            let items = playlist_items(config, library_name).await;
            Ok(items.into_iter().map(|item| item.id).collect())
        })
    }

    fn toggle_favorite(
        &self,
        item_id: String,
        is_favorite: bool,
        library_name: String,
    ) -> ClientFuture<()> {
        let config = self.config.clone();
        Box::pin(async move {
            let pid = find_or_create_playlist(config.clone(), library_name).await?;
            let base = clean_url(&config.url).to_string();
            let headers = headers(&config);

            if !is_favorite {
                let url = format!(
                    "{}/Playlists/{}/Items?Ids={}&UserId={}",
                    base, pid, item_id, config.user_id
                );
                http_text("POST", &url, &headers, None).await?;
                return Ok(());
            }

            // Removal needs the playlist entry id, not the item id.
            let url = format!(
                "{}/Playlists/{}/Items?Fields=Id,PlaylistItemId&UserId={}",
                base, pid, config.user_id
            );
            let entries: ItemsEnvelope<PlaylistEntry> =
                http_json("GET", &url, &headers, None).await?;
            if let Some(entry_id) = entries
                .items
                .into_iter()
                .find(|entry| entry.id == item_id)
                .and_then(|entry| entry.playlist_item_id)
            {
                let url = format!("{}/Playlists/{}/Items?EntryIds={}", base, pid, entry_id);
                http_text("DELETE", &url, &headers, None).await?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            url: "https://emby.local:8096/".into(),
            username: "u".into(),
            user_id: "uid1".into(),
            token: "tok123".into(),
            server_kind: ServerKind::Emby,
        }
    }

    fn portrait(id: &str) -> MediaItem {
        MediaItem {
            id: id.into(),
            width: Some(720),
            height: Some(1280),
            ..Default::default()
        }
    }

    #[test]
    fn stream_url_strips_trailing_slash_and_carries_token() {
        assert_eq!(
            stream_url(&config(), "42"),
            "https://emby.local:8096/Videos/42/stream.mp4?Static=true&api_key=tok123"
        );
    }

    #[test]
    fn image_url_requires_tag() {
        assert_eq!(
            image_url(&config(), "42", "abc"),
            "https://emby.local:8096/Items/42/Images/Primary?maxWidth=800&tag=abc&quality=90"
        );
    }

    #[test]
    fn auth_header_omits_token_before_login() {
        let mut cfg = config();
        cfg.token.clear();
        let header = auth_header(&cfg);
        assert!(!header.contains("Token="));
        assert!(auth_header(&config()).ends_with("Token=\"tok123\""));
    }

    #[test]
    fn favorites_page_is_reversed_and_portrait_only() {
        let landscape = MediaItem {
            id: "wide".into(),
            width: Some(1920),
            height: Some(1080),
            ..Default::default()
        };
        let items = vec![portrait("a"), landscape, portrait("b"), portrait("c")];
        let page = page_favorites(items, 0, 2);
        let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "b"]);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.next_start_index, 2);

        let rest = page_favorites(vec![portrait("a"), portrait("b"), portrait("c")], 2, 2);
        let ids: Vec<&str> = rest.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }
}
