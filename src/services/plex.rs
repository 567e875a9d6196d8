//! Plex-compatible client.
//!
//! Responses are mapped into the Emby-shaped common model at the edge so the
//! feed and card code never see Plex's container format. Direct connections
//! authenticate with an X-Plex-Token supplied as the password; plex.tv cloud
//! sign-in is out of scope.

use std::collections::HashSet;

use serde::Deserialize;

use super::{batch_size, clean_url, http_json, ClientFuture, MediaClient, MediaError};
use crate::model::{
    FeedType, ImageTags, Library, MediaItem, ServerConfig, ServerKind, VideoPage,
};
use crate::util::clog;

#[derive(Clone)]
pub struct PlexClient {
    config: ServerConfig,
}

#[derive(Deserialize, Default)]
struct SectionDirectory {
    #[serde(default)]
    key: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Deserialize, Default)]
struct PlexPart {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Deserialize, Default)]
struct PlexMetadata {
    #[serde(rename = "ratingKey", default)]
    rating_key: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    /// Runtime in milliseconds.
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    thumb: Option<String>,
    #[serde(rename = "Media", default)]
    media: Vec<PlexPart>,
}

#[derive(Deserialize, Default)]
struct MediaContainer<T> {
    #[serde(rename = "Directory", default = "Vec::new")]
    directory: Vec<SectionDirectory>,
    #[serde(rename = "Metadata", default = "Vec::new")]
    metadata: Vec<T>,
    #[serde(rename = "totalSize", default)]
    total_size: usize,
}

#[derive(Deserialize)]
struct ContainerEnvelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: MediaContainer<T>,
}

fn headers(config: &ServerConfig) -> Vec<(&'static str, String)> {
    vec![
        ("Accept", "application/json".to_string()),
        ("X-Plex-Token", config.token.clone()),
    ]
}

/// The only paths embedded in Plex URLs are fixed `/library/...` shapes, so
/// escaping the separators is the whole encoding job.
fn encode_path(path: &str) -> String {
    path.replace('/', "%2F").replace(':', "%3A")
}

/// Universal transcode endpoint; direct streaming with transcode fallback.
fn transcode_url(config: &ServerConfig, item_id: &str) -> String {
    format!(
        "{}/video/:/transcode/universal/start?path={}&mediaIndex=0&partIndex=0&protocol=hls\
         &offset=0&fastSeek=1&directPlay=0&directStream=1&subtitleSize=100&audioBoost=100\
         &X-Plex-Token={}",
        clean_url(&config.url),
        encode_path(&format!("/library/metadata/{}", item_id)),
        config.token
    )
}

fn photo_url(config: &ServerConfig, thumb_path: &str) -> String {
    format!(
        "{}/photo/:/transcode?url={}&width=800&height=1200&X-Plex-Token={}",
        clean_url(&config.url),
        encode_path(thumb_path),
        config.token
    )
}

fn map_item(meta: PlexMetadata) -> MediaItem {
    let part = meta.media.first();
    MediaItem {
        id: meta.rating_key,
        name: meta.title,
        media_type: Some("Video".to_string()),
        overview: meta.summary,
        production_year: meta.year,
        width: part.and_then(|p| p.width),
        height: part.and_then(|p| p.height),
        // Plex reports milliseconds; the shared model keeps 100ns ticks.
        run_time_ticks: meta.duration.map(|ms| ms * 10_000),
        image_tags: meta.thumb.as_ref().map(|_| ImageTags {
            primary: Some("true".to_string()),
        }),
        plex_thumb: meta.thumb,
    }
}

impl PlexClient {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl MediaClient for PlexClient {
    fn server_kind(&self) -> ServerKind {
        ServerKind::Plex
    }

    fn authenticate(&self, username: String, password: String) -> ClientFuture<ServerConfig> {
        let config = self.config.clone();
        Box::pin(async move {
            // The password field carries the X-Plex-Token for direct connects;
            // /identity is a cheap authenticated reachability check.
            let token = password;
            let url = format!("{}/identity", clean_url(&config.url));
            let probe = ServerConfig {
                url: config.url.clone(),
                username: String::new(),
                user_id: String::new(),
                token: token.clone(),
                server_kind: ServerKind::Plex,
            };
            http_json::<serde_json::Value>("GET", &url, &headers(&probe), None)
                .await
                .map_err(|err| match err {
                    MediaError::Status(_) => MediaError::AuthFailed,
                    other => other,
                })?;
            Ok(ServerConfig {
                url: config.url,
                username: if username.is_empty() {
                    "Plex User".to_string()
                } else {
                    username
                },
                // Local admin account; per-user accounts are not resolved here.
                user_id: "1".to_string(),
                token,
                server_kind: ServerKind::Plex,
            })
        })
    }

    fn libraries(&self) -> ClientFuture<Vec<Library>> {
        let config = self.config.clone();
        Box::pin(async move {
            let url = format!("{}/library/sections", clean_url(&config.url));
            let envelope: ContainerEnvelope<PlexMetadata> =
                http_json("GET", &url, &headers(&config), None).await?;
            Ok(envelope
                .media_container
                .directory
                .into_iter()
                .map(|dir| Library {
                    id: dir.key,
                    name: dir.title,
                    collection_type: dir.kind,
                })
                .collect())
        })
    }

    fn vertical_videos(
        &self,
        parent_id: Option<String>,
        _library_name: String,
        feed_type: FeedType,
        skip: usize,
        _limit: usize,
    ) -> ClientFuture<VideoPage> {
        let config = self.config.clone();
        Box::pin(async move {
            // Querying "all sections" is not a single request in Plex; without
            // a selected library the feed is simply empty.
            let Some(section) = parent_id else {
                return Ok(VideoPage::default());
            };
            let sort = match feed_type {
                FeedType::Random => "random",
                _ => "addedAt:desc",
            };
            let url = format!(
                "{}/library/sections/{}/all?type=1&sort={}\
                 &X-Plex-Container-Start={}&X-Plex-Container-Size={}",
                clean_url(&config.url),
                section,
                sort,
                skip,
                batch_size(feed_type)
            );
            let envelope: ContainerEnvelope<PlexMetadata> =
                http_json("GET", &url, &headers(&config), None).await?;
            let container = envelope.media_container;
            let fetched = container.metadata.len();
            Ok(VideoPage {
                items: container
                    .metadata
                    .into_iter()
                    .map(map_item)
                    .filter(MediaItem::is_portrait)
                    .collect(),
                next_start_index: skip + fetched,
                total_count: container.total_size,
            })
        })
    }

    fn video_url(&self, item: &MediaItem) -> String {
        transcode_url(&self.config, &item.id)
    }

    fn poster_url(&self, item: &MediaItem) -> Option<String> {
        let thumb = item.plex_thumb.as_deref()?;
        Some(photo_url(&self.config, thumb))
    }

    fn favorites(&self, _library_name: String) -> ClientFuture<HashSet<String>> {
        // Favorites are playlist-backed on Emby only; Plex sessions just see
        // an empty set.
        Box::pin(async move { Ok(HashSet::new()) })
    }

    fn toggle_favorite(
        &self,
        _item_id: String,
        _is_favorite: bool,
        _library_name: String,
    ) -> ClientFuture<()> {
        Box::pin(async move {
            clog("favorites are not supported on Plex sessions");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            url: "http://plex.local:32400/".into(),
            username: "u".into(),
            user_id: "1".into(),
            token: "plextok".into(),
            server_kind: ServerKind::Plex,
        }
    }

    #[test]
    fn transcode_url_embeds_encoded_metadata_path() {
        let url = transcode_url(&config(), "99");
        assert!(url.starts_with("http://plex.local:32400/video/:/transcode/universal/start?"));
        assert!(url.contains("path=%2Flibrary%2Fmetadata%2F99&"));
        assert!(url.ends_with("X-Plex-Token=plextok"));
    }

    #[test]
    fn photo_url_uses_raw_thumb_path() {
        let url = photo_url(&config(), "/library/metadata/99/thumb/1700000000");
        assert!(url.contains("url=%2Flibrary%2Fmetadata%2F99%2Fthumb%2F1700000000&"));
    }

    #[test]
    fn metadata_maps_into_common_model() {
        let raw = r#"{
            "ratingKey": "77", "title": "Clip", "summary": "s", "year": 2021,
            "duration": 120000, "thumb": "/library/metadata/77/thumb/1",
            "Media": [{"width": 720, "height": 1280}]
        }"#;
        let meta: PlexMetadata = serde_json::from_str(raw).unwrap();
        let item = map_item(meta);
        assert_eq!(item.id, "77");
        assert_eq!(item.run_time_ticks, Some(1_200_000_000));
        assert!(item.is_portrait());
        assert_eq!(item.primary_tag(), Some("true"));
        assert_eq!(item.plex_thumb.as_deref(), Some("/library/metadata/77/thumb/1"));
    }

    #[test]
    fn container_envelope_parses_sections() {
        let raw = r#"{"MediaContainer":{"Directory":[
            {"key":"3","title":"Shorts","type":"movie"}
        ]}}"#;
        let envelope: ContainerEnvelope<PlexMetadata> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.media_container.directory.len(), 1);
        assert_eq!(envelope.media_container.directory[0].key, "3");
    }
}
