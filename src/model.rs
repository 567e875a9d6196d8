//! Core data models for the vertical video feed.
//! Item and library shapes follow the Emby wire format; the Plex client maps
//! its responses into these same types so the rest of the app is server-agnostic.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Emby,
    Plex,
}

/// Persisted session for one media server connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub username: String,
    pub user_id: String,
    pub token: String,
    pub server_kind: ServerKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedType {
    /// Newest first (DateCreated descending).
    Recent,
    /// Server-side random sort, larger fetch batches.
    Random,
    /// Playlist-backed favorites, newest additions first.
    Favorites,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageTags {
    #[serde(rename = "Primary")]
    pub primary: Option<String>,
}

/// One playable item. Width/Height drive the portrait filter; RunTimeTicks is
/// the legacy 100-nanosecond runtime unit shared by both backends.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaItem {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MediaType")]
    pub media_type: Option<String>,
    #[serde(rename = "Overview")]
    pub overview: Option<String>,
    #[serde(rename = "ProductionYear")]
    pub production_year: Option<u32>,
    #[serde(rename = "Width")]
    pub width: Option<u32>,
    #[serde(rename = "Height")]
    pub height: Option<u32>,
    #[serde(rename = "RunTimeTicks")]
    pub run_time_ticks: Option<u64>,
    #[serde(rename = "ImageTags")]
    pub image_tags: Option<ImageTags>,
    /// Raw Plex thumb path; Plex poster URLs are built from this, not from tags.
    #[serde(skip)]
    pub plex_thumb: Option<String>,
}

impl MediaItem {
    /// Feed eligibility: portrait-ish (height >= 80% of width) with known width.
    pub fn is_portrait(&self) -> bool {
        let w = self.width.unwrap_or(0) as f64;
        let h = self.height.unwrap_or(0) as f64;
        h >= w * 0.8 && w > 0.0
    }

    pub fn primary_tag(&self) -> Option<&str> {
        self.image_tags.as_ref()?.primary.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CollectionType")]
    pub collection_type: Option<String>,
}

/// One page of a paginated feed query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoPage {
    pub items: Vec<MediaItem>,
    pub next_start_index: usize,
    pub total_count: usize,
}

// ---------------- Feed reducer & actions -----------------

/// Outer-feed state: the loaded item window, pagination cursor, favorites set
/// and the single active card index. Cards never mutate this directly.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedState {
    pub items: Vec<MediaItem>,
    pub next_start_index: usize,
    pub total_count: usize,
    pub feed_type: FeedType,
    pub library_id: Option<String>,
    pub library_name: String,
    pub favorites: HashSet<String>,
    pub active_index: usize,
    pub is_loading: bool,
    pub exhausted: bool,
}

impl FeedState {
    pub fn new(feed_type: FeedType) -> Self {
        Self {
            items: Vec::new(),
            next_start_index: 0,
            total_count: 0,
            feed_type,
            library_id: None,
            library_name: String::new(),
            favorites: HashSet::new(),
            active_index: 0,
            is_loading: false,
            exhausted: false,
        }
    }
}

#[derive(Clone, Debug)]
pub enum FeedAction {
    /// Switch feed type and/or library; clears the item window.
    Reset {
        feed_type: FeedType,
        library_id: Option<String>,
        library_name: String,
    },
    SetLoading(bool),
    PageLoaded(VideoPage),
    PageFailed,
    FavoritesLoaded(HashSet<String>),
    FavoriteToggled { id: String },
    SetActiveIndex(usize),
}

impl Reducible for FeedState {
    type Action = FeedAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use FeedAction::*;
        let mut new = (*self).clone();
        match action {
            Reset {
                feed_type,
                library_id,
                library_name,
            } => {
                new.items.clear();
                new.next_start_index = 0;
                new.total_count = 0;
                new.feed_type = feed_type;
                new.library_id = library_id;
                new.library_name = library_name;
                new.active_index = 0;
                new.is_loading = false;
                new.exhausted = false;
            }
            SetLoading(v) => {
                new.is_loading = v;
            }
            PageLoaded(page) => {
                // Pages can arrive filtered down to zero portrait items while the
                // server cursor still advanced; only a stalled cursor ends the feed.
                new.exhausted = page.next_start_index <= new.next_start_index
                    || (page.total_count > 0 && page.next_start_index >= page.total_count);
                new.next_start_index = page.next_start_index;
                new.total_count = page.total_count;
                new.items.extend(page.items);
                new.is_loading = false;
            }
            PageFailed => {
                new.is_loading = false;
            }
            FavoritesLoaded(set) => {
                new.favorites = set;
            }
            FavoriteToggled { id } => {
                if !new.favorites.remove(&id) {
                    new.favorites.insert(id);
                }
            }
            SetActiveIndex(i) => {
                new.active_index = i;
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, w: u32, h: u32) -> MediaItem {
        MediaItem {
            id: id.into(),
            name: id.into(),
            width: Some(w),
            height: Some(h),
            ..Default::default()
        }
    }

    #[test]
    fn portrait_filter_includes_near_square() {
        assert!(item("a", 1000, 800).is_portrait());
        assert!(item("b", 720, 1280).is_portrait());
        assert!(!item("c", 1920, 1080).is_portrait());
        assert!(!item("d", 0, 0).is_portrait());
    }

    #[test]
    fn page_load_appends_and_advances_cursor() {
        let mut state = Rc::new(FeedState::new(FeedType::Recent));
        state = state.reduce(FeedAction::PageLoaded(VideoPage {
            items: vec![item("a", 700, 900), item("b", 700, 900)],
            next_start_index: 50,
            total_count: 120,
        }));
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.next_start_index, 50);
        assert!(!state.exhausted);
        state = state.reduce(FeedAction::PageLoaded(VideoPage {
            items: vec![],
            next_start_index: 50,
            total_count: 120,
        }));
        assert!(state.exhausted);
    }

    #[test]
    fn favorite_toggle_round_trips() {
        let mut state = Rc::new(FeedState::new(FeedType::Recent));
        state = state.reduce(FeedAction::FavoriteToggled { id: "x".into() });
        assert!(state.favorites.contains("x"));
        state = state.reduce(FeedAction::FavoriteToggled { id: "x".into() });
        assert!(!state.favorites.contains("x"));
    }

    #[test]
    fn emby_item_json_shape_parses() {
        let raw = r#"{"Id":"42","Name":"Clip","MediaType":"Video","Width":720,
            "Height":1280,"RunTimeTicks":1200000000,"ImageTags":{"Primary":"abc"}}"#;
        let it: MediaItem = serde_json::from_str(raw).unwrap();
        assert_eq!(it.id, "42");
        assert_eq!(it.primary_tag(), Some("abc"));
        assert!(it.is_portrait());
    }
}
