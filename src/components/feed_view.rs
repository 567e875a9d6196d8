use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlElement, HtmlSelectElement};
use yew::prelude::*;

use super::video_card::VideoCard;
use crate::model::{FeedAction, FeedState, FeedType, Library};
use crate::services::{batch_size, SharedClient};
use crate::util::clog;

/// How close to the end of the loaded window the active card may get before
/// the next page is requested.
const PREFETCH_AHEAD: usize = 3;

#[derive(Properties, PartialEq, Clone)]
pub struct FeedViewProps {
    pub client: SharedClient,
    pub username: String,
    pub on_logout: Callback<()>,
}

fn spawn_page_load(
    client: SharedClient,
    feed: UseReducerDispatcher<FeedState>,
    feed_type: FeedType,
    library_id: Option<String>,
    library_name: String,
    skip: usize,
) {
    feed.dispatch(FeedAction::SetLoading(true));
    spawn_local(async move {
        let limit = batch_size(feed_type);
        match client
            .vertical_videos(library_id, library_name, feed_type, skip, limit)
            .await
        {
            Ok(page) => feed.dispatch(FeedAction::PageLoaded(page)),
            Err(err) => {
                clog(&format!("feed page load failed: {err}"));
                feed.dispatch(FeedAction::PageFailed);
            }
        }
    });
}

fn spawn_favorites_load(
    client: SharedClient,
    feed: UseReducerDispatcher<FeedState>,
    library_name: String,
) {
    spawn_local(async move {
        match client.favorites(library_name).await {
            Ok(set) => feed.dispatch(FeedAction::FavoritesLoaded(set)),
            Err(err) => clog(&format!("favorites load failed: {err}")),
        }
    });
}

/// Vertical scroll-snap feed. Owns the item window, pagination cursor,
/// favorites set and the single active index; exactly one card is told it is
/// active, everything else stays paused at zero.
#[function_component(FeedView)]
pub fn feed_view(props: &FeedViewProps) -> Html {
    let feed = use_reducer(|| FeedState::new(FeedType::Recent));
    let libraries = use_state(Vec::<Library>::new);
    let muted = use_state(|| true);
    let container_ref = use_node_ref();

    // Initial load: libraries first, then the recent feed of the first one.
    {
        let client = props.client.clone();
        let feed = feed.dispatcher();
        let libraries = libraries.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let loaded = match client.libraries().await {
                    Ok(libs) => libs,
                    Err(err) => {
                        clog(&format!("library list failed: {err}"));
                        Vec::new()
                    }
                };
                let (library_id, library_name) = match loaded.first() {
                    Some(lib) => (Some(lib.id.clone()), lib.name.clone()),
                    None => (None, String::new()),
                };
                libraries.set(loaded);
                feed.dispatch(FeedAction::Reset {
                    feed_type: FeedType::Recent,
                    library_id: library_id.clone(),
                    library_name: library_name.clone(),
                });
                spawn_page_load(
                    client.clone(),
                    feed.clone(),
                    FeedType::Recent,
                    library_id,
                    library_name.clone(),
                    0,
                );
                spawn_favorites_load(client, feed, library_name);
            });
            || ()
        });
    }

    let reset_feed = {
        let client = props.client.clone();
        let feed = feed.dispatcher();
        move |feed_type: FeedType, library_id: Option<String>, library_name: String| {
            feed.dispatch(FeedAction::Reset {
                feed_type,
                library_id: library_id.clone(),
                library_name: library_name.clone(),
            });
            spawn_page_load(
                client.clone(),
                feed.clone(),
                feed_type,
                library_id,
                library_name.clone(),
                0,
            );
            spawn_favorites_load(client.clone(), feed.clone(), library_name);
        }
    };

    let select_feed_type = {
        let feed = feed.clone();
        let reset_feed = reset_feed.clone();
        Callback::from(move |feed_type: FeedType| {
            reset_feed(
                feed_type,
                feed.library_id.clone(),
                feed.library_name.clone(),
            );
        })
    };

    let on_library_change = {
        let feed = feed.clone();
        let libraries = libraries.clone();
        let reset_feed = reset_feed.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            else {
                return;
            };
            let id = select.value();
            let name = libraries
                .iter()
                .find(|l| l.id == id)
                .map(|l| l.name.clone())
                .unwrap_or_default();
            reset_feed(feed.feed_type, Some(id), name);
        })
    };

    // Active-card tracking plus end-of-window prefetch, both derived from the
    // snap container's scroll offset.
    let on_scroll = {
        let client = props.client.clone();
        let feed = feed.clone();
        Callback::from(move |e: Event| {
            let Some(container) = e.target().and_then(|t| t.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let height = container.client_height() as f64;
            if height <= 0.0 {
                return;
            }
            let index = (container.scroll_top() as f64 / height).round() as usize;
            if index != feed.active_index {
                feed.dispatch(FeedAction::SetActiveIndex(index));
            }
            if index + PREFETCH_AHEAD >= feed.items.len() && !feed.is_loading && !feed.exhausted {
                spawn_page_load(
                    client.clone(),
                    feed.dispatcher(),
                    feed.feed_type,
                    feed.library_id.clone(),
                    feed.library_name.clone(),
                    feed.next_start_index,
                );
            }
        })
    };

    let toggle_favorite = {
        let client = props.client.clone();
        let feed = feed.clone();
        Callback::from(move |id: String| {
            let was_favorite = feed.favorites.contains(&id);
            let library_name = feed.library_name.clone();
            // Optimistic flip; reverted if the server call fails.
            feed.dispatch(FeedAction::FavoriteToggled { id: id.clone() });
            let client = client.clone();
            let feed = feed.dispatcher();
            spawn_local(async move {
                if let Err(err) = client.toggle_favorite(id.clone(), was_favorite, library_name).await {
                    clog(&format!("favorite toggle failed: {err}"));
                    feed.dispatch(FeedAction::FavoriteToggled { id });
                }
            });
        })
    };

    let toggle_mute = {
        let muted = muted.clone();
        Callback::from(move |_| muted.set(!*muted))
    };

    let feed_button = |label: &str, ft: FeedType| {
        let select = select_feed_type.clone();
        let selected = feed.feed_type == ft;
        let style = if selected {
            "background:#fff; color:#000; border:none; border-radius:16px; padding:4px 12px; font-size:13px; font-weight:700;"
        } else {
            "background:rgba(255,255,255,0.15); color:#fff; border:none; border-radius:16px; padding:4px 12px; font-size:13px;"
        };
        html! {
            <button style={style} onclick={Callback::from(move |_| select.emit(ft))}>
                { label.to_string() }
            </button>
        }
    };

    let logout = {
        let cb = props.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {<div style="position:fixed; inset:0; background:#000;">
        <div style="position:absolute; top:0; left:0; right:0; z-index:100; display:flex; align-items:center; gap:8px; padding:12px; background:linear-gradient(to bottom, rgba(0,0,0,0.7), transparent);">
            { feed_button("Recent", FeedType::Recent) }
            { feed_button("Random", FeedType::Random) }
            { feed_button("Liked", FeedType::Favorites) }
            <select onchange={on_library_change} style="margin-left:auto; background:rgba(255,255,255,0.15); color:#fff; border:none; border-radius:8px; padding:4px 8px; font-size:13px;">
                { for libraries.iter().map(|lib| {
                    html! { <option value={lib.id.clone()} selected={feed.library_id.as_deref() == Some(lib.id.as_str())}>{ lib.name.clone() }</option> }
                }) }
            </select>
            <button onclick={logout} title={format!("Sign out {}", props.username)} style="background:none; border:none; color:rgba(255,255,255,0.7); font-size:18px;">
                {"\u{23fb}"}
            </button>
        </div>

        <div
            ref={container_ref}
            onscroll={on_scroll}
            style="height:100%; overflow-y:scroll; scroll-snap-type:y mandatory; overscroll-behavior-y:contain;"
        >
            { for feed.items.iter().enumerate().map(|(i, item)| {
                let toggle_favorite = {
                    let toggle_favorite = toggle_favorite.clone();
                    let id = item.id.clone();
                    Callback::from(move |_| toggle_favorite.emit(id.clone()))
                };
                html! {
                    <div key={item.id.clone()} style="height:100%; scroll-snap-align:start;">
                        <VideoCard
                            item={item.clone()}
                            client={props.client.clone()}
                            active={i == feed.active_index}
                            is_favorite={feed.favorites.contains(&item.id)}
                            on_toggle_favorite={toggle_favorite}
                            is_muted={*muted}
                            on_toggle_mute={toggle_mute.clone()}
                        />
                    </div>
                }
            }) }

            { if feed.is_loading {
                html! {<div style="height:100%; display:flex; align-items:center; justify-content:center; scroll-snap-align:start; color:#fff;">
                    {"Loading\u{2026}"}
                </div>}
            } else if feed.items.is_empty() {
                html! {<div style="height:100%; display:flex; align-items:center; justify-content:center; scroll-snap-align:start; color:rgba(255,255,255,0.6); padding:24px; text-align:center;">
                    { if feed.feed_type == FeedType::Favorites {
                        "Nothing liked yet. Tap the heart on a video to save it here."
                    } else {
                        "No vertical videos in this library."
                    } }
                </div>}
            } else { html! {} } }
        </div>
    </div>}
}
