use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlVideoElement, TouchEvent};
use yew::prelude::*;

use super::{
    action_bar::ActionBar, error_panel::ErrorPanel, info_panel::InfoPanel,
    progress_bar::ProgressBar, seek_badge::SeekBadge, speed_badge::SpeedBadge,
};
use crate::model::MediaItem;
use crate::services::SharedClient;
use crate::state::gesture::{FAST_FORWARD_RATE, LONG_PRESS_MS};
use crate::state::{
    GestureEffect, GestureMachine, PlaybackController, ScrubController, SurfaceOp,
};

#[derive(Properties, PartialEq, Clone)]
pub struct VideoCardProps {
    pub item: MediaItem,
    pub client: SharedClient,
    /// Supplied by the outer feed; at most one card is active at a time.
    pub active: bool,
    pub is_favorite: bool,
    pub on_toggle_favorite: Callback<()>,
    pub is_muted: bool,
    pub on_toggle_mute: Callback<()>,
}

/// Render snapshot re-derived from the controllers after every state change.
/// Overlay visibility only ever flows out of this, never out of event
/// handlers directly.
#[derive(Clone, Debug, Default, PartialEq)]
struct CardView {
    is_playing: bool,
    has_error: bool,
    fast_forward: bool,
    seek_offset: Option<i32>,
    current_time: f64,
    duration: f64,
    progress_visible: bool,
    scrub_pending: Option<f64>,
    show_play_icon: bool,
}

fn apply_op(video: &HtmlVideoElement, op: SurfaceOp) {
    match op {
        // Fire-and-forget play; activation handles the promise explicitly.
        SurfaceOp::Play => {
            let _ = video.play();
        }
        SurfaceOp::Pause => {
            let _ = video.pause();
        }
        SurfaceOp::SetCurrentTime(t) => video.set_current_time(t),
        SurfaceOp::SetRate(r) => video.set_playback_rate(r),
        SurfaceOp::SetMuted(m) => video.set_muted(m),
    }
}

fn sync_view(
    view: &UseStateHandle<CardView>,
    playback: &Rc<RefCell<PlaybackController>>,
    gesture: &Rc<RefCell<GestureMachine>>,
    scrub: &Rc<RefCell<ScrubController>>,
) {
    let pb = playback.borrow();
    let g = gesture.borrow();
    let s = scrub.borrow();
    view.set(CardView {
        is_playing: pb.is_playing(),
        has_error: pb.last_error().is_some(),
        fast_forward: g.is_fast_forward(),
        seek_offset: g.seek_offset(),
        current_time: pb.current_time(),
        duration: pb.duration(),
        progress_visible: pb.progress_bar_visible(),
        scrub_pending: s.pending_secs(),
        show_play_icon: pb.show_play_icon() && !g.is_fast_forward() && g.seek_offset().is_none(),
    });
}

/// One full-screen card: a video surface plus the gesture recognizer that
/// resolves its touch stream into tap / drag-seek / fast-forward, the
/// playback controller, the scrub track and the state-derived overlays.
#[function_component(VideoCard)]
pub fn video_card(props: &VideoCardProps) -> Html {
    let video_ref = use_node_ref();
    let playback = use_mut_ref(|| PlaybackController::new(false));
    let gesture = use_mut_ref(GestureMachine::default);
    let scrub = use_mut_ref(ScrubController::default);
    // One-shot long-press handle; replacing or taking the Option cancels it.
    let long_press = use_mut_ref(|| None::<Timeout>);
    // Shared with the overlay controls; the machine refuses claimed sequences.
    let claim = gesture.borrow().claim_handle();
    let view = use_state_eq(CardView::default);
    let show_info = use_state(|| false);

    // Surface setup that has no yew attribute: looped playback, inline on iOS.
    {
        let video_ref = video_ref.clone();
        use_effect_with((), move |_| {
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                video.set_loop(true);
                let _ = video.set_attribute("playsinline", "true");
            }
            || ()
        });
    }

    // Activation / mute lifecycle. Becoming active clears errors, resets the
    // rate and tries to autoplay; the refusal path just leaves the card
    // paused. Going inactive pauses, rewinds, and force-clears any in-flight
    // gesture so no stuck 2x rate or badge survives a swipe away.
    {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let long_press = long_press.clone();
        let view = view.clone();
        use_effect_with((props.active, props.is_muted), move |&(active, muted)| {
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                let op = playback.borrow_mut().set_muted(muted);
                apply_op(&video, op);
                if active {
                    let ops = playback.borrow_mut().set_active(true);
                    for op in ops {
                        if op == SurfaceOp::Play {
                            match video.play() {
                                Ok(promise) => {
                                    let playback = playback.clone();
                                    let gesture = gesture.clone();
                                    let scrub = scrub.clone();
                                    let view = view.clone();
                                    spawn_local(async move {
                                        let started = JsFuture::from(promise).await.is_ok();
                                        playback.borrow_mut().play_resolved(started);
                                        sync_view(&view, &playback, &gesture, &scrub);
                                    });
                                }
                                Err(_) => playback.borrow_mut().play_resolved(false),
                            }
                        } else {
                            apply_op(&video, op);
                        }
                    }
                } else {
                    long_press.borrow_mut().take();
                    if gesture.borrow_mut().on_touch_cancel() == GestureEffect::EndFastForward {
                        let op = playback.borrow_mut().set_rate(1.0);
                        apply_op(&video, op);
                    }
                    // Abandon, never commit, a scrub interrupted by a swipe away.
                    let _ = scrub.borrow_mut().end();
                    for op in playback.borrow_mut().set_active(false) {
                        apply_op(&video, op);
                    }
                }
                sync_view(&view, &playback, &gesture, &scrub);
            }
            || ()
        });
    }

    // --- Gesture handlers on the card surface ---

    let on_touch_start = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let long_press = long_press.clone();
        let view = view.clone();
        Callback::from(move |e: TouchEvent| {
            let Some(touch) = e.touches().item(0) else {
                return;
            };
            let effect = gesture
                .borrow_mut()
                .on_touch_start(touch.client_x() as f64, touch.client_y() as f64);
            if effect == GestureEffect::ArmLongPress {
                let fired = {
                    let video_ref = video_ref.clone();
                    let playback = playback.clone();
                    let gesture = gesture.clone();
                    let scrub = scrub.clone();
                    let view = view.clone();
                    move || {
                        let effect = gesture.borrow_mut().on_long_press_fired();
                        if effect == GestureEffect::BeginFastForward {
                            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                                let op = playback.borrow_mut().set_rate(FAST_FORWARD_RATE);
                                apply_op(&video, op);
                            }
                        }
                        sync_view(&view, &playback, &gesture, &scrub);
                    }
                };
                *long_press.borrow_mut() = Some(Timeout::new(LONG_PRESS_MS, fired));
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_touch_move = {
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let long_press = long_press.clone();
        let view = view.clone();
        Callback::from(move |e: TouchEvent| {
            let Some(touch) = e.touches().item(0) else {
                return;
            };
            let effect = gesture
                .borrow_mut()
                .on_touch_move(touch.client_x() as f64, touch.client_y() as f64);
            if effect == GestureEffect::CancelLongPress {
                // Synchronous: the one-shot must never fire after this move.
                long_press.borrow_mut().take();
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_touch_end = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let long_press = long_press.clone();
        let view = view.clone();
        Callback::from(move |e: TouchEvent| {
            long_press.borrow_mut().take();
            let effect = if let Some(touch) = e.changed_touches().item(0) {
                gesture
                    .borrow_mut()
                    .on_touch_end(touch.client_x() as f64, touch.client_y() as f64)
            } else {
                gesture.borrow_mut().on_touch_cancel()
            };
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                match effect {
                    GestureEffect::EndFastForward => {
                        let op = playback.borrow_mut().set_rate(1.0);
                        apply_op(&video, op);
                    }
                    GestureEffect::CommitSeek { offset_secs } => {
                        let op = playback.borrow_mut().apply_seek_offset(offset_secs);
                        apply_op(&video, op);
                    }
                    GestureEffect::TogglePlay => {
                        let op = playback.borrow_mut().toggle_play();
                        apply_op(&video, op);
                    }
                    _ => {}
                }
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_touch_cancel = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let long_press = long_press.clone();
        let view = view.clone();
        Callback::from(move |_e: TouchEvent| {
            long_press.borrow_mut().take();
            if gesture.borrow_mut().on_touch_cancel() == GestureEffect::EndFastForward {
                if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                    let op = playback.borrow_mut().set_rate(1.0);
                    apply_op(&video, op);
                }
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_context_menu = Callback::from(|e: MouseEvent| e.prevent_default());

    // --- Media surface feedback ---

    let on_time_update = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |_e: Event| {
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                playback.borrow_mut().on_position_tick(video.current_time());
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_loaded_metadata = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |_e: Event| {
            if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                playback.borrow_mut().on_metadata_ready(video.duration());
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let on_surface_error = {
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |_e: Event| {
            playback.borrow_mut().on_surface_error();
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    // --- Scrub track wiring (exclusive position ownership while dragging) ---

    let on_scrub_start = {
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |(x, width): (f64, f64)| {
            playback.borrow_mut().begin_scrub();
            let duration = playback.borrow().duration();
            scrub.borrow_mut().begin(x, width, duration);
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };
    let on_scrub_move = {
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |(x, width): (f64, f64)| {
            let duration = playback.borrow().duration();
            scrub.borrow_mut().update(x, width, duration);
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };
    let on_scrub_end = {
        let video_ref = video_ref.clone();
        let playback = playback.clone();
        let gesture = gesture.clone();
        let scrub = scrub.clone();
        let view = view.clone();
        Callback::from(move |_: ()| {
            if let Some(target) = scrub.borrow_mut().end() {
                let op = playback.borrow_mut().end_scrub(target);
                if let Some(video) = video_ref.cast::<HtmlVideoElement>() {
                    apply_op(&video, op);
                }
            }
            sync_view(&view, &playback, &gesture, &scrub);
        })
    };

    let toggle_info = {
        let show_info = show_info.clone();
        Callback::from(move |_| show_info.set(!*show_info))
    };

    let src = props.client.video_url(&props.item);
    let poster = props.client.poster_url(&props.item);
    let v = (*view).clone();

    html! {<div
        style="position:relative; width:100%; height:100%; background:#000; scroll-snap-align:start; flex-shrink:0; display:flex; align-items:center; justify-content:center; overflow:hidden; touch-action:pan-y; user-select:none;"
        ontouchstart={on_touch_start}
        ontouchmove={on_touch_move}
        ontouchend={on_touch_end}
        ontouchcancel={on_touch_cancel}
        oncontextmenu={on_context_menu}
    >
        <video
            ref={video_ref}
            src={src}
            poster={poster.clone().map(AttrValue::from)}
            preload="metadata"
            style="width:100%; height:100%; object-fit:cover; pointer-events:none;"
            ontimeupdate={on_time_update}
            onloadedmetadata={on_loaded_metadata}
            onerror={on_surface_error}
        />

        { if v.show_play_icon {
            html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; pointer-events:none; background:rgba(0,0,0,0.2);">
                <span style="font-size:64px; color:rgba(255,255,255,0.5);">{"\u{25b6}"}</span>
            </div>}
        } else { html! {} } }

        <SpeedBadge show={v.fast_forward} />

        { if let Some(offset_secs) = v.seek_offset {
            html! { <SeekBadge offset_secs={offset_secs} current_time={v.current_time} duration={v.duration} /> }
        } else { html! {} } }

        { if v.has_error {
            html! { <ErrorPanel message={"Video failed to load".to_string()} /> }
        } else { html! {} } }

        <ActionBar
            poster_url={poster}
            is_favorite={props.is_favorite}
            on_toggle_favorite={props.on_toggle_favorite.clone()}
            is_muted={props.is_muted}
            on_toggle_mute={props.on_toggle_mute.clone()}
            on_toggle_info={toggle_info}
            is_playing={v.is_playing}
            claim={claim.clone()}
        />

        <InfoPanel item={props.item.clone()} expanded={*show_info} on_toggle={{
            let show_info = show_info.clone();
            Callback::from(move |_| show_info.set(!*show_info))
        }} />

        { if v.progress_visible {
            html! { <ProgressBar
                position_secs={v.scrub_pending.unwrap_or(v.current_time)}
                duration_secs={v.duration}
                scrubbing={v.scrub_pending.is_some()}
                claim={claim.clone()}
                on_scrub_start={on_scrub_start}
                on_scrub_move={on_scrub_move}
                on_scrub_end={on_scrub_end}
            /> }
        } else { html! {} } }
    </div>}
}
