//! Authoritative play/pause/rate/position state for one card.
//!
//! The controller never touches the DOM. Every mutation returns the
//! [`SurfaceOp`]s the card component must apply to its `HtmlVideoElement`;
//! position and duration flow back in through `on_position_tick` /
//! `on_metadata_ready` so this struct stays the single source of truth.

use thiserror::Error;

/// Clips at or under this duration hide the progress/scrub bar entirely.
pub const PROGRESS_BAR_MIN_SECS: f64 = 180.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The surface could not load or decode; a persistent error panel replaces
    /// the play overlay. An autoplay refusal is deliberately NOT this: it just
    /// leaves the card paused.
    #[error("video failed to load")]
    PlaybackFailed,
}

/// Imperative command for the media surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceOp {
    Play,
    Pause,
    SetCurrentTime(f64),
    SetRate(f64),
    SetMuted(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackController {
    is_playing: bool,
    current_time: f64,
    duration: f64,
    playback_rate: f64,
    is_muted: bool,
    last_error: Option<PlaybackError>,
    /// While a scrub drag holds exclusive write access to `current_time`,
    /// surface position ticks are discarded.
    scrub_active: bool,
}

impl PlaybackController {
    pub fn new(muted: bool) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            playback_rate: 1.0,
            is_muted: muted,
            last_error: None,
            scrub_active: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn last_error(&self) -> Option<PlaybackError> {
        self.last_error
    }

    /// Card became the feed's active card (or stopped being it).
    /// Activation clears errors, resets the rate and requests playback; the
    /// async outcome lands via [`Self::play_resolved`]. Deactivation pauses
    /// and rewinds so a revisited card always starts fresh.
    pub fn set_active(&mut self, active: bool) -> Vec<SurfaceOp> {
        if active {
            self.last_error = None;
            self.playback_rate = 1.0;
            vec![SurfaceOp::SetRate(1.0), SurfaceOp::Play]
        } else {
            self.is_playing = false;
            self.current_time = 0.0;
            self.scrub_active = false;
            vec![SurfaceOp::Pause, SurfaceOp::SetCurrentTime(0.0)]
        }
    }

    /// Result of the play() promise. A platform autoplay refusal simply leaves
    /// the card paused with the play icon showing; it is not an error.
    pub fn play_resolved(&mut self, started: bool) {
        self.is_playing = started;
    }

    /// Tap outcome from the gesture machine.
    pub fn toggle_play(&mut self) -> SurfaceOp {
        self.is_playing = !self.is_playing;
        if self.is_playing {
            SurfaceOp::Play
        } else {
            SurfaceOp::Pause
        }
    }

    pub fn set_muted(&mut self, muted: bool) -> SurfaceOp {
        self.is_muted = muted;
        SurfaceOp::SetMuted(muted)
    }

    pub fn set_rate(&mut self, rate: f64) -> SurfaceOp {
        self.playback_rate = rate;
        SurfaceOp::SetRate(rate)
    }

    pub fn on_position_tick(&mut self, t: f64) {
        if !self.scrub_active {
            self.current_time = t;
        }
    }

    pub fn on_metadata_ready(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn on_surface_error(&mut self) {
        self.last_error = Some(PlaybackError::PlaybackFailed);
        self.is_playing = false;
    }

    /// Commit a relative drag-seek, clamped to the clip bounds.
    pub fn apply_seek_offset(&mut self, offset_secs: i32) -> SurfaceOp {
        let target = (self.current_time + offset_secs as f64).clamp(0.0, self.duration.max(0.0));
        self.current_time = target;
        SurfaceOp::SetCurrentTime(target)
    }

    pub fn begin_scrub(&mut self) {
        self.scrub_active = true;
    }

    /// Commit an absolute scrub target and release exclusive position access.
    /// Absolute positioning makes repeated commits of the same target a no-op.
    pub fn end_scrub(&mut self, target_secs: f64) -> SurfaceOp {
        self.scrub_active = false;
        let target = target_secs.clamp(0.0, self.duration.max(0.0));
        self.current_time = target;
        SurfaceOp::SetCurrentTime(target)
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub_active
    }

    pub fn progress_bar_visible(&self) -> bool {
        self.duration > PROGRESS_BAR_MIN_SECS
    }

    /// Play icon shows on a paused, error-free surface. The card additionally
    /// hides it while a seek badge or fast-forward badge is up.
    pub fn show_play_icon(&self) -> bool {
        !self.is_playing && self.last_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_at(t: f64, duration: f64) -> PlaybackController {
        let mut pc = PlaybackController::new(false);
        pc.set_active(true);
        pc.play_resolved(true);
        pc.on_metadata_ready(duration);
        pc.on_position_tick(t);
        pc
    }

    #[test]
    fn activation_resets_rate_and_requests_play() {
        let mut pc = PlaybackController::new(true);
        pc.on_surface_error();
        let ops = pc.set_active(true);
        assert_eq!(ops, vec![SurfaceOp::SetRate(1.0), SurfaceOp::Play]);
        assert_eq!(pc.last_error(), None);
        assert_eq!(pc.playback_rate(), 1.0);
    }

    #[test]
    fn deactivation_pauses_and_rewinds() {
        let mut pc = playing_at(42.0, 300.0);
        let ops = pc.set_active(false);
        assert_eq!(ops, vec![SurfaceOp::Pause, SurfaceOp::SetCurrentTime(0.0)]);
        assert!(!pc.is_playing());
        assert_eq!(pc.current_time(), 0.0);
    }

    #[test]
    fn autoplay_refusal_is_silent() {
        let mut pc = PlaybackController::new(false);
        pc.set_active(true);
        pc.play_resolved(false);
        assert!(!pc.is_playing());
        assert_eq!(pc.last_error(), None);
        assert!(pc.show_play_icon());
    }

    #[test]
    fn surface_error_replaces_play_icon() {
        let mut pc = playing_at(5.0, 60.0);
        pc.on_surface_error();
        assert!(!pc.is_playing());
        assert_eq!(pc.last_error(), Some(PlaybackError::PlaybackFailed));
        assert!(!pc.show_play_icon());
    }

    #[test]
    fn seek_offset_commits_clamped() {
        // position 10s + 6s => 16s
        let mut pc = playing_at(10.0, 120.0);
        assert_eq!(pc.apply_seek_offset(6), SurfaceOp::SetCurrentTime(16.0));
        // position 118s + 20s clamps to duration
        let mut pc = playing_at(118.0, 120.0);
        assert_eq!(pc.apply_seek_offset(20), SurfaceOp::SetCurrentTime(120.0));
        // rewinding past zero clamps to zero
        let mut pc = playing_at(3.0, 120.0);
        assert_eq!(pc.apply_seek_offset(-10), SurfaceOp::SetCurrentTime(0.0));
    }

    #[test]
    fn scrub_owns_position_until_commit() {
        let mut pc = playing_at(30.0, 400.0);
        pc.begin_scrub();
        pc.on_position_tick(31.0);
        assert_eq!(pc.current_time(), 30.0);
        assert_eq!(pc.end_scrub(250.0), SurfaceOp::SetCurrentTime(250.0));
        assert!(!pc.is_scrubbing());
        // committing the same absolute target again lands on the same position
        pc.begin_scrub();
        assert_eq!(pc.end_scrub(250.0), SurfaceOp::SetCurrentTime(250.0));
        pc.on_position_tick(251.0);
        assert_eq!(pc.current_time(), 251.0);
    }

    #[test]
    fn progress_bar_gated_on_three_minutes() {
        let mut pc = PlaybackController::new(false);
        pc.on_metadata_ready(179.9);
        assert!(!pc.progress_bar_visible());
        pc.on_metadata_ready(180.1);
        assert!(pc.progress_bar_visible());
        pc.on_metadata_ready(180.0);
        assert!(!pc.progress_bar_visible());
    }

    #[test]
    fn toggle_play_flips_and_mirrors() {
        let mut pc = playing_at(0.0, 60.0);
        assert_eq!(pc.toggle_play(), SurfaceOp::Pause);
        assert!(!pc.is_playing());
        assert_eq!(pc.toggle_play(), SurfaceOp::Play);
        assert!(pc.is_playing());
    }
}
