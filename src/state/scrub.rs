//! Progress-track scrubbing: an always-enabled pointer drag that positions the
//! clip absolutely. Lives on the track sub-region only; its handlers claim the
//! event so the card's gesture machine never sees the touch.

/// Fraction of the track, then absolute seconds: `clamp(x/w, 0, 1) * duration`.
fn target_secs(pointer_x: f64, track_width: f64, duration: f64) -> f64 {
    if track_width <= 0.0 {
        return 0.0;
    }
    (pointer_x / track_width).clamp(0.0, 1.0) * duration.max(0.0)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrubController {
    active: bool,
    pending_secs: f64,
}

impl ScrubController {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Displayed (not yet committed) position while the drag is in flight.
    pub fn pending_secs(&self) -> Option<f64> {
        self.active.then_some(self.pending_secs)
    }

    pub fn begin(&mut self, pointer_x: f64, track_width: f64, duration: f64) {
        self.active = true;
        self.pending_secs = target_secs(pointer_x, track_width, duration);
    }

    pub fn update(&mut self, pointer_x: f64, track_width: f64, duration: f64) {
        if self.active {
            self.pending_secs = target_secs(pointer_x, track_width, duration);
        }
    }

    /// Release: hand the pending absolute position to the playback controller.
    pub fn end(&mut self) -> Option<f64> {
        self.active.then(|| {
            self.active = false;
            self.pending_secs
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_maps_track_fraction_to_seconds() {
        let mut s = ScrubController::default();
        s.begin(50.0, 200.0, 400.0);
        assert_eq!(s.pending_secs(), Some(100.0));
        s.update(150.0, 200.0, 400.0);
        assert_eq!(s.pending_secs(), Some(300.0));
        assert_eq!(s.end(), Some(300.0));
        assert!(!s.is_active());
    }

    #[test]
    fn pointer_outside_track_clamps() {
        let mut s = ScrubController::default();
        s.begin(-30.0, 200.0, 400.0);
        assert_eq!(s.pending_secs(), Some(0.0));
        s.update(500.0, 200.0, 400.0);
        assert_eq!(s.pending_secs(), Some(400.0));
    }

    #[test]
    fn end_without_begin_commits_nothing() {
        let mut s = ScrubController::default();
        assert_eq!(s.end(), None);
        // moves with no active drag are ignored
        s.update(100.0, 200.0, 400.0);
        assert_eq!(s.pending_secs(), None);
    }

    #[test]
    fn repeated_drags_to_same_point_commit_same_target() {
        let mut s = ScrubController::default();
        s.begin(120.0, 240.0, 360.0);
        let first = s.end();
        s.begin(120.0, 240.0, 360.0);
        assert_eq!(s.end(), first);
    }

    #[test]
    fn zero_width_track_is_inert() {
        let mut s = ScrubController::default();
        s.begin(50.0, 0.0, 400.0);
        assert_eq!(s.pending_secs(), Some(0.0));
    }
}
