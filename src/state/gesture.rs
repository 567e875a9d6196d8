//! Per-card gesture disambiguation.
//!
//! One continuous touch stream is resolved into exactly one of four intents:
//! tap (toggle play), horizontal drag (relative seek), sustained press
//! (2x fast-forward), or nothing (sub-threshold scroll noise). The machine is
//! pure: it consumes touch samples plus a timer-fired signal and emits
//! [`GestureEffect`] commands; scheduling the 500ms one-shot and driving the
//! media surface are the card component's job.

use std::cell::Cell;
use std::rc::Rc;

use super::touch::TouchTracker;

/// Below this movement a release still counts as a tap; above it the pending
/// long press is disqualified.
pub const TAP_SLOP_PX: f64 = 10.0;
/// Horizontal travel needed (with horizontal dominance) before a drag-seek
/// activates. Deliberately above the tap slop: releases in the 10..20px band
/// fall through with no action.
pub const DRAG_ACTIVATE_PX: f64 = 20.0;
/// Sustained-press duration before fast-forward engages.
pub const LONG_PRESS_MS: u32 = 500;
/// Drag-to-seek mapping: 5px of horizontal travel per second.
pub const SEEK_PX_PER_SECOND: f64 = 5.0;
pub const FAST_FORWARD_RATE: f64 = 2.0;

/// Mutually exclusive gesture mode for one card. Exactly one holds at any
/// instant; `Idle` also covers "touch in progress but nothing committed yet"
/// after the long press has been disqualified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Touch down, one-shot timer armed, no disqualifying movement yet.
    PendingLongPress,
    /// Horizontal seek drag; payload is the current offset in whole seconds.
    Dragging { seek_offset_secs: i32 },
    /// Timer fired without movement; playback runs at 2x until release.
    LongPressActive,
}

/// Command for the card controller. Overlay visibility is never an effect:
/// it is re-derived from [`GesturePhase`] after every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEffect {
    None,
    /// Schedule the 500ms long-press one-shot.
    ArmLongPress,
    /// Drop the scheduled one-shot immediately (movement disqualified it).
    CancelLongPress,
    /// Raise playback rate to 2x.
    BeginFastForward,
    /// Restore playback rate to 1x.
    EndFastForward,
    /// Apply the accumulated relative seek to the surface.
    CommitSeek { offset_secs: i32 },
    TogglePlay,
}

#[derive(Debug, Default)]
pub struct GestureMachine {
    tracker: TouchTracker,
    phase: GesturePhase,
    claim: InputClaim,
}

impl GestureMachine {
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Handle to the machine's claim flag, for sharing with overlay controls.
    pub fn claim_handle(&self) -> InputClaim {
        self.claim.clone()
    }

    pub fn seek_offset(&self) -> Option<i32> {
        match self.phase {
            GesturePhase::Dragging { seek_offset_secs } => Some(seek_offset_secs),
            _ => None,
        }
    }

    pub fn is_fast_forward(&self) -> bool {
        self.phase == GesturePhase::LongPressActive
    }

    /// Touch down on the card surface. A sequence an overlay control has
    /// claimed never starts a gesture; otherwise any stale state from an
    /// interrupted sequence is discarded before arming the timer.
    pub fn on_touch_start(&mut self, x: f64, y: f64) -> GestureEffect {
        if self.claim.is_claimed() {
            self.tracker.clear();
            self.phase = GesturePhase::Idle;
            return GestureEffect::None;
        }
        self.tracker.begin(x, y);
        self.phase = GesturePhase::PendingLongPress;
        GestureEffect::ArmLongPress
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) -> GestureEffect {
        if self.claim.is_claimed() {
            return GestureEffect::None;
        }
        let (dx, dy) = self.tracker.update(x, y);
        let mut effect = GestureEffect::None;

        // Movement beyond the slop disqualifies the pending long press. This
        // must happen in the same event that observed the move so the timer
        // can never fire against a touch that is clearly travelling.
        if self.phase == GesturePhase::PendingLongPress
            && (dx.abs() > TAP_SLOP_PX || dy.abs() > TAP_SLOP_PX)
        {
            self.phase = GesturePhase::Idle;
            effect = GestureEffect::CancelLongPress;
        }

        // Drag-seek activation and offset recomputation. Never while fast
        // forwarding, and only under horizontal dominance so the outer feed's
        // vertical swipes are not misread as seeks.
        if self.phase != GesturePhase::LongPressActive
            && self.phase != GesturePhase::PendingLongPress
            && dx.abs() > DRAG_ACTIVATE_PX
            && dx.abs() > dy.abs()
        {
            self.phase = GesturePhase::Dragging {
                seek_offset_secs: (dx / SEEK_PX_PER_SECOND).round() as i32,
            };
        }

        effect
    }

    /// The 500ms one-shot fired. A stale callback that raced a disqualifying
    /// move or a release is a no-op.
    pub fn on_long_press_fired(&mut self) -> GestureEffect {
        if self.phase == GesturePhase::PendingLongPress {
            self.phase = GesturePhase::LongPressActive;
            GestureEffect::BeginFastForward
        } else {
            GestureEffect::None
        }
    }

    /// Touch released: commit the winning intent. The caller drops the timer
    /// handle unconditionally on every end/cancel. A claimed release commits
    /// nothing; the control that claimed the sequence owns the tap.
    pub fn on_touch_end(&mut self, x: f64, y: f64) -> GestureEffect {
        if self.claim.is_claimed() {
            return self.on_touch_cancel();
        }
        let (dx, dy) = self.tracker.finish(x, y);
        match std::mem::take(&mut self.phase) {
            GesturePhase::LongPressActive => GestureEffect::EndFastForward,
            GesturePhase::Dragging { seek_offset_secs } => GestureEffect::CommitSeek {
                offset_secs: seek_offset_secs,
            },
            // Pending or already-idle: a small-movement release is a tap;
            // anything in the 10..20px band falls through silently.
            _ => {
                if dx.abs() < TAP_SLOP_PX && dy.abs() < TAP_SLOP_PX {
                    GestureEffect::TogglePlay
                } else {
                    GestureEffect::None
                }
            }
        }
    }

    /// Interruption (browser touchcancel, or the card going inactive with a
    /// touch in flight). Releases everything like a touch end but commits no
    /// seek and toggles nothing; only an active fast-forward needs undoing.
    pub fn on_touch_cancel(&mut self) -> GestureEffect {
        self.tracker.clear();
        match std::mem::take(&mut self.phase) {
            GesturePhase::LongPressActive => GestureEffect::EndFastForward,
            _ => GestureEffect::None,
        }
    }
}

/// Explicit claim flag shared between overlay controls and the card surface.
/// A control marks the touch sequence as claimed on touchstart; the
/// disambiguator refuses to start (or finish) a gesture while the flag is set,
/// so taps on controls can never double as play/pause toggles.
#[derive(Clone, Debug, Default)]
pub struct InputClaim(Rc<Cell<bool>>);

impl InputClaim {
    pub fn claim(&self) {
        self.0.set(true);
    }

    pub fn release(&self) {
        self.0.set(false);
    }

    pub fn is_claimed(&self) -> bool {
        self.0.get()
    }
}

impl PartialEq for InputClaim {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(m: &mut GestureMachine) -> GestureEffect {
        m.on_touch_start(100.0, 100.0)
    }

    #[test]
    fn touch_start_arms_timer_and_enters_pending() {
        let mut m = GestureMachine::default();
        assert_eq!(start(&mut m), GestureEffect::ArmLongPress);
        assert_eq!(m.phase(), GesturePhase::PendingLongPress);
    }

    #[test]
    fn sub_slop_release_is_exactly_a_toggle() {
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_touch_move(104.0, 93.0), GestureEffect::None);
        assert_eq!(m.on_touch_move(97.0, 108.0), GestureEffect::None);
        assert_eq!(m.phase(), GesturePhase::PendingLongPress);
        assert_eq!(m.on_touch_end(102.0, 101.0), GestureEffect::TogglePlay);
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[test]
    fn timer_fire_engages_fast_forward_until_release() {
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_long_press_fired(), GestureEffect::BeginFastForward);
        assert!(m.is_fast_forward());
        // movement during an active fast-forward is ignored
        assert_eq!(m.on_touch_move(200.0, 100.0), GestureEffect::None);
        assert!(m.is_fast_forward());
        assert_eq!(m.on_touch_end(200.0, 100.0), GestureEffect::EndFastForward);
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[test]
    fn early_move_disqualifies_long_press_for_the_whole_sequence() {
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_touch_move(100.0, 115.0), GestureEffect::CancelLongPress);
        // a late timer callback that lost the race must be inert
        assert_eq!(m.on_long_press_fired(), GestureEffect::None);
        assert_ne!(m.phase(), GesturePhase::LongPressActive);
    }

    #[test]
    fn horizontal_drag_activates_and_recomputes_offset() {
        let mut m = GestureMachine::default();
        start(&mut m);
        // 30px right, mostly horizontal: cancels timer and activates the drag
        assert_eq!(m.on_touch_move(130.0, 105.0), GestureEffect::CancelLongPress);
        assert_eq!(m.seek_offset(), Some(6));
        m.on_touch_move(60.0, 105.0);
        assert_eq!(m.seek_offset(), Some(-8));
        assert_eq!(
            m.on_touch_end(60.0, 105.0),
            GestureEffect::CommitSeek { offset_secs: -8 }
        );
    }

    #[test]
    fn drag_offset_is_sticky_below_activation_travel() {
        let mut m = GestureMachine::default();
        start(&mut m);
        m.on_touch_move(130.0, 100.0);
        assert_eq!(m.seek_offset(), Some(6));
        // back inside the activation band: drag stays latched, offset keeps
        // its last qualifying value
        m.on_touch_move(115.0, 100.0);
        assert_eq!(m.seek_offset(), Some(6));
        assert_eq!(
            m.on_touch_end(115.0, 100.0),
            GestureEffect::CommitSeek { offset_secs: 6 }
        );
    }

    #[test]
    fn vertical_dominated_move_never_seeks() {
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_touch_move(125.0, 180.0), GestureEffect::CancelLongPress);
        assert_eq!(m.seek_offset(), None);
        // ends well past the tap slop: no toggle either
        assert_eq!(m.on_touch_end(125.0, 180.0), GestureEffect::None);
    }

    #[test]
    fn dead_band_release_falls_through_silently() {
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_touch_move(115.0, 100.0), GestureEffect::CancelLongPress);
        // 15px: past the tap slop, short of drag activation
        assert_eq!(m.on_touch_end(115.0, 100.0), GestureEffect::None);
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[test]
    fn return_to_origin_after_big_move_still_taps() {
        // Matches the shipped behavior: the tap check uses final deltas only,
        // provided neither drag nor long press ever latched.
        let mut m = GestureMachine::default();
        start(&mut m);
        assert_eq!(m.on_touch_move(100.0, 115.0), GestureEffect::CancelLongPress);
        m.on_touch_move(101.0, 102.0);
        assert_eq!(m.on_touch_end(101.0, 102.0), GestureEffect::TogglePlay);
    }

    #[test]
    fn cancel_releases_fast_forward_without_committing() {
        let mut m = GestureMachine::default();
        start(&mut m);
        m.on_long_press_fired();
        assert_eq!(m.on_touch_cancel(), GestureEffect::EndFastForward);
        assert_eq!(m.phase(), GesturePhase::Idle);

        start(&mut m);
        m.on_touch_move(160.0, 100.0);
        assert_eq!(m.seek_offset(), Some(12));
        // interrupted drag: no seek is applied
        assert_eq!(m.on_touch_cancel(), GestureEffect::None);
        assert_eq!(m.seek_offset(), None);
    }

    #[test]
    fn machine_is_reusable_after_every_outcome() {
        let mut m = GestureMachine::default();
        for _ in 0..3 {
            start(&mut m);
            m.on_touch_move(170.0, 104.0);
            m.on_touch_end(170.0, 104.0);
            assert_eq!(m.phase(), GesturePhase::Idle);
        }
        start(&mut m);
        assert_eq!(m.phase(), GesturePhase::PendingLongPress);
    }

    #[test]
    fn claim_flag_is_shared_across_clones() {
        let claim = InputClaim::default();
        let peer = claim.clone();
        peer.claim();
        assert!(claim.is_claimed());
        claim.release();
        assert!(!peer.is_claimed());
    }

    #[test]
    fn claimed_touch_on_a_control_never_toggles_play() {
        let mut m = GestureMachine::default();
        let claim = m.claim_handle();
        // a control claimed the sequence at its touchstart
        claim.claim();
        assert_eq!(m.on_touch_start(100.0, 100.0), GestureEffect::None);
        assert_eq!(m.phase(), GesturePhase::Idle);
        assert_eq!(m.on_touch_move(103.0, 101.0), GestureEffect::None);
        assert_eq!(m.on_touch_end(103.0, 101.0), GestureEffect::None);
    }

    #[test]
    fn claim_raised_mid_sequence_suppresses_the_commit() {
        let mut m = GestureMachine::default();
        let claim = m.claim_handle();
        start(&mut m);
        claim.claim();
        assert_eq!(m.on_touch_end(101.0, 100.0), GestureEffect::None);
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[test]
    fn interrupted_control_touch_must_release_the_claim() {
        // A control's touchcancel releases the claim without firing its
        // action; the next touch on the card surface works normally again.
        let mut m = GestureMachine::default();
        let claim = m.claim_handle();
        claim.claim();
        assert_eq!(m.on_touch_start(100.0, 100.0), GestureEffect::None);
        claim.release();
        assert_eq!(m.on_touch_start(100.0, 100.0), GestureEffect::ArmLongPress);
        assert_eq!(m.on_touch_end(102.0, 101.0), GestureEffect::TogglePlay);
    }
}
