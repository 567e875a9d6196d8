pub mod gesture;
pub mod playback;
pub mod scrub;
pub mod touch;

pub use gesture::{GestureEffect, GestureMachine, InputClaim};
pub use playback::{PlaybackController, SurfaceOp};
pub use scrub::ScrubController;
