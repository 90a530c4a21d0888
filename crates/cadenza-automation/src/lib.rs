//! Frame-driven parameter automation for Cadenza.
//!
//! Provides the [`Animator`], which interpolates over wall-clock time on
//! whatever cadence the platform's [`FrameScheduler`](cadenza_core::FrameScheduler)
//! delivers, plus the two automations built on it:
//!
//! - [`FadeCurve`] - linear volume ramps
//! - [`Tremolo`] - self-sustaining gain oscillation with a decaying stop
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cadenza_automation::{Animator, Tick};
//! use cadenza_core::ManualFrameScheduler;
//!
//! let frames = Arc::new(ManualFrameScheduler::new());
//! let animator = Animator::new(frames.clone());
//!
//! let handle = animator.animate(
//!     100.0,
//!     |elapsed, _frame| if elapsed > 50.0 { Tick::Stop } else { Tick::Continue },
//!     |done| assert!(done.stopped),
//! );
//! frames.run_until_idle(30.0, 10);
//! assert!(handle.is_finished());
//! ```

mod animate;
mod fade;
mod tremolo;

pub use animate::{AnimationHandle, Animator, Completion, Tick};
pub use fade::FadeCurve;
pub use tremolo::{Tremolo, TremoloPhase, TremoloSettings, DEFAULT_TREMOLO_INTENSITY};
