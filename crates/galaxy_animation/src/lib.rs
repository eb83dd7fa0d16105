//! Galaxy Animation
//!
//! Time-based interpolation for the galaxy cursor effect.
//!
//! # Features
//!
//! - **Easing**: the full Penner equation set, addressable by name
//! - **Tweens**: numeric interpolation jobs advanced once per animation frame
//! - **Reusable handles**: re-arming a tween overwrites its job in place
//!
//! # Example
//!
//! ```rust
//! use galaxy_animation::{Easing, Tween, TweenHandle, TweenScheduler};
//!
//! let mut scheduler: TweenScheduler<Vec<f32>> = TweenScheduler::new();
//! let mut values = Vec::new();
//!
//! let handle = scheduler.start(
//!     Tween::new(0.0, 10.0, 100.0).with_easing(Easing::Linear),
//!     |values: &mut Vec<f32>, value, _done| {
//!         values.push(value);
//!         false
//!     },
//!     TweenHandle::Inert,
//!     &mut values,
//! );
//!
//! scheduler.tick(0.0, &mut values);
//! scheduler.tick(50.0, &mut values);
//! scheduler.tick(100.0, &mut values);
//!
//! assert_eq!(values, vec![0.0, 5.0, 10.0]);
//! assert!(!scheduler.contains(handle));
//! ```

pub mod easing;
pub mod scheduler;

pub use easing::Easing;
pub use scheduler::{DriveMode, Tween, TweenHandle, TweenId, TweenScheduler, TweenStep};
