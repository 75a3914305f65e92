//! Ballistics for BULWARK.
//!
//! Closed-form arc solving for thrown bodies and projectiles, and a homing
//! launcher that keeps re-solving until a body lands near its target.

pub mod homing;
pub mod trajectory;

pub use homing::{HomingLauncher, HomingLauncherState, ImpulseSource, LaunchStatus};
pub use trajectory::{launch_impulse, solve, NoSolution, Trajectory};
