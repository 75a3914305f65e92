//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Gravity magnitude (m/s²), acting along -Y.
pub const GRAVITY: f32 = 9.81;

// --- Agent ---

/// Default enemy health.
pub const AGENT_MAX_HEALTH: f32 = 10.0;

/// Minimum time spent ragdolled before velocity-based recovery (seconds).
pub const RAGDOLL_MIN_RECOVERY_SECS: f32 = 1.0;

/// Ragdoll exits unconditionally after this long (seconds).
pub const RAGDOLL_MAX_RECOVERY_SECS: f32 = 6.0;

/// Duration of the stagger retreat (seconds).
pub const STAGGER_SECS: f32 = 0.5;

/// Distance an agent is pushed back when staggered (meters).
pub const STAGGER_DISTANCE: f32 = 2.0;

/// Initial linear speed below which a ragdolled body counts as settled (m/s).
pub const DESPAWN_VELOCITY_THRESHOLD: f32 = 0.1;

/// Initial angular speed below which a ragdolled body counts as settled (rad/s).
pub const DESPAWN_ANGULAR_VELOCITY_THRESHOLD: f32 = 0.1;

/// Per-tick multiplier applied to the settle thresholds while ragdolled or falling.
pub const THRESHOLD_GROWTH: f32 = 1.01;

/// Downward speed beyond which an agent is considered to have left the world (m/s).
pub const FALL_DEATH_SPEED: f32 = 50.0;

/// Maximum distance to the navigable surface for direct recovery (meters).
pub const MESH_SNAP_DISTANCE: f32 = 0.1;

/// Search radius when sampling the navigable surface after a ragdoll (meters).
pub const MESH_SAMPLE_RADIUS: f32 = 25.0;

/// Delay before a lost agent cannonballs back toward the mesh (seconds).
pub const LOST_LAUNCH_DELAY_SECS: f32 = 0.5;

/// Duration of the upright/lift interpolation before navigation resumes (ticks).
pub const REORIENT_TICKS: u32 = 60;

/// Distance sunk into the ground per tick while decaying (meters).
pub const SINK_STEP: f32 = 0.01;

// --- Homing launcher ---

/// Distance at which a homing launch counts as arrived (meters).
pub const LAUNCH_ACCEPTABLE_DISTANCE: f32 = 0.5;

/// Homing launch gives up and reports arrival after this long (seconds).
pub const LAUNCH_TIMEOUT_SECS: f32 = 8.0;

/// Consecutive negligible solves tolerated before nudging the body instead.
pub const LAUNCH_LOW_VELOCITY_LIMIT: u32 = 10;

/// Solved launch speeds below this are treated as negligible (m/s).
pub const LAUNCH_MIN_SPEED: f32 = 0.05;

/// Vertical speed below which a body is not considered to be closing in (m/s).
pub const LAUNCH_CLOSING_VERTICAL_SPEED: f32 = 0.05;

/// Speed of the randomized horizontal fallback impulse (m/s).
pub const LAUNCH_NUDGE_SPEED: f32 = 1.5;

// --- Trajectory shaping ---

/// Slope of the elevation-to-launch-angle shaping function.
pub const ARC_SLOPE: f32 = 0.45;

/// Offset of the elevation-to-launch-angle shaping function (degrees).
pub const ARC_OFFSET_DEG: f32 = 50.0;

/// Lowest launch angle the solver will use (degrees).
pub const ARC_MIN_DEG: f32 = 0.01;

/// Highest launch angle the solver will use (degrees).
pub const ARC_MAX_DEG: f32 = 89.9;

// --- Attacks ---

/// Damage dealt by a melee attacker reaching its slot.
pub const MELEE_DAMAGE: f32 = 5.0;

/// Damage dealt by a ranged projectile hitting the core.
pub const RANGED_DAMAGE: f32 = 2.0;

/// Direct-fire projectile speed used when no arc solution exists (m/s).
pub const RANGED_PROJECTILE_SPEED: f32 = 12.0;

/// Shortest wait between ranged shots (seconds).
pub const RANGED_SHOOT_INTERVAL_MIN: f32 = 2.0;

/// Longest wait between ranged shots (seconds).
pub const RANGED_SHOOT_INTERVAL_MAX: f32 = 4.0;

/// Time-boxed aim rotation before each shot (ticks).
pub const RANGED_AIM_TICKS: u32 = 60;

/// Number of recent sniper positions excluded from selection.
pub const SNIPER_HISTORY_LEN: usize = 5;

/// Fade-in and fade-out duration of the shot path indicator (ticks).
pub const INDICATOR_FADE_TICKS: u32 = 15;

/// Number of sampled points on the shot path indicator.
pub const INDICATOR_POINTS: usize = 16;

// --- Headless simulation ---

/// Half side length of the square navigable region centred on the origin (meters).
pub const ARENA_HALF_EXTENT: f32 = 20.0;

/// Walking speed of simulated navigation agents (m/s).
pub const NAV_SPEED: f32 = 3.5;

/// Distance from the destination at which simulated navigation stops (meters).
pub const NAV_STOPPING_DISTANCE: f32 = 0.1;

/// Horizontal velocity kept per tick by a body resting on the ground.
pub const GROUND_FRICTION: f32 = 0.85;

/// Angular velocity kept per tick by a free body.
pub const ANGULAR_DAMPING: f32 = 0.9;

/// Default enemy collider size (meters).
pub const ENEMY_SIZE: [f32; 3] = [1.0, 2.0, 1.0];

/// Default enemy mass (kg).
pub const ENEMY_MASS: f32 = 70.0;

/// Default core hit sphere radius (meters).
pub const CORE_RADIUS: f32 = 1.5;

/// Default core health.
pub const CORE_HEALTH: f32 = 100.0;

/// Projectiles farther than this from the core are removed (meters).
pub const PROJECTILE_MAX_RANGE: f32 = 200.0;
