// Mission Defaults
pub const INITIAL_ALTITUDE: f64 = 120.0; // miles
pub const INITIAL_VELOCITY: f64 = 1.0; // miles/s, positive = descending
pub const INITIAL_TOTAL_MASS: f64 = 32_500.0; // lbs, capsule + propellant
pub const DRY_MASS: f64 = 16_500.0; // lbs, capsule without propellant

// Physical Constants
pub const GRAVITY: f64 = 1e-3; // miles/s²
pub const THRUST_COEFFICIENT: f64 = 1.8; // miles/s, exhaust velocity scale

// Command Window
pub const COMMAND_WINDOW: f64 = 10.0; // s
pub const MIN_BURN_RATE: f64 = 8.0; // lbs/s
pub const MAX_BURN_RATE: f64 = 200.0; // lbs/s

// Step Refinement Tolerances
pub const FUEL_EXHAUSTION_TOLERANCE: f64 = 1e-3; // lbs, also used for window time left
pub const MIN_REFINE_STEP: f64 = 5e-3; // s
pub const CORRECTION_MARGIN: f64 = 5e-2; // s
pub const MAX_REFINE_ITERATIONS: u32 = 100;
pub const MAX_CORRECTION_ITERATIONS: u32 = 100;

// Unit Conversions
pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const FEET_PER_MILE: f64 = 5280.0;
pub const CRATER_DEPTH_PER_MPH: f64 = 0.277777; // feet

// Landing Thresholds (mph, inclusive upper bounds)
pub const PERFECT_LANDING_SPEED: f64 = 1.0;
pub const GOOD_LANDING_SPEED: f64 = 10.0;
pub const POOR_LANDING_SPEED: f64 = 22.0;
pub const CRAFT_DAMAGE_SPEED: f64 = 40.0;
pub const CRASH_LANDING_SPEED: f64 = 60.0;
