pub mod body;
pub mod system;

pub use body::{AnimationDriver, BodyTransform, Liveness, PlanetBody, SunBody};
pub use system::{EphemerisLoadResult, SPEED_RANGE, SolarSystem};
