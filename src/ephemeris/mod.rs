pub mod loader;
pub mod sample;
pub mod store;

pub use loader::{EphemerisSource, HttpEphemerisSource};
pub use sample::{EphemerisResponse, EphemerisSeries, PositionSample, WireSample};
pub use store::{EphemerisStore, StoreStatus};
