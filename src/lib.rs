pub mod ephemeris;
pub mod error;
pub mod scene;
pub mod settings;
pub mod trajectory;

pub use error::OrreryError;

pub const CONFY_APP_NAME: &str = "orrery";
