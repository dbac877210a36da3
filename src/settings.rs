use crate::CONFY_APP_NAME;
use crate::error::OrreryError;
use crate::trajectory::StepStrategy;

use serde::{Deserialize, Serialize};

/// Upper bound for the host frame rate
pub const MAX_FRAME_RATE: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub service_url: String,
    pub coordinate_scale: f64,
    pub frame_rate: u32,
    pub strategy: StepStrategy,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5259".to_string(),
            coordinate_scale: 1.0,
            frame_rate: 60,
            strategy: StepStrategy::ConstantSpeed,
        }
    }
}

impl PlaybackSettings {
    pub fn try_load() -> Result<Self, OrreryError> {
        let settings: Self = confy::load(CONFY_APP_NAME, "playback")?;
        Ok(settings.validated())
    }

    /// Clamp values that would stall or crash the frame loop
    pub fn validated(mut self) -> Self {
        self.strategy = self.strategy.validated();
        self.frame_rate = self.frame_rate.clamp(1, MAX_FRAME_RATE);
        self
    }

    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            log::warn!("Using default playback settings: {}", e);
            Self::default()
        })
    }
}

/// Construction-time parameters of one animated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub horizon_id: u32,
    pub model_path: String,
    pub scale: f64,
    pub speed: f64,
    pub rotation_speed: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: "earth".to_string(),
            horizon_id: 399,
            model_path: "planets/earth.glb".to_string(),
            scale: 0.01,
            speed: 1.0,
            rotation_speed: 0.0,
        }
    }
}

impl BodyConfig {
    pub fn planet(name: &str, horizon_id: u32, scale: f64) -> Self {
        Self {
            name: name.to_string(),
            horizon_id,
            model_path: format!("planets/{}.glb", name),
            scale,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunConfig {
    pub model_path: String,
    pub position: [f64; 3],
    pub scale: f64,
    pub rotation_speed: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            model_path: "planets/sun1.glb".to_string(),
            position: [0.0, 0.0, 0.0],
            scale: 5.0,
            rotation_speed: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    pub sun: SunConfig,
    pub bodies: Vec<BodyConfig>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            sun: SunConfig::default(),
            bodies: vec![
                BodyConfig::planet("mercury", 199, 0.001),
                BodyConfig::planet("venus", 299, 0.001),
                BodyConfig::planet("earth", 399, 0.001),
                BodyConfig::planet("mars", 499, 0.001),
                BodyConfig::planet("jupiter", 599, 0.01),
                BodyConfig::planet("saturn", 699, 0.01),
                BodyConfig::planet("uranus", 799, 0.01),
                BodyConfig::planet("neptune", 899, 0.01),
                BodyConfig::planet("pluto", 999, 0.05),
            ],
        }
    }
}

impl SceneSettings {
    pub fn try_load() -> Result<Self, OrreryError> {
        Ok(confy::load(CONFY_APP_NAME, "scene")?)
    }

    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            log::warn!("Using default scene settings: {}", e);
            Self::default()
        })
    }
}

// Aggregate struct for convenience
pub struct Settings {
    pub playback: PlaybackSettings,
    pub scene: SceneSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            playback: PlaybackSettings::load(),
            scene: SceneSettings::load(),
        }
    }
}
