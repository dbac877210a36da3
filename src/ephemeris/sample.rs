// Ephemeris data types and the service's JSON shape

use crate::error::OrreryError;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// One ephemeris entry in scaled scene-space coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PositionSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(&self) -> glm::DVec3 {
        glm::vec3(self.x, self.y, self.z)
    }
}

/// Response body of `get-planet-locations-by-horizon-id`
#[derive(Debug, Clone, Deserialize)]
pub struct EphemerisResponse {
    pub ephemeris: Vec<WireSample>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSample {
    pub scaled_position_x: f64,
    pub scaled_position_y: f64,
    pub scaled_position_z: f64,
}

/// Ordered samples for one body, read-only once built.
/// Always holds at least two samples.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSeries {
    horizon_id: u32,
    samples: Vec<PositionSample>,
}

impl EphemerisSeries {
    pub const MIN_SAMPLES: usize = 2;

    pub fn new(horizon_id: u32, samples: Vec<PositionSample>) -> Result<Self, OrreryError> {
        if samples.len() < Self::MIN_SAMPLES {
            return Err(OrreryError::EmptySeries {
                horizon_id,
                len: samples.len(),
            });
        }
        Ok(Self {
            horizon_id,
            samples,
        })
    }

    /// Build from the wire shape, multiplying every coordinate by `coordinate_scale`
    pub fn from_wire(
        horizon_id: u32,
        response: EphemerisResponse,
        coordinate_scale: f64,
    ) -> Result<Self, OrreryError> {
        let samples = response
            .ephemeris
            .iter()
            .map(|s| {
                PositionSample::new(
                    s.scaled_position_x * coordinate_scale,
                    s.scaled_position_y * coordinate_scale,
                    s.scaled_position_z * coordinate_scale,
                )
            })
            .collect();
        Self::new(horizon_id, samples)
    }

    /// Parse a raw response body
    pub fn from_json(
        horizon_id: u32,
        body: &str,
        coordinate_scale: f64,
    ) -> Result<Self, OrreryError> {
        let response: EphemerisResponse = serde_json::from_str(body)
            .map_err(|source| OrreryError::Parse { horizon_id, source })?;
        Self::from_wire(horizon_id, response, coordinate_scale)
    }

    pub fn horizon_id(&self) -> u32 {
        self.horizon_id
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// Position of sample `index`. Callers keep `index < len()`.
    pub fn position(&self, index: usize) -> glm::DVec3 {
        self.samples[index].to_vec3()
    }
}
