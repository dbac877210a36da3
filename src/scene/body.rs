use crate::ephemeris::{EphemerisSeries, EphemerisStore};
use crate::error::OrreryError;
use crate::settings::{BodyConfig, SunConfig};
use crate::trajectory::{StepAdvancer, StepOutcome, StepStrategy, TrajectoryCursor};
use nalgebra_glm as glm;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag telling an in-flight fetch whether its body still exists
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn same_as(&self, other: &Liveness) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Node transform handed to the host for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTransform {
    pub name: String,
    pub position: glm::DVec3,
    pub scale: f64,
    /// Accumulated spin about the body's Y axis, radians
    pub spin: f64,
}

/// Per-frame entry point the host calls for every scene node
pub trait AnimationDriver {
    /// Advance by `delta` seconds. `None` while the node has nothing to play.
    fn on_frame(&mut self, delta: f64) -> Option<BodyTransform>;

    /// Current transform without advancing
    fn transform(&self) -> BodyTransform;
}

/// A planet playing back its fetched ephemeris
#[derive(Debug)]
pub struct PlanetBody {
    config: BodyConfig,
    store: EphemerisStore,
    cursor: TrajectoryCursor,
    advancer: StepAdvancer,
    spin: f64,
    liveness: Liveness,
}

impl PlanetBody {
    pub fn new(config: BodyConfig, strategy: StepStrategy) -> Self {
        Self {
            store: EphemerisStore::new(config.horizon_id),
            config,
            cursor: TrajectoryCursor::new(),
            advancer: StepAdvancer::new(strategy),
            spin: 0.0,
            liveness: Liveness::new(),
        }
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    pub fn horizon_id(&self) -> u32 {
        self.config.horizon_id
    }

    pub fn cursor(&self) -> &TrajectoryCursor {
        &self.cursor
    }

    pub fn store(&self) -> &EphemerisStore {
        &self.store
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn is_ready(&self) -> bool {
        self.cursor.is_ready()
    }

    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
    }

    /// Claim the body's single fetch. The returned token travels with the task.
    pub fn request_load(&mut self) -> Result<Liveness, OrreryError> {
        self.store.begin_load()?;
        Ok(self.liveness.clone())
    }

    /// Apply a finished fetch: UNLOADED -> READY on success.
    /// Failures leave the body stationary. Returns true if the body became ready.
    pub fn apply_load(&mut self, result: Result<EphemerisSeries, OrreryError>) -> bool {
        if !self.liveness.is_alive() {
            log::debug!(
                "Discarding ephemeris for disposed body {} ({})",
                self.config.name,
                self.config.horizon_id
            );
            return false;
        }
        match self.store.finish_load(result) {
            Ok(series) => {
                self.cursor.seed(series);
                true
            }
            Err(_) => false,
        }
    }

    /// Invalidate the body; late fetch results will be dropped
    pub fn dispose(&self) {
        self.liveness.kill();
    }
}

impl AnimationDriver for PlanetBody {
    fn on_frame(&mut self, delta: f64) -> Option<BodyTransform> {
        let series = self.store.series()?;
        if !self.cursor.is_ready() {
            return None;
        }

        let outcome = self
            .advancer
            .step(&mut self.cursor, series, self.config.speed, delta);
        if outcome == StepOutcome::Moved {
            self.spin += self.config.rotation_speed;
        }
        Some(self.transform())
    }

    fn transform(&self) -> BodyTransform {
        BodyTransform {
            name: self.config.name.clone(),
            position: self.cursor.current_position,
            scale: self.config.scale,
            spin: self.spin,
        }
    }
}

/// The central body: fixed in place, spinning every frame
#[derive(Debug)]
pub struct SunBody {
    config: SunConfig,
    spin: f64,
}

impl SunBody {
    pub fn new(config: SunConfig) -> Self {
        Self { config, spin: 0.0 }
    }

    pub fn config(&self) -> &SunConfig {
        &self.config
    }
}

impl AnimationDriver for SunBody {
    fn on_frame(&mut self, _delta: f64) -> Option<BodyTransform> {
        self.spin += self.config.rotation_speed;
        Some(self.transform())
    }

    fn transform(&self) -> BodyTransform {
        let [x, y, z] = self.config.position;
        BodyTransform {
            name: "sun".to_string(),
            position: glm::vec3(x, y, z),
            scale: self.config.scale,
            spin: self.spin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::PositionSample;
    use approx::assert_relative_eq;

    fn earth() -> PlanetBody {
        let config = BodyConfig {
            speed: 10.0,
            rotation_speed: 0.5,
            ..Default::default()
        };
        PlanetBody::new(config, StepStrategy::ConstantSpeed)
    }

    fn line(horizon_id: u32) -> EphemerisSeries {
        EphemerisSeries::new(
            horizon_id,
            vec![
                PositionSample::new(0.0, 0.0, 0.0),
                PositionSample::new(10.0, 0.0, 0.0),
                PositionSample::new(20.0, 0.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_unloaded_body_is_noop() {
        let mut body = earth();
        assert!(body.on_frame(1.0).is_none());
        assert_eq!(body.transform().position, glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(body.transform().spin, 0.0);
    }

    #[test]
    fn test_failed_load_keeps_body_static() {
        let mut body = earth();
        body.request_load().unwrap();
        let result = EphemerisSeries::from_json(399, r#"{ "ephemeris": [] }"#, 1.0);
        assert!(!body.apply_load(result));
        assert!(!body.is_ready());
        assert!(body.on_frame(0.5).is_none());
        assert_eq!(body.transform().position, glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_ready_body_plays_scenario() {
        let mut body = earth();
        body.request_load().unwrap();
        assert!(body.apply_load(Ok(line(399))));
        assert_eq!(body.transform().position, glm::vec3(0.0, 0.0, 0.0));

        let frame = body.on_frame(1.0).unwrap();
        assert_eq!(frame.position, glm::vec3(10.0, 0.0, 0.0));
        let frame = body.on_frame(1.0).unwrap();
        assert_eq!(frame.position, glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(body.cursor().target_position, glm::vec3(10.0, 0.0, 0.0));
        assert_eq!(frame.scale, 0.01);
    }

    #[test]
    fn test_spin_only_while_moving() {
        let mut body = earth();
        body.request_load().unwrap();
        body.apply_load(Ok(line(399)));

        body.on_frame(0.25);
        body.on_frame(0.25);
        assert_relative_eq!(body.transform().spin, 1.0, epsilon = 1e-12);
        // zero delta does not move and does not spin
        body.on_frame(0.0);
        assert_relative_eq!(body.transform().spin, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_second_request_is_rejected() {
        let mut body = earth();
        body.request_load().unwrap();
        assert!(matches!(
            body.request_load(),
            Err(OrreryError::AlreadyRequested { horizon_id: 399 })
        ));
    }

    #[test]
    fn test_disposed_body_ignores_late_result() {
        let mut body = earth();
        let token = body.request_load().unwrap();
        body.dispose();
        assert!(!token.is_alive());
        assert!(!body.apply_load(Ok(line(399))));
        assert!(!body.is_ready());
    }

    #[test]
    fn test_sun_spins_every_frame() {
        let mut sun = SunBody::new(SunConfig::default());
        for _ in 0..3 {
            sun.on_frame(0.0);
        }
        let t = sun.transform();
        assert_relative_eq!(t.spin, 0.03, epsilon = 1e-12);
        assert_eq!(t.position, glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(t.scale, 5.0);
    }
}
