use super::body::{AnimationDriver, BodyTransform, Liveness, PlanetBody, SunBody};
use crate::ephemeris::{EphemerisSeries, EphemerisSource};
use crate::error::OrreryError;
use crate::settings::SceneSettings;
use crate::trajectory::StepStrategy;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

/// Range of the user-facing speed control
pub const SPEED_RANGE: RangeInclusive<f64> = 1.0..=10.0;

/// Outcome of one background fetch, delivered to the frame loop
#[derive(Debug)]
pub struct EphemerisLoadResult {
    pub horizon_id: u32,
    pub liveness: Liveness,
    pub result: Result<EphemerisSeries, OrreryError>,
}

/// The whole scene: the sun plus every animated planet
pub struct SolarSystem {
    sun: SunBody,
    bodies: Vec<PlanetBody>,
    load_sender: UnboundedSender<EphemerisLoadResult>,
    load_receiver: UnboundedReceiver<EphemerisLoadResult>,
}

impl SolarSystem {
    pub fn new(scene: SceneSettings, strategy: StepStrategy) -> Self {
        let (load_sender, load_receiver) = unbounded_channel();
        let bodies = scene
            .bodies
            .into_iter()
            .map(|config| PlanetBody::new(config, strategy))
            .collect();
        Self {
            sun: SunBody::new(scene.sun),
            bodies,
            load_sender,
            load_receiver,
        }
    }

    pub fn sun(&self) -> &SunBody {
        &self.sun
    }

    pub fn bodies(&self) -> &[PlanetBody] {
        &self.bodies
    }

    pub fn body(&self, horizon_id: u32) -> Option<&PlanetBody> {
        self.bodies.iter().find(|b| b.horizon_id() == horizon_id)
    }

    pub fn ready_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_ready()).count()
    }

    /// Spawn one fetch per body that has not requested its ephemeris yet.
    /// Must be called from within a tokio runtime.
    pub fn spawn_loads<S: EphemerisSource>(&mut self, source: Arc<S>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        for body in &mut self.bodies {
            let liveness = match body.request_load() {
                Ok(liveness) => liveness,
                Err(_) => continue,
            };
            let horizon_id = body.horizon_id();
            let source = source.clone();
            let sender = self.load_sender.clone();

            handles.push(tokio::spawn(async move {
                log::debug!("Loading ephemeris for horizon id {}", horizon_id);
                let result = source.fetch(horizon_id).await;

                if !liveness.is_alive() {
                    log::debug!("Body {} disposed before its ephemeris arrived", horizon_id);
                    return;
                }
                let _ = sender.send(EphemerisLoadResult {
                    horizon_id,
                    liveness,
                    result,
                });
            }));
        }

        handles
    }

    /// Apply every fetch result that arrived since the last frame.
    /// Returns how many bodies became ready.
    pub fn poll_loads(&mut self) -> usize {
        let mut ready = 0;

        while let Ok(message) = self.load_receiver.try_recv() {
            if !message.liveness.is_alive() {
                log::debug!(
                    "Discarding late ephemeris for disposed body {}",
                    message.horizon_id
                );
                continue;
            }
            let body = self
                .bodies
                .iter_mut()
                .find(|b| b.liveness().same_as(&message.liveness));
            match body {
                Some(body) => {
                    if body.apply_load(message.result) {
                        ready += 1;
                    }
                }
                None => {
                    log::debug!("No body for ephemeris of horizon id {}", message.horizon_id);
                }
            }
        }

        ready
    }

    /// Host callback: pick up finished fetches, then drive every node once.
    /// Returns one transform per node, sun first.
    pub fn on_frame(&mut self, delta: f64) -> Vec<BodyTransform> {
        self.poll_loads();

        let mut transforms = Vec::with_capacity(self.bodies.len() + 1);
        transforms.extend(self.sun.on_frame(delta));
        for body in &mut self.bodies {
            let transform = body.on_frame(delta).unwrap_or_else(|| body.transform());
            transforms.push(transform);
        }
        transforms
    }

    /// Speed control: clamp to `SPEED_RANGE` and apply to every body
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let speed = if speed.is_nan() {
            *SPEED_RANGE.start()
        } else {
            speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
        };
        for body in &mut self.bodies {
            body.set_speed(speed);
        }
        log::info!("Playback speed set to {}", speed);
        speed
    }

    /// Remove a body. A fetch still in flight for it is dropped on arrival.
    pub fn dispose(&mut self, horizon_id: u32) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|body| {
            if body.horizon_id() == horizon_id {
                body.dispose();
                false
            } else {
                true
            }
        });
        self.bodies.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::PositionSample;
    use crate::settings::{BodyConfig, SunConfig};
    use approx::assert_relative_eq;
    use nalgebra_glm as glm;
    use tokio::sync::Semaphore;

    struct MemorySource;

    impl EphemerisSource for MemorySource {
        async fn fetch(&self, horizon_id: u32) -> Result<EphemerisSeries, OrreryError> {
            // Mars has no data
            if horizon_id == 499 {
                return EphemerisSeries::new(horizon_id, Vec::new());
            }
            let r = horizon_id as f64;
            EphemerisSeries::new(
                horizon_id,
                vec![
                    PositionSample::new(r, 0.0, 0.0),
                    PositionSample::new(0.0, 0.0, r),
                    PositionSample::new(-r, 0.0, 0.0),
                ],
            )
        }
    }

    struct GatedSource(Arc<Semaphore>);

    impl EphemerisSource for GatedSource {
        async fn fetch(&self, horizon_id: u32) -> Result<EphemerisSeries, OrreryError> {
            let _permit = self.0.acquire().await.unwrap();
            MemorySource.fetch(horizon_id).await
        }
    }

    fn scene(ids: &[u32]) -> SceneSettings {
        SceneSettings {
            sun: SunConfig::default(),
            bodies: ids
                .iter()
                .map(|&id| BodyConfig::planet(&format!("body-{id}"), id, 0.01))
                .collect(),
        }
    }

    async fn join(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_loads_become_ready_on_next_frame() {
        let mut system = SolarSystem::new(scene(&[199, 399, 499]), StepStrategy::ConstantSpeed);
        let handles = system.spawn_loads(Arc::new(MemorySource));
        assert_eq!(handles.len(), 3);
        join(handles).await;

        assert_eq!(system.ready_count(), 0);
        let transforms = system.on_frame(0.0);
        assert_eq!(transforms.len(), 4);
        assert_eq!(transforms[0].name, "sun");
        assert_eq!(system.ready_count(), 2);

        assert_eq!(transforms[1].position, glm::vec3(199.0, 0.0, 0.0));
        assert_eq!(transforms[2].position, glm::vec3(399.0, 0.0, 0.0));
        // failed body stays at its initial default
        assert!(!system.body(499).unwrap().is_ready());
        assert_eq!(transforms[3].position, glm::vec3(0.0, 0.0, 0.0));
    }

    #[tokio::test]
    async fn test_spawn_loads_only_once() {
        let mut system = SolarSystem::new(scene(&[399]), StepStrategy::ConstantSpeed);
        join(system.spawn_loads(Arc::new(MemorySource))).await;
        assert!(system.spawn_loads(Arc::new(MemorySource)).is_empty());
    }

    #[tokio::test]
    async fn test_disposed_body_drops_late_result() {
        let gate = Arc::new(Semaphore::new(0));
        let mut system = SolarSystem::new(scene(&[399, 599]), StepStrategy::ConstantSpeed);
        let handles = system.spawn_loads(Arc::new(GatedSource(gate.clone())));

        assert!(system.dispose(399));
        assert!(!system.dispose(399));
        gate.add_permits(2);
        join(handles).await;

        assert_eq!(system.poll_loads(), 1);
        assert_eq!(system.bodies().len(), 1);
        assert!(system.body(599).unwrap().is_ready());
        assert!(system.body(399).is_none());
    }

    #[tokio::test]
    async fn test_speed_control_applies_to_all_bodies() {
        let mut system = SolarSystem::new(scene(&[199, 299]), StepStrategy::ConstantSpeed);
        assert_eq!(system.set_speed(4.0), 4.0);
        assert!(system.bodies().iter().all(|b| b.speed() == 4.0));
        assert_eq!(system.set_speed(25.0), 10.0);
        assert_eq!(system.set_speed(0.0), 1.0);
        assert_eq!(system.set_speed(f64::NAN), 1.0);
        assert!(system.bodies().iter().all(|b| b.speed() == 1.0));
    }

    #[tokio::test]
    async fn test_speed_scales_translation() {
        let mut system = SolarSystem::new(scene(&[100]), StepStrategy::ConstantSpeed);
        join(system.spawn_loads(Arc::new(MemorySource))).await;
        system.on_frame(0.0);
        system.set_speed(10.0);

        let start = system.body(100).unwrap().cursor().current_position;
        system.on_frame(0.5);
        let end = system.body(100).unwrap().cursor().current_position;
        assert_relative_eq!(glm::distance(&start, &end), 5.0, epsilon = 1e-9);
    }
}
