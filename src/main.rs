use orrery::ephemeris::HttpEphemerisSource;
use orrery::scene::SolarSystem;
use orrery::settings::{MAX_FRAME_RATE, Settings};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Headless host: plays the scene at a fixed frame rate and logs node transforms
async fn run(settings: Settings) -> anyhow::Result<()> {
    let source = Arc::new(HttpEphemerisSource::new(
        settings.playback.service_url.clone(),
        settings.playback.coordinate_scale,
    ));

    let mut system = SolarSystem::new(settings.scene, settings.playback.strategy);
    log::info!(
        "Playing {} bodies from {} ({})",
        system.bodies().len(),
        settings.playback.service_url,
        settings.playback.strategy.name()
    );
    system.spawn_loads(source);

    // Speed control: one number per line on stdin
    let (speed_sender, mut speed_receiver) = mpsc::unbounded_channel::<f64>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match line.trim().parse::<f64>() {
                Ok(speed) => {
                    if speed_sender.send(speed).is_err() {
                        break;
                    }
                }
                Err(_) => log::warn!("Ignoring speed input {:?}", line.trim()),
            }
        }
    });

    let frame_rate = settings.playback.frame_rate.clamp(1, MAX_FRAME_RATE);
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / frame_rate as f64));
    let mut last_frame = Instant::now();
    let mut frame: u64 = 0;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                log::info!("Shutting down after {} frames", frame);
                return Ok(());
            }
        }

        while let Ok(speed) = speed_receiver.try_recv() {
            system.set_speed(speed);
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        let transforms = system.on_frame(delta);
        frame += 1;

        if frame % frame_rate as u64 == 0 {
            for t in &transforms {
                log::debug!(
                    "{:>8} pos=({:.4}, {:.4}, {:.4}) scale={} spin={:.3}",
                    t.name,
                    t.position.x,
                    t.position.y,
                    t.position.z,
                    t.scale,
                    t.spin
                );
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut settings = Settings::load();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        settings.playback.service_url = args[1].clone();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(settings))
}
