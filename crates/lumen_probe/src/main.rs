//! Lumen probe: load a scene, fire a grid of rays at it, report what they see.
//!
//! Usage: `lumen_probe [scene.json]`. Without an argument the built-in demo
//! scene is used. Set `RUST_LOG=debug` for construction details.

mod description;
mod probe;

use anyhow::{Context, Result};
use std::time::Instant;

use description::SceneDescription;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let description = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {}", path);
            SceneDescription::load(&path)
                .with_context(|| format!("Failed to load scene description {}", path))?
        }
        None => {
            log::info!("No scene given, using the demo scene");
            SceneDescription::demo().context("Failed to parse demo scene")?
        }
    };

    let scene = description.build().context("Failed to build scene")?;
    if scene.lights().is_empty() {
        log::warn!("Scene has no lights, direct lighting will be black");
    }

    let start = Instant::now();
    let report = probe::run(&scene, &description.probe);
    let elapsed = start.elapsed();

    log::info!(
        "Probed {} rays in {:.2?} ({:.0} rays/s)",
        report.rays,
        elapsed,
        report.rays as f64 / elapsed.as_secs_f64().max(1e-9)
    );

    let mean = report.mean_direct();
    println!("rays:           {}", report.rays);
    println!("coverage:       {:.1}%", report.coverage() * 100.0);
    println!("emitter hits:   {}", report.emitter_hits);
    println!("shadowed:       {:.1}%", report.shadowed_fraction() * 100.0);
    println!("mean direct:    ({:.4}, {:.4}, {:.4})", mean.x, mean.y, mean.z);

    Ok(())
}
