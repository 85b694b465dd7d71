//! Monte Carlo π Example
//!
//! Drives the estimator the way an animation loop would:
//! - one `advance` per frame, 250 samples per batch
//! - pause and resume mid-run
//! - point recording for a plotting host
//!
//! # Running
//! ```bash
//! cargo run --example monte_carlo
//! ```

use mcpi::prelude::*;
use std::f64::consts::PI;

fn main() -> EstimatorResult<()> {
    println!("=== mcpi Monte Carlo π Estimation ===\n");

    let seed = 42u64;
    println!("Seed: {seed} (same seed, same points)\n");

    // 1. Manual frame loop
    println!("1. Manual frame loop:");
    let mut sampler = Sampler::new(seed);
    let mut state = SimulationState::new(10_000).start()?;
    let mut frame = 0;
    while state.is_running() {
        state = sampler.advance(state, 250);
        frame += 1;
        if frame % 10 == 0 {
            println!(
                "   frame {frame:>3}: {:>6} samples, π ≈ {:.6}",
                state.samples_done(),
                state.estimate().unwrap_or(f64::NAN)
            );
        }
    }
    println!("   final: {:?}\n", state.estimate());

    // 2. Pause / resume
    println!("2. Pause and resume:");
    let mut driver = FrameDriver::new(Sampler::new(seed), 10_000, 250);
    driver.start()?;
    for _ in 0..5 {
        driver.frame();
    }
    driver.pause();
    println!(
        "   paused at {} samples ({})",
        driver.state().samples_done(),
        driver.state().phase()
    );
    driver.resume()?;
    let resumed = driver.run_to_completion(|_| {});
    println!(
        "   resumed to {} samples ({})",
        resumed.samples_done(),
        resumed.phase()
    );
    println!("   identical to manual loop: {}\n", resumed == state);

    // 3. Recording points for a plot
    println!("3. Point recording:");
    let mut driver = FrameDriver::new(Sampler::new(seed), 2_000, 250).with_recorder(500);
    driver.start()?;
    driver.run_to_completion(|_| {});
    if let Some(recorder) = driver.recorder() {
        let inside = recorder.inside_points().count();
        println!("   kept {} points, {inside} inside the circle", recorder.len());
    }

    // 4. Refused start
    println!("\n4. Zero target:");
    match SimulationState::new(0).start() {
        Ok(_) => println!("   unexpectedly started"),
        Err(e) => println!("   refused: {e}"),
    }

    let error = state.absolute_error().unwrap_or(f64::NAN);
    println!("\nTrue π: {PI:.6}, abs error after 10k samples: {error:.2e}");
    Ok(())
}
