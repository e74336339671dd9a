pub mod config;
pub mod error;
pub mod hal;
pub mod roles;
pub mod session;

use config::SyncConfig;
use hal::mock::{ScriptedAnalyzer, SimulatedToneEmitter};
use roles::FrequencyPlan;
use session::SyncSession;
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("acousync - acoustic beat-sync demo");
    println!("==================================\n");

    let config: SyncConfig = serde_json::from_value(serde_json::json!({
        "bpm": 240,
        "beat_budget": 12,
        "tone_duration_ms": 100,
        "poll_interval_ms": 10
    }))?;
    let plan = FrequencyPlan::default_quartet(config.min_frequency_separation_hz)?;

    // Simulated room: participants answer their slots with a little clock
    // skew, as a microphone-backed analyzer would report them.
    let beat = config.beat_interval();
    let start = Instant::now();
    let mut analyzer = ScriptedAnalyzer::new();
    for (slot, skew_ms) in [(1u64, 15i64), (2, -8), (3, 22), (5, 14), (6, -9), (7, 21)] {
        let expected = start + beat * slot as u32;
        let observed = if skew_ms >= 0 {
            expected + Duration::from_millis(skew_ms as u64)
        } else {
            expected - Duration::from_millis(-skew_ms as u64)
        };
        let role = plan.owner_of(slot);
        analyzer.beep_at(slot, plan.frequency_for(role)?, -30.0, observed);
    }

    let emitter = SimulatedToneEmitter::new();
    let emissions = emitter.log();

    let session = SyncSession::coordinator(
        config,
        plan,
        Box::new(emitter),
        Box::new(analyzer),
    )?;

    println!("running coordinator session (12 beats at 240 BPM)...\n");
    let outcome = session.run().await?;

    println!("beats played: {}", outcome.beats_played);
    println!("tones emitted: {}", emissions.lock().unwrap().len());
    println!("offset reports:");
    for report in &outcome.reports {
        println!(
            "  slot {:>2}  {:<14} {:+.1} ms",
            report.slot,
            report.role.to_string(),
            report.offset_ms
        );
    }

    Ok(())
}
