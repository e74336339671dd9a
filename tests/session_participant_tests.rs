use acousync::config::SyncConfig;
use acousync::error::SyncError;
use acousync::hal::mock::{ScriptedAnalyzer, SimulatedToneEmitter};
use acousync::roles::FrequencyPlan;
use acousync::session::SyncSession;
use std::time::Duration;
use tokio::time::Instant;

fn setup() -> (SyncConfig, FrequencyPlan) {
    let config = SyncConfig::default();
    let plan = FrequencyPlan::default_quartet(config.min_frequency_separation_hz).unwrap();
    (config, plan)
}

#[tokio::test(start_paused = true)]
async fn test_participant_emits_only_on_owned_slots() {
    let (config, plan) = setup();

    let emitter = SimulatedToneEmitter::new();
    let emissions = emitter.log();
    let start = Instant::now();

    let session = SyncSession::participant(
        1,
        config.clone(),
        plan,
        Box::new(emitter),
        Box::new(ScriptedAnalyzer::new()),
    )
    .unwrap();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome.beats_played, 12);

    // Participant 1 owns slots 1, 5, 9.
    let log = emissions.lock().unwrap();
    assert_eq!(log.len(), 3);
    for (emission, slot) in log.iter().zip([1u32, 5, 9]) {
        assert_eq!(emission.frequency_hz, 493.88);
        assert_eq!(emission.at, start + config.beat_interval() * slot);
    }
}

#[tokio::test(start_paused = true)]
async fn test_participant_discards_detected_events() {
    let (config, plan) = setup();
    let start = Instant::now();

    // Audible coordinator and participant beeps; a participant must not
    // aggregate any of them.
    let mut analyzer = ScriptedAnalyzer::new();
    analyzer.beep_at(0, 440.0, -20.0, start + Duration::from_millis(5));
    analyzer.beep_at(2, 523.25, -20.0, start + Duration::from_millis(510));

    let session = SyncSession::participant(
        1,
        config,
        plan,
        Box::new(SimulatedToneEmitter::new()),
        Box::new(analyzer),
    )
    .unwrap();

    let outcome = session.run().await.unwrap();
    assert!(outcome.reports.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_participant_outside_plan_rejected() {
    let (config, plan) = setup();

    let result = SyncSession::participant(
        4,
        config,
        plan,
        Box::new(SimulatedToneEmitter::new()),
        Box::new(ScriptedAnalyzer::new()),
    );

    assert!(matches!(result, Err(SyncError::UnknownRole(_))));
}

#[tokio::test(start_paused = true)]
async fn test_participant_analyzer_failure_is_fatal() {
    let (config, plan) = setup();

    let session = SyncSession::participant(
        1,
        config,
        plan,
        Box::new(SimulatedToneEmitter::new()),
        Box::new(ScriptedAnalyzer::unavailable()),
    )
    .unwrap();

    let result = session.run().await;
    assert!(matches!(result, Err(SyncError::AudioDevice(_))));
}
