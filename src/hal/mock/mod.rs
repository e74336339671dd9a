pub mod audio;

pub use audio::{Emission, ScriptedAnalyzer, SimulatedToneEmitter};
