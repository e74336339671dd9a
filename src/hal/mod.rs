pub mod mock;
pub mod traits;
pub mod types;

pub use traits::{SpectralAnalyzer, ToneEmitter};
pub use types::DetectedEvent;
