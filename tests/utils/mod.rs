pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{presence_counts, EventAssertion};
#[allow(unused_imports)]
pub use setup::{read_frame, RecordingSubscriber, TestSetup, TestSetupBuilder};
