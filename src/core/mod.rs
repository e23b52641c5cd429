/// Shared infrastructure for the continuity tester
///
/// This package contains UI-independent pieces shared by the CLI frontend
/// and the test engine:
/// - Timing/address configuration with serde defaults
/// - Project directory layout and document loading
/// - Persisted test-result store and merge logic
pub mod config;
pub mod project;
pub mod results;

pub use config::TestConfig;
pub use project::Project;
pub use results::{MarkStatus, ResultStore, TerminalResult};
