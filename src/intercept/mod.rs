mod outcome;
mod state;

pub use outcome::AttemptOutcome;
pub use state::{Attempt, AttemptState};
