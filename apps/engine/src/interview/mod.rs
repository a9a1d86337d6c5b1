// Interview core: the session state machine and the pure policies it runs
// after every answer (scoring, termination, difficulty).

pub mod difficulty;
pub mod scoring;
pub mod session;
pub mod termination;

pub use session::InterviewSession;
