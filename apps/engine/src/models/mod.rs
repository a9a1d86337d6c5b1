pub mod profile;
pub mod question;
pub mod record;

pub use profile::{ExperienceItem, ProfileContext};
pub use question::{Answer, Difficulty, Question, QuestionType};
pub use record::{QuestionRecord, ScoreVector, SessionStatus};
