// Coaching routes: mentor Q&A, pitch practice, resume analysis, progress
// tracking and recommendations drawn from a founder's stored verdicts.

pub mod handlers;
pub mod mentor;
pub mod progress;
pub mod prompts;
pub mod resume;
