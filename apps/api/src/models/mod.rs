pub mod record;
pub mod signal;
