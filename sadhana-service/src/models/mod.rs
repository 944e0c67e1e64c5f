mod report;
mod user;

pub use report::{DeityPrayer, SadhanaReport, CHANTING_ROUNDS_MAX, HEARING_MINUTES_MAX, READING_MINUTES_MAX};
pub use user::{Role, User};
