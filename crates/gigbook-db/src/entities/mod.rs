pub mod artist;
pub mod performance;
pub mod user;
