pub mod chat;
pub mod plan;
pub mod poi;
pub mod preferences;
