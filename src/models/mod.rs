pub mod card;
pub mod entry;
pub mod user;
