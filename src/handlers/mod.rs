pub mod auth;
pub mod cards;
pub mod entries;
pub mod health;
