pub mod admin;
pub mod export;
pub mod index;
pub mod user;
