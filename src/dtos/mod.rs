pub mod admin;
pub mod page;
pub mod project;
pub mod time_entry;
pub mod user;
