pub mod album;
pub mod book;
pub mod game;
pub mod location;
pub mod movie;
pub mod share;
pub mod user;
