pub mod prelude;

pub mod albums;
pub mod books;
pub mod games;
pub mod locations;
pub mod movies;
pub mod shares;
pub mod users;
