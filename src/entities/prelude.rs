pub use super::albums::Entity as Albums;
pub use super::books::Entity as Books;
pub use super::games::Entity as Games;
pub use super::locations::Entity as Locations;
pub use super::movies::Entity as Movies;
pub use super::shares::Entity as Shares;
pub use super::users::Entity as Users;
