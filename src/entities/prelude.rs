pub use super::inmates::Entity as Inmates;
pub use super::posts::Entity as Posts;
pub use super::users::Entity as Users;
