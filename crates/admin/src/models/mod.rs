//! Admin domain models.

pub mod user;

pub use user::{NewUser, User, UserInput, UserInputError, UserListQuery, UserStats};
