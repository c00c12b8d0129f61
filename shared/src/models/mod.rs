//! Domain models for the Marketplace Business Portal

mod business;
mod catalog;
mod order;
mod user;

pub use business::*;
pub use catalog::*;
pub use order::*;
pub use user::*;
