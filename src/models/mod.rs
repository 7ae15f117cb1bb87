pub mod goal;
pub mod reminder;
pub mod token;
pub mod user;

pub use goal::*;
pub use reminder::*;
pub use token::*;
pub use user::*;
