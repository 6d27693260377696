pub mod user;
pub mod program;
pub mod enrollment;
pub mod completion;

pub use user::*;
pub use program::*;
pub use enrollment::*;
pub use completion::*;
