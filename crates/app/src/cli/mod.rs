pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Config, Download, Init, Login, Logout, Search, Signup, Status};
