pub mod generate;
pub mod image;
pub mod session;
