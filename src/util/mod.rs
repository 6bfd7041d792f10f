pub mod number;
pub mod unicode;
