pub mod date;
pub mod limit;
pub mod parse;
