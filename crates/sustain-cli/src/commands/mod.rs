pub mod catalog;
pub mod forecast;
pub mod format;
pub mod statement;
pub mod stress;
