//! Command handlers

pub mod codes;
pub mod generate;
pub mod interpret;
