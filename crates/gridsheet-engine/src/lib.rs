//! gridsheet_engine - Cell addressing and the formula language.

pub mod engine;
