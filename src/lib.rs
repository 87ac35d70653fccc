pub mod app;
pub mod config;
pub mod consolidate;
pub mod domain;
pub mod error;
pub mod output;
pub mod parsers;
pub mod sample_id;
pub mod scanner;
pub mod table;
