#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;

pub mod extractor;
pub mod fetcher;
pub mod manifest;
pub mod records;
pub mod registry;
pub mod runner;
pub mod types;
pub mod utils;
pub mod wat;
