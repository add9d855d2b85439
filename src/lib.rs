pub mod app;
pub mod core;
pub mod remote;
pub mod scanner;
