//! Application module: the `gitreaper` command line front end

pub mod cli;
pub mod display;
pub mod spinner;
pub mod startup;
