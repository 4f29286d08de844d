pub mod config;
pub mod load;
pub mod parse;
pub mod paths;
pub mod tree;
