pub mod changelog;
pub mod config;
pub mod info;
pub mod release;
pub mod status;
