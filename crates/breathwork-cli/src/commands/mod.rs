pub mod completions;
pub mod config;
pub mod presets;
pub mod session;
