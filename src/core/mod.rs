// Core utilities shared by the engine and game layers

pub mod config;

pub use config::LoaderConfig;
