// Runtime loader for custom character packages
//
// Layers:
// - `core`: configuration
// - `engine`: package container codec, asset resolution, deferred capability injection
// - `game`: character packages, registry, customization of live player rigs

pub mod core;
pub mod engine;
pub mod game;
