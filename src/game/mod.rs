// Game-side modules: custom characters and how they reach live players

pub mod characters;
