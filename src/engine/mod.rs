// Engine modules: package container, asset resolution, capability injection

pub mod assets;
pub mod injector;
pub mod package;
