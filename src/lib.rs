pub mod android_jni;
pub mod describe;
pub mod error;
pub mod flatten;
pub mod heading;
pub mod navigator;
pub mod renderer;
pub mod route;
pub mod substeps;
pub mod translations;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{NavError, RendererError, Result};
pub use navigator::{Navigator, NavigatorConfig, NavigatorEvent, NavigatorState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
