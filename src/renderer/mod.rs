//! Canvas 2D rendering module
//!
//! Geometry and effects are plain Rust so they test natively; only the
//! painter touches the browser.

pub mod effects;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use effects::Effects;
pub use shapes::Skin;
