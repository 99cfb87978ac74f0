//! Polarization ellipse and propagating wave visualizers.
//!
//! The numeric core is [`field::PolarizationField`], a stateless evaluator
//! that turns a handful of scalar inputs into sampled field components and,
//! for the 2D view, the angles describing the polarization ellipse. The
//! remaining modules load settings, describe the views for a renderer, write
//! results and, with the `visualization` feature, drive an interactive
//! viewer.

pub mod assets;
pub mod config;
pub mod ellipse;
pub mod field;
pub mod output;
pub mod params;
pub mod scene;
pub mod settings;
pub mod trajectory;
#[cfg(feature = "visualization")]
pub mod viewer;
