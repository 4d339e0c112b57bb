//! Epicycles library - Fourier analysis of piecewise-linear signals and
//! their reconstruction as chains of rotating circles.

pub mod canvas;
pub mod cli;
pub mod engine;
pub mod error;
pub mod fourier;
pub mod frame;
pub mod params;
pub mod rendering;
pub mod signal;
pub mod synthesis;
pub mod trace;
