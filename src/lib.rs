//! mltrace path tracer
//!
//! CPU path tracer with a per-pixel Metropolis Light Transport refinement.
//! Renders a fixed showcase scene through a pinhole camera, dispatching
//! scanlines to a worker pool, and accumulates frames progressively.
//! Outputs PNG and EXR formats with optional TEV viewer integration.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accumulator;
pub mod camera;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod framebuffer;
pub mod hittable;
pub mod interval;
pub mod material;
pub mod mlt;
pub mod output;
pub mod path;
pub mod plane;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod room;
pub mod scene;
pub mod shading;
pub mod sphere;
pub mod triangle;

pub use error::{Error, Result};
