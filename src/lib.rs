//! framedither
//!
//! Command line front end for the frame-dither engine: still images and
//! PNG frame sequences. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
