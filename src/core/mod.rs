//! Core domain models
//!
//! This module defines the request, schedule and resource descriptors that
//! make up an image pipeline, plus the farm configuration they are read from.

pub mod config;
pub mod descriptors;
pub mod request;
pub mod schedule;

pub use descriptors::*;
pub use request::*;
pub use schedule::*;
