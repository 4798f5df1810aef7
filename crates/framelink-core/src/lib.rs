//! framelink is a pure Rust toolkit to design camera-to-serial image
//! streaming pipelines as code, in a modular way that makes it simple to
//! alter and reuse components. Pipelines are built out of small frame
//! processors chained into components; a frame DTO is moved through the
//! chain once per capture iteration and dropped as a whole on any failure.

pub mod common;

pub mod error;

pub mod pipeline;

pub mod traits;

pub mod processors;
