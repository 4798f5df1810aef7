//! Umbrella crate: re-exports the framelink workspace behind feature gates
//! so applications can depend on a single name.

pub use framelink_core::*;

#[cfg(feature = "buffers")]
pub use framelink_buffer_utils as buffer_utils;

#[cfg(feature = "capture")]
pub use framelink_capturers as capturers;

#[cfg(feature = "codecs")]
pub use framelink_codecs as codecs;

#[cfg(feature = "serialization")]
pub use framelink_serialization_utils as serialization;

#[cfg(feature = "transmission")]
pub use framelink_transmission as transmission;

#[cfg(feature = "loggers")]
pub use framelink_loggers as loggers;

#[cfg(feature = "profilation")]
pub use framelink_profilation_utils as profilation;
