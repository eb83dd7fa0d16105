//! Core error types
//!
//! None of these cross the channel back to the host. They are logged where
//! they occur and the effect keeps its last good state.

use thiserror::Error;

/// Core simulation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// Width, height, links or density is still zero
    #[error("Field configuration incomplete: width={width} height={height} links={links} density={density}")]
    IncompleteConfig {
        width: f32,
        height: f32,
        links: u32,
        density: u32,
    },

    /// A property value could not be coerced
    #[error("Invalid value for property `{name}`: {reason}")]
    InvalidProperty { name: String, reason: String },

    /// The channel payload was not a message object
    #[error("Malformed channel message: {0}")]
    MalformedMessage(String),

    /// A neighbor search unit could not run
    #[error("Neighbor search failed for point {id}: {reason}")]
    NeighborSearch { id: usize, reason: String },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, GalaxyError>;
