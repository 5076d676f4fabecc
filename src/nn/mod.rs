//! Neural network integration.
//!
//! This module provides the tensor encodings and policy trait used to plug
//! learned players into rollouts.
//!
//! ## Overview
//!
//! - **Traits**: `PolicyNetwork`, with `UniformPolicy` as a baseline
//! - **Encoding**: `StateEncoder` trait, `PointsEncoder` and `HostActionEncoder`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hironaka_engine::nn::{HostActionEncoder, PointsEncoder, StateEncoder};
//!
//! let encoder = PointsEncoder::new(20, 3).with_rescale(true);
//! let actions = HostActionEncoder::new(3)?;
//!
//! let scores = network.predict(&encoder.encode(&state)?)?;
//! let subset = actions.decode(argmax(&scores))?;
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{HostActionEncoder, PointsEncoder, StateEncoder, MAX_ACTION_DIMENSION};
pub use traits::{EncodedState, PolicyNetwork, UniformPolicy};
