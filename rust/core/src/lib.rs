// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Manifold-Lite Core Parser
//!
//! Wavefront OBJ parser built with [nom](https://docs.rs/nom). Produces the
//! flat attribute arrays and triangle corner lists that the topology crate
//! imports into its geometry store.
//!
//! ## Quick Start
//!
//! ```rust
//! use manifold_lite_core::parse_obj;
//!
//! let obj = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
//! assert_eq!(obj.vertex_count(), 3);
//! assert_eq!(obj.triangle_count(), 1);
//! ```
//!
//! The parser works on text only; reading files is left to the caller.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for parsed data

pub mod error;
pub mod obj;
pub mod parser;

pub use error::{Error, Result};
pub use obj::{ObjCorner, ObjGeometry};
pub use parser::{parse_obj, statement, RawCorner, Statement};
