//! Supplier header resolution.
//!
//! Suppliers spell column headers in unpredictable ways. This crate reduces a
//! raw header to a [`CanonicalKey`] and resolves it to a canonical field name
//! through a configured alternatives table.

#![deny(unsafe_code)]

mod normalize;
mod resolver;

pub use normalize::{CanonicalKey, normalize, normalize_opt};
pub use resolver::{
    ColumnProvenance, HeaderResolution, ResolutionTable, build_resolution_table, resolve_headers,
};
