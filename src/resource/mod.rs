//! Resource definitions
//!
//! Each club collection is described by an entry in `src/resources/club.json`:
//! table columns, form fields (with kind, required flag and option source)
//! and named color maps. Pages and renderers read these definitions instead
//! of hard-coding per-resource layouts.
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`format`] - Cell extraction and date formatting for table rows

pub mod format;
mod registry;

pub use format::{collect_ids, extract_json_value, format_cell, format_date, format_date_time};
pub use registry::*;
