//! Frame production: the cached two-tier engine and the vector canvas effects draw on.

pub(crate) mod canvas;
mod engine;

pub use engine::{DEFAULT_CANVAS_SIZE, Engine, Ingest};
