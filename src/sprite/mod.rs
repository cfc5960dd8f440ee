//! Sprite assembly and output.
//!
//! # Module Structure
//!
//! ```text
//! sprite/
//! ├── clean      # strip <title>/<desc>/<metadata>, prolog, comments
//! ├── root       # root <svg> attributes + inner markup (quick-xml)
//! ├── optimize   # optional usvg round trip
//! ├── assemble   # <symbol> per icon, hidden root container
//! ├── output     # output naming, write-if-changed, stale cleanup
//! └── error      # SourceReadError, OptimizationError, OutputWriteError
//! ```

pub mod assemble;
pub mod clean;
pub mod error;
pub mod optimize;
pub mod output;
pub mod root;

pub use assemble::{AssembleOptions, Assembled, CombinedDocument, assemble};
pub use error::{OptimizationError, OutputWriteError, SourceReadError};
pub use output::{
    WriteStatus, namespace_for_output, output_name, output_path, remove_stale, write_if_changed,
};
