//! Icon discovery: naming, scanning and duplicate resolution.
//!
//! ```text
//! scan(root) -> [IconEntry] -> resolve(policy) -> group() -> [NamespaceGroup]
//! ```

pub mod duplicate;
pub mod entry;
pub mod name;
pub mod scan;

pub use duplicate::{Collision, DuplicateNameError, DuplicatePolicy, Resolved, resolve};
pub use entry::{DEFAULT_NAMESPACE, IconEntry, NamespaceGroup, RESERVED_NAMESPACES, group, split_name};
pub use name::{InvalidNameError, normalize};
pub use scan::{ReservedNamespaceError, ScanOutcome, scan};
