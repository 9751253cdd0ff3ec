//! `sheetsplit_io_fs` v1:
//! Filesystem collaborators of the splitter.
//!
//! Modules:
//! - `spec`   : filter models and errors
//! - `filter` : file-picker filters and listing
//! - `open`   : OS file-browser launch
//! - `util`   : path and directory helpers

pub mod filter;
pub mod open;
pub mod spec;
mod util;

pub use filter::{FileFilterMatcher, derive_default_file_filters, list_picker_entries};
pub use open::{derive_folder_open_program, open_folder};
pub use spec::{FsError, SpecFileFilter};
pub use util::{derive_file_stem, derive_output_path, derive_parent_directory, ensure_directory};
