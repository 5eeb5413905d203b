//! Configuration section definitions.
//!
//! | Section             | Purpose                                  |
//! |---------------------|------------------------------------------|
//! | `[project]`         | Name, id and public base URL             |
//! | `[paths]`           | Content, output and plugin config dirs   |
//! | `[models.<name>]`   | Field types and label field per model    |

mod model;
mod paths;
mod project;

pub use model::{FieldType, ModelSection};
pub use paths::PathsSection;
pub use project::ProjectSection;
