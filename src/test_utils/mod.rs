//! Shared test helpers, available to unit tests and (via the `test-utils`
//! feature) to integration tests.

mod archive_helper;
mod git_helper;

pub use archive_helper::{read_sdist, read_wheel, write_sdist, write_wheel};
pub use git_helper::TestGit;
