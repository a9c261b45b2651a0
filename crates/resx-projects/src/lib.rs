//! resx-projects: solution/project plumbing for resx-forge
//!
//! Everything that touches the outside world lives here:
//! - `process`: argv-based subprocess invocation (no shell interpolation)
//! - `dotnet`: typed wrappers over the `dotnet` CLI subcommands
//! - `fsops`: small filesystem-operations trait (directory removal, copy)
//! - `names`: seedable random project name generator

pub mod dotnet;
pub mod fsops;
pub mod names;
pub mod process;

pub use dotnet::DotnetCli;
pub use fsops::{FsOps, LocalFs};
pub use names::NameGenerator;
pub use process::{CommandOutput, CommandRunner, ProcessRunner};
