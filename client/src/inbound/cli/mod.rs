//! Command-line adapter: argument parsing, dispatch and rendering.

mod args;
mod render;
mod runner;

pub use self::args::{CliArgs, Command, QueryArgs, ReportArgs, SignInArgs, SignUpArgs};
pub use self::runner::{CliError, CommandRunner, SIGN_IN_REQUIRED_MESSAGE};
