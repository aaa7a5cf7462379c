//! One module per subcommand.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod scaffold;
