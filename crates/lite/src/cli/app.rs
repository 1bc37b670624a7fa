use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "lite",
    version = env!("CARGO_PKG_VERSION"),
    about,
    long_about = None,
    propagate_version = true
)]
pub struct App {
    /// Configuration file; defaults to `<storage root>/lite.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log everything, with source locations.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Wrap a file into a container.
    #[command(alias = "p", name = "pack")]
    Pack(Transfer),
    /// Recover the original file from a container.
    #[command(alias = "u", name = "unpack")]
    Unpack(Transfer),
    /// Show a container's record without writing the payload.
    #[command(alias = "i", name = "inspect")]
    Inspect(Inspect),
    /// Print the effective configuration.
    #[command(alias = "cfg", name = "config")]
    Config,
}

#[derive(Args, Clone, Debug)]
pub struct Transfer {
    pub file: PathBuf,
    /// Output directory.
    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct Inspect {
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        App::command().debug_assert();
    }

    #[test]
    fn parses_unpack_with_out_dir() {
        let app =
            App::try_parse_from(["lite", "-v", "unpack", "a.txt.b3d", "--out", "/tmp/x"]).unwrap();
        assert!(app.verbose);
        match app.cmd {
            Commands::Unpack(t) => {
                assert_eq!(t.file, PathBuf::from("a.txt.b3d"));
                assert_eq!(t.out, PathBuf::from("/tmp/x"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn out_defaults_to_current_dir() {
        let app = App::try_parse_from(["lite", "pack", "a.txt", "--config", "c.toml"]).unwrap();
        assert_eq!(app.config, Some(PathBuf::from("c.toml")));
        match app.cmd {
            Commands::Pack(t) => assert_eq!(t.out, PathBuf::from(".")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
