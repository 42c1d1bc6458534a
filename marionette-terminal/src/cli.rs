//! Command line for the terminal viewer

use std::path::PathBuf;

use clap::Parser;
use marionette_core::AnimationMode;

#[derive(Parser, Debug)]
#[command(name = "marionette-terminal")]
#[command(about = "Hierarchical puppet animation rendered in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Animation mode to start in (idle, waving, swimming, somersault, combo-attack)
    #[arg(short, long)]
    pub mode: Option<AnimationMode>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by `-v` repetition or `-q`
    pub fn log_level(&self) -> log::LevelFilter {
        match (self.verbose, self.quiet) {
            (0, true) => log::LevelFilter::Error,
            (0, false) => log::LevelFilter::Warn,
            (1, _) => log::LevelFilter::Info,
            (2, _) => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "marionette-terminal",
            "--config",
            "scene.toml",
            "--mode",
            "combo-attack",
            "--fps",
            "20",
            "-vv",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("scene.toml")));
        assert_eq!(cli.mode, Some(AnimationMode::ComboAttack));
        assert_eq!(cli.fps, Some(20));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_log_level_from_flags() {
        let level = |args: &[&str]| {
            let mut argv = vec!["marionette-terminal"];
            argv.extend_from_slice(args);
            Cli::parse_from(argv).log_level()
        };
        assert_eq!(level(&[]), log::LevelFilter::Warn);
        assert_eq!(level(&["-q"]), log::LevelFilter::Error);
        assert_eq!(level(&["-v"]), log::LevelFilter::Info);
        assert_eq!(level(&["-vv"]), log::LevelFilter::Debug);
        assert_eq!(level(&["-vvvv"]), log::LevelFilter::Trace);
        // Verbosity wins over quiet
        assert_eq!(level(&["-v", "-q"]), log::LevelFilter::Info);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["marionette-terminal", "--mode", "moonwalk"]).is_err());
    }
}
