use clap::{Parser, ValueEnum};

pub const HELP_KEYS: &str = "\
Key Bindings:
  Esc / q              : Quit
  = / -                : Zoom in / out by 1
  PgUp / PgDn          : Zoom in / out by 0.1 (Shift: 0.01)
  1 .. 9               : Set zoom to 1x .. 9x (Shift: 0.1x .. 0.9x)
  0                    : Reset zoom, rotation, pan and flips
  Arrows / Wheel       : Pan (Shift: fine steps)
  Ctrl+Left / Right    : Rotate 5 deg (Shift: 1 deg, Alt: 45 deg)
  Alt+Left / Right     : Previous / next image in the directory
  h / v                : Flip horizontally / vertically
  o                    : Toggle fit to window / original size
  i                    : Invert colors
  c                    : Cycle color channels
  R / G / B (Shift)    : Swap green-blue / red-blue / red-green
  b                    : Toggle light / dark background
  t                    : Cycle title (name, file name, full path)
  F11                  : Toggle fullscreen
";

/// What the window title shows for the current file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TitleMode {
    /// File name without extension
    #[default]
    Stem,
    /// File name with extension
    Name,
    /// Absolute path
    Full,
}

impl TitleMode {
    pub fn next(self) -> Self {
        match self {
            TitleMode::Stem => TitleMode::Name,
            TitleMode::Name => TitleMode::Full,
            TitleMode::Full => TitleMode::Stem,
        }
    }
}

#[derive(Parser)]
#[command(name = "imlite", version, about = "A minimal image viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Image file to open
    pub path: std::path::PathBuf,

    /// Start at the image's original size instead of fitting it to the window
    #[arg(short = 'o', long)]
    pub original_size: bool,

    /// Start with a light background
    #[arg(short, long)]
    pub light: bool,

    /// Initial window title mode
    #[arg(short, long, value_enum, default_value_t = TitleMode::Stem)]
    pub title: TitleMode,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["imlite", "-o", "--light", "--title", "full", "a.png"]).unwrap();
        assert!(cli.original_size);
        assert!(cli.light);
        assert_eq!(cli.title, TitleMode::Full);
        assert_eq!(cli.path, std::path::PathBuf::from("a.png"));
        assert_eq!((cli.width, cli.height), (1280, 720));
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["imlite"]).is_err());
    }

    #[test]
    fn title_mode_cycles() {
        let mut mode = TitleMode::default();
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, TitleMode::Stem);
    }
}
