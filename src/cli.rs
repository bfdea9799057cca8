use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

pub const HELP_KEYS: &str = "\
Key Bindings:
  Left          : Previous image in the directory
  Right         : Next image in the directory
  Wheel         : Zoom in / out
  Left drag     : Pan
  Esc           : Quit
";

/// Opened when no image is given on the command line.
pub const DEFAULT_IMAGE: &str = "defaultImage.png";

#[derive(Parser)]
#[command(name = "photoview", about = "A minimal image viewer", after_help = HELP_KEYS)]
pub struct Cli {
    /// Image to open. Defaults to defaultImage.png next to the executable.
    pub image: Option<PathBuf>,
}

impl Cli {
    pub fn initial_image(&self) -> Result<PathBuf> {
        match &self.image {
            Some(path) => absolute(path),
            None => {
                let exe = std::env::current_exe().map_err(|source| ViewerError::Io {
                    path: PathBuf::from("<current executable>"),
                    source,
                })?;
                Ok(default_image_path(&exe))
            }
        }
    }
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn default_image_path(exe: &Path) -> PathBuf {
    exe.with_file_name(DEFAULT_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_argument() {
        let cli = Cli::try_parse_from(["photoview", "holiday/beach.png"]).unwrap();
        assert_eq!(cli.image, Some(PathBuf::from("holiday/beach.png")));
    }

    #[test]
    fn test_parse_without_argument() {
        let cli = Cli::try_parse_from(["photoview"]).unwrap();
        assert!(cli.image.is_none());
    }

    #[test]
    fn test_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["photoview", "a.png", "b.png"]).is_err());
    }

    #[test]
    fn test_relative_argument_becomes_absolute() {
        let cli = Cli::try_parse_from(["photoview", "beach.png"]).unwrap();
        let path = cli.initial_image().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("beach.png"));
    }

    #[test]
    fn test_default_image_next_to_executable() {
        let exe = Path::new("/opt/photoview/bin/photoview");
        assert_eq!(
            default_image_path(exe),
            PathBuf::from("/opt/photoview/bin/defaultImage.png")
        );

        let cli = Cli::try_parse_from(["photoview"]).unwrap();
        let path = cli.initial_image().unwrap();
        assert!(path.ends_with(DEFAULT_IMAGE));
        assert_eq!(path.parent(), std::env::current_exe().unwrap().parent());
    }

    #[test]
    fn test_empty_path_is_error() {
        assert!(matches!(absolute(Path::new("")), Err(ViewerError::Io { .. })));
    }
}
