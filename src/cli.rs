use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zipdir")]
#[command(version)]
#[command(about = "Compress directory trees into ZIP archives and extract them", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipdir compress model model.zip -r     archive model/ with model/ as top-level folder\n  \
  zipdir compress src src.zip -x '*.o'   archive src/ without object files\n  \
  cat model.zip | zipdir extract - -d out   extract from a pipe into out/")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a directory (or single file) into a ZIP archive
    Compress {
        /// Directory or file to compress
        #[arg(value_name = "SRC")]
        source: PathBuf,

        /// Archive to create (overwritten if it exists)
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Keep the source directory's own name as the top-level folder
        #[arg(short = 'r', long)]
        include_root_dir: bool,

        /// Exclude files and directories whose name matches a pattern
        #[arg(short = 'x', value_name = "PATTERN", num_args = 1..)]
        exclude: Vec<String>,
    },

    /// Extract a ZIP archive
    Extract {
        /// ZIP file path, or - for standard input
        #[arg(value_name = "FILE")]
        file: String,

        /// Extract files into exdir
        #[arg(short = 'd', value_name = "DIR")]
        extract_dir: Option<PathBuf>,

        /// Write entries even if their names point outside the extraction directory
        #[arg(long)]
        allow_unsafe_paths: bool,
    },

    /// List the entries of a ZIP archive
    List {
        /// ZIP file path, or - for standard input
        #[arg(value_name = "FILE")]
        file: String,

        /// List verbosely with sizes and timestamps
        #[arg(short = 'v')]
        verbose: bool,
    },
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}

/// True when a FILE argument names standard input.
pub fn is_stdin(file: &str) -> bool {
    file == "-"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compress() {
        let cli = Cli::parse_from([
            "zipdir", "compress", "model", "model.zip", "-r", "-x", "*.tmp", "cache",
        ]);
        match cli.command {
            Command::Compress {
                source,
                archive,
                include_root_dir,
                exclude,
            } => {
                assert_eq!(source, PathBuf::from("model"));
                assert_eq!(archive, PathBuf::from("model.zip"));
                assert!(include_root_dir);
                assert_eq!(exclude, vec!["*.tmp", "cache"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_extract_with_global_quiet() {
        let cli = Cli::parse_from(["zipdir", "extract", "-", "-d", "out", "-qq"]);
        assert!(cli.is_very_quiet());
        match cli.command {
            Command::Extract {
                file,
                extract_dir,
                allow_unsafe_paths,
            } => {
                assert!(is_stdin(&file));
                assert_eq!(extract_dir, Some(PathBuf::from("out")));
                assert!(!allow_unsafe_paths);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
