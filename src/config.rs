use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::AppError;

/// Map session learnings to CLAUDE.md sections and suggest insertions.
#[derive(Parser, Debug)]
#[command(name = "learnings-mapper", version)]
#[command(about = "Map session learnings to CLAUDE.md sections and suggest insertions")]
pub struct Cli {
    /// Path to the session learnings markdown file
    pub learning_file: Option<PathBuf>,

    /// Path to the session learnings markdown file (alternative flag)
    #[arg(long = "learning-file", value_name = "PATH")]
    pub learning_file_flag: Option<PathBuf>,

    /// Path to the CLAUDE.md file
    #[arg(long, default_value = "CLAUDE.md")]
    pub claude_file: PathBuf,

    /// Project root for resolving relative paths (default: current directory)
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Emit the mapping as JSON instead of a text report
    #[arg(long)]
    pub json: bool,
}

/// Validated run configuration with fully resolved paths.
///
/// Both input files must exist before any parsing starts; a missing input
/// is the only fatal anomaly in the whole run.
#[derive(Debug, Clone)]
pub struct Config {
    pub learning_file: PathBuf,
    pub claude_file: PathBuf,
    pub project_root: PathBuf,
    pub json: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let project_root = match cli.project_root {
            Some(root) => root,
            None => std::env::current_dir().map_err(|e| {
                AppError::Config(format!("cannot determine current directory: {e}"))
            })?,
        };

        let learning_file = cli
            .learning_file_flag
            .or(cli.learning_file)
            .ok_or_else(|| {
                AppError::Config(
                    "learning file is required (positional argument or --learning-file)"
                        .to_string(),
                )
            })?;

        let learning_file = resolve(&project_root, learning_file);
        let claude_file = resolve(&project_root, cli.claude_file);

        if !learning_file.exists() {
            return Err(AppError::MissingInput(learning_file));
        }
        if !claude_file.exists() {
            return Err(AppError::MissingInput(claude_file));
        }

        Ok(Self {
            learning_file,
            claude_file,
            project_root,
            json: cli.json,
        })
    }

    pub fn read_learnings(&self) -> Result<String, AppError> {
        read(&self.learning_file)
    }

    pub fn read_claude(&self) -> Result<String, AppError> {
        read(&self.claude_file)
    }
}

fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

fn read(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
