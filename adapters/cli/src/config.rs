use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use racetrack_system_path_finder::Search;
use racetrack_system_race::DEFAULT_TURN_LIMIT;
use serde::{de, Deserialize, Deserializer};

const SUPPORTED_CONFIG_VERSION: u32 = 1;
const DEFAULT_CONFIG_PATH: &str = "racetrack.toml";

/// Kind of file a relative path on the command line refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FileKind {
    Track,
    MoveList,
    Waypoints,
}

/// Settings read from `racetrack.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    version: u32,
    track_directory: PathBuf,
    move_directory: PathBuf,
    follower_directory: PathBuf,
    max_turns: usize,
    #[serde(deserialize_with = "deserialize_search")]
    search: Search,
    frame_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            track_directory: PathBuf::from("tracks"),
            move_directory: PathBuf::from("moves"),
            follower_directory: PathBuf::from("follower"),
            max_turns: DEFAULT_TURN_LIMIT,
            search: Search::States,
            frame_delay_ms: 0,
        }
    }
}

impl Config {
    /// Loads the explicit configuration file, or the default one when present.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and validates the configuration file at `path`.
    ///
    /// Relative directories in the file are resolved against the file's own
    /// directory.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = parse_config(&contents)
            .with_context(|| format!("invalid configuration at {}", path.display()))?;
        config.track_directory = base.join(&config.track_directory);
        config.move_directory = base.join(&config.move_directory);
        config.follower_directory = base.join(&config.follower_directory);
        Ok(config)
    }

    pub(crate) fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub(crate) fn search(&self) -> Search {
        self.search
    }

    pub(crate) fn frame_delay_ms(&self) -> u64 {
        self.frame_delay_ms
    }

    fn directory(&self, kind: FileKind) -> &Path {
        match kind {
            FileKind::Track => &self.track_directory,
            FileKind::MoveList => &self.move_directory,
            FileKind::Waypoints => &self.follower_directory,
        }
    }

    /// Resolves a file named on the command line.
    ///
    /// Paths that exist as given win; otherwise relative paths are looked up
    /// in the configured directory of their kind.
    pub(crate) fn resolve(&self, kind: FileKind, path: &Path) -> PathBuf {
        if path.exists() || path.is_absolute() {
            return path.to_path_buf();
        }
        self.directory(kind).join(path)
    }
}

fn deserialize_search<'de, D>(deserializer: D) -> Result<Search, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(de::Error::custom)
}

fn parse_config(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).context("failed to parse configuration toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported configuration version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    if config.max_turns == 0 {
        bail!("max_turns must be at least 1");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("racetrack-config-{name}-{}", process::id()));
        fs::create_dir_all(&dir).expect("create scratch directory");
        dir
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = parse_config("version = 1\nsearch = \"cells\"\n").expect("config parses");
        assert_eq!(config.search(), Search::Cells);
        assert_eq!(config.max_turns(), DEFAULT_TURN_LIMIT);
        assert_eq!(config.frame_delay_ms(), 0);
        assert_eq!(config.move_directory, PathBuf::from("moves"));
    }

    #[test]
    fn defaults_to_the_state_search() {
        let config = parse_config("version = 1\n").expect("config parses");
        assert_eq!(config.search(), Search::States);
        assert_eq!(Config::default().search(), Search::States);
    }

    #[test]
    fn rejects_unsupported_versions() {
        let error = parse_config("version = 2\n").expect_err("version 2 is unknown");
        assert!(error.to_string().contains("unsupported configuration version 2"));
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(parse_config("version = 1\nspeed = 3\n").is_err());
        assert!(parse_config("version = 1\nsearch = \"astar\"\n").is_err());
        assert!(parse_config("version = 1\nmax_turns = 0\n").is_err());
    }

    #[test]
    fn directories_are_relative_to_the_config_file() {
        let dir = scratch_dir("relative");
        let path = dir.join("racetrack.toml");
        fs::write(
            &path,
            "version = 1\ntrack_directory = \"maps\"\nmax_turns = 50\nframe_delay_ms = 20\n",
        )
        .expect("write config");

        let config = Config::load(Some(path.as_path())).expect("config loads");
        assert_eq!(config.track_directory, dir.join("maps"));
        assert_eq!(config.follower_directory, dir.join("follower"));
        assert_eq!(config.max_turns(), 50);
        assert_eq!(config.frame_delay_ms(), 20);

        let resolved = config.resolve(FileKind::Track, Path::new("oval.txt"));
        assert_eq!(resolved, dir.join("maps").join("oval.txt"));
        fs::remove_dir_all(&dir).expect("remove scratch directory");
    }

    #[test]
    fn existing_paths_are_used_as_given() {
        let dir = scratch_dir("existing");
        let moves = dir.join("moves.txt");
        fs::write(&moves, "LEFT\n").expect("write moves");

        let config = Config::default();
        assert_eq!(config.resolve(FileKind::MoveList, &moves), moves);
        assert_eq!(
            config.resolve(FileKind::Waypoints, Path::new("route.txt")),
            PathBuf::from("follower").join("route.txt")
        );
        fs::remove_dir_all(&dir).expect("remove scratch directory");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = std::env::temp_dir().join("racetrack-config-does-not-exist.toml");
        assert!(Config::load(Some(path.as_path())).is_err());
    }
}
