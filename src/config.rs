//! Output settings read from the environment
//!
//!   FINCALC_OUTPUT_DIR    directory relative CSV paths are written under (default ".")
//!   FINCALC_PREVIEW_ROWS  schedule rows printed in summaries (default 12)
//!   FINCALC_JSON          print JSON instead of a table when set to 1/true/yes

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREVIEW_ROWS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub preview_rows: usize,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            json: false,
        }
    }
}

impl Settings {
    /// Read config from environment or use defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let output_dir = lookup("FINCALC_OUTPUT_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let preview_rows: usize = lookup("FINCALC_PREVIEW_ROWS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.preview_rows);

        let json = lookup("FINCALC_JSON")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.json);

        Self {
            output_dir,
            preview_rows,
            json,
        }
    }

    /// Resolve a relative output path against `output_dir`
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn test_reads_values() {
        let settings = Settings::from_lookup(lookup(&[
            ("FINCALC_OUTPUT_DIR", "/tmp/out"),
            ("FINCALC_PREVIEW_ROWS", "5"),
            ("FINCALC_JSON", "TRUE"),
        ]));
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.preview_rows, 5);
        assert!(settings.json);
        assert_eq!(
            settings.output_path(Path::new("schedule.csv")),
            PathBuf::from("/tmp/out/schedule.csv")
        );
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            ("FINCALC_PREVIEW_ROWS", "many"),
            ("FINCALC_JSON", "0"),
        ]));
        assert_eq!(settings.preview_rows, DEFAULT_PREVIEW_ROWS);
        assert!(!settings.json);
    }
}
