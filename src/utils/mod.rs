pub mod table {
    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn row(cells: &[&str], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(w.saturating_sub(cell.chars().count())));
            s.push_str(" |");
        }
        s
    }

    /// Render an ASCII table; missing cells are left blank.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for r in rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = sep(&widths);
        let mut out = format!("{line}\n{}\n{line}\n", row(headers, &widths));
        for r in rows {
            let cells: Vec<&str> =
                (0..headers.len()).map(|i| r.get(i).map_or("", String::as_str)).collect();
            out.push_str(&row(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&line);
        out
    }
}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Settings file looked up next to the Kconfig root.
    pub const DEFAULT_FILE_NAME: &str = "kconfig-graph.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct AssignedSettings {
        /// Key prefix in the assignment file, e.g. "CONFIG_"
        pub prefix: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ScanSettings {
        /// File that must exist in the root, e.g. "MAINTAINERS" for a kernel tree
        pub marker_file: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ServeSettings {
        pub addr: Option<String>, // "host:port"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub assigned: Option<AssignedSettings>,
        pub scan: Option<ScanSettings>,
        pub serve: Option<ServeSettings>,
    }

    impl Config {
        #[must_use]
        pub fn prefix(&self) -> Option<&str> {
            self.assigned.as_ref().and_then(|a| a.prefix.as_deref())
        }

        #[must_use]
        pub fn marker_file(&self) -> Option<&str> {
            self.scan.as_ref().and_then(|s| s.marker_file.as_deref())
        }

        #[must_use]
        pub fn addr(&self) -> Option<&str> {
            self.serve.as_ref().and_then(|s| s.addr.as_deref())
        }
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(DEFAULT_FILE_NAME)
    }

    /// Read and parse a settings file. Unreadable or invalid files yield `None`.
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                log::warn!("ignoring invalid settings file {}: {e}", path.display());
                None
            }
        }
    }

    #[must_use]
    pub fn load_config_near(root: &Path) -> Option<Config> {
        let p = default_config_path(root);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod file_walker {
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Text a base name must contain for the scanner to read it (case-sensitive).
    pub const KCONFIG_PATTERN: &str = "Kconfig";

    /// Discover Kconfig files under `root` in lexical path order.
    ///
    /// Every regular file whose base name contains `Kconfig` matches
    /// (`Kconfig`, `Kconfig.debug`, `arch.Kconfig`, ...). Symlinks are not followed and
    /// unreadable directory entries are skipped.
    #[must_use]
    pub fn kconfig_files(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().contains(KCONFIG_PATTERN) {
                out.push(entry.into_path());
            }
        }
        out
    }
}

pub mod project_root {
    use crate::errors::KconfigGraphError;
    use std::path::Path;

    /// Check that `root` is an existing directory and, when `marker` is set,
    /// that it contains that file.
    ///
    /// # Errors
    /// Returns the matching `KconfigGraphError` variant for the first failed check.
    pub fn validate(root: &Path, marker: Option<&str>) -> Result<(), KconfigGraphError> {
        let meta = std::fs::metadata(root)
            .map_err(|_| KconfigGraphError::MissingRoot(root.to_path_buf()))?;
        if !meta.is_dir() {
            return Err(KconfigGraphError::NotADirectory(root.to_path_buf()));
        }
        if let Some(marker) = marker {
            if !root.join(marker).exists() {
                return Err(KconfigGraphError::MissingMarker {
                    root: root.to_path_buf(),
                    marker: marker.to_string(),
                });
            }
        }
        Ok(())
    }
}
