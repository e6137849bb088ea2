//! Font loading utilities for the `solicitud_pdf` crate.
//!
//! The bundled Roboto family is searched for first:
//!
//! 1. the directory named by `SOLICITUD_PDF_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside the crate directory.
//!
//! When none of those hold the four Roboto files, common system families are
//! tried instead (Liberation Sans and DejaVu Sans on Linux, Arial on Windows).
//! `SOLICITUD_PDF_SYSTEM_FONTS_DIR` adds a directory to that system search.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the bundled font directory.
pub const FONTS_DIR_ENV: &str = "SOLICITUD_PDF_FONTS_DIR";

/// Environment variable adding a directory to the system font search.
pub const SYSTEM_FONTS_DIR_ENV: &str = "SOLICITUD_PDF_SYSTEM_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

struct SystemFamily {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
    directories: &'static [&'static str],
}

impl SystemFamily {
    fn files(&self) -> [&'static str; 4] {
        [self.regular, self.bold, self.italic, self.bold_italic]
    }
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
        directories: &[
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/truetype/liberation2",
            "/usr/share/fonts/liberation-sans",
            "/usr/share/fonts/liberation",
        ],
    },
    SystemFamily {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
        directories: &[
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/dejavu",
            "/usr/share/fonts/dejavu-sans-fonts",
        ],
    },
    SystemFamily {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
        directories: &[],
    },
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

/// Returns the `assets/fonts` directory inside the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_files(path: &Path, files: &[&str]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_files(&candidate, FONT_FILES);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate bundled font directory. Checked: {}. See assets/fonts/README.md or set {}.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn load_bundled_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;
    debug!("Loading bundled fonts from {}", directory.display());

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load default font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn system_directories(family: &SystemFamily) -> Vec<PathBuf> {
    let mut directories: Vec<PathBuf> = env_path(SYSTEM_FONTS_DIR_ENV).into_iter().collect();
    directories.extend(family.directories.iter().map(PathBuf::from));

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                directories.push(root.join("Fonts"));
            }
        }
    }

    directories
}

fn find_system_family() -> Option<(&'static SystemFamily, PathBuf)> {
    SYSTEM_FAMILIES.iter().find_map(|family| {
        system_directories(family)
            .into_iter()
            .find(|directory| missing_files(directory, &family.files()).is_empty())
            .map(|directory| (family, directory))
    })
}

fn load_font(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        Error::new(
            format!("Failed to load font at {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn system_font_family() -> Result<FontFamily<FontData>, Error> {
    let (family, directory) = find_system_family().ok_or_else(|| {
        Error::new(
            "No system font family found for fallback",
            io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
        )
    })?;
    debug!("Loading '{}' fonts from {}", family.name, directory.display());

    Ok(FontFamily {
        regular: load_font(&directory, family.regular)?,
        bold: load_font(&directory, family.bold)?,
        italic: load_font(&directory, family.italic)?,
        bold_italic: load_font(&directory, family.bold_italic)?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the bundled Roboto family, falling back to a system family when the
/// bundled files are missing.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family() {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match system_font_family() {
            Ok(fallback) => {
                warn!("Bundled fonts unavailable ({}); using a system font family.", err);
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); system fallback failed: {}",
                    err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Bundled fonts unavailable and system fallback failed: {}",
                        fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether any usable font family is present on disk.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok() || find_system_family().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        assert!(font_directory_candidates().contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn missing_files_lists_every_absent_font() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(directory.path().join("Roboto-Regular.ttf"), b"").unwrap();

        let missing = missing_files(directory.path(), FONT_FILES);
        assert_eq!(missing.len(), 3);
        assert!(missing.iter().all(|path| !path.ends_with("Roboto-Regular.ttf")));
    }

    #[test]
    fn not_found_errors_trigger_fallback() {
        let err = Error::new(
            "missing",
            io::Error::new(io::ErrorKind::NotFound, "fonts missing"),
        );
        assert!(fonts_missing(&err));

        let err = Error::new("broken", ErrorKind::InvalidFont);
        assert!(!fonts_missing(&err));
    }
}
