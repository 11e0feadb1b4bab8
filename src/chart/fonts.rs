use std::path::{Path, PathBuf};

use plotters::style::{register_font, FontStyle};
use thiserror::Error;

/// Family name the renderer asks for when it draws text.
pub const FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Error)]
pub enum FontError {
    #[error("reading font {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a usable TrueType/OpenType font")]
    Invalid { path: PathBuf },
}

/// Make a font available for chart labels.
///
/// The configured path wins; otherwise the first readable system font is
/// used. Returns `false` when nothing could be registered, in which case
/// the chart is drawn without text.
pub fn install(configured: Option<&Path>) -> bool {
    install_from(configured, SYSTEM_FONTS)
}

fn install_from(configured: Option<&Path>, candidates: &[&str]) -> bool {
    if let Some(path) = configured {
        match register(path) {
            Ok(()) => return true,
            Err(e) => log::warn!("{e}; falling back to system fonts"),
        }
    }

    for candidate in candidates.iter().map(Path::new).filter(|p| p.is_file()) {
        match register(candidate) {
            Ok(()) => return true,
            Err(e) => log::debug!("{e}"),
        }
    }

    log::warn!("No usable font found, axis labels and title will be omitted");
    false
}

/// First well-known system font present on this machine.
#[cfg(test)]
pub(crate) fn system_font() -> Option<&'static Path> {
    SYSTEM_FONTS.iter().map(Path::new).find(|p| p.is_file())
}

/// Load `path` and register it as the label family.
pub fn register(path: &Path) -> Result<(), FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FAMILY, FontStyle::Normal, bytes).map_err(|_| FontError::Invalid {
        path: path.to_path_buf(),
    })?;
    log::debug!("Registered {} as '{FAMILY}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = register(&dir.path().join("missing.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a font").unwrap();
        let err = register(file.path()).unwrap_err();
        assert!(matches!(err, FontError::Invalid { .. }));
    }

    #[test]
    fn bad_configured_font_without_fallbacks_disables_labels() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ttf");
        assert!(!install_from(Some(&missing), &[]));

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        garbage.write_all(b"not a font either").unwrap();
        let garbage_path = garbage.path().to_str().unwrap().to_string();
        assert!(!install_from(None, &[garbage_path.as_str()]));
    }

    #[test]
    fn bad_configured_font_falls_back_to_system_font() {
        let Some(system) = system_font() else {
            eprintln!("no system font installed, skipping");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let candidates = [system.to_str().unwrap()];
        assert!(install_from(Some(&dir.path().join("missing.ttf")), &candidates));
    }
}
