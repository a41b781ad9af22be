use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns true if the path has one of the supported image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_str.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collects the image files in a directory, unsorted.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let image_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| AppError::DirectoryScan(format!("{}: {}", dir.display(), e)))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    Ok(image_files)
}

/// Formats a byte count the way the window title expects it ("318 B",
/// "2.4 KB", "1.2 MB", ...).
pub fn pretty_print_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }

    format!("{:.1} {}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extension_filter_is_case_insensitive() {
        assert!(is_supported_image(Path::new("/tmp/a.png")));
        assert!(is_supported_image(Path::new("/tmp/a.JPG")));
        assert!(is_supported_image(Path::new("/tmp/a.Nef")));
        assert!(!is_supported_image(Path::new("/tmp/a.txt")));
        assert!(!is_supported_image(Path::new("/tmp/noext")));
    }

    #[test]
    fn scan_skips_non_images_and_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.jpeg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let mut files = scan_directory(dir.path()).unwrap();
        files.sort();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpeg"]);
    }

    #[test]
    fn pretty_sizes() {
        assert_eq!(pretty_print_size(0), "0 B");
        assert_eq!(pretty_print_size(318), "318 B");
        assert_eq!(pretty_print_size(2458), "2.4 KB");
        assert_eq!(pretty_print_size(1_258_291), "1.2 MB");
        assert_eq!(pretty_print_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
