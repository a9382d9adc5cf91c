//! Directory listing module
//!
//! Reads the direct children of one directory and splits them into sorted
//! sub-directory and file names. Read failures yield an empty listing.

use std::fs;
use std::path::Path;

/// Extensions hidden from the file list by default
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["php"];

/// Direct children of a single directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Sub-directory names, ascending
    pub dirs: Vec<String>,
    /// File names not matched by the script filter, ascending
    pub files: Vec<String>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Hides server-side script files from listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFilter {
    extensions: Vec<String>,
}

impl ScriptFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// True when the name ends in `.` followed by an excluded extension
    ///
    /// Matching is on the name itself, so a bare `.php` counts too.
    ///
    /// # Examples
    /// ```
    /// use updatesite_index::site::ScriptFilter;
    ///
    /// let filter = ScriptFilter::default();
    /// assert!(filter.is_excluded("index.php"));
    /// assert!(filter.is_excluded("INDEX.PHP"));
    /// assert!(!filter.is_excluded("site.xml"));
    /// assert!(filter.is_excluded(".php"));
    /// assert!(!filter.is_excluded("php"));
    /// ```
    pub fn is_excluded(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| {
            name.strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }
}

impl Default for ScriptFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_EXTENSIONS)
    }
}

/// Options applied while reading a directory
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    pub filter: ScriptFilter,
    /// Classify symlinks by their target; when false they are left out
    pub follow_symlinks: bool,
}

/// Read the direct children of `dir`
///
/// A directory that cannot be opened produces an empty listing, and entries
/// whose type cannot be determined or whose names are not UTF-8 are skipped.
pub fn read_listing(dir: &Path, options: &ListingOptions) -> DirectoryListing {
    let mut listing = DirectoryListing::default();

    let Ok(entries) = fs::read_dir(dir) else {
        return listing;
    };

    for entry in entries.flatten() {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        let is_dir = if file_type.is_symlink() {
            if !options.follow_symlinks {
                continue;
            }
            // Dangling links have no target metadata
            match fs::metadata(entry.path()) {
                Ok(meta) => meta.is_dir(),
                Err(_) => continue,
            }
        } else {
            file_type.is_dir()
        };

        if is_dir {
            listing.dirs.push(name);
        } else if !options.filter.is_excluded(&name) {
            listing.files.push(name);
        }
    }

    listing.dirs.sort_unstable();
    listing.files.sort_unstable();
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("plugins")).unwrap();
        fs::create_dir(root.join("features")).unwrap();
        fs::create_dir(root.join("Archive")).unwrap();
        fs::write(root.join("site.xml"), "<site/>").unwrap();
        fs::write(root.join("index.php"), "<?php ?>").unwrap();
        fs::write(root.join("artifacts.jar"), [0u8; 4]).unwrap();
        fs::write(root.join("Readme"), "hi").unwrap();
        tmp
    }

    #[test]
    fn test_dirs_and_files_sorted() {
        let tmp = sample_site();
        let listing = read_listing(tmp.path(), &ListingOptions::default());
        // Byte order: uppercase sorts before lowercase
        assert_eq!(listing.dirs, ["Archive", "features", "plugins"]);
        assert_eq!(listing.files, ["Readme", "artifacts.jar", "site.xml"]);
    }

    #[test]
    fn test_scripts_excluded_from_files_only() {
        let tmp = sample_site();
        fs::create_dir(tmp.path().join("admin.php")).unwrap();
        fs::write(tmp.path().join("setup.PHP"), "").unwrap();

        let listing = read_listing(tmp.path(), &ListingOptions::default());
        assert!(listing.dirs.contains(&"admin.php".to_string()));
        assert!(!listing.files.iter().any(|f| f.to_lowercase().ends_with(".php")));
    }

    #[test]
    fn test_dot_only_script_name_excluded() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".php"), "<?php ?>").unwrap();
        fs::write(tmp.path().join("a.php"), "<?php ?>").unwrap();
        fs::write(tmp.path().join("php"), "plain").unwrap();
        fs::write(tmp.path().join("notphp"), "plain").unwrap();

        let listing = read_listing(tmp.path(), &ListingOptions::default());
        assert_eq!(listing.files, ["notphp", "php"]);
    }

    #[test]
    fn test_custom_filter() {
        let tmp = sample_site();
        let options = ListingOptions {
            filter: ScriptFilter::new([".xml", "jar"]),
            follow_symlinks: false,
        };
        let listing = read_listing(tmp.path(), &options);
        assert_eq!(listing.files, ["Readme", "index.php"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let listing = read_listing(&tmp.path().join("nope"), &ListingOptions::default());
        assert!(listing.is_empty());
    }

    #[test]
    fn test_file_path_is_empty() {
        let tmp = sample_site();
        let listing = read_listing(&tmp.path().join("site.xml"), &ListingOptions::default());
        assert!(listing.is_empty());
    }

    #[test]
    fn test_filter_ignores_empty_extensions() {
        let filter = ScriptFilter::new(["", "."]);
        assert!(!filter.is_excluded("index.php"));
        assert!(!filter.is_excluded("noext"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let tmp = sample_site();
        let outside = TempDir::new().unwrap();
        symlink(outside.path(), tmp.path().join("linked")).unwrap();
        symlink(tmp.path().join("site.xml"), tmp.path().join("alias.xml")).unwrap();
        symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();

        let skipped = read_listing(tmp.path(), &ListingOptions::default());
        assert!(!skipped.dirs.contains(&"linked".to_string()));
        assert!(!skipped.files.contains(&"alias.xml".to_string()));

        let options = ListingOptions {
            follow_symlinks: true,
            ..ListingOptions::default()
        };
        let followed = read_listing(tmp.path(), &options);
        assert!(followed.dirs.contains(&"linked".to_string()));
        assert!(followed.files.contains(&"alias.xml".to_string()));
        assert!(!followed.files.contains(&"dangling".to_string()));
    }
}
