//! Local filesystem helpers: slugs, existence checks and directory creation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FileSystemError;

/// Turn a human-readable title into a file or directory name.
///
/// Lowercases, replaces spaces and path separators with underscores and
/// drops colons, so the result never spans more than one path component.
/// Two different titles can map to the same slug; see
/// [`slug_collisions`](crate::job::slug_collisions).
pub fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace([' ', '/', '\\'], "_")
        .replace(':', "")
}

/// `slug(title)` as a single child name of some directory.
///
/// Names made only of dots (`.`, `..`) or empty would resolve to the parent
/// directory itself or above it, so their dots become underscores and an
/// empty name becomes `_`.
pub fn child_name(title: &str) -> String {
    contained(slug(title))
}

fn contained(name: String) -> String {
    if name.is_empty() {
        "_".to_string()
    } else if name.chars().all(|c| c == '.') {
        name.replace('.', "_")
    } else {
        name
    }
}

/// Whether anything (file or directory) is at `path`.
pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<(), FileSystemError> {
    fs::create_dir_all(dir).map_err(|source| FileSystemError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Where an item's media lands: `<dir>/<slug(title)><extension>`.
///
/// The result is always a direct child of `dir`.
pub fn media_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    dir.join(contained(format!("{}{}", slug(title), extension)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_underscores() {
        assert_eq!(slug("My Show"), "my_show");
    }

    #[test]
    fn slug_strips_colons() {
        assert_eq!(slug("Episode 12: The Return"), "episode_12_the_return");
    }

    #[test]
    fn slug_of_empty_title_is_empty() {
        assert_eq!(slug(""), "");
    }

    #[test]
    fn slug_replaces_path_separators() {
        assert_eq!(slug("/home/u/.bashrc"), "_home_u_.bashrc");
        assert_eq!(slug("..\\..\\win"), ".._.._win");
        assert_eq!(slug("AC/DC Live"), "ac_dc_live");
    }

    #[test]
    fn child_name_neutralises_dot_and_empty_names() {
        assert_eq!(child_name(".."), "__");
        assert_eq!(child_name("."), "_");
        assert_eq!(child_name(""), "_");
        assert_eq!(child_name("/tmp"), "_tmp");
        assert_eq!(child_name("My Show"), "my_show");
    }

    #[test]
    fn media_path_appends_extension_to_slug() {
        let p = media_path(Path::new("/tmp/my_show"), "Ep 1", ".mp3");
        assert_eq!(p, PathBuf::from("/tmp/my_show/ep_1.mp3"));
    }

    #[test]
    fn media_path_is_always_a_direct_child() {
        let dir = Path::new("/dl/my_show");

        for (title, extension) in [
            ("/home/u/.bashrc", ".mp3"),
            ("../../etc/passwd", ".mp3"),
            ("..", ""),
            (".", "."),
            ("", ""),
        ] {
            let p = media_path(dir, title, extension);
            assert_eq!(p.parent(), Some(dir), "{title:?} + {extension:?} -> {p:?}");
            let name = p.file_name().and_then(|n| n.to_str()).unwrap();
            assert!(!name.chars().all(|c| c == '.'), "{name:?}");
        }
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");

        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();

        assert!(exists(&dir));
    }

    #[test]
    fn ensure_dir_fails_when_a_file_is_in_the_way() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = ensure_dir(&blocker.join("child")).unwrap_err();
        assert!(matches!(err, FileSystemError::CreateDir { .. }));
    }
}
