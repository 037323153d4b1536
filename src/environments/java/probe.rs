use crate::core::constants::java::LAUNCHER;
use std::io;
use std::path::{Component, Path, PathBuf};

/// 符号链接最多跟随的层数
const MAX_LINK_DEPTH: usize = 32;

/// 文件系统探测接口，供运行时选择器在 PATH 中查找 java
pub trait FileProbe {
    /// 在给定目录中按顺序查找第一个可执行的 java
    fn find_launcher(&self, dirs: &[PathBuf]) -> Option<PathBuf>;

    /// 解析符号链接；不是链接时原样返回
    fn resolve_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// 直接访问本机文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileProbe;

impl FileProbe for SystemFileProbe {
    fn find_launcher(&self, dirs: &[PathBuf]) -> Option<PathBuf> {
        if dirs.is_empty() {
            return None;
        }
        let paths = std::env::join_paths(dirs).ok()?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        which::which_in(LAUNCHER, Some(paths), cwd).ok()
    }

    fn resolve_link(&self, path: &Path) -> io::Result<PathBuf> {
        let mut current = path.to_path_buf();
        for _ in 0..MAX_LINK_DEPTH {
            if !std::fs::symlink_metadata(&current)?.file_type().is_symlink() {
                return Ok(current);
            }
            let target = std::fs::read_link(&current)?;
            current = match current.parent() {
                Some(parent) if target.is_relative() => normalize(&parent.join(target)),
                _ => target,
            };
        }
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("too many levels of symbolic links: {}", path.display()),
        ))
    }
}

/// 去掉路径中的 `.` 和 `..`，不访问文件系统
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_launcher(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_find_launcher_in_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::create_dir_all(&first).unwrap();
        write_launcher(&second.join(LAUNCHER), 0o755);

        let found = SystemFileProbe.find_launcher(&[first, second.clone()]).unwrap();
        assert_eq!(found, second.join(LAUNCHER));
        assert!(SystemFileProbe.find_launcher(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_find_launcher_skips_non_executable() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain");
        write_launcher(&plain.join(LAUNCHER), 0o644);

        assert!(SystemFileProbe.find_launcher(&[plain]).is_none());
        // 目录不算可执行文件
        let as_dir = dir.path().join("as-dir");
        std::fs::create_dir_all(as_dir.join(LAUNCHER)).unwrap();
        assert!(SystemFileProbe.find_launcher(&[as_dir]).is_none());
    }

    #[test]
    fn test_plain_file_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(LAUNCHER);
        std::fs::write(&file, "").unwrap();

        assert_eq!(SystemFileProbe.resolve_link(&file).unwrap(), file);
        assert!(SystemFileProbe.resolve_link(&dir.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolves_symlink_chain() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("jdk-17").join("bin").join("java");
        write_launcher(&real, 0o755);

        let alternatives = dir.path().join("alternatives");
        std::fs::create_dir_all(&alternatives).unwrap();
        std::os::unix::fs::symlink(&real, alternatives.join("java")).unwrap();

        let usr_bin = dir.path().join("usr-bin");
        std::fs::create_dir_all(&usr_bin).unwrap();
        std::os::unix::fs::symlink("../alternatives/java", usr_bin.join("java")).unwrap();

        assert_eq!(SystemFileProbe.resolve_link(&usr_bin.join("java")).unwrap(), real);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/usr/bin/../lib/./jvm")), PathBuf::from("/usr/lib/jvm"));
    }
}
