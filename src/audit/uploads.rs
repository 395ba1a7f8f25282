use std::time::SystemTime;

use uuid::Uuid;

use crate::audit::*;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "xlsm"];

/// True for the workbook extensions that can be uploaded (case-insensitive).
pub fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn check_extension(path: &str) -> AuditResult<()> {
    ensure!(
        is_allowed(Path::new(path)),
        UnsupportedExtensionSnafu { path }
    );
    Ok(())
}

/// Copies a workbook into the upload directory under a unique name
/// (`<32 hex digits>_<original file name>`) and returns the new path.
pub fn store_upload(src: &str, upload_dir: &Path) -> AuditResult<PathBuf> {
    check_extension(src)?;
    ensure!(Path::new(src).is_file(), UploadNotFoundSnafu { path: src });

    fs::create_dir_all(upload_dir).context(CreatingDirSnafu {
        path: upload_dir.display().to_string(),
    })?;
    let name = format!(
        "{}_{}",
        Uuid::new_v4().simple(),
        io_common::simplify_file_name(src)
    );
    let dest = upload_dir.join(name);
    fs::copy(src, &dest).context(CopyingUploadSnafu {
        from: src,
        to: dest.display().to_string(),
    })?;
    debug!("store_upload: {:?} -> {:?}", src, dest);
    Ok(dest)
}

/// The upload to report on: the named one, or else the most recently modified workbook.
pub fn resolve_upload(upload_dir: &Path, filename: Option<&str>) -> AuditResult<PathBuf> {
    match filename {
        Some(name) => {
            // Only the file name is used, the upload directory is never left.
            let p = upload_dir.join(io_common::simplify_file_name(name));
            ensure!(
                p.is_file(),
                UploadNotFoundSnafu {
                    path: p.display().to_string()
                }
            );
            Ok(p)
        }
        None => latest_upload(upload_dir),
    }
}

pub fn latest_upload(upload_dir: &Path) -> AuditResult<PathBuf> {
    let dir_s = upload_dir.display().to_string();
    if !upload_dir.is_dir() {
        return NoUploadFoundSnafu { dir: dir_s }.fail();
    }
    let entries = fs::read_dir(upload_dir).context(ListingUploadsSnafu { dir: dir_s.clone() })?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.context(ListingUploadsSnafu { dir: dir_s.clone() })?;
        let p = entry.path();
        if !p.is_file() || !is_allowed(&p) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .context(ListingUploadsSnafu { dir: dir_s.clone() })?;
        if latest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
            latest = Some((modified, p));
        }
    }
    let (_, p) = latest.context(NoUploadFoundSnafu { dir: dir_s })?;
    debug!("latest_upload: {:?}", p);
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn extensions() {
        assert!(is_allowed(Path::new("audit.xlsx")));
        assert!(is_allowed(Path::new("AUDIT.XLS")));
        assert!(is_allowed(Path::new("macro.xlsm")));
        assert!(!is_allowed(Path::new("audit.csv")));
        assert!(!is_allowed(Path::new("audit")));
        assert!(matches!(
            check_extension("notes.txt"),
            Err(AuditError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn store_and_resolve() {
        let src_dir = TempDir::new().unwrap();
        let src = src_dir.path().join("june.xlsx");
        fs::write(&src, b"not really a workbook").unwrap();
        let uploads = src_dir.path().join("uploads");

        let dest = store_upload(&src.display().to_string(), &uploads).unwrap();
        let name = io_common::simplify_file_name(&dest.display().to_string());
        assert!(name.ends_with("_june.xlsx"));
        assert_eq!(name.len(), 32 + 1 + "june.xlsx".len());

        assert_eq!(resolve_upload(&uploads, Some(&name)).unwrap(), dest);
        assert_eq!(resolve_upload(&uploads, None).unwrap(), dest);
        assert!(matches!(
            resolve_upload(&uploads, Some("other.xlsx")),
            Err(AuditError::UploadNotFound { .. })
        ));
    }

    #[test]
    fn unsupported_upload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("june.csv");
        fs::write(&src, b"a,b").unwrap();
        let res = store_upload(&src.display().to_string(), dir.path());
        assert!(matches!(res, Err(AuditError::UnsupportedExtension { .. })));
    }

    #[test]
    fn latest_by_modification_time() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("a_old.xlsx");
        let new = dir.path().join("b_new.xls");
        fs::write(&old, b"1").unwrap();
        fs::write(&new, b"2").unwrap();
        fs::write(dir.path().join("c_notes.txt"), b"3").unwrap();

        let now = SystemTime::now();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(now - Duration::from_secs(3600))
            .unwrap();
        File::options()
            .write(true)
            .open(&new)
            .unwrap()
            .set_modified(now)
            .unwrap();

        assert_eq!(latest_upload(dir.path()).unwrap(), new);
    }

    #[test]
    fn no_upload() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            latest_upload(dir.path()),
            Err(AuditError::NoUploadFound { .. })
        ));
        assert!(matches!(
            latest_upload(&dir.path().join("missing")),
            Err(AuditError::NoUploadFound { .. })
        ));
    }
}
