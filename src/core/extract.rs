use crate::error::{InstallerError, Result};
use crate::utils::fs;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Unpacks every entry of a zip archive under `destination`.
///
/// Entries whose stored path would land outside `destination` abort the
/// extraction. Files written before a failure are left in place.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    println!("Extracting {archive_path:?} to {destination:?}");

    let file = File::open(archive_path)
        .map_err(|e| InstallerError::extraction(archive_path, e.to_string()))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| InstallerError::extraction(archive_path, e.to_string()))?;

    fs::ensure_dir_exists(destination)
        .map_err(|e| InstallerError::extraction(destination, e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| InstallerError::extraction(archive_path, e.to_string()))?;

        let name = entry.name().to_string();
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => return Err(InstallerError::extraction(&name, "illegal file path")),
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)
                .map_err(|e| InstallerError::extraction(&outpath, e.to_string()))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| InstallerError::extraction(parent, e.to_string()))?;
        }

        let mut outfile = File::create(&outpath)
            .map_err(|e| InstallerError::extraction(&outpath, e.to_string()))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| InstallerError::extraction(&outpath, e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(|e| InstallerError::extraction(&outpath, e.to_string()))?;
            }
        }

        log::trace!("Extracted {name}");
    }

    println!("Extraction completed");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Builds an in-memory zip. Names ending in `/` become directories.
    pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(*name, SimpleFileOptions::default())
                    .unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }
}
