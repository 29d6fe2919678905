//! Provisioning the data directory from the shared data store.

use crate::dataset::{SOURCE_TABLES, TRACKS_FILE, TRACKS_GZ_FILE};
use anyhow::Context;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Directory of the processed IBTrACS tables below the data store root.
pub fn source_tables_dir(source_dir: &Path) -> PathBuf {
    source_dir
        .join("public")
        .join("processed")
        .join("glb")
        .join("ibtracs")
}

/// Copy the source tables into `data_dir` and write the compressed track
/// table the dashboards fetch.
///
/// Every table must be present in the source; the first missing one stops
/// the migration.
pub fn run_migrate(source_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    let tables_dir = source_tables_dir(source_dir);
    if !tables_dir.is_dir() {
        anyhow::bail!("source directory {} not found", tables_dir.display());
    }
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    for table in SOURCE_TABLES {
        let src = tables_dir.join(table);
        let dest = data_dir.join(table);
        let bytes = std::fs::copy(&src, &dest)
            .with_context(|| format!("failed to copy {} to {}", src.display(), dest.display()))?;
        info!("Copied {} ({} bytes) to {}", src.display(), bytes, dest.display());
    }

    let gz = data_dir.join(TRACKS_GZ_FILE);
    gzip_file(&data_dir.join(TRACKS_FILE), &gz)?;
    info!("Wrote {}", gz.display());
    Ok(())
}

/// Gzip `src` into `dest`, replacing any existing file.
pub fn gzip_file(src: &Path, dest: &Path) -> anyhow::Result<()> {
    let input = File::open(src).with_context(|| format!("failed to open {}", src.display()))?;
    let output = File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(output), Compression::best());
    std::io::copy(&mut BufReader::new(input), &mut encoder)?;
    encoder.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{scratch_dir, write_fixtures, TRACKS};
    use crate::dataset::{load_database, IMPACTS_FILE};
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn migrate_copies_tables_and_compresses_tracks() {
        let root = scratch_dir("migrate");
        let tables = source_tables_dir(&root);
        std::fs::create_dir_all(&tables).unwrap();
        write_fixtures(&tables);
        let data = root.join("data");

        run_migrate(&root, &data).unwrap();

        for table in SOURCE_TABLES {
            assert!(data.join(table).exists(), "{} not copied", table);
        }
        let mut text = String::new();
        GzDecoder::new(File::open(data.join(TRACKS_GZ_FILE)).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, TRACKS);

        let db = load_database(&data, true).unwrap();
        assert_eq!(db.query_countries().unwrap().len(), 3);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn migrate_stops_on_missing_table() {
        let root = scratch_dir("migrate-missing");
        let tables = source_tables_dir(&root);
        std::fs::create_dir_all(&tables).unwrap();
        write_fixtures(&tables);
        std::fs::remove_file(tables.join(IMPACTS_FILE)).unwrap();

        let Err(err) = run_migrate(&root, &root.join("data")) else {
            panic!("migrate should fail without {}", IMPACTS_FILE);
        };
        assert!(format!("{:#}", err).contains(IMPACTS_FILE));
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn migrate_requires_source_layout() {
        let root = scratch_dir("migrate-empty");
        assert!(run_migrate(&root, &root.join("data")).is_err());
        std::fs::remove_dir_all(&root).unwrap();
    }
}
