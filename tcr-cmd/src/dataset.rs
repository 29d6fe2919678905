//! Loading the provisioned tables from a data directory.

use anyhow::Context;
use flate2::read::GzDecoder;
use log::{info, warn};
use std::io::Read;
use std::path::Path;
use tcr_db::Database;

pub const TRACKS_FILE: &str = "tracks.csv";
pub const TRACKS_GZ_FILE: &str = "tracks.csv.gz";
pub const THRESHOLDS_FILE: &str = "thresholds.csv";
pub const COUNTRIES_FILE: &str = "countries.geojson";
pub const IMPACTS_FILE: &str = "impacts.csv";

/// Tables `migrate` copies, in load order.
pub const SOURCE_TABLES: [&str; 4] = [COUNTRIES_FILE, THRESHOLDS_FILE, TRACKS_FILE, IMPACTS_FILE];

/// Read a required table, failing with the path in the message.
fn read_table(dir: &Path, file: &str) -> anyhow::Result<String> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read the track table, preferring plain CSV over the compressed copy.
fn read_tracks(dir: &Path) -> anyhow::Result<String> {
    let plain = dir.join(TRACKS_FILE);
    if plain.exists() {
        return read_table(dir, TRACKS_FILE);
    }
    let gz = dir.join(TRACKS_GZ_FILE);
    let bytes = std::fs::read(&gz).with_context(|| {
        format!(
            "failed to read {} or {}",
            plain.display(),
            gz.display()
        )
    })?;
    let mut text = String::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut text)
        .with_context(|| format!("failed to decompress {}", gz.display()))?;
    Ok(text)
}

/// Build the in-memory snapshot from `dir`.
///
/// Countries, thresholds and tracks are required. Impacts are loaded only
/// when `with_impacts` is set, and then they are required too.
pub fn load_database(dir: &Path, with_impacts: bool) -> anyhow::Result<Database> {
    if !dir.is_dir() {
        anyhow::bail!(
            "data directory {} not found. Run `tcr-cli migrate` first.",
            dir.display()
        );
    }

    let db = Database::new()?;
    db.load_countries(&read_table(dir, COUNTRIES_FILE)?)
        .context("failed to load countries")?;
    db.load_thresholds(&read_table(dir, THRESHOLDS_FILE)?)
        .context("failed to load thresholds")?;
    db.load_tracks(&read_tracks(dir)?)
        .context("failed to load tracks")?;

    if with_impacts {
        db.load_impacts(&read_table(dir, IMPACTS_FILE)?)
            .context("failed to load impacts")?;
    } else if !dir.join(IMPACTS_FILE).exists() {
        warn!("{} not found in {}", IMPACTS_FILE, dir.display());
    }

    info!("Loaded cyclone snapshot from {}", dir.display());
    Ok(db)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;

    pub(crate) const TRACKS: &str = include_str!("../../fixtures/tracks.csv");
    pub(crate) const THRESHOLDS: &str = include_str!("../../fixtures/thresholds.csv");
    pub(crate) const COUNTRIES: &str = include_str!("../../fixtures/countries.geojson");
    pub(crate) const IMPACTS: &str = include_str!("../../fixtures/impacts.csv");

    /// A fresh scratch directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tcr-cmd-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn write_fixtures(dir: &Path) {
        std::fs::write(dir.join(TRACKS_FILE), TRACKS).unwrap();
        std::fs::write(dir.join(THRESHOLDS_FILE), THRESHOLDS).unwrap();
        std::fs::write(dir.join(COUNTRIES_FILE), COUNTRIES).unwrap();
        std::fs::write(dir.join(IMPACTS_FILE), IMPACTS).unwrap();
    }

    #[test]
    fn loads_all_tables() {
        let dir = scratch_dir("load-all");
        write_fixtures(&dir);
        let db = load_database(&dir, true).unwrap();
        assert_eq!(db.query_countries().unwrap().len(), 3);
        assert!(!db.query_impacts(83).unwrap().is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn falls_back_to_compressed_tracks() {
        let dir = scratch_dir("gz-tracks");
        write_fixtures(&dir);
        std::fs::remove_file(dir.join(TRACKS_FILE)).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(TRACKS.as_bytes()).unwrap();
        std::fs::write(dir.join(TRACKS_GZ_FILE), encoder.finish().unwrap()).unwrap();

        let db = load_database(&dir, false).unwrap();
        assert_eq!(db.query_year_range(83).unwrap(), Some((1980, 2022)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_required_table_fails() {
        let dir = scratch_dir("missing");
        write_fixtures(&dir);
        std::fs::remove_file(dir.join(THRESHOLDS_FILE)).unwrap();
        let Err(err) = load_database(&dir, false) else {
            panic!("load should fail without {}", THRESHOLDS_FILE);
        };
        assert!(format!("{:#}", err).contains(THRESHOLDS_FILE));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = std::env::temp_dir().join("tcr-cmd-does-not-exist");
        assert!(load_database(&dir, false).is_err());
    }
}
