//! Locating real wind files and staging synthetic ones on disk.

use std::path::PathBuf;

use tempfile::TempDir;

/// File name of the bundled local forecast.
pub const LOCAL_WIND_FILE: &str = "gfs_20260226_00z.nc";

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// Find a real data file under `$TEST_DATA_DIR`, then `<root>/data`, then `<root>/testdata`.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    std::env::var_os("TEST_DATA_DIR")
        .map(|dir| PathBuf::from(dir).join(name))
        .into_iter()
        .chain([root.join("data").join(name), root.join("testdata").join(name)])
        .find(|path| path.is_file())
}

/// Write `bytes` as the local wind file inside a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn stage_local_wind_file(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(LOCAL_WIND_FILE);
    std::fs::write(&path, bytes).expect("write local wind file");
    (dir, path)
}
