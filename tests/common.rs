//! Test utilities & fixtures.
//! Static inputs live under `tests/test-data-int`; tests that write copy into a temp dir.

use std::path::{Path, PathBuf};

use superadventure::adventure::{Controller, Rules, ScriptedDice, World};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// Controller over `world` whose dice replay `rolls` in order.
#[allow(dead_code)]
pub fn scripted(world: &World, rolls: Vec<i32>) -> Controller<'_, ScriptedDice> {
    Controller::new(world, ScriptedDice::new(rolls), Rules::default())
}

/// Writable temp dir plus the save path a test should use inside it.
#[allow(dead_code)]
pub fn temp_save() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("PlayerData.xml");
    (tmp, path)
}
