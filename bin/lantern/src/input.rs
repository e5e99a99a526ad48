use std::{fs, path::Path};

use anyhow::Context;
use lantern_consensus_beacon::{beacon_block::SignedBeaconBlock, beacon_state::BeaconState};
use lantern_network_spec::networks::BeaconNetworkSpec;
use snap::raw::Decoder;

const SNAPPY_EXTENSION: &str = "ssz_snappy";

/// Read an SSZ file, decompressing it first when it ends in `.ssz_snappy`.
pub fn read_ssz_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == SNAPPY_EXTENSION) {
        return Decoder::new()
            .decompress_vec(&bytes)
            .with_context(|| format!("Failed to decompress {}", path.display()));
    }
    Ok(bytes)
}

pub fn read_state(path: &Path, network_spec: &BeaconNetworkSpec) -> anyhow::Result<BeaconState> {
    BeaconState::from_ssz_bytes_with_spec(&read_ssz_file(path)?, network_spec)
        .with_context(|| format!("Failed to decode beacon state {}", path.display()))
}

pub fn read_block(
    path: &Path,
    network_spec: &BeaconNetworkSpec,
) -> anyhow::Result<SignedBeaconBlock> {
    SignedBeaconBlock::from_ssz_bytes_with_spec(&read_ssz_file(path)?, network_spec)
        .with_context(|| format!("Failed to decode signed block {}", path.display()))
}

/// `<dir>/<name>.ssz_snappy` if present, otherwise `<dir>/<name>.ssz`.
pub fn find_ssz_file(dir: &Path, name: &str) -> Option<std::path::PathBuf> {
    [SNAPPY_EXTENSION, "ssz"]
        .iter()
        .map(|extension| dir.join(format!("{name}.{extension}")))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use lantern_consensus_beacon::deneb;
    use lantern_network_spec::networks::DEV;
    use snap::raw::Encoder;
    use ssz::Encode;

    use super::*;

    #[test]
    fn test_read_plain_and_snappy_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = BeaconState::Deneb(deneb::beacon_state::BeaconState {
            slot: 12,
            ..Default::default()
        });
        let bytes = state.as_ssz_bytes();

        let plain = dir.path().join("state.ssz");
        fs::write(&plain, &bytes).unwrap();
        let snappy = dir.path().join("state.ssz_snappy");
        fs::write(&snappy, Encoder::new().compress_vec(&bytes).unwrap()).unwrap();

        assert_eq!(read_state(&plain, &DEV).unwrap(), state);
        assert_eq!(read_state(&snappy, &DEV).unwrap(), state);
        assert_eq!(find_ssz_file(dir.path(), "state"), Some(snappy));
        assert_eq!(find_ssz_file(dir.path(), "block"), None);
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_ssz_file(Path::new("/nonexistent/block.ssz")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/block.ssz"));
    }

    #[test]
    fn test_corrupt_snappy_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block.ssz_snappy");
        fs::write(&path, [0xFF; 16]).unwrap();
        assert!(read_block(&path, &DEV).is_err());
    }
}
