use lantern_consensus_beacon::beacon_state::BeaconState;
use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
use tree_hash::TreeHash;

/// `state.latest_block_header` with its `state_root` filled in.
///
/// The header cached in the state is written during block processing, before the post state root
/// is known, so its `state_root` is zero until the next slot is processed.
pub fn header_from_state(state: &BeaconState) -> BeaconBlockHeader {
    let mut header = state.latest_block_header().clone();
    header.state_root = state.tree_hash_root();
    header
}

/// Whether `state` sits exactly at the slot of its latest block.
pub(crate) fn is_at_block_slot(state: &BeaconState) -> bool {
    state.slot() == state.latest_block_header().slot
}
