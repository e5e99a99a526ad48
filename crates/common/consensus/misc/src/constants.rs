pub const GENESIS_SLOT: u64 = 0;
pub const GENESIS_EPOCH: u64 = 0;
pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;

/// Mainnet preset values. Networks may override them through their config.
pub const SLOTS_PER_EPOCH: u64 = 32;
pub const EPOCHS_PER_SYNC_COMMITTEE_PERIOD: u64 = 256;
pub const SYNC_COMMITTEE_SIZE: u64 = 512;
pub const MIN_SYNC_COMMITTEE_PARTICIPANTS: u64 = 1;
pub const MAX_REQUEST_LIGHT_CLIENT_UPDATES: u64 = 128;

/// Depth of the merkle tree over ``BeaconState`` fields from Phase0 through Deneb.
pub const BEACON_STATE_MERKLE_DEPTH: u64 = 5;

/// Field indices inside ``BeaconState``.
pub const FINALIZED_CHECKPOINT_INDEX: u64 = 20;
pub const CURRENT_SYNC_COMMITTEE_INDEX: u64 = 22;
pub const NEXT_SYNC_COMMITTEE_INDEX: u64 = 23;

/// Generalized indices of the light client proof targets.
pub const FINALIZED_ROOT_GINDEX: u64 = 105;
pub const CURRENT_SYNC_COMMITTEE_GINDEX: u64 = 54;
pub const NEXT_SYNC_COMMITTEE_GINDEX: u64 = 55;
