pub mod altair;
pub mod attestation;
pub mod attester_slashing;
pub mod beacon_block;
pub mod beacon_state;
pub mod bellatrix;
pub mod bls_to_execution_change;
pub mod capella;
pub mod deneb;
pub mod deposit;
pub mod historical_summary;
pub mod kzg_commitment;
pub mod phase0;
pub mod proposer_slashing;
pub mod quoted_u8_var_list;
pub mod sync_aggregate;
pub mod sync_committee;
pub mod voluntary_exit;
pub mod withdrawal;
