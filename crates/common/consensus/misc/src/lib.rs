pub mod attestation_data;
pub mod beacon_block_header;
pub mod checkpoint;
pub mod constants;
pub mod deposit_data;
pub mod eth_1_data;
pub mod fork;
pub mod fork_name;
pub mod indexed_attestation;
pub mod pending_attestation;
pub mod validator;
