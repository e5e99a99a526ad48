pub mod beacon_block;
pub mod beacon_state;
pub mod execution_payload;
