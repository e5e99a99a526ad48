pub mod beacon_block;
pub mod beacon_state;
