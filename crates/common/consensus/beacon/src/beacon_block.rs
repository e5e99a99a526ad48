use alloy_primitives::B256;
use anyhow::{anyhow, ensure};
use lantern_bls::BlsSignature;
use lantern_consensus_misc::{
    beacon_block_header::BeaconBlockHeader, fork_name::ForkName,
};
use lantern_network_spec::networks::BeaconNetworkSpec;
use ssz::Decode;
use ssz_derive::Encode;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{altair, bellatrix, capella, deneb, phase0, sync_aggregate::SyncAggregate};

/// Byte range of ``message.slot`` inside an encoded ``SignedBeaconBlock``: a 4 byte offset to the
/// message and the 96 byte signature come first.
const SIGNED_BLOCK_SLOT_RANGE: std::ops::Range<usize> = 100..108;

/// A signed block of any supported fork.
#[derive(Debug, PartialEq, Eq, Clone, Encode, TreeHash)]
#[ssz(enum_behaviour = "transparent")]
#[tree_hash(enum_behaviour = "transparent")]
pub enum SignedBeaconBlock {
    Phase0(phase0::beacon_block::SignedBeaconBlock),
    Altair(altair::beacon_block::SignedBeaconBlock),
    Bellatrix(bellatrix::beacon_block::SignedBeaconBlock),
    Capella(capella::beacon_block::SignedBeaconBlock),
    Deneb(deneb::beacon_block::SignedBeaconBlock),
}

macro_rules! map_signed_block {
    ($block:expr, $inner:ident => $body:expr) => {
        match $block {
            SignedBeaconBlock::Phase0($inner) => $body,
            SignedBeaconBlock::Altair($inner) => $body,
            SignedBeaconBlock::Bellatrix($inner) => $body,
            SignedBeaconBlock::Capella($inner) => $body,
            SignedBeaconBlock::Deneb($inner) => $body,
        }
    };
}

impl SignedBeaconBlock {
    pub fn fork_name(&self) -> ForkName {
        match self {
            SignedBeaconBlock::Phase0(_) => ForkName::Phase0,
            SignedBeaconBlock::Altair(_) => ForkName::Altair,
            SignedBeaconBlock::Bellatrix(_) => ForkName::Bellatrix,
            SignedBeaconBlock::Capella(_) => ForkName::Capella,
            SignedBeaconBlock::Deneb(_) => ForkName::Deneb,
        }
    }

    pub fn slot(&self) -> u64 {
        map_signed_block!(self, block => block.message.slot)
    }

    pub fn proposer_index(&self) -> u64 {
        map_signed_block!(self, block => block.message.proposer_index)
    }

    pub fn parent_root(&self) -> B256 {
        map_signed_block!(self, block => block.message.parent_root)
    }

    pub fn state_root(&self) -> B256 {
        map_signed_block!(self, block => block.message.state_root)
    }

    pub fn body_root(&self) -> B256 {
        map_signed_block!(self, block => block.message.body.tree_hash_root())
    }

    /// Root of the unsigned block, which is how blocks are referenced by the chain.
    pub fn block_root(&self) -> B256 {
        map_signed_block!(self, block => block.message.tree_hash_root())
    }

    pub fn signature(&self) -> &BlsSignature {
        map_signed_block!(self, block => &block.signature)
    }

    /// Header with the same hash tree root as the block message.
    pub fn header(&self) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: self.slot(),
            proposer_index: self.proposer_index(),
            parent_root: self.parent_root(),
            state_root: self.state_root(),
            body_root: self.body_root(),
        }
    }

    /// `None` for Phase0 blocks, which predate sync committees.
    pub fn sync_aggregate(&self) -> Option<&SyncAggregate> {
        match self {
            SignedBeaconBlock::Phase0(_) => None,
            SignedBeaconBlock::Altair(block) => Some(&block.message.body.sync_aggregate),
            SignedBeaconBlock::Bellatrix(block) => Some(&block.message.body.sync_aggregate),
            SignedBeaconBlock::Capella(block) => Some(&block.message.body.sync_aggregate),
            SignedBeaconBlock::Deneb(block) => Some(&block.message.body.sync_aggregate),
        }
    }

    /// SSZ decode with explicit fork variant.
    pub fn from_ssz_bytes(bytes: &[u8], fork_name: ForkName) -> Result<Self, ssz::DecodeError> {
        Ok(match fork_name {
            ForkName::Phase0 => {
                Self::Phase0(phase0::beacon_block::SignedBeaconBlock::from_ssz_bytes(bytes)?)
            }
            ForkName::Altair => {
                Self::Altair(altair::beacon_block::SignedBeaconBlock::from_ssz_bytes(bytes)?)
            }
            ForkName::Bellatrix => Self::Bellatrix(
                bellatrix::beacon_block::SignedBeaconBlock::from_ssz_bytes(bytes)?,
            ),
            ForkName::Capella => {
                Self::Capella(capella::beacon_block::SignedBeaconBlock::from_ssz_bytes(bytes)?)
            }
            ForkName::Deneb => {
                Self::Deneb(deneb::beacon_block::SignedBeaconBlock::from_ssz_bytes(bytes)?)
            }
        })
    }

    /// SSZ decode, picking the fork from the slot embedded in the encoding.
    pub fn from_ssz_bytes_with_spec(
        bytes: &[u8],
        network_spec: &BeaconNetworkSpec,
    ) -> anyhow::Result<Self> {
        let slot = read_slot(bytes, SIGNED_BLOCK_SLOT_RANGE)?;
        let fork_name = network_spec.fork_name_at_slot(slot)?;
        Self::from_ssz_bytes(bytes, fork_name)
            .map_err(|err| anyhow!("Failed to decode {fork_name} block at slot {slot}: {err:?}"))
    }
}

pub(crate) fn read_slot(bytes: &[u8], range: std::ops::Range<usize>) -> anyhow::Result<u64> {
    ensure!(
        bytes.len() >= range.end,
        "Encoding of {} bytes is too short to contain a slot",
        bytes.len()
    );
    let mut slot = [0u8; 8];
    slot.copy_from_slice(&bytes[range]);
    Ok(u64::from_le_bytes(slot))
}

impl From<phase0::beacon_block::SignedBeaconBlock> for SignedBeaconBlock {
    fn from(block: phase0::beacon_block::SignedBeaconBlock) -> Self {
        Self::Phase0(block)
    }
}

impl From<altair::beacon_block::SignedBeaconBlock> for SignedBeaconBlock {
    fn from(block: altair::beacon_block::SignedBeaconBlock) -> Self {
        Self::Altair(block)
    }
}

impl From<bellatrix::beacon_block::SignedBeaconBlock> for SignedBeaconBlock {
    fn from(block: bellatrix::beacon_block::SignedBeaconBlock) -> Self {
        Self::Bellatrix(block)
    }
}

impl From<capella::beacon_block::SignedBeaconBlock> for SignedBeaconBlock {
    fn from(block: capella::beacon_block::SignedBeaconBlock) -> Self {
        Self::Capella(block)
    }
}

impl From<deneb::beacon_block::SignedBeaconBlock> for SignedBeaconBlock {
    fn from(block: deneb::beacon_block::SignedBeaconBlock) -> Self {
        Self::Deneb(block)
    }
}

#[cfg(test)]
mod tests {
    use lantern_network_spec::networks::MAINNET;
    use ssz::Encode;

    use super::*;

    fn deneb_block(slot: u64) -> SignedBeaconBlock {
        let mut block = deneb::beacon_block::SignedBeaconBlock::default();
        block.message.slot = slot;
        block.message.proposer_index = 9;
        block.message.parent_root = B256::repeat_byte(1);
        block.message.body.graffiti = B256::repeat_byte(2);
        block.into()
    }

    #[test]
    fn test_header_matches_block_root() {
        let block = deneb_block(5);
        let header = block.header();
        assert_eq!(header.tree_hash_root(), block.block_root());
        assert_eq!(header.slot, 5);
        assert_eq!(header.parent_root, B256::repeat_byte(1));
        assert_ne!(block.tree_hash_root(), block.block_root());
    }

    #[test]
    fn test_sync_aggregate_by_fork() {
        let phase0: SignedBeaconBlock = phase0::beacon_block::SignedBeaconBlock::default().into();
        assert!(phase0.sync_aggregate().is_none());
        assert_eq!(phase0.fork_name(), ForkName::Phase0);
        assert!(deneb_block(1).sync_aggregate().is_some());
    }

    #[test]
    fn test_decode_with_spec() {
        let deneb_slot = MAINNET.compute_start_slot_at_epoch(MAINNET.deneb_fork_epoch);
        let block = deneb_block(deneb_slot);
        let bytes = block.as_ssz_bytes();
        assert_eq!(read_slot(&bytes, SIGNED_BLOCK_SLOT_RANGE).unwrap(), deneb_slot);
        assert_eq!(
            SignedBeaconBlock::from_ssz_bytes_with_spec(&bytes, &MAINNET).unwrap(),
            block
        );

        let mut phase0 = phase0::beacon_block::SignedBeaconBlock::default();
        phase0.message.slot = 100;
        let phase0: SignedBeaconBlock = phase0.into();
        assert_eq!(
            SignedBeaconBlock::from_ssz_bytes_with_spec(&phase0.as_ssz_bytes(), &MAINNET).unwrap(),
            phase0
        );
    }

    #[test]
    fn test_decode_wrong_fork_fails() {
        let bytes = deneb_block(100).as_ssz_bytes();
        assert!(SignedBeaconBlock::from_ssz_bytes_with_spec(&bytes, &MAINNET).is_err());
        assert!(SignedBeaconBlock::from_ssz_bytes_with_spec(&bytes[..50], &MAINNET).is_err());
    }
}
