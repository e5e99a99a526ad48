use alloy_primitives::B256;
use lantern_consensus_misc::fork_name::ForkName;
use thiserror::Error;

use crate::proof::StateField;

/// How a transport should treat a [`LightClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inputs were malformed or inconsistent. Retrying will not help.
    Validation,
    /// Nothing is stored for the request yet.
    NotFound,
    /// Chain data or proof data could not be produced. May succeed on retry.
    Infrastructure,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateReason {
    #[error("state epoch {epoch} is before the Altair fork epoch {altair_fork_epoch}")]
    PreAltair { epoch: u64, altair_fork_epoch: u64 },
    #[error("state slot {slot} does not match latest block header slot {header_slot}")]
    SlotMismatch { slot: u64, header_slot: u64 },
}

#[derive(Debug, Error)]
pub enum LightClientError {
    #[error("Invalid state for bootstrap: {0}")]
    InvalidState(InvalidStateReason),

    #[error(
        "Attested state epoch {epoch} is before the Altair fork epoch {altair_fork_epoch}"
    )]
    AttestedTooOld { epoch: u64, altair_fork_epoch: u64 },

    #[error("Sync committee participants {participants} below minimum {minimum}")]
    InsufficientParticipation { participants: u64, minimum: u64 },

    #[error("State slot {slot} must be equal to latest block header slot {header_slot}")]
    InconsistentState { slot: u64, header_slot: u64 },

    #[error("Header root {header_root} does not match block root {block_root}")]
    HeaderBlockMismatch { header_root: B256, block_root: B256 },

    #[error(
        "Attested state slot {slot} must be equal to attested latest block header slot {header_slot}"
    )]
    InconsistentAttestedState { slot: u64, header_slot: u64 },

    #[error("Attested header root {attested_header_root} does not match block parent root {parent_root}")]
    AttestedNotParent {
        attested_header_root: B256,
        parent_root: B256,
    },

    #[error(
        "Finalized header root {finalized_header_root} does not match attested finalized checkpoint root {checkpoint_root}"
    )]
    FinalizedHeaderMismatch {
        finalized_header_root: B256,
        checkpoint_root: B256,
    },

    #[error("Finalized block is genesis but attested finalized checkpoint root is {checkpoint_root}")]
    FinalizedCheckpointMismatch { checkpoint_root: B256 },

    #[error("{fork} block carries no sync aggregate")]
    MissingSyncAggregate { fork: ForkName },

    #[error("Cannot prove {field} from {fork} state: {reason}")]
    ProofUnavailable {
        field: StateField,
        fork: ForkName,
        reason: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to read chain data: {0:#}")]
    Provider(#[from] anyhow::Error),
}

/// Why a light client rejected a bootstrap or an update.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Invalid bootstrap: {0:#}")]
    InvalidBootstrap(anyhow::Error),

    #[error("Sync committee participants {participants} below minimum {minimum}")]
    InsufficientParticipation { participants: u64, minimum: u64 },

    #[error(
        "Update slots out of order: current {current_slot}, signature {signature_slot}, attested {attested_slot}, finalized {finalized_slot}"
    )]
    SlotsOutOfOrder {
        current_slot: u64,
        signature_slot: u64,
        attested_slot: u64,
        finalized_slot: u64,
    },

    #[error("Update signed in period {signature_period} skips past store period {store_period}")]
    SkipsPeriod {
        store_period: u64,
        signature_period: u64,
    },

    #[error("Update attesting slot {attested_slot} is not newer than finalized slot {finalized_slot}")]
    NotRelevant {
        attested_slot: u64,
        finalized_slot: u64,
    },

    #[error("Invalid finality branch: {0:#}")]
    InvalidFinalityBranch(anyhow::Error),

    #[error("Next sync committee differs from the one already known")]
    NextSyncCommitteeMismatch,

    #[error("Invalid next sync committee branch")]
    InvalidNextSyncCommitteeBranch,

    #[error("Update finalized period {finalized_period} does not match store period {store_period}")]
    FinalizedPeriodMismatch {
        store_period: u64,
        finalized_period: u64,
    },
}

impl LightClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LightClientError::InvalidState(_)
            | LightClientError::AttestedTooOld { .. }
            | LightClientError::InsufficientParticipation { .. }
            | LightClientError::InconsistentState { .. }
            | LightClientError::HeaderBlockMismatch { .. }
            | LightClientError::InconsistentAttestedState { .. }
            | LightClientError::AttestedNotParent { .. }
            | LightClientError::FinalizedHeaderMismatch { .. }
            | LightClientError::FinalizedCheckpointMismatch { .. }
            | LightClientError::MissingSyncAggregate { .. } => ErrorKind::Validation,
            LightClientError::NotFound(_) => ErrorKind::NotFound,
            LightClientError::ProofUnavailable { .. } | LightClientError::Provider(_) => {
                ErrorKind::Infrastructure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_error_kinds() {
        let validation = LightClientError::InsufficientParticipation {
            participants: 0,
            minimum: 1,
        };
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let not_found = LightClientError::NotFound("Finality update".to_string());
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.to_string(), "Finality update not found");

        let provider = LightClientError::from(anyhow!("disk on fire"));
        assert_eq!(provider.kind(), ErrorKind::Infrastructure);
        assert!(provider.to_string().contains("disk on fire"));

        let invalid = LightClientError::InvalidState(InvalidStateReason::SlotMismatch {
            slot: 10,
            header_slot: 9,
        });
        assert_eq!(invalid.kind(), ErrorKind::Validation);
        assert_eq!(
            invalid.to_string(),
            "Invalid state for bootstrap: state slot 10 does not match latest block header slot 9"
        );
    }
}
