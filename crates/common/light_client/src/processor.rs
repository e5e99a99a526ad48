use std::sync::Arc;

use alloy_primitives::B256;
use lantern_consensus_beacon::sync_committee::SyncCommittee;
use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
use lantern_network_spec::networks::BeaconNetworkSpec;
use tracing::{debug, info};
use tree_hash::TreeHash;

use crate::{
    bootstrap::LightClientBootstrap,
    errors::ProcessorError,
    finality_update::LightClientFinalityUpdate,
    optimistic_update::LightClientOptimisticUpdate,
    proof::{self, StateField},
    store::is_better_update,
    update::LightClientUpdate,
};

/// Light client state that follows the chain from a trusted bootstrap.
///
/// Sync committee signatures are not checked here. Callers verify the aggregate signature of an
/// update before handing it over.
#[derive(Debug, Clone)]
pub struct LightClientProcessor {
    network_spec: Arc<BeaconNetworkSpec>,
    finalized_header: BeaconBlockHeader,
    current_sync_committee: Arc<SyncCommittee>,
    next_sync_committee: Option<Arc<SyncCommittee>>,
    /// Best update seen since finality last advanced, applied by a force update on timeout
    best_valid_update: Option<LightClientUpdate>,
    optimistic_header: BeaconBlockHeader,
    previous_max_active_participants: u64,
    current_max_active_participants: u64,
}

impl LightClientProcessor {
    pub fn new(
        trusted_block_root: B256,
        bootstrap: &LightClientBootstrap,
        network_spec: Arc<BeaconNetworkSpec>,
    ) -> Result<Self, ProcessorError> {
        bootstrap
            .verify(trusted_block_root)
            .map_err(ProcessorError::InvalidBootstrap)?;
        Ok(Self {
            network_spec,
            finalized_header: bootstrap.header.clone(),
            current_sync_committee: bootstrap.current_sync_committee.clone(),
            next_sync_committee: None,
            best_valid_update: None,
            optimistic_header: bootstrap.header.clone(),
            previous_max_active_participants: 0,
            current_max_active_participants: 0,
        })
    }

    pub fn finalized_header(&self) -> &BeaconBlockHeader {
        &self.finalized_header
    }

    pub fn optimistic_header(&self) -> &BeaconBlockHeader {
        &self.optimistic_header
    }

    pub fn current_sync_committee(&self) -> &Arc<SyncCommittee> {
        &self.current_sync_committee
    }

    pub fn next_sync_committee(&self) -> Option<&Arc<SyncCommittee>> {
        self.next_sync_committee.as_ref()
    }

    pub fn best_valid_update(&self) -> Option<&LightClientUpdate> {
        self.best_valid_update.as_ref()
    }

    /// Participants an update needs to move the optimistic header.
    pub fn safety_threshold(&self) -> u64 {
        self.previous_max_active_participants
            .max(self.current_max_active_participants)
            / 2
    }

    fn period_at_slot(&self, slot: u64) -> u64 {
        self.network_spec
            .compute_sync_committee_period_at_slot(slot)
    }

    /// Check `update` can be processed at `current_slot`, except for its signature.
    pub fn validate_update(
        &self,
        update: &LightClientUpdate,
        current_slot: u64,
    ) -> Result<(), ProcessorError> {
        let participants = update.num_participants();
        let minimum = self.network_spec.min_sync_committee_participants;
        if participants < minimum {
            return Err(ProcessorError::InsufficientParticipation {
                participants,
                minimum,
            });
        }

        let attested_slot = update.attested_header.slot;
        let finalized_slot = update.finalized_header().slot;
        if !(current_slot >= update.signature_slot
            && update.signature_slot > attested_slot
            && attested_slot >= finalized_slot)
        {
            return Err(ProcessorError::SlotsOutOfOrder {
                current_slot,
                signature_slot: update.signature_slot,
                attested_slot,
                finalized_slot,
            });
        }

        let store_period = self.period_at_slot(self.finalized_header.slot);
        let signature_period = self.period_at_slot(update.signature_slot);
        let period_is_known = match self.next_sync_committee {
            Some(_) => signature_period == store_period || signature_period == store_period + 1,
            None => signature_period == store_period,
        };
        if !period_is_known {
            return Err(ProcessorError::SkipsPeriod {
                store_period,
                signature_period,
            });
        }

        let attested_period = self.period_at_slot(attested_slot);
        let brings_next_sync_committee = self.next_sync_committee.is_none()
            && update.is_sync_committee_update()
            && attested_period == store_period;
        if attested_slot <= self.finalized_header.slot && !brings_next_sync_committee {
            return Err(ProcessorError::NotRelevant {
                attested_slot,
                finalized_slot: self.finalized_header.slot,
            });
        }

        if let Some(finality) = &update.finality {
            finality
                .verify(update.attested_header.state_root)
                .map_err(ProcessorError::InvalidFinalityBranch)?;
        }

        if let Some(proof) = &update.next_sync_committee {
            if attested_period == store_period {
                if let Some(known) = &self.next_sync_committee {
                    if known != &proof.next_sync_committee {
                        return Err(ProcessorError::NextSyncCommitteeMismatch);
                    }
                }
            }
            if !proof::is_valid_branch(
                proof.next_sync_committee.tree_hash_root(),
                &proof.next_sync_committee_branch,
                StateField::NextSyncCommittee,
                update.attested_header.state_root,
            ) {
                return Err(ProcessorError::InvalidNextSyncCommitteeBranch);
            }
        }

        Ok(())
    }

    /// Validate `update` and fold it into the store.
    ///
    /// The optimistic header follows any update above the safety threshold. Finality and the
    /// sync committees only move with a two-thirds supermajority.
    pub fn process_update(
        &mut self,
        update: LightClientUpdate,
        current_slot: u64,
    ) -> Result<(), ProcessorError> {
        self.validate_update(&update, current_slot)?;
        let participants = update.num_participants();

        if self
            .best_valid_update
            .as_ref()
            .is_none_or(|best| is_better_update(best, &update))
        {
            self.best_valid_update = Some(update.clone());
        }

        self.current_max_active_participants =
            self.current_max_active_participants.max(participants);

        if participants > self.safety_threshold()
            && update.attested_header.slot > self.optimistic_header.slot
        {
            debug!(
                "Optimistic header moved to slot {}",
                update.attested_header.slot
            );
            self.optimistic_header = update.attested_header.clone();
        }

        let finalized_slot = update.finalized_header().slot;
        let has_finalized_next_sync_committee = self.next_sync_committee.is_none()
            && update.is_sync_committee_update()
            && update.is_finality_update()
            && self.period_at_slot(finalized_slot)
                == self.period_at_slot(update.attested_header.slot);
        let advances_finality =
            update.is_finality_update() && finalized_slot > self.finalized_header.slot;
        let has_supermajority = participants * 3 >= self.network_spec.sync_committee_size * 2;

        if has_supermajority && (advances_finality || has_finalized_next_sync_committee) {
            self.apply_update(&update, update.finalized_header().clone())?;
            self.best_valid_update = None;
        }
        Ok(())
    }

    pub fn process_finality_update(
        &mut self,
        update: &LightClientFinalityUpdate,
        current_slot: u64,
    ) -> Result<(), ProcessorError> {
        let update = LightClientUpdate {
            attested_header: update.attested_header.clone(),
            next_sync_committee: None,
            finality: update.finality.clone(),
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        };
        self.process_update(update, current_slot)
    }

    pub fn process_optimistic_update(
        &mut self,
        update: &LightClientOptimisticUpdate,
        current_slot: u64,
    ) -> Result<(), ProcessorError> {
        let update = LightClientUpdate {
            attested_header: update.attested_header.clone(),
            next_sync_committee: None,
            finality: None,
            sync_aggregate: update.sync_aggregate.clone(),
            signature_slot: update.signature_slot,
        };
        self.process_update(update, current_slot)
    }

    /// Apply the best valid update once finality has not moved for a whole sync committee period.
    pub fn process_force_update(&mut self, current_slot: u64) -> Result<(), ProcessorError> {
        let update_timeout = self.network_spec.slots_per_sync_committee_period();
        if current_slot <= self.finalized_header.slot.saturating_add(update_timeout) {
            return Ok(());
        }
        let Some(update) = self.best_valid_update.take() else {
            return Ok(());
        };

        // Without newer finality the attested header stands in for the finalized one
        let finalized_header = if update.finalized_header().slot <= self.finalized_header.slot {
            update.attested_header.clone()
        } else {
            update.finalized_header().clone()
        };
        info!(
            "Forcing light client update at slot {current_slot}, finalizing slot {}",
            finalized_header.slot
        );
        if let Err(err) = self.apply_update(&update, finalized_header) {
            self.best_valid_update = Some(update);
            return Err(err);
        }
        Ok(())
    }

    fn apply_update(
        &mut self,
        update: &LightClientUpdate,
        finalized_header: BeaconBlockHeader,
    ) -> Result<(), ProcessorError> {
        let store_period = self.period_at_slot(self.finalized_header.slot);
        let finalized_period = self.period_at_slot(finalized_header.slot);
        let update_next_sync_committee = update
            .next_sync_committee
            .as_ref()
            .map(|proof| proof.next_sync_committee.clone());

        if self.next_sync_committee.is_none() {
            if finalized_period != store_period {
                return Err(ProcessorError::FinalizedPeriodMismatch {
                    store_period,
                    finalized_period,
                });
            }
            self.next_sync_committee = update_next_sync_committee;
        } else if finalized_period == store_period + 1 {
            if let Some(next_sync_committee) = self.next_sync_committee.take() {
                self.current_sync_committee = next_sync_committee;
            }
            self.next_sync_committee = update_next_sync_committee;
            self.previous_max_active_participants = self.current_max_active_participants;
            self.current_max_active_participants = 0;
            info!("Light client entered sync committee period {finalized_period}");
        }

        if finalized_header.slot > self.finalized_header.slot {
            self.finalized_header = finalized_header;
            if self.finalized_header.slot > self.optimistic_header.slot {
                self.optimistic_header = self.finalized_header.clone();
            }
        }
        Ok(())
    }
}
