use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use lantern_network_spec::networks::BeaconNetworkSpec;

use crate::update::LightClientUpdate;

/// Whether `new` should replace `prev` as the best update of a period.
///
/// A finality claim always wins over none. Otherwise the update with more participants wins.
pub fn is_better_update(prev: &LightClientUpdate, new: &LightClientUpdate) -> bool {
    match (prev.is_finalized(), new.is_finalized()) {
        (false, true) => true,
        (true, false) => false,
        _ => new.num_participants() > prev.num_participants(),
    }
}

/// Whether `new` should replace `prev` as the latest finalized update.
pub fn is_latest_best_finalized_update(prev: &LightClientUpdate, new: &LightClientUpdate) -> bool {
    is_later_or_better(
        new.finalized_header().slot.cmp(&prev.finalized_header().slot),
        prev,
        new,
    )
}

/// Whether `new` should replace `prev` as the latest optimistic update.
pub fn is_latest_best_non_finalized_update(
    prev: &LightClientUpdate,
    new: &LightClientUpdate,
) -> bool {
    is_later_or_better(
        new.attested_header.slot.cmp(&prev.attested_header.slot),
        prev,
        new,
    )
}

fn is_later_or_better(
    slot_order: Ordering,
    prev: &LightClientUpdate,
    new: &LightClientUpdate,
) -> bool {
    match slot_order {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => new.num_participants() > prev.num_participants(),
    }
}

/// Which of the stored updates an insertion replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub best_for_period: bool,
    pub best_finalized: bool,
    pub best_non_finalized: bool,
}

impl InsertOutcome {
    pub fn changed(&self) -> bool {
        self.best_for_period || self.best_finalized || self.best_non_finalized
    }
}

/// The best known updates, keyed by the sync committee period of their signature slot.
#[derive(Debug, Clone)]
pub struct LightClientStore {
    slots_per_sync_committee_period: u64,
    best_for_period: BTreeMap<u64, Arc<LightClientUpdate>>,
    best_finalized: Option<Arc<LightClientUpdate>>,
    best_non_finalized: Option<Arc<LightClientUpdate>>,
}

impl LightClientStore {
    pub fn new(network_spec: &BeaconNetworkSpec) -> Self {
        Self {
            slots_per_sync_committee_period: network_spec.slots_per_sync_committee_period(),
            best_for_period: BTreeMap::new(),
            best_finalized: None,
            best_non_finalized: None,
        }
    }

    pub fn period_at_slot(&self, slot: u64) -> u64 {
        slot / self.slots_per_sync_committee_period
    }

    /// Offer `update` to each of the three slots. A slot is only replaced when the new update is
    /// strictly preferred, so re-inserting an equal or worse update changes nothing.
    pub fn insert(&mut self, update: Arc<LightClientUpdate>) -> InsertOutcome {
        let mut outcome = InsertOutcome::default();

        let period = self.period_at_slot(update.signature_slot);
        let replace = self
            .best_for_period
            .get(&period)
            .is_none_or(|prev| is_better_update(prev, &update));
        if replace {
            self.best_for_period.insert(period, update.clone());
            outcome.best_for_period = true;
        }

        if update.is_finalized() {
            let replace = self
                .best_finalized
                .as_ref()
                .is_none_or(|prev| is_latest_best_finalized_update(prev, &update));
            if replace {
                self.best_finalized = Some(update.clone());
                outcome.best_finalized = true;
            }
        }

        let replace = self
            .best_non_finalized
            .as_ref()
            .is_none_or(|prev| is_latest_best_non_finalized_update(prev, &update));
        if replace {
            self.best_non_finalized = Some(update);
            outcome.best_non_finalized = true;
        }

        outcome
    }

    pub fn best_update_for_period(&self, period: u64) -> Option<&Arc<LightClientUpdate>> {
        self.best_for_period.get(&period)
    }

    pub fn best_finalized_update(&self) -> Option<&Arc<LightClientUpdate>> {
        self.best_finalized.as_ref()
    }

    pub fn best_non_finalized_update(&self) -> Option<&Arc<LightClientUpdate>> {
        self.best_non_finalized.as_ref()
    }

    /// Best updates for the `count` periods from `start_period`. Periods with nothing stored are
    /// skipped.
    pub fn updates_by_range(&self, start_period: u64, count: u64) -> Vec<Arc<LightClientUpdate>> {
        self.best_for_period
            .range(start_period..start_period.saturating_add(count))
            .map(|(_, update)| update.clone())
            .collect()
    }

    /// Periods with a stored update, in ascending order.
    pub fn periods(&self) -> impl Iterator<Item = u64> + '_ {
        self.best_for_period.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.best_for_period.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use lantern_consensus_beacon::sync_aggregate::SyncAggregate;
    use lantern_consensus_misc::beacon_block_header::BeaconBlockHeader;
    use lantern_network_spec::networks::MAINNET;
    use rstest::rstest;

    use super::*;
    use crate::{
        proof::FinalityBranch,
        update::{FinalityProof, FinalizedHeader},
    };

    fn update(
        attested_slot: u64,
        finalized_slot: Option<u64>,
        participants: usize,
    ) -> LightClientUpdate {
        let mut sync_aggregate = SyncAggregate::default();
        for index in 0..participants {
            sync_aggregate.sync_committee_bits.set(index, true).unwrap();
        }
        LightClientUpdate {
            attested_header: BeaconBlockHeader {
                slot: attested_slot,
                state_root: B256::repeat_byte(0xA),
                ..Default::default()
            },
            next_sync_committee: None,
            finality: finalized_slot.map(|slot| FinalityProof {
                finalized_header: FinalizedHeader::Block(BeaconBlockHeader {
                    slot,
                    state_root: B256::repeat_byte(0xF),
                    ..Default::default()
                }),
                finality_branch: FinalityBranch::default(),
            }),
            sync_aggregate,
            signature_slot: attested_slot + 1,
        }
    }

    #[rstest]
    #[case::finality_beats_participation(update(10, None, 500), update(10, Some(1), 1), true)]
    #[case::no_finality_never_beats_finality(update(10, Some(1), 1), update(10, None, 512), false)]
    #[case::more_participants(update(10, None, 5), update(10, None, 6), true)]
    #[case::equal_participants(update(10, None, 5), update(11, None, 5), false)]
    #[case::fewer_participants(update(10, Some(1), 5), update(10, Some(2), 4), false)]
    fn test_is_better_update(
        #[case] prev: LightClientUpdate,
        #[case] new: LightClientUpdate,
        #[case] expected: bool,
    ) {
        assert_eq!(is_better_update(&prev, &new), expected);
    }

    #[rstest]
    #[case::later_finalized_slot(update(10, Some(1), 500), update(10, Some(2), 1), true)]
    #[case::earlier_finalized_slot(update(10, Some(2), 1), update(10, Some(1), 500), false)]
    #[case::tie_more_participants(update(10, Some(2), 1), update(12, Some(2), 2), true)]
    #[case::tie_same_participants(update(10, Some(2), 2), update(12, Some(2), 2), false)]
    fn test_is_latest_best_finalized_update(
        #[case] prev: LightClientUpdate,
        #[case] new: LightClientUpdate,
        #[case] expected: bool,
    ) {
        assert_eq!(is_latest_best_finalized_update(&prev, &new), expected);
    }

    #[rstest]
    #[case::later_attested_slot(update(10, None, 500), update(11, None, 1), true)]
    #[case::earlier_attested_slot(update(11, None, 1), update(10, None, 500), false)]
    #[case::tie_more_participants(update(10, None, 1), update(10, None, 2), true)]
    fn test_is_latest_best_non_finalized_update(
        #[case] prev: LightClientUpdate,
        #[case] new: LightClientUpdate,
        #[case] expected: bool,
    ) {
        assert_eq!(is_latest_best_non_finalized_update(&prev, &new), expected);
    }

    #[test]
    fn test_reinsert_is_noop() {
        let mut store = LightClientStore::new(&MAINNET);
        let update = Arc::new(update(100, Some(64), 300));

        let first = store.insert(update.clone());
        assert!(first.best_for_period && first.best_finalized && first.best_non_finalized);

        let second = store.insert(update.clone());
        assert!(!second.changed());
        assert_eq!(store.best_update_for_period(0), Some(&update));
        assert_eq!(store.best_finalized_update(), Some(&update));
        assert_eq!(store.best_non_finalized_update(), Some(&update));
    }

    #[test]
    fn test_finality_dominance() {
        let mut store = LightClientStore::new(&MAINNET);
        let finalized = Arc::new(update(100, Some(64), 1));
        store.insert(finalized.clone());

        let outcome = store.insert(Arc::new(update(101, None, 512)));
        assert!(!outcome.best_for_period);
        assert!(!outcome.best_finalized);
        assert!(outcome.best_non_finalized);
        assert_eq!(store.best_update_for_period(0), Some(&finalized));
        assert_eq!(store.best_finalized_update(), Some(&finalized));
        assert_eq!(store.best_non_finalized_update().unwrap().attested_header.slot, 101);
    }

    #[test]
    fn test_non_finalized_update_skips_best_finalized() {
        let mut store = LightClientStore::new(&MAINNET);
        let outcome = store.insert(Arc::new(update(100, None, 10)));
        assert!(outcome.best_for_period);
        assert!(!outcome.best_finalized);
        assert!(store.best_finalized_update().is_none());
    }

    #[test]
    fn test_updates_by_range_skips_gaps() {
        let mut store = LightClientStore::new(&MAINNET);
        let slots_per_period = MAINNET.slots_per_sync_committee_period();
        for period in [2, 3, 5] {
            store.insert(Arc::new(update(period * slots_per_period + 10, None, 10)));
        }
        let periods = |updates: Vec<Arc<LightClientUpdate>>| {
            updates
                .iter()
                .map(|update| store.period_at_slot(update.signature_slot))
                .collect::<Vec<_>>()
        };

        assert_eq!(store.periods().collect::<Vec<_>>(), vec![2, 3, 5]);
        assert_eq!(periods(store.updates_by_range(2, 4)), vec![2, 3, 5]);
        assert_eq!(periods(store.updates_by_range(2, 3)), vec![2, 3]);
        assert_eq!(periods(store.updates_by_range(4, 2)), vec![5]);
        assert_eq!(periods(store.updates_by_range(0, 10)), vec![2, 3, 5]);
        assert!(store.updates_by_range(2, 0).is_empty());
        assert!(store.updates_by_range(6, 10).is_empty());
        assert_eq!(periods(store.updates_by_range(3, u64::MAX)), vec![3, 5]);
    }
}
