mod common;

mod tests {
    use std::sync::Arc;

    use alloy_primitives::B256;
    use lantern_consensus_misc::checkpoint::Checkpoint;
    use lantern_light_client::{
        errors::{ErrorKind, InvalidStateReason, LightClientError},
        provider::{ChainReader, MemoryChain},
        service::LightClientUpdateProducer,
        update::FinalizedHeader,
    };
    use lantern_network_spec::networks::{BeaconNetworkSpec, DEV};
    use tree_hash::TreeHash;

    use crate::common::{BlockAndState, deneb_state_mut};

    /// Imports `blocks` into a fresh chain and producer, in order.
    fn import(
        blocks: &[&BlockAndState],
        network_spec: Arc<BeaconNetworkSpec>,
    ) -> (Arc<MemoryChain>, LightClientUpdateProducer) {
        let chain = Arc::new(MemoryChain::new());
        let mut producer = LightClientUpdateProducer::new(chain.clone(), network_spec);
        for block in blocks {
            let root = chain.insert(block.block.clone(), block.state.clone());
            producer.on_block_imported(root).unwrap();
        }
        (chain, producer)
    }

    #[test]
    fn test_empty_store_reports_not_found() {
        let producer = LightClientUpdateProducer::new(Arc::new(MemoryChain::new()), DEV.clone());
        let api = producer.api();

        let err = api.get_finality_update().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = api.get_optimistic_update().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(api.get_updates(0, 10).is_empty());

        let err = api.get_bootstrap(B256::repeat_byte(1)).unwrap_err();
        assert!(matches!(err, LightClientError::NotFound(_)));
    }

    #[test]
    fn test_finalized_update_is_served() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let finalized = BlockAndState::new(64, genesis.root(), 10, Checkpoint::default());
        let attested = BlockAndState::new(65, finalized.root(), 10, finalized.checkpoint());
        let signature = BlockAndState::new(66, attested.root(), 20, finalized.checkpoint());

        let (_, producer) = import(&[&genesis, &finalized, &attested, &signature], DEV.clone());
        let api = producer.api();

        let finality_update = api.get_finality_update().unwrap();
        assert_eq!(finality_update.signature_slot, 66);
        assert_eq!(
            finality_update.finalized_header().tree_hash_root(),
            finalized.root()
        );

        let optimistic_update = api.get_optimistic_update().unwrap();
        assert_eq!(optimistic_update.attested_header.slot, 65);

        let updates = api.get_updates(0, 5);
        assert_eq!(updates.len(), 1);
        assert!(updates[0].is_finalized());
        assert_eq!(updates[0].signature_slot, 66);
        assert!(api.get_updates(1, 5).is_empty());

        let bootstrap = api.get_bootstrap(attested.root()).unwrap();
        bootstrap.verify(attested.root()).unwrap();
    }

    #[test]
    fn test_genesis_checkpoint_uses_genesis_block() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let block = BlockAndState::new(1, genesis.root(), 10, Checkpoint::default());

        let (chain, producer) = import(&[&genesis, &block], DEV.clone());
        assert_eq!(chain.genesis_block_root().unwrap(), genesis.root());

        let store = producer.store();
        let update = store.best_update_for_period(0).unwrap();
        assert_eq!(
            update.finality.as_ref().unwrap().finalized_header,
            FinalizedHeader::Genesis
        );
        assert!(store.best_finalized_update().is_none());
    }

    #[test]
    fn test_unknown_finalized_block_builds_update_without_finality() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let unknown_checkpoint = Checkpoint {
            epoch: 1,
            root: B256::repeat_byte(0x99),
        };
        let attested = BlockAndState::new(40, genesis.root(), 10, unknown_checkpoint);
        let signature = BlockAndState::new(41, attested.root(), 20, unknown_checkpoint);

        let (_, producer) = import(&[&genesis, &attested, &signature], DEV.clone());
        let update = producer.api().get_updates(0, 1).pop().unwrap();
        assert_eq!(update.signature_slot, 41);
        assert!(!update.is_finality_update());
    }

    #[test]
    fn test_updates_are_capped_at_max_request() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let last_of_period = BlockAndState::new(8191, genesis.root(), 10, Checkpoint::default());
        let first_of_period =
            BlockAndState::new(8192, last_of_period.root(), 10, Checkpoint::default());
        let blocks = [&genesis, &last_of_period, &first_of_period];

        let (_, producer) = import(&blocks, DEV.clone());
        let updates = producer.api().get_updates(0, 10);
        assert_eq!(
            updates
                .iter()
                .map(|update| update.signature_slot)
                .collect::<Vec<_>>(),
            vec![8191, 8192]
        );
        // The update signed in period 1 attests a period 0 header
        assert!(!updates[1].is_sync_committee_update());

        let mut spec = (**DEV).clone();
        spec.max_request_light_client_updates = 1;
        let (_, producer) = import(&blocks, Arc::new(spec));
        assert_eq!(producer.api().get_updates(0, 10).len(), 1);
    }

    #[test]
    fn test_rejected_candidate_leaves_store_untouched() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let silent = BlockAndState::new(1, genesis.root(), 0, Checkpoint::default());

        let chain = Arc::new(MemoryChain::new());
        let mut producer = LightClientUpdateProducer::new(chain.clone(), DEV.clone());
        producer
            .on_block_imported(chain.insert(genesis.block.clone(), genesis.state.clone()))
            .unwrap();
        let root = chain.insert(silent.block.clone(), silent.state.clone());

        let err = producer.on_block_imported(root).unwrap_err();
        assert!(matches!(
            err,
            LightClientError::InsufficientParticipation { .. }
        ));
        assert!(producer.store().is_empty());
    }

    #[test]
    fn test_missing_parent_state_is_not_found() {
        let orphan = BlockAndState::new(5, B256::repeat_byte(0x42), 10, Checkpoint::default());
        let chain = Arc::new(MemoryChain::new());
        let mut producer = LightClientUpdateProducer::new(chain.clone(), DEV.clone());
        let root = chain.insert(orphan.block, orphan.state);

        let err = producer.on_block_imported(root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_readers_see_published_snapshots() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let first = BlockAndState::new(1, genesis.root(), 10, Checkpoint::default());
        let second = BlockAndState::new(2, first.root(), 10, Checkpoint::default());

        let chain = Arc::new(MemoryChain::new());
        let mut producer = LightClientUpdateProducer::new(chain.clone(), DEV.clone());
        let api = producer.api();
        for block in [&genesis, &first] {
            let root = chain.insert(block.block.clone(), block.state.clone());
            producer.on_block_imported(root).unwrap();
        }
        let before = api.get_optimistic_update().unwrap();
        assert_eq!(before.signature_slot, 1);

        let root = chain.insert(second.block.clone(), second.state.clone());
        let outcome = producer.on_block_imported(root).unwrap();
        assert!(outcome.best_non_finalized);
        assert!(!outcome.best_for_period);

        let handle = std::thread::spawn(move || api.get_optimistic_update().unwrap());
        assert_eq!(handle.join().unwrap().signature_slot, 2);
        assert_eq!(before.signature_slot, 1);
    }
    #[test]
    fn test_bootstrap_reports_slot_mismatch_before_root_check() {
        let mut block = BlockAndState::new(100, B256::repeat_byte(7), 0, Checkpoint::default());
        deneb_state_mut(&mut block.state).slot = 101;

        let chain = Arc::new(MemoryChain::new());
        let root = chain.insert(block.block.clone(), block.state.clone());
        let producer = LightClientUpdateProducer::new(chain, DEV.clone());

        let err = producer.api().get_bootstrap(root).unwrap_err();
        assert!(matches!(
            err,
            LightClientError::InvalidState(InvalidStateReason::SlotMismatch {
                slot: 101,
                header_slot: 100
            })
        ));
    }

    #[test]
    fn test_bootstrap_for_foreign_state_is_header_mismatch() {
        let block = BlockAndState::new(100, B256::repeat_byte(7), 0, Checkpoint::default());
        let other = BlockAndState::new(100, B256::repeat_byte(8), 0, Checkpoint::default());

        let chain = Arc::new(MemoryChain::new());
        let root = chain.insert(block.block.clone(), other.state.clone());
        let producer = LightClientUpdateProducer::new(chain, DEV.clone());

        let err = producer.api().get_bootstrap(root).unwrap_err();
        assert!(matches!(
            err,
            LightClientError::HeaderBlockMismatch { block_root, .. } if block_root == root
        ));
    }

    #[test]
    fn test_pre_altair_attested_state_is_skipped() {
        let genesis = BlockAndState::new(0, B256::ZERO, 0, Checkpoint::default());
        let block = BlockAndState::new(1, genesis.root(), 10, Checkpoint::default());
        let mut spec = (**DEV).clone();
        spec.altair_fork_epoch = 4;

        let (_, producer) = import(&[&genesis, &block], Arc::new(spec));
        assert!(producer.store().is_empty());
    }
}
