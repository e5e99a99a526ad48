use std::sync::{Arc, LazyLock};

use alloy_primitives::{aliases::B32, fixed_bytes};
use anyhow::{bail, ensure};
use lantern_consensus_misc::{
    constants::{
        EPOCHS_PER_SYNC_COMMITTEE_PERIOD, MAX_REQUEST_LIGHT_CLIENT_UPDATES,
        MIN_SYNC_COMMITTEE_PARTICIPANTS, SLOTS_PER_EPOCH, SYNC_COMMITTEE_SIZE,
    },
    fork::Fork,
    fork_name::ForkName,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Holesky,
    Sepolia,
    Hoodi,
    Dev,
    Custom(String),
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "holesky" => Ok(Network::Holesky),
            "sepolia" => Ok(Network::Sepolia),
            "hoodi" => Ok(Network::Hoodi),
            "dev" => Ok(Network::Dev),
            custom => Ok(Network::Custom(custom.to_string())),
        }
    }
}

/// Chain configuration consumed by the light client subsystem.
///
/// Deserializes from the consensus-specs `config.yaml` format. Preset values that normally live in
/// a separate preset file fall back to mainnet when absent.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct BeaconNetworkSpec {
    #[serde(default = "default_preset_base")]
    pub preset_base: String,
    #[serde(rename = "CONFIG_NAME")]
    pub network: Network,

    // Forking
    #[serde(with = "crate::b32_hex")]
    pub genesis_fork_version: B32,
    #[serde(with = "crate::b32_hex")]
    pub altair_fork_version: B32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub altair_fork_epoch: u64,
    #[serde(with = "crate::b32_hex")]
    pub bellatrix_fork_version: B32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub bellatrix_fork_epoch: u64,
    #[serde(with = "crate::b32_hex")]
    pub capella_fork_version: B32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub capella_fork_epoch: u64,
    #[serde(with = "crate::b32_hex")]
    pub deneb_fork_version: B32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub deneb_fork_epoch: u64,
    #[serde(with = "crate::b32_hex")]
    pub electra_fork_version: B32,
    #[serde(with = "serde_utils::quoted_u64")]
    pub electra_fork_epoch: u64,

    // Time parameters
    #[serde(with = "serde_utils::quoted_u64")]
    pub seconds_per_slot: u64,

    // Preset
    #[serde(default = "default_slots_per_epoch", with = "serde_utils::quoted_u64")]
    pub slots_per_epoch: u64,
    #[serde(
        default = "default_epochs_per_sync_committee_period",
        with = "serde_utils::quoted_u64"
    )]
    pub epochs_per_sync_committee_period: u64,
    #[serde(default = "default_sync_committee_size", with = "serde_utils::quoted_u64")]
    pub sync_committee_size: u64,
    #[serde(
        default = "default_min_sync_committee_participants",
        with = "serde_utils::quoted_u64"
    )]
    pub min_sync_committee_participants: u64,
    #[serde(
        default = "default_max_request_light_client_updates",
        with = "serde_utils::quoted_u64"
    )]
    pub max_request_light_client_updates: u64,
}

fn default_preset_base() -> String {
    "mainnet".to_string()
}

fn default_slots_per_epoch() -> u64 {
    SLOTS_PER_EPOCH
}

fn default_epochs_per_sync_committee_period() -> u64 {
    EPOCHS_PER_SYNC_COMMITTEE_PERIOD
}

fn default_sync_committee_size() -> u64 {
    SYNC_COMMITTEE_SIZE
}

fn default_min_sync_committee_participants() -> u64 {
    MIN_SYNC_COMMITTEE_PARTICIPANTS
}

fn default_max_request_light_client_updates() -> u64 {
    MAX_REQUEST_LIGHT_CLIENT_UPDATES
}

impl BeaconNetworkSpec {
    /// Rejects configurations the compiled containers cannot represent.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.sync_committee_size == SYNC_COMMITTEE_SIZE,
            "SYNC_COMMITTEE_SIZE {} is not supported, containers are built for {SYNC_COMMITTEE_SIZE}",
            self.sync_committee_size
        );
        ensure!(self.slots_per_epoch > 0, "SLOTS_PER_EPOCH must be non-zero");
        ensure!(
            self.epochs_per_sync_committee_period > 0,
            "EPOCHS_PER_SYNC_COMMITTEE_PERIOD must be non-zero"
        );
        ensure!(
            self.min_sync_committee_participants <= self.sync_committee_size,
            "MIN_SYNC_COMMITTEE_PARTICIPANTS {} exceeds the committee size",
            self.min_sync_committee_participants
        );

        let epochs = [
            self.altair_fork_epoch,
            self.bellatrix_fork_epoch,
            self.capella_fork_epoch,
            self.deneb_fork_epoch,
            self.electra_fork_epoch,
        ];
        ensure!(
            epochs.windows(2).all(|pair| pair[0] <= pair[1]),
            "Fork epochs must be non-decreasing: {epochs:?}"
        );

        Ok(())
    }

    pub fn slots_per_sync_committee_period(&self) -> u64 {
        self.slots_per_epoch * self.epochs_per_sync_committee_period
    }

    /// Return the epoch number at ``slot``.
    pub fn compute_epoch_at_slot(&self, slot: u64) -> u64 {
        slot / self.slots_per_epoch
    }

    /// Return the start slot of ``epoch``.
    pub fn compute_start_slot_at_epoch(&self, epoch: u64) -> u64 {
        epoch.saturating_mul(self.slots_per_epoch)
    }

    pub fn compute_sync_committee_period(&self, epoch: u64) -> u64 {
        epoch / self.epochs_per_sync_committee_period
    }

    pub fn compute_sync_committee_period_at_slot(&self, slot: u64) -> u64 {
        self.compute_sync_committee_period(self.compute_epoch_at_slot(slot))
    }

    pub fn fork_epoch(&self, fork_name: ForkName) -> u64 {
        match fork_name {
            ForkName::Phase0 => 0,
            ForkName::Altair => self.altair_fork_epoch,
            ForkName::Bellatrix => self.bellatrix_fork_epoch,
            ForkName::Capella => self.capella_fork_epoch,
            ForkName::Deneb => self.deneb_fork_epoch,
        }
    }

    pub fn fork_version(&self, fork_name: ForkName) -> B32 {
        match fork_name {
            ForkName::Phase0 => self.genesis_fork_version,
            ForkName::Altair => self.altair_fork_version,
            ForkName::Bellatrix => self.bellatrix_fork_version,
            ForkName::Capella => self.capella_fork_version,
            ForkName::Deneb => self.deneb_fork_version,
        }
    }

    /// The ``Fork`` value a state of `fork_name` carries.
    pub fn fork(&self, fork_name: ForkName) -> Fork {
        let previous = ForkName::ALL
            .iter()
            .rev()
            .find(|candidate| **candidate < fork_name)
            .copied()
            .unwrap_or(ForkName::Phase0);
        Fork {
            previous_version: self.fork_version(previous),
            current_version: self.fork_version(fork_name),
            epoch: self.fork_epoch(fork_name),
        }
    }

    pub fn fork_name_at_epoch(&self, epoch: u64) -> anyhow::Result<ForkName> {
        if epoch >= self.electra_fork_epoch {
            bail!("Epoch {epoch} is in the Electra fork, which is not supported");
        }
        Ok(ForkName::ALL
            .iter()
            .rev()
            .find(|fork_name| epoch >= self.fork_epoch(**fork_name))
            .copied()
            .unwrap_or(ForkName::Phase0))
    }

    pub fn fork_name_at_slot(&self, slot: u64) -> anyhow::Result<ForkName> {
        self.fork_name_at_epoch(self.compute_epoch_at_slot(slot))
    }

    fn with_mainnet_preset(network: Network) -> Self {
        Self {
            preset_base: default_preset_base(),
            network,
            genesis_fork_version: fixed_bytes!("0x00000000"),
            altair_fork_version: fixed_bytes!("0x01000000"),
            altair_fork_epoch: 74240,
            bellatrix_fork_version: fixed_bytes!("0x02000000"),
            bellatrix_fork_epoch: 144896,
            capella_fork_version: fixed_bytes!("0x03000000"),
            capella_fork_epoch: 194048,
            deneb_fork_version: fixed_bytes!("0x04000000"),
            deneb_fork_epoch: 269568,
            electra_fork_version: fixed_bytes!("0x05000000"),
            electra_fork_epoch: 364032,
            seconds_per_slot: 12,
            slots_per_epoch: SLOTS_PER_EPOCH,
            epochs_per_sync_committee_period: EPOCHS_PER_SYNC_COMMITTEE_PERIOD,
            sync_committee_size: SYNC_COMMITTEE_SIZE,
            min_sync_committee_participants: MIN_SYNC_COMMITTEE_PARTICIPANTS,
            max_request_light_client_updates: MAX_REQUEST_LIGHT_CLIENT_UPDATES,
        }
    }
}

pub static MAINNET: LazyLock<Arc<BeaconNetworkSpec>> =
    LazyLock::new(|| BeaconNetworkSpec::with_mainnet_preset(Network::Mainnet).into());

pub static HOLESKY: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        genesis_fork_version: fixed_bytes!("0x01017000"),
        altair_fork_version: fixed_bytes!("0x02017000"),
        altair_fork_epoch: 0,
        bellatrix_fork_version: fixed_bytes!("0x03017000"),
        bellatrix_fork_epoch: 0,
        capella_fork_version: fixed_bytes!("0x04017000"),
        capella_fork_epoch: 256,
        deneb_fork_version: fixed_bytes!("0x05017000"),
        deneb_fork_epoch: 29696,
        electra_fork_version: fixed_bytes!("0x06017000"),
        electra_fork_epoch: 115968,
        ..BeaconNetworkSpec::with_mainnet_preset(Network::Holesky)
    }
    .into()
});

pub static SEPOLIA: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        genesis_fork_version: fixed_bytes!("0x90000069"),
        altair_fork_version: fixed_bytes!("0x90000070"),
        altair_fork_epoch: 50,
        bellatrix_fork_version: fixed_bytes!("0x90000071"),
        bellatrix_fork_epoch: 100,
        capella_fork_version: fixed_bytes!("0x90000072"),
        capella_fork_epoch: 56832,
        deneb_fork_version: fixed_bytes!("0x90000073"),
        deneb_fork_epoch: 132608,
        electra_fork_version: fixed_bytes!("0x90000074"),
        electra_fork_epoch: 222464,
        ..BeaconNetworkSpec::with_mainnet_preset(Network::Sepolia)
    }
    .into()
});

pub static HOODI: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        genesis_fork_version: fixed_bytes!("0x10000910"),
        altair_fork_version: fixed_bytes!("0x20000910"),
        altair_fork_epoch: 0,
        bellatrix_fork_version: fixed_bytes!("0x30000910"),
        bellatrix_fork_epoch: 0,
        capella_fork_version: fixed_bytes!("0x40000910"),
        capella_fork_epoch: 0,
        deneb_fork_version: fixed_bytes!("0x50000910"),
        deneb_fork_epoch: 0,
        electra_fork_version: fixed_bytes!("0x60000910"),
        electra_fork_epoch: 2048,
        ..BeaconNetworkSpec::with_mainnet_preset(Network::Hoodi)
    }
    .into()
});

/// Local development chain: every supported fork is active from genesis.
pub static DEV: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        altair_fork_epoch: 0,
        bellatrix_fork_epoch: 0,
        capella_fork_epoch: 0,
        deneb_fork_epoch: 0,
        electra_fork_epoch: Fork::UNSCHEDULED_EPOCH,
        ..BeaconNetworkSpec::with_mainnet_preset(Network::Dev)
    }
    .into()
});

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(8191, 0)]
    #[case(8192, 1)]
    #[case(3 * 8192 + 17, 3)]
    fn test_sync_committee_period_at_slot(#[case] slot: u64, #[case] period: u64) {
        assert_eq!(MAINNET.compute_sync_committee_period_at_slot(slot), period);
    }

    #[rstest]
    #[case(0, ForkName::Phase0)]
    #[case(74239, ForkName::Phase0)]
    #[case(74240, ForkName::Altair)]
    #[case(144896, ForkName::Bellatrix)]
    #[case(194048, ForkName::Capella)]
    #[case(269568, ForkName::Deneb)]
    #[case(364031, ForkName::Deneb)]
    fn test_mainnet_fork_names(#[case] epoch: u64, #[case] fork_name: ForkName) {
        assert_eq!(MAINNET.fork_name_at_epoch(epoch).unwrap(), fork_name);
    }

    #[test]
    fn test_electra_is_unsupported() {
        assert!(MAINNET.fork_name_at_epoch(364032).is_err());
        assert!(DEV.fork_name_at_slot(u64::MAX).is_ok());
    }

    #[test]
    fn test_dev_is_deneb_from_genesis() {
        assert_eq!(DEV.fork_name_at_slot(0).unwrap(), ForkName::Deneb);
        let fork = DEV.fork(ForkName::Deneb);
        assert_eq!(fork.current_version, DEV.deneb_fork_version);
        assert_eq!(fork.previous_version, DEV.capella_fork_version);
    }

    #[test]
    fn test_validate_rejects_unsupported_committee_size() {
        let network_spec = BeaconNetworkSpec {
            sync_committee_size: 32,
            ..(**MAINNET).clone()
        };
        assert!(network_spec.validate().is_err());

        let network_spec = BeaconNetworkSpec {
            slots_per_epoch: 0,
            ..(**MAINNET).clone()
        };
        assert!(network_spec.validate().is_err());
    }
}
