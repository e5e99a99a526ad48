use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fork name: {0}")]
pub struct ParseForkNameError(String);

/// Hard forks whose blocks and states this node can represent, in activation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ForkName {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
}

impl ForkName {
    pub const ALL: [ForkName; 5] = [
        ForkName::Phase0,
        ForkName::Altair,
        ForkName::Bellatrix,
        ForkName::Capella,
        ForkName::Deneb,
    ];

    /// Sync committees and light client data exist from Altair onwards.
    pub fn supports_light_client(&self) -> bool {
        *self >= ForkName::Altair
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForkName::Phase0 => "phase0",
            ForkName::Altair => "altair",
            ForkName::Bellatrix => "bellatrix",
            ForkName::Capella => "capella",
            ForkName::Deneb => "deneb",
        }
    }
}

impl FromStr for ForkName {
    type Err = ParseForkNameError;

    fn from_str(fork_name: &str) -> Result<Self, Self::Err> {
        Ok(match fork_name.to_lowercase().as_ref() {
            "phase0" | "base" => ForkName::Phase0,
            "altair" => ForkName::Altair,
            "bellatrix" | "merge" => ForkName::Bellatrix,
            "capella" => ForkName::Capella,
            "deneb" => ForkName::Deneb,
            _ => return Err(ParseForkNameError(fork_name.to_string())),
        })
    }
}

impl Display for ForkName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn to_and_from_string(
        #[values(
            ForkName::Phase0,
            ForkName::Altair,
            ForkName::Bellatrix,
            ForkName::Capella,
            ForkName::Deneb
        )]
        fork_name: ForkName,
    ) {
        assert_eq!(ForkName::from_str(&fork_name.to_string()), Ok(fork_name));
    }

    #[test]
    fn test_aliases_and_ordering() {
        assert_eq!(ForkName::from_str("Merge"), Ok(ForkName::Bellatrix));
        assert!(ForkName::from_str("electra").is_err());
        assert!(ForkName::Phase0 < ForkName::Altair);
        assert!(ForkName::Capella < ForkName::Deneb);
        assert!(!ForkName::Phase0.supports_light_client());
        assert!(ForkName::Altair.supports_light_client());
    }
}
