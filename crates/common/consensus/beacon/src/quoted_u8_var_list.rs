use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_types::{VariableList, typenum::U1099511627776};

pub fn serialize<S>(
    value: &VariableList<u8, U1099511627776>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let string_vec: Vec<String> = value.iter().map(|v| v.to_string()).collect();
    string_vec.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<VariableList<u8, U1099511627776>, D::Error>
where
    D: Deserializer<'de>,
{
    let string_vec: Vec<String> = Vec::deserialize(deserializer)?;
    let bytes = string_vec
        .into_iter()
        .map(|s| s.parse::<u8>().map_err(serde::de::Error::custom))
        .collect::<Result<Vec<_>, _>>()?;
    VariableList::new(bytes).map_err(|err| {
        serde::de::Error::custom(format!("Cannot create VariableList from bytes: {err:?}"))
    })
}
