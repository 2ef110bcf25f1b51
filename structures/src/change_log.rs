use rmp_serde::{Deserializer, Serializer};
use serde::{Deserialize, Serialize};

use crate::PixelChange;

/// Packs a change log as a MessagePack array.
pub fn encode_changes(changes: &[PixelChange]) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::new(&mut buffer);

    changes.serialize(&mut serializer)?;

    Ok(buffer)
}

pub fn decode_changes(data: &[u8]) -> Result<Vec<PixelChange>, rmp_serde::decode::Error> {
    let mut deserializer = Deserializer::new(data);

    Deserialize::deserialize(&mut deserializer)
}
