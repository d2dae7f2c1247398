//! Committed generations of an index.
//!
//! A [`Snapshot`] is the document store plus the inverted index as of one commit.
//! Snapshots are never mutated once published: a writer clones the current one,
//! applies its staged changes to the clone and swaps it in.
//!
//! # Segment format
//!
//! ```text
//! +--------+-----------+------------------------+-----------+
//! | "WSEG" | version   | bincode(Snapshot)      | crc32     |
//! | 4 B    | u32 LE    | variable               | u32 LE    |
//! +--------+-----------+------------------------+-----------+
//! ```
//!
//! The checksum covers every byte before it.

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::error::{Result, WolfError};
use crate::index::doc_store::DocStore;
use crate::index::inverted::InvertedIndex;

const SEGMENT_MAGIC: &[u8; 4] = b"WSEG";
const SEGMENT_VERSION: u32 = 1;
const HEADER_LEN: usize = 8;
const FOOTER_LEN: usize = 4;

/// File name of the segment holding `generation`.
pub fn segment_file_name(generation: u64) -> String {
    format!("segment_{generation}.bin")
}

/// Parse a generation back out of a segment file name.
pub fn parse_segment_file_name(name: &str) -> Option<u64> {
    name.strip_prefix("segment_")?
        .strip_suffix(".bin")?
        .parse()
        .ok()
}

/// The state of an index as of one commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    generation: u64,
    next_doc_id: DocId,
    docs: DocStore,
    inverted: InvertedIndex,
}

impl Snapshot {
    /// The empty generation-zero snapshot of a fresh index.
    pub fn empty() -> Self {
        Snapshot::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live documents.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn docs(&self) -> &DocStore {
        &self.docs
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// The id the next inserted document will receive.
    pub fn next_doc_id(&self) -> DocId {
        self.next_doc_id
    }

    /// Start the successor of this snapshot.
    pub(crate) fn successor(&self) -> Snapshot {
        Snapshot {
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    pub(crate) fn docs_mut(&mut self) -> &mut DocStore {
        &mut self.docs
    }

    pub(crate) fn inverted_mut(&mut self) -> &mut InvertedIndex {
        &mut self.inverted
    }

    /// Reserve a fresh document id.
    pub(crate) fn allocate_doc_id(&mut self) -> Result<DocId> {
        let doc_id = self.next_doc_id;
        self.next_doc_id = doc_id
            .checked_add(1)
            .ok_or_else(|| WolfError::commit("document id space exhausted"))?;
        Ok(doc_id)
    }

    /// Encode this snapshot into the segment format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
        bytes.extend_from_slice(SEGMENT_MAGIC);
        bytes.extend_from_slice(&SEGMENT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&payload);

        let checksum = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&checksum.to_le_bytes());
        Ok(bytes)
    }

    /// Decode a segment, verifying its header and checksum.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN + FOOTER_LEN {
            return Err(WolfError::storage("segment is truncated"));
        }
        if &bytes[..4] != SEGMENT_MAGIC {
            return Err(WolfError::storage("invalid segment file format"));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != SEGMENT_VERSION {
            return Err(WolfError::storage(format!(
                "unsupported segment version: {version}"
            )));
        }

        let expected = segment_checksum(bytes)?;
        let body = &bytes[..bytes.len() - FOOTER_LEN];
        let actual = crc32fast::hash(body);
        if actual != expected {
            return Err(WolfError::storage(format!(
                "segment checksum mismatch: expected {expected:08x}, found {actual:08x}"
            )));
        }

        Ok(bincode::deserialize(&body[HEADER_LEN..])?)
    }
}

/// The checksum recorded in the footer of an encoded segment.
pub fn segment_checksum(bytes: &[u8]) -> Result<u32> {
    let footer = bytes
        .len()
        .checked_sub(FOOTER_LEN)
        .map(|start| &bytes[start..])
        .ok_or_else(|| WolfError::storage("segment is truncated"))?;

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(footer);
    Ok(u32::from_le_bytes(checksum))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::empty().successor();
        let doc_id = snapshot.allocate_doc_id().unwrap();
        snapshot.docs_mut().put(
            doc_id,
            "a.txt".to_string(),
            BTreeMap::from([("title".to_string(), "Wolves".to_string())]),
        );
        snapshot
            .inverted_mut()
            .add_postings("title", doc_id, vec![("wolv".to_string(), vec![0])]);
        snapshot
    }

    #[test]
    fn test_successor_and_ids() {
        let snapshot = sample();
        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.next_doc_id(), 1);
        assert_eq!(snapshot.successor().generation(), 2);
        assert_eq!(snapshot.successor().doc_count(), 1);
    }

    #[test]
    fn test_encode_decode() {
        let snapshot = sample();
        let bytes = snapshot.encode().unwrap();
        assert_eq!(&bytes[..4], b"WSEG");

        let decoded = Snapshot::decode(&bytes).unwrap();
        assert_eq!(decoded.generation(), 1);
        assert_eq!(decoded.docs().doc_id_for_key("a.txt"), Some(0));
        assert_eq!(decoded.inverted().doc_freq("title", "wolv"), 1);
        assert_eq!(
            segment_checksum(&bytes).unwrap(),
            crc32fast::hash(&bytes[..bytes.len() - 4])
        );
    }

    #[test]
    fn test_corruption_is_detected() {
        let mut bytes = sample().encode().unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0xff;
        assert_eq!(Snapshot::decode(&bytes).unwrap_err().kind(), ErrorKind::Storage);

        assert!(Snapshot::decode(b"WSEG").is_err());
        assert!(Snapshot::decode(b"XXXX\x01\x00\x00\x00\x00\x00\x00\x00").is_err());
    }

    #[test]
    fn test_segment_file_names() {
        assert_eq!(segment_file_name(12), "segment_12.bin");
        assert_eq!(parse_segment_file_name("segment_12.bin"), Some(12));
        assert_eq!(parse_segment_file_name("segment_x.bin"), None);
        assert_eq!(parse_segment_file_name("meta.json"), None);
    }
}
