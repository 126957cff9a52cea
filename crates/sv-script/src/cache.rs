//! Caches shared by the validation of many inputs.
//!
//! Both caches are safe to share between threads, each guards its backing
//! collection with a single reader-writer lock.

use crate::sighash::SigHashes;
use bitcoin::hashes::{Hash, HashEngine, sha256};
use bitcoin::secp256k1::PublicKey;
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::{Transaction, Txid};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

const LOG_TARGET: &str = "sv_script::cache";

/// Precomputed fork id digest components, by transaction id.
#[derive(Debug, Default)]
pub struct SigHashCache {
    entries: RwLock<HashMap<Txid, SigHashes>>,
}

impl SigHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes and stores the components of `tx` unless already present.
    pub fn add_sig_hashes(&self, tx: &Transaction) -> SigHashes {
        let txid = tx.compute_txid();

        if let Some(hashes) = self.get_sig_hashes(&txid) {
            return hashes;
        }

        let hashes = SigHashes::new(tx);
        *self.entries.write().entry(txid).or_insert(hashes)
    }

    pub fn get_sig_hashes(&self, txid: &Txid) -> Option<SigHashes> {
        self.entries.read().get(txid).copied()
    }

    pub fn contains_hashes(&self, txid: &Txid) -> bool {
        self.entries.read().contains_key(txid)
    }

    pub fn purge_sig_hashes(&self, txid: &Txid) {
        if self.entries.write().remove(txid).is_some() {
            tracing::trace!(target: LOG_TARGET, "Purged sighashes of {txid}");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded set of signatures known to be valid.
///
/// Only successful verifications are inserted. Once full, an insertion
/// evicts an arbitrary entry: the choice only affects performance.
#[derive(Debug)]
pub struct SigCache {
    entries: RwLock<HashSet<sha256::Hash>>,
    max_entries: usize,
}

impl SigCache {
    /// Creates a cache holding at most `max_entries` signatures, `0` disables
    /// caching.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashSet::new()),
            max_entries,
        }
    }

    fn key(sighash: &[u8; 32], sig: &Signature, pubkey: &PublicKey) -> sha256::Hash {
        let mut engine = sha256::Hash::engine();
        engine.input(sighash);
        engine.input(&sig.serialize_compact());
        engine.input(&pubkey.serialize());
        sha256::Hash::from_engine(engine)
    }

    /// Whether the signature of `sighash` by `pubkey` was verified before.
    pub fn exists(&self, sighash: &[u8; 32], sig: &Signature, pubkey: &PublicKey) -> bool {
        self.entries
            .read()
            .contains(&Self::key(sighash, sig, pubkey))
    }

    /// Records a valid signature.
    pub fn add(&self, sighash: &[u8; 32], sig: &Signature, pubkey: &PublicKey) {
        if self.max_entries == 0 {
            return;
        }

        let key = Self::key(sighash, sig, pubkey);
        let mut entries = self.entries.write();

        if entries.len() >= self.max_entries && !entries.contains(&key) {
            let evicted = entries.iter().next().copied();
            if let Some(evicted) = evicted {
                entries.remove(&evicted);
                tracing::trace!(target: LOG_TARGET, "Evicted signature {evicted}");
            }
        }

        entries.insert(key);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
