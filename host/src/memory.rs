//! In-process stand-ins for the content store and the ledger.
//!
//! Both keep everything in memory and lose it on restart. They implement the
//! same traits a real host's services do, so `FilesApi` cannot tell them
//! apart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use dapp_core::encoding::MULTIHASH_HEADER;
use dapp_core::{CollabError, ContentStore, Ledger, MessageResult};

/// Content-addressed blocks keyed by `1220` + hex(blake3(content)).
#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address_of(data: &str) -> String {
        format!("{MULTIHASH_HEADER}{}", blake3::hash(data.as_bytes()).to_hex())
    }

    pub fn len(&self) -> usize {
        self.blocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryStore {
    fn push(&self, data: &str) -> Result<String, CollabError> {
        let address = Self::address_of(data);
        self.blocks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), data.to_string());
        Ok(format!("0x{address}"))
    }

    fn fetch(&self, address: &str) -> Result<String, CollabError> {
        let address = address.trim_start_matches("0x").to_ascii_lowercase();
        self.blocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .cloned()
            .ok_or_else(|| CollabError::new(format!("block not found: {address}")))
    }
}

/// Value `read_storage` reports for keys that were never written.
pub const UNSET: &str = "0x0";

#[derive(Debug)]
struct Staged {
    contract: String,
    key: String,
    value: String,
}

/// Per-contract key/value storage with staged writes.
///
/// A message's payload is read as `key, value, key, value, ...`; the pairs
/// are applied to the addressed contract's storage on `commit`.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    staged: Mutex<Vec<Staged>>,
    storage: RwLock<HashMap<String, HashMap<String, String>>>,
    tx_count: AtomicU64,
    fail_messages: AtomicBool,
    fail_commits: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send_message` fail until switched off.
    pub fn fail_messages(&self, fail: bool) {
        self.fail_messages.store(fail, Ordering::SeqCst);
    }

    /// Make every following `commit` fail until switched off.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Committed storage of `contract`.
    pub fn entries(&self, contract: &str) -> HashMap<String, String> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(contract)
            .cloned()
            .unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Ledger for MemoryLedger {
    fn send_message(&self, contract: &str, payload: &[String]) -> MessageResult {
        if self.fail_messages.load(Ordering::SeqCst) {
            return MessageResult::failed("message rejected by ledger");
        }
        if payload.is_empty() || payload.len() % 2 != 0 {
            return MessageResult::failed("payload must hold key/value pairs");
        }

        let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        for pair in payload.chunks_exact(2) {
            staged.push(Staged {
                contract: contract.to_string(),
                key: pair[0].clone(),
                value: pair[1].clone(),
            });
        }
        let n = self.tx_count.fetch_add(1, Ordering::SeqCst) + 1;
        MessageResult::ok(format!("0x{n:064x}"))
    }

    fn commit(&self) -> Result<(), CollabError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(CollabError::new("commit rejected by ledger"));
        }
        let mut staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        let mut storage = self.storage.write().unwrap_or_else(PoisonError::into_inner);
        for write in staged.drain(..) {
            storage
                .entry(write.contract)
                .or_default()
                .insert(write.key, write.value);
        }
        Ok(())
    }

    fn discard(&self) {
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn read_storage(&self, contract: &str, key: &str) -> Result<String, CollabError> {
        Ok(self
            .storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(contract)
            .and_then(|kv| kv.get(key))
            .cloned()
            .unwrap_or_else(|| UNSET.to_string()))
    }
}
