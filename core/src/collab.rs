//! Interfaces to the services a dapp runs against.
//!
//! The host runtime provides a URL parser, a content-addressed file store
//! and a ledger. The dispatcher only sees these traits; concrete services
//! are injected when it is constructed. All calls are synchronous from the
//! dispatcher's point of view, and implementations handle their own
//! synchronization.

use std::sync::Arc;

use crate::error::{CollabError, UrlError};
use crate::http::HttpRequest;
use crate::target::ParsedUrl;

/// Splits a request target into dapp-local path segments and options.
pub trait UrlParser: Send + Sync {
    fn parse(&self, request: &HttpRequest) -> Result<ParsedUrl, UrlError>;
}

/// A content-addressed file store.
pub trait ContentStore: Send + Sync {
    /// Stores `data` and returns its content hash, multihash header included.
    fn push(&self, data: &str) -> Result<String, CollabError>;

    /// Returns the content stored under a full (headered) address.
    fn fetch(&self, address: &str) -> Result<String, CollabError>;
}

/// Outcome of sending a message to a contract.
///
/// A non-empty `error` always comes with `success == false`; use the
/// constructors to keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageResult {
    pub success: bool,
    pub hash: String,
    pub error: String,
}

impl MessageResult {
    pub fn ok(hash: impl Into<String>) -> Self {
        Self {
            success: true,
            hash: hash.into(),
            error: String::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            hash: String::new(),
            error: error.into(),
        }
    }

    /// The transaction hash on success.
    pub fn into_result(self) -> Result<String, CollabError> {
        if self.success && self.error.is_empty() {
            Ok(self.hash)
        } else if self.error.is_empty() {
            Err(CollabError::new("message was not accepted"))
        } else {
            Err(CollabError(self.error))
        }
    }
}

/// The ledger a dapp keeps its name registry on.
///
/// Writes are two-phase: `send_message` stages state changes, `commit`
/// makes them visible to `read_storage`, `discard` drops them.
pub trait Ledger: Send + Sync {
    fn send_message(&self, contract: &str, payload: &[String]) -> MessageResult;

    fn commit(&self) -> Result<(), CollabError>;

    fn discard(&self);

    /// Value stored at `key` in `contract`'s storage.
    fn read_storage(&self, contract: &str, key: &str) -> Result<String, CollabError>;
}

impl<T: UrlParser + ?Sized> UrlParser for Arc<T> {
    fn parse(&self, request: &HttpRequest) -> Result<ParsedUrl, UrlError> {
        (**self).parse(request)
    }
}

impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    fn push(&self, data: &str) -> Result<String, CollabError> {
        (**self).push(data)
    }

    fn fetch(&self, address: &str) -> Result<String, CollabError> {
        (**self).fetch(address)
    }
}

impl<T: Ledger + ?Sized> Ledger for Arc<T> {
    fn send_message(&self, contract: &str, payload: &[String]) -> MessageResult {
        (**self).send_message(contract, payload)
    }

    fn commit(&self) -> Result<(), CollabError> {
        (**self).commit()
    }

    fn discard(&self) {
        (**self).discard()
    }

    fn read_storage(&self, contract: &str, key: &str) -> Result<String, CollabError> {
        (**self).read_storage(contract, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_message_yields_hash() {
        assert_eq!(MessageResult::ok("0xabc").into_result().unwrap(), "0xabc");
    }

    #[test]
    fn failed_message_yields_error() {
        let result = MessageResult::failed("out of gas");
        assert!(!result.success);
        assert_eq!(result.into_result().unwrap_err().to_string(), "out of gas");
    }

    #[test]
    fn unsuccessful_message_without_error_is_still_an_error() {
        let err = MessageResult::default().into_result().unwrap_err();
        assert_eq!(err.to_string(), "message was not accepted");
    }
}
