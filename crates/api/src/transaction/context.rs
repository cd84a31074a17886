// Path: crates/api/src/transaction/context.rs
//! Defines the request-scoped context passed through the decorator chain.

use std::sync::Arc;
use tracing::Span;
use weft_types::app::{Address, ChainId, Timestamp, ValidatorUpdate};

#[derive(Clone)]
struct ContextInner {
    chain_id: ChainId,
    height: u64,
    time: Timestamp,
    last_commit_hash: Vec<u8>,
    span: Span,
    signers: Vec<Address>,
    pending_validator_updates: Vec<ValidatorUpdate>,
}

/// Immutable, request-scoped values shared by every decorator and handler.
///
/// Cloning is cheap. The `with_*` methods derive a new context and never
/// touch the one they were called on, so values a decorator adds are seen
/// only by the code it delegates to.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Creates the per-block context.
    pub fn new(chain_id: ChainId, height: u64, time: Timestamp, last_commit_hash: Vec<u8>) -> Self {
        let span = tracing::info_span!("block", chain_id = %chain_id, height);
        Self {
            inner: Arc::new(ContextInner {
                chain_id,
                height,
                time,
                last_commit_hash,
                span,
                signers: Vec::new(),
                pending_validator_updates: Vec::new(),
            }),
        }
    }

    fn derive(&self, f: impl FnOnce(&mut ContextInner)) -> Self {
        let mut inner = (*self.inner).clone();
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The chain identifier.
    pub fn chain_id(&self) -> &ChainId {
        &self.inner.chain_id
    }

    /// The height of the block being processed.
    pub fn height(&self) -> u64 {
        self.inner.height
    }

    /// The consensus time of the block.
    pub fn time(&self) -> Timestamp {
        self.inner.time
    }

    /// The content hash of the previous commit.
    pub fn last_commit_hash(&self) -> &[u8] {
        &self.inner.last_commit_hash
    }

    /// The span all events for this request should be recorded under.
    pub fn span(&self) -> &Span {
        &self.inner.span
    }

    /// The authenticated signers, in the order they were added.
    pub fn signers(&self) -> &[Address] {
        &self.inner.signers
    }

    /// Returns true when `address` is an authenticated signer.
    pub fn is_signer(&self, address: &Address) -> bool {
        self.inner.signers.contains(address)
    }

    /// The validator changes accumulated earlier in the current block.
    pub fn pending_validator_updates(&self) -> &[ValidatorUpdate] {
        &self.inner.pending_validator_updates
    }

    /// Derives a context with `signers` appended. Duplicates are skipped.
    pub fn with_signers(&self, signers: impl IntoIterator<Item = Address>) -> Self {
        self.derive(|inner| {
            for s in signers {
                if !inner.signers.contains(&s) {
                    inner.signers.push(s);
                }
            }
        })
    }

    /// Derives a context that records under `span`.
    pub fn with_span(&self, span: Span) -> Self {
        self.derive(|inner| inner.span = span)
    }

    /// Derives a context carrying a snapshot of the pending validator changes.
    pub fn with_pending_validator_updates(&self, updates: Vec<ValidatorUpdate>) -> Self {
        self.derive(|inner| inner.pending_validator_updates = updates)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("chain_id", &self.inner.chain_id)
            .field("height", &self.inner.height)
            .field("time", &self.inner.time)
            .field("signers", &self.inner.signers)
            .finish_non_exhaustive()
    }
}
