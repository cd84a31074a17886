// Path: crates/types/src/error/mod.rs
//! Core error types for the Weft harness.
//!
//! Errors fall into three families:
//! - [`TransactionError`]: structured, expected failures. They are ordinary values,
//!   never escalate past a lifecycle call and map onto a numeric response code.
//! - [`ChainError`]: fatal lifecycle conditions with no response channel. The
//!   harness halts when it produces one.
//! - [`CoreError`]: wiring-time failures (route registration, configuration).

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Response code of a successful call.
pub const CODE_OK: u32 = 0;
/// An irrecoverable fault was contained and converted into a failure.
pub const CODE_INTERNAL: u32 = 1;
/// The transaction bytes could not be decoded.
pub const CODE_DECODING: u32 = 2;
/// No handler is registered for the transaction's route.
pub const CODE_NO_SUCH_PATH: u32 = 3;
/// The transaction lacks a required authorization.
pub const CODE_UNAUTHORIZED: u32 = 4;
/// The transaction or request carries invalid input.
pub const CODE_INVALID_INPUT: u32 = 5;
/// The working set or store reported an error.
pub const CODE_STATE: u32 = 6;
/// An entity that may exist only once already exists.
pub const CODE_DUPLICATE: u32 = 7;
/// The transaction nonce does not match the signer's next nonce.
pub const CODE_NONCE_MISMATCH: u32 = 8;
/// A chain identifier is malformed.
pub const CODE_INVALID_CHAIN_ID: u32 = 9;
/// A required record is missing.
pub const CODE_NOT_FOUND: u32 = 10;
/// The highest code reserved for the harness itself.
pub const MAX_HARNESS_CODE: u32 = 99;
/// Business-module codes are offset by this base so they never collide with harness codes.
pub const MODULE_CODE_BASE: u32 = 1000;

/// Errors related to the working sets or the durable store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An error occurred in the storage backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// A stored record could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Applying a change set failed.
    #[error("Apply failed: {0}")]
    Apply(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::Apply(_) => "STATE_APPLY_FAILED",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
        }
    }
}

/// A structured failure produced while checking or delivering a transaction,
/// initializing genesis or serving a query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// A runtime fault was contained and converted into a failure.
    #[error("Internal error: {0}")]
    Internal(String),
    /// The transaction bytes could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),
    /// No handler is registered for the route.
    #[error("No such path: {0}")]
    NoSuchPath(String),
    /// A required signer or permission is missing.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The transaction carries invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// An error originating from the working set or store.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// An entity that may exist only once already exists.
    #[error("Duplicate: {0}")]
    Duplicate(String),
    /// The transaction nonce does not match the expected nonce for the signer.
    #[error("Nonce mismatch. Expected: {expected}, Got: {got}")]
    NonceMismatch {
        /// The expected nonce from the working set.
        expected: u64,
        /// The nonce provided in the transaction.
        got: u64,
    },
    /// A chain identifier is malformed.
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),
    /// A required record is missing.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A genesis initializer failed; the initializer's name annotates the cause.
    #[error("Genesis initializer '{initializer}' failed: {source}")]
    Genesis {
        /// The name of the failing initializer.
        initializer: String,
        /// The underlying failure.
        source: Box<TransactionError>,
    },
    /// A business-module failure with a module-local code.
    #[error("{module}: {message}")]
    Module {
        /// The module that raised the failure.
        module: String,
        /// The module-local code; the response code is `MODULE_CODE_BASE + code`.
        code: u32,
        /// A human-readable description.
        message: String,
    },
}

impl TransactionError {
    /// Builds a business-module failure.
    pub fn module(module: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self::Module {
            module: module.into(),
            code,
            message: message.into(),
        }
    }

    /// The numeric response code reported to the consensus engine.
    ///
    /// Harness failures occupy `1..=MAX_HARNESS_CODE`; module failures are
    /// offset by [`MODULE_CODE_BASE`]. Zero is never returned.
    pub fn abci_code(&self) -> u32 {
        match self {
            Self::Internal(_) => CODE_INTERNAL,
            Self::Decoding(_) => CODE_DECODING,
            Self::NoSuchPath(_) => CODE_NO_SUCH_PATH,
            Self::Unauthorized(_) => CODE_UNAUTHORIZED,
            Self::InvalidInput(_) => CODE_INVALID_INPUT,
            Self::State(_) => CODE_STATE,
            Self::Duplicate(_) => CODE_DUPLICATE,
            Self::NonceMismatch { .. } => CODE_NONCE_MISMATCH,
            Self::InvalidChainId(_) => CODE_INVALID_CHAIN_ID,
            Self::NotFound(_) => CODE_NOT_FOUND,
            Self::Genesis { source, .. } => source.abci_code(),
            Self::Module { code, .. } => MODULE_CODE_BASE.saturating_add(*code),
        }
    }
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Internal(_) => "TX_INTERNAL",
            Self::Decoding(_) => "TX_DECODING",
            Self::NoSuchPath(_) => "TX_NO_SUCH_PATH",
            Self::Unauthorized(_) => "TX_UNAUTHORIZED",
            Self::InvalidInput(_) => "TX_INVALID_INPUT",
            Self::State(_) => "TX_STATE_ERROR",
            Self::Duplicate(_) => "TX_DUPLICATE",
            Self::NonceMismatch { .. } => "TX_NONCE_MISMATCH",
            Self::InvalidChainId(_) => "TX_INVALID_CHAIN_ID",
            Self::NotFound(_) => "TX_NOT_FOUND",
            Self::Genesis { .. } => "TX_GENESIS_FAILED",
            Self::Module { .. } => "TX_MODULE_ERROR",
        }
    }
}

impl From<parity_scale_codec::Error> for TransactionError {
    fn from(e: parity_scale_codec::Error) -> Self {
        TransactionError::Decoding(e.to_string())
    }
}

impl From<serde_json::Error> for TransactionError {
    fn from(e: serde_json::Error) -> Self {
        TransactionError::InvalidInput(e.to_string())
    }
}

/// Lifecycle errors with no response channel.
///
/// Every variant except [`ChainError::InitChain`] is fatal: the harness halts
/// and the embedding process is expected to terminate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The durable store failed during load, flush or commit.
    #[error("Store error: {0}")]
    Store(#[from] StateError),
    /// A `BeginBlock` header was malformed.
    #[error("Malformed block header: {0}")]
    MalformedHeader(String),
    /// A header names a different chain than the one initialized at genesis.
    #[error("Chain id mismatch. Expected {expected}, got {got}")]
    ChainIdMismatch {
        /// The persisted chain id.
        expected: String,
        /// The chain id carried by the header.
        got: String,
    },
    /// A previous fatal error halted the harness.
    #[error("Harness halted after a fatal error; restart required")]
    Halted,
    /// `InitChain` was rejected. Its writes were rolled back and the harness stays usable.
    #[error("InitChain rejected: {0}")]
    InitChain(#[from] TransactionError),
}

impl ChainError {
    /// Returns true when the error must halt the harness.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InitChain(_))
    }
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "CHAIN_STORE_ERROR",
            Self::MalformedHeader(_) => "CHAIN_MALFORMED_HEADER",
            Self::ChainIdMismatch { .. } => "CHAIN_ID_MISMATCH",
            Self::Halted => "CHAIN_HALTED",
            Self::InitChain(_) => "CHAIN_INIT_REJECTED",
        }
    }
}

/// Wiring-time errors returned while constructing routers, chains and nodes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A route was registered twice.
    #[error("Route '{0}' is already registered")]
    DuplicateRoute(String),
    /// A route violates the `token(/token)*` syntax.
    #[error("Invalid route '{0}': tokens must be non-empty [A-Za-z0-9_]")]
    InvalidRoute(String),
    /// A query path is malformed or registered twice.
    #[error("Invalid query path '{0}'")]
    InvalidQueryPath(String),
    /// A genesis initializer name was registered twice.
    #[error("Genesis initializer '{0}' is already registered")]
    DuplicateInitializer(String),
    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorCode for CoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRoute(_) => "CORE_DUPLICATE_ROUTE",
            Self::InvalidRoute(_) => "CORE_INVALID_ROUTE",
            Self::InvalidQueryPath(_) => "CORE_INVALID_QUERY_PATH",
            Self::DuplicateInitializer(_) => "CORE_DUPLICATE_INITIALIZER",
            Self::Config(_) => "CORE_CONFIG_ERROR",
        }
    }
}
