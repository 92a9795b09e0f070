use std::{error::Error, fmt};

use thiserror;

pub mod prelude {
    pub use super::{
        err_msg, AriesVcxIssuanceError, AriesVcxIssuanceErrorKind, VcxIssuanceResult,
    };
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum AriesVcxIssuanceErrorKind {
    // Exchange
    #[error("No credential exchange record in a state accepting this message")]
    RecordNotFound,
    #[error("Received credential failed verification")]
    CredentialVerificationError,
    #[error("Holder wallet rejected the credential")]
    HolderStorageError,
    #[error("Exchange record storage failed")]
    StorageError,
    #[error("Message handler precondition failed")]
    HandlerException,

    // Common
    #[error("Object is in invalid state for requested operation")]
    InvalidState,
    #[error("Invalid JSON string")]
    InvalidJson,
    #[error("Unable to serialize")]
    SerializationError,
    #[error("Invalid Configuration")]
    InvalidConfiguration,
    #[error("Unable to acquire lock")]
    LockError,
    #[error("Failed to deliver message")]
    TransportError,
    #[error("Invalid message format")]
    InvalidMessageFormat,
}

#[derive(thiserror::Error)]
pub struct AriesVcxIssuanceError {
    msg: String,
    kind: AriesVcxIssuanceErrorKind,
    backtrace: Option<String>,
}

fn format_error(err: &AriesVcxIssuanceError, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Error: {}", err.msg())?;
    if let Some(backtrace) = err.backtrace() {
        writeln!(f, "Backtrace: {}", backtrace)?;
    }
    let mut current = err.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

impl fmt::Display for AriesVcxIssuanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_error(self, f)
    }
}

impl fmt::Debug for AriesVcxIssuanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_error(self, f)
    }
}

fn try_capture_backtrace() -> Option<String> {
    #[cfg(feature = "backtrace_errors")]
    {
        use backtrace::Backtrace;

        let backtrace = Backtrace::new();
        let mut filtered_backtrace = String::new();

        for frame in backtrace.frames() {
            let symbols = frame.symbols();
            if let Some(symbol) = symbols.first() {
                if let (Some(filename), Some(line)) = (symbol.filename(), symbol.lineno()) {
                    filtered_backtrace.push_str(&format!("[{}:{}]", filename.display(), line));
                }
                if let Some(name) = symbol.name() {
                    filtered_backtrace.push_str(&format!(" {}", name));
                }
                filtered_backtrace.push('\n');
            }
        }
        Some(filtered_backtrace)
    }
    #[cfg(not(feature = "backtrace_errors"))]
    None
}

impl AriesVcxIssuanceError {
    fn new(kind: AriesVcxIssuanceErrorKind, msg: String) -> Self {
        AriesVcxIssuanceError {
            msg,
            kind,
            backtrace: try_capture_backtrace(),
        }
    }

    pub fn from_msg<D>(kind: AriesVcxIssuanceErrorKind, msg: D) -> AriesVcxIssuanceError
    where
        D: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(kind, msg.to_string())
    }

    pub fn find_root_cause(&self) -> String {
        let mut current = self.source();
        while let Some(cause) = current {
            if cause.source().is_none() {
                return cause.to_string();
            }
            current = cause.source();
        }
        self.to_string()
    }

    pub fn kind(&self) -> AriesVcxIssuanceErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn backtrace(&self) -> Option<&String> {
        self.backtrace.as_ref()
    }

    /// Wallet and record-store failures: the handler answers these with a problem report
    /// instead of surfacing them.
    pub fn is_recoverable_storage_failure(&self) -> bool {
        matches!(
            self.kind,
            AriesVcxIssuanceErrorKind::HolderStorageError | AriesVcxIssuanceErrorKind::StorageError
        )
    }

    pub fn extend<D>(self, msg: D) -> AriesVcxIssuanceError
    where
        D: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(self.kind, format!("{}\n{}", self.msg, msg))
    }

    pub fn map<D>(self, kind: AriesVcxIssuanceErrorKind, msg: D) -> AriesVcxIssuanceError
    where
        D: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(kind, msg.to_string())
    }
}

pub fn err_msg<D>(kind: AriesVcxIssuanceErrorKind, msg: D) -> AriesVcxIssuanceError
where
    D: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    AriesVcxIssuanceError::from_msg(kind, msg)
}

pub type VcxIssuanceResult<T> = Result<T, AriesVcxIssuanceError>;
