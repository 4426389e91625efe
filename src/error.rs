/// Error surface of the protocol roles.
///
/// Protocol answers are never errors: a failed sigma verification is the
/// boolean `false`, and a rejected decommitment is a `None` commit-value.
/// Only malformed inputs, cheat attempts and I/O failures raise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied group does not claim DDH security.
    #[error("Group does not provide DDH security: {0}")]
    SecurityLevel(String),

    /// The group's self-validation predicate returned false.
    #[error("Invalid dlog group: {0}")]
    InvalidGroup(String),

    /// A role requiring the channel was constructed without one.
    #[error("The operation requires a channel but none was supplied")]
    MissingChannel,

    /// A received element is not a group member, a claimed trapdoor does
    /// not match `h`, or a challenge length disagrees with the soundness
    /// parameter.
    #[error("Cheat attempt: {0}")]
    CheatAttempt(String),

    /// A message of the wrong shape or variant, or a value outside its
    /// range.
    #[error("Bad input: {0}")]
    BadInput(String),

    /// Underlying I/O failure, surfaced unchanged.
    #[error("Channel failure: {0}")]
    Channel(#[from] std::io::Error),
}
