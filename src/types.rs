use serde::Deserialize;

/// Behaviour when a watch trigger arrives while a chain is already running.
///
/// - `Queue`: remember the trigger and start a new chain when the current one
///   finishes (default). Triggers recorded during the same run are coalesced.
/// - `Drop`: ignore the trigger; only events arriving while idle start a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Drop,
}

/// What the generate task does when a single tutorial fails to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure and keep processing the remaining tutorials.
    #[default]
    Continue,
    /// Fail the task with the first extraction error.
    Abort,
}
