//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod clusterer;
pub mod process;

pub use clock::ReplayingClock;
pub use clusterer::ReplayingClusterer;
pub use process::ReplayingProcessRunner;

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Pulls the next recorded output for a port/method pair.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Rebuilds a `Result` from the `{"ok": ..}` / `{"err": ..}` recording shape.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
