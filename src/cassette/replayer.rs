//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Pending interactions of one cassette, queued per `(port, method)`.
///
/// Each port/method pair keeps the relative order it was recorded in;
/// interleaving across pairs is not enforced.
pub struct CassetteReplayer {
    pending: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Queues every interaction of `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut pending: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            pending
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { pending }
    }

    /// Takes the next recorded interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics when nothing was recorded for the pair, naming the pairs that
    /// were, or when every recorded interaction for it has been taken.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.pending.get_mut(&key) else {
            let mut recorded: Vec<String> =
                self.pending.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            recorded.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for {port}::{method} \
                 (recorded: [{}])",
                recorded.join(", ")
            );
        };
        queue.pop_front().unwrap_or_else(|| {
            panic!("Cassette exhausted: every recorded {port}::{method} interaction was replayed")
        })
    }
}
