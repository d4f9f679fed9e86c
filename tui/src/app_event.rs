use spotlight_core::DebounceToken;
use spotlight_core::Hit;

/// Events flowing back into the main loop. Using one channel for these
/// avoids bubbling senders through layers of widgets.
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// The sleep armed for this debounce token ran out. Stale tokens are
    /// ignored by the session, so firing one late is harmless.
    DebounceElapsed(DebounceToken),

    /// Result of a completed search call. `seq` echoes the request
    /// sequence so the session can decide whether the results are still
    /// relevant; `query` is carried for logging only.
    SearchResult {
        seq: u64,
        query: String,
        hits: Vec<Hit>,
    },

    /// The search call failed. The session surfaces an empty result set
    /// with an error line instead of staying in flight.
    SearchFailed {
        seq: u64,
        query: String,
        message: String,
    },

    /// Request to exit the application gracefully.
    ExitRequest,
}
