use crate::grouper::group_hits;
use crate::hit::Group;
use crate::hit::Hit;

/// Identifies one armed debounce interval. Every keystroke invalidates the
/// previously issued token, so only the newest one can still commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceToken(u64);

/// What a committed query asks the frontend to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commit {
    /// The committed query is empty: groups become absent, no search call.
    Cleared,
    /// Invoke the search capability; echo `seq` with the response so stale
    /// results can be discarded.
    Fetch { query: String, seq: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryPhase {
    /// No query committed.
    Idle,
    /// A debounce interval is armed.
    Pending,
    /// A search call is in flight.
    Fetching,
    /// Groups reflect the latest committed query.
    Ready,
}

/// Debounced input-to-query state machine. The raw query updates per
/// keystroke; the committed query lags it by one quiet debounce interval.
/// The pipeline owns the grouped results and replaces them wholesale on
/// every response; timers live with the caller, which arms one sleep per
/// issued token and reports back through [`QueryPipeline::on_debounce_elapsed`].
#[derive(Debug, Default)]
pub struct QueryPipeline {
    raw_query: String,
    committed_query: String,
    phase: QueryPhase,
    groups: Option<Vec<Group>>,
    last_error: Option<String>,
    next_token: u64,
    armed_token: Option<DebounceToken>,
    next_seq: u64,
    newest_seq: Option<u64>,
}

impl Default for QueryPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl QueryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    /// `None` until a non-empty query has been committed; `Some(&[])` is
    /// the valid no-results state.
    pub fn groups(&self) -> Option<&[Group]> {
        self.groups.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records a keystroke and arms a fresh debounce token. Any token
    /// issued earlier is dead from this point on.
    pub fn on_keystroke(&mut self, text: &str) -> DebounceToken {
        self.raw_query = text.to_string();
        let token = DebounceToken(self.next_token);
        self.next_token += 1;
        self.armed_token = Some(token);
        self.phase = QueryPhase::Pending;
        token
    }

    /// The caller's sleep for `token` ran out with no further keystroke.
    /// Stale tokens collapse to `None`; the newest one commits the raw
    /// query, and only a change of committed value produces work.
    pub fn on_debounce_elapsed(&mut self, token: DebounceToken) -> Option<Commit> {
        if self.armed_token != Some(token) {
            tracing::trace!(?token, "debounce token superseded");
            return None;
        }
        self.armed_token = None;

        if self.raw_query == self.committed_query {
            self.phase = if self.groups.is_some() {
                QueryPhase::Ready
            } else {
                QueryPhase::Idle
            };
            return None;
        }
        self.committed_query = self.raw_query.clone();

        if self.committed_query.is_empty() {
            self.groups = None;
            self.last_error = None;
            self.newest_seq = None;
            self.phase = QueryPhase::Idle;
            return Some(Commit::Cleared);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.newest_seq = Some(seq);
        self.phase = QueryPhase::Fetching;
        Some(Commit::Fetch {
            query: self.committed_query.clone(),
            seq,
        })
    }

    /// Applies a search response. Returns false (and changes nothing) when
    /// a newer request has been dispatched since `seq`.
    pub fn on_search_success(&mut self, seq: u64, hits: Vec<Hit>) -> bool {
        if !self.is_newest(seq) {
            return false;
        }
        self.groups = Some(group_hits(hits));
        self.last_error = None;
        self.phase = QueryPhase::Ready;
        true
    }

    /// Applies a search failure: never stuck in `Fetching`, surfaces an
    /// empty result set plus a sticky error flag for the UI.
    pub fn on_search_failure(&mut self, seq: u64, message: String) -> bool {
        if !self.is_newest(seq) {
            return false;
        }
        self.groups = Some(Vec::new());
        self.last_error = Some(message);
        self.phase = QueryPhase::Ready;
        true
    }

    fn is_newest(&self, seq: u64) -> bool {
        if self.newest_seq == Some(seq) {
            true
        } else {
            tracing::debug!(seq, newest = ?self.newest_seq, "discarding stale search response");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Hit;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn keystroke_updates_raw_query_immediately() {
        let mut pipeline = QueryPipeline::new();
        pipeline.on_keystroke("con");
        assert_eq!(pipeline.raw_query(), "con");
        assert_eq!(pipeline.committed_query(), "");
        assert_eq!(pipeline.phase(), QueryPhase::Pending);
    }

    #[test]
    fn burst_of_keystrokes_commits_only_the_final_value() {
        let mut pipeline = QueryPipeline::new();
        let t1 = pipeline.on_keystroke("c");
        let t2 = pipeline.on_keystroke("co");
        let t3 = pipeline.on_keystroke("con");

        assert_eq!(pipeline.on_debounce_elapsed(t1), None);
        assert_eq!(pipeline.on_debounce_elapsed(t2), None);
        assert_matches!(
            pipeline.on_debounce_elapsed(t3),
            Some(Commit::Fetch { query, seq: 0 }) if query == "con"
        );
        assert_eq!(pipeline.committed_query(), "con");
        assert_eq!(pipeline.phase(), QueryPhase::Fetching);
    }

    #[test]
    fn token_fires_at_most_once() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());
        assert_eq!(pipeline.on_debounce_elapsed(token), None);
    }

    #[test]
    fn recommitting_the_same_value_fetches_nothing() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());
        pipeline.on_search_success(0, Vec::new());

        let token = pipeline.on_keystroke("con");
        assert_eq!(pipeline.on_debounce_elapsed(token), None);
        assert_eq!(pipeline.phase(), QueryPhase::Ready);
    }

    #[test]
    fn clearing_the_query_drops_groups_without_a_fetch() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());
        pipeline.on_search_success(0, vec![Hit::new("a", "x")]);
        assert!(pipeline.groups().is_some());

        let token = pipeline.on_keystroke("");
        assert_eq!(pipeline.on_debounce_elapsed(token), Some(Commit::Cleared));
        assert_eq!(pipeline.groups(), None);
        assert_eq!(pipeline.phase(), QueryPhase::Idle);
    }

    #[test]
    fn success_replaces_groups_and_reaches_ready() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());

        assert!(pipeline.on_search_success(0, vec![Hit::new("b", "x"), Hit::new("a", "x")]));
        assert_eq!(pipeline.phase(), QueryPhase::Ready);
        let groups = pipeline.groups().unwrap_or_default();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items[0].id, "a");
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        let Some(Commit::Fetch { seq: first, .. }) = pipeline.on_debounce_elapsed(token) else {
            panic!("expected fetch");
        };
        let token = pipeline.on_keystroke("convnext");
        let Some(Commit::Fetch { seq: second, .. }) = pipeline.on_debounce_elapsed(token) else {
            panic!("expected fetch");
        };

        assert!(!pipeline.on_search_success(first, vec![Hit::new("stale", "x")]));
        assert_eq!(pipeline.phase(), QueryPhase::Fetching);
        assert!(pipeline.on_search_success(second, vec![Hit::new("fresh", "x")]));
        let groups = pipeline.groups().unwrap_or_default();
        assert_eq!(groups[0].items[0].id, "fresh");
    }

    #[test]
    fn failure_surfaces_empty_groups_and_error_flag() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());

        assert!(pipeline.on_search_failure(0, "index offline".into()));
        assert_eq!(pipeline.phase(), QueryPhase::Ready);
        assert_eq!(pipeline.groups(), Some(&[][..]));
        assert_eq!(pipeline.last_error(), Some("index offline"));
    }

    #[test]
    fn next_success_clears_the_error_flag() {
        let mut pipeline = QueryPipeline::new();
        let token = pipeline.on_keystroke("con");
        assert!(pipeline.on_debounce_elapsed(token).is_some());
        pipeline.on_search_failure(0, "index offline".into());

        let token = pipeline.on_keystroke("conv");
        assert!(pipeline.on_debounce_elapsed(token).is_some());
        assert!(pipeline.on_search_success(1, Vec::new()));
        assert_eq!(pipeline.last_error(), None);
    }
}
