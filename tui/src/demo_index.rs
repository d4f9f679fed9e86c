use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use nucleo_matcher::Config;
use nucleo_matcher::Matcher;
use nucleo_matcher::Utf32Str;
use nucleo_matcher::pattern::CaseMatching;
use nucleo_matcher::pattern::Normalization;
use nucleo_matcher::pattern::Pattern;
use spotlight_core::Hit;
use spotlight_core::SearchError;
use spotlight_core::SearchProvider;

/// Sample model-hub records served when no dataset is supplied.
const SAMPLE_DATASET: &str = include_str!("../data/sample_models.json");

/// In-memory stand-in for the real search backend: fuzzy-matches the query
/// against every record and returns hits in descending score order, which
/// is the "relevance ranking" the grouper ingests.
pub struct DemoIndex {
    records: Vec<Hit>,
    matcher: Mutex<Matcher>,
    max_hits: usize,
}

impl DemoIndex {
    pub fn with_sample_data(max_hits: usize) -> Self {
        // The bundled dataset is a compile-time fixture; a parse failure
        // here is a build defect, not a runtime condition.
        let records = match serde_json::from_str(SAMPLE_DATASET) {
            Ok(records) => records,
            Err(err) => {
                tracing::error!("bundled sample dataset failed to parse: {err}");
                Vec::new()
            }
        };
        Self::from_records(records, max_hits)
    }

    pub fn from_json_path(path: &Path, max_hits: usize) -> Result<Self, SearchError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SearchError::DatasetLoad {
            path: path.display().to_string(),
            source,
        })?;
        let records =
            serde_json::from_str(&contents).map_err(|err| SearchError::DatasetParse {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        Ok(Self::from_records(records, max_hits))
    }

    pub fn from_records(records: Vec<Hit>, max_hits: usize) -> Self {
        Self {
            records,
            matcher: Mutex::new(Matcher::new(Config::DEFAULT)),
            max_hits,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn rank(&self, query: &str) -> Vec<Hit> {
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut matcher = self
            .matcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut buf = Vec::new();
        let mut scored: Vec<(u32, &Hit)> = self
            .records
            .iter()
            .filter_map(|record| {
                let haystack = haystack_for(record);
                let score = pattern.score(Utf32Str::new(&haystack, &mut buf), &mut matcher)?;
                Some((score, record))
            })
            .collect();
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then_with(|| a.id.cmp(&b.id))
        });
        scored
            .into_iter()
            .take(self.max_hits)
            .map(|(_, record)| record.clone())
            .collect()
    }
}

fn haystack_for(record: &Hit) -> String {
    match &record.author {
        Some(author) => format!("{} {author}", record.id),
        None => record.id.clone(),
    }
}

#[async_trait]
impl SearchProvider for DemoIndex {
    async fn search(&self, query: &str) -> Result<Vec<Hit>, SearchError> {
        let hits = self.rank(query);
        tracing::debug!(%query, hits = hits.len(), "demo index search");
        Ok(hits)
    }
}
