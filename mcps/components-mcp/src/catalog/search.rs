//! Keyword search over a catalog snapshot
//!
//! Queries are conjunctive: every query token must match a token of the
//! record's path or content. A query token matches any indexed token it is
//! a prefix of, so `modal` finds `modals`.
//!
//! Ranking, highest first:
//! 1. number of query tokens matched by the path;
//! 2. shorter path;
//! 3. path in lexicographic order.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::{tokens, Catalog, RecordId};
use crate::error::QueryError;
use crate::types::{SearchHit, SearchRequest};

/// How many loop iterations run between cancellation checks
const CHECK_INTERVAL: usize = 256;

/// Cooperative cancellation for a running search
///
/// Checked periodically while candidates are collected and scored. A search
/// that observes cancellation returns [`QueryError::Cancelled`] and discards
/// everything it has computed.
#[derive(Debug, Clone, Default)]
pub struct SearchGuard {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl SearchGuard {
    /// A guard that never cancels
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(token: CancellationToken) -> Self {
        Self {
            token: Some(token),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn check(&self) -> Result<(), QueryError> {
        if self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(QueryError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(QueryError::Cancelled);
        }
        Ok(())
    }
}

impl Catalog {
    /// Run a ranked keyword search
    ///
    /// At most `page_size` hits are returned; `request.limit` can only
    /// lower that.
    pub fn search(
        &self,
        request: &SearchRequest,
        page_size: usize,
        guard: &SearchGuard,
    ) -> Result<Vec<SearchHit>, QueryError> {
        let query = tokens::query_tokens(&request.query);
        if query.is_empty() {
            return Err(QueryError::EmptyQuery(request.query.clone()));
        }

        let framework = request.framework.as_deref();
        if let Some(framework) = framework {
            if !self.has_framework(framework) {
                return Err(QueryError::UnknownFramework(framework.to_string()));
            }
        }

        let page_size = page_size.max(1);
        let limit = request.limit.unwrap_or(page_size).clamp(1, page_size);

        let mut candidates = Vec::with_capacity(query.len());
        for token in &query {
            let ids = self.prefix_matches(token, guard)?;
            if ids.is_empty() {
                guard.check()?;
                return Ok(Vec::new());
            }
            candidates.push(ids);
        }
        candidates.sort_by_key(|ids| ids.len());

        let (smallest, others) = match candidates.split_first() {
            Some(split) => split,
            None => return Ok(Vec::new()),
        };

        let mut scored: Vec<(usize, RecordId)> = Vec::new();
        for (n, &id) in smallest.iter().enumerate() {
            if n % CHECK_INTERVAL == 0 {
                guard.check()?;
            }
            if !others.iter().all(|ids| ids.contains(&id)) {
                continue;
            }
            let record = &self.records[id];
            if framework.is_some_and(|f| f != record.framework) {
                continue;
            }
            let path_tokens = tokens::token_set(&record.path);
            let path_matches = query
                .iter()
                .filter(|q| path_tokens.iter().any(|p| p.starts_with(q.as_str())))
                .count();
            scored.push((path_matches, id));
        }
        guard.check()?;

        scored.sort_by(|(a_matches, a), (b_matches, b)| {
            let (a, b) = (&self.records[*a].path, &self.records[*b].path);
            b_matches
                .cmp(a_matches)
                .then_with(|| a.len().cmp(&b.len()))
                .then_with(|| a.cmp(b))
        });
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(path_matches, id)| {
                let record = &self.records[id];
                SearchHit {
                    component: record.descriptor(),
                    path_matches,
                    content: request.include_content.then(|| record.content.clone()),
                }
            })
            .collect())
    }

    /// Ids of records having a token that starts with `prefix`
    fn prefix_matches(
        &self,
        prefix: &str,
        guard: &SearchGuard,
    ) -> Result<BTreeSet<RecordId>, QueryError> {
        let mut ids = BTreeSet::new();
        let range = self
            .postings
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded));

        for (n, (token, posting)) in range.enumerate() {
            if !token.starts_with(prefix) {
                break;
            }
            if n % CHECK_INTERVAL == 0 {
                guard.check()?;
            }
            ids.extend(posting.iter().copied());
        }
        Ok(ids)
    }
}
