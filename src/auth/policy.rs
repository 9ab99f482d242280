use axum::extract::FromRef;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    Exact(String),
    /// `/base/**`: the base path and everything below it.
    Subtree(String),
}

impl PathPattern {
    fn parse(raw: &str) -> Self {
        match raw.strip_suffix("/**") {
            Some(base) => Self::Subtree(base.trim_end_matches('/').to_owned()),
            None => Self::Exact(raw.trim_end_matches('/').to_owned()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        match self {
            Self::Exact(p) => p == path,
            Self::Subtree(base) => path
                .strip_prefix(base.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

/// Routes reachable without authentication; everything else needs an
/// identity.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public: Vec<PathPattern>,
}

impl FromRef<AppState> for Arc<AccessPolicy> {
    fn from_ref(state: &AppState) -> Self {
        state.policy.clone()
    }
}

impl AccessPolicy {
    pub fn new<I, S>(public: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            public: public
                .into_iter()
                .map(|p| PathPattern::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|p| p.matches(path))
    }
}
