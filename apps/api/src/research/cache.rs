//! File-backed research cache: one JSON document per company.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use super::CompanyResearch;

#[derive(Debug, Clone)]
pub struct ResearchCache {
    dir: PathBuf,
    ttl: Duration,
    enabled: bool,
}

impl ResearchCache {
    pub fn new(dir: impl Into<PathBuf>, ttl_days: i64, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            ttl: Duration::days(ttl_days),
            enabled,
        }
    }

    fn path_for(&self, company_name: &str) -> PathBuf {
        self.dir.join(format!("{}_research.json", slugify(company_name)))
    }

    /// Returns a cached record younger than the TTL. Unreadable or stale files are ignored.
    pub async fn get(&self, company_name: &str) -> Option<CompanyResearch> {
        if !self.enabled {
            return None;
        }

        let path = self.path_for(company_name);
        let raw = tokio::fs::read_to_string(&path).await.ok()?;
        let cached: CompanyResearch = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(e) => {
                warn!("Ignoring unreadable research cache {}: {}", path.display(), e);
                return None;
            }
        };

        if Utc::now() - cached.research_date < self.ttl {
            debug!("Research cache hit for {company_name}");
            Some(cached)
        } else {
            debug!("Research cache for {company_name} is stale");
            None
        }
    }

    /// Writes a record. Failures are logged, never propagated.
    pub async fn put(&self, research: &CompanyResearch) {
        if !self.enabled {
            return;
        }

        let path = self.path_for(&research.company_name);
        let result = async {
            tokio::fs::create_dir_all(&self.dir).await?;
            let json = serde_json::to_vec_pretty(research)?;
            tokio::fs::write(&path, json).await?;
            Ok::<_, anyhow::Error>(())
        }
        .await;

        if let Err(e) = result {
            warn!("Could not cache research data at {}: {}", path.display(), e);
        }
    }
}

/// Lowercase, every run of non-alphanumerics collapsed to a single `_`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = true;
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    let slug = slug.trim_end_matches('_').to_string();
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}
