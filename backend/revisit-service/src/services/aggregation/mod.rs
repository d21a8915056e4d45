use crate::models::{DomainStats, VisitRecord};
use crate::utils::{collect_keywords, extract_domain};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Domain Aggregator - 將瀏覽紀錄依網域彙總
///
/// Output order is the order in which each domain was first seen in the input,
/// which later serves as the ranking tie-break.
#[derive(Debug, Default)]
pub struct DomainAggregator {
    domains: Vec<DomainStats>,
    positions: HashMap<String, usize>,
}

impl DomainAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a history window in one call.
    pub fn aggregate(records: &[VisitRecord]) -> Vec<DomainStats> {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.add(record);
        }
        aggregator.finish()
    }

    pub fn add(&mut self, record: &VisitRecord) {
        let domain = extract_domain(&record.url);

        let idx = match self.positions.get(&domain) {
            Some(&idx) => idx,
            None => {
                let mut keywords = HashSet::new();
                collect_keywords(&domain, &mut keywords);

                self.domains.push(DomainStats {
                    domain: domain.clone(),
                    visit_count: 0,
                    last_visited_at: record.visited_at,
                    keywords,
                    representative_url: record.url.clone(),
                    title: None,
                });
                self.positions.insert(domain, self.domains.len() - 1);
                self.domains.len() - 1
            }
        };

        let stats = &mut self.domains[idx];
        stats.visit_count = stats.visit_count.saturating_add(record.visit_count as u64);
        stats.last_visited_at = stats.last_visited_at.max(record.visited_at);

        if let Some(title) = record.title.as_deref().filter(|t| !t.trim().is_empty()) {
            collect_keywords(title, &mut stats.keywords);
            if stats.title.is_none() {
                stats.title = Some(title.to_string());
            }
        }
    }

    pub fn finish(self) -> Vec<DomainStats> {
        debug!(domain_count = self.domains.len(), "Domain aggregation complete");
        self.domains
    }
}
