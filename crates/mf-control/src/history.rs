//! Bounded retention of produced control plans.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::plan::Plan;

/// How many solved plans to keep around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryPolicy {
    /// Keep nothing.
    #[default]
    None,
    /// Keep every plan ever produced.
    All,
    /// Keep only the most recent `n` plans, evicting the oldest.
    LastN(usize),
}

/// Append/evict store of solved plans, driven by a [`HistoryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct SolutionHistory {
    policy: HistoryPolicy,
    plans: VecDeque<Plan>,
}

impl SolutionHistory {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            plans: VecDeque::new(),
        }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Record a plan, cloning only when the policy retains it.
    pub fn record(&mut self, plan: &Plan) {
        match self.policy {
            HistoryPolicy::None => {}
            HistoryPolicy::All => self.plans.push_back(plan.clone()),
            HistoryPolicy::LastN(n) => {
                if n == 0 {
                    return;
                }
                self.plans.push_back(plan.clone());
                while self.plans.len() > n {
                    self.plans.pop_front();
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Most recently recorded plan.
    pub fn latest(&self) -> Option<&Plan> {
        self.plans.back()
    }

    /// Retained plans, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::SignalRecord;

    fn plan(tag: f64) -> Plan {
        SignalRecord::new(vec![0.0, 1.0])
            .unwrap()
            .with("u", vec![tag, tag])
            .unwrap()
    }

    #[test]
    fn none_keeps_nothing() {
        let mut history = SolutionHistory::new(HistoryPolicy::None);
        history.record(&plan(1.0));
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn all_keeps_everything() {
        let mut history = SolutionHistory::new(HistoryPolicy::All);
        for i in 0..5 {
            history.record(&plan(i as f64));
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.latest().unwrap().series("u").unwrap()[0], 4.0);
    }

    #[test]
    fn last_n_evicts_oldest() {
        let mut history = SolutionHistory::new(HistoryPolicy::LastN(2));
        for i in 0..5 {
            history.record(&plan(i as f64));
        }
        assert_eq!(history.len(), 2);
        let tags: Vec<f64> = history
            .iter()
            .map(|p| p.series("u").unwrap()[0])
            .collect();
        assert_eq!(tags, vec![3.0, 4.0]);
    }

    #[test]
    fn last_zero_behaves_like_none() {
        let mut history = SolutionHistory::new(HistoryPolicy::LastN(0));
        history.record(&plan(1.0));
        assert!(history.is_empty());
    }
}
