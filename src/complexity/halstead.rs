//! Halstead metrics from operator/operand token counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Halstead software-science metrics for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalsteadMetrics {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
    pub vocabulary: usize,
    pub length: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub time_seconds: f64,
    pub estimated_bugs: f64,
}

/// Accumulates tokens while walking a syntax tree.
#[derive(Debug, Default)]
pub(crate) struct TokenCounts {
    operators: BTreeMap<String, usize>,
    operands: BTreeMap<String, usize>,
}

impl TokenCounts {
    pub(crate) fn operator(&mut self, token: &str) {
        *self.operators.entry(token.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn operand(&mut self, token: &str) {
        *self.operands.entry(token.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn metrics(&self) -> HalsteadMetrics {
        let n1 = self.operators.len();
        let n2 = self.operands.len();
        let total_operators: usize = self.operators.values().sum();
        let total_operands: usize = self.operands.values().sum();
        HalsteadMetrics::from_counts(n1, n2, total_operators, total_operands)
    }
}

impl HalsteadMetrics {
    /// Derive metrics from distinct (n1, n2) and total (N1, N2) counts.
    pub fn from_counts(
        distinct_operators: usize,
        distinct_operands: usize,
        total_operators: usize,
        total_operands: usize,
    ) -> Self {
        let vocabulary = distinct_operators + distinct_operands;
        let length = total_operators + total_operands;
        let volume = if vocabulary > 0 {
            length as f64 * (vocabulary as f64).log2()
        } else {
            0.0
        };
        let difficulty = if distinct_operands > 0 {
            (distinct_operators as f64 / 2.0) * (total_operands as f64 / distinct_operands as f64)
        } else {
            0.0
        };
        let effort = difficulty * volume;

        Self {
            distinct_operators,
            distinct_operands,
            total_operators,
            total_operands,
            vocabulary,
            length,
            volume,
            difficulty,
            effort,
            time_seconds: effort / 18.0,
            estimated_bugs: volume / 3000.0,
        }
    }
}
