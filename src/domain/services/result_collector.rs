//! # Result Collector
//!
//! 行ごとの結果を入力順に蓄積し、件数を集計する

use serde::Serialize;

use crate::domain::entities::row_result::{RowResult, RowStatus};

/// 集計結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportTally {
    pub total: usize,
    pub success: usize,
    pub error: usize,
}

/// 結果コレクター
///
/// 集計以外の副作用は持たない（リトライもしない）
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: Vec<RowResult>,
    success: usize,
    error: usize,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 結果を追加
    pub fn record(&mut self, result: RowResult) {
        match result.status {
            RowStatus::Success => self.success += 1,
            RowStatus::Error => self.error += 1,
        }
        self.results.push(result);
    }

    pub fn success(&mut self, line: u64, natural_key: &str, message: impl Into<String>) {
        self.record(RowResult::success(line, natural_key, message));
    }

    pub fn error(&mut self, line: u64, natural_key: &str, message: impl Into<String>) {
        self.record(RowResult::error(line, natural_key, message));
    }

    pub fn tally(&self) -> ImportTally {
        ImportTally {
            total: self.results.len(),
            success: self.success,
            error: self.error,
        }
    }

    pub fn results(&self) -> &[RowResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<RowResult> {
        self.results
    }
}
