//! 分析レコードストア
//!
//! 一覧・選択中レコード・種類別カウンタを保持する。作成と削除はカウンタを増減で
//! 追従させ、一覧取得は`total`だけを上書きする（種類別カウンタは触らない）。

use crate::api::models::{
    AnalysisId, AnalysisQuery, AnalysisRecord, AnalysisRequest, AnalysisType,
};
use crate::api::CuratorApi;
use crate::store::status::{messages, ActionResult, RequestStatus};

/// 種類別の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    pub total: i64,
    pub sentiment: i64,
    pub summary: i64,
    pub keywords: i64,
}

impl AnalysisStats {
    pub fn count(&self, analysis_type: AnalysisType) -> i64 {
        match analysis_type {
            AnalysisType::Sentiment => self.sentiment,
            AnalysisType::Summary => self.summary,
            AnalysisType::Keywords => self.keywords,
        }
    }

    fn counter_mut(&mut self, analysis_type: AnalysisType) -> &mut i64 {
        match analysis_type {
            AnalysisType::Sentiment => &mut self.sentiment,
            AnalysisType::Summary => &mut self.summary,
            AnalysisType::Keywords => &mut self.keywords,
        }
    }

    pub fn record_added(&mut self, analysis_type: AnalysisType) {
        self.total += 1;
        *self.counter_mut(analysis_type) += 1;
    }

    /// 一覧取得後の種類別カウンタは実数とずれうるので、負になることがある
    pub fn record_removed(&mut self, analysis_type: AnalysisType) {
        self.total -= 1;
        *self.counter_mut(analysis_type) -= 1;
    }

    pub fn merge(&mut self, update: StatsUpdate) {
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(sentiment) = update.sentiment {
            self.sentiment = sentiment;
        }
        if let Some(summary) = update.summary {
            self.summary = summary;
        }
        if let Some(keywords) = update.keywords {
            self.keywords = keywords;
        }
    }
}

/// 部分的なカウンタ更新（指定したものだけ上書き）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub total: Option<i64>,
    pub sentiment: Option<i64>,
    pub summary: Option<i64>,
    pub keywords: Option<i64>,
}

/// 分析ストアの状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    /// 新しい順
    pub items: Vec<AnalysisRecord>,
    pub current: Option<AnalysisRecord>,
    pub stats: AnalysisStats,
    pub status: RequestStatus,
}

pub struct AnalysisStore {
    api: CuratorApi,
    state: AnalysisState,
}

impl AnalysisStore {
    pub fn new(api: CuratorApi) -> Self {
        Self {
            api,
            state: AnalysisState::default(),
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn analyses(&self) -> &[AnalysisRecord] {
        &self.state.items
    }

    pub fn current_analysis(&self) -> Option<&AnalysisRecord> {
        self.state.current.as_ref()
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.state.stats
    }

    pub fn loading(&self) -> bool {
        self.state.status.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.status.error.as_deref()
    }

    pub async fn create_analysis(
        &mut self,
        text: &str,
        analysis_type: AnalysisType,
    ) -> ActionResult<AnalysisRecord> {
        self.state.status.begin();
        let request = AnalysisRequest {
            text: text.to_string(),
            analysis_type,
        };

        let result = match self.api.create_analysis(&request).await {
            Ok(record) => {
                tracing::info!(
                    id = %record.id,
                    analysis_type = %record.analysis_type,
                    "✅ Analysis created"
                );
                self.state.items.insert(0, record.clone());
                self.state.stats.record_added(record.analysis_type);
                self.state.current = Some(record.clone());
                Ok(record)
            }
            Err(e) => Err(self.state.status.fail(&e, messages::CREATE_FAILED)),
        };
        self.state.status.settle();
        result
    }

    /// ページを取得して一覧を丸ごと置き換える
    pub async fn fetch_analyses(&mut self, query: AnalysisQuery) -> ActionResult {
        self.state.status.begin();
        let result = match self.api.list_analyses(&query).await {
            Ok(page) => {
                tracing::debug!(
                    skip = query.skip,
                    limit = query.limit,
                    received = page.analyses.len(),
                    total = page.total,
                    "📋 Analyses page loaded"
                );
                self.state.items = page.analyses;
                self.state.stats.total = page.total;
                Ok(())
            }
            Err(e) => Err(self.state.status.fail(&e, messages::LIST_FAILED)),
        };
        self.state.status.settle();
        result
    }

    pub async fn fetch_analysis(&mut self, id: AnalysisId) -> ActionResult<AnalysisRecord> {
        self.state.status.begin();
        let result = match self.api.get_analysis(id).await {
            Ok(record) => {
                self.state.current = Some(record.clone());
                Ok(record)
            }
            Err(e) => Err(self.state.status.fail(&e, messages::FETCH_FAILED)),
        };
        self.state.status.settle();
        result
    }

    pub async fn delete_analysis(&mut self, id: AnalysisId) -> ActionResult {
        self.state.status.begin();
        let result = match self.api.delete_analysis(id).await {
            Ok(()) => {
                self.remove_local(id);
                Ok(())
            }
            Err(e) => Err(self.state.status.fail(&e, messages::DELETE_FAILED)),
        };
        self.state.status.settle();
        result
    }

    /// 手元の一覧にない場合はカウンタも変えない
    fn remove_local(&mut self, id: AnalysisId) {
        match self.state.items.iter().position(|a| a.id == id) {
            Some(index) => {
                let removed = self.state.items.remove(index);
                self.state.stats.record_removed(removed.analysis_type);
                tracing::info!(%id, "🗑️ Analysis removed");
            }
            None => tracing::debug!(%id, "Deleted analysis was not in the local list"),
        }
    }

    pub fn update_stats(&mut self, update: StatsUpdate) {
        self.state.stats.merge(update);
    }

    pub fn clear_error(&mut self) {
        self.state.status.clear_error();
    }

    pub fn clear_current_analysis(&mut self) {
        self.state.current = None;
    }
}
