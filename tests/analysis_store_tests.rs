//! 分析ストアの統合テスト

mod common;

use common::*;
use curator_client::api::{HttpMethod, RequestBody};
use curator_client::store::{AnalysisStats, AnalysisStore, StatsUpdate};
use curator_client::{AnalysisId, AnalysisQuery, AnalysisType};
use serde_json::json;
use std::sync::Arc;

/// 3件（sentiment, summary, keywords）を作成済みのストア
async fn seeded_store(transport: &Arc<ScriptedTransport>) -> AnalysisStore {
    let mut store = AnalysisStore::new(api(transport));
    transport.push_ok(record_json(1, "sentiment"));
    transport.push_ok(record_json(2, "summary"));
    transport.push_ok(record_json(3, "keywords"));
    store.create_analysis("one", AnalysisType::Sentiment).await.unwrap();
    store.create_analysis("two", AnalysisType::Summary).await.unwrap();
    store.create_analysis("three", AnalysisType::Keywords).await.unwrap();
    store
}

fn ids(store: &AnalysisStore) -> Vec<i64> {
    store.analyses().iter().map(|a| a.id.0).collect()
}

#[tokio::test]
async fn test_create_analysis_prepends_and_counts() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;

    transport.push_ok(record_json(4, "sentiment"));
    let before = *store.stats();
    let record = store
        .create_analysis("Отличный сервис", AnalysisType::Sentiment)
        .await
        .unwrap();

    assert_eq!(record.id, AnalysisId(4));
    assert_eq!(ids(&store), vec![4, 3, 2, 1]);
    assert_eq!(store.current_analysis(), Some(&record));
    assert_eq!(store.stats().total, before.total + 1);
    assert_eq!(store.stats().sentiment, before.sentiment + 1);
    assert_eq!(store.stats().summary, before.summary);
    assert!(!store.loading());

    let last = transport.requests().pop().unwrap().request;
    assert_eq!(last.method, HttpMethod::POST);
    assert_eq!(last.endpoint, "/analysis/");
    assert_eq!(
        last.body,
        RequestBody::Json(json!({"text": "Отличный сервис", "analysis_type": "sentiment"}))
    );
}

#[tokio::test]
async fn test_create_analysis_failure_leaves_state() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;
    let before = store.state().clone();

    transport.push_api_error(500, Some("Ошибка при анализе контента: quota exceeded"));
    let err = store
        .create_analysis("text", AnalysisType::Summary)
        .await
        .unwrap_err();

    assert_eq!(err.message, "Ошибка при анализе контента: quota exceeded");
    assert_eq!(store.analyses(), before.items.as_slice());
    assert_eq!(store.current_analysis(), before.current.as_ref());
    assert_eq!(store.stats(), &before.stats);
    assert_eq!(store.error(), Some("Ошибка при анализе контента: quota exceeded"));
    assert!(!store.loading());
}

#[tokio::test]
async fn test_create_analysis_network_failure_fallback() {
    let transport = ScriptedTransport::new();
    transport.push_network_error();
    let mut store = AnalysisStore::new(api(&transport));

    let err = store
        .create_analysis("text", AnalysisType::Keywords)
        .await
        .unwrap_err();
    assert_eq!(err.message, "Ошибка при анализе текста");
}

#[tokio::test]
async fn test_fetch_analyses_replaces_items_and_total_only() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;
    assert_eq!(store.analyses().len(), 3);

    transport.push_ok(json!({
        "analyses": [record_json(10, "summary"), record_json(9, "summary")],
        "total": 42
    }));
    store.fetch_analyses(AnalysisQuery::page(0, 20)).await.unwrap();

    assert_eq!(ids(&store), vec![10, 9]);
    // totalはレスポンスから、種類別カウンタはそのまま
    assert_eq!(
        store.stats(),
        &AnalysisStats {
            total: 42,
            sentiment: 1,
            summary: 1,
            keywords: 1,
        }
    );

    let last = transport.requests().pop().unwrap().request;
    assert_eq!(last.method, HttpMethod::GET);
    assert_eq!(last.endpoint, "/analysis/");
    assert_eq!(
        last.query,
        vec![
            ("skip".to_string(), "0".to_string()),
            ("limit".to_string(), "20".to_string())
        ]
    );
}

#[tokio::test]
async fn test_fetch_analyses_with_type_filter() {
    let transport = ScriptedTransport::new();
    transport.push_ok(json!({"analyses": [], "total": 0}));
    let mut store = AnalysisStore::new(api(&transport));

    store
        .fetch_analyses(AnalysisQuery::page(20, 10).with_type(AnalysisType::Keywords))
        .await
        .unwrap();

    assert!(store.analyses().is_empty());
    let query = &transport.requests()[0].request.query;
    assert!(query.contains(&("analysis_type".to_string(), "keywords".to_string())));
    assert!(query.contains(&("skip".to_string(), "20".to_string())));
}

#[tokio::test]
async fn test_fetch_analyses_failure_keeps_items() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;

    transport.push_network_error();
    let err = store.fetch_analyses(AnalysisQuery::default()).await.unwrap_err();

    assert_eq!(err.message, "Ошибка при загрузке анализов");
    assert_eq!(ids(&store), vec![3, 2, 1]);
    assert_eq!(store.stats().total, 3);
}

#[tokio::test]
async fn test_fetch_analysis_sets_current_only() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;
    let stats = *store.stats();

    transport.push_ok(record_json(99, "summary"));
    let record = store.fetch_analysis(AnalysisId(99)).await.unwrap();

    assert_eq!(store.current_analysis(), Some(&record));
    assert_eq!(ids(&store), vec![3, 2, 1]);
    assert_eq!(store.stats(), &stats);
    assert_eq!(transport.requests().pop().unwrap().request.endpoint, "/analysis/99");
}

#[tokio::test]
async fn test_fetch_analysis_not_found() {
    let transport = ScriptedTransport::new();
    transport.push_api_error(404, Some("Анализ не найден"));
    transport.push_network_error();
    let mut store = AnalysisStore::new(api(&transport));

    let err = store.fetch_analysis(AnalysisId(5)).await.unwrap_err();
    assert_eq!(err.message, "Анализ не найден");
    assert!(store.current_analysis().is_none());

    let err = store.fetch_analysis(AnalysisId(5)).await.unwrap_err();
    assert_eq!(err.message, "Ошибка при загрузке анализа");
}

#[tokio::test]
async fn test_delete_analysis_present() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;

    transport.push_ok(json!({"message": "Анализ успешно удален"}));
    store.delete_analysis(AnalysisId(2)).await.unwrap();

    assert_eq!(ids(&store), vec![3, 1]);
    assert_eq!(
        store.stats(),
        &AnalysisStats {
            total: 2,
            sentiment: 1,
            summary: 0,
            keywords: 1,
        }
    );

    let last = transport.requests().pop().unwrap().request;
    assert_eq!(last.method, HttpMethod::DELETE);
    assert_eq!(last.endpoint, "/analysis/2");
}

#[tokio::test]
async fn test_delete_analysis_absent_is_noop_locally() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;
    let before = store.state().clone();

    transport.push_ok(serde_json::Value::Null);
    store.delete_analysis(AnalysisId(777)).await.unwrap();

    assert_eq!(store.analyses(), before.items.as_slice());
    assert_eq!(store.stats(), &before.stats);
}

#[tokio::test]
async fn test_delete_after_fetch_decrements_stale_counter() {
    let transport = ScriptedTransport::new();
    let mut store = AnalysisStore::new(api(&transport));

    transport.push_ok(json!({
        "analyses": [record_json(7, "summary")],
        "total": 42
    }));
    store.fetch_analyses(AnalysisQuery::default()).await.unwrap();

    transport.push_ok(json!({"message": "Анализ успешно удален"}));
    store.delete_analysis(AnalysisId(7)).await.unwrap();

    // 一覧取得は種類別カウンタを埋めないので、削除で負になる
    assert!(store.analyses().is_empty());
    assert_eq!(
        store.stats(),
        &AnalysisStats {
            total: 41,
            sentiment: 0,
            summary: -1,
            keywords: 0,
        }
    );
}

#[tokio::test]
async fn test_delete_analysis_failure() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;

    transport.push_api_error(404, Some("Анализ не найден"));
    let err = store.delete_analysis(AnalysisId(1)).await.unwrap_err();

    assert_eq!(err.message, "Анализ не найден");
    assert_eq!(ids(&store), vec![3, 2, 1]);
    assert_eq!(store.stats().total, 3);

    transport.push_network_error();
    let err = store.delete_analysis(AnalysisId(1)).await.unwrap_err();
    assert_eq!(err.message, "Ошибка при удалении анализа");
}

#[tokio::test]
async fn test_error_overwritten_by_next_operation() {
    let transport = ScriptedTransport::new();
    transport.push_api_error(404, Some("Анализ не найден"));
    transport.push_ok(record_json(1, "summary"));
    let mut store = AnalysisStore::new(api(&transport));

    assert!(store.fetch_analysis(AnalysisId(1)).await.is_err());
    assert!(store.error().is_some());

    store.fetch_analysis(AnalysisId(1)).await.unwrap();
    assert!(store.error().is_none());

    store.clear_error();
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_clear_current_and_update_stats() {
    let transport = ScriptedTransport::new();
    let mut store = seeded_store(&transport).await;
    assert!(store.current_analysis().is_some());

    store.clear_current_analysis();
    assert!(store.current_analysis().is_none());
    // 一覧はそのまま
    assert_eq!(store.analyses().len(), 3);

    store.update_stats(StatsUpdate {
        total: Some(100),
        keywords: Some(50),
        ..Default::default()
    });
    assert_eq!(
        store.stats(),
        &AnalysisStats {
            total: 100,
            sentiment: 1,
            summary: 1,
            keywords: 50,
        }
    );
}
