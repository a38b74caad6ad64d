// 集成测试公共模块
//
// 提供可编排结果的桩提供方和服务构建辅助

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use translink::translation::{
    ProviderError, TranslationConfig, TranslationProvider, TranslationService,
};

/// 桩提供方的单次结果
#[derive(Debug, Clone)]
pub enum Outcome {
    Ok(String),
    RateLimited,
    Unavailable,
    /// 超过提供方超时后才返回
    Hang,
}

/// 按脚本返回结果的提供方，脚本用完后重复最后一个结果
pub struct StubProvider {
    name: String,
    timeout: Duration,
    script: Mutex<VecDeque<Outcome>>,
    last: Mutex<Outcome>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, String)>>,
}

impl StubProvider {
    pub fn new(name: &str, outcomes: Vec<Outcome>) -> Arc<Self> {
        let last = outcomes.last().cloned().unwrap_or(Outcome::Unavailable);
        Arc::new(Self {
            name: name.to_string(),
            timeout: Duration::from_millis(200),
            script: Mutex::new(outcomes.into()),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(name: &str, text: &str) -> Arc<Self> {
        Self::new(name, vec![Outcome::Ok(text.to_string())])
    }

    pub fn failing(name: &str, outcome: Outcome) -> Arc<Self> {
        Self::new(name, vec![outcome])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 收到的 (text, source, target)
    pub fn seen(&self) -> Vec<(String, String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            text.to_string(),
            source_lang.to_string(),
            target_lang.to_string(),
        ));

        let outcome = {
            let mut script = self.script.lock().unwrap();
            match script.pop_front() {
                Some(outcome) => outcome,
                None => self.last.lock().unwrap().clone(),
            }
        };

        match outcome {
            Outcome::Ok(text) => Ok(text),
            Outcome::RateLimited => Err(ProviderError::RateLimited("quota exceeded".to_string())),
            Outcome::Unavailable => Err(ProviderError::Unavailable("connection refused".to_string())),
            Outcome::Hang => {
                tokio::time::sleep(self.timeout * 10).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub fn as_chain(stubs: &[Arc<StubProvider>]) -> Vec<Arc<dyn TranslationProvider>> {
    stubs
        .iter()
        .map(|s| Arc::clone(s) as Arc<dyn TranslationProvider>)
        .collect()
}

/// 用桩提供方构建服务
pub fn service_with(stubs: &[Arc<StubProvider>]) -> TranslationService {
    TranslationService::with_providers(as_chain(stubs), &TranslationConfig::default())
}

pub fn service_with_config(
    stubs: &[Arc<StubProvider>],
    config: &TranslationConfig,
) -> TranslationService {
    TranslationService::with_providers(as_chain(stubs), config)
}
