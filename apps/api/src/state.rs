use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::archive::OriginalArchive;
use crate::config::Config;
use crate::extraction::SkillExtractor;
use crate::matching::catalog::SkillCatalog;
use crate::matching::{MatchError, MatchingEngine, SkillNormalizer};
use crate::screening::analysis::ResumeLocks;
use crate::screening::settings::AdminSettings;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Pluggable extractor. Default: KeywordExtractor; LlmExtractor when ANTHROPIC_API_KEY is set.
    pub extractor: Arc<dyn SkillExtractor>,
    /// Original uploads go here when S3 is configured.
    pub archive: Option<Arc<dyn OriginalArchive>>,
    pub normalizer: Arc<SkillNormalizer>,
    pub catalog: Arc<SkillCatalog>,
    pub settings: Arc<RwLock<AdminSettings>>,
    pub locks: ResumeLocks,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        extractor: Arc<dyn SkillExtractor>,
        archive: Option<Arc<dyn OriginalArchive>>,
        normalizer: Arc<SkillNormalizer>,
    ) -> Self {
        let settings = AdminSettings::from_config(&config);
        Self {
            store,
            extractor,
            archive,
            normalizer,
            catalog: Arc::new(SkillCatalog::builtin()),
            settings: Arc::new(RwLock::new(settings)),
            locks: ResumeLocks::default(),
            config,
        }
    }

    /// Engine configured with the current bonus settings.
    pub async fn engine(&self) -> Result<MatchingEngine, MatchError> {
        let bonus = self.settings.read().await.bonus_policy();
        MatchingEngine::new(self.normalizer.clone(), bonus)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.config.extraction_timeout_secs)
    }
}

#[cfg(test)]
pub fn test_state() -> AppState {
    use crate::extraction::keyword::KeywordExtractor;
    use crate::matching::default_normalizer;
    use crate::store::MemoryStore;

    let normalizer = default_normalizer();
    AppState::new(
        Config::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(KeywordExtractor::new(
            SkillCatalog::builtin(),
            normalizer.clone(),
        )),
        None,
        normalizer,
    )
}
