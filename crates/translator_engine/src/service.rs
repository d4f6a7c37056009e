use std::sync::Arc;

use translator_logging::{preview, tl_debug, tl_error, tl_info};

use crate::providers::ProviderFactory;
use crate::store::SettingsStore;
use crate::{TranslateReply, TranslateRequest};

/// Handles one `TRANSLATE_REQUEST` at a time, independent of any page.
///
/// Settings are re-read per request so a provider switch applies to the very
/// next job without restarting anything.
pub struct TranslationService {
    store: Arc<dyn SettingsStore>,
    factory: ProviderFactory,
}

impl TranslationService {
    pub fn new(store: Arc<dyn SettingsStore>, factory: ProviderFactory) -> Self {
        Self { store, factory }
    }

    pub async fn handle(&self, request: TranslateRequest) -> TranslateReply {
        let count = self.store.record_dispatch();
        let settings = self.store.load();
        let translator = self.factory.translator(&settings);
        let target = settings.effective_target_language();

        tl_info!(
            "job {} -> {} ({}), dispatch #{count}",
            request.job_id,
            translator.provider().as_key(),
            target
        );
        tl_debug!("job {} text: {}", request.job_id, preview(&request.text, 60));

        match translator.translate(&request.text, target).await {
            Ok(translated) => {
                tl_debug!("job {} translated: {}", request.job_id, preview(&translated, 60));
                TranslateReply::translated(request.job_id, translated)
            }
            Err(err) => {
                tl_error!("job {} failed ({}): {}", request.job_id, err.kind, err);
                TranslateReply::failed(request.job_id, err.to_string())
            }
        }
    }
}
