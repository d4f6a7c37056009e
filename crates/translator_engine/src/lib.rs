//! Translator engine: provider adapters, text extraction and the worker that
//! runs translation jobs off the driver thread.
mod contract;
mod engine;
mod error;
mod extract;
pub mod page;
pub mod providers;
mod service;
mod store;

pub use contract::{TranslateReply, TranslateRequest};
pub use engine::{ChannelReplySink, Dispatcher, EngineHandle, ReplySink};
pub use error::{ErrorKind, TranslateError};
pub use extract::{ChatTextExtractor, TextExtractor, CHROME_SELECTORS};
pub use page::{ChatPage, MessageElement, SnapshotPage};
pub use providers::{ProviderFactory, ProviderSettings, Translator};
pub use service::TranslationService;
pub use store::{MemorySettingsStore, SettingsStore};
