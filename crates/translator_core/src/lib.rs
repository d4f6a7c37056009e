//! Translator core: pure observer/orchestrator state machine.
mod config;
mod effect;
mod identity;
mod job;
mod msg;
mod node;
mod registry;
mod state;
mod update;
mod view_model;

pub use config::{
    CredentialSlot, DispatchPolicy, ObserverTimings, ProviderId, Settings,
    DEFAULT_TARGET_LANGUAGE,
};
pub use effect::Effect;
pub use identity::ChatIdentity;
pub use job::{JobId, ParseJobIdError};
pub use msg::{JobOutcome, Msg, PageScan, ScannedMessage};
pub use node::{
    Affordance, Annotation, NodeId, NodeMarkers, ProcessingState, TRANSLATION_MARKER,
};
pub use registry::{JobRegistry, RegistryError};
pub use state::TranslatorState;
pub use update::update;
pub use view_model::TranslatorView;
