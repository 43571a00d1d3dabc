use std::sync::Arc;

use crate::application::services::{AudioLibrary, NarrationService};

#[derive(Clone)]
pub struct AppState {
    pub narration: Arc<NarrationService>,
    pub audio_library: Arc<AudioLibrary>,
    pub max_upload_bytes: usize,
}
