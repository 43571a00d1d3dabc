mod google_translate_tts;

pub use google_translate_tts::{
    GoogleTranslateTts, MAX_CHUNK_CHARS, extract_audio, package_rpc, split_text,
};
