// Adapters layer: concrete implementations for external formats and systems.

pub mod archive;
pub mod docx;
pub mod spreadsheet;
pub mod storage;
