// ============================================
// src/lib.rs
// KANA MATCH: ローマ字とかなを組み合わせるゲーム
// ============================================

pub mod board;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod pool;
pub mod screen;
pub mod session;
pub mod surface;
pub mod tui;

pub use board::{Board, ColorToken, Column, Slot, SlotId};
pub use catalog::{Catalog, GlyphPair, Script};
pub use pool::Pool;
pub use screen::{ScreenModel, SlotView};
pub use session::{BoardSession, Phase, Score, SessionPolicy, TapOutcome, Verdict};
pub use surface::DisplaySurface;
