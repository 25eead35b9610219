// ============================================
// src/screen.rs
// 描画用の状態 (ターミナル描画はこれを読むだけ)
// ============================================

use crate::board::{ColorToken, SlotId};
use crate::surface::DisplaySurface;

/// 1マスの表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub text: String,
    pub enabled: bool,
    pub color: ColorToken,
}

impl Default for SlotView {
    fn default() -> Self {
        Self {
            text: String::new(),
            enabled: true,
            color: ColorToken::Base,
        }
    }
}

/// `DisplaySurface` の通知をそのまま保持する
#[derive(Debug, Clone, Default)]
pub struct ScreenModel {
    slots: Vec<[SlotView; 2]>,
    score_text: String,
    message_text: String,
    board_visible: bool,
}

impl ScreenModel {
    pub fn new(rows: usize) -> Self {
        Self {
            slots: vec![Default::default(); rows],
            ..Self::default()
        }
    }

    pub fn rows(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, id: SlotId) -> &SlotView {
        &self.slots[id.row][id.column.index()]
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut SlotView {
        &mut self.slots[id.row][id.column.index()]
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn message_text(&self) -> &str {
        &self.message_text
    }

    pub fn board_visible(&self) -> bool {
        self.board_visible
    }
}

impl DisplaySurface for ScreenModel {
    fn set_slot_text(&mut self, slot: SlotId, text: &str) {
        self.slot_mut(slot).text = text.to_string();
    }

    fn set_slot_enabled(&mut self, slot: SlotId, enabled: bool) {
        self.slot_mut(slot).enabled = enabled;
    }

    fn set_slot_highlight(&mut self, slot: SlotId, color: ColorToken) {
        self.slot_mut(slot).color = color;
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text = text.to_string();
    }

    fn set_message_text(&mut self, text: &str) {
        self.message_text = text.to_string();
    }

    fn set_board_visible(&mut self, visible: bool) {
        self.board_visible = visible;
    }
}
