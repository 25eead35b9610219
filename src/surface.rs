// ============================================
// src/surface.rs
// ゲーム本体から見た描画先
// ============================================

use crate::board::{ColorToken, SlotId};

/// 盤面・スコア・メッセージの描画を受け持つ側。
/// ゲーム本体は状態が変わるたびにここへ通知する。
pub trait DisplaySurface {
    fn set_slot_text(&mut self, slot: SlotId, text: &str);
    fn set_slot_enabled(&mut self, slot: SlotId, enabled: bool);
    fn set_slot_highlight(&mut self, slot: SlotId, color: ColorToken);
    fn set_score_text(&mut self, text: &str);
    fn set_message_text(&mut self, text: &str);
    fn set_board_visible(&mut self, visible: bool);
}
