// ============================================
// src/session.rs
// 1ラウンド分のゲーム状態と、2マス選択 → 判定の流れ
// ============================================

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::board::{Board, ColorToken, Column, SlotId};
use crate::catalog::{Catalog, Script};
use crate::pool::Pool;
use crate::surface::DisplaySurface;

pub const DEFAULT_ROWS: usize = 5;
pub const DEFAULT_FLASH: Duration = Duration::from_millis(500);
pub const ROUND_COMPLETE_MESSAGE: &str = "Round complete!";

// --------------------------------------------------
// 設定・状態
// --------------------------------------------------

/// ラウンドの進め方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub rows: usize,
    /// 判定時に色を点滅させる長さ
    pub flash: Duration,
    /// 正解で補充したあと、残りの行を並べ替えるか
    pub reshuffle_on_match: bool,
    /// 使い切ったマスを暗い色にするか (false なら正解色のまま)
    pub dim_solved: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            flash: DEFAULT_FLASH,
            reshuffle_on_match: false,
            dim_solved: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Filling,
    Playing,
    /// 全マス解決済み。Stop で Idle に戻る
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: u32,
    pub wrong: u32,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Correct: {}, Wrong: {}", self.correct, self.wrong)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
}

/// タップの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Ignored,
    Selected,
    Deselected,
    /// 2マス揃ったので判定開始 (点滅中)
    Checking(Verdict),
}

/// 点滅中の判定
#[derive(Debug, Clone, Copy)]
struct PendingCheck {
    prompt_row: usize,
    answer_row: usize,
    verdict: Verdict,
    deadline: Instant,
}

// --------------------------------------------------
// セッション本体
// --------------------------------------------------

pub struct BoardSession<R: Rng> {
    policy: SessionPolicy,
    script: Script,
    phase: Phase,
    board: Board,
    pool: Pool,
    selected_prompt: Option<usize>,
    selected_answer: Option<usize>,
    score: Score,
    pending: Option<PendingCheck>,
    rng: R,
}

impl<R: Rng> BoardSession<R> {
    pub fn new(policy: SessionPolicy, script: Script, rng: R) -> Self {
        assert!(
            (1..=script.catalog().len()).contains(&policy.rows),
            "board needs between 1 and {} rows, got {}",
            script.catalog().len(),
            policy.rows
        );
        Self {
            policy,
            script,
            phase: Phase::Idle,
            board: Board::new(policy.rows),
            pool: Pool::new(),
            selected_prompt: None,
            selected_answer: None,
            score: Score::default(),
            pending: None,
            rng,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.script.catalog()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn selection(&self) -> (Option<SlotId>, Option<SlotId>) {
        (
            self.selected_prompt.map(SlotId::prompt),
            self.selected_answer.map(SlotId::answer),
        )
    }

    pub fn is_checking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// 点滅の終了予定時刻
    pub fn flash_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// 文字の種類を選ぶ。ラウンド中は無視して false
    pub fn select_script(&mut self, script: Script) -> bool {
        if self.phase != Phase::Idle {
            debug!(?script, phase = ?self.phase, "script change ignored during a round");
            return false;
        }
        // 新しい表の行数が足りるかは new() と同じ条件
        assert!(
            self.policy.rows <= script.catalog().len(),
            "{} catalog is smaller than the board",
            script.name()
        );
        self.script = script;
        true
    }

    // MARK: ラウンド開始
    pub fn start(&mut self, surface: &mut impl DisplaySurface) {
        if self.phase != Phase::Idle {
            self.stop(surface);
        }

        self.phase = Phase::Filling;
        self.score = Score::default();
        self.selected_prompt = None;
        self.selected_answer = None;
        self.pool = Pool::fill_from(self.catalog());
        self.board = Board::new(self.policy.rows);

        // 1行ずつ、プールから重複なしで取り出して並べる
        for row in 0..self.board.rows() {
            let pair = self.pool.extract_random(&mut self.rng);
            self.board.slot_mut(SlotId::prompt(row)).text = pair.key.to_string();
            self.board.slot_mut(SlotId::answer(row)).text = pair.value.to_string();
        }

        // 左右を別々に並べ替えて、行の対応を崩す
        let rows: Vec<usize> = (0..self.board.rows()).collect();
        self.shuffle_rows(&rows);

        surface.set_message_text("");
        surface.set_score_text(&self.score.to_string());
        self.sync_all(surface);
        surface.set_board_visible(true);

        self.phase = Phase::Playing;
        info!(
            script = self.script.name(),
            rows = self.board.rows(),
            pool = self.pool.len(),
            "round started"
        );
    }

    // MARK: ラウンド終了
    /// Idle 中に呼んでも問題ない
    pub fn stop(&mut self, surface: &mut impl DisplaySurface) {
        // 点滅中の判定は打ち切らず、先に結果を反映させる
        if self.pending.is_some() {
            self.finish_check(surface);
        }

        surface.set_message_text("");
        surface.set_score_text("");
        for id in self.board.slot_ids() {
            self.board.slot_mut(id).reset();
        }
        self.sync_all(surface);
        surface.set_board_visible(false);

        self.selected_prompt = None;
        self.selected_answer = None;
        self.pool.clear();

        if self.phase != Phase::Idle {
            info!(correct = self.score.correct, wrong = self.score.wrong, "round stopped");
        }
        self.phase = Phase::Idle;
    }

    // MARK: タップ処理
    pub fn tap(
        &mut self,
        id: SlotId,
        now: Instant,
        surface: &mut impl DisplaySurface,
    ) -> TapOutcome {
        if self.phase != Phase::Playing || self.pending.is_some() {
            return TapOutcome::Ignored;
        }
        if !self.board.slot(id).enabled {
            return TapOutcome::Ignored;
        }

        let previous = match id.column {
            Column::Prompt => self.selected_prompt,
            Column::Answer => self.selected_answer,
        };

        let (new_selection, outcome) = match previous {
            // 同じマス → 選択解除
            Some(row) if row == id.row => {
                self.highlight(SlotId::new(row, id.column), None, surface);
                (None, TapOutcome::Deselected)
            }
            // 別のマス → 古い方を戻して新しい方を選ぶ
            Some(row) => {
                self.highlight(SlotId::new(row, id.column), None, surface);
                self.highlight(id, Some(ColorToken::Selected), surface);
                (Some(id.row), TapOutcome::Selected)
            }
            None => {
                self.highlight(id, Some(ColorToken::Selected), surface);
                (Some(id.row), TapOutcome::Selected)
            }
        };

        match id.column {
            Column::Prompt => self.selected_prompt = new_selection,
            Column::Answer => self.selected_answer = new_selection,
        }

        match (self.selected_prompt, self.selected_answer) {
            (Some(prompt_row), Some(answer_row)) => {
                let verdict = self.begin_check(prompt_row, answer_row, now, surface);
                TapOutcome::Checking(verdict)
            }
            _ => outcome,
        }
    }

    // MARK: 判定
    fn begin_check(
        &mut self,
        prompt_row: usize,
        answer_row: usize,
        now: Instant,
        surface: &mut impl DisplaySurface,
    ) -> Verdict {
        let prompt = SlotId::prompt(prompt_row);
        let answer = SlotId::answer(answer_row);

        // 判定が終わるまで両マスを押せなくする
        self.board.slot_mut(prompt).enabled = false;
        self.board.slot_mut(answer).enabled = false;

        // 表に無いローマ字は不正解扱い
        let expected = self.catalog().lookup(&self.board.slot(prompt).text);
        let verdict = if expected == Some(self.board.slot(answer).text.as_str()) {
            self.score.correct += 1;
            Verdict::Match
        } else {
            self.score.wrong += 1;
            Verdict::Mismatch
        };

        let flash = match verdict {
            Verdict::Match => ColorToken::Correct,
            Verdict::Mismatch => ColorToken::Wrong,
        };
        for id in [prompt, answer] {
            self.board.slot_mut(id).highlight = Some(flash);
            self.sync(id, surface);
        }

        debug!(
            prompt = %self.board.slot(prompt).text,
            answer = %self.board.slot(answer).text,
            ?verdict,
            "match check"
        );

        self.pending = Some(PendingCheck {
            prompt_row,
            answer_row,
            verdict,
            deadline: now + self.policy.flash,
        });
        verdict
    }

    /// 点滅時間が過ぎていれば判定を完了させる。完了したら true
    pub fn poll_flash(&mut self, now: Instant, surface: &mut impl DisplaySurface) -> bool {
        match self.pending {
            Some(pending) if now >= pending.deadline => {
                self.finish_check(surface);
                true
            }
            _ => false,
        }
    }

    /// 点滅を終えて判定結果を盤面に反映する。判定中でなければ何もしない
    pub fn finish_check(&mut self, surface: &mut impl DisplaySurface) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let prompt = SlotId::prompt(pending.prompt_row);
        let answer = SlotId::answer(pending.answer_row);

        for id in [prompt, answer] {
            self.board.slot_mut(id).highlight = None;
        }

        match pending.verdict {
            Verdict::Match => match self.pool.try_extract_random(&mut self.rng) {
                Some(pair) => {
                    let slot = self.board.slot_mut(prompt);
                    slot.text = pair.key.to_string();
                    slot.enabled = true;
                    let slot = self.board.slot_mut(answer);
                    slot.text = pair.value.to_string();
                    slot.enabled = true;

                    if self.policy.reshuffle_on_match {
                        self.reshuffle_enabled_rows();
                    }
                }
                None => {
                    let solved = if self.policy.dim_solved {
                        ColorToken::Solved
                    } else {
                        ColorToken::Correct
                    };
                    for id in [prompt, answer] {
                        let slot = self.board.slot_mut(id);
                        slot.text.clear();
                        slot.base_color = solved;
                    }
                }
            },
            Verdict::Mismatch => {
                self.board.slot_mut(prompt).enabled = true;
                self.board.slot_mut(answer).enabled = true;
            }
        }

        self.selected_prompt = None;
        self.selected_answer = None;

        if self.policy.reshuffle_on_match && pending.verdict == Verdict::Match {
            self.sync_all(surface);
        } else {
            self.sync(prompt, surface);
            self.sync(answer, surface);
        }
        surface.set_score_text(&self.score.to_string());

        if self.board.all_disabled() {
            surface.set_message_text(ROUND_COMPLETE_MESSAGE);
            self.phase = Phase::Complete;
            info!(correct = self.score.correct, wrong = self.score.wrong, "round complete");
        }
    }

    // --------------------------------------------------
    // 内部ヘルパー
    // --------------------------------------------------

    /// 指定した行の左右の文字を、それぞれ独立に並べ替える
    fn shuffle_rows(&mut self, rows: &[usize]) {
        for column in Column::ALL {
            let all = self.board.column_texts(column);
            let mut texts: Vec<String> = rows.iter().map(|&row| all[row].clone()).collect();
            texts.shuffle(&mut self.rng);
            self.board.place_texts(column, rows, texts);
        }
    }

    fn reshuffle_enabled_rows(&mut self) {
        // 補充できたときだけ呼ばれるので、まだ解決済みのマスは無く左右の有効行は一致する
        let rows = self.board.enabled_rows(Column::Prompt);
        debug_assert_eq!(rows, self.board.enabled_rows(Column::Answer));
        if rows.len() > 1 {
            self.shuffle_rows(&rows);
        }
    }

    fn highlight(
        &mut self,
        id: SlotId,
        color: Option<ColorToken>,
        surface: &mut impl DisplaySurface,
    ) {
        self.board.slot_mut(id).highlight = color;
        surface.set_slot_highlight(id, self.board.slot(id).color());
    }

    fn sync(&self, id: SlotId, surface: &mut impl DisplaySurface) {
        let slot = self.board.slot(id);
        surface.set_slot_text(id, &slot.text);
        surface.set_slot_enabled(id, slot.enabled);
        surface.set_slot_highlight(id, slot.color());
    }

    fn sync_all(&self, surface: &mut impl DisplaySurface) {
        for id in self.board.slot_ids() {
            self.sync(id, surface);
        }
    }
}
