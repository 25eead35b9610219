// ============================================
// src/board.rs
// 盤面 (左列: ローマ字 / 右列: かな)
// ============================================

/// 盤面の列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Prompt, // ローマ字
    Answer, // かな
}

impl Column {
    pub const ALL: [Column; 2] = [Column::Prompt, Column::Answer];

    pub(crate) fn index(self) -> usize {
        match self {
            Column::Prompt => 0,
            Column::Answer => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Column::Prompt => Column::Answer,
            Column::Answer => Column::Prompt,
        }
    }
}

/// マスの位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub row: usize,
    pub column: Column,
}

impl SlotId {
    pub fn new(row: usize, column: Column) -> Self {
        Self { row, column }
    }

    pub fn prompt(row: usize) -> Self {
        Self::new(row, Column::Prompt)
    }

    pub fn answer(row: usize) -> Self {
        Self::new(row, Column::Answer)
    }
}

/// 表示色 (描画側が実際の色に変換する)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorToken {
    #[default]
    Base,
    Selected,
    Correct,
    Wrong,
    Solved,
}

/// 1マスの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub text: String,
    pub enabled: bool,
    /// ハイライト解除後に戻る色
    pub base_color: ColorToken,
    pub highlight: Option<ColorToken>,
}

impl Slot {
    fn fresh() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// 現在表示すべき色
    pub fn color(&self) -> ColorToken {
        self.highlight.unwrap_or(self.base_color)
    }

    /// 有効・未選択・基本色に戻す (文字はそのまま)
    pub fn reset(&mut self) {
        self.enabled = true;
        self.base_color = ColorToken::Base;
        self.highlight = None;
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    rows: Vec<[Slot; 2]>,
}

impl Board {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| [Slot::fresh(), Slot::fresh()]).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    fn check(&self, id: SlotId) {
        assert!(
            id.row < self.rows.len(),
            "slot row {} out of range (board has {} rows)",
            id.row,
            self.rows.len()
        );
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        self.check(id);
        &self.rows[id.row][id.column.index()]
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        self.check(id);
        &mut self.rows[id.row][id.column.index()]
    }

    /// 全マスの位置 (行優先)
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> + use<> {
        let rows = self.rows.len();
        (0..rows).flat_map(|row| Column::ALL.map(|column| SlotId::new(row, column)))
    }

    pub fn all_disabled(&self) -> bool {
        self.rows.iter().flatten().all(|slot| !slot.enabled)
    }

    pub fn column_texts(&self, column: Column) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row[column.index()].text.clone())
            .collect()
    }

    /// 指定した行に文字を並べ直す (`rows` と `texts` は同じ長さ)
    pub fn place_texts(&mut self, column: Column, rows: &[usize], texts: Vec<String>) {
        assert_eq!(rows.len(), texts.len(), "row/text count mismatch");
        for (&row, text) in rows.iter().zip(texts) {
            self.slot_mut(SlotId::new(row, column)).text = text;
        }
    }

    pub fn enabled_rows(&self, column: Column) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|&row| self.rows[row][column.index()].enabled)
            .collect()
    }
}
