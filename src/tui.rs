// ============================================
// src/tui.rs
// ターミナル版の画面 (描画とキー入力)
// ============================================

use std::io::{Result, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    cursor::Hide,
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info};

use crate::board::{ColorToken, Column, SlotId};
use crate::catalog::Script;
use crate::screen::{ScreenModel, SlotView};
use crate::session::{BoardSession, Phase};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SLOT_HEIGHT: u16 = 3;

// --------------------------------------------------
// アプリ状態
// --------------------------------------------------

/// セッションと、それを映す画面状態・カーソル
pub struct App<R: Rng> {
    session: BoardSession<R>,
    screen: ScreenModel,
    cursor: SlotId,
    should_quit: bool,
}

impl<R: Rng> App<R> {
    pub fn new(session: BoardSession<R>) -> Self {
        let screen = ScreenModel::new(session.policy().rows);
        Self {
            session,
            screen,
            cursor: SlotId::prompt(0),
            should_quit: false,
        }
    }

    pub fn session(&self) -> &BoardSession<R> {
        &self.session
    }

    pub fn screen(&self) -> &ScreenModel {
        &self.screen
    }

    pub fn cursor(&self) -> SlotId {
        self.cursor
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// キー入力の処理
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => self.toggle_round(),
            _ if self.session.phase() == Phase::Idle => self.handle_idle_key(code),
            _ => self.handle_board_key(code, now),
        }
    }

    /// 次の入力待ちの長さ。点滅中は終了予定時刻を超えて待たない
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.session.flash_deadline() {
            Some(deadline) => POLL_INTERVAL.min(deadline.saturating_duration_since(now)),
            None => POLL_INTERVAL,
        }
    }

    /// 点滅時間が過ぎた判定を完了させる
    pub fn tick(&mut self, now: Instant) {
        self.session.poll_flash(now, &mut self.screen);
    }

    fn toggle_round(&mut self) {
        if self.session.phase() == Phase::Idle {
            self.cursor = SlotId::prompt(0);
            self.session.start(&mut self.screen);
        } else {
            self.session.stop(&mut self.screen);
        }
    }

    fn select_script(&mut self, script: Script) {
        if self.session.select_script(script) {
            debug!(script = script.name(), "script selected");
        }
    }

    fn handle_idle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_round(),
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.select_script(self.session.script().toggled())
            }
            KeyCode::Char('1') => self.select_script(Script::Hiragana),
            KeyCode::Char('2') => self.select_script(Script::Katakana),
            _ => {}
        }
    }

    fn handle_board_key(&mut self, code: KeyCode, now: Instant) {
        let rows = self.session.board().rows();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.row = (self.cursor.row + rows - 1) % rows;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.row = (self.cursor.row + 1) % rows;
            }
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Tab => {
                self.cursor.column = self.cursor.column.other();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let outcome = self.session.tap(self.cursor, now, &mut self.screen);
                debug!(slot = ?self.cursor, ?outcome, "tap");
            }
            _ => {}
        }
    }
}

// --------------------------------------------------
// TUIセットアップと実行ループ
// --------------------------------------------------

pub fn run<R: Rng>(session: BoardSession<R>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, App::new(session));
    // ループが失敗しても端末は元に戻す
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<impl Backend>) -> Result<()> {
    terminal.show_cursor()?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn run_app<R: Rng>(terminal: &mut Terminal<impl Backend>, mut app: App<R>) -> Result<()> {
    info!("terminal ui started");
    while !app.should_quit() {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    app.handle_key(key.code, Instant::now());
                }
            }
        }
        app.tick(Instant::now());
    }
    info!("terminal ui closed");
    Ok(())
}

// --------------------------------------------------
// UI描画
// --------------------------------------------------

pub fn ui<R: Rng>(f: &mut Frame, app: &App<R>) {
    let size = f.area();
    let block = Block::default().borders(Borders::ALL).title("KANA MATCH");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] ステータス (文字の種類)
            Constraint::Length(1), // [1] スコア
            Constraint::Length(1), // [2] メッセージ
            Constraint::Length(1), // [3] 空白
            Constraint::Min(1),    // [4] 盤面 or 種類選択
            Constraint::Length(1), // [5] 操作説明
        ])
        .split(inner_area);

    let session = app.session();
    let status = format!("{} / {}", session.script().name(), phase_label(session.phase()));
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Magenta)),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(app.screen().score_text()).style(Style::default().fg(Color::Yellow)),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(app.screen().message_text())
            .style(Style::default().fg(Color::Green).bold())
            .centered(),
        chunks[2],
    );

    if app.screen().board_visible() {
        render_board(f, app, chunks[4]);
    } else {
        render_script_picker(f, session.script(), chunks[4]);
    }

    let help = if session.phase() == Phase::Idle {
        "Tab: script  Enter/s: start  q: quit"
    } else {
        "arrows/hjkl: move  Enter/Space: pick  s: stop  q: quit"
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)).centered(),
        chunks[5],
    );
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "ready",
        Phase::Filling => "dealing",
        Phase::Playing => "playing",
        Phase::Complete => "finished",
    }
}

fn render_script_picker(f: &mut Frame, current: Script, area: Rect) {
    let mut lines = vec![Line::from("Choose a script:"), Line::from("")];
    for (i, script) in Script::ALL.iter().enumerate() {
        let label = format!("{}. {}", i + 1, script.name());
        let line = if *script == current {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(label, Style::default().fg(Color::Cyan).bold()),
            ])
        } else {
            Line::from(vec![Span::raw("  "), Span::raw(label)])
        };
        lines.push(line);
    }
    f.render_widget(Paragraph::new(lines).centered(), area);
}

fn render_board<R: Rng>(f: &mut Frame, app: &App<R>, area: Rect) {
    let rows = app.screen().rows();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            std::iter::repeat_n(Constraint::Length(SLOT_HEIGHT), rows)
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for row in 0..rows {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row_areas[row]);
        for (column, cell) in Column::ALL.into_iter().zip(cells.iter()) {
            let id = SlotId::new(row, column);
            render_slot(f, app.screen().slot(id), app.cursor() == id, *cell);
        }
    }
}

fn render_slot(f: &mut Frame, view: &SlotView, focused: bool, area: Rect) {
    let border = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    f.render_widget(
        Paragraph::new(view.text.as_str())
            .style(slot_style(view))
            .centered()
            .block(block),
        area,
    );
}

/// 表示色トークン → 実際の色
fn slot_style(view: &SlotView) -> Style {
    match view.color {
        ColorToken::Base if view.enabled => Style::default().fg(Color::White),
        ColorToken::Base => Style::default().fg(Color::DarkGray),
        ColorToken::Selected => Style::default().fg(Color::Black).bg(Color::Cyan),
        ColorToken::Correct => Style::default().fg(Color::Black).bg(Color::Green),
        ColorToken::Wrong => Style::default().fg(Color::White).bg(Color::Red),
        ColorToken::Solved => Style::default().fg(Color::DarkGray).bg(Color::Black),
    }
}
