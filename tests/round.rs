// シード固定の乱数で、公開APIからラウンド全体を動かす結合テスト

use std::collections::HashSet;
use std::time::Instant;

use kanamatch::{
    BoardSession, ColorToken, Column, Phase, ScreenModel, Script, SessionPolicy, SlotId,
    TapOutcome, Verdict,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn new_session(
    policy: SessionPolicy,
    script: Script,
    seed: u64,
) -> (BoardSession<StdRng>, ScreenModel) {
    (
        BoardSession::new(policy, script, StdRng::seed_from_u64(seed)),
        ScreenModel::new(policy.rows),
    )
}

fn board_pairs(session: &BoardSession<StdRng>) -> Vec<(String, String)> {
    let board = session.board();
    (0..board.rows())
        .map(|row| {
            (
                board.slot(SlotId::prompt(row)).text.clone(),
                board.slot(SlotId::answer(row)).text.clone(),
            )
        })
        .collect()
}

/// 有効な左列の行と、その正解が入っている右列の行を探す
fn find_match(session: &BoardSession<StdRng>) -> Option<(usize, usize)> {
    let board = session.board();
    (0..board.rows()).find_map(|row| {
        let prompt = board.slot(SlotId::prompt(row));
        if !prompt.enabled {
            return None;
        }
        let glyph = session.catalog().lookup(&prompt.text)?;
        (0..board.rows())
            .find(|&r| board.slot(SlotId::answer(r)).text == glyph)
            .map(|answer| (row, answer))
    })
}

fn solve_pair(
    session: &mut BoardSession<StdRng>,
    screen: &mut ScreenModel,
    prompt: usize,
    answer: usize,
) {
    let now = Instant::now();
    session.tap(SlotId::prompt(prompt), now, screen);
    let outcome = session.tap(SlotId::answer(answer), now, screen);
    assert_eq!(outcome, TapOutcome::Checking(Verdict::Match));
    assert!(session.poll_flash(now + session.policy().flash, screen));
}

#[test]
fn start_deals_distinct_catalog_pairs() {
    for seed in 0..20 {
        let (mut session, mut screen) =
            new_session(SessionPolicy::default(), Script::Hiragana, seed);
        session.start(&mut screen);
        assert_eq!(session.pool().len(), session.catalog().len() - 5);

        let prompts: HashSet<_> =
            session.board().column_texts(Column::Prompt).into_iter().collect();
        let answers: HashSet<_> =
            session.board().column_texts(Column::Answer).into_iter().collect();
        assert_eq!(prompts.len(), 5);
        assert_eq!(answers.len(), 5);

        // 左列の各ローマ字の正解が右列にあり、どちらもプールには残っていない
        for prompt in &prompts {
            let pair = session
                .catalog()
                .pairs()
                .iter()
                .find(|p| p.key == prompt)
                .expect("prompt comes from the catalog");
            assert!(answers.contains(pair.value));
            assert!(!session.pool().contains(pair));
        }
    }
}

#[test]
fn shuffle_breaks_the_row_correlation() {
    let broken = (0..50).any(|seed| {
        let (mut session, mut screen) =
            new_session(SessionPolicy::default(), Script::Hiragana, seed);
        session.start(&mut screen);
        board_pairs(&session)
            .iter()
            .any(|(key, glyph)| session.catalog().lookup(key) != Some(glyph.as_str()))
    });
    assert!(broken);
}

#[test]
fn ka_only_matches_its_hiragana() {
    let catalog = Script::Hiragana.catalog();
    let matching: Vec<_> = catalog
        .pairs()
        .iter()
        .filter(|p| catalog.lookup("ka") == Some(p.value))
        .map(|p| p.value)
        .collect();
    assert_eq!(matching, vec!["か"]);
    assert_ne!(catalog.lookup("ka"), Some("カ"));
}

#[test]
fn full_round_places_each_pair_once_and_completes() {
    let (mut session, mut screen) = new_session(SessionPolicy::default(), Script::Katakana, 99);
    session.start(&mut screen);

    let mut placed: HashSet<(String, String)> = board_pairs(&session).into_iter().collect();
    let mut pool_len = session.pool().len();
    let mut last_correct = 0;

    while let Some((prompt, answer)) = find_match(&session) {
        let had_pool = !session.pool().is_empty();
        solve_pair(&mut session, &mut screen, prompt, answer);

        let score = session.score();
        assert_eq!(score.correct, last_correct + 1);
        assert_eq!(score.wrong, 0);
        last_correct = score.correct;

        if had_pool {
            pool_len -= 1;
            let new_pair = (
                session.board().slot(SlotId::prompt(prompt)).text.clone(),
                session.board().slot(SlotId::answer(answer)).text.clone(),
            );
            assert!(placed.insert(new_pair), "pair placed twice");
        } else {
            assert!(session.board().slot(SlotId::prompt(prompt)).text.is_empty());
            assert!(!session.board().slot(SlotId::answer(answer)).enabled);
            assert_eq!(screen.slot(SlotId::prompt(prompt)).color, ColorToken::Solved);
        }
        assert_eq!(session.pool().len(), pool_len);
    }

    assert_eq!(placed.len(), session.catalog().len());
    assert!(session.pool().is_empty());
    assert!(session.is_complete());
    assert_eq!(session.phase(), Phase::Complete);
    assert_eq!(screen.message_text(), "Round complete!");
    assert_eq!(session.score().correct, 67);

    // 完了後のタップは無視される
    let before = session.score();
    for id in session.board().slot_ids().collect::<Vec<_>>() {
        assert_eq!(session.tap(id, Instant::now(), &mut screen), TapOutcome::Ignored);
    }
    assert_eq!(session.score(), before);

    session.stop(&mut screen);
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.board().slot_ids().all(|id| session.board().slot(id).enabled));
}

#[test]
fn scores_never_decrease_and_reset_on_start() {
    let (mut session, mut screen) = new_session(SessionPolicy::default(), Script::Hiragana, 5);
    session.start(&mut screen);
    let mut last = session.score();
    for step in 0..30 {
        let now = Instant::now();
        if step % 3 == 0 {
            if let Some((prompt, answer)) = find_match(&session) {
                solve_pair(&mut session, &mut screen, prompt, answer);
            }
        } else {
            // 解ける左列のマスにわざと違うかなを合わせる
            let (prompt, right) = find_match(&session).expect("board still has pairs");
            let wrong = (0..5).find(|&r| r != right).unwrap();
            session.tap(SlotId::prompt(prompt), now, &mut screen);
            session.tap(SlotId::answer(wrong), now, &mut screen);
            session.finish_check(&mut screen);
        }
        let score = session.score();
        assert!(score.correct >= last.correct);
        assert!(score.wrong >= last.wrong);
        last = score;
    }
    assert!(last.wrong > 0 && last.correct > 0);
    session.start(&mut screen);
    assert_eq!(session.score().correct, 0);
    assert_eq!(session.score().wrong, 0);
}

#[test]
fn one_column_selection_never_checks() {
    let (mut session, mut screen) = new_session(SessionPolicy::default(), Script::Hiragana, 13);
    session.start(&mut screen);
    let now = Instant::now();
    for row in 0..5 {
        let outcome = session.tap(SlotId::prompt(row), now, &mut screen);
        assert_eq!(outcome, TapOutcome::Selected);
        assert!(!session.is_checking());
    }
    assert_eq!(session.selection(), (Some(SlotId::prompt(4)), None));
    assert_eq!(session.score().correct + session.score().wrong, 0);
}

#[test]
fn reshuffle_policy_keeps_pairs_but_moves_rows() {
    let policy = SessionPolicy {
        reshuffle_on_match: true,
        ..SessionPolicy::default()
    };
    let mut moved = false;
    for seed in 0..20 {
        let (mut session, mut screen) = new_session(policy, Script::Hiragana, seed);
        session.start(&mut screen);
        let (prompt, answer) = find_match(&session).unwrap();
        let prompts_before = session.board().column_texts(Column::Prompt);
        solve_pair(&mut session, &mut screen, prompt, answer);

        // 並べ替え後も5組とも解ける
        let prompts: HashSet<_> =
            session.board().column_texts(Column::Prompt).into_iter().collect();
        assert_eq!(prompts.len(), 5);
        for key in &prompts {
            let glyph = session.catalog().lookup(key).unwrap();
            assert!(session.board().column_texts(Column::Answer).iter().any(|a| a == glyph));
        }
        // 画面にも並べ替え結果が反映されている
        for id in session.board().slot_ids() {
            assert_eq!(screen.slot(id).text, session.board().slot(id).text);
        }

        let prompts_after = session.board().column_texts(Column::Prompt);
        moved |= prompts_before
            .iter()
            .zip(&prompts_after)
            .enumerate()
            .any(|(row, (before, after))| row != prompt && before != after);
    }
    assert!(moved);
}

#[test]
fn stop_while_idle_leaves_an_empty_pool() {
    let (mut session, mut screen) = new_session(SessionPolicy::default(), Script::Katakana, 0);
    session.stop(&mut screen);
    assert!(session.pool().is_empty());
    assert_eq!(session.phase(), Phase::Idle);
    for id in session.board().slot_ids() {
        assert!(session.board().slot(id).enabled);
        assert!(screen.slot(id).enabled);
    }
    assert!(!screen.board_visible());
}

#[test]
fn solved_slot_ignores_taps_while_the_round_continues() {
    let policy = SessionPolicy {
        rows: 2,
        ..SessionPolicy::default()
    };
    let (mut session, mut screen) = new_session(policy, Script::Hiragana, 17);
    session.start(&mut screen);

    // プールを使い切り、最後の1組を解く
    while !session.pool().is_empty() {
        let (prompt, answer) = find_match(&session).expect("board still has pairs");
        solve_pair(&mut session, &mut screen, prompt, answer);
    }
    let (prompt, answer) = find_match(&session).expect("board still has pairs");
    solve_pair(&mut session, &mut screen, prompt, answer);

    // もう1組残っているのでラウンドは続いている
    assert_eq!(session.phase(), Phase::Playing);
    assert!(!session.board().slot(SlotId::prompt(prompt)).enabled);
    assert!(!session.board().slot(SlotId::answer(answer)).enabled);

    let before = session.score();
    let now = Instant::now();
    for id in [SlotId::prompt(prompt), SlotId::answer(answer)] {
        assert_eq!(session.tap(id, now, &mut screen), TapOutcome::Ignored);
        assert_eq!(session.selection(), (None, None));
        assert!(!session.is_checking());
    }
    assert_eq!(session.score(), before);

    // 残りの1組を解けば完了
    let (prompt, answer) = find_match(&session).expect("one pair left");
    solve_pair(&mut session, &mut screen, prompt, answer);
    assert!(session.is_complete());
}
