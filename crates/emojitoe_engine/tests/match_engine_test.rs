//! Integration tests for the match state machine.

use emojitoe_engine::invariants::{EngineInvariants, InvariantSet};
use emojitoe_engine::{
    Board, Cell, MatchEngine, MatchEvent, MatchOutcome, MatchPhase, Side, WinLine, drain_events,
};

fn collect_game_over(events: &[MatchEvent]) -> Vec<MatchOutcome> {
    events
        .iter()
        .filter_map(|e| match e {
            MatchEvent::GameOver(outcome) => Some(*outcome),
            _ => None,
        })
        .collect()
}

#[test]
fn test_player_wins_top_row() {
    let mut engine = MatchEngine::new();
    let (_, mut rx) = engine.subscribe_channel();
    engine.start(Side::Player);

    for (index, side) in [
        (0, Side::Player),
        (3, Side::Opponent),
        (1, Side::Player),
        (4, Side::Opponent),
        (2, Side::Player),
    ] {
        assert!(engine.process_move(index, side).is_accepted());
    }

    let events = drain_events(&mut rx);
    let over = collect_game_over(&events);
    assert_eq!(over.len(), 1);
    let outcome = over[0];
    assert_eq!(outcome.winner(), Some(Side::Player));
    assert_eq!(outcome.line(), Some(WinLine::Row0));
    assert_eq!(
        outcome.board().cells(),
        &[
            Cell::Player,
            Cell::Player,
            Cell::Player,
            Cell::Opponent,
            Cell::Opponent,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]
    );
}

#[test]
fn test_full_board_draw() {
    // X O X / X O O / O X X
    let mut engine = MatchEngine::new();
    let (_, mut rx) = engine.subscribe_channel();
    engine.start(Side::Player);

    for (index, side) in [
        (0, Side::Player),
        (1, Side::Opponent),
        (2, Side::Player),
        (4, Side::Opponent),
        (3, Side::Player),
        (5, Side::Opponent),
        (7, Side::Player),
        (6, Side::Opponent),
        (8, Side::Player),
    ] {
        assert!(engine.process_move(index, side).is_accepted(), "move {index}");
    }

    let over = collect_game_over(&drain_events(&mut rx));
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].winner(), None);
    assert_eq!(over[0].line(), None);
    assert!(over[0].is_draw());
    assert_eq!(engine.phase(), MatchPhase::GameOver);
}

#[test]
fn test_every_accepted_move_is_followed_by_one_transition() {
    let mut engine = MatchEngine::new();
    let (_, mut rx) = engine.subscribe_channel();
    engine.start(Side::Opponent);
    let _ = rx.try_recv();

    for (index, side) in [(4, Side::Opponent), (0, Side::Player), (8, Side::Opponent)] {
        engine.process_move(index, side);
        let events = drain_events(&mut rx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], MatchEvent::MoveApplied { index, side });
        assert!(matches!(events[1], MatchEvent::TurnChanged { active } if active == side.other()));
    }
}

#[test]
fn test_unsubscribed_listener_hears_nothing() {
    let mut engine = MatchEngine::new();
    let (id, mut rx) = engine.subscribe_channel();
    assert!(engine.unsubscribe(id));
    engine.start(Side::Player);
    engine.process_move(4, Side::Player);
    assert!(rx.try_recv().is_err());
    assert_eq!(engine.listener_count(), 0);
}

/// Outcome computed without the engine's rules module.
fn brute_force(board: &[Cell; 9]) -> Option<Option<Side>> {
    let mut winner = None;
    for a in 0..9 {
        for b in (a + 1)..9 {
            for c in (b + 1)..9 {
                let (ra, rb, rc) = (a / 3, b / 3, c / 3);
                let (ca, cb, cc) = (a % 3, b % 3, c % 3);
                let row = ra == rb && rb == rc;
                let col = ca == cb && cb == cc;
                let diag = [a, b, c] == [0, 4, 8];
                let anti = [a, b, c] == [2, 4, 6];
                if !(row || col || diag || anti) {
                    continue;
                }
                if board[a] != Cell::Empty && board[a] == board[b] && board[b] == board[c] {
                    winner = board[a].side();
                }
            }
        }
    }
    if winner.is_some() {
        return Some(winner);
    }
    if board.iter().all(|c| *c != Cell::Empty) {
        return Some(None);
    }
    None
}

fn explore(moves: &mut Vec<usize>, cells: &mut [Cell; 9], to_move: Side, checked: &mut usize) {
    if let Some(expected) = brute_force(cells) {
        let engine = MatchEngine::replay(Side::Player, moves);
        let outcome = engine.outcome().expect("terminal board must finish the match");
        assert_eq!(outcome.winner(), expected, "sequence {moves:?}");
        assert_eq!(outcome.board().cells(), cells);
        assert!(EngineInvariants::check_all(&engine).is_ok());
        *checked += 1;
        return;
    }

    for index in 0..9 {
        if cells[index] != Cell::Empty {
            continue;
        }
        cells[index] = to_move.into();
        moves.push(index);
        explore(moves, cells, to_move.other(), checked);
        moves.pop();
        cells[index] = Cell::Empty;
    }
}

#[test]
fn test_engine_matches_brute_force_on_every_game() {
    let mut checked = 0;
    explore(&mut Vec::new(), &mut [Cell::Empty; 9], Side::Player, &mut checked);
    // Number of distinct complete tic-tac-toe games.
    assert_eq!(checked, 255_168);
}

#[test]
fn test_snapshot_is_detached() {
    let mut engine = MatchEngine::new();
    engine.start(Side::Player);
    let snapshot = engine.board().snapshot();
    engine.process_move(0, Side::Player);
    assert_eq!(snapshot, Board::new());
    assert_ne!(engine.board(), &snapshot);
}
