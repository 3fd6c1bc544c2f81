//! Board scenarios through the public API

use gridsweep::{Board, CellUpdate, Click, Error, Pos, Status, VisualState};

fn p(row: usize, col: usize) -> Pos {
    Pos::new(row, col)
}

fn known(board: &Board, pos: Pos) -> bool {
    board.cell(pos).unwrap().known
}

#[test]
fn test_fresh_board_cells_are_default() {
    let board = Board::new(10, 10, 10).unwrap();
    for pos in board.grid().all_positions() {
        let cell = board.cell(pos).unwrap();
        assert!(!cell.known && !cell.flagged && !cell.mine);
        assert_eq!(cell.adjacent_mines, 0);
        assert_eq!(board.visual_state(pos).unwrap(), VisualState::Unknown);
    }
}

#[test]
fn test_first_reveal_never_hits_a_mine() {
    for seed in 0..200u64 {
        let click = p((seed % 10) as usize, (seed * 7 % 10) as usize);
        let mut board = Board::with_seed(10, 10, 10, seed).unwrap();
        board.reveal(click).unwrap();

        assert!(!board.is_mine(click), "seed {} mined the first click", seed);
        assert!(known(&board, click));
        assert_eq!(board.mine_locations().len(), 10);
        let flagged_as_mine = board.grid().iter().filter(|c| c.mine).count();
        assert_eq!(flagged_as_mine, 10);
    }
}

#[test]
fn test_adjacent_counts_after_placement() {
    let mut board = Board::with_seed(10, 10, 10, 42).unwrap();
    board.reveal(p(5, 5)).unwrap();
    for pos in board.grid().all_positions() {
        let mined = board
            .grid()
            .neighbours(pos)
            .iter()
            .filter(|&&n| board.is_mine(n))
            .count();
        assert_eq!(board.cell(pos).unwrap().adjacent_mines as usize, mined);
    }
}

#[test]
fn test_flood_fill_stops_at_numbered_border() {
    // A wall of mines down column 2 splits the board
    let wall: Vec<Pos> = (0..5).map(|r| p(r, 2)).collect();
    let mut board = Board::with_mines(5, 5, wall.clone()).unwrap();

    let updates = board.reveal(p(0, 0)).unwrap();
    assert_eq!(updates.len(), 10);
    assert_eq!(board.revealed_count(), 10);
    for r in 0..5 {
        assert_eq!(board.visual_state(p(r, 0)).unwrap(), VisualState::Blank);
        assert!(matches!(
            board.visual_state(p(r, 1)).unwrap(),
            VisualState::Number(2) | VisualState::Number(3)
        ));
        // Mines and the far side stay hidden
        assert!(!known(&board, p(r, 2)));
        assert!(!known(&board, p(r, 3)));
        assert!(!known(&board, p(r, 4)));
    }
    assert_eq!(board.status(), Status::Active);
}

#[test]
fn test_single_mine_corner_scenario() {
    // 3x3, one mine at (2,2), first click at (0,0). Only the three cells
    // touching the mine carry a number; everything else is zero, so the
    // fill opens every safe cell and the game is won.
    let mut board = Board::with_mines(3, 3, [p(2, 2)]).unwrap();
    board.reveal(p(0, 0)).unwrap();

    assert_eq!(board.cell(p(0, 0)).unwrap().adjacent_mines, 0);
    for pos in [p(1, 1), p(1, 2), p(2, 1)] {
        assert_eq!(board.visual_state(pos).unwrap(), VisualState::Number(1));
    }
    for pos in [p(0, 1), p(1, 0), p(0, 2), p(2, 0)] {
        assert_eq!(board.visual_state(pos).unwrap(), VisualState::Blank);
    }
    assert!(!known(&board, p(2, 2)));
    assert_eq!(board.status(), Status::Won);
}

#[test]
fn test_flood_fill_from_numbered_cell_does_not_spread() {
    let mut board = Board::with_mines(3, 3, [p(2, 2)]).unwrap();
    let updates = board.reveal(p(1, 1)).unwrap();
    assert_eq!(
        updates,
        vec![CellUpdate {
            pos: p(1, 1),
            state: VisualState::Number(1)
        }]
    );
    assert_eq!(board.revealed_count(), 1);
}

#[test]
fn test_flag_toggling_on_known_cell_is_noop() {
    let mut board = Board::with_mines(4, 4, [p(3, 3), p(0, 3)]).unwrap();
    board.reveal(p(1, 2)).unwrap();
    let before = board.flag_locations().clone();
    assert!(board.toggle_flag(p(1, 2)).unwrap().is_empty());
    assert!(!board.cell(p(1, 2)).unwrap().flagged);
    assert_eq!(board.flag_locations(), &before);
}

// Two mines in the corners of the top row; (1,1) sees both
fn chord_board() -> Board {
    let mut board = Board::with_mines(3, 3, [p(0, 0), p(0, 2)]).unwrap();
    board.reveal(p(1, 1)).unwrap();
    assert_eq!(board.visual_state(p(1, 1)).unwrap(), VisualState::Number(2));
    board
}

#[test]
fn test_chord_needs_enough_flags() {
    let mut board = chord_board();
    board.toggle_flag(p(0, 0)).unwrap();

    // Only one flag around a 2: nothing happens
    assert!(board.reveal(p(1, 1)).unwrap().is_empty());
    assert_eq!(board.revealed_count(), 1);

    // Both flags placed: the remaining neighbours open
    board.toggle_flag(p(0, 2)).unwrap();
    board.reveal(p(1, 1)).unwrap();
    for pos in [p(0, 1), p(1, 0), p(1, 2), p(2, 0), p(2, 1), p(2, 2)] {
        assert!(known(&board, pos), "{:?} should be revealed", pos);
    }
    assert!(!known(&board, p(0, 0)));
    assert_eq!(board.status(), Status::Won);
}

#[test]
fn test_chord_trusts_flag_count_not_placement() {
    let mut board = chord_board();
    // One right flag, one wrong flag
    board.toggle_flag(p(0, 0)).unwrap();
    board.toggle_flag(p(2, 1)).unwrap();

    let updates = board.reveal(p(1, 1)).unwrap();
    assert_eq!(board.status(), Status::Lost);
    assert_eq!(board.fatal(), Some(p(0, 2)));
    assert_eq!(
        updates.last(),
        Some(&CellUpdate {
            pos: p(0, 2),
            state: VisualState::MineRed
        })
    );
    assert_eq!(board.visual_state(p(0, 0)).unwrap(), VisualState::Flag);
    assert_eq!(board.visual_state(p(2, 1)).unwrap(), VisualState::MineWrong);
}

#[test]
fn test_loss_reveals_mines_and_marks_wrong_flags() {
    let mut board = Board::with_mines(4, 4, [p(0, 0), p(1, 3), p(3, 3)]).unwrap();
    board.toggle_flag(p(3, 3)).unwrap(); // correct
    board.toggle_flag(p(2, 0)).unwrap(); // wrong

    board.reveal(p(0, 0)).unwrap();
    assert_eq!(board.status(), Status::Lost);

    assert_eq!(board.visual_state(p(0, 0)).unwrap(), VisualState::MineRed);
    assert_eq!(board.visual_state(p(1, 3)).unwrap(), VisualState::Mine);
    assert!(known(&board, p(1, 3)));
    assert_eq!(board.visual_state(p(3, 3)).unwrap(), VisualState::Flag);
    assert_eq!(board.visual_state(p(2, 0)).unwrap(), VisualState::MineWrong);

    let fatal_cells = board
        .grid()
        .all_positions()
        .into_iter()
        .filter(|&pos| board.visual_state(pos).unwrap() == VisualState::MineRed)
        .count();
    assert_eq!(fatal_cells, 1);
}

#[test]
fn test_finished_board_ignores_input() {
    let mut board = Board::with_mines(3, 3, [p(1, 1)]).unwrap();
    board.reveal(p(1, 1)).unwrap();
    assert_eq!(board.status(), Status::Lost);

    assert!(board.reveal(p(0, 0)).unwrap().is_empty());
    assert!(board.toggle_flag(p(0, 0)).unwrap().is_empty());
    assert!(!known(&board, p(0, 0)));
    // Bounds are still checked
    assert!(board.reveal(p(3, 0)).is_err());
}

#[test]
fn test_win_flags_remaining_mines() {
    let mut board = Board::with_mines(2, 2, [p(0, 0)]).unwrap();
    board.reveal(p(1, 1)).unwrap();
    board.reveal(p(0, 1)).unwrap();
    assert_eq!(board.status(), Status::Active);

    let updates = board.on_click(Click::Primary, p(1, 0)).unwrap();
    assert_eq!(board.status(), Status::Won);
    assert!(updates.contains(&CellUpdate {
        pos: p(0, 0),
        state: VisualState::Flag
    }));
    assert!(board.is_flag(p(0, 0)));
    assert_eq!(board.remaining_mines(), 0);
}

#[test]
fn test_remaining_mines_goes_negative() {
    let mut board = Board::new(3, 3, 1).unwrap();
    board.toggle_flag(p(0, 0)).unwrap();
    board.toggle_flag(p(0, 1)).unwrap();
    assert_eq!(board.remaining_mines(), -1);
}

#[test]
fn test_invalid_configuration() {
    assert_eq!(
        Board::new(10, 10, 100).err(),
        Some(Error::InvalidMineCount { mines: 100, max: 99 })
    );
    assert!(Board::new(10, 10, 99).is_ok());

    let mut board = Board::new(10, 10, 10).unwrap();
    assert_eq!(
        board.reveal(p(0, 10)).err(),
        Some(Error::OutOfBounds {
            pos: p(0, 10),
            rows: 10,
            cols: 10
        })
    );
}

#[test]
fn test_full_game_with_seed() {
    // Reveal every safe cell of a seeded board, one click at a time
    let mut board = Board::with_seed(8, 8, 10, 2024).unwrap();
    board.reveal(p(4, 4)).unwrap();
    for pos in board.grid().all_positions() {
        if board.status() != Status::Active {
            break;
        }
        if !board.is_mine(pos) && !known(&board, pos) {
            board.reveal(pos).unwrap();
        }
    }
    assert_eq!(board.status(), Status::Won);
    assert_eq!(board.revealed_count(), 64 - 10);
    assert_eq!(board.flag_locations(), board.mine_locations());
}
