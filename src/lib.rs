pub mod board;
pub mod movegen;
pub mod tui;

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Board, Color, Rank};
    use movegen::{GameState, Move, MoveError, MoveGenerator};

    // Bitmask of the odd-parity squares pieces are allowed to occupy
    const PLAYABLE: u64 = 0x55AA55AA55AA55AA;

    fn empty_board() -> Board {
        let mut board = Board::new();
        board.light_men = 0;
        board.light_kings = 0;
        board.dark_men = 0;
        board.dark_kings = 0;
        board
    }

    fn square(row: u8, col: u8) -> u8 {
        row * 8 + col
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        let generator = MoveGenerator::new();

        assert_eq!(board.dark_men.count_ones(), 12);
        assert_eq!(board.light_men.count_ones(), 12);
        assert_eq!(board.side_to_move, Color::Dark);

        // Dark should have 7 legal moves in the initial position
        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 7);

        // Check that all moves are valid and none is a capture
        for mv in moves {
            assert!(generator.is_move_valid(&board, &mv));
            assert!(!mv.is_jump());
        }
    }

    #[test]
    fn test_board_invariants() {
        let board = Board::new();
        let generator = MoveGenerator::new();

        for mv in generator.generate_moves(&board) {
            let mut new_board = board.clone();
            new_board.make_move(mv);

            // Pieces stay on odd-parity squares
            assert_eq!(new_board.occupied() & !PLAYABLE, 0);

            // The four bitboards stay pairwise disjoint
            let total = new_board.light_men.count_ones()
                + new_board.light_kings.count_ones()
                + new_board.dark_men.count_ones()
                + new_board.dark_kings.count_ones();
            assert_eq!(new_board.occupied().count_ones(), total);

            // The piece count never grows
            assert!(total <= board.occupied().count_ones());
        }
    }

    #[test]
    fn test_man_moves_forward_only() {
        let generator = MoveGenerator::new();

        // A dark man in the middle of the board only advances toward row 7
        let mut board = empty_board();
        board.dark_men = 1u64 << square(4, 3);
        board.side_to_move = Color::Dark;

        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            assert_eq!(mv.to / 8, 5);
        }

        // A light man on the same square only advances toward row 0
        let mut board = empty_board();
        board.light_men = 1u64 << square(4, 3);
        board.side_to_move = Color::Light;

        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 2);
        for mv in &moves {
            assert_eq!(mv.to / 8, 3);
        }
    }

    #[test]
    fn test_king_moves_both_directions() {
        let generator = MoveGenerator::new();

        let mut board = empty_board();
        board.dark_kings = 1u64 << square(4, 3);
        board.side_to_move = Color::Dark;

        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 4);

        let destinations: Vec<u8> = moves.iter().map(|mv| mv.to).collect();
        assert!(destinations.contains(&square(3, 2)));
        assert!(destinations.contains(&square(3, 4)));
        assert!(destinations.contains(&square(5, 2)));
        assert!(destinations.contains(&square(5, 4)));
    }

    #[test]
    fn test_forced_capture() {
        let generator = MoveGenerator::new();

        // Dark has one capture and a second piece with quiet moves; the
        // quiet moves must all be rejected
        let mut board = empty_board();
        board.dark_men = (1u64 << square(2, 1)) | (1u64 << square(2, 5));
        board.light_men = 1u64 << square(3, 2);
        board.side_to_move = Color::Dark;

        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_jump());
        assert_eq!(moves[0].from, square(2, 1));
        assert_eq!(moves[0].to, square(4, 3));

        assert_eq!(generator.legal_destinations(&board, square(2, 1)), vec![square(4, 3)]);
        assert!(generator.legal_destinations(&board, square(2, 5)).is_empty());

        let quiet = Move::new(square(2, 5), square(3, 4), Rank::Man);
        assert!(!generator.is_move_valid(&board, &quiet));
    }

    #[test]
    fn test_jump_chain_same_piece() {
        let generator = MoveGenerator::new();

        // Dark man on (2,1), light men on (3,2) and (5,4); capturing the
        // first lands on (4,3) and must continue from there
        let mut board = empty_board();
        board.dark_men = (1u64 << square(2, 1)) | (1u64 << square(0, 1));
        board.light_men = (1u64 << square(3, 2)) | (1u64 << square(5, 4));
        board.side_to_move = Color::Dark;

        generator.try_move(&mut board, square(2, 1), square(4, 3)).unwrap();

        // The jumped piece is gone and the turn has not passed
        assert_eq!(board.light_men & (1u64 << square(3, 2)), 0);
        assert_eq!(board.side_to_move, Color::Dark);
        assert_eq!(board.chain_square, Some(square(4, 3)));

        // Only the chained piece may move, and only by jumping again
        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from, square(4, 3));
        assert_eq!(moves[0].to, square(6, 5));
        assert!(moves[0].is_jump());

        // Finishing the chain captures light's last piece and ends the game
        generator.try_move(&mut board, square(4, 3), square(6, 5)).unwrap();
        assert_eq!(board.chain_square, None);
        assert_eq!(board.side_to_move, Color::Light);
        assert_eq!(generator.get_game_state(&board), GameState::Winner(Color::Dark));
    }

    #[test]
    fn test_promotion() {
        let mut board = empty_board();
        board.light_men = 1u64 << square(1, 2);
        board.side_to_move = Color::Light;

        board.make_move(Move::new(square(1, 2), square(0, 1), Rank::Man));

        assert_eq!(board.light_men, 0);
        assert_eq!(board.light_kings, 1u64 << square(0, 1));
    }

    #[test]
    fn test_promotion_mid_chain() {
        let generator = MoveGenerator::new();

        // A dark man jumps onto row 7, is promoted on landing, and as a new
        // king can keep jumping backward in the same chain
        let mut board = empty_board();
        board.dark_men = 1u64 << square(5, 2);
        board.light_men = (1u64 << square(6, 3)) | (1u64 << square(6, 5));
        board.side_to_move = Color::Dark;

        generator.try_move(&mut board, square(5, 2), square(7, 4)).unwrap();

        assert_eq!(board.dark_men, 0);
        assert_eq!(board.dark_kings, 1u64 << square(7, 4));
        assert_eq!(board.chain_square, Some(square(7, 4)));
        assert_eq!(board.side_to_move, Color::Dark);

        // The continuation only exists because the landing promoted the man
        let moves = generator.generate_moves(&board);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, square(5, 6));
        assert_eq!(moves[0].captured, Some(square(6, 5)));
    }

    #[test]
    fn test_no_moves_loses() {
        let generator = MoveGenerator::new();

        // Dark's only man is wedged against the edge behind a light king
        let mut board = empty_board();
        board.dark_men = 1u64 << square(6, 7);
        board.light_kings = 1u64 << square(7, 6);
        board.side_to_move = Color::Dark;

        assert!(generator.generate_moves(&board).is_empty());
        assert_eq!(generator.get_game_state(&board), GameState::Winner(Color::Light));
    }

    #[test]
    fn test_no_pieces_loses() {
        let generator = MoveGenerator::new();

        let mut board = empty_board();
        board.light_men = 1u64 << square(5, 0);
        board.side_to_move = Color::Dark;

        assert_eq!(generator.get_game_state(&board), GameState::Winner(Color::Light));
    }

    #[test]
    fn test_move_errors() {
        let generator = MoveGenerator::new();
        let mut board = Board::new();

        assert_eq!(
            generator.try_move(&mut board, square(3, 4), square(4, 5)),
            Err(MoveError::NoPiece(square(3, 4)))
        );
        assert_eq!(
            generator.try_move(&mut board, square(5, 0), square(4, 1)),
            Err(MoveError::WrongSide)
        );
        assert_eq!(
            generator.try_move(&mut board, square(2, 1), square(1, 2)),
            Err(MoveError::IllegalMove)
        );

        // A rejected move leaves the board untouched
        assert_eq!(board.dark_men, Board::new().dark_men);
        assert_eq!(board.side_to_move, Color::Dark);
    }

    #[test]
    fn test_perft_opening() {
        let board = Board::new();
        let generator = MoveGenerator::new();

        assert_eq!(perft(&board, &generator, 1), 7);
        assert_eq!(perft(&board, &generator, 2), 49);
    }

    // Helper function to perform perft; each jump-chain segment counts as
    // one move
    fn perft(board: &Board, generator: &MoveGenerator, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = generator.generate_moves(board);
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let mut new_board = board.clone();
            new_board.make_move(mv);
            nodes += perft(&new_board, generator, depth - 1);
        }

        nodes
    }
}
