use crate::board::{Board, Color, Rank};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub rank: Rank,
    /// Square of the piece removed by this move, if it is a jump.
    pub captured: Option<u8>,
}

impl Move {
    pub fn new(from: u8, to: u8, rank: Rank) -> Self {
        Self {
            from,
            to,
            rank,
            captured: None,
        }
    }

    pub fn new_jump(from: u8, to: u8, rank: Rank, captured: u8) -> Self {
        Self {
            from,
            to,
            rank,
            captured: Some(captured),
        }
    }

    pub fn is_jump(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameState {
    InProgress,
    Winner(Color),
}

#[derive(Debug, Error, PartialEq)]
pub enum MoveError {
    #[error("no piece on square {0}")]
    NoPiece(u8),
    #[error("piece belongs to the opponent")]
    WrongSide,
    #[error("move is not legal in this position")]
    IllegalMove,
}

pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    /// The diagonal step directions available to a piece. Men only move
    /// toward their promotion row; kings move along all four diagonals.
    fn directions(color: Color, rank: Rank) -> &'static [(i8, i8)] {
        match (rank, color) {
            (Rank::King, _) => &[(-1, -1), (-1, 1), (1, -1), (1, 1)],
            (Rank::Man, Color::Dark) => &[(1, -1), (1, 1)],
            (Rank::Man, Color::Light) => &[(-1, -1), (-1, 1)],
        }
    }

    /// Non-capturing single-step moves for the piece on `from`.
    pub fn steps_from(&self, board: &Board, from: u8) -> Vec<Move> {
        let mut moves = Vec::new();
        let (rank, color) = match board.get_piece_at(from) {
            Some(piece) => piece,
            None => return moves,
        };
        let row = (from / 8) as i8;
        let col = (from % 8) as i8;
        let occupied = board.occupied();

        for &(dr, dc) in Self::directions(color, rank) {
            let target_row = row + dr;
            let target_col = col + dc;
            if target_row < 0 || target_row >= 8 || target_col < 0 || target_col >= 8 {
                continue;
            }
            let target = (target_row * 8 + target_col) as u8;
            if (occupied & (1u64 << target)) == 0 {
                moves.push(Move::new(from, target, rank));
            }
        }
        moves
    }

    /// Jumps available to the piece on `from`: an adjacent enemy piece with
    /// an empty landing square directly beyond it.
    pub fn jumps_from(&self, board: &Board, from: u8) -> Vec<Move> {
        let mut moves = Vec::new();
        let (rank, color) = match board.get_piece_at(from) {
            Some(piece) => piece,
            None => return moves,
        };
        let row = (from / 8) as i8;
        let col = (from % 8) as i8;
        let occupied = board.occupied();
        let enemy = board.pieces_of(color.opposite());

        for &(dr, dc) in Self::directions(color, rank) {
            let landing_row = row + 2 * dr;
            let landing_col = col + 2 * dc;
            if landing_row < 0 || landing_row >= 8 || landing_col < 0 || landing_col >= 8 {
                continue;
            }
            let over = ((row + dr) * 8 + col + dc) as u8;
            let landing = (landing_row * 8 + landing_col) as u8;
            if (enemy & (1u64 << over)) != 0 && (occupied & (1u64 << landing)) == 0 {
                moves.push(Move::new_jump(from, landing, rank, over));
            }
        }
        moves
    }

    /// All legal moves for the side to move. A piece mid jump chain must
    /// keep jumping, and any available capture makes non-captures illegal
    /// for the whole side.
    pub fn generate_moves(&self, board: &Board) -> Vec<Move> {
        if let Some(square) = board.chain_square {
            return self.jumps_from(board, square);
        }

        let own = board.pieces_of(board.side_to_move);
        let mut jumps = Vec::new();
        let mut steps = Vec::new();
        for square in 0..64u8 {
            if (own & (1u64 << square)) == 0 {
                continue;
            }
            jumps.extend(self.jumps_from(board, square));
            if jumps.is_empty() {
                steps.extend(self.steps_from(board, square));
            }
        }

        if jumps.is_empty() {
            steps
        } else {
            jumps
        }
    }

    /// The squares the piece on `from` may move to this turn.
    pub fn legal_destinations(&self, board: &Board, from: u8) -> Vec<u8> {
        self.generate_moves(board)
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }

    pub fn is_move_valid(&self, board: &Board, mv: &Move) -> bool {
        self.generate_moves(board).contains(mv)
    }

    /// Validate and apply a move given as a source/destination pair.
    pub fn try_move(&self, board: &mut Board, from: u8, to: u8) -> Result<(), MoveError> {
        let (_, color) = board.get_piece_at(from).ok_or(MoveError::NoPiece(from))?;
        if color != board.side_to_move {
            return Err(MoveError::WrongSide);
        }
        let mv = self
            .generate_moves(board)
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .ok_or(MoveError::IllegalMove)?;
        board.make_move(mv);
        Ok(())
    }

    /// A side with no legal moves on its turn (including no pieces at all)
    /// loses; there is no stalemate in checkers.
    pub fn get_game_state(&self, board: &Board) -> GameState {
        if self.generate_moves(board).is_empty() {
            GameState::Winner(board.side_to_move.opposite())
        } else {
            GameState::InProgress
        }
    }
}
