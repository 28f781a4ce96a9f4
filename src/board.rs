use std::fmt;
use crate::movegen::{Move, MoveGenerator};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// The row on which this side's men are promoted to kings.
    pub fn promotion_row(&self) -> u8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }
}

/// Square indices run 0..64 with row = sq / 8 and col = sq % 8; row 0 is the
/// top of the drawn board. Pieces only ever occupy squares of odd parity
/// ((row + col) % 2 == 1).
#[derive(Debug, Clone)]
pub struct Board {
    pub light_men: u64,
    pub light_kings: u64,
    pub dark_men: u64,
    pub dark_kings: u64,
    pub side_to_move: Color,
    /// Square of a piece in the middle of a jump chain, if any. While set,
    /// only further jumps by that piece are legal.
    pub chain_square: Option<u8>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            dark_men: 0x0000000000AA55AA,   // Rows 0-2
            dark_kings: 0,
            light_men: 0x55AA550000000000,  // Rows 5-7
            light_kings: 0,
            side_to_move: Color::Dark,      // Dark moves first
            chain_square: None,
        }
    }

    pub fn occupied(&self) -> u64 {
        self.light_men | self.light_kings | self.dark_men | self.dark_kings
    }

    pub fn pieces_of(&self, color: Color) -> u64 {
        match color {
            Color::Light => self.light_men | self.light_kings,
            Color::Dark => self.dark_men | self.dark_kings,
        }
    }

    pub fn get_piece_at(&self, square: u8) -> Option<(Rank, Color)> {
        let mask = 1u64 << square;
        if (self.light_men & mask) != 0 {
            return Some((Rank::Man, Color::Light));
        }
        if (self.light_kings & mask) != 0 {
            return Some((Rank::King, Color::Light));
        }
        if (self.dark_men & mask) != 0 {
            return Some((Rank::Man, Color::Dark));
        }
        if (self.dark_kings & mask) != 0 {
            return Some((Rank::King, Color::Dark));
        }
        None
    }

    pub fn make_move(&mut self, mv: Move) {
        let from_mask = 1u64 << mv.from;
        let to_mask = 1u64 << mv.to;

        // Remove the piece from its source square
        match (self.side_to_move, mv.rank) {
            (Color::Light, Rank::Man) => self.light_men &= !from_mask,
            (Color::Light, Rank::King) => self.light_kings &= !from_mask,
            (Color::Dark, Rank::Man) => self.dark_men &= !from_mask,
            (Color::Dark, Rank::King) => self.dark_kings &= !from_mask,
        }

        // Remove any jumped piece
        if let Some(captured) = mv.captured {
            let captured_mask = 1u64 << captured;
            match self.side_to_move {
                Color::Light => {
                    self.dark_men &= !captured_mask;
                    self.dark_kings &= !captured_mask;
                }
                Color::Dark => {
                    self.light_men &= !captured_mask;
                    self.light_kings &= !captured_mask;
                }
            }
        }

        // A man landing on its far rank is promoted immediately, before any
        // further jump in the same chain is considered
        let landing_rank = if mv.rank == Rank::Man && mv.to / 8 == self.side_to_move.promotion_row() {
            Rank::King
        } else {
            mv.rank
        };

        // Place the piece on its landing square
        match (self.side_to_move, landing_rank) {
            (Color::Light, Rank::Man) => self.light_men |= to_mask,
            (Color::Light, Rank::King) => self.light_kings |= to_mask,
            (Color::Dark, Rank::Man) => self.dark_men |= to_mask,
            (Color::Dark, Rank::King) => self.dark_kings |= to_mask,
        }

        // After a jump, the same piece must keep jumping if it can; the turn
        // only passes once the chain is exhausted
        if mv.captured.is_some() {
            let generator = MoveGenerator::new();
            if !generator.jumps_from(self, mv.to).is_empty() {
                self.chain_square = Some(mv.to);
                return;
            }
        }

        self.chain_square = None;
        self.side_to_move = self.side_to_move.opposite();
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in 0..8u8 {
            for col in 0..8u8 {
                let square = row * 8 + col;
                let piece_char = match self.get_piece_at(square) {
                    Some((Rank::Man, Color::Light)) => 'o',
                    Some((Rank::King, Color::Light)) => 'O',
                    Some((Rank::Man, Color::Dark)) => 'x',
                    Some((Rank::King, Color::Dark)) => 'X',
                    None => '.',
                };
                result.push(piece_char);
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        write!(f, "{}", result)
    }
}
