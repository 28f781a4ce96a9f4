use crate::board::{Board, Color, Rank};
use crate::movegen::{GameState, Move, MoveGenerator};
use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Write};

// Screen layout: title on row 0, bordered board below it, key help under
// the board. Cells are three columns wide so the piece glyphs read well.
const TITLE_ROW: u16 = 0;
const BORDER_TOP: u16 = 1;
const BOARD_TOP: u16 = 2;
const BOARD_LEFT: u16 = 2;
const CELL_WIDTH: u16 = 3;
const BORDER_WIDTH: u16 = 28;
const HELP_ROW: u16 = 12;

const DIMMED: TermColor = TermColor::DarkGrey;

/// The input-driven state machine: no selection, piece selected,
/// and the terminal states around them.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Screen {
    MainMenu,
    SelectPiece,
    MovePiece,
    GameOver,
}

pub struct Tui {
    board: Board,
    move_generator: MoveGenerator,
    screen: Screen,
    cursor: (u8, u8), // (row, col)
    action_idx: usize,
    winner: Option<Color>,
}

impl Tui {
    pub fn new() -> Self {
        Tui {
            board: Board::new(),
            move_generator: MoveGenerator::new(),
            screen: Screen::MainMenu,
            cursor: (0, 0),
            action_idx: 0,
            winner: None,
        }
    }

    /// Enter raw mode and the alternate screen, run the game loop, and
    /// restore the terminal on the way out (including the error path).
    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let result = self.event_loop(&mut stdout);

        execute!(stdout, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        result
    }

    fn event_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        execute!(stdout, Clear(ClearType::All))?;
        self.draw_border(stdout)?;

        loop {
            self.draw(stdout)?;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('q') {
                        break;
                    }
                    self.handle_key(key.code);
                }
                Event::Resize(_, _) => {
                    execute!(stdout, Clear(ClearType::All))?;
                    self.draw_border(stdout)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.screen {
            // Any key dismisses the menu and starts the game
            Screen::MainMenu => self.screen = Screen::SelectPiece,
            Screen::SelectPiece => self.handle_select_key(code),
            Screen::MovePiece => self.handle_move_key(code),
            Screen::GameOver => {}
        }
    }

    fn handle_select_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Char('z') => {
                // Only pieces the engine lets the current side move may be
                // picked up; anything else is silently rejected
                let square = self.cursor_square();
                let movable = self
                    .move_generator
                    .generate_moves(&self.board)
                    .iter()
                    .any(|mv| mv.from == square);
                if movable {
                    self.screen = Screen::MovePiece;
                    self.action_idx = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_move_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('x') => self.screen = Screen::SelectPiece,
            KeyCode::Left | KeyCode::Right => {
                let actions = self.selected_actions();
                if !actions.is_empty() {
                    let delta = if code == KeyCode::Right {
                        1
                    } else {
                        actions.len() - 1
                    };
                    self.action_idx = (self.action_idx + delta) % actions.len();
                }
            }
            KeyCode::Char('z') => {
                let actions = self.selected_actions();
                if let Some(&mv) = actions.get(self.action_idx) {
                    self.apply_move(mv);
                }
            }
            _ => {}
        }
    }

    fn apply_move(&mut self, mv: Move) {
        self.board.make_move(mv);
        self.action_idx = 0;

        match self.move_generator.get_game_state(&self.board) {
            GameState::Winner(color) => {
                self.winner = Some(color);
                self.screen = Screen::GameOver;
            }
            GameState::InProgress => {
                // Snap the cursor to the moved piece; during a jump chain
                // the player picks its next jump from here
                self.cursor = (mv.to / 8, mv.to % 8);
                self.screen = Screen::SelectPiece;
            }
        }
    }

    fn move_cursor(&mut self, dr: i8, dc: i8) {
        self.cursor.0 = (self.cursor.0 as i8 + dr).rem_euclid(8) as u8;
        self.cursor.1 = (self.cursor.1 as i8 + dc).rem_euclid(8) as u8;
    }

    fn cursor_square(&self) -> u8 {
        self.cursor.0 * 8 + self.cursor.1
    }

    /// The legal moves of the currently selected piece, in a stable order
    /// so left/right cycling is predictable.
    fn selected_actions(&self) -> Vec<Move> {
        let square = self.cursor_square();
        self.move_generator
            .generate_moves(&self.board)
            .into_iter()
            .filter(|mv| mv.from == square)
            .collect()
    }

    /// Per-square highlight colors for the current screen, layered over the
    /// checkerboard background.
    fn highlight_overlay(&self) -> [Option<TermColor>; 64] {
        let mut overlay = [None; 64];
        match self.screen {
            Screen::MainMenu => {
                // Dim the playable squares while the menu is up
                for square in 0..64u8 {
                    if is_playable(square) {
                        overlay[square as usize] = Some(DIMMED);
                    }
                }
            }
            Screen::SelectPiece => {
                let moves = self.move_generator.generate_moves(&self.board);
                // Pieces that are required to jump
                for mv in &moves {
                    if mv.is_jump() {
                        overlay[mv.from as usize] = Some(TermColor::Yellow);
                    }
                }
                let cursor_square = self.cursor_square();
                let movable = moves.iter().any(|mv| mv.from == cursor_square);
                let cursor_color = if movable {
                    TermColor::Green
                } else {
                    TermColor::Red
                };
                overlay[cursor_square as usize] = Some(cursor_color);
            }
            Screen::MovePiece => {
                // Chosen destination green, alternatives yellow, capture
                // victims red, and the origin square dimmed
                for (i, mv) in self.selected_actions().iter().enumerate() {
                    if let Some(victim) = mv.captured {
                        overlay[victim as usize] = Some(TermColor::Red);
                    }
                    let target_color = if i == self.action_idx {
                        TermColor::Green
                    } else {
                        TermColor::Yellow
                    };
                    overlay[mv.to as usize] = Some(target_color);
                }
                overlay[self.cursor_square() as usize] = Some(DIMMED);
            }
            Screen::GameOver => {}
        }
        overlay
    }

    fn draw(&self, stdout: &mut io::Stdout) -> Result<()> {
        let overlay = self.highlight_overlay();
        let show_pieces = self.screen != Screen::MainMenu;

        for row in 0..8u8 {
            for col in 0..8u8 {
                let square = row * 8 + col;
                let base = if is_playable(square) {
                    TermColor::White
                } else {
                    TermColor::Grey
                };
                let background = overlay[square as usize].unwrap_or(base);
                let cell = match self.board.get_piece_at(square) {
                    Some(piece) if show_pieces => format!(" {} ", glyph(piece)),
                    _ => "   ".to_string(),
                };
                queue!(
                    stdout,
                    MoveTo(BOARD_LEFT + col as u16 * CELL_WIDTH, BOARD_TOP + row as u16),
                    SetBackgroundColor(background),
                    SetForegroundColor(TermColor::Black),
                    Print(cell)
                )?;
            }
        }
        queue!(stdout, ResetColor)?;

        self.draw_title(stdout)?;
        self.draw_help(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn draw_title(&self, stdout: &mut io::Stdout) -> Result<()> {
        let title = match self.screen {
            Screen::MainMenu => "Welcome to CHECKERS!".to_string(),
            Screen::GameOver => match self.winner {
                Some(color) => format!("{} wins!", team_name(color)),
                None => "Game over".to_string(),
            },
            _ => format!("{}'s turn...", team_name(self.board.side_to_move)),
        };
        queue!(
            stdout,
            MoveTo(0, TITLE_ROW),
            Clear(ClearType::UntilNewLine),
            Print(title)
        )?;
        Ok(())
    }

    fn draw_help(&self, stdout: &mut io::Stdout) -> Result<()> {
        let help = match self.screen {
            Screen::MainMenu => "[press any key to start!]",
            Screen::SelectPiece => "move: arrows   select: [z]   quit: [q]",
            Screen::MovePiece => "cycle: left/right   select: [z]   cancel: [x]",
            Screen::GameOver => "quit: [q]",
        };
        queue!(
            stdout,
            MoveTo(0, HELP_ROW),
            Clear(ClearType::UntilNewLine),
            Print(help)
        )?;
        Ok(())
    }

    fn draw_border(&self, stdout: &mut io::Stdout) -> Result<()> {
        let inner = (BORDER_WIDTH - 2) as usize;
        queue!(
            stdout,
            MoveTo(0, BORDER_TOP),
            Print(format!("╔{}╗", "═".repeat(inner)))
        )?;
        for row in 0..8u16 {
            queue!(stdout, MoveTo(0, BOARD_TOP + row), Print("║"))?;
            queue!(stdout, MoveTo(BORDER_WIDTH - 1, BOARD_TOP + row), Print("║"))?;
        }
        queue!(
            stdout,
            MoveTo(0, BOARD_TOP + 8),
            Print(format!("╚{}╝", "═".repeat(inner)))
        )?;
        stdout.flush()?;
        Ok(())
    }
}

fn is_playable(square: u8) -> bool {
    (square / 8 + square % 8) % 2 == 1
}

fn glyph(piece: (Rank, Color)) -> char {
    match piece {
        (Rank::Man, Color::Light) => '○',
        (Rank::King, Color::Light) => '◇',
        (Rank::Man, Color::Dark) => '●',
        (Rank::King, Color::Dark) => '◆',
    }
}

fn team_name(color: Color) -> &'static str {
    match color {
        Color::Light => "LIGHT",
        Color::Dark => "DARK",
    }
}
