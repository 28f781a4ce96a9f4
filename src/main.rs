mod board;
mod movegen;
mod tui;

use anyhow::Result;
use tui::Tui;

fn main() -> Result<()> {
    let mut tui = Tui::new();
    tui.run()
}
