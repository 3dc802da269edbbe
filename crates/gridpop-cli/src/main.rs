mod command;
mod storage;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
