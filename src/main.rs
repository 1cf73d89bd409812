use jornada::commands::Cli;
use jornada::libs::logging;

fn main() -> anyhow::Result<()> {
    logging::init();
    Cli::menu()
}
