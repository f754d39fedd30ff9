mod cli;
mod render;

use std::io::Write;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cmd {
        cli::Command::Help => {
            cli::print_help();
            Ok(())
        }
        cli::Command::Entities => {
            for line in render::describe_all() {
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
        cli::Command::Sql(args) => {
            let stmt = render::build(&args)?;
            write!(out, "{}", render::format_statement(&stmt, args.json)?)?;
            Ok(())
        }
    }
}
