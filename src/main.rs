use clap::Parser;
use log::error;
use std::process::ExitCode;
use timetable_solver::cli::{Cli, Command};
use timetable_solver::error::SolveError;
use timetable_solver::{batch, output, parser, server, solver};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), SolveError> {
    match command {
        Command::Solve {
            input,
            output: target,
            solver: args,
        } => {
            let instance = parser::read_instance(&input)?;
            let solved = solver::solve(&instance, &args.into())?;
            match target {
                Some(path) => output::write_solution_file(path, &solved.solution)?,
                None => output::write_solution(std::io::stdout().lock(), &solved.solution)?,
            }
        }
        Command::Batch {
            input_dir,
            output_dir,
            solver: args,
        } => {
            batch::run_batch(input_dir, output_dir, &args.into())?;
        }
        Command::Serve { addr } => server::run_server(addr).await?,
    }
    Ok(())
}
