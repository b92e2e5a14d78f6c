use clap::Parser;
use monotape::{Configuration, Machine, MachineError, ProgramLoader, ProgramManager, DEMO_PROGRAM};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Machine program file to execute (runs the bundled demonstration when
    /// omitted)
    #[clap(short, long)]
    program: Option<PathBuf>,

    /// Name of a bundled program to execute
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the bundled programs and exit
    #[clap(short, long)]
    list: bool,

    /// Print each configuration as it is produced
    #[clap(short, long)]
    debug: bool,

    /// Abort with an error if the machine has not halted after this many
    /// steps
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// Print the final configuration as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    program: String,
    steps: usize,
    tape: String,
    length: usize,
    head: usize,
    symbol: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute(&cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<(), MachineError> {
    if cli.list {
        for name in ProgramManager::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let program = match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(path)?,
        (None, Some(name)) => ProgramManager::by_name(name)?,
        (None, None) => ProgramManager::by_name(DEMO_PROGRAM)?,
    };

    let machine = Machine::from_program(&program)?;
    let mut config = Configuration::initial(&program)?;
    let mut steps = 0usize;

    if cli.debug {
        print_configuration(steps, &config);
    }

    while !config.is_halted() {
        if let Some(limit) = cli.max_steps {
            if steps >= limit {
                return Err(MachineError::StepLimitExceeded(limit));
            }
        }

        config = machine.step(&config)?;
        steps += 1;

        if cli.debug {
            print_configuration(steps, &config);
        }
    }

    if cli.json {
        let summary = Summary {
            program: program.name.clone(),
            steps,
            tape: config.tape.to_string(),
            length: config.tape.len(),
            head: config.tape.head(),
            symbol: config.tape.read().to_string(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).expect("summary is serializable")
        );
    } else {
        println!("{}", config.tape.len());
        println!("{}", config.tape.head());
        println!("{}", config.tape.read());
    }

    Ok(())
}

fn print_configuration(step: usize, config: &Configuration) {
    println!(
        "Step: {}, State: {}, Tape: {}, Head: {}",
        step,
        config.state,
        config.tape,
        config.tape.head()
    );
}
