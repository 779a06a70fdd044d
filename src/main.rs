use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use sample_core::{
    compile::Adapter,
    config::JudgeConfig,
    error::Result,
    judge::{JudgeEvent, Session},
    problem::{problem_id_of, HR},
    remote::HttpSource,
    store::{clean_dir, ProblemStore},
};

#[derive(Parser)]
#[command(
    version = "0.1.0",
    name = "Sample Tank",
    author = "Kanari <iovo7c@gmail.com>",
    about = "Judge a solution against the samples of its problem.",
    args_conflicts_with_subcommands = true,
    arg_required_else_help = true
)]
struct Opts {
    #[arg(short, long, global = true, help = "judge config (yaml)")]
    config: Option<String>,
    #[arg(long, help = "exit with failure unless every sample is accepted")]
    strict: bool,
    #[arg(help = "solution named after its problem id, e.g. 1000.cpp")]
    file: Option<PathBuf>,
    #[command(subcommand)]
    subcmd: Option<SubCommand>,
}

#[derive(Subcommand)]
enum SubCommand {
    #[command(about = "Remove every cached problem")]
    Clean,
    #[command(about = "Print a problem, fetching it if needed")]
    Show(ShowConfig),
}

#[derive(clap::Args, Debug)]
struct ShowConfig {
    #[arg(help = "problem id")]
    id: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => JudgeConfig::from_file(path)?,
        None => JudgeConfig::default(),
    };

    match opts.subcmd {
        Some(SubCommand::Clean) => {
            for file in clean_dir(&config.cache_dir)? {
                println!("Removing {}", file.display());
            }
        }
        Some(SubCommand::Show(show)) => {
            let store = open_store(&config)?;
            println!("{}", store.get_or_fetch(show.id)?);
        }
        None => {
            if let Some(file) = &opts.file {
                let passed = judge(&config, file)?;
                if opts.strict && !passed {
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn open_store(config: &JudgeConfig) -> Result<ProblemStore> {
    let source = HttpSource::new(config)?;
    Ok(ProblemStore::new(config.cache_dir.clone(), Box::new(source)))
}

fn judge(config: &JudgeConfig, file: &Path) -> Result<bool> {
    let id = problem_id_of(file)?;
    let problem = open_store(config)?.get_or_fetch(id)?;
    println!("{}", problem);

    let adapter = Adapter::for_source(file, config)?;
    let mut session = Session::new(problem, adapter)?;

    let verdict = session.judge_with(|event| match event {
        JudgeEvent::Compiling => println!("Compiling..."),
        JudgeEvent::Running(i) => println!("{}\nRunning Sample {}", HR, i),
        JudgeEvent::Finished(_, res) => println!("{}", res),
    })?;
    println!("{}", verdict);

    info!("{} judged, all passed: {}", file.display(), verdict.all_passed());
    Ok(verdict.all_passed())
}
