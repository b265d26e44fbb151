use anyhow::Result;
use clap::{Parser, Subcommand};
use ledger_core::{
    constants::DIFFICULTY,
    mine::solve_parallel,
    pow::{self, Puzzle},
    SearchLimits,
};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for the proof-of-work ledger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:5000)
    #[arg(long, global = true, default_value = "http://127.0.0.1:5000")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the node to mine the next block
    Mine,
    /// Print the whole chain
    Chain,
    /// Ask the node whether its chain is valid
    Valid,
    /// Print the height and tip digest
    Head,
    /// Digest a string locally and check it against the difficulty
    Hash {
        input: String,
        #[arg(long, default_value_t = DIFFICULTY)]
        difficulty: usize,
    },
    /// Solve the puzzle locally for a previous solution
    Solve {
        previous: u64,
        #[arg(long, default_value_t = DIFFICULTY)]
        difficulty: usize,
        /// Search on all cores
        #[arg(long)]
        parallel: bool,
    },
}

async fn fetch(node: &str, path: &str) -> Result<()> {
    let url = format!("{node}{path}");
    debug!(%url, "requesting");
    let res = reqwest::get(&url).await?;
    let status = res.status();
    let body: serde_json::Value = res.json().await?;
    println!("status: {}", status);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Mine => fetch(&cli.node, "/mine_block").await?,
        Command::Chain => fetch(&cli.node, "/get_chain").await?,
        Command::Valid => fetch(&cli.node, "/valid").await?,
        Command::Head => fetch(&cli.node, "/chain/head").await?,
        Command::Hash { input, difficulty } => {
            let puzzle = Puzzle::new(difficulty)?;
            let digest = pow::digest(&input);
            println!("digest: {digest}");
            println!(
                "leading zeros: {} (meets difficulty {difficulty}: {})",
                pow::count_leading_zero_chars(&digest),
                puzzle.meets(&digest)
            );
        }
        Command::Solve {
            previous,
            difficulty,
            parallel,
        } => {
            let puzzle = Puzzle::new(difficulty)?;
            let solution = if parallel {
                solve_parallel(&puzzle, previous, SearchLimits::default())?
            } else {
                puzzle.solve(previous)
            };
            let operation = pow::operation(solution, previous);
            println!("solution: {solution}");
            println!("operation: {operation}");
            println!("digest: {}", pow::digest(&operation));
        }
    }
    Ok(())
}
