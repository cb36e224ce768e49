use clap::Parser;
use tracing::{debug, error};

use followgraph::cli::{Cli, Commands};
use followgraph::exec::ExecOptions;
use followgraph::pipeline::{self, RunOptions};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("followgraph started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let opts = RunOptions {
        exec: ExecOptions {
            max_parallel: cli.max_parallel,
        },
    };

    match cli.command {
        Commands::Mutual { input, output } => {
            pipeline::run_mutual(&input, &output, &opts).await?;
        }
        Commands::CommonFollowers {
            pairs,
            lists,
            threshold,
            intermediate,
            output,
        } => {
            pipeline::run_common_followers(
                &pairs,
                &lists,
                threshold,
                &intermediate,
                &output,
                &opts,
            )
            .await?;
        }
        Commands::Iolog { input, output } => {
            pipeline::run_iolog(&input, &output, &opts).await?;
        }
        Commands::Recommend {
            pairs,
            lists,
            candidates,
            output,
        } => {
            pipeline::run_recommend(&pairs, &lists, &candidates, &output, &opts).await?;
        }
    }

    Ok(())
}
