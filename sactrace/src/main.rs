use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use sactrace_core::{
    logs::{LogFiles, LogSchema},
    util::{last_rewards_and_avg, log_dirs_given_criteria},
};
use sactrace_plot::{
    animate_logs, paper_plot, plot_logs, AnimationConfig, PaperPlotConfig, PlotConfig,
};
use std::path::PathBuf;

/// Plot and browse the logs of reinforcement learning runs
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// YAML file with the names of the log files
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Actions have no discrete tag
    #[arg(long, default_value_t = false)]
    continuous: bool,
}

impl SchemaArgs {
    fn schema(&self) -> Result<LogSchema> {
        let schema = match &self.schema {
            Some(path) => LogSchema::load(path)?,
            None => LogSchema::default(),
        };
        Ok(if self.continuous {
            schema.set_hybrid(false)
        } else {
            schema
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the logs of a run into <LOG_DIR>/plots
    Plot {
        log_dir: PathBuf,

        /// YAML file with the plot configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Draw logs up to this line
        #[arg(long)]
        up_to: Option<usize>,

        /// Suffix of the file name
        #[arg(long)]
        extra: Option<String>,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Animate the logs of a run into <LOG_DIR>/anims
    Animate {
        log_dir: PathBuf,

        /// YAML file with the animation configuration
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Draw the summary figure of a run
    Paper {
        log_dir: PathBuf,

        /// YAML file with the figure configuration
        #[arg(long)]
        config: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Print the last running rewards of a run and their mean
    LastRewards {
        log_dir: PathBuf,

        /// Number of rewards
        #[arg(short, default_value_t = 10)]
        n: usize,

        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// List the runs whose parameters match all KEY=VALUE conditions
    Find {
        main_dir: PathBuf,

        /// Condition on a parameter, as KEY=VALUE
        #[arg(long = "param")]
        params: Vec<String>,

        #[command(flatten)]
        schema: SchemaArgs,
    },
}

fn parse_condition(s: &str) -> Result<(String, String)> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got {:?}", s))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Plot {
            log_dir,
            config,
            up_to,
            extra,
            schema,
        } => {
            let mut config = match config {
                Some(path) => PlotConfig::load(path)?,
                None => PlotConfig::default(),
            };
            if up_to.is_some() {
                config = config.plot_to_file_line(up_to);
            }
            if let Some(extra) = extra {
                config = config.extra_str(extra);
            }
            let path = plot_logs(&log_dir, &schema.schema()?, &LogFiles::default(), &config)?;
            info!("Figure at {:?}", path);
        }
        Command::Animate {
            log_dir,
            config,
            schema,
        } => {
            let config = match config {
                Some(path) => AnimationConfig::load(path)?,
                None => AnimationConfig::default(),
            };
            let path = animate_logs(&log_dir, &schema.schema()?, &LogFiles::default(), &config)?;
            info!("Animation at {:?}", path);
        }
        Command::Paper {
            log_dir,
            config,
            schema,
        } => {
            let config = PaperPlotConfig::load(config)?;
            let path = paper_plot(&log_dir, &schema.schema()?, &config)?;
            info!("Figure at {:?}", path);
        }
        Command::LastRewards { log_dir, n, schema } => {
            let (rewards, avg) = last_rewards_and_avg(&log_dir, n, &schema.schema()?)?;
            for r in rewards.iter() {
                println!("{}", r);
            }
            println!("mean: {}", avg);
        }
        Command::Find {
            main_dir,
            params,
            schema,
        } => {
            let conditions = params
                .iter()
                .map(|p| parse_condition(p))
                .collect::<Result<Vec<_>>>()?;
            for dir in log_dirs_given_criteria(&main_dir, &conditions[..], &schema.schema()?)? {
                println!("{}", dir.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition() {
        assert_eq!(
            parse_condition("env_name=TwoLevel").unwrap(),
            ("env_name".to_string(), "TwoLevel".to_string())
        );
        assert_eq!(
            parse_condition("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_condition("gamma").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["sactrace", "find", "logs", "--param", "a=1", "--param", "b=2"]);
        match cli.command {
            Command::Find { params, .. } => assert_eq!(params, vec!["a=1", "b=2"]),
            c => panic!("unexpected {:?}", c),
        }

        let cli = Cli::parse_from(["sactrace", "plot", "run", "--up-to", "30", "--continuous"]);
        match cli.command {
            Command::Plot { up_to, schema, .. } => {
                assert_eq!(up_to, Some(30));
                assert!(!schema.schema().unwrap().hybrid);
            }
            c => panic!("unexpected {:?}", c),
        }
    }
}
