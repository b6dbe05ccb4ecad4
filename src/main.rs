use clap::{Args, Parser, Subcommand};

mod cfg;
mod check;
mod compare;
mod extract;
mod io;
mod multiindex;
mod report;
mod tensor;

#[derive(Args)]
struct CheckArgs {
    /// Path of the CMG text report
    #[clap(long, default_value = cfg::REPORT_PATH)]
    report: String,
    /// Path of the npy file holding the reference pressures
    #[clap(long, default_value = cfg::GOLD_PATH)]
    gold: String,
    /// Absolute tolerance per pressure value
    #[clap(long, default_value_t = cfg::ABSOLUTE_TOLERANCE)]
    atol: f64,
    /// Relative tolerance, scaled by the reference value
    #[clap(long, default_value_t = cfg::RELATIVE_TOLERANCE)]
    rtol: f64,
}

impl Default for CheckArgs {
    fn default() -> Self {
        CheckArgs {
            report: cfg::REPORT_PATH.to_string(),
            gold: cfg::GOLD_PATH.to_string(),
            atol: cfg::ABSOLUTE_TOLERANCE,
            rtol: cfg::RELATIVE_TOLERANCE,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Compares the pressures of a report against the reference (default)
    Check(CheckArgs),

    /// Writes the pressures of a report as a new reference
    Extract {
        /// Path of the CMG text report
        #[clap(long, default_value = cfg::REPORT_PATH)]
        report: String,
        /// Path to store the reference npy file
        #[clap(long, default_value = cfg::GOLD_PATH)]
        gold: String,
    },
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None, propagate_version = true)]
struct Cli {
    /// Command to be executed
    #[clap(subcommand)]
    command: Option<Command>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Check(CheckArgs::default())) {
        Command::Check(args) => {
            let tolerance = compare::Tolerance {
                atol: args.atol,
                rtol: args.rtol,
            };
            let comparison = check::check(&args.report, &args.gold, tolerance)?;
            if comparison.is_match() {
                println!("ok: {}", comparison);
            } else {
                eprintln!("FAILED: {} does not match {}", args.report, args.gold);
                eprintln!("{}", comparison);
                std::process::exit(1);
            }
        }
        Command::Extract { report, gold } => {
            extract::extract(&report, &gold)?;
            println!("wrote {}", gold);
        }
    }
    Ok(())
}
