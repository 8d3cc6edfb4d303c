use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use greeter_rpc::logging::init_logging;
use greeter_rpc::{CallerConfig, default_target, greet_once, report};

#[derive(Parser, Debug)]
#[command(name = "greeter-client")]
#[command(about = "Ask a greeter server for a greeting")]
struct Args {
    /// The name you wish to be greeted by
    #[arg(default_value = "world")]
    name: String,

    /// Your age, or the responder address if it is not a number
    #[arg(allow_negative_numbers = true)]
    age_or_target: Option<String>,

    /// Responder address
    #[arg(long, env = "GREETER_TARGET", default_value_t = default_target())]
    target: String,

    /// Age to send when none is given positionally
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    age: i32,

    /// Give up on the call after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Split the second positional into an age or a target.
    fn resolve(&self) -> (i32, String) {
        match self.age_or_target.as_deref() {
            Some(value) => match value.parse::<i32>() {
                Ok(age) => (age, self.target.clone()),
                Err(_) => (self.age, value.to_string()),
            },
            None => (self.age, self.target.clone()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Help and usage errors both exit with status 1.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    init_logging(args.verbose);

    let (age, target) = args.resolve();
    let config = CallerConfig::builder()
        .endpoint(target)
        .maybe_deadline(args.deadline_ms.map(Duration::from_millis))
        .build();

    let outcome = greet_once(config, args.name.as_str(), age).await;
    report(&outcome);

    Ok(())
}
