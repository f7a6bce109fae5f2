//! plotpipe-rs - Main Entry Point
//!
//! Plots the numbers given on the command line with gnuplot, waits for
//! ENTER, then closes the session. Without numbers a parabola is drawn.
//!
//! ```text
//! plotpipe-rs [--style <style>] [--title <title>] [value ...]
//! ```

use anyhow::{bail, Context};
use plotpipe_rs::{plot_once, OnceRequest, PlotError, SessionConfig};
use std::io::BufRead;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Default)]
struct Args {
    style: Option<String>,
    title: Option<String>,
    values: Vec<f64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--style" => parsed.style = Some(args.next().context("--style needs a value")?),
            "--title" => parsed.title = Some(args.next().context("--title needs a value")?),
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            value => parsed.values.push(
                value
                    .parse()
                    .with_context(|| format!("not a number: {}", value))?,
            ),
        }
    }
    Ok(parsed)
}

fn wait_for_enter() -> plotpipe_rs::Result<()> {
    println!("press ENTER to continue");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map(|_| ())
        .map_err(PlotError::from)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,plotpipe_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = parse_args(std::env::args().skip(1))?;
    if args.values.is_empty() {
        args.values = (0..50).map(|i| f64::from(i * i)).collect();
        args.title.get_or_insert_with(|| "parabola".to_string());
    }

    let config = SessionConfig::load_or_default();
    tracing::info!("Plotting {} value(s) with {}", args.values.len(), config.program);

    let mut request = OnceRequest::series(&args.values);
    request.title = args.title.as_deref();
    request.style = args.style.as_deref();

    plot_once(config, &request, wait_for_enter).context("plotting failed")?;
    Ok(())
}
