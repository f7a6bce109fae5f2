//! Integration tests for the session lifecycle
//!
//! These tests drive a real child process (a shell script standing in for
//! gnuplot) through the public API:
//! - Program lookup and init failures
//! - plot/replot sequencing as seen by the process
//! - Temp file cleanup on reset and close
//! - Close idempotence and use after close

#![cfg(unix)]

mod common;

use common::FakePlotter;
use plotpipe_rs::backend::SearchPathResolver;
use plotpipe_rs::{
    CloseStatus, ExecutableResolver, PlotError, PlotVerb, Session, SessionConfig, SessionState,
};
use serial_test::serial;
use std::path::PathBuf;

/// Resolver that never finds anything
struct NowhereResolver;

impl ExecutableResolver for NowhereResolver {
    fn locate(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

#[test]
fn test_not_found_prevents_session() {
    let plotter = FakePlotter::new("gnuplot");
    let result = Session::init_with(plotter.config(), &NowhereResolver);

    let err = result.unwrap_err();
    assert!(matches!(err, PlotError::NotFound { .. }));
    assert!(err.is_init_failure());
    // Nothing was spawned, so nothing was written
    assert!(plotter.commands().is_empty());
}

#[test]
fn test_missing_program_path() {
    let config = SessionConfig {
        check_display: false,
        ..SessionConfig::for_program("/nonexistent/dir/gnuplot")
    };
    let err = Session::with_config(config).unwrap_err();
    assert!(err.is_init_failure());
}

#[test]
fn test_commands_reach_the_process() {
    let plotter = FakePlotter::new("gnuplot");
    let mut session = Session::with_config(plotter.config()).unwrap();

    session.set_title("Lifecycle").unwrap();
    session.set_style("lines");
    let first = session.plot_series(&[1.0, 4.0, 9.0], Some("squares")).unwrap();
    let second = session.plot_slope(1.0, 0.0, Some("unity")).unwrap();
    let third = session.plot_equation("sin(x)", None).unwrap();
    assert_eq!(first.verb(), Some(PlotVerb::Plot));
    assert_eq!(second.verb(), Some(PlotVerb::Replot));
    assert_eq!(third.verb(), Some(PlotVerb::Replot));

    let data_file = session.temp_files()[0].clone();
    assert_eq!(
        std::fs::read_to_string(&data_file).unwrap(),
        "1\n4\n9\n"
    );

    assert_eq!(session.close().unwrap(), CloseStatus::Clean);

    // close() waits for the process, so the log is complete
    let commands = plotter.commands();
    assert_eq!(
        commands,
        vec![
            "set title 'Lifecycle'".to_string(),
            format!(
                "plot \"{}\" title \"squares\" with lines",
                data_file.display()
            ),
            "replot 1 * x + 0 title \"unity\" with lines".to_string(),
            "replot sin(x) title \"no title\" with lines".to_string(),
        ]
    );
    assert!(!data_file.exists());
}

#[test]
fn test_reset_starts_a_fresh_canvas() {
    let plotter = FakePlotter::new("gnuplot");
    let mut session = Session::with_config(plotter.config()).unwrap();

    session.plot_series(&[1.0], None).unwrap();
    session.plot_xy(&[0.0, 1.0], &[2.0, 3.0], None).unwrap();
    assert_eq!(plotter.data_file_count(), 2);

    session.reset_plot().unwrap();
    assert_eq!(session.plot_count(), 0);
    assert!(session.temp_files().is_empty());
    assert_eq!(plotter.data_file_count(), 0);

    session.plot_series(&[5.0], None).unwrap();
    session.close().unwrap();

    let verbs: Vec<String> = plotter
        .commands()
        .iter()
        .map(|c| c.split_whitespace().next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(verbs, vec!["plot", "replot", "plot"]);
    assert_eq!(plotter.data_file_count(), 0);
}

#[test]
fn test_histogram_end_to_end() {
    let plotter = FakePlotter::new("gnuplot");
    let mut session = Session::with_config(plotter.config()).unwrap();

    session
        .plot_histogram(&[0.0, 1.0, 2.0, 3.0], &[0.5, 1.5, 1.5, 0.0], 3, false, Some("h"))
        .unwrap();
    let data_file = session.temp_files()[0].clone();
    assert_eq!(
        std::fs::read_to_string(&data_file).unwrap(),
        "0 1\n1 2\n2 0\n"
    );
    session.close().unwrap();

    let commands = plotter.commands();
    assert_eq!(commands.len(), 1);
    assert!(commands[0].ends_with("title \"h\" with boxes"));
}

#[test]
fn test_close_twice_and_use_after_close() {
    let plotter = FakePlotter::new("gnuplot");
    let mut session = Session::with_config(plotter.config()).unwrap();

    assert_eq!(session.close().unwrap(), CloseStatus::Clean);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(session.close().unwrap(), CloseStatus::AlreadyClosed);

    assert!(matches!(
        session.set_title("late"),
        Err(PlotError::SessionClosed)
    ));
    assert!(plotter.commands().is_empty());
}

#[test]
fn test_drop_reaps_and_cleans_up() {
    let plotter = FakePlotter::new("gnuplot");
    {
        let mut session = Session::with_config(plotter.config()).unwrap();
        session.plot_series(&[1.0, 2.0], None).unwrap();
        assert_eq!(plotter.data_file_count(), 1);
    }
    assert_eq!(plotter.data_file_count(), 0);
    assert_eq!(plotter.commands().len(), 1);
}

#[test]
fn test_lookup_by_name_in_search_path() {
    let plotter = FakePlotter::new("fake-gnuplot");
    let config = SessionConfig {
        program: "fake-gnuplot".to_string(),
        ..plotter.config()
    };

    let resolver = SearchPathResolver::with_search_path(plotter.bin_dir().as_os_str());
    let mut session = Session::init_with(config, &resolver).unwrap();
    assert_eq!(session.program_dir(), plotter.bin_dir());

    session.command("set grid").unwrap();
    session.close().unwrap();
    assert_eq!(plotter.commands(), vec!["set grid"]);
}

#[test]
#[serial]
fn test_lookup_through_path_environment() {
    let plotter = FakePlotter::new("fake-gnuplot-env");
    let config = SessionConfig {
        program: "fake-gnuplot-env".to_string(),
        ..plotter.config()
    };

    let old_path = std::env::var_os("PATH");
    let mut dirs = vec![plotter.bin_dir().to_path_buf()];
    if let Some(ref old) = old_path {
        dirs.extend(std::env::split_paths(old));
    }
    std::env::set_var("PATH", std::env::join_paths(dirs).unwrap());

    let result = Session::with_config(config);

    match old_path {
        Some(old) => std::env::set_var("PATH", old),
        None => std::env::remove_var("PATH"),
    }

    let mut session = result.unwrap();
    assert_eq!(session.program_dir(), plotter.bin_dir());
    session.close().unwrap();
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_missing_display_is_only_a_warning() {
    let plotter = FakePlotter::new("gnuplot");
    let config = SessionConfig {
        check_display: true,
        ..plotter.config()
    };

    let old_display = std::env::var_os("DISPLAY");
    std::env::remove_var("DISPLAY");
    let result = Session::with_config(config);
    if let Some(old) = old_display {
        std::env::set_var("DISPLAY", old);
    }

    let mut session = result.unwrap();
    assert!(session
        .warnings()
        .contains(&plotpipe_rs::SessionWarning::DisplayUnset));
    session.close().unwrap();
}
