use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/cart.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "kind,id,title,effective_price,ex_gst,gst",
        ))
        .stdout(predicate::str::contains(
            "course,c1,Rust Basics,999.00,846.61,152.39",
        ))
        .stdout(predicate::str::contains(
            "workshop,w1,Async Deep Dive,1299.00,1100.85,198.15",
        ))
        .stdout(predicate::str::contains("total,,,2298.00,1947.46,350.54"));

    Ok(())
}

#[test]
fn test_gst_rate_flag_overrides_default() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "kind, id, price, sessions, title").unwrap();
    writeln!(file, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(file.path()).arg("--gst-rate").arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total,,,999.00,999.00,0.00"));
}

#[test]
fn test_config_file_sets_gst_rate() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "gst_rate_percent = 12").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("course,c1,Rust Basics,999.00,891.96,107.04"))
        .stdout(predicate::str::contains("total,,,999.00,891.96,107.04"));
}

#[test]
fn test_flag_beats_config_file() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "gst_rate_percent = 12").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path())
        .arg("--config")
        .arg(config.path())
        .arg("--gst-rate")
        .arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total,,,999.00,999.00,0.00"));
}

#[test]
fn test_env_override_applies() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).env("COURSEPAY_GST_RATE", "0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total,,,999.00,999.00,0.00"));
}

#[test]
fn test_bad_env_override_fails() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).env("COURSEPAY_GST_RATE", "not-a-number");

    cmd.assert().failure();
}

#[test]
fn test_missing_sessions_column_defaults_to_one() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, title").unwrap();
    writeln!(cart, "workshop, w1, 500, Single Session").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("workshop,w1,Single Session,500.00,423.73,76.27"));
}

#[test]
fn test_configured_sessions_apply_to_sessionless_workshop_rows() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, title").unwrap();
    writeln!(cart, "workshop, w1, 500, Evening Series").unwrap();

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "workshop_sessions = 4").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "workshop,w1,Evening Series,2000.00,1694.92,305.08",
        ))
        .stdout(predicate::str::contains("total,,,2000.00,1694.92,305.08"));
}

#[test]
fn test_explicit_sessions_beat_configured_default() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "workshop, w1, 500, 2, Fixed Pair").unwrap();

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "workshop_sessions = 4").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total,,,1000.00,847.46,152.54"));
}

#[test]
fn test_empty_cart_quotes_zero_total() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("total,,,0.00,0.00,0.00"));
}

#[test]
fn test_negative_price_aborts_without_partial_quote() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Fine").unwrap();
    writeln!(cart, "course, c2, -5, 1, Broken").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "seminar, s1, 100, 1, Nope").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown variant"));
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/does-not-exist.csv");

    cmd.assert().failure();
}

#[test]
fn test_logs_go_to_stderr_not_stdout() {
    let mut cart = NamedTempFile::new().unwrap();
    writeln!(cart, "kind, id, price, sessions, title").unwrap();
    writeln!(cart, "course, c1, 999, 1, Rust Basics").unwrap();

    let mut cmd = Command::new(cargo_bin!());
    cmd.arg(cart.path()).arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("quote written").not())
        .stderr(predicate::str::contains("quote written"));
}
