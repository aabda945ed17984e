use std::{fs, process::Command};

#[test]
fn bundled_session_prints_survival() {
    let output = Command::new(env!("CARGO_BIN_EXE_scavenge"))
        .args(["--seed", "3"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch scavenge binary");

    assert!(output.status.success(), "scavenge exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[..5],
        [
            "Welcome to Scavenge. Survive the days.",
            "Day 1",
            "Day 2",
            "Day 3",
            "You survived 3 days!",
        ],
        "stdout: {stdout}"
    );
}

#[test]
fn levels_directory_and_settings_file_are_honoured() {
    let dir = tempfile::tempdir().expect("temp dir");
    let levels = dir.path().join("levels");
    fs::create_dir(&levels).expect("levels dir");
    fs::write(levels.join("day1.txt"), "xxxx\nx..T\nxE.x\nxxxx").expect("day one");
    let config = dir.path().join("scavenge.toml");
    fs::write(&config, "seed = 9\nmax_days = 2\nsetup_delay_ms = 0\n").expect("settings");

    let output = Command::new(env!("CARGO_BIN_EXE_scavenge"))
        .arg("--config")
        .arg(&config)
        .arg("--levels")
        .arg(&levels)
        .output()
        .expect("failed to launch scavenge binary");

    assert!(output.status.success(), "scavenge exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1..3], ["Day 1", "You survived 1 days!"], "stdout: {stdout}");
    assert!(stdout.contains("seed 9"), "stdout: {stdout}");
}

#[test]
fn missing_level_fails_with_message() {
    let dir = tempfile::tempdir().expect("temp dir");

    let output = Command::new(env!("CARGO_BIN_EXE_scavenge"))
        .arg("--levels")
        .arg(dir.path())
        .output()
        .expect("failed to launch scavenge binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Day 1 could not be loaded"), "stderr: {stderr}");
}
