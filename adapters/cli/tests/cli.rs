use std::process::Command;

fn overworld() -> Command {
    Command::new(env!("CARGO_BIN_EXE_overworld"))
}

#[test]
fn scripted_session_prints_banner_and_final_frame() {
    let output = overworld()
        .args([
            "--enemies", "50", "--chests", "50", "--ticks", "12", "--script", "ddd.f",
        ])
        .output()
        .expect("failed to launch the overworld binary");

    assert!(output.status.success(), "overworld should exit cleanly");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to Overworld."));
    let frame: Vec<&str> = lines.collect();
    assert_eq!(frame.len(), 17, "16 map rows and a status line");
    assert!(frame[..16].iter().all(|row| row.chars().count() == 23));
    assert_eq!(frame.iter().filter(|row| row.contains('@')).count(), 1);
    assert!(frame[16].starts_with("hp "));
}

#[test]
fn unknown_script_letters_fail() {
    let output = overworld()
        .args(["--enemies", "0", "--chests", "0", "--script", "wq"])
        .output()
        .expect("failed to launch the overworld binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown script command 'q'"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = overworld()
        .args(["--config", "does/not/exist.toml"])
        .output()
        .expect("failed to launch the overworld binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"));
}
