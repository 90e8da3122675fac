use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_config(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp config");
    tmp.write_all(xml.as_bytes()).expect("write config");
    tmp
}

#[test]
fn cli_runs_headless_frames() {
    let mut cmd = Command::cargo_bin("mini-raid").expect("binary exists");
    cmd.arg("--headless").arg("--frames").arg("3");
    cmd.assert()
        .success()
        .stdout(contains("Running 3 headless frame(s) at 0.0167s per frame"))
        .stdout(contains("#fpsLabel: 60 fps"))
        .stdout(contains("Presented 3 frame(s) with 3 draw call(s)"));
}

#[test]
fn cli_reads_scene_config() {
    let config = write_config(
        r#"<scene>
  <camera><fov>45</fov></camera>
  <fps-label>hud</fps-label>
</scene>
"#,
    );
    let mut cmd = Command::cargo_bin("mini-raid").expect("binary exists");
    cmd.arg("--headless")
        .arg("--frames")
        .arg("2")
        .arg("--step")
        .arg("0.25")
        .arg("--config")
        .arg(config.path());
    cmd.assert()
        .success()
        .stdout(contains("#hud: 4 fps"))
        .stdout(contains("Presented 2 frame(s) with 2 draw call(s)"));
}

#[test]
fn cli_rejects_invalid_config() {
    let config = write_config("<scene><camera><eye>1 2</eye></camera></scene>");
    let mut cmd = Command::cargo_bin("mini-raid").expect("binary exists");
    cmd.arg("--headless").arg("--config").arg(config.path());
    cmd.assert()
        .failure()
        .stderr(contains("invalid scene config"));
}

#[test]
fn cli_rejects_unknown_arguments() {
    let mut cmd = Command::cargo_bin("mini-raid").expect("binary exists");
    cmd.arg("--fullscreen");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --fullscreen"))
        .stderr(contains("Usage: mini-raid"));
}
