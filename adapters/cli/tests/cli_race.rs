use std::{
    fs,
    path::{Path, PathBuf},
    process::{self, Command, Output},
};

use serde_json::Value;

const QUARTER_MILE: &str = concat!(
    "############################################################\n",
    "##   <                                                    ##\n",
    "##   <                                                 a  ##\n",
    "##   <                                                    ##\n",
    "##   <                                                 b  ##\n",
    "##   <                                                    ##\n",
    "############################################################\n",
);

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("racetrack-cli-{name}-{}", process::id()));
    fs::create_dir_all(&dir).expect("create scratch directory");
    dir
}

fn racetrack(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_racetrack"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run racetrack binary")
}

fn summary(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "racetrack failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf-8 output");
    let last = stdout.lines().last().expect("summary line");
    serde_json::from_str(last).expect("summary is json")
}

#[test]
fn move_list_race_reports_a_json_summary() {
    let dir = scratch_dir("move-list");
    fs::write(dir.join("quarter.txt"), QUARTER_MILE).expect("write track");
    fs::write(dir.join("left.txt"), "LEFT\n".repeat(10)).expect("write moves");

    let output = racetrack(
        &dir,
        &[
            "quarter.txt",
            "--car",
            "a=move-list:left.txt",
            "--summary",
            "json",
            "--quiet",
        ],
    );
    let summary = summary(&output);
    assert_eq!(summary["outcome"], "winner");
    assert_eq!(summary["id"], "a");
    assert_eq!(summary["turns"], 10);
    assert_eq!(summary["cars"][1]["id"], "b");
    assert_eq!(summary["cars"][1]["crashed"], false);
    assert_eq!(summary["cars"][1]["turns"], 9);
    assert_eq!(summary["cars"][0]["strategy"], "move-list");
    assert_eq!(summary["cars"][1]["strategy"], "do-not-move");
    fs::remove_dir_all(&dir).expect("remove scratch directory");
}

#[test]
fn config_directories_and_turn_limit_apply() {
    let dir = scratch_dir("config");
    fs::create_dir_all(dir.join("maps")).expect("create track directory");
    fs::create_dir_all(dir.join("moves")).expect("create move directory");
    fs::write(dir.join("maps").join("quarter.txt"), QUARTER_MILE).expect("write track");
    fs::write(dir.join("moves").join("left.txt"), "LEFT\n".repeat(10)).expect("write moves");
    fs::write(
        dir.join("racetrack.toml"),
        "version = 1\ntrack_directory = \"maps\"\nmax_turns = 4\n",
    )
    .expect("write config");

    let output = racetrack(
        &dir,
        &["quarter.txt", "--car", "a=move-list:left.txt", "--summary", "json", "-q"],
    );
    let summary = summary(&output);
    assert_eq!(summary["outcome"], "turn-limit-reached");
    assert_eq!(summary["turns"], 4);
    assert_eq!(summary["cars"][0]["position"]["x"], 52);
    assert_eq!(summary["cars"][0]["turns"], 2);
    fs::remove_dir_all(&dir).expect("remove scratch directory");
}

#[test]
fn draws_the_track_unless_quiet() {
    let dir = scratch_dir("render");
    fs::write(dir.join("quarter.txt"), QUARTER_MILE).expect("write track");

    let output = racetrack(&dir, &["quarter.txt", "--car", "b=move-list:down.txt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("down.txt"), "unexpected error: {stderr}");

    fs::write(dir.join("down.txt"), "DOWN\n").expect("write moves");
    let output = racetrack(&dir, &["quarter.txt", "--car", "b=move-list:down.txt"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(QUARTER_MILE));
    assert!(stdout.contains("car b crashed at (X:55, Y:6)"));
    assert!(stdout.contains("car a won at (X:55, Y:2)"));
    assert!(stdout.trim_end().ends_with("car a wins after 2 turns"));
    fs::remove_dir_all(&dir).expect("remove scratch directory");
}

#[test]
fn rejects_lineups_without_moving_cars() {
    let dir = scratch_dir("parked");
    fs::write(dir.join("quarter.txt"), QUARTER_MILE).expect("write track");
    let output = racetrack(&dir, &["quarter.txt", "-q"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("moving strategy"), "unexpected error: {stderr}");
    fs::remove_dir_all(&dir).expect("remove scratch directory");
}
