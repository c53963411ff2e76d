use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use prefgroups::read_report;

fn run_cli(input: &Path, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_prefgroups"))
        .arg("--input")
        .arg(input)
        .arg("-o")
        .arg(output)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch prefgroups")
}

#[test]
fn writes_three_balanced_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prefs.csv");
    let output = dir.path().join("groups.txt");
    fs::write(
        &input,
        "Timestamp,First,Last,Day [Mon],Day [Tue],Day [Wed],Day [Thu]\n\
         1,Ada,L,0,1,2,3\n\
         2,Alan,T,0,1,2,3\n\
         3,Grace,H,1,0,2,3\n\
         4,Edsger,D,1,0,2,3\n\
         5,Barbara,L,2,1,0,3\n\
         6,Donald,K,2,1,0,3\n\
         7,Ken,T,0,2,1,3\n",
    )
    .unwrap();

    let result = run_cli(&input, &output);
    assert!(result.status.success(), "{:?}", result);

    let blocks = read_report(&fs::read_to_string(&output).unwrap());
    assert_eq!(blocks.len(), 3);
    let mut sizes: Vec<usize> = blocks.iter().map(|(_, members)| members.len()).collect();
    sizes.sort();
    assert_eq!(sizes, vec![2, 2, 3]);
    assert!(blocks.iter().all(|(label, _)| label != "Thu"));
}

#[test]
fn missing_input_fails_with_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("groups.txt");

    let result = run_cli(&dir.path().join("nope.csv"), &output);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("nope.csv"), "{stderr}");
    assert!(!output.exists());
}

#[test]
fn infeasible_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prefs.csv");
    let output = dir.path().join("groups.txt");
    fs::write(
        &input,
        "t,f,l,Q [A],Q [B]\n1,a,1,0,1\n2,b,2,1,0\n3,c,3,0,1\n4,d,4,1,0\n",
    )
    .unwrap();

    let result = run_cli(&input, &output);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("infeasible"));
}

#[test]
fn both_flags_are_required() {
    let result = Command::new(env!("CARGO_BIN_EXE_prefgroups"))
        .arg("-i")
        .arg("prefs.csv")
        .output()
        .unwrap();
    assert!(!result.status.success());
}
