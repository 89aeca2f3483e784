use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

const APP: &str = r#"import { useEffect, useState } from "react";

export default function App() {
  const [open, setOpen] = useState(false);
  const [name, setName] = useState("");
  useEffect(() => {}, []);
  return <button title="Open the menu">Click me</button>;
}
"#;

#[test]
fn test_extract_single_plugin() -> Result<()> {
    let test = CliTest::with_file("src/app.tsx", APP)?;

    assert_cmd_snapshot!(test.extract_command().arg("hooks"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ hooks (1 of 1 files)
    3 hook calls in 1 files
      useState   2
      useEffect  1

    ✓ Finished 1 plugin

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_extract_all_plugins_json() -> Result<()> {
    let test = CliTest::with_file("src/app.tsx", APP)?;

    let output = test.extract_command().args(["--format", "json"]).output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = report["runs"]
        .as_array()
        .map(|runs| runs.iter().filter_map(|r| r["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["modules", "hooks", "components", "i18n"]);
    assert_eq!(report["elapsedMs"], 0);

    let i18n = &report["runs"][3]["result"]["data"];
    let mut texts: Vec<&str> = i18n["hardcoded"]
        .as_array()
        .map(|found| found.iter().filter_map(|h| h["text"].as_str()).collect())
        .unwrap_or_default();
    texts.sort();
    assert_eq!(texts, vec!["Click me", "Open the menu"]);

    let components = &report["runs"][2]["result"]["data"]["components"];
    assert_eq!(components[0]["name"], "App");

    Ok(())
}

#[test]
fn test_extract_unknown_plugin() -> Result<()> {
    let test = CliTest::with_file("src/app.tsx", APP)?;

    assert_cmd_snapshot!(test.extract_command().arg("routes"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: unknown plugin 'routes' (available: modules, hooks, components, i18n)
    ");

    Ok(())
}

#[test]
fn test_extract_missing_path_fails() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .extract_command()
        .args(["hooks", "--path", "missing"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("error: target path does not exist"));

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".gleanrc.json", r#"{ "includes": ["src/[" ] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Invalid glob pattern in 'includes'"));

    Ok(())
}
