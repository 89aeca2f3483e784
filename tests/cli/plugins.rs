use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_plugins_lists_execution_order() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.plugins_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    modules      10  0.1.0  Imports, exports and external package usage
    hooks        20  0.1.0  React hook calls and custom hook definitions
    components   30  0.1.0  Exported React components in files that render JSX (depends on: modules)
    i18n         40  0.1.0  Hardcoded user-facing strings that should be translated

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_plugins_reflect_config_overrides() -> Result<()> {
    let test = CliTest::with_file(
        ".gleanrc.json",
        r#"{ "plugins": { "i18n": { "enabled": false, "priority": 1 } } }"#,
    )?;

    let output = test.plugins_command().output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let first = stdout.lines().next().unwrap_or_default();
    assert!(first.starts_with("i18n "), "got: {}", first);
    assert!(first.ends_with("(disabled)"), "got: {}", first);

    Ok(())
}
