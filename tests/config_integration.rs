use std::path::PathBuf;

use quill::config::{ConfigFlags, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quillrc");
    let content = r#"
# comment
--no-line-numbers

--tab-width 2

--log-file=quill.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_line_numbers);
    assert_eq!(flags.tab_width, Some(2));
    assert_eq!(flags.log_file, Some(PathBuf::from("quill.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".quillrc");
    let content = "--no-line-numbers\n--tab-width 8\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "quill".to_string(),
        "--tab-width".to_string(),
        "0".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.no_line_numbers, "file flags should remain enabled");
    assert_eq!(effective.tab_width, Some(0), "cli should override tab width");
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_missing_config_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
    assert_eq!(flags.effective_tab_width(), quill::config::DEFAULT_TAB_WIDTH);
}

#[test]
fn test_unknown_tokens_are_ignored() {
    let args = vec![
        "quill".to_string(),
        "--theme=dark".to_string(),
        "notes.txt".to_string(),
    ];
    assert_eq!(parse_flag_tokens(&args), ConfigFlags::default());
}
