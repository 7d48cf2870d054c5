// SPDX-License-Identifier: AGPL-3.0-or-later
//! End-to-end tests driving the gemtext2latex binary

use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn gemtext2latex() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gemtext2latex"));
    cmd.env_remove("RUST_LOG").env_remove("DEBUG");
    cmd
}

fn input_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run_with_stdin(cmd: &mut Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_converts_file() {
    let file = input_file("# Title\n\n* a\n* b\n");
    let output = gemtext2latex()
        .arg("--filename")
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        concat!(
            "\\documentclass{mk-plain}\n",
            "\n\\begin{document}\n\n",
            "\\section*{Title}\n\n",
            "\\begin{itemize}\n\\item a\n\\item b\n\\end{itemize}\n\n",
            "\n\\end{document}\n\n",
        )
    );
}

#[test]
fn test_reads_stdin_by_default() {
    let output = run_with_stdin(&mut gemtext2latex(), "Hello & goodbye\n");

    assert!(output.status.success());
    assert!(stdout(&output).contains("Hello \\& goodbye\n"));
}

#[test]
fn test_italics_and_base_flags() {
    let output = run_with_stdin(
        gemtext2latex()
            .args(["--italics-char", "*"])
            .args(["--base", "gemini://a.com/dir/index.gmi"]),
        "a *word* b\n=> ../top.gmi Top\n",
    );

    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("a \\textit{word} b\n"));
    assert!(text.contains("\\href{gemini://a.com/top.gmi}{Top}"));
}

#[test]
fn test_multi_character_italics_rejected() {
    let output = run_with_stdin(gemtext2latex().args(["--italics-char", "**"]), "x\n");
    assert!(!output.status.success());
}

#[test]
fn test_foreign_base_is_fatal() {
    let output = run_with_stdin(gemtext2latex().args(["--base", "https://a.com/"]), "x\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("gemtext2latex: "));
}

#[test]
fn test_missing_input_file() {
    let output = gemtext2latex()
        .args(["--filename", "/nonexistent/input.gmi"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to open /nonexistent/input.gmi"));
}

#[test]
fn test_custom_template() {
    let output = run_with_stdin(
        gemtext2latex()
            .args(["--docclass", "article"])
            .args(["--top", "\\begin{document}"])
            .args(["--tail", "\\end{document}"]),
        "",
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "\\documentclass{article}\n\\begin{document}\n\\end{document}\n"
    );
}

#[test]
fn test_template_without_document_rejected() {
    let output = run_with_stdin(gemtext2latex().args(["--top", "nothing"]), "x\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("\\begin{document}"));
}

#[test]
fn test_config_file_with_flag_override() {
    let config = input_file("docclass = \"article\"\nitalics-char = \"/\"\n");
    let output = run_with_stdin(
        gemtext2latex()
            .arg("--config")
            .arg(config.path())
            .args(["--docclass", "report"]),
        "a /b/ c\n",
    );

    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.starts_with("\\documentclass{report}\n"));
    assert!(text.contains("a \\textit{b} c\n"));
}

#[test]
fn test_unterminated_block_warns() {
    let output = run_with_stdin(&mut gemtext2latex(), "kept\n```\nlost\n");

    assert!(output.status.success());
    assert!(!stdout(&output).contains("lost"));
    assert!(stderr(&output).contains("never closed"));
}

#[test]
fn test_emit_fragments() {
    let output = run_with_stdin(
        gemtext2latex().args(["--emit", "fragments"]),
        "# Title\n=> a.gmi\n",
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Heading: Title\nLinks: 1 item(s)\n  Link: a.gmi\n"
    );
}

#[test]
fn test_emit_json() {
    let output = run_with_stdin(gemtext2latex().args(["--emit", "json"]), "* a\n");

    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.contains("\"type\": \"list\""));
    assert!(text.contains("\"kind\": \"bullet\""));
}

#[test]
fn test_texinputs_installs_class_file() {
    let data = tempfile::tempdir().unwrap();
    let output = gemtext2latex()
        .env("XDG_DATA_HOME", data.path())
        .env("HOME", data.path())
        .arg("--texinputs")
        .output()
        .unwrap();

    let text = stdout(&output);
    assert!(output.status.success());
    assert!(text.starts_with("TEXINPUTS="));
    let dir = std::path::Path::new(text.trim_end().trim_start_matches("TEXINPUTS="));
    assert!(dir.starts_with(data.path()));

    let class = std::fs::read_to_string(dir.join("mk-plain.cls")).unwrap();
    assert!(class.contains("\\ProvidesClass{mk-plain}"));
}
