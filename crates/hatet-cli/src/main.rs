//! `hatet`: compile the AAAD and AHT blocks of a document.
//!
//! ```text
//! hatet page.html -o out.html --set user=ada --var accent=#0af
//! cat page.html | hatet --strict-styles
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;

use hatet_engine::logging::{LoggingConfig, init_logging};
use hatet_engine::{Host, SourceDocument, StyleVars, TemplateValues, TranspileOptions, Transpiler};

#[derive(Debug, Parser)]
#[command(name = "hatet", version, about = "Compile AAAD and AHT blocks in a document")]
struct Cli {
    /// Input document; `-` or nothing reads stdin.
    input: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template value for elements marked with `template-value=KEY`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
    values: Vec<(String, String)>,

    /// Style variable emitted as `--NAME` on `:root`.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_pair)]
    vars: Vec<(String, String)>,

    /// Marker attribute naming template slots.
    #[arg(long, default_value = hatet_engine::template::DEFAULT_MARKER)]
    marker: String,

    /// Reject AAAD blocks with unbalanced `!`/`@` lines.
    #[arg(long)]
    strict_styles: bool,

    /// Exit with status 2 when any block fails to compile.
    #[arg(long)]
    deny_failures: bool,

    /// Log filter in `env_logger` syntax, overriding RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn parse_pair(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        bail!("expected KEY=VALUE, got {s:?}");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty key in {s:?}");
    }
    Ok((key.to_string(), value.to_string()))
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

fn write_output(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => io::stdout().write_all(text.as_bytes()).context("writing stdout"),
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let text = read_input(cli.input.as_ref())?;
    let mut doc = SourceDocument::parse(&text);
    log::debug!("found {} block(s)", doc.block_count());

    let options = TranspileOptions::new().strict_stylesheets(cli.strict_styles);
    let report = Transpiler::new(options).run(&mut doc);

    let mut values = TemplateValues::new().with_marker(cli.marker.clone());
    for (key, value) in &cli.values {
        values.set(key.clone(), value.clone());
    }
    if !values.is_empty() {
        let filled: usize = doc.forests_mut().map(|forest| values.apply(forest)).sum();
        log::info!("filled {} template slot(s)", filled);
    }

    let mut vars = StyleVars::new();
    for (name, value) in &cli.vars {
        vars.set(name, value.clone());
    }
    if !vars.is_empty() {
        doc.inject_stylesheet(vars.to_css());
    }

    let rendered = doc.render().context("rendering document")?;
    write_output(cli.output.as_ref(), &rendered)?;
    Ok(report.is_clean())
}

/// 0 on success, 1 when the run itself failed, 2 when blocks failed and
/// `--deny-failures` is set.
fn exit_status(result: &Result<bool>, deny_failures: bool) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) if deny_failures => 2,
        Ok(false) => 0,
        Err(_) => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig { env_filter: cli.log.clone(), ..LoggingConfig::default() });

    let result = run(&cli);
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    ExitCode::from(exit_status(&result, cli.deny_failures))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_splits_on_first_equals() {
        assert_eq!(parse_pair("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert_eq!(parse_pair(" k =").unwrap(), ("k".to_string(), String::new()));
    }

    #[test]
    fn pair_rejects_missing_equals_or_key() {
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn cli_accepts_repeated_pairs() {
        let cli = Cli::try_parse_from(["hatet", "in.html", "--set", "a=1", "--set", "b=2", "--var", "gap=4px"]).unwrap();
        assert_eq!(cli.values.len(), 2);
        assert_eq!(cli.vars, vec![("gap".to_string(), "4px".to_string())]);
        assert_eq!(cli.marker, "template-value");
    }

    fn run_on(input: &str, extra: &[&str]) -> (Result<bool>, String) {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("in.html");
        let out_path = dir.path().join("out.html");
        fs::write(&in_path, input).unwrap();

        let mut args = vec!["hatet", in_path.to_str().unwrap(), "-o", out_path.to_str().unwrap()];
        args.extend_from_slice(extra);
        let cli = Cli::try_parse_from(args).unwrap();

        let result = run(&cli);
        let output = fs::read_to_string(&out_path).unwrap_or_default();
        (result, output)
    }

    #[test]
    fn failing_block_is_reported_and_kept() {
        let (result, output) = run_on("<AHT>@div{open</AHT>|<AHT>@b{ok}</AHT>", &[]);
        assert!(!result.unwrap());
        assert_eq!(output, "<AHT>@div{open</AHT>|<b>ok</b>");
    }

    #[test]
    fn templates_and_vars_apply_after_compilation() {
        let input = "<html><head></head><body>\
                     <AAAD>!h1\ncolor teal\n@</AAAD>\
                     <AHT>@p{Hi @b(template-value=user){?}}</AHT>\
                     </body></html>";
        let (result, output) = run_on(input, &["--set", "user=ada", "--var", "accent=red"]);
        assert!(result.unwrap());

        let block_css = output.find("<style>h1 { color: teal; }\n</style>").unwrap();
        let root_css = output.find("<style>:root { --accent: red; }\n</style>").unwrap();
        assert!(block_css < root_css);
        assert!(root_css < output.find("</head>").unwrap());
        assert!(output.contains(r#"<p>Hi <b template-value="user">ada</b></p>"#));
        assert!(!output.contains("AHT"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.html");
        let cli = Cli::try_parse_from(["hatet", missing.to_str().unwrap()]).unwrap();
        let result = run(&cli);
        assert!(result.is_err());
        assert_eq!(exit_status(&result, false), 1);
    }

    #[test]
    fn exit_status_follows_deny_failures() {
        assert_eq!(exit_status(&Ok(true), true), 0);
        assert_eq!(exit_status(&Ok(false), false), 0);
        assert_eq!(exit_status(&Ok(false), true), 2);
        assert_eq!(exit_status(&Err(anyhow::anyhow!("boom")), false), 1);
    }
}
