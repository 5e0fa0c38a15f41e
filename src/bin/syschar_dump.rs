use anyhow::{Context, Result, bail, format_err};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use indoc::indoc;
use log::Level;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use oval_syschar::json_output::write_model;
use oval_syschar::{ParserSettings, SysCharDocument};

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Copy, Clone, PartialOrd, PartialEq)]
pub enum SyscharOutputFormat {
    Xml,
    Json,
    Text,
}

enum Input {
    Stdin,
    File(PathBuf),
}

struct SyscharDump {
    parser_settings: ParserSettings,
    input: Input,
    output_format: SyscharOutputFormat,
    output: Box<dyn Write>,
    validate: bool,
    verbosity_level: Option<Level>,
}

impl SyscharDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = match matches
            .get_one::<String>("INPUT")
            .map(String::as_str)
            .context("INPUT is a required argument")?
        {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        };

        let output_format = match matches
            .get_one::<String>("output-format")
            .map(String::as_str)
            .unwrap_or("xml")
        {
            "json" => SyscharOutputFormat::Json,
            "text" => SyscharOutputFormat::Text,
            _ => SyscharOutputFormat::Xml,
        };

        let no_indent = matches.get_flag("no-indent");
        let validate = matches.get_flag("validate");

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than  -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        let output: Box<dyn Write> = match matches.get_one::<String>("output-target") {
            Some(path) => {
                let file = Self::create_output_file(path, !matches.get_flag("no-confirm-overwrite"))
                    .with_context(|| {
                        format!("An error occurred while creating output file at `{}`", path)
                    })?;
                Box::new(file)
            }
            None => Box::new(io::stdout()),
        };

        Ok(SyscharDump {
            parser_settings: ParserSettings::new()
                .indent(!no_indent)
                .validate_items(validate),
            input,
            output_format,
            output,
            validate,
            verbosity_level,
        })
    }

    /// Main entry point for `SyscharDump`
    pub fn run(&mut self) -> Result<()> {
        self.try_to_initialize_logging();

        let document = match &self.input {
            Input::File(path) => SysCharDocument::from_path(path, &self.parser_settings)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Input::Stdin => {
                let mut xml = String::new();
                io::stdin()
                    .read_to_string(&mut xml)
                    .context("Failed to read document from stdin")?;
                SysCharDocument::parse_str(&xml, &self.parser_settings)
                    .context("Failed to parse document from stdin")?
            }
        };

        match self.output_format {
            SyscharOutputFormat::Xml => {
                let xml = SysCharDocument::to_xml(&document.model, &self.parser_settings)?;
                self.output.write_all(xml.as_bytes())?;
            }
            SyscharOutputFormat::Json => {
                write_model(&document.model, &self.parser_settings, &mut self.output)?;
            }
            SyscharOutputFormat::Text => {
                for (idx, item) in document.model.items().enumerate() {
                    writeln!(self.output, "{}", item.describe("", idx + 1))?;
                }
            }
        }
        self.output.flush()?;

        if self.validate {
            let invalid: Vec<&str> = document
                .model
                .items()
                .filter(|item| !item.is_valid())
                .map(|item| item.id())
                .collect();

            if !invalid.is_empty() {
                bail!(
                    "{} of {} items are invalid: {}",
                    invalid.len(),
                    document.model.len(),
                    invalid.join(", ")
                );
            }
        }

        Ok(())
    }

    /// If `prompt` is passed, will display a confirmation prompt before overwriting files.
    fn create_output_file(path: impl AsRef<Path>, prompt: bool) -> Result<File> {
        let p = path.as_ref();

        if p.is_dir() {
            bail!(
                "There is a directory at {}, refusing to overwrite",
                p.display()
            );
        }

        if p.exists() {
            if prompt {
                match Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to override output file at {}",
                        p.display()
                    ))
                    .default(false)
                    .interact()
                {
                    Ok(true) => Ok(File::create(p)?),
                    Ok(false) => bail!("Cancelled"),
                    Err(e) => Err(format_err!(
                        "Failed to write confirmation prompt to term caused by\n{}",
                        e
                    )),
                }
            } else {
                Ok(File::create(p)?)
            }
        } else {
            // Ok to assume p is not an existing directory
            match p.parent() {
                Some(parent) => {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        fs::create_dir_all(parent)?;
                    }
                    Ok(File::create(p)?)
                }
                None => bail!("Output file cannot be root."),
            }
        }
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            // Diagnostics go to stderr so they never mix with the converted document.
            if let Err(e) = TermLogger::init(
                level.to_level_filter(),
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        }
    }
}

fn command() -> Command {
    Command::new("syschar_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to read, check and convert OVAL system-characteristics documents")
        .arg(
            Arg::new("INPUT")
                .required(true)
                .help("Path to the document, or `-` to read it from stdin."),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["xml", "json", "text"])
                .default_value("xml")
                .help("Sets the output format")
                .long_help(indoc!(r#"
                    Sets the output format:
                        "xml"  - re-emits the system data as XML.
                        "json" - prints the items as a JSON array.
                        "text" - prints a human readable dump of every item.
                "#)),
        )
        .arg(
            Arg::new("output-target")
                .long("output")
                .short('f')
                .value_name("PATH")
                .help("Writes output to the file specified instead of stdout, errors will still be printed to stderr. \
                       Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`. \
                       Will create parent directories if needed."),
        )
        .arg(
            Arg::new("no-confirm-overwrite")
                .long("no-confirm-overwrite")
                .action(ArgAction::SetTrue)
                .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
        )
        .arg(
            Arg::new("no-indent")
                .long("no-indent")
                .action(ArgAction::SetTrue)
                .help("When set, output will not be indented."),
        )
        .arg(
            Arg::new("validate")
                .long("validate")
                .action(ArgAction::SetTrue)
                .help("When set, exits with an error if any item is invalid (unknown subtype or malformed entry)."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace."),
        )
}

fn main() {
    let matches = command().get_matches();

    let result = SyscharDump::from_cli_matches(&matches).and_then(|mut app| app.run());

    if let Err(e) = result {
        eprintln!("{:?}", e);
        exit(1);
    }
}
