use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::Level;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use vtpool::{DuplicatePolicy, ObjectPool, PoolSettings, Selectable, VtObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    JsonL,
}

struct PoolDump {
    input: PathBuf,
    output_format: OutputFormat,
    settings: PoolSettings,
    verbosity_level: Option<Level>,
}

impl PoolDump {
    fn from_cli_matches(matches: &ArgMatches) -> Self {
        let input = matches
            .get_one::<String>("INPUT")
            .map(PathBuf::from)
            .unwrap_or_default();

        let output_format = match matches.get_one::<String>("output-format").map(String::as_str) {
            Some("json") => OutputFormat::Json,
            Some("jsonl") => OutputFormat::JsonL,
            _ => OutputFormat::Table,
        };

        let duplicate_ids = if matches.get_flag("reject-duplicates") {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::LastWins
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        PoolDump {
            input,
            output_format,
            settings: PoolSettings::new().duplicate_ids(duplicate_ids),
            verbosity_level,
        }
    }

    fn run(&self) -> Result<()> {
        self.try_to_initialize_logging();

        let bytes = fs::read(&self.input)
            .with_context(|| format!("Failed to read `{}`", self.input.display()))?;

        let mut pool = ObjectPool::with_settings(self.settings.clone());
        pool.decode(&bytes)
            .with_context(|| format!("Failed to decode object pool `{}`", self.input.display()))?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.output_format {
            OutputFormat::Table => write_table(&mut out, &pool)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, &pool)?;
                writeln!(out)?;
            }
            OutputFormat::JsonL => {
                for object in sorted_objects(&pool) {
                    serde_json::to_writer(&mut out, object)?;
                    writeln!(out)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
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

fn sorted_objects(pool: &ObjectPool) -> Vec<&VtObject> {
    let mut objects: Vec<&VtObject> = pool.iter().collect();
    objects.sort_by_key(|object| object.object_id());
    objects
}

fn write_table(out: &mut impl Write, pool: &ObjectPool) -> Result<()> {
    writeln!(
        out,
        "Object pool version {} ({} objects)",
        pool.fingerprint().unwrap_or("-"),
        pool.len()
    )?;
    for object in sorted_objects(pool) {
        writeln!(
            out,
            "{:#06x}  {:<12}  {}",
            object.object_id(),
            object.object_type().to_string(),
            summary(object)
        )?;
    }
    Ok(())
}

fn summary(object: &VtObject) -> String {
    let fields = match object {
        VtObject::WorkingSet(ws) => format!(
            "background={} active_mask={:#06x} languages={}",
            ws.background_colour(),
            ws.active_mask(),
            ws.child_languages().join(",")
        ),
        VtObject::DataMask(mask) => format!(
            "background={} soft_key_mask={:#06x}",
            mask.background_colour(),
            mask.soft_key_mask()
        ),
        VtObject::AlarmMask(mask) => format!(
            "background={} soft_key_mask={:#06x} priority={} acoustic_signal={}",
            mask.background_colour(),
            mask.soft_key_mask(),
            mask.alarm_priority()
                .map(|p| p.to_string())
                .unwrap_or_else(|| mask.priority().to_string()),
            mask.acoustic_signal()
        ),
        VtObject::Container(container) => format!(
            "size={}x{} hidden={}",
            container.width(),
            container.height(),
            container.is_hidden()
        ),
        VtObject::SoftKeyMask(mask) => format!(
            "background={} keys={}",
            mask.background_colour(),
            mask.child_objects().len()
        ),
        VtObject::Key(key) => format!(
            "background={} key_code={} selected={}",
            key.background_colour(),
            key.key_code(),
            key.is_selected()
        ),
    };

    let children = object
        .child_objects()
        .map(|children| children.len())
        .or_else(|| object.as_soft_key_mask().map(|mask| mask.child_objects().len()))
        .unwrap_or(0);

    format!(
        "{} children={} macros={}",
        fields,
        children,
        object.child_macros().len()
    )
}

fn command() -> Command {
    Command::new("vtpool_dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to decode ISO 11783-6 virtual terminal object pools")
        .arg(Arg::new("INPUT").required(true).value_name("INPUT"))
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["table", "json", "jsonl"])
                .default_value("table")
                .help("Sets the output format")
                .long_help(
                    "Sets the output format:\n  \
                     \"table\" - one line per object.\n  \
                     \"json\"  - the whole pool as a single JSON document.\n  \
                     \"jsonl\" - one JSON object per line.",
                ),
        )
        .arg(
            Arg::new("reject-duplicates")
                .long("reject-duplicates")
                .action(ArgAction::SetTrue)
                .help("Fail the decode when two objects share an id, instead of keeping the last one."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace. Trace output is only available in debug builds."),
        )
}

fn main() {
    let matches = command().get_matches();
    let app = PoolDump::from_cli_matches(&matches);

    if let Err(e) = app.run() {
        eprintln!("{:?}", e);
        exit(1)
    }
}
