use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write as IoWrite};
use std::path::PathBuf;

use anyhow::{Context, bail};
use pointset_rs::{
    CODEPOINT_LIMIT, CodepointSet, Encoding, TableConfig, analyze,
    analysis::DEFAULT_CANDIDATES,
    classes::{NamedClass, STANDARD_CLASSES},
    emit::{self, Language},
};

const HELP: &str = "\
Usage: pointset-table-gen [options...]
  -h, --help                 Prints help information
  --lang=<c|rust>            Output language (default: c)
  --flat                     Emit one bit per code point instead of a paged table
  --page-bits=<5..21>        Page size in bits for the paged table (default: 10)
  --class <NAME=PRODUCTION>  Compile a custom class, may be repeated
                             (default: NameStartChar and NameChar)
  --analyze                  Print the table size for page sizes 2^8 to 2^14 and exit
  -o, --output <FILE>        Write to FILE instead of stdout

PRODUCTION uses the XML grammar notation, e.g. '[A-Z] | \"_\" | [#x370-#x37D]'.
";

struct Args {
    lang: Language,
    config: TableConfig,
    analyze: bool,
    classes: Vec<(String, String)>,
    output: Option<PathBuf>,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut args = pico_args::Arguments::from_env();
        if args.contains(["-h", "--help"]) {
            eprint!("{HELP}");
            return Ok(None);
        }

        let lang = args
            .opt_value_from_fn("--lang", |arg| match arg {
                "c" => Ok(Language::C),
                "rust" => Ok(Language::Rust),
                l => bail!("invalid language: \"{}\"", l),
            })?
            .unwrap_or_default();
        let mut config = TableConfig::default();
        if args.contains("--flat") {
            config = config.with_encoding(Encoding::Flat);
        }
        if let Some(bits) = args.opt_value_from_str::<_, u32>("--page-bits")? {
            config = config.with_page_bits(bits)?;
        }
        let analyze = args.contains("--analyze");
        let classes = args.values_from_fn("--class", |arg| match arg.split_once('=') {
            Some((name, production)) if !name.is_empty() => {
                Ok((name.to_string(), production.to_string()))
            }
            _ => bail!("expected NAME=PRODUCTION, got \"{}\"", arg),
        })?;
        let output = args.opt_value_from_os_str(["-o", "--output"], |s| {
            Ok::<PathBuf, &'static str>(s.into())
        })?;

        let remaining = args.finish();
        if !remaining.is_empty() {
            bail!("unrecognized arguments: {:?}", remaining);
        }

        Ok(Some(Self { lang, config, analyze, classes, output }))
    }

    fn describe(&self) -> String {
        let mut buf = String::new();
        match self.lang {
            Language::C => buf.push_str("--lang=c"),
            Language::Rust => buf.push_str("--lang=rust"),
        }
        match self.config.encoding {
            Encoding::Flat => buf.push_str(" --flat"),
            Encoding::Paged => {
                _ = write!(buf, " --page-bits={}", self.config.page_size.bits());
            }
        }
        for (name, _) in &self.classes {
            _ = write!(buf, " --class {name}=...");
        }
        buf
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(args) = Args::parse()? else {
        return Ok(());
    };

    let classes = if args.classes.is_empty() {
        STANDARD_CLASSES.to_vec()
    } else {
        args.classes
            .iter()
            .map(|(name, production)| NamedClass::new(name, production))
            .collect()
    };
    let sets = classes
        .iter()
        .map(|class| -> anyhow::Result<_> {
            let set = class
                .compile_set()
                .with_context(|| format!("failed to parse {}", class.name))?;
            log::debug!(
                "{}: {} ranges, {} code points",
                class.name,
                set.len(),
                set.cardinality()
            );
            Ok((class.name, set))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut buf = String::new();
    if args.analyze {
        for (name, set) in &sets {
            let report = analyze(set, DEFAULT_CANDIDATES)?;
            writeln!(buf, "{name}:\n{report}\n")?;
        }
    } else {
        let mut total_size = 0;
        let mut body = String::new();
        for (name, set) in &sets {
            let table = args.config.compile(set);
            sanity_check(name, set, |cp| table.contains(cp));
            total_size += table.table_size();
            emit::write_table(&mut body, args.lang, name, &table)?;
        }
        let page_note = match args.config.encoding {
            Encoding::Flat => String::new(),
            Encoding::Paged => {
                format!(", {} code points per page", args.config.page_size.codepoints())
            }
        };
        writeln!(
            buf,
            "// Generated by pointset-table-gen with {}; {total_size} bytes{page_note}\n",
            args.describe()
        )?;
        buf.push_str(&body);
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            out.write_all(buf.as_bytes())?;
            out.flush()?;
        }
        None => std::io::stdout().write_all(buf.as_bytes())?,
    }
    Ok(())
}

/// Checks the compiled table against the set it came from.
fn sanity_check(name: &str, set: &CodepointSet, contains: impl Fn(u32) -> bool) {
    for cp in 0..CODEPOINT_LIMIT {
        assert_eq!(
            contains(cp),
            set.contains(cp),
            "{name} table sanity check failed for U+{cp:04X}"
        );
    }
}
