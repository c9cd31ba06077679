use anyhow::{Context, Result, bail};
use chatfence_config::Config;
use chatfence_engine::{MessageBuffer, Segment};
use std::{
    env,
    io::{self, Read, Write},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: chatfence-cli [--replay] [--config PATH] [FILE]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    replay: bool,
    config: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replay" => parsed.replay = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with('-') && flag != "-" => bail!("unknown flag {flag}\n{USAGE}"),
            _ if parsed.input.is_some() => bail!("only one input file is accepted\n{USAGE}"),
            path => parsed.input = Some(PathBuf::from(path)),
        }
    }

    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
            log::info!("Loading config from {}", path.display());
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_else(|| {
        log::info!("No config file found, using defaults");
        Config::default()
    }))
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok(bytes)
        }
    }
}

fn describe(segment: &Segment, config: &Config) -> String {
    match segment {
        Segment::Text { span } => format!("text  {:>6}..{:<6}", span.start, span.end),
        Segment::Code(code) => format!(
            "code  {:>6}..{:<6} {:<12} {}",
            code.span.start,
            code.span.end,
            config.resolve_language(&code.language),
            if code.is_complete {
                "complete"
            } else {
                "writing"
            }
        ),
    }
}

fn inspect(buffer: &MessageBuffer, config: &Config, out: &mut impl Write) -> Result<()> {
    for segment in buffer.segments() {
        writeln!(out, "{}", describe(&segment, config))?;
    }
    for issue in buffer.validate_code_block_syntax() {
        match issue.position {
            Some(pos) => writeln!(out, "issue {} at {pos}", issue.kind)?,
            None => writeln!(out, "issue {}", issue.kind)?,
        }
    }
    Ok(())
}

/// Checks that every segment but the last of `before` survives unchanged in `after`.
fn check_settled(before: &[Segment], after: &[Segment]) -> Result<()> {
    let Some((_, settled)) = before.split_last() else {
        return Ok(());
    };
    for (i, segment) in settled.iter().enumerate() {
        if after.get(i) != Some(segment) {
            bail!(
                "settled segment {i} changed: {segment:?} became {:?}",
                after.get(i)
            );
        }
    }
    Ok(())
}

/// Feeds `text` to a fresh buffer in `chunk_size` pieces, the way tokens
/// arrive from a model, reporting the state after each piece.
fn replay(text: &str, config: &Config, out: &mut impl Write) -> Result<MessageBuffer> {
    let mut buffer = MessageBuffer::new();
    let mut previous = Vec::new();
    let mut start = 0;
    let chunk_size = config.chunk_size.max(1);

    while start < text.len() {
        let mut end = (start + chunk_size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        buffer.push_str(&text[start..end]);
        start = end;

        let segments = buffer.segments();
        check_settled(&previous, &segments)
            .with_context(|| format!("streaming invariant broken at byte {end}"))?;
        writeln!(
            out,
            "chunk {:>4}: {:>6} bytes, {} segments, incomplete: {}",
            buffer.version(),
            buffer.len(),
            segments.len(),
            buffer.has_incomplete_code_block()
        )?;
        previous = segments;
    }

    Ok(buffer)
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(args.config.as_ref())?;
    let bytes = read_input(args.input.as_ref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.replay {
        let text = String::from_utf8(bytes).context("input is not valid UTF-8")?;
        let buffer = replay(&text, &config, &mut out)?;
        writeln!(out)?;
        inspect(&buffer, &config, &mut out)
    } else {
        let buffer = MessageBuffer::from_bytes(&bytes)?;
        inspect(&buffer, &config, &mut out)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags_and_input() {
        assert_eq!(
            args(&["--replay", "--config", "c.toml", "msg.md"]).unwrap(),
            Args {
                replay: true,
                config: Some(PathBuf::from("c.toml")),
                input: Some(PathBuf::from("msg.md")),
            }
        );
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn rejects_unknown_flags_and_extra_inputs() {
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["a.md", "b.md"]).is_err());
        assert!(args(&["--config"]).is_err());
    }

    #[test]
    fn inspect_lists_segments_and_issues() {
        let buffer = MessageBuffer::from_bytes(b"Hi\n```js\nx\n```\n```\n").unwrap();
        let mut out = Vec::new();
        inspect(&buffer, &Config::default(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().map(str::trim_end).collect();

        assert_eq!(
            lines,
            vec![
                "text       0..3",
                "code       3..15     javascript   complete",
                "code      15..19     text         writing",
                "issue unclosed_code_block at 15",
            ]
        );
    }

    #[test]
    fn replay_reports_each_chunk() {
        let mut config = Config::default();
        config.chunk_size = 4;
        let mut out = Vec::new();

        let buffer = replay("```\nab\n```\nok", &config, &mut out).unwrap();

        assert_eq!(buffer.to_text(), "```\nab\n```\nok");
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().last().unwrap().ends_with("2 segments, incomplete: false"));
    }

    #[test]
    fn replay_snaps_chunks_to_char_boundaries() {
        let mut config = Config::default();
        config.chunk_size = 1;
        let mut out = Vec::new();

        let buffer = replay("é✨", &config, &mut out).unwrap();

        assert_eq!(buffer.version(), 2);
    }

    #[test]
    fn replay_treats_zero_chunk_size_as_one() {
        let mut config = Config::default();
        config.chunk_size = 0;
        let mut out = Vec::new();

        let buffer = replay("ab\n", &config, &mut out).unwrap();

        assert_eq!(buffer.to_text(), "ab\n");
        assert_eq!(buffer.version(), 3);
    }

    #[test]
    fn check_settled_detects_moved_segments() {
        let before = chatfence_engine::segments("a\n```\nb\n```\nc");
        let after = chatfence_engine::segments("ab\n```\nb\n```\nc");
        assert!(check_settled(&before, &after).is_err());
        assert!(check_settled(&before, &before).is_ok());
    }
}
